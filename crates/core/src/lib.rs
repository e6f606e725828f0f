//! # GUIA Core
//!
//! Business logic for the internal movement guide:
//! - the read-only asset table ([`RecordStore`]) loaded once from CSV
//! - validation of guide requests
//! - guide generation and per-request persistence ([`GuideService`])
//!
//! **No API concerns**: HTTP handlers and the command line live in `api-rest` and `cli`.

pub mod config;
pub mod constants;
mod error;
pub mod guide;
pub mod output;
pub mod record;
pub mod store;
pub mod validation;

pub use config::{resolve_source_file, unmapped_policy_from_env_value, CoreConfig};
pub use error::{GuideError, GuideResult, StoreError, StoreResult};
pub use guide::{FormContext, GeneratedGuide, GuideService};
pub use record::{AssetRecord, Role};
pub use store::RecordStore;
pub use validation::{GuideForm, ValidatedGuideForm};

pub use guia_render::UnmappedPolicy;
