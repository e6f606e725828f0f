//! Core runtime configuration.
//!
//! Configuration is resolved once at process start-up and passed into services. Request
//! handling never reads environment variables.

use guia_render::UnmappedPolicy;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_SOURCE_FILE, FALLBACK_CHARACTER};
use crate::{GuideError, GuideResult};

/// Core configuration resolved at start-up.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    output_dir: PathBuf,
    unmapped_policy: UnmappedPolicy,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `GuideError::InvalidConfig` if `output_dir` exists but is not a directory.
    pub fn new(output_dir: PathBuf, unmapped_policy: UnmappedPolicy) -> GuideResult<Self> {
        if output_dir.exists() && !output_dir.is_dir() {
            return Err(GuideError::InvalidConfig(format!(
                "output path is not a directory: {}",
                output_dir.display()
            )));
        }

        Ok(Self {
            output_dir,
            unmapped_policy,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn unmapped_policy(&self) -> UnmappedPolicy {
        self.unmapped_policy
    }
}

/// Resolve the asset table path without reading environment variables.
///
/// If `override_file` is provided it must be an existing file. Otherwise
/// `patrimonio.csv` in the current working directory is used.
pub fn resolve_source_file(override_file: Option<PathBuf>) -> GuideResult<PathBuf> {
    let candidate = override_file.unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_FILE));
    if candidate.is_file() {
        return Ok(candidate);
    }
    Err(GuideError::InvalidConfig(format!(
        "source table not found: {}",
        candidate.display()
    )))
}

/// Parse the unmapped-character policy from an optional string value.
///
/// `None`, empty or `reject` rejects; `replace` substitutes `?`.
pub fn unmapped_policy_from_env_value(value: Option<String>) -> GuideResult<UnmappedPolicy> {
    let value = value
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty());

    match value.as_deref() {
        None | Some("reject") => Ok(UnmappedPolicy::Reject),
        Some("replace") => Ok(UnmappedPolicy::Replace(FALLBACK_CHARACTER)),
        Some(other) => Err(GuideError::InvalidConfig(format!(
            "GUIA_UNMAPPED_CHARS must be 'reject' or 'replace', got {other:?}"
        ))),
    }
}
