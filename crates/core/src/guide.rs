//! Guide generation service.
//!
//! Ties the record store, the renderer and the output store together for one request:
//! validate → look up → render → persist.

use guia_render::{render_guide, Document, GuideContent, RenderOptions};
use std::path::PathBuf;
use std::sync::Arc;

use crate::output::OutputStore;
use crate::record::Role;
use crate::store::RecordStore;
use crate::validation::{validate_form, GuideForm};
use crate::{CoreConfig, GuideError, GuideResult};

/// Choices offered to a client before it submits a guide.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FormContext {
    pub origin_sections: Vec<String>,
    pub destination_sections: Vec<String>,
}

/// A rendered and persisted guide.
#[derive(Debug, Clone)]
pub struct GeneratedGuide {
    pub pdf: Vec<u8>,
    pub path: PathBuf,
    /// Layout the PDF was serialised from.
    pub document: Document,
    pub row_count: usize,
    pub page_count: usize,
}

/// Guide operations over a shared, immutable record store.
#[derive(Clone, Debug)]
pub struct GuideService {
    cfg: Arc<CoreConfig>,
    store: Arc<RecordStore>,
    output: OutputStore,
}

impl GuideService {
    pub fn new(cfg: Arc<CoreConfig>, store: Arc<RecordStore>) -> Self {
        let output = OutputStore::new(cfg.output_dir());
        Self { cfg, store, output }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Distinct origin and destination sections for populating the form.
    pub fn form_context(&self) -> FormContext {
        FormContext {
            origin_sections: self.store.distinct_origin_sections(),
            destination_sections: self.store.distinct_destination_sections(),
        }
    }

    /// First authority recorded for a section, or an empty string if there is none.
    ///
    /// # Errors
    ///
    /// Returns `GuideError::InvalidArgument` if `role` is not a recognised role.
    pub fn authority(&self, section: &str, role: &str) -> GuideResult<String> {
        let role: Role = role.parse()?;
        Ok(self
            .store
            .authority_for_section(section.trim(), role)
            .unwrap_or_default()
            .to_string())
    }

    /// Validates the form, renders the guide for the matching assets and writes it to a
    /// per-request file.
    ///
    /// # Errors
    ///
    /// - `GuideError::Validation` if a field is missing; nothing is looked up.
    /// - `GuideError::NotFound` if no asset matches; nothing is written.
    /// - `GuideError::Render` if the text cannot be encoded.
    /// - `GuideError::OutputDirCreation` / `OutputWrite` if persisting fails.
    pub fn generate(&self, form: &GuideForm) -> GuideResult<GeneratedGuide> {
        let validated = validate_form(form)?;

        let records = self.store.lookup_by_identifiers(&validated.identifiers);
        if records.is_empty() {
            tracing::warn!(
                "no asset matched identifiers {:?}",
                validated.identifiers
            );
            return Err(GuideError::NotFound);
        }

        let content = GuideContent {
            rows: records.iter().map(|r| r.to_guide_row()).collect(),
            fields: validated.fields,
        };
        let options = RenderOptions {
            unmapped: self.cfg.unmapped_policy(),
        };
        let rendered = render_guide(&content, &options)?;
        let path = self.output.write(&rendered.pdf)?;

        tracing::info!(
            "generated guide with {} rows on {} pages: {}",
            rendered.row_count,
            rendered.page_count,
            path.display()
        );

        Ok(GeneratedGuide {
            pdf: rendered.pdf,
            path,
            document: rendered.document,
            row_count: rendered.row_count,
            page_count: rendered.page_count,
        })
    }
}
