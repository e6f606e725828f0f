//! Input validation for guide requests.
//!
//! All five form fields are required. Validation turns the raw form into typed values before
//! the record store or the renderer see it.

use guia_render::GuideFields;
use guia_types::NonEmptyText;

use crate::{GuideError, GuideResult};

/// Raw guide request as submitted by a client. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuideForm {
    pub bmp_numbers: Option<String>,
    pub origin_section: Option<String>,
    pub destination_section: Option<String>,
    pub origin_authority: Option<String>,
    pub destination_authority: Option<String>,
}

/// A guide request with every field present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedGuideForm {
    pub identifiers: Vec<String>,
    pub fields: GuideFields,
}

/// Splits a comma-delimited identifier list, trimming items and dropping empty ones.
pub fn parse_identifier_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

fn required(value: Option<&str>, name: &str) -> GuideResult<NonEmptyText> {
    NonEmptyText::from_optional(value).map_err(|_| GuideError::Validation(name.to_string()))
}

/// Validates a guide form.
///
/// # Errors
///
/// Returns `GuideError::Validation` naming the first missing or blank field. An identifier
/// list with no non-empty items counts as missing.
pub fn validate_form(form: &GuideForm) -> GuideResult<ValidatedGuideForm> {
    let bmp_numbers = required(form.bmp_numbers.as_deref(), "bmp_numbers")?;
    let fields = GuideFields {
        origin_section: required(form.origin_section.as_deref(), "origin_section")?,
        destination_section: required(form.destination_section.as_deref(), "destination_section")?,
        origin_authority: required(form.origin_authority.as_deref(), "origin_authority")?,
        destination_authority: required(
            form.destination_authority.as_deref(),
            "destination_authority",
        )?,
    };

    let identifiers = parse_identifier_list(bmp_numbers.as_str());
    if identifiers.is_empty() {
        return Err(GuideError::Validation("bmp_numbers".into()));
    }

    Ok(ValidatedGuideForm {
        identifiers,
        fields,
    })
}
