//! JSON request and response bodies.
//!
//! Request fields are optional at the wire level so that a missing field reaches validation
//! and is reported with the form context, instead of being rejected by the JSON extractor.
//! The Portuguese field names of the original form are accepted as aliases.

use guia_core::{FormContext, GuideForm};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
    pub records: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct FormContextRes {
    pub origin_sections: Vec<String>,
    pub destination_sections: Vec<String>,
}

impl From<FormContext> for FormContextRes {
    fn from(context: FormContext) -> Self {
        Self {
            origin_sections: context.origin_sections,
            destination_sections: context.destination_sections,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(default)]
pub struct GenerateGuideReq {
    /// Comma-separated asset identifiers, e.g. `"101, 202"`.
    pub bmp_numbers: Option<String>,
    #[serde(alias = "secao_origem")]
    pub origin_section: Option<String>,
    #[serde(alias = "secao_destino")]
    pub destination_section: Option<String>,
    #[serde(alias = "chefia_origem")]
    pub origin_authority: Option<String>,
    #[serde(alias = "chefia_destino")]
    pub destination_authority: Option<String>,
}

impl From<GenerateGuideReq> for GuideForm {
    fn from(req: GenerateGuideReq) -> Self {
        GuideForm {
            bmp_numbers: req.bmp_numbers,
            origin_section: req.origin_section,
            destination_section: req.destination_section,
            origin_authority: req.origin_authority,
            destination_authority: req.destination_authority,
        }
    }
}

/// Error body for guide requests; carries the form choices so the client can re-prompt.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct GuideErrorRes {
    pub error: String,
    pub origin_sections: Vec<String>,
    pub destination_sections: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(default)]
pub struct AuthorityReq {
    #[serde(alias = "secao")]
    pub section: Option<String>,
    /// `origin` or `destination`
    #[serde(alias = "tipo")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AuthorityRes {
    pub authority: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ErrorRes {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_accepts_original_field_names() {
        let req: GenerateGuideReq = serde_json::from_str(
            r#"{"bmp_numbers":"101","secao_origem":"A","secao_destino":"B","chefia_origem":"X","chefia_destino":"Y"}"#,
        )
        .unwrap();
        assert_eq!(req.origin_section.as_deref(), Some("A"));
        assert_eq!(req.destination_authority.as_deref(), Some("Y"));
    }

    #[test]
    fn test_generate_request_missing_fields_are_none() {
        let req: GenerateGuideReq = serde_json::from_str(r#"{"bmp_numbers":"101"}"#).unwrap();
        let form: GuideForm = req.into();
        assert_eq!(form.bmp_numbers.as_deref(), Some("101"));
        assert!(form.origin_section.is_none());
    }

    #[test]
    fn test_authority_request_aliases() {
        let req: AuthorityReq = serde_json::from_str(r#"{"secao":"SAD","tipo":"origem"}"#).unwrap();
        assert_eq!(req.section.as_deref(), Some("SAD"));
        assert_eq!(req.role.as_deref(), Some("origem"));
    }
}
