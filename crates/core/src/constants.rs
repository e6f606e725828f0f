//! Constants used throughout the GUIA core crate.
//!
//! Column names, default paths and user-facing messages live here so the REST API, the CLI
//! and the tests agree on them.

/// Source file read at start-up when `GUIA_SOURCE_FILE` is not set.
pub const DEFAULT_SOURCE_FILE: &str = "patrimonio.csv";

/// Directory generated guides are written to when `GUIA_OUTPUT_DIR` is not set.
pub const DEFAULT_OUTPUT_DIR: &str = "static";

/// Stem of generated guide file names. Each file gets a per-request suffix.
pub const OUTPUT_FILE_STEM: &str = "guia_circulacao_interna";

/// Name offered to the client when downloading a guide.
pub const DOWNLOAD_FILE_NAME: &str = "guia_circulacao_interna.pdf";

/// Character written in place of unmapped characters when the policy is `replace`.
pub const FALLBACK_CHARACTER: char = '?';

/// Header names of the asset spreadsheet export.
pub mod columns {
    pub const IDENTIFIER: &str = "Nº BMP";
    pub const DESCRIPTION: &str = "NOMECLATURA/COMPONENTE";
    pub const SERIAL_NUMBER: &str = "Nº SERIE";
    pub const VALUE: &str = "VL. ATUALIZ.";
    pub const ORIGIN_SECTION: &str = "Seção de Origem";
    pub const DESTINATION_SECTION: &str = "Seção de Destino";
    pub const ORIGIN_AUTHORITY: &str = "Chefia de Origem";
    pub const DESTINATION_AUTHORITY: &str = "Chefia de Destino";
}

/// Message returned when a required form field is blank.
pub const MISSING_FIELDS_MESSAGE: &str = "Preencha todos os campos!";

/// Message returned when no asset matches the submitted identifiers.
pub const NOT_FOUND_MESSAGE: &str = "Nenhum BMP encontrado para os números fornecidos.";

/// Message returned for an authority lookup with an unknown role.
pub const INVALID_ROLE_MESSAGE: &str = "Tipo inválido";
