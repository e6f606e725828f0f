//! # GUIA Render
//!
//! Document renderer for the internal movement guide.
//!
//! Given the matched asset rows and the four names typed into the form, this crate:
//! - rewrites text into the output character set ([`charset`])
//! - lays out the header, the bordered asset table and the approval text ([`layout`])
//! - serialises the pages to PDF bytes ([`pdf`])
//!
//! Rendering is a pure function of its input. Persisting the output is left to `guia-core`.

pub mod charset;
pub mod layout;
pub mod metrics;
mod pdf;
pub mod template;

pub use charset::UnmappedPolicy;
pub use layout::{
    estimate_line_count, layout_guide, wrap_text, Document, RowGeometry, RowSegment,
};
pub use metrics::Font;
pub use template::{format_value, GuideContent, GuideFields, GuideRow};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("unsupported character {character:?} ({}) in {field}", codepoint(.character))]
    UnsupportedCharacter { character: char, field: String },
    #[error("failed to build PDF: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("failed to write PDF: {0}")]
    Io(#[from] std::io::Error),
}

fn codepoint(c: &char) -> String {
    format!("U+{:04X}", u32::from(*c))
}

pub type RenderResult<T> = std::result::Result<T, RenderError>;

/// Options that change how a guide is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub unmapped: UnmappedPolicy,
}

/// A finished guide.
#[derive(Debug, Clone)]
pub struct RenderedGuide {
    pub pdf: Vec<u8>,
    pub document: Document,
    pub page_count: usize,
    pub row_count: usize,
}

/// Lays out and serialises a guide.
///
/// # Errors
///
/// Returns `RenderError::UnsupportedCharacter` if the text cannot be represented under
/// `options.unmapped`, or `RenderError::Pdf`/`Io` if serialisation fails.
pub fn render_guide(content: &GuideContent, options: &RenderOptions) -> RenderResult<RenderedGuide> {
    let document = layout_guide(content, options.unmapped)?;
    let pdf = document.to_pdf_bytes()?;
    tracing::debug!(
        pages = document.pages().len(),
        rows = document.rows().len(),
        bytes = pdf.len(),
        "rendered guide"
    );
    Ok(RenderedGuide {
        pdf,
        page_count: document.pages().len(),
        row_count: document.rows().len(),
        document,
    })
}
