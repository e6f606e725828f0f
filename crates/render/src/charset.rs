//! Output character policy.
//!
//! Text is drawn with the built-in Helvetica fonts using WinAnsiEncoding, and only the
//! ISO-8859-1 printable range is written. Everything else either has a declared ASCII
//! substitute in [`SUBSTITUTIONS`] or is handled by the configured [`UnmappedPolicy`].
//!
//! The same pass runs over the page header, every table cell and the approval text.

use crate::{RenderError, RenderResult};

/// Declared substitutes for characters that commonly appear in spreadsheet text.
pub const SUBSTITUTIONS: &[(char, &str)] = &[
    ('\u{2010}', "-"), // hyphen
    ('\u{2011}', "-"), // non-breaking hyphen
    ('\u{2012}', "-"), // figure dash
    ('\u{2013}', "-"), // en dash
    ('\u{2014}', "-"), // em dash
    ('\u{2015}', "-"), // horizontal bar
    ('\u{2212}', "-"), // minus sign
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201A}', "'"),
    ('\u{2032}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{201E}', "\""),
    ('\u{2033}', "\""),
    ('\u{2026}', "..."),
    ('\u{2022}', "-"),
    ('\u{20AC}', "EUR"),
    ('\t', " "),
    ('\u{2007}', " "),
    ('\u{2009}', " "),
    ('\u{202F}', " "),
    ('\r', ""),
    ('\u{200B}', ""),
    ('\u{200C}', ""),
    ('\u{200D}', ""),
    ('\u{FEFF}', ""),
];

/// What to do with a character that is neither encodable nor in [`SUBSTITUTIONS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmappedPolicy {
    /// Fail the render with [`RenderError::UnsupportedCharacter`].
    #[default]
    Reject,
    /// Write this character instead. It must itself be encodable.
    Replace(char),
}

/// Whether `c` can be written as-is. `\n` is kept as a line break for the layout.
pub fn is_encodable(c: char) -> bool {
    matches!(u32::from(c), 0x20..=0x7E | 0xA0..=0xFF) || c == '\n'
}

/// Declared substitute for `c`, if any.
pub fn substitute(c: char) -> Option<&'static str> {
    SUBSTITUTIONS
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
}

/// Rewrites `text` so that every character is encodable.
///
/// `field` names the piece of text being prepared and is only used in the error.
///
/// # Errors
///
/// Returns `RenderError::UnsupportedCharacter` when a character has no substitute and the
/// policy is [`UnmappedPolicy::Reject`], or when the replacement character is itself not
/// encodable.
pub fn sanitize(text: &str, policy: UnmappedPolicy, field: &str) -> RenderResult<String> {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if let Some(replacement) = substitute(c) {
            out.push_str(replacement);
        } else if is_encodable(c) {
            out.push(c);
        } else {
            match policy {
                UnmappedPolicy::Replace(fallback) if is_encodable(fallback) => out.push(fallback),
                _ => {
                    return Err(RenderError::UnsupportedCharacter {
                        character: c,
                        field: field.to_string(),
                    })
                }
            }
        }
    }
    Ok(out)
}

/// Encodes already sanitised text as single-byte WinAnsi/Latin-1 bytes.
///
/// # Errors
///
/// Returns `RenderError::UnsupportedCharacter` if a character above U+00FF reaches
/// serialisation.
pub fn encode_latin1(text: &str) -> RenderResult<Vec<u8>> {
    text.chars()
        .map(|c| {
            u8::try_from(u32::from(c)).map_err(|_| RenderError::UnsupportedCharacter {
                character: c,
                field: "pdf text".into(),
            })
        })
        .collect()
}
