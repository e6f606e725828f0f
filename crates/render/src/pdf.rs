//! Serialises a laid out [`Document`] to PDF with `lopdf`.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, Stream, StringFormat};

use crate::charset::encode_latin1;
use crate::layout::{Document, Element, Page, PAGE_HEIGHT, PAGE_WIDTH};
use crate::metrics::{Font, PT_PER_MM};
use crate::RenderResult;

const PDF_VERSION: &str = "1.4";
/// Border stroke width in points (0.2 mm).
const LINE_WIDTH_PT: f32 = 0.567;
const DOCUMENT_TITLE: &str = "Guia de Movimentação de Bem Móvel Permanente";

fn pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

/// Converts a top-down millimetre coordinate to bottom-up points.
fn flip_y(mm: f32) -> f32 {
    pt(PAGE_HEIGHT - mm)
}

fn font_dictionary(font: Font) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn page_operations(page: &Page) -> RenderResult<Vec<Operation>> {
    let mut operations = vec![Operation::new("w", vec![LINE_WIDTH_PT.into()])];
    for element in &page.elements {
        match element {
            Element::Rect(rect) => {
                operations.push(Operation::new(
                    "re",
                    vec![
                        pt(rect.x).into(),
                        flip_y(rect.y + rect.height).into(),
                        pt(rect.width).into(),
                        pt(rect.height).into(),
                    ],
                ));
                operations.push(Operation::new("S", vec![]));
            }
            Element::Text(run) => {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new(
                    "Tf",
                    vec![
                        Object::Name(run.font.resource_name().as_bytes().to_vec()),
                        run.size.into(),
                    ],
                ));
                operations.push(Operation::new(
                    "Td",
                    vec![pt(run.x).into(), flip_y(run.y).into()],
                ));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::String(
                        encode_latin1(&run.text)?,
                        StringFormat::Literal,
                    )],
                ));
                operations.push(Operation::new("ET", vec![]));
            }
        }
    }
    Ok(operations)
}

pub(crate) fn write_pdf(document: &Document) -> RenderResult<Vec<u8>> {
    let mut pdf = lopdf::Document::with_version(PDF_VERSION);
    let pages_id = pdf.new_object_id();

    let regular_id = pdf.add_object(font_dictionary(Font::Helvetica));
    let bold_id = pdf.add_object(font_dictionary(Font::HelveticaBold));
    let resources_id = pdf.add_object(dictionary! {
        "Font" => dictionary! {
            Font::Helvetica.resource_name() => regular_id,
            Font::HelveticaBold.resource_name() => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(document.pages().len());
    for page in document.pages() {
        let content = Content {
            operations: page_operations(page)?,
        };
        let content_id = pdf.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let media_box: Vec<Object> = vec![
        0_i64.into(),
        0_i64.into(),
        pt(PAGE_WIDTH).into(),
        pt(PAGE_HEIGHT).into(),
    ];
    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        }),
    );

    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = pdf.add_object(dictionary! {
        "Title" => Object::String(encode_latin1(DOCUMENT_TITLE)?, StringFormat::Literal),
        "Producer" => Object::string_literal(concat!("guia-render ", env!("CARGO_PKG_VERSION"))),
    });
    pdf.trailer.set("Root", catalog_id);
    pdf.trailer.set("Info", info_id);
    pdf.compress();

    let mut bytes = Vec::new();
    pdf.save_to(&mut bytes)?;
    Ok(bytes)
}
