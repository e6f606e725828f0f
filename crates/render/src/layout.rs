//! Page layout for the movement guide.
//!
//! Coordinates are millimetres from the top-left corner of an A4 portrait page, the same
//! convention the PDF writer converts from. The [`DocumentBuilder`] keeps a cursor and starts
//! every page itself by writing the header block, so there are no per-page callbacks.

use crate::charset::{sanitize, UnmappedPolicy};
use crate::metrics::{Font, PT_PER_MM};
use crate::template::{
    approval_text, GuideContent, COLUMNS, DESCRIPTION_COLUMN, HEADER_LINES, HEADER_SPACING,
};
use crate::RenderResult;

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 10.0;
/// Distance from the bottom edge that triggers a page break.
pub const BOTTOM_MARGIN: f32 = 20.0;
/// Horizontal padding between a cell border and its text.
pub const CELL_PADDING: f32 = 1.0;
pub const TEXT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

/// Height of one text line in a table row.
pub const ROW_LINE_HEIGHT: f32 = 10.0;
pub const TABLE_FONT_SIZE: f32 = 10.0;
pub const HEADER_FONT_SIZE: f32 = 12.0;
pub const BODY_FONT_SIZE: f32 = 12.0;
pub const BODY_LINE_HEIGHT: f32 = 8.0;
/// Space between the table and the approval text.
pub const BODY_SPACING: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// A run of text; `y` is the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub font: Font,
    pub size: f32,
    pub text: String,
}

/// A stroked rectangle; `y` is the top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text(TextRun),
    Rect(Rect),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub elements: Vec<Element>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text(t) => Some(t),
            Element::Rect(_) => None,
        })
    }
}

/// The part of an asset row drawn on one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowSegment {
    pub page: usize,
    pub y: f32,
    pub height: f32,
}

/// Where an asset row ended up. A row taller than the space left on a page continues on the
/// next one, so it has one segment per page it touches.
#[derive(Debug, Clone, PartialEq)]
pub struct RowGeometry {
    pub line_count: usize,
    pub cells: [String; 4],
    pub segments: Vec<RowSegment>,
}

impl RowGeometry {
    /// Page the row starts on.
    pub fn page(&self) -> usize {
        self.segments.first().map_or(0, |s| s.page)
    }

    /// Total height over all segments.
    pub fn height(&self) -> f32 {
        self.segments.iter().map(|s| s.height).sum()
    }
}

/// A laid out guide, ready to be serialised.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pages: Vec<Page>,
    rows: Vec<RowGeometry>,
    approval_text: String,
}

impl Document {
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Asset rows in table order (the column header row is not included).
    pub fn rows(&self) -> &[RowGeometry] {
        &self.rows
    }

    /// The approval text after substitution, before wrapping.
    pub fn approval_text(&self) -> &str {
        &self.approval_text
    }

    pub fn to_pdf_bytes(&self) -> RenderResult<Vec<u8>> {
        crate::pdf::write_pdf(self)
    }
}

/// Number of lines `width` of text needs in a column of `text_width`: rounded up, at least one.
pub fn estimate_line_count(width: f32, text_width: f32) -> usize {
    if text_width <= 0.0 || width <= 0.0 {
        return 1;
    }
    ((width / text_width).ceil() as usize).max(1)
}

/// Greedy word wrap by measured width. Explicit `\n` always breaks; words wider than
/// `max_width` are split between characters.
pub fn wrap_text(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if font.text_width(&candidate, size) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if font.text_width(word, size) <= max_width {
                current = word.to_string();
                continue;
            }
            for c in word.chars() {
                current.push(c);
                if current.chars().count() > 1 && font.text_width(&current, size) > max_width {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(c);
                }
            }
        }
        lines.push(current);
    }
    lines
}

/// Whole table lines that fit between `top` and `bottom`.
fn lines_between(top: f32, bottom: f32) -> usize {
    ((bottom - top) / ROW_LINE_HEIGHT + 1e-3).floor().max(0.0) as usize
}

/// Table lines available on a page that holds only the header block and the column titles.
fn fresh_page_lines() -> usize {
    let first_row_top = MARGIN
        + HEADER_LINES.iter().map(|l| l.height).sum::<f32>()
        + HEADER_SPACING
        + ROW_LINE_HEIGHT;
    lines_between(first_row_top, PAGE_HEIGHT - BOTTOM_MARGIN)
}

/// Cursor-based builder mirroring a classic PDF cell API.
pub struct DocumentBuilder {
    pages: Vec<Page>,
    rows: Vec<RowGeometry>,
    x: f32,
    y: f32,
    font: Font,
    size: f32,
    policy: UnmappedPolicy,
    /// Nothing but column titles below the cursor on this page.
    at_table_start: bool,
}

impl DocumentBuilder {
    pub fn new(policy: UnmappedPolicy) -> Self {
        Self {
            pages: Vec::new(),
            rows: Vec::new(),
            x: MARGIN,
            y: MARGIN,
            font: Font::Helvetica,
            size: TABLE_FONT_SIZE,
            policy,
            at_table_start: false,
        }
    }

    fn set_font(&mut self, font: Font, size: f32) {
        self.font = font;
        self.size = size;
    }

    fn push(&mut self, element: Element) {
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        if let Some(page) = self.pages.last_mut() {
            page.elements.push(element);
        }
    }

    fn ln(&mut self, height: f32) {
        self.x = MARGIN;
        self.y += height;
    }

    fn fits(&self, height: f32) -> bool {
        self.y + height <= PAGE_HEIGHT - BOTTOM_MARGIN
    }

    /// Draws one cell at the cursor and advances it horizontally. `text` must be sanitised.
    fn cell(&mut self, width: f32, height: f32, text: &str, border: bool, align: Align) {
        if border {
            self.push(Element::Rect(Rect {
                x: self.x,
                y: self.y,
                width,
                height,
            }));
        }
        if !text.is_empty() {
            self.text_line(width, self.y, height, text, align);
        }
        self.x += width;
    }

    /// Places a single line of text vertically centred in a band of `height` starting at `top`.
    fn text_line(&mut self, width: f32, top: f32, height: f32, text: &str, align: Align) {
        let text_width = self.font.text_width(text, self.size);
        let x = match align {
            Align::Left => self.x + CELL_PADDING,
            Align::Center => self.x + (width - text_width) / 2.0,
            Align::Right => self.x + width - CELL_PADDING - text_width,
        };
        let font_height = self.size / PT_PER_MM;
        self.push(Element::Text(TextRun {
            x,
            y: top + 0.5 * height + 0.3 * font_height,
            font: self.font,
            size: self.size,
            text: text.to_string(),
        }));
    }

    fn prepare(&self, text: &str, field: &str) -> RenderResult<String> {
        sanitize(text, self.policy, field)
    }

    /// Starts a new page with the header block.
    fn add_page(&mut self) -> RenderResult<()> {
        self.pages.push(Page::default());
        tracing::debug!(page = self.pages.len(), "starting page");
        self.x = MARGIN;
        self.y = MARGIN;

        self.set_font(Font::HelveticaBold, HEADER_FONT_SIZE);
        for line in &HEADER_LINES {
            let text = self.prepare(line.text, "header")?;
            self.cell(TEXT_WIDTH, line.height, &text, false, Align::Center);
            self.ln(line.height);
        }
        self.ln(HEADER_SPACING);
        Ok(())
    }

    fn table_header(&mut self) -> RenderResult<()> {
        self.set_font(Font::HelveticaBold, TABLE_FONT_SIZE);
        for column in &COLUMNS {
            let title = self.prepare(column.title, "column title")?;
            self.cell(column.width, ROW_LINE_HEIGHT, &title, true, Align::Center);
        }
        self.ln(ROW_LINE_HEIGHT);
        self.at_table_start = true;
        Ok(())
    }

    fn continue_table(&mut self) -> RenderResult<()> {
        self.add_page()?;
        self.table_header()?;
        self.set_font(Font::Helvetica, TABLE_FONT_SIZE);
        Ok(())
    }

    /// Writes one asset row. All four cells share the height of the wrapped description.
    ///
    /// A row that does not fit moves to a new page. A row taller than a whole page is split
    /// between pages instead, repeating the bordered cells on each; the other columns' text is
    /// written in the first part only.
    fn table_row(&mut self, cells: [String; 4]) -> RenderResult<()> {
        let mut prepared: [String; 4] = Default::default();
        for (slot, (text, field)) in prepared.iter_mut().zip(cells.iter().zip([
            "identifier",
            "description",
            "serial number",
            "value",
        ])) {
            *slot = self.prepare(text, field)?;
        }

        self.set_font(Font::Helvetica, TABLE_FONT_SIZE);
        let description_width = COLUMNS[DESCRIPTION_COLUMN].width - 2.0 * CELL_PADDING;
        let description = &prepared[DESCRIPTION_COLUMN];
        let lines = wrap_text(description, self.font, self.size, description_width);
        let estimate = estimate_line_count(
            self.font.text_width(description, self.size),
            description_width,
        );
        let line_count = estimate.max(lines.len());

        if !self.at_table_start
            && !self.fits(ROW_LINE_HEIGHT * line_count as f32)
            && line_count <= fresh_page_lines()
        {
            self.continue_table()?;
        }

        let mut segments = Vec::new();
        let mut drawn = 0;
        while drawn < line_count {
            let available = lines_between(self.y, PAGE_HEIGHT - BOTTOM_MARGIN);
            if available == 0 {
                self.continue_table()?;
                continue;
            }
            let take = available.min(line_count - drawn);
            let part: Vec<&str> = lines
                .iter()
                .skip(drawn)
                .take(take)
                .map(String::as_str)
                .collect();
            segments.push(self.row_segment(&prepared, &part, take, drawn == 0));
            drawn += take;
        }
        if segments.len() > 1 {
            tracing::debug!(lines = line_count, pages = segments.len(), "row split across pages");
        }

        self.rows.push(RowGeometry {
            line_count,
            cells: prepared,
            segments,
        });
        Ok(())
    }

    /// Draws `line_count` lines of a row at the cursor: four bordered cells of equal height.
    fn row_segment(
        &mut self,
        cells: &[String; 4],
        description_lines: &[&str],
        line_count: usize,
        with_cells: bool,
    ) -> RowSegment {
        let top = self.y;
        let height = ROW_LINE_HEIGHT * line_count as f32;
        for (index, column) in COLUMNS.iter().enumerate() {
            self.push(Element::Rect(Rect {
                x: self.x,
                y: top,
                width: column.width,
                height,
            }));
            if index == DESCRIPTION_COLUMN {
                for (n, line) in description_lines.iter().enumerate() {
                    if line.is_empty() {
                        continue;
                    }
                    let line_top = top + ROW_LINE_HEIGHT * n as f32;
                    self.text_line(column.width, line_top, ROW_LINE_HEIGHT, line, column.align);
                }
            } else if with_cells && !cells[index].is_empty() {
                self.text_line(column.width, top, height, &cells[index], column.align);
            }
            self.x += column.width;
        }

        self.at_table_start = false;
        let segment = RowSegment {
            page: self.pages.len() - 1,
            y: top,
            height,
        };
        self.ln(height);
        segment
    }

    /// Writes wrapped full-width text, breaking pages line by line.
    fn body_text(&mut self, text: &str) -> RenderResult<()> {
        self.set_font(Font::Helvetica, BODY_FONT_SIZE);
        let lines = wrap_text(
            text,
            self.font,
            self.size,
            TEXT_WIDTH - 2.0 * CELL_PADDING,
        );
        for line in lines {
            if !self.fits(BODY_LINE_HEIGHT) {
                self.add_page()?;
                self.set_font(Font::Helvetica, BODY_FONT_SIZE);
            }
            self.cell(TEXT_WIDTH, BODY_LINE_HEIGHT, &line, false, Align::Left);
            self.ln(BODY_LINE_HEIGHT);
        }
        Ok(())
    }

    fn finish(self, approval_text: String) -> Document {
        Document {
            pages: self.pages,
            rows: self.rows,
            approval_text,
        }
    }
}

/// Lays out a complete guide: header, table, approval text.
///
/// # Errors
///
/// Returns `RenderError::UnsupportedCharacter` if any text contains a character the policy
/// does not allow.
pub fn layout_guide(content: &GuideContent, policy: UnmappedPolicy) -> RenderResult<Document> {
    let mut builder = DocumentBuilder::new(policy);
    builder.add_page()?;
    builder.table_header()?;
    for row in &content.rows {
        builder.table_row(row.cells())?;
    }

    let approval = builder.prepare(&approval_text(&content.fields), "approval text")?;
    builder.ln(BODY_SPACING);
    // Leading blank line before the first paragraph.
    builder.body_text(&format!("\n{approval}"))?;
    Ok(builder.finish(approval))
}
