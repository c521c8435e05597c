//! # Export Projection
//!
//! Turns a quotation and its computed prices into a paginated page layout.
//! Rendering the layout to PDF bytes is done by `prequote-pdf`; everything
//! about *where* text goes and *what* it says is decided here, purely.
//!
//! ## Document Structure
//! ```text
//! ┌──────────────────────────── A4 210 × 297 mm ────────────────────────────┐
//! │                         Lomartex, Lda            (title block)          │
//! │                          Pré-Cotação                                    │
//! │            Código: PC2503003  Referência: …  Data: 14/03/2025           │
//! │  ┌────────┐                                                             │
//! │  │ image  │  40 × 40, optional. Without it the client block moves up    │
//! │  └────────┘                                                             │
//! │  Informação do Cliente                                                  │
//! │  Nome        Acme                                                       │
//! │  …                                                                      │
//! │  Lista de Materiais     ┌ description │ supplier │ price │ cons │ total ┐│
//! │  Preços por Quantidade  ┌ quantity │ price/unit │ margin │ w/ margin   ┐│
//! │  Custos Extra (MOQ)     ┌ one row per visible MOQ development × margin ┐│
//! │  legal footer (4 lines)                                                 │
//! │  Gerado em 14/03/2025                                     Página 1/2    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//! Identical input produces an identical layout. The generation date is an
//! explicit option, never read from the clock. Tables that overflow a page
//! continue on the next one with their header row repeated.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{CoreError, CoreResult};
use crate::i18n::{pack, LanguagePack};
use crate::money::{format_percent, format_quantity, Money};
use crate::pricing::{line_total, margin_multiplier, price_quotation, PriceBreakdown};
use crate::types::{Language, Quotation};
use crate::validation::decode_image;

// =============================================================================
// Geometry
// =============================================================================

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 14.0;

const CONTENT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
const TOP_MM: f32 = 20.0;
const CONTENT_BOTTOM_MM: f32 = PAGE_HEIGHT_MM - 20.0;
const PAGE_FOOTER_Y_MM: f32 = PAGE_HEIGHT_MM - 10.0;

const TITLE_BLOCK_END_MM: f32 = 50.0;
const IMAGE_SIZE_MM: f32 = 40.0;
const SECTION_GAP_MM: f32 = 10.0;
const KEY_VALUE_STEP_MM: f32 = 7.0;
const VALUE_X_MM: f32 = 45.0;

const TABLE_FONT_PT: f32 = 10.0;
const TABLE_LINE_MM: f32 = 4.5;
const CELL_PADDING_MM: f32 = 2.0;
const HEADING_PT: f32 = 12.0;
const HEADING_HEIGHT_MM: f32 = 8.0;

const PT_TO_MM: f32 = 0.352_778;
/// Average Helvetica glyph advance, in em.
const AVG_GLYPH_EM: f32 = 0.5;

const DATE_FORMAT: &str = "%d/%m/%Y";

// =============================================================================
// Layout Types
// =============================================================================

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const HEADER: Rgb = Rgb(41, 128, 185);
    pub const STRIPE: Rgb = Rgb(245, 245, 245);
}

/// A single line of text. `y_mm` is the baseline, measured from the top edge.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x_mm: f32,
    pub y_mm: f32,
    pub size_pt: f32,
    pub bold: bool,
    pub color: Rgb,
    pub content: String,
}

/// An embedded picture. `y_mm` is its top edge.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlock {
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
    pub data: Vec<u8>,
}

/// A filled rectangle (table header and stripes). `y_mm` is its top edge.
#[derive(Debug, Clone, PartialEq)]
pub struct FilledRect {
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
    pub fill: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Rect(FilledRect),
    Image(ImageBlock),
    Text(TextRun),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub elements: Vec<Element>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text(t) => Some(t),
            _ => None,
        })
    }
}

/// The projected document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    /// Document title metadata.
    pub title: String,

    /// `<prefix>-<label>-<code>.pdf`
    pub file_name: String,

    pub language: Language,
    pub pages: Vec<Page>,
}

// =============================================================================
// Options
// =============================================================================

/// Organisation details and per-invocation choices for an export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Printed as the document title.
    pub company_name: String,

    /// First segment of the download file name.
    pub file_prefix: String,

    /// Address on the last legal footer line.
    pub contact_email: String,

    /// Date printed in the page footers.
    pub generated_on: NaiveDate,

    /// Overrides the quotation's stored language.
    pub language: Option<Language>,
}

impl ExportOptions {
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use prequote_core::export::ExportOptions;
    /// use prequote_core::Language;
    ///
    /// let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
    /// let options = ExportOptions::new("Lomartex, Lda", "Lomartex", "info@lomartex.pt", today)
    ///     .language(Some(Language::En));
    /// assert_eq!(options.language, Some(Language::En));
    /// ```
    pub fn new(
        company_name: impl Into<String>,
        file_prefix: impl Into<String>,
        contact_email: impl Into<String>,
        generated_on: NaiveDate,
    ) -> Self {
        ExportOptions {
            company_name: company_name.into(),
            file_prefix: file_prefix.into(),
            contact_email: contact_email.into(),
            generated_on,
            language: None,
        }
    }

    pub fn language(mut self, language: Option<Language>) -> Self {
        self.language = language;
        self
    }
}

/// Download file name for a quotation in a language.
pub fn file_name(options: &ExportOptions, language: Language, code: &str) -> String {
    format!("{}-{}-{}.pdf", options.file_prefix, pack(language).file_label, code)
}

// =============================================================================
// Projection
// =============================================================================

/// Projects a quotation into a page layout.
///
/// ## Returns
/// * `Ok(DocumentLayout)` - ready to render
/// * `Err(CoreError::Validation)` - a quantity tier is 0
/// * `Err(CoreError::InvalidImage)` - the article image is not decodable
/// * `Err(CoreError::PriceOutOfRange)` - a price or MOQ total overflows
pub fn project(quotation: &Quotation, options: &ExportOptions) -> CoreResult<DocumentLayout> {
    let language = options.language.unwrap_or(quotation.language);
    let t = pack(language);
    let prices = price_quotation(quotation)?;
    let image = quotation
        .article_image
        .as_deref()
        .map(decode_image)
        .transpose()?;

    let mut w = Writer::new();

    title_block(&mut w, quotation, options, t);

    w.y = match image {
        Some(data) => {
            w.push(Element::Image(ImageBlock {
                x_mm: MARGIN_MM,
                y_mm: TITLE_BLOCK_END_MM,
                width_mm: IMAGE_SIZE_MM,
                height_mm: IMAGE_SIZE_MM,
                data,
            }));
            TITLE_BLOCK_END_MM + IMAGE_SIZE_MM + SECTION_GAP_MM
        }
        None => TITLE_BLOCK_END_MM + SECTION_GAP_MM / 2.0,
    };

    client_block(&mut w, quotation, t);
    materials_table(&mut w, quotation, &prices, t);
    pricing_table(&mut w, &prices, t);
    extra_costs_table(&mut w, quotation, t)?;
    legal_footer(&mut w, options, t);

    let mut pages = w.finish();
    page_footers(&mut pages, options, t);

    Ok(DocumentLayout {
        title: format!("{} {}", t.pre_quotation, quotation.code),
        file_name: file_name(options, language, &quotation.code),
        language,
        pages,
    })
}

fn title_block(w: &mut Writer, q: &Quotation, options: &ExportOptions, t: &LanguagePack) {
    w.centered(20.0, 20.0, true, &options.company_name);
    w.centered(30.0, 16.0, true, t.pre_quotation);
    let line = format!(
        "{}: {}   {}: {}   {}: {}",
        t.code,
        q.code,
        t.reference,
        q.reference,
        t.date,
        q.date.format(DATE_FORMAT)
    );
    w.centered(40.0, 11.0, false, &line);
}

fn client_block(w: &mut Writer, q: &Quotation, t: &LanguagePack) {
    let c = &q.client;
    let fields = [
        (t.name, Some(c.name.as_str())),
        (t.brand, c.brand.as_deref()),
        (t.email, c.email.as_deref()),
        (t.our_ref, c.our_ref.as_deref()),
        (t.client_ref, c.client_ref.as_deref()),
        (t.sample_size, c.sample_size.as_deref()),
        (t.description, c.description.as_deref()),
    ];

    w.heading(t.client_info);
    for (label, value) in fields {
        let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
            continue;
        };
        let lines = wrap(value, PAGE_WIDTH_MM - MARGIN_MM - VALUE_X_MM, TABLE_FONT_PT);
        w.ensure(lines.len() as f32 * KEY_VALUE_STEP_MM);
        w.text(MARGIN_MM, w.y + 4.0, TABLE_FONT_PT, true, Rgb::BLACK, label);
        for line in lines {
            w.text(VALUE_X_MM, w.y + 4.0, TABLE_FONT_PT, false, Rgb::BLACK, &line);
            w.y += KEY_VALUE_STEP_MM;
        }
    }
    w.y += SECTION_GAP_MM / 2.0;
}

fn materials_table(w: &mut Writer, q: &Quotation, prices: &PriceBreakdown, t: &LanguagePack) {
    let columns = [
        Column::left(t.description, 56.0),
        Column::left(t.supplier, 34.0),
        Column::right(t.unit_price, 30.0),
        Column::right(t.consumption, 28.0),
        Column::right(t.line_total, 34.0),
    ];
    let mut rows: Vec<Row> = q
        .items
        .components
        .iter()
        .map(|c| {
            Row::plain(vec![
                c.description.clone(),
                c.supplier.clone(),
                Money::new(c.unit_price).to_string(),
                format_quantity(c.consumption),
                Money::new(line_total(c)).to_string(),
            ])
        })
        .collect();
    if !rows.is_empty() {
        rows.push(Row::bold(vec![
            String::new(),
            String::new(),
            String::new(),
            t.line_total.to_string(),
            prices.materials_total.to_string(),
        ]));
    }
    table(w, t.materials_list, &columns, &rows);
}

fn pricing_table(w: &mut Writer, prices: &PriceBreakdown, t: &LanguagePack) {
    let columns = [
        Column::right(t.quantity, 40.0),
        Column::right(t.price_per_unit, 50.0),
        Column::right(t.margin, 32.0),
        Column::right(t.total_with_margin, 60.0),
    ];
    let rows: Vec<Row> = prices
        .tiers
        .iter()
        .map(|tier| {
            Row::plain(vec![
                tier.quantity.to_string(),
                tier.unit_price_with_margin.to_string(),
                format_percent(tier.margin),
                tier.total_with_margin.to_string(),
            ])
        })
        .collect();
    table(w, t.prices_by_quantity, &columns, &rows);
}

fn extra_costs_table(w: &mut Writer, q: &Quotation, t: &LanguagePack) -> CoreResult<()> {
    let columns = [
        Column::left(t.description, 62.0),
        Column::right(t.moq_quantity, 28.0),
        Column::right(t.cost, 32.0),
        Column::right(t.margin, 24.0),
        Column::right(t.total_with_margin, 36.0),
    ];
    let mut rows = Vec::new();
    for d in q.items.developments.iter().filter(|d| d.show_in_pdf && d.moq_quantity > 0) {
        let out_of_range = || CoreError::PriceOutOfRange {
            quantity: d.moq_quantity,
        };
        let cost = d
            .cost
            .checked_mul(Decimal::from(d.moq_quantity))
            .ok_or_else(out_of_range)?;
        for &margin in &q.margins {
            let total = cost
                .checked_mul(margin_multiplier(margin))
                .ok_or_else(out_of_range)?;
            rows.push(Row::plain(vec![
                d.description.clone(),
                d.moq_quantity.to_string(),
                Money::new(cost).to_string(),
                format_percent(margin),
                Money::new(total).to_string(),
            ]));
        }
    }
    if !rows.is_empty() {
        table(w, t.extra_costs, &columns, &rows);
    }
    Ok(())
}

fn legal_footer(w: &mut Writer, options: &ExportOptions, t: &LanguagePack) {
    const STEP: f32 = 5.0;
    let lines = t.footer(&options.contact_email);
    w.ensure(lines.len() as f32 * STEP);
    for line in lines {
        w.text(MARGIN_MM, w.y + 4.0, 9.0, false, Rgb::BLACK, &line);
        w.y += STEP;
    }
}

fn page_footers(pages: &mut [Page], options: &ExportOptions, t: &LanguagePack) {
    let total = pages.len();
    let generated = format!("{} {}", t.generated_on, options.generated_on.format(DATE_FORMAT));
    for (i, page) in pages.iter_mut().enumerate() {
        let numbering = format!("{} {}/{}", t.page, i + 1, total);
        page.elements.push(Element::Text(TextRun {
            x_mm: MARGIN_MM,
            y_mm: PAGE_FOOTER_Y_MM,
            size_pt: 8.0,
            bold: false,
            color: Rgb::BLACK,
            content: generated.clone(),
        }));
        page.elements.push(Element::Text(TextRun {
            x_mm: PAGE_WIDTH_MM - MARGIN_MM - text_width_mm(&numbering, 8.0),
            y_mm: PAGE_FOOTER_Y_MM,
            size_pt: 8.0,
            bold: false,
            color: Rgb::BLACK,
            content: numbering,
        }));
    }
}

// =============================================================================
// Tables
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

struct Column<'a> {
    header: &'a str,
    width_mm: f32,
    align: Align,
}

impl<'a> Column<'a> {
    fn left(header: &'a str, width_mm: f32) -> Self {
        Column { header, width_mm, align: Align::Left }
    }

    fn right(header: &'a str, width_mm: f32) -> Self {
        Column { header, width_mm, align: Align::Right }
    }
}

struct Row {
    cells: Vec<String>,
    bold: bool,
}

impl Row {
    fn plain(cells: Vec<String>) -> Self {
        Row { cells, bold: false }
    }

    fn bold(cells: Vec<String>) -> Self {
        Row { cells, bold: true }
    }
}

fn row_height(lines: usize) -> f32 {
    lines.max(1) as f32 * TABLE_LINE_MM + 2.0 * CELL_PADDING_MM
}

fn wrapped_cells(columns: &[Column<'_>], cells: &[String]) -> Vec<Vec<String>> {
    columns
        .iter()
        .zip(cells)
        .map(|(col, cell)| wrap(cell, col.width_mm - 2.0 * CELL_PADDING_MM, TABLE_FONT_PT))
        .collect()
}

fn table(w: &mut Writer, heading: &str, columns: &[Column<'_>], rows: &[Row]) {
    let headers: Vec<String> = columns.iter().map(|c| c.header.to_string()).collect();
    let header_cells = wrapped_cells(columns, &headers);
    let header_h = row_height(header_cells.iter().map(Vec::len).max().unwrap_or(1));
    let first_row_h = rows
        .first()
        .map(|r| row_height(wrapped_cells(columns, &r.cells).iter().map(Vec::len).max().unwrap_or(1)))
        .unwrap_or(0.0);

    w.ensure(HEADING_HEIGHT_MM + header_h + first_row_h);
    w.heading(heading);
    draw_row(w, columns, &header_cells, header_h, Some(Rgb::HEADER), Rgb::WHITE, true);

    for (i, row) in rows.iter().enumerate() {
        let cells = wrapped_cells(columns, &row.cells);
        let h = row_height(cells.iter().map(Vec::len).max().unwrap_or(1));
        if w.ensure(h) {
            draw_row(w, columns, &header_cells, header_h, Some(Rgb::HEADER), Rgb::WHITE, true);
        }
        let stripe = (i % 2 == 1).then_some(Rgb::STRIPE);
        draw_row(w, columns, &cells, h, stripe, Rgb::BLACK, row.bold);
    }
    w.y += SECTION_GAP_MM;
}

fn draw_row(
    w: &mut Writer,
    columns: &[Column<'_>],
    cells: &[Vec<String>],
    height: f32,
    fill: Option<Rgb>,
    color: Rgb,
    bold: bool,
) {
    if let Some(fill) = fill {
        w.push(Element::Rect(FilledRect {
            x_mm: MARGIN_MM,
            y_mm: w.y,
            width_mm: CONTENT_WIDTH_MM,
            height_mm: height,
            fill,
        }));
    }

    let mut x = MARGIN_MM;
    for (col, lines) in columns.iter().zip(cells) {
        for (n, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let text_x = match col.align {
                Align::Left => x + CELL_PADDING_MM,
                Align::Right => {
                    x + col.width_mm - CELL_PADDING_MM - text_width_mm(line, TABLE_FONT_PT)
                }
            };
            let baseline = w.y + CELL_PADDING_MM + (n as f32 + 1.0) * TABLE_LINE_MM - 1.0;
            w.text(text_x, baseline, TABLE_FONT_PT, bold, color, line);
        }
        x += col.width_mm;
    }
    w.y += height;
}

// =============================================================================
// Text Measurement
// =============================================================================

/// Approximate rendered width of `text` at `size_pt`.
pub fn text_width_mm(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * AVG_GLYPH_EM * PT_TO_MM
}

/// Greedy word wrap to `width_mm`; words longer than a line are split.
fn wrap(text: &str, width_mm: f32, size_pt: f32) -> Vec<String> {
    let glyph = size_pt * AVG_GLYPH_EM * PT_TO_MM;
    let max_chars = ((width_mm / glyph).floor() as usize).max(1);

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

// =============================================================================
// Writer
// =============================================================================

/// Page-aware cursor. `y` is the top of the next free band on the current page.
struct Writer {
    done: Vec<Page>,
    current: Page,
    y: f32,
}

impl Writer {
    fn new() -> Self {
        Writer {
            done: Vec::new(),
            current: Page::default(),
            y: TOP_MM,
        }
    }

    fn push(&mut self, element: Element) {
        self.current.elements.push(element);
    }

    fn text(&mut self, x_mm: f32, y_mm: f32, size_pt: f32, bold: bool, color: Rgb, content: &str) {
        self.push(Element::Text(TextRun {
            x_mm,
            y_mm,
            size_pt,
            bold,
            color,
            content: content.to_string(),
        }));
    }

    fn centered(&mut self, y_mm: f32, size_pt: f32, bold: bool, content: &str) {
        let x = (PAGE_WIDTH_MM - text_width_mm(content, size_pt)) / 2.0;
        self.text(x.max(MARGIN_MM), y_mm, size_pt, bold, Rgb::BLACK, content);
    }

    fn heading(&mut self, content: &str) {
        self.ensure(HEADING_HEIGHT_MM);
        self.text(MARGIN_MM, self.y + 5.0, HEADING_PT, true, Rgb::BLACK, content);
        self.y += HEADING_HEIGHT_MM;
    }

    /// Starts a new page unless `height` still fits. Returns whether it did.
    fn ensure(&mut self, height: f32) -> bool {
        if self.y + height <= CONTENT_BOTTOM_MM || self.current.elements.is_empty() {
            return false;
        }
        self.done.push(std::mem::take(&mut self.current));
        self.y = TOP_MM;
        true
    }

    fn finish(mut self) -> Vec<Page> {
        self.done.push(self.current);
        self.done
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClientDetails, Component, Development};
    use crate::LineItems;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_quotation() -> Quotation {
        let mut items = LineItems::new();
        items.add_component(Component::new("Fabric", "Tecidos SA", dec("2.5"), dec("4")));
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap();
        Quotation {
            id: "q-1".to_string(),
            code: "PC2503003".to_string(),
            reference: "250314003".to_string(),
            date: date(2025, 3, 14),
            client_id: None,
            client: ClientDetails {
                name: "Acme".to_string(),
                brand: Some("Acme Kids".to_string()),
                ..ClientDetails::default()
            },
            article_image: None,
            items,
            quantities: [100, 250, 500],
            margins: [dec("30"), dec("25"), dec("20")],
            language: Language::Pt,
            created_at: now,
            updated_at: now,
        }
    }

    fn options() -> ExportOptions {
        ExportOptions::new("Lomartex, Lda", "Lomartex", "info@lomartex.pt", date(2025, 3, 15))
    }

    fn all_texts(layout: &DocumentLayout) -> Vec<&TextRun> {
        layout.pages.iter().flat_map(Page::texts).collect()
    }

    fn find<'a>(layout: &'a DocumentLayout, content: &str) -> Option<&'a TextRun> {
        all_texts(layout).into_iter().find(|t| t.content == content)
    }

    /// Cells of the table row below `heading` whose first cell is `first`,
    /// left to right.
    fn row_after(layout: &DocumentLayout, heading: &str, first: &str) -> Vec<String> {
        for page in &layout.pages {
            let Some(top) = page.texts().find(|t| t.content == heading).map(|t| t.y_mm) else {
                continue;
            };
            let Some(y) = page
                .texts()
                .find(|t| t.content == first && t.y_mm > top)
                .map(|t| t.y_mm)
            else {
                continue;
            };
            let mut cells: Vec<&TextRun> =
                page.texts().filter(|t| (t.y_mm - y).abs() < 0.01).collect();
            cells.sort_by(|a, b| a.x_mm.total_cmp(&b.x_mm));
            return cells.into_iter().map(|t| t.content.clone()).collect();
        }
        Vec::new()
    }

    /// A valid 1×1 PNG.
    const PIXEL_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn test_projection_is_idempotent() {
        let q = sample_quotation();
        assert_eq!(project(&q, &options()).unwrap(), project(&q, &options()).unwrap());
    }

    #[test]
    fn test_file_name_embeds_code() {
        let layout = project(&sample_quotation(), &options()).unwrap();
        assert_eq!(layout.file_name, "Lomartex-Pre-Cotacao-PC2503003.pdf");

        let en = project(&sample_quotation(), &options().language(Some(Language::En))).unwrap();
        assert_eq!(en.file_name, "Lomartex-Pre-Quotation-PC2503003.pdf");
    }

    #[test]
    fn test_sections_in_order() {
        let layout = project(&sample_quotation(), &options()).unwrap();
        let order: Vec<f32> = [
            "Lomartex, Lda",
            "Pré-Cotação",
            "Informação do Cliente",
            "Lista de Materiais",
            "Preços por Quantidade",
        ]
        .iter()
        .map(|h| find(&layout, h).unwrap().y_mm)
        .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_image_block_shifts_client_section() {
        let without = project(&sample_quotation(), &options()).unwrap();
        let mut q = sample_quotation();
        q.article_image = Some(format!("data:image/png;base64,{PIXEL_PNG}"));
        let with = project(&q, &options()).unwrap();

        let image = with.pages[0]
            .elements
            .iter()
            .find_map(|e| match e {
                Element::Image(img) => Some(img.clone()),
                _ => None,
            })
            .unwrap();
        assert!(image.data.starts_with(b"\x89PNG"));

        let heading_without = find(&without, "Informação do Cliente").unwrap().y_mm;
        let heading_with = find(&with, "Informação do Cliente").unwrap().y_mm;
        assert!(heading_with > image.y_mm + image.height_mm);
        assert!(heading_without < image.y_mm + image.height_mm);
        assert!(!without.pages[0]
            .elements
            .iter()
            .any(|e| matches!(e, Element::Image(_))));
    }

    #[test]
    fn test_invalid_image_is_rejected() {
        let mut q = sample_quotation();
        q.article_image = Some("not base64 at all!".to_string());
        assert!(project(&q, &options()).is_err());
    }

    #[test]
    fn test_pricing_rows_follow_column_headings() {
        let layout = project(&sample_quotation(), &options().language(Some(Language::En))).unwrap();
        let heading = "Prices by Quantity";

        assert_eq!(
            row_after(&layout, heading, "Quantity"),
            ["Quantity", "Price per Unit", "Margin", "Total w/ Margin"]
        );
        assert_eq!(row_after(&layout, heading, "100"), ["100", "€13.00", "30%", "€1300.00"]);
        assert_eq!(row_after(&layout, heading, "250"), ["250", "€12.50", "25%", "€3125.00"]);
        assert_eq!(row_after(&layout, heading, "500"), ["500", "€12.00", "20%", "€6000.00"]);
    }

    #[test]
    fn test_pricing_table_hides_cost_before_margin() {
        let mut q = sample_quotation();
        q.margins = [dec("50"), dec("50"), dec("50")];
        let layout = project(&q, &options().language(Some(Language::En))).unwrap();
        let row = row_after(&layout, "Prices by Quantity", "100");
        assert_eq!(row, ["100", "€15.00", "50%", "€1500.00"]);
        assert!(!row.contains(&"€10.00".to_string()));
    }

    #[test]
    fn test_overflowing_moq_total_is_an_error() {
        let mut q = sample_quotation();
        let mut dev = Development::new("Tooling", Decimal::MAX);
        dev.moq_quantity = 2;
        q.items.developments = vec![dev];
        assert!(matches!(
            project(&q, &options()),
            Err(CoreError::PriceOutOfRange { quantity: 2 })
        ));
    }

    #[test]
    fn test_extra_costs_only_visible_moq_developments() {
        let mut q = sample_quotation();
        let mut visible = Development::new("MOQ - Fabric", dec("2"));
        visible.moq_quantity = 500;
        let mut hidden = Development::new("Hidden", dec("3"));
        hidden.moq_quantity = 100;
        hidden.show_in_pdf = false;
        let unset = Development::new("No MOQ quantity", dec("4"));
        q.items.developments = vec![visible, hidden, unset];

        let layout = project(&q, &options()).unwrap();
        let texts = all_texts(&layout);

        assert!(find(&layout, "Custos Extra (MOQ)").is_some());
        assert_eq!(texts.iter().filter(|t| t.content == "MOQ - Fabric").count(), 3);
        assert!(find(&layout, "Hidden").is_none());
        assert!(find(&layout, "No MOQ quantity").is_none());
        // 2 × 500 = 1000, then × 1.30 / 1.25 / 1.20
        assert!(find(&layout, "€1000.00").is_some());
        for total in ["€1300.00", "€1250.00", "€1200.00"] {
            assert!(find(&layout, total).is_some(), "missing {total}");
        }
    }

    #[test]
    fn test_no_extra_costs_section_without_rows() {
        let layout = project(&sample_quotation(), &options()).unwrap();
        assert!(find(&layout, "Custos Extra (MOQ)").is_none());
    }

    #[test]
    fn test_long_tables_paginate_with_repeated_header() {
        let mut q = sample_quotation();
        for i in 0..80 {
            q.items
                .add_component(Component::new(format!("Part {i}"), "Supplier", dec("1"), dec("1")));
        }
        let layout = project(&q, &options()).unwrap();

        assert!(layout.pages.len() > 1);
        for page in &layout.pages[1..] {
            let first = page.texts().next().unwrap();
            assert_eq!(first.content, "Descrição");
        }
        let total = layout.pages.len();
        assert!(find(&layout, &format!("Página {total}/{total}")).is_some());
        for page in &layout.pages {
            assert!(page.texts().any(|t| t.content == "Gerado em 15/03/2025"));
            assert!(page.texts().all(|t| t.y_mm <= PAGE_HEIGHT_MM));
        }
    }

    #[test]
    fn test_language_override_and_footer() {
        let layout = project(&sample_quotation(), &options().language(Some(Language::Fr))).unwrap();
        assert_eq!(layout.language, Language::Fr);
        assert!(find(&layout, "Pré-Devis").is_some());
        assert!(find(&layout, "Prix hors TVA").is_some());
        assert!(all_texts(&layout)
            .iter()
            .any(|t| t.content.ends_with("info@lomartex.pt")));
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        let mut q = sample_quotation();
        q.quantities[2] = 0;
        assert!(project(&q, &options()).is_err());
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("", 50.0, 10.0), vec![String::new()]);
        let lines = wrap("a b c d e f g h i j k l m n o p q r s t u v w x y z", 20.0, 10.0);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| text_width_mm(l, 10.0) <= 20.0));
        let long = wrap(&"x".repeat(100), 20.0, 10.0);
        assert!(long.iter().all(|l| l.chars().count() <= 22));
    }
}
