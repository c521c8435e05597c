//! # prequote-pdf: PDF Encoding of Export Layouts
//!
//! Writes an already projected [`DocumentLayout`] as a PDF. Nothing here
//! decides positions or wording; it only maps layout elements onto
//! `printpdf` calls.
//!
//! ## Coordinate Systems
//! ```text
//!   layout (mm, origin top-left)          PDF (mm, origin bottom-left)
//!   ┌──────────────────────┐              ┌──────────────────────┐
//!   │ (0,0)                │              │                      │
//!   │     y_mm ↓           │     ──►      │     y = 297 - y_mm ↑ │
//!   │                      │              │ (0,0)                │
//!   └──────────────────────┘              └──────────────────────┘
//! ```
//! Text positions are baselines; rectangles and images are placed by their
//! top edge in the layout and by their bottom edge in PDF space.
//!
//! ## Fonts
//! Built-in Helvetica / Helvetica-Bold by default. Supplying TTF files via
//! [`FontSet::from_files`] embeds them instead, which is needed for full
//! coverage of accented characters.

use std::fs::File;
use std::path::{Path, PathBuf};

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Rect,
};
use prequote_core::export::{
    DocumentLayout, Element, FilledRect, ImageBlock, Rgb, TextRun, PAGE_HEIGHT_MM, PAGE_WIDTH_MM,
};
use thiserror::Error;
use tracing::{debug, info};

/// Resolution used to size embedded images before scaling.
const IMAGE_DPI: f32 = 300.0;
const MM_PER_INCH: f32 = 25.4;
const LAYER_NAME: &str = "Content";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum PdfError {
    /// A configured font file could not be read or parsed.
    #[error("Failed to load font {path}: {reason}")]
    Font { path: String, reason: String },

    /// The article image is not a decodable picture.
    #[error("Failed to embed image: {0}")]
    Image(String),

    /// The document could not be serialized.
    #[error("Failed to write document: {0}")]
    Write(String),
}

pub type PdfResult<T> = Result<T, PdfError>;

// =============================================================================
// Fonts
// =============================================================================

/// Regular and bold font sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontSet {
    regular: Option<PathBuf>,
    bold: Option<PathBuf>,
}

impl FontSet {
    /// Built-in Helvetica and Helvetica-Bold.
    pub fn builtin() -> Self {
        FontSet::default()
    }

    /// TTF files; either may be omitted to fall back to the built-in face.
    pub fn from_files(regular: Option<PathBuf>, bold: Option<PathBuf>) -> Self {
        FontSet { regular, bold }
    }

    fn load(&self, doc: &PdfDocumentReference) -> PdfResult<(IndirectFontRef, IndirectFontRef)> {
        let regular = load_font(doc, self.regular.as_deref(), BuiltinFont::Helvetica)?;
        let bold = load_font(doc, self.bold.as_deref(), BuiltinFont::HelveticaBold)?;
        Ok((regular, bold))
    }
}

fn load_font(
    doc: &PdfDocumentReference,
    path: Option<&Path>,
    fallback: BuiltinFont,
) -> PdfResult<IndirectFontRef> {
    match path {
        Some(path) => {
            let font_error = |reason: String| PdfError::Font {
                path: path.display().to_string(),
                reason,
            };
            let file = File::open(path).map_err(|e| font_error(e.to_string()))?;
            doc.add_external_font(file)
                .map_err(|e| font_error(e.to_string()))
        }
        None => doc.add_builtin_font(fallback).map_err(|e| PdfError::Font {
            path: format!("{:?}", fallback),
            reason: e.to_string(),
        }),
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Renders a projected layout as PDF bytes.
///
/// ## Returns
/// * `Ok(Vec<u8>)` - The PDF file content
/// * `Err(PdfError)` - A font or the image could not be loaded
///
/// ## Example
/// ```rust,ignore
/// let layout = prequote_core::export::project(&quotation, &options)?;
/// let bytes = prequote_pdf::render(&layout, &FontSet::builtin())?;
/// std::fs::write(&layout.file_name, bytes)?;
/// ```
pub fn render(layout: &DocumentLayout, fonts: &FontSet) -> PdfResult<Vec<u8>> {
    debug!(
        file = %layout.file_name,
        pages = layout.pages.len(),
        "Rendering PDF"
    );

    let (doc, first_page, first_layer) = PdfDocument::new(
        &layout.title,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        LAYER_NAME,
    );
    let (regular, bold) = fonts.load(&doc)?;

    for (index, page) in layout.pages.iter().enumerate() {
        let (page_ref, layer_ref) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME)
        };
        let layer = doc.get_page(page_ref).get_layer(layer_ref);

        for element in &page.elements {
            match element {
                Element::Rect(rect) => draw_rect(&layer, rect),
                Element::Image(image) => draw_image(&layer, image)?,
                Element::Text(text) => {
                    let font = if text.bold { &bold } else { &regular };
                    draw_text(&layer, text, font);
                }
            }
        }
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| PdfError::Write(e.to_string()))?;

    info!(
        file = %layout.file_name,
        pages = layout.pages.len(),
        bytes = bytes.len(),
        "PDF rendered"
    );
    Ok(bytes)
}

fn color(rgb: Rgb) -> Color {
    let Rgb(r, g, b) = rgb;
    Color::Rgb(printpdf::Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

fn draw_rect(layer: &PdfLayerReference, rect: &FilledRect) {
    let bottom = PAGE_HEIGHT_MM - rect.y_mm - rect.height_mm;
    layer.set_fill_color(color(rect.fill));
    layer.add_rect(
        Rect::new(
            Mm(rect.x_mm),
            Mm(bottom),
            Mm(rect.x_mm + rect.width_mm),
            Mm(bottom + rect.height_mm),
        )
        .with_mode(PaintMode::Fill),
    );
}

fn draw_text(layer: &PdfLayerReference, text: &TextRun, font: &IndirectFontRef) {
    layer.set_fill_color(color(text.color));
    layer.use_text(
        text.content.as_str(),
        text.size_pt,
        Mm(text.x_mm),
        Mm(PAGE_HEIGHT_MM - text.y_mm),
        font,
    );
}

fn draw_image(layer: &PdfLayerReference, block: &ImageBlock) -> PdfResult<()> {
    let decoded = printpdf::image_crate::load_from_memory(&block.data)
        .map_err(|e| PdfError::Image(e.to_string()))?;
    let image = Image::from_dynamic_image(&decoded);

    let natural_w = image.image.width.0 as f32 / IMAGE_DPI * MM_PER_INCH;
    let natural_h = image.image.height.0 as f32 / IMAGE_DPI * MM_PER_INCH;
    if natural_w <= 0.0 || natural_h <= 0.0 {
        return Err(PdfError::Image("image has no pixels".to_string()));
    }

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(block.x_mm)),
            translate_y: Some(Mm(PAGE_HEIGHT_MM - block.y_mm - block.height_mm)),
            scale_x: Some(block.width_mm / natural_w),
            scale_y: Some(block.height_mm / natural_h),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        },
    );
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use prequote_core::export::{project, ExportOptions, Page};
    use prequote_core::{ClientDetails, Component, Language, LineItems, Quotation};
    use rust_decimal::Decimal;

    /// A valid 1×1 PNG.
    const PIXEL_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    fn quotation() -> Quotation {
        let mut items = LineItems::new();
        items.add_component(Component::new(
            "Fabric",
            "Tecidos SA",
            Decimal::new(25, 1),
            Decimal::from(4),
        ));
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap();
        Quotation {
            id: "q-1".to_string(),
            code: "PC2503001".to_string(),
            reference: "250314001".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            client_id: None,
            client: ClientDetails {
                name: "Acme".to_string(),
                ..ClientDetails::default()
            },
            article_image: None,
            items,
            quantities: [100, 250, 500],
            margins: [Decimal::from(30), Decimal::from(25), Decimal::from(20)],
            language: Language::En,
            created_at: now,
            updated_at: now,
        }
    }

    fn options() -> ExportOptions {
        ExportOptions::new(
            "Lomartex, Lda",
            "Lomartex",
            "info@lomartex.pt",
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
        )
    }

    #[test]
    fn test_renders_pdf_bytes() {
        let layout = project(&quotation(), &options()).unwrap();
        let bytes = render(&layout, &FontSet::builtin()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_renders_embedded_image() {
        let mut q = quotation();
        q.article_image = Some(format!("data:image/png;base64,{PIXEL_PNG}"));
        let layout = project(&q, &options()).unwrap();
        let bytes = render(&layout, &FontSet::builtin()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_undecodable_image_is_an_error() {
        let layout = DocumentLayout {
            title: "broken".to_string(),
            file_name: "broken.pdf".to_string(),
            language: Language::Pt,
            pages: vec![Page {
                elements: vec![Element::Image(ImageBlock {
                    x_mm: 14.0,
                    y_mm: 50.0,
                    width_mm: 40.0,
                    height_mm: 40.0,
                    data: vec![1, 2, 3],
                })],
            }],
        };
        assert!(matches!(
            render(&layout, &FontSet::builtin()),
            Err(PdfError::Image(_))
        ));
    }

    #[test]
    fn test_missing_font_file_is_an_error() {
        let layout = project(&quotation(), &options()).unwrap();
        let fonts = FontSet::from_files(Some(PathBuf::from("/nonexistent/font.ttf")), None);
        assert!(matches!(render(&layout, &fonts), Err(PdfError::Font { .. })));
    }
}
