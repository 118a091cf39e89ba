//! Paints a `DocumentLayout` onto A4 pages with `printpdf`.

use std::io::BufWriter;

use printpdf::path::PaintMode;
use printpdf::*;

use super::layout::{
    line_height_mm, panel_row_height_mm, text_metrics, DocumentLayout, Placed, PlacedBlock,
    BANNER_PADDING_MM, BANNER_PT, CONTENT_WIDTH_MM, HEADER_COMPANY_PT, HEADER_LINE_PT,
    HEADER_PADDING_MM, HEADER_TITLE_GAP_MM, HEADER_TITLE_PT, MARGIN_X_MM, PAGE_HEIGHT_MM,
    PAGE_WIDTH_MM, PANEL_LABEL_WIDTH_MM, PANEL_PADDING_MM, PANEL_PT, PT_TO_MM,
};
use super::sanitize::transliterate_for_pdf;
use super::ContractError;

const FOOTER_PT: f32 = 7.0;
const FOOTER_Y_MM: f32 = 10.0;

fn brand() -> Color {
    Color::Rgb(Rgb::new(0.06, 0.36, 0.58, None))
}

fn header_fill() -> Color {
    Color::Rgb(Rgb::new(0.93, 0.96, 0.98, None))
}

fn border() -> Color {
    Color::Rgb(Rgb::new(0.68, 0.74, 0.80, None))
}

fn ink() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn muted() -> Color {
    Color::Rgb(Rgb::new(0.35, 0.35, 0.35, None))
}

fn white() -> Color {
    Color::Rgb(Rgb::new(1.0, 1.0, 1.0, None))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn pick(&self, bold: bool) -> &IndirectFontRef {
        if bold {
            &self.bold
        } else {
            &self.regular
        }
    }
}

/// Renders the layout and returns PDF bytes.
pub fn write_pdf(layout: &DocumentLayout, title: &str) -> Result<Vec<u8>, ContractError> {
    let title = transliterate_for_pdf(title);
    let (doc, page1, layer1) =
        PdfDocument::new(&title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ContractError::Render(format!("PDF font error: {e}")))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ContractError::Render(format!("PDF font error: {e}")))?,
    };

    let total = layout.page_count();
    for (index, page) in layout.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(page1).get_layer(layer1)
        } else {
            let (page_idx, layer_idx) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            doc.get_page(page_idx).get_layer(layer_idx)
        };

        for block in &page.blocks {
            draw_block(&layer, block, &fonts);
        }
        draw_footer(&layer, &fonts, &title, index + 1, total);
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ContractError::Render(format!("PDF save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ContractError::Render(format!("PDF buffer error: {e}")))
}

/// Converts a distance from the top edge to printpdf's bottom-up y.
fn y(top_mm: f32) -> Mm {
    Mm(PAGE_HEIGHT_MM - top_mm)
}

/// Baseline of line `index` in a run of lines starting at `top_mm`.
fn baseline(top_mm: f32, index: usize, size_pt: f32) -> Mm {
    let size_mm = size_pt * PT_TO_MM;
    y(top_mm + index as f32 * line_height_mm(size_pt) + size_mm)
}

fn box_rect(block: &PlacedBlock, mode: PaintMode) -> Rect {
    Rect::new(
        Mm(MARGIN_X_MM),
        y(block.bottom_mm()),
        Mm(MARGIN_X_MM + CONTENT_WIDTH_MM),
        y(block.top_mm),
    )
    .with_mode(mode)
}

fn text(
    layer: &PdfLayerReference,
    line: &str,
    size_pt: f32,
    x_mm: f32,
    at: Mm,
    font: &IndirectFontRef,
) {
    layer.use_text(transliterate_for_pdf(line), size_pt, Mm(x_mm), at, font);
}

fn draw_block(layer: &PdfLayerReference, block: &PlacedBlock, fonts: &Fonts) {
    match &block.content {
        Placed::Header {
            company,
            lines,
            title_lines,
        } => {
            layer.set_fill_color(header_fill());
            layer.add_rect(box_rect(block, PaintMode::Fill));
            layer.set_outline_color(brand());
            layer.set_outline_thickness(0.8);
            layer.add_rect(box_rect(block, PaintMode::Stroke));

            let x = MARGIN_X_MM + HEADER_PADDING_MM;
            let mut top = block.top_mm + HEADER_PADDING_MM;
            layer.set_fill_color(brand());
            let at = baseline(top, 0, HEADER_COMPANY_PT);
            text(layer, company, HEADER_COMPANY_PT, x, at, &fonts.bold);
            top += line_height_mm(HEADER_COMPANY_PT);

            layer.set_fill_color(muted());
            for (i, line) in lines.iter().enumerate() {
                let at = baseline(top, i, HEADER_LINE_PT);
                text(layer, line, HEADER_LINE_PT, x, at, &fonts.regular);
            }
            top += lines.len() as f32 * line_height_mm(HEADER_LINE_PT) + HEADER_TITLE_GAP_MM;

            layer.set_fill_color(ink());
            for (i, line) in title_lines.iter().enumerate() {
                let at = baseline(top, i, HEADER_TITLE_PT);
                text(layer, line, HEADER_TITLE_PT, x, at, &fonts.bold);
            }
        }
        Placed::Banner { lines } => {
            layer.set_fill_color(brand());
            layer.add_rect(box_rect(block, PaintMode::Fill));
            layer.set_fill_color(white());
            let top = block.top_mm + BANNER_PADDING_MM;
            for (i, line) in lines.iter().enumerate() {
                text(
                    layer,
                    line,
                    BANNER_PT,
                    MARGIN_X_MM + BANNER_PADDING_MM,
                    baseline(top, i, BANNER_PT),
                    &fonts.bold,
                );
            }
            layer.set_fill_color(ink());
        }
        Placed::Panel { rows } => {
            layer.set_outline_color(border());
            layer.set_outline_thickness(0.5);
            layer.add_rect(box_rect(block, PaintMode::Stroke));

            layer.set_fill_color(ink());
            let label_x = MARGIN_X_MM + PANEL_PADDING_MM;
            let value_x = label_x + PANEL_LABEL_WIDTH_MM;
            let mut top = block.top_mm + PANEL_PADDING_MM;
            for row in rows {
                let label = format!("{}:", row.label);
                text(layer, &label, PANEL_PT, label_x, baseline(top, 0, PANEL_PT), &fonts.bold);
                for (i, line) in row.value_lines.iter().enumerate() {
                    let at = baseline(top, i, PANEL_PT);
                    text(layer, line, PANEL_PT, value_x, at, &fonts.regular);
                }
                top += panel_row_height_mm(row);
            }
        }
        Placed::Text { lines, style } => {
            let metrics = text_metrics(*style);
            let font = fonts.pick(metrics.bold);
            let top = block.top_mm + metrics.space_before_mm;
            let x = MARGIN_X_MM + metrics.indent_mm;
            layer.set_fill_color(ink());
            for (i, line) in lines.iter().enumerate() {
                text(layer, line, metrics.size_pt, x, baseline(top, i, metrics.size_pt), font);
            }
        }
    }
}

fn draw_footer(layer: &PdfLayerReference, fonts: &Fonts, title: &str, page: usize, total: usize) {
    layer.set_fill_color(muted());
    layer.use_text(title, FOOTER_PT, Mm(MARGIN_X_MM), Mm(FOOTER_Y_MM), &fonts.regular);
    layer.use_text(
        format!("Sayfa {page} / {total}"),
        FOOTER_PT,
        Mm(PAGE_WIDTH_MM - MARGIN_X_MM - 18.0),
        Mm(FOOTER_Y_MM),
        &fonts.regular,
    );
    layer.set_fill_color(ink());
}
