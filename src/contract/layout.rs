//! Pagination engine shared by both document kinds.
//!
//! Works in millimetres from the top edge of an A4 page. Every block is
//! measured (word-wrapped at its font size) before it is placed; a block that
//! would cross the bottom margin moves to a fresh page as a whole, so boxes and
//! banners never straddle a page boundary. Plain text taller than an entire
//! page is cut line by line; a panel taller than a page is cut into row
//! groups, each drawn as its own bordered panel.
//!
//! Wrapping measures text with coarse Helvetica advance widths that never
//! underestimate, so capitals and bold runs wrap sooner than lower-case text.

use super::content::{Block, PanelRow, TextStyle};
use super::classify::LineClass;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_TOP_MM: f32 = 20.0;
pub const MARGIN_BOTTOM_MM: f32 = 20.0;
pub const MARGIN_X_MM: f32 = 15.0;
pub const CONTENT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_X_MM;
/// Lowest y (from the top) any block may reach.
pub const BAND_BOTTOM_MM: f32 = PAGE_HEIGHT_MM - MARGIN_BOTTOM_MM;

pub const PT_TO_MM: f32 = 0.3528;
const LINE_SPACING: f32 = 1.35;

pub const HEADER_PADDING_MM: f32 = 4.0;
pub const HEADER_COMPANY_PT: f32 = 14.0;
pub const HEADER_LINE_PT: f32 = 8.0;
pub const HEADER_TITLE_PT: f32 = 13.0;
pub const HEADER_TITLE_GAP_MM: f32 = 3.0;
const HEADER_AFTER_MM: f32 = 6.0;

pub const BANNER_PT: f32 = 10.5;
pub const BANNER_PADDING_MM: f32 = 2.2;
const BANNER_AFTER_MM: f32 = 2.0;

pub const PANEL_PADDING_MM: f32 = 3.0;
pub const PANEL_PT: f32 = 9.0;
pub const PANEL_LABEL_WIDTH_MM: f32 = 55.0;
pub const PANEL_ROW_GAP_MM: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub size_pt: f32,
    pub bold: bool,
    pub space_before_mm: f32,
    pub space_after_mm: f32,
    pub indent_mm: f32,
}

pub fn text_metrics(style: TextStyle) -> TextMetrics {
    let (size_pt, bold, space_before_mm, space_after_mm, indent_mm) = match style {
        TextStyle::Legal(LineClass::MainTitle) => (13.0, true, 6.0, 3.0, 0.0),
        TextStyle::Legal(LineClass::ArticleTitle) => (11.0, true, 4.0, 2.0, 0.0),
        TextStyle::Legal(LineClass::SubArticle) => (9.5, false, 1.5, 1.5, 4.0),
        TextStyle::Legal(LineClass::Body) => (9.0, false, 0.5, 1.0, 0.0),
        TextStyle::Paragraph => (9.0, false, 1.0, 2.0, 0.0),
        TextStyle::Note => (7.5, false, 3.0, 0.0, 0.0),
    };
    TextMetrics {
        size_pt,
        bold,
        space_before_mm,
        space_after_mm,
        indent_mm,
    }
}

pub fn line_height_mm(size_pt: f32) -> f32 {
    size_pt * PT_TO_MM * LINE_SPACING
}

/// Advance width of one glyph in em, rounded up per group.
fn glyph_em(c: char, bold: bool) -> f32 {
    let (regular, heavy) = match c {
        ' ' => (0.278, 0.278),
        'i' | 'ı' | 'î' | 'j' | 'l' | 'I' | 'İ' | 'Î' | '.' | ',' | ':' | ';' | '\'' | '!'
        | '|' => (0.278, 0.333),
        'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '-' | '/' | '"' => (0.333, 0.389),
        'm' => (0.833, 0.889),
        'w' => (0.722, 0.778),
        'M' => (0.833, 0.833),
        'W' => (0.944, 0.944),
        '@' | '%' => (1.015, 0.975),
        '0'..='9' => (0.556, 0.556),
        c if c.is_uppercase() => (0.778, 0.778),
        c if c.is_lowercase() => (0.556, 0.611),
        _ => (0.667, 0.667),
    };
    if bold {
        heavy
    } else {
        regular
    }
}

fn text_width_em(text: &str, bold: bool) -> f32 {
    text.chars().map(|c| glyph_em(c, bold)).sum()
}

/// Word-wraps `text` to `width_mm` at the given font. Words wider than a
/// line are hard-split.
pub fn wrap_text(text: &str, width_mm: f32, size_pt: f32, bold: bool) -> Vec<String> {
    wrap_em(text, width_mm / (size_pt * PT_TO_MM), bold)
}

fn wrap_em(text: &str, max_em: f32, bold: bool) -> Vec<String> {
    let space = glyph_em(' ', bold);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_em = 0.0f32;

    for word in text.split_whitespace() {
        let mut word = word.to_string();
        let mut word_em = text_width_em(&word, bold);
        while word_em > max_em {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_em = 0.0;
            }
            let rest = split_at_width(&mut word, max_em, bold);
            lines.push(std::mem::replace(&mut word, rest));
            word_em = text_width_em(&word, bold);
        }
        if !current.is_empty() && current_em + space + word_em > max_em {
            lines.push(std::mem::take(&mut current));
            current_em = 0.0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_em += space;
        }
        current_em += word_em;
        current.push_str(&word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Cuts `word` after the longest prefix (at least one char) that fits and
/// returns the remainder.
fn split_at_width(word: &mut String, max_em: f32, bold: bool) -> String {
    let mut used = 0.0f32;
    let mut cut = word.len();
    for (i, c) in word.char_indices() {
        let w = glyph_em(c, bold);
        if i > 0 && used + w > max_em {
            cut = i;
            break;
        }
        used += w;
    }
    word.split_off(cut)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRow {
    pub label: String,
    pub value_lines: Vec<String>,
}

/// A block after measurement, with its text already wrapped.
#[derive(Debug, Clone, PartialEq)]
pub enum Placed {
    Header {
        company: String,
        lines: Vec<String>,
        title_lines: Vec<String>,
    },
    Banner { lines: Vec<String> },
    Panel { rows: Vec<PlacedRow> },
    Text { lines: Vec<String>, style: TextStyle },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBlock {
    /// Distance of the block's top edge from the top of the page.
    pub top_mm: f32,
    /// Height of the drawn box; must fit inside the writable band.
    pub height_mm: f32,
    pub content: Placed,
}

impl PlacedBlock {
    pub fn bottom_mm(&self) -> f32 {
        self.top_mm + self.height_mm
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub blocks: Vec<PlacedBlock>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub pages: Vec<PageLayout>,
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

struct Measured {
    height_mm: f32,
    advance_mm: f32,
    content: Placed,
}

/// Lays out blocks onto as many pages as needed.
pub fn paginate(blocks: &[Block]) -> DocumentLayout {
    let mut pager = Pager::new();
    for block in blocks {
        match block {
            Block::PageBreak => pager.break_page(),
            Block::Gap(mm) => pager.gap(*mm),
            other => {
                for piece in measure(other) {
                    pager.place(piece);
                }
            }
        }
    }
    pager.finish()
}

struct Pager {
    pages: Vec<PageLayout>,
    current: PageLayout,
    cursor_mm: f32,
}

impl Pager {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: PageLayout::default(),
            cursor_mm: MARGIN_TOP_MM,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.cursor_mm = MARGIN_TOP_MM;
    }

    fn break_page(&mut self) {
        if !self.current.blocks.is_empty() {
            self.new_page();
        }
    }

    fn gap(&mut self, mm: f32) {
        // No leading whitespace on a fresh page
        if !self.current.blocks.is_empty() {
            self.cursor_mm = (self.cursor_mm + mm).min(BAND_BOTTOM_MM);
        }
    }

    fn place(&mut self, piece: Measured) {
        if self.cursor_mm + piece.height_mm > BAND_BOTTOM_MM && !self.current.blocks.is_empty() {
            self.new_page();
        }
        self.current.blocks.push(PlacedBlock {
            top_mm: self.cursor_mm,
            height_mm: piece.height_mm,
            content: piece.content,
        });
        self.cursor_mm += piece.advance_mm;
    }

    fn finish(mut self) -> DocumentLayout {
        if !self.current.blocks.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        DocumentLayout { pages: self.pages }
    }
}

fn measure(block: &Block) -> Vec<Measured> {
    match block {
        Block::Header {
            company,
            lines,
            title,
        } => {
            let inner = CONTENT_WIDTH_MM - 2.0 * HEADER_PADDING_MM;
            let lines: Vec<String> = lines
                .iter()
                .flat_map(|line| wrap_text(line, inner, HEADER_LINE_PT, false))
                .collect();
            let title_lines = wrap_text(title, inner, HEADER_TITLE_PT, true);
            let height_mm = 2.0 * HEADER_PADDING_MM
                + line_height_mm(HEADER_COMPANY_PT)
                + lines.len() as f32 * line_height_mm(HEADER_LINE_PT)
                + HEADER_TITLE_GAP_MM
                + title_lines.len() as f32 * line_height_mm(HEADER_TITLE_PT);
            vec![Measured {
                height_mm,
                advance_mm: height_mm + HEADER_AFTER_MM,
                content: Placed::Header {
                    company: company.clone(),
                    lines,
                    title_lines,
                },
            }]
        }
        Block::Banner { text } => {
            let inner = CONTENT_WIDTH_MM - 2.0 * BANNER_PADDING_MM;
            let lines = wrap_text(text, inner, BANNER_PT, true);
            let height_mm =
                2.0 * BANNER_PADDING_MM + lines.len() as f32 * line_height_mm(BANNER_PT);
            vec![Measured {
                height_mm,
                advance_mm: height_mm + BANNER_AFTER_MM,
                content: Placed::Banner { lines },
            }]
        }
        Block::Panel { rows } => {
            let rows: Vec<PlacedRow> = rows.iter().flat_map(wrap_row).collect();
            split_panel(rows)
                .into_iter()
                .map(|rows| {
                    let height_mm = panel_height(&rows);
                    Measured {
                        height_mm,
                        advance_mm: height_mm,
                        content: Placed::Panel { rows },
                    }
                })
                .collect()
        }
        Block::Text { text, style } => measure_text(text, *style),
        Block::Gap(_) | Block::PageBreak => Vec::new(),
    }
}

pub fn panel_value_width_mm() -> f32 {
    CONTENT_WIDTH_MM - 2.0 * PANEL_PADDING_MM - PANEL_LABEL_WIDTH_MM
}

/// Wraps a row's value. A value taller than a page-high panel is cut into
/// several rows under the same label.
fn wrap_row(row: &PanelRow) -> Vec<PlacedRow> {
    let lines = wrap_text(&row.value, panel_value_width_mm(), PANEL_PT, false);
    let room = BAND_BOTTOM_MM - MARGIN_TOP_MM - 2.0 * PANEL_PADDING_MM - PANEL_ROW_GAP_MM;
    let max_lines = ((room / line_height_mm(PANEL_PT)).floor() as usize).max(1);
    lines
        .chunks(max_lines)
        .map(|chunk| PlacedRow {
            label: row.label.clone(),
            value_lines: chunk.to_vec(),
        })
        .collect()
}

/// Groups rows so every group fits an empty page.
fn split_panel(rows: Vec<PlacedRow>) -> Vec<Vec<PlacedRow>> {
    let band = BAND_BOTTOM_MM - MARGIN_TOP_MM;
    let mut groups = Vec::new();
    let mut current: Vec<PlacedRow> = Vec::new();
    for row in rows {
        if !current.is_empty() && panel_height(&current) + panel_row_height_mm(&row) > band {
            groups.push(std::mem::take(&mut current));
        }
        current.push(row);
    }
    if !current.is_empty() || groups.is_empty() {
        groups.push(current);
    }
    groups
}

pub fn panel_row_height_mm(row: &PlacedRow) -> f32 {
    row.value_lines.len() as f32 * line_height_mm(PANEL_PT) + PANEL_ROW_GAP_MM
}

fn panel_height(rows: &[PlacedRow]) -> f32 {
    2.0 * PANEL_PADDING_MM + rows.iter().map(panel_row_height_mm).sum::<f32>()
}

fn measure_text(text: &str, style: TextStyle) -> Vec<Measured> {
    let metrics = text_metrics(style);
    let width = CONTENT_WIDTH_MM - metrics.indent_mm;
    let lines = wrap_text(text, width, metrics.size_pt, metrics.bold);
    let lh = line_height_mm(metrics.size_pt);

    let band = BAND_BOTTOM_MM - MARGIN_TOP_MM;
    let max_lines = (((band - metrics.space_before_mm) / lh).floor() as usize).max(1);

    lines
        .chunks(max_lines)
        .map(|chunk| {
            let height_mm = metrics.space_before_mm + chunk.len() as f32 * lh;
            Measured {
                height_mm,
                advance_mm: height_mm + metrics.space_after_mm,
                content: Placed::Text {
                    lines: chunk.to_vec(),
                    style,
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::content::{build_blocks, classified_lines};
    use crate::contract::testing::{long_legal_text, sample_input, sample_stamp};
    use crate::models::DocumentKind;

    fn assert_blocks_inside_band(layout: &DocumentLayout) {
        for (page_no, page) in layout.pages.iter().enumerate() {
            for block in &page.blocks {
                assert!(
                    block.top_mm >= MARGIN_TOP_MM - 1e-3,
                    "page {page_no}: block starts above margin at {}",
                    block.top_mm
                );
                assert!(
                    block.bottom_mm() <= BAND_BOTTOM_MM + 1e-3,
                    "page {page_no}: {:?} crosses bottom margin ({} > {})",
                    block.content,
                    block.bottom_mm(),
                    BAND_BOTTOM_MM
                );
            }
        }
    }

    fn text_width_mm(text: &str, size_pt: f32, bold: bool) -> f32 {
        text_width_em(text, bold) * size_pt * PT_TO_MM
    }

    fn panel_rows(layout: &DocumentLayout) -> Vec<&PlacedRow> {
        layout
            .pages
            .iter()
            .flat_map(|page| &page.blocks)
            .filter_map(|block| match &block.content {
                Placed::Panel { rows } => Some(rows),
                _ => None,
            })
            .flatten()
            .collect()
    }

    #[test]
    fn wrap_splits_on_words() {
        // one 1.668, two 1.611, three 2.334, four 1.778, five 1.723, space 0.278
        let lines = wrap_em("one two three four five", 4.0, false);
        assert_eq!(lines, vec!["one two", "three", "four five"]);
    }

    #[test]
    fn wrap_short() {
        assert_eq!(wrap_text("Hello", CONTENT_WIDTH_MM, 9.0, false), vec!["Hello"]);
    }

    #[test]
    fn wrap_empty() {
        assert_eq!(wrap_text("", CONTENT_WIDTH_MM, 9.0, false), vec![""]);
    }

    #[test]
    fn wrap_hard_splits_long_words() {
        // digits are 0.556 em, so five fit in 2.9 em
        let lines = wrap_em("12 1234567890123 45", 2.9, false);
        assert_eq!(lines, vec!["12", "12345", "67890", "123", "45"]);
    }

    #[test]
    fn wrap_handles_multibyte_letters() {
        assert_eq!(wrap_em("şşşşşş ğ", 4.5, false), vec!["şşşşşş ğ"]);
        assert_eq!(wrap_em("şşşşşşşş", 2.0, false), vec!["şşş", "şşş", "şş"]);
    }

    #[test]
    fn smaller_fonts_fit_more_text() {
        let text = "kelime ".repeat(60);
        let small = wrap_text(&text, CONTENT_WIDTH_MM, 8.0, false).len();
        let large = wrap_text(&text, CONTENT_WIDTH_MM, 12.0, false).len();
        assert!(small < large);
    }

    #[test]
    fn capitals_and_bold_are_measured_wider() {
        assert!(text_width_mm("ABCDE", 10.0, false) > text_width_mm("abcde", 10.0, false));
        assert!(text_width_mm("abcde", 10.0, true) > text_width_mm("abcde", 10.0, false));
        let caps = "SÖZLEŞME ".repeat(30);
        let lower = "sözleşme ".repeat(30);
        assert!(
            wrap_text(&caps, CONTENT_WIDTH_MM, 10.0, true).len()
                > wrap_text(&lower, CONTENT_WIDTH_MM, 10.0, false).len()
        );
    }

    #[test]
    fn long_capital_title_wraps_inside_content_width() {
        let title =
            "MESAFELİ HİZMET SÖZLEŞMESİ KAPSAMINDA TARAFLARIN HAK VE YÜKÜMLÜLÜKLERİ BÖLÜMÜ";
        assert_eq!(title.chars().count(), 77);
        let metrics = text_metrics(TextStyle::Legal(LineClass::MainTitle));
        let lines = wrap_text(title, CONTENT_WIDTH_MM, metrics.size_pt, metrics.bold);
        assert!(lines.len() >= 2, "{lines:?}");
        for line in &lines {
            let width = text_width_mm(line, metrics.size_pt, metrics.bold);
            assert!(width <= CONTENT_WIDTH_MM, "{line:?} is {width}mm wide");
        }
    }

    #[test]
    fn short_document_is_single_page() {
        let blocks = vec![
            Block::Banner { text: "A".into() },
            Block::Text {
                text: "short".into(),
                style: TextStyle::Paragraph,
            },
        ];
        let layout = paginate(&blocks);
        assert_eq!(layout.page_count(), 1);
        assert_eq!(layout.pages[0].blocks[0].top_mm, MARGIN_TOP_MM);
    }

    #[test]
    fn empty_block_list_yields_one_blank_page() {
        assert_eq!(paginate(&[]).page_count(), 1);
    }

    #[test]
    fn page_break_starts_fresh_page_but_not_twice() {
        let text = Block::Text {
            text: "x".into(),
            style: TextStyle::Paragraph,
        };
        let layout = paginate(&[text.clone(), Block::PageBreak, Block::PageBreak, text]);
        assert_eq!(layout.page_count(), 2);
        assert_eq!(layout.pages[1].blocks[0].top_mm, MARGIN_TOP_MM);
    }

    #[test]
    fn gap_is_ignored_at_top_of_page() {
        let text = Block::Text {
            text: "x".into(),
            style: TextStyle::Paragraph,
        };
        let layout = paginate(&[Block::Gap(30.0), text]);
        assert_eq!(layout.pages[0].blocks[0].top_mm, MARGIN_TOP_MM);
    }

    #[test]
    fn overflowing_panel_moves_whole_to_next_page() {
        let mut blocks = Vec::new();
        for _ in 0..10 {
            blocks.push(Block::Panel {
                rows: (0..8)
                    .map(|i| PanelRow {
                        label: format!("Label {i}"),
                        value: "value".into(),
                    })
                    .collect(),
            });
        }
        let layout = paginate(&blocks);
        assert!(layout.page_count() >= 2);
        assert_blocks_inside_band(&layout);
    }

    #[test]
    fn panel_taller_than_a_page_is_split_into_fitting_panels() {
        let mut input = sample_input();
        input.customer.address = Some("Mahalle Sokak ".repeat(400));
        let blocks = build_blocks(DocumentKind::PreInfo, &input, None, &sample_stamp());
        let layout = paginate(&blocks);
        assert!(layout.page_count() >= 3);
        assert_blocks_inside_band(&layout);

        let address = blocks
            .iter()
            .find_map(|block| match block {
                Block::Panel { rows } => rows.iter().find(|r| r.label == "Adres"),
                _ => None,
            })
            .unwrap();
        let expected = wrap_text(&address.value, panel_value_width_mm(), PANEL_PT, false);
        let placed: Vec<String> = panel_rows(&layout)
            .into_iter()
            .filter(|row| row.label == "Adres")
            .flat_map(|row| row.value_lines.clone())
            .collect();
        assert_eq!(placed, expected);
    }

    #[test]
    fn long_legal_text_spans_pages_without_split_boxes() {
        let blocks = build_blocks(
            DocumentKind::PreInfo,
            &sample_input(),
            Some(&long_legal_text(120)),
            &sample_stamp(),
        );
        let layout = paginate(&blocks);
        assert!(layout.page_count() >= 2, "got {} pages", layout.page_count());
        assert_blocks_inside_band(&layout);
    }

    #[test]
    fn oversized_paragraph_is_cut_into_page_sized_pieces() {
        let text = "kelime ".repeat(3000);
        let layout = paginate(&[Block::Text {
            text,
            style: TextStyle::Legal(LineClass::Body),
        }]);
        assert!(layout.page_count() >= 2);
        assert_blocks_inside_band(&layout);
    }

    #[test]
    fn pre_info_acceptance_is_alone_on_last_page() {
        let blocks = build_blocks(DocumentKind::PreInfo, &sample_input(), None, &sample_stamp());
        let layout = paginate(&blocks);
        let last = layout.pages.last().unwrap();
        assert!(matches!(
            &last.blocks[0].content,
            Placed::Banner { lines } if lines == &vec!["ONAY VE KABUL".to_string()]
        ));
        assert_eq!(last.blocks[0].top_mm, MARGIN_TOP_MM);
    }

    #[test]
    fn distance_sales_has_header_first_and_articles_on_later_page() {
        let blocks =
            build_blocks(DocumentKind::DistanceSales, &sample_input(), None, &sample_stamp());
        let layout = paginate(&blocks);
        assert!(layout.page_count() >= 2);
        assert!(matches!(layout.pages[0].blocks[0].content, Placed::Header { .. }));
        let article_page = layout
            .pages
            .iter()
            .position(|p| {
                p.blocks.iter().any(|b| matches!(
                    &b.content,
                    Placed::Text { lines, .. } if lines[0].starts_with("MADDE 1")
                ))
            })
            .unwrap();
        assert!(article_page >= 1);
        assert_blocks_inside_band(&layout);
    }

    #[test]
    fn same_input_different_stamp_gives_same_structure() {
        let input = sample_input();
        let legal = long_legal_text(40);
        let stamp_a = sample_stamp();
        let stamp_b = crate::contract::content::RenderStamp {
            rendered_at: stamp_a.rendered_at + chrono::Duration::hours(5),
        };
        let mut other_ip = input.clone();
        other_ip.client_ip = "198.51.100.20".into();

        for kind in DocumentKind::ALL {
            let a = build_blocks(kind, &input, Some(&legal), &stamp_a);
            let b = build_blocks(kind, &other_ip, Some(&legal), &stamp_b);
            assert_eq!(classified_lines(&a), classified_lines(&b));
            assert_eq!(paginate(&a).page_count(), paginate(&b).page_count());
        }
    }

    #[test]
    fn identical_inputs_give_identical_layouts() {
        let input = sample_input();
        let legal = long_legal_text(30);
        let stamp = sample_stamp();
        let a = paginate(&build_blocks(DocumentKind::PreInfo, &input, Some(&legal), &stamp));
        let b = paginate(&build_blocks(DocumentKind::PreInfo, &input, Some(&legal), &stamp));
        assert_eq!(a, b);
    }
}
