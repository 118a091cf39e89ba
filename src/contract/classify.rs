//! Line classification for merged legal text.
//!
//! Priority: MAIN_TITLE → ARTICLE_TITLE → SUB_ARTICLE → BODY.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::sanitize::strip_markup;

/// Shorter upper-case lines are treated as body text (e.g. "KDV", "TL").
pub const MAIN_TITLE_MIN_LEN: usize = 8;

/// Upper-case keywords that mark a main section title.
const SECTION_KEYWORDS: &[&str] = &[
    // Turkish
    "BİLGİLENDİRME",
    "BILGILENDIRME",
    "SÖZLEŞME",
    "SOZLESME",
    "MADDE",
    "TARAFLAR",
    "KONU",
    "HÜKÜMLER",
    "HUKUMLER",
    "CAYMA",
    "FORM",
    "KOŞULLAR",
    "KOSULLAR",
    "BÖLÜM",
    "BOLUM",
    "SATICI",
    "ALICI",
    // English
    "SECTION",
    "INFORMATION",
    "CONTRACT",
    "AGREEMENT",
    "TERMS",
    "PROVISIONS",
    "WITHDRAWAL",
    "PARTIES",
];

static SUB_ARTICLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\d+").unwrap());
static ARTICLE_TITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.(?:\D|$)").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineClass {
    MainTitle,
    ArticleTitle,
    SubArticle,
    Body,
}

/// One line of stripped legal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegalLine {
    Blank,
    Text { class: LineClass, text: String },
}

/// Classifies a single non-empty, already stripped line.
pub fn classify_line(line: &str) -> LineClass {
    let line = line.trim();
    if is_main_title(line) {
        LineClass::MainTitle
    } else if ARTICLE_TITLE.is_match(line) {
        LineClass::ArticleTitle
    } else if SUB_ARTICLE.is_match(line) {
        LineClass::SubArticle
    } else {
        LineClass::Body
    }
}

fn is_main_title(line: &str) -> bool {
    let has_letters = line.chars().any(char::is_alphabetic);
    let all_upper = !line.chars().any(char::is_lowercase);
    has_letters
        && all_upper
        && line.chars().count() > MAIN_TITLE_MIN_LEN
        && SECTION_KEYWORDS.iter().any(|kw| line.contains(kw))
}

/// Strips markup from rich legal text and classifies every line.
/// Each blank line yields one `Blank`.
pub fn classify_legal_text(raw: &str) -> Vec<LegalLine> {
    strip_markup(raw)
        .lines()
        .map(str::trim)
        .map(|line| {
            if line.is_empty() {
                LegalLine::Blank
            } else {
                LegalLine::Text {
                    class: classify_line(line),
                    text: line.to_string(),
                }
            }
        })
        .collect()
}
