//! Text helpers shared by the renderer and the notification composer.

use std::sync::LazyLock;

use regex::Regex;

/// Printed wherever a customer or package field is missing.
pub const NOT_SPECIFIED: &str = "Belirtilmemiş";

/// A closing block tag or `<br>`, plus any list/table closers and the source
/// newline that directly follow it.
static BLOCK_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)<\s*(?:br\s*/?|/p|/div|/li|/h[1-6]|/tr)\s*>(?:\s*<\s*/\s*(?:ul|ol|tbody|table)\s*>)*[ \t]*\n?",
    )
    .unwrap()
});
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z][a-zA-Z0-9]*);").unwrap());

/// Strips markup from rich legal text.
///
/// Closing block tags and `<br>` become line breaks so paragraph structure
/// survives; a newline already following such a tag is not doubled. Every
/// other tag is dropped. Common entities are decoded, unknown ones removed.
/// Lines are trimmed but blank lines are kept for spacing.
pub fn strip_markup(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let with_breaks = BLOCK_BREAK.replace_all(&normalized, "\n");
    let without_tags = ANY_TAG.replace_all(&with_breaks, "");
    let decoded = ENTITY.replace_all(&without_tags, |caps: &regex::Captures| {
        decode_entity(&caps[1]).map(String::from).unwrap_or_default()
    });

    decoded
        .lines()
        .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .to_string()
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code).filter(|c| !c.is_control() || *c == '\n');
    }
    match name {
        "nbsp" => Some(' '),
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "rsquo" | "lsquo" => Some('\''),
        "rdquo" | "ldquo" => Some('"'),
        "ndash" | "mdash" => Some('-'),
        _ => None,
    }
}

/// Folds text to the ASCII range the built-in PDF fonts can encode.
pub fn transliterate_for_pdf(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            'ş' => out.push('s'),
            'Ş' => out.push('S'),
            'ğ' => out.push('g'),
            'Ğ' => out.push('G'),
            'ı' => out.push('i'),
            'İ' => out.push('I'),
            'ç' => out.push('c'),
            'Ç' => out.push('C'),
            'ö' => out.push('o'),
            'Ö' => out.push('O'),
            'ü' => out.push('u'),
            'Ü' => out.push('U'),
            'â' => out.push('a'),
            'Â' => out.push('A'),
            'î' => out.push('i'),
            'û' => out.push('u'),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '«' | '»' => out.push('"'),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2022}' | '·' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '₺' => out.push_str("TL"),
            '\t' => out.push(' '),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => {}
        }
    }
    out
}

/// Formats an amount the Turkish way: `1.250,00 TL`.
pub fn format_price(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let negative = cents < 0;
    let cents = cents.unsigned_abs();
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("{}{grouped},{fraction:02} TL", if negative { "-" } else { "" })
}

/// Value or the "not specified" placeholder.
pub fn or_placeholder(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_SPECIFIED.to_string(),
    }
}

/// Escapes user-supplied text for the HTML email body.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_keeps_paragraphs() {
        let html = "<h2>GENEL HÜKÜMLER</h2><p>Birinci <strong>paragraf</strong>.</p><p>İkinci</p>";
        assert_eq!(strip_markup(html), "GENEL HÜKÜMLER\nBirinci paragraf.\nİkinci");
    }

    #[test]
    fn br_becomes_newline() {
        assert_eq!(strip_markup("a<br>b<br/>c<BR />d"), "a\nb\nc\nd");
    }

    #[test]
    fn decodes_known_entities_and_drops_unknown() {
        assert_eq!(
            strip_markup("Fiyat&nbsp;&amp;&nbsp;KDV &lt;dahil&gt; &#252;cret &#x41; &bogus;"),
            "Fiyat & KDV <dahil> ücret A"
        );
    }

    #[test]
    fn keeps_blank_lines_between_blocks() {
        assert_eq!(strip_markup("<p>a</p>\n\n<p>b</p>"), "a\n\nb");
    }

    #[test]
    fn source_newline_after_block_tag_is_not_doubled() {
        assert_eq!(strip_markup("<p>a</p>\n<p>b</p>\n"), "a\nb");
        assert_eq!(strip_markup("a<br>\nb"), "a\nb");
        assert_eq!(strip_markup("<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n<p>c</p>"), "a\nb\nc");
    }

    #[test]
    fn empty_input_returns_empty() {
        assert_eq!(strip_markup(""), "");
        assert_eq!(strip_markup("<p></p>"), "");
    }

    #[test]
    fn transliterates_turkish_letters() {
        assert_eq!(
            transliterate_for_pdf("ÖN BİLGİLENDİRME – Şişli, Üsküdar, çağrı"),
            "ON BILGILENDIRME - Sisli, Uskudar, cagri"
        );
    }

    #[test]
    fn transliteration_drops_unencodable_symbols() {
        assert_eq!(transliterate_for_pdf("ok ✓ 100₺"), "ok  100TL");
    }

    #[test]
    fn formats_prices_with_grouping() {
        assert_eq!(format_price(1250.0), "1.250,00 TL");
        assert_eq!(format_price(0.5), "0,50 TL");
        assert_eq!(format_price(1234567.891), "1.234.567,89 TL");
        assert_eq!(format_price(999.0), "999,00 TL");
    }

    #[test]
    fn placeholder_for_missing_and_blank() {
        assert_eq!(or_placeholder(None), NOT_SPECIFIED);
        assert_eq!(or_placeholder(Some("   ")), NOT_SPECIFIED);
        assert_eq!(or_placeholder(Some(" Ankara ")), "Ankara");
    }

    #[test]
    fn escapes_html_specials() {
        assert_eq!(escape_html("<b>\"A&B\"</b>"), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
    }
}
