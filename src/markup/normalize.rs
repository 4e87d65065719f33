//! Text normalization to the renderable Latin-1 subset.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use unicode_normalization::UnicodeNormalization;

/// Fixed substitutions for punctuation, symbols and currency marks.
///
/// No replacement may contain a key of this table or a non-Latin-1 character.
const SUBSTITUTIONS: &[(char, &str)] = &[
    // Bullets
    ('\u{2022}', "-"), // •
    ('\u{2023}', "-"), // ‣
    ('\u{2043}', "-"), // ⁃
    ('\u{2219}', "-"), // ∙
    ('\u{25AA}', "-"), // ▪
    ('\u{25A0}', "-"), // ■
    ('\u{25CF}', "-"), // ●
    ('\u{25CB}', "-"), // ○
    ('\u{25E6}', "-"), // ◦
    // Quotes
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201A}', "'"),
    ('\u{201B}', "'"),
    ('\u{2032}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{201E}', "\""),
    ('\u{201F}', "\""),
    ('\u{2033}', "\""),
    // Dashes and minus
    ('\u{2010}', "-"),
    ('\u{2011}', "-"),
    ('\u{2012}', "-"),
    ('\u{2013}', "-"),
    ('\u{2014}', "-"),
    ('\u{2015}', "-"),
    ('\u{2212}', "-"),
    // Arrows
    ('\u{2192}', "->"),
    ('\u{21D2}', "->"),
    ('\u{2794}', "->"),
    ('\u{279C}', "->"),
    ('\u{2190}', "<-"),
    ('\u{21D0}', "<-"),
    ('\u{2194}', "<->"),
    // Check marks and boxes
    ('\u{2713}', "[v]"),
    ('\u{2714}', "[v]"),
    ('\u{2611}', "[v]"),
    ('\u{2717}', "[x]"),
    ('\u{2718}', "[x]"),
    ('\u{2715}', "[x]"),
    ('\u{2716}', "[x]"),
    ('\u{2612}', "[x]"),
    ('\u{2610}', "[ ]"),
    // Ellipsis
    ('\u{2026}', "..."),
    // Currency
    ('\u{20AC}', "EUR"),
    ('\u{20B9}', "INR"),
    ('\u{20BD}', "RUB"),
    ('\u{20A9}', "KRW"),
    ('\u{20BA}', "TRY"),
    ('\u{20AB}', "VND"),
    ('\u{20AA}', "ILS"),
    ('\u{20B1}', "PHP"),
    ('\u{20A6}', "NGN"),
    ('\u{20B4}', "UAH"),
    ('\u{20BF}', "BTC"),
    // Fractions
    ('\u{00BC}', "1/4"),
    ('\u{00BD}', "1/2"),
    ('\u{00BE}', "3/4"),
    ('\u{2153}', "1/3"),
    ('\u{2154}', "2/3"),
    ('\u{2155}', "1/5"),
    ('\u{2156}', "2/5"),
    ('\u{2157}', "3/5"),
    ('\u{2158}', "4/5"),
    ('\u{2159}', "1/6"),
    ('\u{215A}', "5/6"),
    ('\u{215B}', "1/8"),
    ('\u{215C}', "3/8"),
    ('\u{215D}', "5/8"),
    ('\u{215E}', "7/8"),
    ('\u{2044}', "/"),
    // Spaces
    ('\u{00A0}', " "),
    ('\u{2002}', " "),
    ('\u{2003}', " "),
    ('\u{2009}', " "),
    ('\u{200A}', " "),
    ('\u{202F}', " "),
    ('\u{3000}', " "),
    // Math
    ('\u{2264}', "<="),
    ('\u{2265}', ">="),
    ('\u{2260}', "!="),
    ('\u{2248}', "~"),
    ('\u{2122}', "TM"),
];

static SUBSTITUTION_MAP: Lazy<HashMap<char, &'static str>> =
    Lazy::new(|| SUBSTITUTIONS.iter().copied().collect());

fn is_latin1(c: char) -> bool {
    (c as u32) <= 0xFF
}

fn push_normalized(out: &mut String, c: char) -> bool {
    if let Some(rep) = SUBSTITUTION_MAP.get(&c) {
        out.push_str(rep);
        true
    } else if is_latin1(c) {
        out.push(c);
        true
    } else {
        false
    }
}

/// Map text onto the Latin-1 subset the backends can draw.
///
/// Total and idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.nfc() {
        if push_normalized(&mut out, c) {
            continue;
        }
        // Compatibility decomposition recovers ligatures and accented letters
        // outside Latin-1; whatever is left (combining marks, CJK, emoji) is dropped.
        for d in std::iter::once(c).nfkd() {
            push_normalized(&mut out, d);
        }
    }
    out
}

/// [`normalize`] for optional input; `None` yields an empty string.
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_mappings() {
        assert_eq!(normalize("\u{2022} item"), "- item");
        assert_eq!(normalize("\u{201C}quoted\u{201D}"), "\"quoted\"");
        assert_eq!(normalize("a \u{2014} b"), "a - b");
        assert_eq!(normalize("go \u{2192} there \u{2190}"), "go -> there <-");
        assert_eq!(normalize("\u{2713} done \u{2717} not"), "[v] done [x] not");
        assert_eq!(normalize("wait\u{2026}"), "wait...");
        assert_eq!(normalize("\u{20AC}100"), "EUR100");
        assert_eq!(normalize("\u{00BD} and \u{2154}"), "1/2 and 2/3");
    }

    #[test]
    fn test_latin1_kept() {
        assert_eq!(normalize("Café £5 ¥3 Ñandú"), "Café £5 ¥3 Ñandú");
    }

    #[test]
    fn test_decomposition_fallback() {
        assert_eq!(normalize("\u{FB01}nance"), "finance");
        assert_eq!(normalize("Ele\u{0301}onore"), "Eléonore");
        assert_eq!(normalize("Łódź"), "ódz");
        assert_eq!(normalize("Brand\u{2122}"), "BrandTM");
    }

    #[test]
    fn test_drops_unrepresentable() {
        assert_eq!(normalize("日本 ok 🎉"), " ok ");
    }

    #[test]
    fn test_none_is_empty() {
        assert_eq!(normalize_opt(None), "");
        assert_eq!(normalize_opt(Some("x")), "x");
    }

    #[test]
    fn test_idempotent_and_latin1() {
        let samples = [
            "Plain ASCII",
            "\u{2022} \u{201C}Smart\u{201D} \u{2014} \u{2026} \u{20AC} \u{00BD}",
            "\u{FB01}\u{FB02} \u{2122} \u{00A0}nbsp",
            "mixed 日本 e\u{0301} \u{1F600} \u{2153}\u{2044}",
            "",
        ];
        for s in samples {
            let once = normalize(s);
            assert!(once.chars().all(|c| (c as u32) <= 0xFF), "{once:?}");
            assert_eq!(normalize(&once), once);
        }
    }
}
