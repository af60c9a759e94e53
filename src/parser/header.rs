//! Version heading parser
//!
//! Pulls a version name and an optional release date out of heading text such
//! as `[1.2.0] - 2024-03-01`, `v1.2.0 (March 1, 2024)` or `Unreleased`.

use super::{ParseError, ParseResult};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Upper bound on wrapper-stripping passes before giving up
pub const MAX_NORMALIZE_ITERATIONS: usize = 1000;

/// Accepted date layouts, tried in order. `%B` also accepts abbreviated month names.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%B %d %Y", "%d %B %Y", "%d %B, %Y"];

static BACKTICKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^`([^`]*)`$").expect("valid regex"));

static HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[Vv]ersion\s+)?(?P<name>.+?)(?:(?:\s*[,:]\s*|\s+[-–—|]\s+|\s+)[\(\[]?(?P<date>.+?)[\)\]]?)?$",
    )
    .expect("valid regex")
});

/// Name and date recovered from a heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHeader {
    /// `None` only when the heading text is empty
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Parse a version heading
///
/// When the text does not split into a name and a parseable date, the whole
/// normalized text becomes the name, including whatever looked like a date.
pub fn parse_header(text: &str) -> ParseResult<ParsedHeader> {
    let normalized = normalize_header_text(text)?;

    let Some(caps) = HEADER.captures(&normalized) else {
        return Ok(ParsedHeader {
            name: non_empty(normalized),
            date: None,
        });
    };

    let date = caps.name("date").and_then(|m| parse_date(m.as_str()));
    let name = match date {
        Some(_) => strip_v_prefix(caps["name"].trim()).to_string(),
        None if caps.name("date").is_some() => normalized.clone(),
        None => strip_v_prefix(caps["name"].trim()).to_string(),
    };

    Ok(ParsedHeader {
        name: non_empty(name),
        date,
    })
}

/// Repeatedly strip surrounding `[...]`, `(...)` and backticks, plus a
/// bracketed leading token, until the text stops changing
///
/// # Errors
/// `NonConvergentNormalization` if no fixed point is reached within
/// [`MAX_NORMALIZE_ITERATIONS`] passes.
pub fn normalize_header_text(text: &str) -> ParseResult<String> {
    let mut current = text.trim().to_string();

    // Every rule shortens the text, so only absurdly deep wrapping hits the
    // cap. It stays as a backstop for rules that could cycle.
    for _ in 0..MAX_NORMALIZE_ITERATIONS {
        let next = strip_once(&current);
        if next == current {
            return Ok(current);
        }
        current = next;
    }

    Err(ParseError::NonConvergentNormalization {
        input: text.to_string(),
    })
}

/// Parse a date fragment against the known layouts
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

fn strip_once(text: &str) -> String {
    if let Some(close) = matching_close(text) {
        if close + 1 == text.len() {
            return text[1..close].trim().to_string();
        }
        // Only a bracketed leading token is unwrapped, `(a) b` is left alone
        if text.starts_with('[') {
            return format!("{}{}", &text[1..close], &text[close + 1..])
                .trim()
                .to_string();
        }
    }

    if let Some(caps) = BACKTICKS.captures(text) {
        return caps[1].trim().to_string();
    }

    text.to_string()
}

/// Byte index of the bracket closing the one that opens `text`
///
/// `[a] - [b]` closes at 2, so it is not treated as one wrapped unit.
fn matching_close(text: &str) -> Option<usize> {
    let (open, close) = match text.as_bytes().first()? {
        b'[' => (b'[', b']'),
        b'(' => (b'(', b')'),
        _ => return None,
    };

    let mut depth = 0usize;
    for (index, byte) in text.bytes().enumerate() {
        if byte == open {
            depth += 1;
        } else if byte == close {
            depth -= 1;
            if depth == 0 {
                return Some(index);
            }
        }
    }
    None
}

/// `v1.2.3` names the same version as `1.2.3`
fn strip_v_prefix(name: &str) -> &str {
    match name.strip_prefix('v') {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest,
        _ => name,
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn parse(text: &str) -> ParsedHeader {
        parse_header(text).unwrap()
    }

    #[test]
    fn test_keep_a_changelog_heading() {
        let header = parse("[1.2.3] - 2024-12-25");
        assert_eq!(header.name.as_deref(), Some("1.2.3"));
        assert_eq!(header.date, date(2024, 12, 25));
    }

    #[test]
    fn test_unreleased() {
        let header = parse("[Unreleased]");
        assert_eq!(header.name.as_deref(), Some("Unreleased"));
        assert_eq!(header.date, None);
    }

    #[test]
    fn test_invalid_date_stays_in_name() {
        let header = parse("[1.0.0] - invalid-date");
        assert_eq!(header.name.as_deref(), Some("1.0.0 - invalid-date"));
        assert_eq!(header.date, None);
    }

    #[test]
    fn test_month_name_formats() {
        for text in [
            "1.0.0 - December 25, 2024",
            "1.0.0 - Dec 25, 2024",
            "1.0.0 - December 25 2024",
            "1.0.0 - Dec 25 2024",
            "1.0.0 - 25 December 2024",
            "1.0.0 - 25 Dec 2024",
            "1.0.0 - 25 December, 2024",
        ] {
            let header = parse(text);
            assert_eq!(header.name.as_deref(), Some("1.0.0"), "{}", text);
            assert_eq!(header.date, date(2024, 12, 25), "{}", text);
        }
    }

    #[test]
    fn test_parenthesized_date() {
        let header = parse("v2.0.0 (2023-01-05)");
        assert_eq!(header.name.as_deref(), Some("2.0.0"));
        assert_eq!(header.date, date(2023, 1, 5));
    }

    #[test]
    fn test_version_prefix() {
        let header = parse("Version 3.1 - 2022-06-01");
        assert_eq!(header.name.as_deref(), Some("3.1"));
        assert_eq!(header.date, date(2022, 6, 1));
    }

    #[test]
    fn test_v_prefix_requires_digit() {
        let header = parse("very first release");
        assert_eq!(header.name.as_deref(), Some("very first release"));
    }

    #[test]
    fn test_prerelease_suffix_kept() {
        let header = parse("1.0.0-rc.1 - 2024-02-02");
        assert_eq!(header.name.as_deref(), Some("1.0.0-rc.1"));
        assert_eq!(header.date, date(2024, 2, 2));
    }

    #[test]
    fn test_no_date() {
        let header = parse("1.0.0");
        assert_eq!(header.name.as_deref(), Some("1.0.0"));
        assert_eq!(header.date, None);
    }

    #[test]
    fn test_empty_heading_has_no_name() {
        assert_eq!(parse("").name, None);
        assert_eq!(parse("[]").name, None);
    }

    #[test]
    fn test_normalize_strips_nested_wrappers() {
        assert_eq!(normalize_header_text("[`(1.0.0)`]").unwrap(), "1.0.0");
        assert_eq!(normalize_header_text("  `v1.0.0`  ").unwrap(), "v1.0.0");
    }

    #[test]
    fn test_normalize_strips_same_kind_nesting() {
        assert_eq!(normalize_header_text("[[1.0.0]]").unwrap(), "1.0.0");
        assert_eq!(normalize_header_text("((1.0.0))").unwrap(), "1.0.0");
        assert_eq!(parse("[[1.0.0]] - 2024-01-01").name.as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_normalize_keeps_separate_brackets() {
        assert_eq!(normalize_header_text("[a] - [b]").unwrap(), "a - [b]");
        assert_eq!(normalize_header_text("(a) - (b)").unwrap(), "(a) - (b)");
        assert_eq!(normalize_header_text("[a (b)]").unwrap(), "a (b)");
    }

    #[test]
    fn test_normalize_gives_up_on_runaway_nesting() {
        let depth = MAX_NORMALIZE_ITERATIONS + 1;
        let text = format!("{}1.0.0{}", "(".repeat(depth), ")".repeat(depth));
        assert!(matches!(
            normalize_header_text(&text),
            Err(ParseError::NonConvergentNormalization { .. })
        ));

        let shallow = format!("{}1.0.0{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(normalize_header_text(&shallow).unwrap(), "1.0.0");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for text in ["[1.0.0] - 2024-01-01", "(`x`)", "plain", "[a] [b]"] {
            let once = normalize_header_text(text).unwrap();
            let twice = normalize_header_text(&once).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date("invalid-date"), None);
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date(" 2024-01-31 "), date(2024, 1, 31));
    }
}
