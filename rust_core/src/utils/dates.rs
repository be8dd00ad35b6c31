//! Heterogeneous date parsing.
//!
//! Sources disagree on date formatting: dotted day-first (`01.03.2024`),
//! two-digit years (`01.03.24`), ISO (`2024-03-01`), slashes, and dates
//! embedded mid-prose. Parsing never fails loudly; unrecognized text yields
//! `None` and the caller drops the row.

use chrono::NaiveDate;

/// Parse free date text into a calendar date.
///
/// Tries the exact supported formats first, then falls back to scanning the
/// text for the first embedded date-shaped token. Two-digit years are read
/// as the 2000s. Returns `None` for anything unrecognized or not a valid
/// calendar date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(date) = parse_exact(trimmed) {
        return Some(date);
    }

    // Fuzzy fallback for dates embedded in prose.
    for token in date_tokens(trimmed) {
        if let Some(date) = parse_exact(&token) {
            return Some(date);
        }
    }

    None
}

/// True when the text contains something date-shaped, parseable or not.
///
/// Lets the canonicalizer distinguish "no date cell at all" from "a date
/// cell we could not read".
pub fn looks_like_date(text: &str) -> bool {
    !date_tokens(text.trim()).is_empty()
}

/// Parse one token that is exactly a date, in any supported format.
fn parse_exact(token: &str) -> Option<NaiveDate> {
    // ISO: YYYY-MM-DD
    if let Some((y, rest)) = token.split_once('-') {
        if y.len() == 4 {
            let (m, d) = rest.split_once('-')?;
            return build_date(d.parse().ok()?, m.parse().ok()?, y.parse().ok()?);
        }
    }

    // Day-first with dots or slashes: DD.MM.YYYY / DD.MM.YY
    let parts: Vec<&str> = token.split(['.', '/']).collect();
    if parts.len() != 3 {
        return None;
    }
    let day: u32 = parts[0].parse().ok()?;
    let month: u32 = parts[1].parse().ok()?;
    let year: i32 = match parts[2].len() {
        // Two-digit years are normalized by prefixing 20.
        2 => 2000 + parts[2].parse::<i32>().ok()?,
        4 => parts[2].parse().ok()?,
        _ => return None,
    };
    build_date(day, month, year)
}

fn build_date(day: u32, month: u32, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Extract date-shaped tokens from prose.
fn date_tokens(text: &str) -> Vec<String> {
    let pattern = r"\d{4}-\d{2}-\d{2}|\d{1,2}[./]\d{1,2}[./]\d{2,4}";
    let Some(re) = regex::Regex::new(pattern).ok() else {
        return Vec::new();
    };
    re.find_iter(text).map(|m| m.as_str().to_string()).collect()
}
