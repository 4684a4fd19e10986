//! Section segmentation — splits free-form résumé text into labeled spans by
//! keyword boundaries.
//!
//! This is deliberately a heuristic, not NLP: find a section's start keyword,
//! cut at the next recognized boundary keyword, split the body into entries.
//! It never fails; text with no recognized keywords yields empty sections.

use regex::Regex;
use serde::Serialize;

const EDUCATION_CAP: usize = 5;
const QUALIFICATIONS_CAP: usize = 10;
const PROJECTS_CAP: usize = 5;

/// Contact details pulled from the raw text. Every field is best-effort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersonalInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// A résumé split into labeled sections. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SectionedResume {
    pub personal_info: PersonalInfo,
    pub education: Vec<String>,
    pub qualifications: Vec<String>,
    pub projects: Vec<String>,
}

/// Splits résumé text into labeled sections.
pub fn segment(raw_text: &str) -> SectionedResume {
    // Keyword search runs on an ASCII-uppercased copy. Byte offsets are
    // identical between the two strings, so entry slices come from the
    // original text with casing intact.
    let upper = raw_text.to_ascii_uppercase();

    let education = section_span(&upper, &["EDUCATION"], &["QUALIFICATIONS", "PROJECTS"])
        .map(|(start, end)| split_paragraphs(&raw_text[start..end], EDUCATION_CAP))
        .unwrap_or_default();

    let qualifications = section_span(
        &upper,
        &["QUALIFICATIONS", "SKILLS"],
        &["PROJECTS", "EXPERIENCE"],
    )
    .map(|(start, end)| split_lines(&raw_text[start..end], QUALIFICATIONS_CAP))
    .unwrap_or_default();

    let projects = section_span(&upper, &["PROJECTS"], &["EXPERIENCE", "REFERENCES"])
        .map(|(start, end)| split_paragraphs(&raw_text[start..end], PROJECTS_CAP))
        .unwrap_or_default();

    SectionedResume {
        personal_info: extract_personal_info(raw_text),
        education,
        qualifications,
        projects,
    }
}

/// Byte range of a section body: just after the first start keyword present,
/// up to the first stop keyword found after it, else the end of text.
///
/// Keyword lists are in priority order: `["QUALIFICATIONS", "SKILLS"]` means
/// QUALIFICATIONS wins whenever it appears anywhere, even after SKILLS.
fn section_span(upper: &str, starts: &[&str], stops: &[&str]) -> Option<(usize, usize)> {
    let (idx, keyword) = starts
        .iter()
        .find_map(|k| upper.find(k).map(|i| (i, *k)))?;
    let body_start = idx + keyword.len();
    let body_end = stops
        .iter()
        .find_map(|k| upper[body_start..].find(k))
        .map(|rel| body_start + rel)
        .unwrap_or(upper.len());
    Some((body_start, body_end))
}

/// Blank-line-separated entries, trimmed, empties dropped, capped.
fn split_paragraphs(body: &str, cap: usize) -> Vec<String> {
    body.split("\n\n")
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .take(cap)
        .map(String::from)
        .collect()
}

/// One entry per line, trimmed, empties dropped, capped.
fn split_lines(body: &str, cap: usize) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .take(cap)
        .map(String::from)
        .collect()
}

fn extract_personal_info(text: &str) -> PersonalInfo {
    let first_match = |pattern: &str| {
        Regex::new(pattern)
            .ok()
            .and_then(|re| re.find(text).map(|m| m.as_str().to_string()))
    };

    PersonalInfo {
        name: first_match(r"([A-Z][a-z]+)\s([A-Z][a-z]+)"),
        email: first_match(r"[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]+"),
        phone: first_match(r"\+?\d[\d -]{8,}\d"),
    }
}
