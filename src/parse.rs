//! Listing-title parsing.
//!
//! Marketplace titles are free text ("2020 Prizm Justin Herbert Silver PSA 10").
//! These helpers pull out the grading label and the parallel/insert keyword
//! that the aggregation step groups sales by.

use std::fmt;

use crate::config::{self, GRADING_COMPANIES};
use crate::models::Condition;

/// A grading label found in a title, e.g. `PSA 10`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GradeTag {
    pub company: &'static str,
    pub grade: u32,
}

impl GradeTag {
    /// The calculator condition this tag corresponds to, if any.
    pub fn condition(&self) -> Option<Condition> {
        match (self.company, self.grade) {
            ("PSA", 9) => Some(Condition::Psa9),
            ("PSA", 10) => Some(Condition::Psa10),
            _ => None,
        }
    }
}

impl fmt::Display for GradeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.company, self.grade)
    }
}

/// Label stored for sales without a grade.
pub const RAW_LABEL: &str = "Raw";

/// Find the leftmost `<company> <number>` label in a title, case-insensitively.
///
/// Whitespace between the company and the number is optional. A company name
/// with no number after it (e.g. "PSA ready") yields no tag.
pub fn parse_grade(title: &str) -> Option<GradeTag> {
    let upper = title.to_ascii_uppercase();
    let bytes = upper.as_bytes();

    let mut best: Option<(usize, GradeTag)> = None;
    for company in GRADING_COMPANIES {
        let mut search_from = 0;
        while let Some(rel) = upper[search_from..].find(company) {
            let start = search_from + rel;
            let mut i = start + company.len();
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            let digits_start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i > digits_start {
                if let Ok(grade) = upper[digits_start..i].parse::<u32>() {
                    if best.as_ref().map_or(true, |(pos, _)| start < *pos) {
                        best = Some((start, GradeTag { company, grade }));
                    }
                    break;
                }
            }
            search_from = start + company.len();
        }
    }

    best.map(|(_, tag)| tag)
}

/// The grade label used to bucket a sale: `"PSA 10"`, `"BGS 9"`, or `"Raw"`.
pub fn grade_label(title: &str) -> String {
    parse_grade(title)
        .map(|tag| tag.to_string())
        .unwrap_or_else(|| RAW_LABEL.to_string())
}

/// Whether the title mentions any grading company at all.
pub fn is_graded(title: &str) -> bool {
    let upper = title.to_ascii_uppercase();
    GRADING_COMPANIES.iter().any(|c| upper.contains(c))
}

/// Detect the variation keyword that appears earliest in the title.
///
/// Matching is case-insensitive. When two keywords start at the same
/// position the longer one wins ("Press Proof" over a hypothetical "Press").
pub fn detect_variation(title: &str) -> Option<&'static str> {
    detect_variation_in(title, &config::variation_keywords())
}

/// [`detect_variation`] against a caller-supplied keyword list.
pub fn detect_variation_in(title: &str, keywords: &[&'static str]) -> Option<&'static str> {
    let upper = title.to_ascii_uppercase();
    earliest_by(&upper, keywords.iter().copied(), |kw| kw.to_ascii_uppercase())
}

/// The label that occurs earliest in `title`, case-sensitively.
///
/// Same precedence as [`detect_variation`]: earliest start, then the longer
/// label, then iteration order. Empty labels never match.
pub fn earliest_label<'a, I>(title: &str, labels: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    earliest_by(title, labels, str::to_string)
}

fn earliest_by<'a, I, F>(haystack: &str, labels: I, needle: F) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
    F: Fn(&str) -> String,
{
    let mut best: Option<(usize, &'a str)> = None;

    for label in labels {
        if label.is_empty() {
            continue;
        }
        if let Some(pos) = haystack.find(&needle(label)) {
            let better = match best {
                None => true,
                Some((best_pos, best_label)) => {
                    pos < best_pos || (pos == best_pos && label.len() > best_label.len())
                }
            };
            if better {
                best = Some((pos, label));
            }
        }
    }

    best.map(|(_, label)| label)
}
