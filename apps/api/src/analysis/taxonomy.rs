//! Fixed keyword taxonomies and whole-term matching shared by the heuristic
//! tier and the job matcher. All terms are lower-case.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

pub const SKILL_TERMS: &[&str] = &[
    "python", "java", "javascript", "typescript", "c++", "c#", "golang", "rust", "ruby",
    "php", "kotlin", "scala", "sql", "nosql", "postgresql", "mysql", "mongodb", "redis",
    "react", "angular", "vue", "node.js", "django", "flask", "html", "css", "aws", "azure",
    "gcp", "docker", "kubernetes", "terraform", "git", "linux", "tensorflow", "pytorch",
    "machine learning", "data analysis", "pandas", "numpy", "graphql", "rest api", "ci/cd",
    "jenkins", "spark", "hadoop", "tableau",
];

pub const EXPERIENCE_TERMS: &[&str] = &[
    "experience", "years", "senior", "lead", "led", "managed", "manager", "principal",
    "architect", "developed", "designed", "implemented", "built", "intern", "internship",
    "engineer", "director", "mentored", "launched", "delivered",
];

pub const SECTION_HEADERS: &[&str] = &[
    "summary", "objective", "profile", "experience", "work experience", "employment",
    "work history", "education", "skills", "technical skills", "projects", "certifications",
    "awards", "publications", "contact", "languages", "volunteer",
];

/// Longest line still treated as a heading.
const MAX_HEADER_WORDS: usize = 3;

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19[5-9]\d|20\d{2})\b").expect("valid year regex"));

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True when `term` occurs in `haystack` with no word characters on either side.
/// Both arguments are expected to be lower-case.
pub fn contains_term(haystack: &str, term: &str) -> bool {
    haystack.match_indices(term).any(|(idx, _)| {
        let before = haystack[..idx].chars().next_back();
        let after = haystack[idx + term.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

/// Terms from `terms` present in `haystack_lower`, in taxonomy order.
pub fn matched_terms<'a>(haystack_lower: &str, terms: &[&'a str]) -> Vec<&'a str> {
    terms
        .iter()
        .copied()
        .filter(|t| contains_term(haystack_lower, t))
        .collect()
}

/// Distinct four-digit years between 1950 and 2099.
pub fn distinct_years(text: &str) -> usize {
    YEAR_PATTERN
        .find_iter(text)
        .map(|m| m.as_str())
        .collect::<BTreeSet<_>>()
        .len()
}

/// Distinct short lines that read as section headings.
pub fn section_headers(text: &str) -> usize {
    text.lines()
        .map(|line| {
            line.trim()
                .trim_end_matches(':')
                .trim()
                .to_lowercase()
        })
        .filter(|line| {
            !line.is_empty()
                && line.split_whitespace().count() <= MAX_HEADER_WORDS
                && SECTION_HEADERS.iter().any(|h| contains_term(line, h))
        })
        .collect::<BTreeSet<_>>()
        .len()
}
