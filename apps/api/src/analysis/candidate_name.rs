//! Candidate-name heuristic: guesses a first name from the top of a resume.

use super::taxonomy::SKILL_TERMS;

pub const CANDIDATE_PLACEHOLDER: &str = "Candidate";

/// Only the first few non-empty lines are considered.
const MAX_LINES_SCANNED: usize = 5;

/// Lines containing any of these words are headers, contact rows or titles.
const NON_NAME_WORDS: &[&str] = &[
    "resume", "curriculum", "vitae", "cv", "contact", "email", "phone", "address", "mobile",
    "linkedin", "github", "engineer", "developer", "manager", "designer", "analyst",
    "scientist", "consultant", "summary", "objective", "profile", "experience", "education",
    "skills",
];

/// Leading titles dropped before the first name is picked.
const HONORIFICS: &[&str] = &["dr", "mr", "mrs", "ms", "mx", "prof"];

/// Returns the title-cased first name, or `CANDIDATE_PLACEHOLDER`.
pub fn candidate_first_name(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(MAX_LINES_SCANNED)
        .filter(|line| !is_non_name_line(line))
        .find_map(first_name_from_line)
        .unwrap_or_else(|| CANDIDATE_PLACEHOLDER.to_string())
}

fn is_non_name_line(line: &str) -> bool {
    if line.contains('@') || line.chars().any(|c| c.is_ascii_digit()) {
        return true;
    }
    let lower = line.to_lowercase();
    lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| NON_NAME_WORDS.contains(&word))
}

/// A name line is 2 to 4 capitalized tokens once parentheticals and
/// honorifics are removed, and is not mostly skill keywords.
fn first_name_from_line(line: &str) -> Option<String> {
    let cleaned = strip_parentheticals(line);
    let tokens: Vec<&str> = cleaned
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .filter(|t| !HONORIFICS.contains(&normalized(t).as_str()))
        .collect();

    if !(2..=4).contains(&tokens.len()) || !tokens.iter().all(|t| is_name_token(t)) {
        return None;
    }

    let skills = tokens
        .iter()
        .filter(|t| SKILL_TERMS.contains(&normalized(t).as_str()))
        .count();
    if skills * 2 > tokens.len() {
        return None;
    }

    let first = tokens[0].trim_matches(|c: char| !c.is_alphabetic());
    if first.is_empty() {
        return None;
    }
    Some(title_case(first))
}

fn normalized(token: &str) -> String {
    token.trim_end_matches('.').to_lowercase()
}

fn is_name_token(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() && c.is_uppercase() => {
            chars.all(|c| c.is_alphabetic() || matches!(c, '-' | '\'' | '.'))
        }
        _ => false,
    }
}

/// Drops `( ... )` spans; an unclosed `(` drops the remainder of the line.
fn strip_parentheticals(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut depth = 0usize;
    for c in line.chars() {
        match c {
            '(' => depth += 1,
            ')' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
