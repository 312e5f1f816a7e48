//! Heuristic tier: deterministic keyword scoring, no network.
//!
//! Algorithm:
//! 1. skills     = base + per_hit × distinct skill terms
//! 2. experience = base + per_indicator × distinct experience terms + per_year × distinct years
//! 3. format     = base + per_header × distinct heading lines (+ bonus for longer documents)
//! 4. overall    = weighted mean of the three, using the configured weights
//!
//! Narratives are picked from fixed second-person templates keyed on the same
//! counts, so identical text always produces an identical card.

use async_trait::async_trait;

use super::candidate_name::{candidate_first_name, CANDIDATE_PLACEHOLDER};
use super::taxonomy::{self, EXPERIENCE_TERMS, SKILL_TERMS};
use super::{clamp_score, text_len, ScoreCard, ScoringTier, Tier, TierError, MAX_SUB_SCORE};

/// How many matched skills are named in the strengths narrative.
const SKILLS_NAMED: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicConfig {
    pub weight_skills: f64,
    pub weight_experience: f64,
    pub weight_format: f64,
    pub skill_base: f64,
    pub skill_per_hit: f64,
    pub experience_base: f64,
    pub experience_per_indicator: f64,
    pub experience_per_year: f64,
    pub format_base: f64,
    pub format_per_header: f64,
    pub format_length_bonus: f64,
    /// Non-empty line count at which the length bonus applies.
    pub format_length_lines: usize,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            weight_skills: 0.4,
            weight_experience: 0.4,
            weight_format: 0.2,
            skill_base: 2.0,
            skill_per_hit: 1.5,
            experience_base: 2.0,
            experience_per_indicator: 1.0,
            experience_per_year: 0.5,
            format_base: 3.0,
            format_per_header: 1.5,
            format_length_bonus: 1.0,
            format_length_lines: 15,
        }
    }
}

/// Raw counts the scores and narratives are derived from.
#[derive(Debug, Clone, PartialEq)]
struct Signals {
    skills: Vec<&'static str>,
    indicators: usize,
    years: usize,
    headers: usize,
    lines: usize,
}

impl Signals {
    fn collect(text: &str) -> Self {
        let lower = text.to_lowercase();
        Self {
            skills: taxonomy::matched_terms(&lower, SKILL_TERMS),
            indicators: taxonomy::matched_terms(&lower, EXPERIENCE_TERMS).len(),
            years: taxonomy::distinct_years(text),
            headers: taxonomy::section_headers(text),
            lines: text.lines().filter(|l| !l.trim().is_empty()).count(),
        }
    }
}

pub struct HeuristicTier {
    config: HeuristicConfig,
    min_text_chars: usize,
}

impl HeuristicTier {
    pub fn new(config: HeuristicConfig, min_text_chars: usize) -> Self {
        Self {
            config,
            min_text_chars,
        }
    }

    /// Scores `text` without any eligibility check.
    pub fn score_text(&self, text: &str) -> ScoreCard {
        let signals = Signals::collect(text);
        let c = &self.config;

        let skills = bounded(c.skill_base + c.skill_per_hit * signals.skills.len() as f64);
        let experience = bounded(
            c.experience_base
                + c.experience_per_indicator * signals.indicators as f64
                + c.experience_per_year * signals.years as f64,
        );
        let length_bonus = if signals.lines >= c.format_length_lines {
            c.format_length_bonus
        } else {
            0.0
        };
        let format =
            bounded(c.format_base + c.format_per_header * signals.headers as f64 + length_bonus);

        let weight_sum = c.weight_skills + c.weight_experience + c.weight_format;
        let overall = if weight_sum > 0.0 {
            bounded(
                (c.weight_skills * skills + c.weight_experience * experience + c.weight_format * format)
                    / weight_sum,
            )
        } else {
            0.0
        };

        let name = candidate_first_name(text);

        ScoreCard {
            tier: Tier::Heuristic,
            score_overall: overall,
            score_format: format,
            score_skills: skills,
            score_experience: experience,
            strengths: strengths(&name, &signals, experience),
            weaknesses: weaknesses(&signals),
            suggestions: suggestions(&signals),
            candidate_name: Some(name),
        }
    }
}

#[async_trait]
impl ScoringTier for HeuristicTier {
    fn tier(&self) -> Tier {
        Tier::Heuristic
    }

    fn accepts(&self, text: &str) -> bool {
        text_len(text) > self.min_text_chars
    }

    async fn score(&self, text: &str) -> Result<ScoreCard, TierError> {
        Ok(self.score_text(text))
    }
}

/// Clamps to [0, 10] and rounds to one decimal place.
fn bounded(value: f64) -> f64 {
    (clamp_score(value, MAX_SUB_SCORE) * 10.0).round() / 10.0
}

fn strengths(name: &str, signals: &Signals, experience: f64) -> String {
    let greeting = if name == CANDIDATE_PLACEHOLDER {
        String::new()
    } else {
        format!("{name}, ")
    };
    let named = signals
        .skills
        .iter()
        .take(SKILLS_NAMED)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = match signals.skills.len() {
        n if n >= 6 => format!("{greeting}you bring an impressive technical toolkit: {named}."),
        n if n >= 3 => format!("{greeting}you show solid technical breadth with {named}."),
        n if n >= 1 => format!(
            "{greeting}you mention {named}, which gives recruiters something concrete to match on."
        ),
        _ => format!("{greeting}your resume is readable and gives a clear starting point."),
    };
    if experience >= 7.0 {
        out.push_str(" Your experience section signals real ownership and seniority.");
    } else if signals.years >= 2 {
        out.push_str(" Your dated entries make your timeline easy to follow.");
    }
    capitalize_first(out)
}

fn weaknesses(signals: &Signals) -> String {
    let mut notes = Vec::new();
    if signals.skills.len() < 3 {
        notes.push("Your resume names few concrete technologies, so keyword searches may miss you.");
    }
    if signals.years == 0 {
        notes.push("You don't list dates, which makes it hard to judge how recent your experience is.");
    }
    if signals.headers < 3 {
        notes.push("Your resume lacks clear section headings such as Experience, Education and Skills.");
    }
    if notes.is_empty() {
        notes.push("No major gaps stood out; your remaining gains are in polish and quantified impact.");
    }
    notes.join(" ")
}

fn suggestions(signals: &Signals) -> String {
    let mut notes = Vec::new();
    if signals.headers < 3 {
        notes.push("Organize your resume under headings like Summary, Experience, Education and Skills.");
    }
    if signals.skills.len() < 6 {
        notes.push("Add a dedicated skills section listing the tools and languages you use day to day.");
    }
    if signals.indicators < 4 {
        notes.push("Describe each role with action verbs (led, built, delivered) and quantify the outcome.");
    }
    if signals.years == 0 {
        notes.push("Add start and end dates to each position.");
    }
    if notes.is_empty() {
        notes.push("Tailor your summary to each role you apply for and keep quantifying your impact.");
    }
    notes.join(" ")
}

fn capitalize_first(s: String) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => first.to_uppercase().chain(chars).collect(),
        _ => s,
    }
}
