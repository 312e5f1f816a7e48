//! Exploratory matching against a fixed set of job archetypes.
//!
//! Each archetype score is the share of its keywords found in the resume,
//! nudged by a uniform draw from `[-jitter, jitter]` so equal overlaps don't
//! always rank in declaration order. The rng is a parameter; pass a seeded
//! `StdRng` (or zero jitter) for reproducible output.

use rand::Rng;
use serde::Serialize;

use crate::analysis::clamp_score;
use crate::analysis::taxonomy::matched_terms;

pub struct Archetype {
    pub title: &'static str,
    pub keywords: &'static [&'static str],
}

pub const ARCHETYPES: &[Archetype] = &[
    Archetype {
        title: "Machine Learning Engineer",
        keywords: &[
            "python", "machine learning", "tensorflow", "pytorch", "deep learning", "nlp",
            "model", "scikit-learn", "mlops", "computer vision",
        ],
    },
    Archetype {
        title: "Software Engineer",
        keywords: &[
            "java", "c++", "python", "golang", "rust", "algorithms", "git", "api",
            "microservices", "testing", "sql",
        ],
    },
    Archetype {
        title: "Data Scientist",
        keywords: &[
            "python", "statistics", "pandas", "numpy", "sql", "data analysis",
            "r programming", "rstudio", "visualization", "tableau", "experiment", "regression",
        ],
    },
    Archetype {
        title: "Web Developer",
        keywords: &[
            "javascript", "typescript", "react", "angular", "vue", "html", "css", "node.js",
            "frontend", "rest api",
        ],
    },
    Archetype {
        title: "Security Engineer",
        keywords: &[
            "security", "penetration testing", "vulnerability", "siem", "incident response",
            "cryptography", "firewall", "owasp", "compliance", "threat",
        ],
    },
    Archetype {
        title: "DevOps Engineer",
        keywords: &[
            "docker", "kubernetes", "terraform", "aws", "azure", "gcp", "ci/cd", "jenkins",
            "linux", "ansible", "monitoring",
        ],
    },
];

/// Transient recommendation; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchetypeMatch {
    pub title: String,
    pub match_score: f64,
    pub matched_keywords: Vec<String>,
}

/// Scores every archetype, sorts descending and keeps the best `top_n`.
pub fn rank_archetypes<R: Rng + ?Sized>(
    text: &str,
    jitter: f64,
    top_n: usize,
    rng: &mut R,
) -> Vec<ArchetypeMatch> {
    let lower = text.to_lowercase();

    let mut ranked: Vec<ArchetypeMatch> = ARCHETYPES
        .iter()
        .map(|archetype| {
            let matched = matched_terms(&lower, archetype.keywords);
            let overlap = matched.len() as f64 / archetype.keywords.len() as f64;
            let noise = if jitter.is_finite() && jitter > 0.0 {
                rng.gen_range(-jitter..=jitter)
            } else {
                0.0
            };
            ArchetypeMatch {
                title: archetype.title.to_string(),
                match_score: clamp_score(overlap + noise, 1.0),
                matched_keywords: matched.into_iter().map(String::from).collect(),
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    ranked.truncate(top_n);
    ranked
}
