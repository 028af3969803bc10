#![allow(dead_code)]

//! ATS scoring — pluggable, trait-based scorer over extracted resume text.
//!
//! Default: `LlmAtsScorer`, which asks the chat-completion endpoint for an
//! analysis and silently degrades to `analyze_locally` on any transport,
//! status, or parse failure. Scoring never fails the upload flow.
//!
//! `AppState` holds an `Arc<dyn AtsScorer>`.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::llm_client::{LlmClient, ATS_MODEL};
use crate::upload::prompts::ATS_SYSTEM_PROMPT;

/// Keyword inventory for the local heuristic.
const COMMON_KEYWORDS: &[&str] = &[
    "javascript",
    "typescript",
    "react",
    "node",
    "python",
    "java",
    "c#",
    "c++",
    "aws",
    "azure",
    "gcp",
    "cloud",
    "devops",
    "docker",
    "kubernetes",
    "agile",
    "scrum",
    "project management",
    "leadership",
    "communication",
    "frontend",
    "backend",
    "fullstack",
    "database",
    "sql",
    "nosql",
    "analytics",
    "data science",
    "machine learning",
    "ai",
    "software",
    "developer",
    "engineer",
    "development",
    "architecture",
    "testing",
    "qa",
    "quality",
];

/// Generic recommendations returned by the local heuristic.
const FALLBACK_RECOMMENDATIONS: &[&str] = &[
    "Include more specific technical skills relevant to your target role",
    "Quantify your achievements with numbers and metrics",
    "Make sure your resume is properly formatted for ATS systems",
    "Include relevant keywords from job descriptions",
    "Keep your resume concise and focused on relevant experience",
];

const MAX_KEYWORDS: usize = 15;
const MAX_RECOMMENDATIONS: usize = 5;

/// Applied when a score is missing or not a finite number.
pub const DEFAULT_ATS_SCORE: f64 = 70.0;

/// A well-formed resume analysis: score always finite and in 0–100,
/// keyword and recommendation lists always present.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeAnalysis {
    pub ats_score: f64,
    pub keywords: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Tagged scorer output: which path produced the analysis.
/// Never a bare duck-typed object — both variants carry normalized data.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreResult {
    /// Parsed from the external analyzer's JSON response.
    Parsed(ResumeAnalysis),
    /// Computed by the local keyword/length heuristic.
    Fallback(ResumeAnalysis),
}

impl ScoreResult {
    pub fn analysis(&self) -> &ResumeAnalysis {
        match self {
            ScoreResult::Parsed(a) | ScoreResult::Fallback(a) => a,
        }
    }

    pub fn into_analysis(self) -> ResumeAnalysis {
        match self {
            ScoreResult::Parsed(a) | ScoreResult::Fallback(a) => a,
        }
    }
}

/// Raw analysis shape from the external analyzer. Every field is optional;
/// normalization fills the gaps.
#[derive(Debug, Deserialize)]
pub struct RawAnalysis {
    pub ats_score: Option<f64>,
    pub keywords: Option<Vec<String>>,
    pub recommendations: Option<Vec<String>>,
}

#[async_trait]
pub trait AtsScorer: Send + Sync {
    /// Scores sanitized resume text. Always produces a well-formed result.
    async fn analyze(&self, content: &str) -> ScoreResult;
}

/// LLM-primary scorer with the local heuristic as its silent fallback.
pub struct LlmAtsScorer {
    llm: LlmClient,
}

impl LlmAtsScorer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl AtsScorer for LlmAtsScorer {
    async fn analyze(&self, content: &str) -> ScoreResult {
        match self
            .llm
            .chat_json::<RawAnalysis>(ATS_MODEL, ATS_SYSTEM_PROMPT, content)
            .await
        {
            Ok(raw) => ScoreResult::Parsed(normalize(raw)),
            Err(e) => {
                // Scoring errors are never surfaced to the caller
                warn!("ATS analysis failed, using local fallback: {e}");
                ScoreResult::Fallback(analyze_locally(content))
            }
        }
    }
}

/// Local heuristic scorer. Used directly in tests and available as a
/// zero-dependency backend.
pub struct LocalAtsScorer;

#[async_trait]
impl AtsScorer for LocalAtsScorer {
    async fn analyze(&self, content: &str) -> ScoreResult {
        ScoreResult::Fallback(analyze_locally(content))
    }
}

/// Normalizes a raw external analysis into a well-formed one: missing or
/// non-finite scores become [`DEFAULT_ATS_SCORE`], scores are clamped to
/// 0–100, missing arrays become empty.
pub fn normalize(raw: RawAnalysis) -> ResumeAnalysis {
    let ats_score = match raw.ats_score {
        Some(s) if s.is_finite() => s.clamp(0.0, 100.0),
        _ => DEFAULT_ATS_SCORE,
    };
    ResumeAnalysis {
        ats_score,
        keywords: raw.keywords.unwrap_or_default(),
        recommendations: raw.recommendations.unwrap_or_default(),
    }
}

/// Keyword/length heuristic:
/// - keyword signal: fraction of [`COMMON_KEYWORDS`] found in the text
///   (case-insensitive substring), `min(100, found/10 * 100)`
/// - length signal: `min(100, len/3000 * 100)`
/// - score: `round(0.7 * keyword + 0.3 * length)`
///
/// At most 15 matched keywords, at most 5 generic recommendations.
pub fn analyze_locally(content: &str) -> ResumeAnalysis {
    let haystack = content.to_lowercase();

    let found_keywords: Vec<String> = COMMON_KEYWORDS
        .iter()
        .filter(|kw| haystack.contains(&kw.to_lowercase()))
        .take(MAX_KEYWORDS)
        .map(|kw| kw.to_string())
        .collect();

    let keyword_score = (found_keywords.len() as f64 / 10.0 * 100.0).min(100.0);
    let length_score = (content.len() as f64 / 3000.0 * 100.0).min(100.0);
    let final_score = (keyword_score * 0.7 + length_score * 0.3).round();

    ResumeAnalysis {
        ats_score: final_score,
        keywords: found_keywords,
        recommendations: FALLBACK_RECOMMENDATIONS
            .iter()
            .take(MAX_RECOMMENDATIONS)
            .map(|r| r.to_string())
            .collect(),
    }
}
