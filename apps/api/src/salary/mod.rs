//! Salary estimator — pure, deterministic math over static market tables.
//!
//! `estimate = base range by title × (1 + 0.1 per year of experience)
//!           × location factor × (1 + capped skill boost)`
//! where the skill boost is the sum of per-skill premiums, capped at 0.5.

pub mod handlers;

use serde::{Deserialize, Serialize};

/// Location salary adjustment factors.
const LOCATION_FACTORS: &[(&str, f64)] = &[
    ("san_francisco", 1.5),
    ("new_york", 1.4),
    ("seattle", 1.3),
    ("austin", 1.2),
    ("chicago", 1.15),
    ("boston", 1.25),
    ("los_angeles", 1.35),
    ("denver", 1.1),
    ("remote", 1.0),
    ("other", 0.9),
];

/// Per-skill salary multipliers.
const SKILL_MULTIPLIERS: &[(&str, f64)] = &[
    ("javascript", 1.1),
    ("python", 1.15),
    ("java", 1.05),
    ("react", 1.12),
    ("angular", 1.08),
    ("vue", 1.07),
    ("node", 1.1),
    ("aws", 1.2),
    ("azure", 1.15),
    ("gcp", 1.18),
    ("docker", 1.08),
    ("kubernetes", 1.15),
    ("sql", 1.05),
    ("nosql", 1.08),
    ("machine_learning", 1.25),
    ("data_science", 1.2),
    ("devops", 1.15),
    ("mobile", 1.1),
    ("ios", 1.12),
    ("android", 1.1),
    ("ui_ux", 1.08),
    ("product_management", 1.15),
];

/// Base salary ranges by job title.
const BASE_SALARY_BY_TITLE: &[(&str, SalaryBand)] = &[
    ("frontend_developer", SalaryBand { min: 70_000, max: 120_000 }),
    ("backend_developer", SalaryBand { min: 80_000, max: 130_000 }),
    ("fullstack_developer", SalaryBand { min: 85_000, max: 140_000 }),
    ("data_scientist", SalaryBand { min: 90_000, max: 150_000 }),
    ("devops_engineer", SalaryBand { min: 90_000, max: 145_000 }),
    ("product_manager", SalaryBand { min: 95_000, max: 160_000 }),
    ("designer", SalaryBand { min: 65_000, max: 110_000 }),
    ("mobile_developer", SalaryBand { min: 80_000, max: 135_000 }),
    ("other", SalaryBand { min: 60_000, max: 100_000 }),
];

/// Skill suggestions shown per job title.
const SKILL_SUGGESTIONS_BY_TITLE: &[(&str, &[&str])] = &[
    ("frontend_developer", &["javascript", "react", "angular", "vue", "html", "css"]),
    ("backend_developer", &["python", "java", "node", "sql", "nosql"]),
    ("fullstack_developer", &["javascript", "python", "react", "node", "sql"]),
    ("data_scientist", &["python", "machine_learning", "data_science", "sql"]),
    ("devops_engineer", &["aws", "azure", "docker", "kubernetes", "devops"]),
    ("product_manager", &["product_management", "ui_ux"]),
    ("designer", &["ui_ux"]),
    ("mobile_developer", &["mobile", "ios", "android", "react"]),
];

/// Total skill boost is capped at +50%.
const MAX_SKILL_BOOST: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SalaryBand {
    pub min: u64,
    pub max: u64,
}

#[derive(Debug, Deserialize)]
pub struct SalaryInput {
    pub job_title: String,
    pub years_experience: u32,
    pub location: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Computes the adjusted salary band for the given inputs. Unknown titles
/// and locations fall back to the `other` entries.
pub fn estimate_salary(input: &SalaryInput) -> SalaryBand {
    let base = lookup(BASE_SALARY_BY_TITLE, &input.job_title)
        .unwrap_or_else(|| lookup(BASE_SALARY_BY_TITLE, "other").expect("other band"));

    let experience_multiplier = 1.0 + input.years_experience as f64 * 0.1;

    let location_multiplier = lookup(LOCATION_FACTORS, &input.location)
        .unwrap_or_else(|| lookup(LOCATION_FACTORS, "other").expect("other factor"));

    let skill_multiplier = if input.skills.is_empty() {
        1.0
    } else {
        let boost: f64 = input
            .skills
            .iter()
            .map(|s| lookup(SKILL_MULTIPLIERS, s).unwrap_or(1.0) - 1.0)
            .sum();
        1.0 + boost.min(MAX_SKILL_BOOST)
    };

    let adjust =
        |v: u64| (v as f64 * experience_multiplier * location_multiplier * skill_multiplier).round() as u64;

    SalaryBand {
        min: adjust(base.min),
        max: adjust(base.max),
    }
}

/// Skills commonly associated with a job title, minus ones already selected.
pub fn suggested_skills(job_title: &str, selected: &[String]) -> Vec<String> {
    lookup(SKILL_SUGGESTIONS_BY_TITLE, job_title)
        .unwrap_or_default()
        .iter()
        .filter(|s| !selected.iter().any(|sel| sel == *s))
        .map(|s| s.to_string())
        .collect()
}

fn lookup<T: Copy>(table: &[(&str, T)], key: &str) -> Option<T> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, years: u32, location: &str, skills: &[&str]) -> SalaryInput {
        SalaryInput {
            job_title: title.to_string(),
            years_experience: years,
            location: location.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_base_case_remote_no_skills() {
        // 70k..120k × 1.3 (3 years) × 1.0 (remote) × 1.0
        let band = estimate_salary(&input("frontend_developer", 3, "remote", &[]));
        assert_eq!(band, SalaryBand { min: 91_000, max: 156_000 });
    }

    #[test]
    fn test_unknown_title_and_location_fall_back_to_other() {
        // 60k..100k × 1.0 × 0.9
        let band = estimate_salary(&input("astronaut", 0, "mars", &[]));
        assert_eq!(band, SalaryBand { min: 54_000, max: 90_000 });
    }

    #[test]
    fn test_skill_boost_applies() {
        // aws (+0.2) and python (+0.15) → ×1.35
        let band = estimate_salary(&input("backend_developer", 0, "remote", &["aws", "python"]));
        assert_eq!(band, SalaryBand { min: 108_000, max: 175_500 });
    }

    #[test]
    fn test_skill_boost_is_capped_at_half() {
        let many = ["machine_learning", "data_science", "aws", "gcp", "kubernetes"];
        let band = estimate_salary(&input("other", 0, "remote", &many));
        // Sum of premiums is 0.25+0.2+0.2+0.18+0.15 = 0.98, capped at 0.5
        assert_eq!(band, SalaryBand { min: 90_000, max: 150_000 });
    }

    #[test]
    fn test_unknown_skills_contribute_nothing() {
        let band = estimate_salary(&input("other", 0, "remote", &["cobol"]));
        assert_eq!(band, SalaryBand { min: 60_000, max: 100_000 });
    }

    #[test]
    fn test_suggestions_exclude_selected_skills() {
        let selected = vec!["react".to_string()];
        let suggestions = suggested_skills("frontend_developer", &selected);
        assert!(!suggestions.contains(&"react".to_string()));
        assert!(suggestions.contains(&"javascript".to_string()));
    }

    #[test]
    fn test_suggestions_for_unknown_title_are_empty() {
        assert!(suggested_skills("astronaut", &[]).is_empty());
    }
}
