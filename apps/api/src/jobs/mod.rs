//! Job board: listings with per-user match scores, saved jobs, applications.

pub mod handlers;

/// Percentage of a job's requirements covered by the resume's keywords.
///
/// A requirement counts as covered when it and a keyword contain each other
/// as case-insensitive substrings, in either direction ("node" matches
/// "node.js" and vice versa). No resume keywords or no requirements means 0.
pub fn job_match_percentage(requirements: &[String], keywords: &[String]) -> f64 {
    if requirements.is_empty() || keywords.is_empty() {
        return 0.0;
    }

    let matching = requirements
        .iter()
        .filter(|req| {
            let req = req.to_lowercase();
            keywords.iter().any(|kw| {
                let kw = kw.to_lowercase();
                kw.contains(&req) || req.contains(&kw)
            })
        })
        .count();

    matching as f64 / requirements.len() as f64 * 100.0
}

/// Splits a comma-separated requirements field into trimmed, non-empty
/// entries, as entered on the posting form.
pub fn split_requirements(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_keywords_scores_zero() {
        let reqs = strings(&["react", "aws"]);
        assert_eq!(job_match_percentage(&reqs, &[]), 0.0);
    }

    #[test]
    fn test_no_requirements_scores_zero() {
        let kws = strings(&["react"]);
        assert_eq!(job_match_percentage(&[], &kws), 0.0);
    }

    #[test]
    fn test_exact_fraction_of_requirements() {
        let reqs = strings(&["react", "aws", "kubernetes", "go"]);
        let kws = strings(&["react", "aws", "python"]);
        assert_eq!(job_match_percentage(&reqs, &kws), 50.0);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let reqs = strings(&["React", "AWS"]);
        let kws = strings(&["react", "aws"]);
        assert_eq!(job_match_percentage(&reqs, &kws), 100.0);
    }

    #[test]
    fn test_substring_matches_both_directions() {
        // keyword contains requirement
        let reqs = strings(&["node"]);
        let kws = strings(&["node.js"]);
        assert_eq!(job_match_percentage(&reqs, &kws), 100.0);

        // requirement contains keyword
        let reqs = strings(&["javascript frameworks"]);
        let kws = strings(&["javascript"]);
        assert_eq!(job_match_percentage(&reqs, &kws), 100.0);
    }

    #[test]
    fn test_unrelated_terms_do_not_match() {
        let reqs = strings(&["rust", "embedded"]);
        let kws = strings(&["react", "marketing"]);
        assert_eq!(job_match_percentage(&reqs, &kws), 0.0);
    }

    #[test]
    fn test_split_requirements_trims_and_drops_empties() {
        assert_eq!(
            split_requirements("React, AWS , , Kubernetes"),
            vec!["React", "AWS", "Kubernetes"]
        );
        assert!(split_requirements("").is_empty());
        assert!(split_requirements(" , ,").is_empty());
    }
}
