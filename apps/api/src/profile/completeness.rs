use crate::models::profile::ProfileRow;

/// Percentage of profile fields that are filled in. Five free-text fields
/// count; the account email never does.
pub fn completion_percentage(profile: &ProfileRow) -> f64 {
    let fields = [
        &profile.full_name,
        &profile.title,
        &profile.company,
        &profile.location,
        &profile.bio,
    ];
    let filled = fields
        .iter()
        .filter(|f| f.as_deref().is_some_and(|s| !s.trim().is_empty()))
        .count();
    filled as f64 / fields.len() as f64 * 100.0
}
