//! Course-level cohort splitting.
//!
//! Classification is a case-insensitive substring match on the free-text
//! level label, so a label such as "Not the full course" still reads as
//! "full". Profiles can narrow a cohort with exclude patterns.

use teamforge_core::{CohortProfile, EventProfile, Participant};

/// Whether a course-level label selects this cohort by pattern.
pub fn matches_level(cohort: &CohortProfile, level: Option<&str>) -> bool {
    let Some(level) = level else {
        return false;
    };
    if cohort.level_patterns.is_empty() {
        return false;
    }
    let level = level.to_lowercase();
    let contains = |pattern: &String| level.contains(&pattern.trim().to_lowercase());

    cohort.level_patterns.iter().any(contains) && !cohort.exclude_patterns.iter().any(contains)
}

/// Index of the cohort a participant belongs to: the first cohort whose
/// patterns match, otherwise the profile's base cohort.
pub fn classify(participant: &Participant, profile: &EventProfile) -> usize {
    profile
        .cohorts
        .iter()
        .position(|c| matches_level(c, participant.course_level.as_deref()))
        .or_else(|| profile.base_cohort_index())
        .unwrap_or(0)
}

/// Partition roster indices into one sub-roster per cohort, preserving
/// roster order within each.
pub fn split_roster(roster: &[Participant], indices: &[usize], profile: &EventProfile) -> Vec<Vec<usize>> {
    let mut split = vec![Vec::new(); profile.cohorts.len()];
    if split.is_empty() {
        return split;
    }
    for &i in indices {
        split[classify(&roster[i], profile)].push(i);
    }
    split
}
