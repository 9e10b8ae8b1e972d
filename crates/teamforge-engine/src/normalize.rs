//! Roster normalization applied before any pass runs.

use teamforge_core::Participant;

/// Trim every text field, uppercase track codes, and turn blank optional
/// fields into absent ones.
pub fn normalize_roster(roster: &[Participant]) -> Vec<Participant> {
    roster.iter().map(normalize_participant).collect()
}

pub fn normalize_participant(participant: &Participant) -> Participant {
    Participant {
        email: participant.email.trim().to_string(),
        name: participant.name.trim().to_string(),
        track: non_blank(&participant.track).map(|t| t.to_uppercase()),
        batch: non_blank(&participant.batch),
        course_level: non_blank(&participant.course_level),
        employed: participant.employed,
        prior_experience: participant.prior_experience,
        time_zone: non_blank(&participant.time_zone),
        expertise: non_blank(&participant.expertise),
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
