//! Reconciliation and statistics.
//!
//! Turns cohort outcomes into the final [`AllocationResult`]: drops empty
//! teams, works out who was left unassigned, and computes per-team and
//! aggregate statistics.

use std::collections::{BTreeMap, HashSet};

use tracing::{info, warn};

use teamforge_core::{
    AllocationResult, AllocationStats, CohortSummary, Participant, Team, TeamStats, percentage,
};

use crate::pool::CohortOutcome;

/// Distribution counts for one team's members.
pub fn team_stats(members: &[Participant], capacity: usize) -> TeamStats {
    let mut stats = TeamStats {
        size: members.len(),
        capacity,
        ..Default::default()
    };
    for member in members {
        *stats.tracks.entry(member.track_label().to_string()).or_insert(0) += 1;
        *stats.time_zones.entry(member.time_zone_bucket()).or_insert(0) += 1;
        *stats.expertise.entry(member.expertise_level()).or_insert(0) += 1;
        stats.employed += usize::from(member.employed);
        stats.experienced += usize::from(member.prior_experience);
    }
    stats
}

/// Roster entries absent from the placed identities.
///
/// Only the first roster entry with a given identity can be the one that
/// was placed; later entries with the same email are reported unassigned.
pub fn find_unassigned(roster: &[Participant], placed: &HashSet<String>) -> Vec<Participant> {
    let mut claimed = HashSet::new();
    roster
        .iter()
        .filter(|p| {
            let key = p.identity_key();
            !(placed.contains(&key) && claimed.insert(key))
        })
        .cloned()
        .collect()
}

/// Assemble the result for a non-empty roster.
pub fn reconcile(
    event: &str,
    roster: &[Participant],
    outcomes: Vec<CohortOutcome>,
    duplicate_identities: usize,
) -> AllocationResult {
    let mut placed = HashSet::new();
    let mut teams = Vec::new();
    let mut cohorts = Vec::new();
    let mut overflow_assignments = 0;

    for outcome in outcomes {
        let before = teams.len();
        for draft in outcome.teams {
            if draft.members.is_empty() {
                continue;
            }
            let members: Vec<Participant> = draft.members.iter().map(|&i| roster[i].clone()).collect();
            let stats = team_stats(&members, draft.capacity);
            teams.push(Team {
                name: draft.name,
                cohort: outcome.cohort.clone(),
                capacity: draft.capacity,
                members,
                stats,
            });
        }
        let cohort_teams = &teams[before..];
        cohorts.push(CohortSummary {
            name: outcome.cohort.clone(),
            participants: outcome.participants,
            teams: cohort_teams.len(),
            assigned: cohort_teams.iter().map(Team::len).sum(),
        });
        overflow_assignments += outcome.overflow_assignments;
        placed.extend(outcome.placed);
    }

    let unassigned = find_unassigned(roster, &placed);
    let stats = collect_stats(roster.len(), &teams, &unassigned, cohorts, overflow_assignments, duplicate_identities);

    if stats.overflowing_teams > 0 {
        info!(
            teams = stats.overflowing_teams,
            placements = stats.overflow_assignments,
            "teams exceed target capacity after fallback placement"
        );
    }
    if stats.unassigned > 0 {
        warn!(unassigned = stats.unassigned, "some participants were not placed");
    }

    let summary = summarize(event, &teams, &stats);
    AllocationResult {
        event: event.to_string(),
        teams,
        unassigned,
        stats,
        summary,
        seed: None,
    }
}

fn collect_stats(
    total: usize,
    teams: &[Team],
    unassigned: &[Participant],
    cohorts: Vec<CohortSummary>,
    overflow_assignments: usize,
    duplicate_identities: usize,
) -> AllocationStats {
    let assigned: usize = teams.iter().map(Team::len).sum();

    let mut track_totals = BTreeMap::new();
    for team in teams {
        for (track, count) in &team.stats.tracks {
            *track_totals.entry(track.clone()).or_insert(0) += count;
        }
    }

    AllocationStats {
        total_participants: total,
        assigned,
        unassigned: unassigned.len(),
        assignment_rate: percentage(assigned, total),
        team_count: teams.len(),
        overflowing_teams: teams.iter().filter(|t| t.exceeds_capacity()).count(),
        overflow_assignments,
        duplicate_identities,
        track_totals,
        employed: teams.iter().map(|t| t.stats.employed).sum(),
        experienced: teams.iter().map(|t| t.stats.experienced).sum(),
        cohorts,
    }
}

/// Multi-line summary for reports.
pub fn summarize(event: &str, teams: &[Team], stats: &AllocationStats) -> String {
    let mut out = format!("Created {} teams for {event}\n", teams.len());
    out.push_str(&format!("Total participants: {}\n", stats.total_participants));
    out.push_str(&format!(
        "Assigned: {} ({})\n",
        stats.assigned,
        stats.assignment_rate_label()
    ));

    if stats.cohorts.len() > 1 {
        for cohort in &stats.cohorts {
            out.push_str(&format!(
                "{}: {} participants in {} teams\n",
                cohort.name, cohort.assigned, cohort.teams
            ));
        }
    }

    let tracks: Vec<String> = stats
        .track_totals
        .iter()
        .map(|(track, count)| format!("{track}: {count}"))
        .collect();
    out.push_str(&format!(
        "Distribution - {}, Working: {}, Previous Event: {}\n",
        tracks.join(", "),
        stats.employed,
        stats.experienced
    ));

    if stats.overflowing_teams > 0 {
        out.push_str(&format!("Teams over target size: {}\n", stats.overflowing_teams));
    }
    if stats.unassigned > 0 {
        out.push_str(&format!("Unassigned participants: {}\n", stats.unassigned));
    }
    out
}
