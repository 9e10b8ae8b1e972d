//! Working state for one cohort while its passes run.
//!
//! Teams hold roster indices rather than participant copies. Assignment is
//! recorded in an identity ledger (lower-cased email) updated on every
//! placement, so "who is still unassigned" never requires rescanning teams.

use std::collections::HashSet;

use tracing::debug;

use teamforge_core::Participant;

use crate::sizer::TeamPlan;

/// A team under construction.
#[derive(Debug, Clone)]
pub struct DraftTeam {
    pub name: String,
    pub capacity: usize,
    /// Indices into the normalized roster.
    pub members: Vec<usize>,
}

impl DraftTeam {
    /// Remaining room. Negative once the team has overflowed.
    pub fn remaining(&self) -> i64 {
        self.capacity as i64 - self.members.len() as i64
    }

    pub fn has_room(&self) -> bool {
        self.members.len() < self.capacity
    }
}

/// Teams, cohort members, and the identity ledger for one cohort.
pub struct TeamPool<'r> {
    roster: &'r [Participant],
    teams: Vec<DraftTeam>,
    /// Cohort members as roster indices, in roster order.
    members: Vec<usize>,
    ledger: HashSet<String>,
    overflow_assignments: usize,
}

/// What a cohort hands to the reconciler.
#[derive(Debug, Clone)]
pub struct CohortOutcome {
    pub cohort: String,
    pub participants: usize,
    pub teams: Vec<DraftTeam>,
    pub placed: HashSet<String>,
    pub overflow_assignments: usize,
}

impl CohortOutcome {
    /// Outcome for a cohort nobody was classified into.
    pub fn empty(cohort: &str) -> Self {
        Self {
            cohort: cohort.to_string(),
            participants: 0,
            teams: Vec::new(),
            placed: HashSet::new(),
            overflow_assignments: 0,
        }
    }
}

impl<'r> TeamPool<'r> {
    /// Create empty teams named `"<prefix> <n>"` for the plan.
    pub fn new(roster: &'r [Participant], members: Vec<usize>, plan: &TeamPlan, prefix: &str) -> Self {
        let teams = plan
            .capacities
            .iter()
            .enumerate()
            .map(|(i, &capacity)| DraftTeam {
                name: format!("{prefix} {}", i + 1),
                capacity,
                members: Vec::new(),
            })
            .collect();

        Self {
            roster,
            teams,
            members,
            ledger: HashSet::new(),
            overflow_assignments: 0,
        }
    }

    pub fn participant(&self, index: usize) -> &'r Participant {
        &self.roster[index]
    }

    pub fn teams(&self) -> &[DraftTeam] {
        &self.teams
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn is_assigned(&self, index: usize) -> bool {
        self.ledger.contains(&self.roster[index].identity_key())
    }

    /// Cohort members not yet placed, in roster order.
    pub fn unassigned(&self) -> Vec<usize> {
        self.members
            .iter()
            .copied()
            .filter(|&i| !self.is_assigned(i))
            .collect()
    }

    /// Unassigned cohort members satisfying `pred`, in roster order.
    pub fn unassigned_where(&self, pred: impl Fn(&Participant) -> bool) -> Vec<usize> {
        self.members
            .iter()
            .copied()
            .filter(|&i| !self.is_assigned(i) && pred(&self.roster[i]))
            .collect()
    }

    pub fn count_matching(&self, team: usize, pred: impl Fn(&Participant) -> bool) -> usize {
        self.teams[team]
            .members
            .iter()
            .filter(|&&i| pred(&self.roster[i]))
            .count()
    }

    pub fn has_room(&self, team: usize) -> bool {
        self.teams[team].has_room()
    }

    pub fn remaining(&self, team: usize) -> i64 {
        self.teams[team].remaining()
    }

    pub fn any_room(&self) -> bool {
        self.teams.iter().any(DraftTeam::has_room)
    }

    /// Team with the most remaining room, first on ties. Chosen even when
    /// that room is zero or negative.
    pub fn roomiest_team(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, team) in self.teams.iter().enumerate() {
            match best {
                Some(b) if self.teams[b].remaining() >= team.remaining() => {}
                _ => best = Some(i),
            }
        }
        best
    }

    /// Place a participant. Placing into a full team is a soft overflow:
    /// allowed, counted, and logged.
    pub fn assign(&mut self, team: usize, index: usize) {
        let key = self.roster[index].identity_key();
        if !self.ledger.insert(key) {
            debug!(index, "participant already placed, skipping");
            return;
        }

        let target = &mut self.teams[team];
        if !target.has_room() {
            self.overflow_assignments += 1;
            debug!(
                team = %target.name,
                capacity = target.capacity,
                size = target.members.len() + 1,
                "soft overflow: team already at capacity"
            );
        }
        target.members.push(index);
    }

    pub fn overflow_assignments(&self) -> usize {
        self.overflow_assignments
    }

    pub fn finish(self, cohort: &str) -> CohortOutcome {
        CohortOutcome {
            cohort: cohort.to_string(),
            participants: self.members.len(),
            teams: self.teams,
            placed: self.ledger,
            overflow_assignments: self.overflow_assignments,
        }
    }
}
