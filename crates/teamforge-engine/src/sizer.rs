//! Team count and per-team capacity for a roster.

use teamforge_core::SizingStrategy;

/// Team layout for one cohort: one capacity per team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamPlan {
    pub capacities: Vec<usize>,
}

impl TeamPlan {
    pub fn team_count(&self) -> usize {
        self.capacities.len()
    }

    pub fn total_capacity(&self) -> usize {
        self.capacities.iter().sum()
    }
}

/// Number of teams for `participants` people aiming at `target` per team.
///
/// `Nearest` starts from `max(1, n / target)` and adds one team when that
/// brings the average team size closer to the target. `Ceiling` uses
/// `ceil(n / target)`. An empty roster needs no teams.
pub fn team_count(participants: usize, target: usize, strategy: SizingStrategy) -> usize {
    if participants == 0 {
        return 0;
    }
    let target = target.max(1);

    match strategy {
        SizingStrategy::Ceiling => participants.div_ceil(target).max(1),
        SizingStrategy::Nearest => {
            let mut teams = (participants / target).max(1);
            if participants % target > 0 {
                let n = participants as f64;
                let t = target as f64;
                let current_avg = n / teams as f64;
                let next_avg = n / (teams + 1) as f64;
                if (next_avg - t).abs() < (current_avg - t).abs() {
                    teams += 1;
                }
            }
            teams
        }
    }
}

/// Split `participants` into teams whose capacities differ by at most one
/// and sum to the roster size. The first `n % teams` teams take the extra
/// slot.
pub fn plan_teams(participants: usize, target: usize, strategy: SizingStrategy) -> TeamPlan {
    let teams = team_count(participants, target, strategy);
    if teams == 0 {
        return TeamPlan {
            capacities: Vec::new(),
        };
    }

    let base = participants / teams;
    let extra = participants % teams;
    let capacities = (0..teams).map(|i| base + usize::from(i < extra)).collect();

    TeamPlan { capacities }
}
