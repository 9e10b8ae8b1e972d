//! Time-zone affinity scoring for the final balancing pass.
//!
//! Evaluates candidate teams for one participant using:
//! - **Zone affinity**: members already in the same or a compatible bucket,
//!   weighted by how compatible the bucket is
//! - **Room**: remaining capacity, so emptier teams win close calls
//!
//! ```text
//! zones    = [own bucket] ++ compatible(own bucket)
//! affinity = Σ_j count(team, zones[j]) / (j + 1)
//! score    = 2 * affinity + remaining(team)
//! ```

use tracing::debug;

use teamforge_core::TimeZoneBucket;

use crate::pool::TeamPool;

/// Weight of zone affinity relative to remaining room.
const AFFINITY_WEIGHT: f64 = 2.0;

/// Scored placement candidate for a single team.
#[derive(Debug, Clone)]
pub struct TeamScore {
    pub team: usize,
    /// Composite score (higher = better).
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Individual score components for debugging.
#[derive(Debug, Clone)]
pub struct ScoreBreakdown {
    pub affinity: f64,
    pub remaining: i64,
}

/// Member count per bucket, indexed by [`TimeZoneBucket::index`].
pub fn zone_counts(pool: &TeamPool<'_>, team: usize) -> [usize; 4] {
    let mut counts = [0; 4];
    for &i in &pool.teams()[team].members {
        counts[pool.participant(i).time_zone_bucket().index()] += 1;
    }
    counts
}

/// Score one team for a participant in `bucket`.
pub fn score_team(pool: &TeamPool<'_>, team: usize, bucket: TimeZoneBucket) -> TeamScore {
    let counts = zone_counts(pool, team);

    let affinity: f64 = std::iter::once(bucket)
        .chain(bucket.compatible().iter().copied())
        .enumerate()
        .map(|(rank, zone)| counts[zone.index()] as f64 / (rank + 1) as f64)
        .sum();

    let remaining = pool.remaining(team);

    TeamScore {
        team,
        score: AFFINITY_WEIGHT * affinity + remaining as f64,
        breakdown: ScoreBreakdown { affinity, remaining },
    }
}

/// Score all teams and return them best first. The sort is stable, so
/// equal scores keep team order.
pub fn rank_teams(pool: &TeamPool<'_>, bucket: TimeZoneBucket) -> Vec<TeamScore> {
    let mut scores: Vec<TeamScore> = (0..pool.team_count())
        .map(|team| score_team(pool, team, bucket))
        .collect();

    scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scores
}

/// Best team with room for a participant in `bucket`, falling back to the
/// roomiest team (overflow) when every team is full.
pub fn best_team(pool: &TeamPool<'_>, bucket: TimeZoneBucket) -> Option<usize> {
    rank_teams(pool, bucket)
        .into_iter()
        .find(|s| s.breakdown.remaining > 0)
        .map(|s| s.team)
        .or_else(|| pool.roomiest_team())
}

/// Place every unassigned cohort member by time-zone affinity, bucket by
/// bucket (EST, CST, PST, OTHER), roster order within a bucket.
pub fn affinity_pass(pool: &mut TeamPool<'_>) -> usize {
    let remaining = pool.unassigned();
    let mut placed = 0;

    for bucket in TimeZoneBucket::ALL {
        let group: Vec<usize> = remaining
            .iter()
            .copied()
            .filter(|&i| pool.participant(i).time_zone_bucket() == bucket)
            .collect();
        if group.is_empty() {
            continue;
        }
        debug!(bucket = %bucket, participants = group.len(), "assigning by time-zone affinity");

        for index in group {
            let Some(team) = best_team(pool, bucket) else {
                return placed;
            };
            pool.assign(team, index);
            placed += 1;
        }
    }

    placed
}
