//! Balancing pipeline: runs a cohort's ordered passes over its team pool.
//!
//! Every pass only places participants that are still unassigned:
//! 1. Balance passes spread a predicate evenly (least-represented team wins)
//! 2. Quota passes cap a track per team or split two tracks proportionally
//! 3. The time-zone pass places whoever is left by zone affinity
//! 4. A final sweep puts any stragglers into the roomiest team
//!
//! Capacity is respected while any team has room. Once every team is full,
//! placement continues anyway (soft overflow) so nobody is dropped.

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use teamforge_core::{Attribute, Participant, PassSpec};

use crate::pool::TeamPool;
use crate::timezone;

/// Run `passes` in order, then the final sweep.
pub fn run_pipeline<R: Rng + ?Sized>(pool: &mut TeamPool<'_>, passes: &[PassSpec], rng: &mut R) {
    if pool.team_count() == 0 {
        return;
    }

    for pass in passes {
        let placed = match pass {
            PassSpec::Balance { predicate } => balance_pass(pool, |p| predicate.matches(p), rng),
            PassSpec::Spread { attribute } => spread_pass(pool, *attribute, rng),
            PassSpec::TrackCap { track, per_team } => track_cap_pass(pool, track, *per_team, rng),
            PassSpec::ProportionalSplit { primary, secondary } => {
                proportional_split_pass(pool, primary, secondary, rng)
            }
            PassSpec::TimeZoneAffinity => timezone::affinity_pass(pool),
        };
        debug!(pass = %pass.label(), placed, "pass complete");
    }

    let swept = final_sweep(pool);
    if swept > 0 {
        info!(placed = swept, "final sweep placed remaining participants");
    }
}

/// Team with the fewest `counts` among teams with room; ties go to the
/// lowest index. When every team is full, the fewest over all teams.
fn least_represented(pool: &TeamPool<'_>, counts: &[usize]) -> Option<usize> {
    let pick = |eligible: &dyn Fn(usize) -> bool| {
        (0..counts.len())
            .filter(|&t| eligible(t))
            .min_by_key(|&t| (counts[t], t))
    };
    pick(&|t| pool.has_room(t)).or_else(|| pick(&|_| true))
}

/// Spread unassigned participants satisfying `pred` evenly across teams.
///
/// Counters start from current membership, so members placed by earlier
/// passes count toward the balance.
pub fn balance_pass<R: Rng + ?Sized>(
    pool: &mut TeamPool<'_>,
    pred: impl Fn(&Participant) -> bool,
    rng: &mut R,
) -> usize {
    let mut candidates = pool.unassigned_where(&pred);
    if candidates.is_empty() {
        return 0;
    }
    candidates.shuffle(rng);

    let mut counts: Vec<usize> = (0..pool.team_count())
        .map(|t| pool.count_matching(t, &pred))
        .collect();

    for &index in &candidates {
        let Some(team) = least_represented(pool, &counts) else {
            break;
        };
        pool.assign(team, index);
        counts[team] += 1;
    }

    candidates.len()
}

/// One balance pass per distinct attribute value among the unassigned,
/// in sorted value order.
pub fn spread_pass<R: Rng + ?Sized>(pool: &mut TeamPool<'_>, attribute: Attribute, rng: &mut R) -> usize {
    let values: BTreeSet<String> = pool
        .unassigned()
        .into_iter()
        .map(|i| attribute.value_of(pool.participant(i)))
        .collect();

    values
        .into_iter()
        .map(|value| balance_pass(pool, |p| attribute.value_of(p) == value, rng))
        .sum()
}

/// Give each team up to `per_team` members of `track`, one round at a
/// time in team order, skipping full teams and teams already at the cap.
pub fn track_cap_pass<R: Rng + ?Sized>(
    pool: &mut TeamPool<'_>,
    track: &str,
    per_team: usize,
    rng: &mut R,
) -> usize {
    let mut candidates = pool.unassigned_where(|p| p.has_track(track));
    candidates.shuffle(rng);

    let mut cursor = 0;
    'rounds: for _ in 0..per_team {
        for team in 0..pool.team_count() {
            if cursor >= candidates.len() {
                break 'rounds;
            }
            if !pool.has_room(team) || pool.count_matching(team, |p| p.has_track(track)) >= per_team {
                continue;
            }
            pool.assign(team, candidates[cursor]);
            cursor += 1;
        }
    }

    cursor
}

/// Scale a team's primary/secondary allotment down to `room`.
///
/// Both shares shrink by `room / (primary + secondary)`, rounded, keeping
/// at least one each; any excess left after rounding comes off the larger
/// share (the primary on ties).
pub fn scale_to_room(primary: usize, secondary: usize, room: usize) -> (usize, usize) {
    let total = primary + secondary;
    if total <= room {
        return (primary, secondary);
    }

    let factor = room as f64 / total as f64;
    let mut p = ((primary as f64 * factor).round() as usize).max(1);
    let mut s = ((secondary as f64 * factor).round() as usize).max(1);

    if p + s > room {
        let excess = p + s - room;
        if p >= s {
            p = p.saturating_sub(excess);
        } else {
            s = s.saturating_sub(excess);
        }
    }
    (p, s)
}

/// Split two dominant tracks across teams in proportion to their counts.
///
/// Team `i` is allotted `count / teams` of each track, plus one when
/// `i < count % teams`, scaled down to the team's remaining room. Both
/// tracks are consumed through cursors over shuffled candidate lists.
pub fn proportional_split_pass<R: Rng + ?Sized>(
    pool: &mut TeamPool<'_>,
    primary: &str,
    secondary: &str,
    rng: &mut R,
) -> usize {
    let mut primaries = pool.unassigned_where(|p| p.has_track(primary));
    let mut secondaries = pool.unassigned_where(|p| p.has_track(secondary));
    primaries.shuffle(rng);
    secondaries.shuffle(rng);

    let teams = pool.team_count();
    let share = |count: usize, team: usize| count / teams + usize::from(team < count % teams);

    let mut p_cursor = 0;
    let mut s_cursor = 0;

    for team in 0..teams {
        let room = pool.remaining(team);
        if room <= 0 {
            continue;
        }
        let (p_take, s_take) = scale_to_room(
            share(primaries.len(), team),
            share(secondaries.len(), team),
            room as usize,
        );

        for _ in 0..p_take {
            let Some(&index) = primaries.get(p_cursor) else { break };
            pool.assign(team, index);
            p_cursor += 1;
        }
        for _ in 0..s_take {
            let Some(&index) = secondaries.get(s_cursor) else { break };
            pool.assign(team, index);
            s_cursor += 1;
        }
    }

    p_cursor + s_cursor
}

/// Place every still-unassigned cohort member (roster order) into the
/// team with the most remaining room, overflowing when none has any.
pub fn final_sweep(pool: &mut TeamPool<'_>) -> usize {
    let remaining = pool.unassigned();
    for &index in &remaining {
        let Some(team) = pool.roomiest_team() else {
            return 0;
        };
        pool.assign(team, index);
    }
    remaining.len()
}
