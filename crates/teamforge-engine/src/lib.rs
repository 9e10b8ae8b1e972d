//! Teamforge allocation engine: balanced team formation for cohort events.
//!
//! The engine partitions a roster into teams sized around a cohort's target,
//! keeping track mix, experience, employment, and time zones balanced. It
//! is driven entirely by an [`teamforge_core::EventProfile`]; there are no
//! per-event code paths.
//!
//! # Components
//!
//! - **`normalize`**: Roster cleanup before any pass runs
//! - **`sizer`**: Team count and per-team capacities
//! - **`cohort`**: Course-level cohort splitting
//! - **`pool`**: Per-cohort working state and identity ledger
//! - **`pipeline`**: Ordered balancing passes and the final sweep
//! - **`timezone`**: Time-zone affinity scoring
//! - **`reconcile`**: Unassigned detection and statistics
//! - **`allocator`**: Public entry points

pub mod allocator;
pub mod cohort;
pub mod normalize;
pub mod pipeline;
pub mod pool;
pub mod reconcile;
pub mod sizer;
pub mod timezone;

pub use allocator::{allocate_teams, allocate_teams_seeded, allocate_teams_with_rng};
pub use cohort::{classify, split_roster};
pub use normalize::{normalize_participant, normalize_roster};
pub use pool::{CohortOutcome, DraftTeam, TeamPool};
pub use reconcile::{find_unassigned, summarize, team_stats};
pub use sizer::{TeamPlan, plan_teams, team_count};
pub use timezone::{ScoreBreakdown, TeamScore, rank_teams, score_team};
