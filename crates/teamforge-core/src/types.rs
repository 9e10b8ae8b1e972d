//! Shared types used across Teamforge crates.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::category::{ExpertiseLevel, TimeZoneBucket, UNKNOWN_TRACK, is_affirmative};

/// One event participant, as handed over by the roster ingestion layer.
///
/// Identity is the email address, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub email: String,
    pub name: String,
    /// Discipline code, e.g. SDET, DA, DVLPR, SMPO.
    #[serde(default)]
    pub track: Option<String>,
    /// Originating cohort / batch label.
    #[serde(default)]
    pub batch: Option<String>,
    /// Declared course level, used for cohort splitting.
    #[serde(default)]
    pub course_level: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub employed: bool,
    /// Took part in a previous event of the same kind.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub prior_experience: bool,
    #[serde(default)]
    pub time_zone: Option<String>,
    /// Track-specific expertise, free text.
    #[serde(default)]
    pub expertise: Option<String>,
}

/// Accepts `true`/`false` or a free-text form answer.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFlag {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<RawFlag>::deserialize(deserializer)? {
        Some(RawFlag::Bool(b)) => b,
        Some(RawFlag::Text(text)) => is_affirmative(&text),
        None => false,
    })
}

impl Participant {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            track: None,
            batch: None,
            course_level: None,
            employed: false,
            prior_experience: false,
            time_zone: None,
            expertise: None,
        }
    }

    pub fn with_track(mut self, track: impl Into<String>) -> Self {
        self.track = Some(track.into());
        self
    }

    pub fn with_batch(mut self, batch: impl Into<String>) -> Self {
        self.batch = Some(batch.into());
        self
    }

    pub fn with_course_level(mut self, level: impl Into<String>) -> Self {
        self.course_level = Some(level.into());
        self
    }

    pub fn with_time_zone(mut self, zone: impl Into<String>) -> Self {
        self.time_zone = Some(zone.into());
        self
    }

    pub fn with_expertise(mut self, expertise: impl Into<String>) -> Self {
        self.expertise = Some(expertise.into());
        self
    }

    pub fn employed(mut self) -> Self {
        self.employed = true;
        self
    }

    pub fn experienced(mut self) -> Self {
        self.prior_experience = true;
        self
    }

    /// Lower-cased, trimmed email used for identity comparisons.
    pub fn identity_key(&self) -> String {
        self.email.trim().to_lowercase()
    }

    /// Track code, or `"Unknown"` when absent.
    pub fn track_label(&self) -> &str {
        self.track.as_deref().unwrap_or(UNKNOWN_TRACK)
    }

    pub fn has_track(&self, code: &str) -> bool {
        self.track
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case(code.trim()))
    }

    pub fn time_zone_bucket(&self) -> TimeZoneBucket {
        TimeZoneBucket::from_label(self.time_zone.as_deref())
    }

    pub fn expertise_level(&self) -> ExpertiseLevel {
        ExpertiseLevel::from_label(self.expertise.as_deref())
    }
}

/// A formed team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    /// Cohort the team was formed for.
    pub cohort: String,
    /// Intended size. Informational: fallback placement may exceed it.
    pub capacity: usize,
    pub members: Vec<Participant>,
    pub stats: TeamStats,
}

impl Team {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn count_track(&self, code: &str) -> usize {
        self.members.iter().filter(|m| m.has_track(code)).count()
    }

    pub fn exceeds_capacity(&self) -> bool {
        self.members.len() > self.capacity
    }

    pub fn member_names(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.name.as_str()).collect()
    }
}

/// Per-team distribution counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub size: usize,
    pub capacity: usize,
    pub tracks: BTreeMap<String, usize>,
    pub employed: usize,
    pub experienced: usize,
    pub time_zones: BTreeMap<TimeZoneBucket, usize>,
    pub expertise: BTreeMap<ExpertiseLevel, usize>,
}

impl TeamStats {
    pub fn track(&self, code: &str) -> usize {
        self.tracks.get(code).copied().unwrap_or(0)
    }

    pub fn time_zone(&self, bucket: TimeZoneBucket) -> usize {
        self.time_zones.get(&bucket).copied().unwrap_or(0)
    }
}

/// Renders the one-line team summary shown in reports.
impl fmt::Display for TeamStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (track, count) in &self.tracks {
            write!(f, "{track}: {count}, ")?;
        }
        write!(
            f,
            "Working: {}, Previous Event: {}, TimeZones: ",
            self.employed, self.experienced
        )?;
        if self.time_zones.is_empty() {
            f.write_str("None")?;
        } else {
            let zones: Vec<String> = self
                .time_zones
                .iter()
                .map(|(bucket, count)| format!("{bucket}: {count}"))
                .collect();
            f.write_str(&zones.join(", "))?;
        }
        write!(f, ", Total: {}", self.size)
    }
}

/// Per-cohort breakdown of an allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortSummary {
    pub name: String,
    pub participants: usize,
    pub teams: usize,
    pub assigned: usize,
}

/// Aggregate statistics for one allocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationStats {
    pub total_participants: usize,
    pub assigned: usize,
    pub unassigned: usize,
    /// Percentage, rounded to one decimal.
    pub assignment_rate: f64,
    pub team_count: usize,
    /// Teams that ended above their target capacity.
    pub overflowing_teams: usize,
    /// Placements made into a team that was already at capacity.
    pub overflow_assignments: usize,
    /// Roster entries set aside because their email was already claimed.
    pub duplicate_identities: usize,
    pub track_totals: BTreeMap<String, usize>,
    pub employed: usize,
    pub experienced: usize,
    pub cohorts: Vec<CohortSummary>,
}

impl AllocationStats {
    pub fn assignment_rate_label(&self) -> String {
        format!("{:.1}%", self.assignment_rate)
    }
}

/// Percentage of `part` in `total`, rounded to one decimal. Zero for an
/// empty total.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}

/// Output of one allocation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationResult {
    pub event: String,
    pub teams: Vec<Team>,
    pub unassigned: Vec<Participant>,
    pub stats: AllocationStats,
    pub summary: String,
    /// Seed of the shuffling source, when the engine chose it.
    pub seed: Option<u64>,
}

impl AllocationResult {
    pub const NO_PARTICIPANTS: &'static str = "No participants available for team formation";

    /// Result for an empty roster.
    pub fn empty(event: &str) -> Self {
        Self {
            event: event.to_string(),
            teams: Vec::new(),
            unassigned: Vec::new(),
            stats: AllocationStats::default(),
            summary: Self::NO_PARTICIPANTS.to_string(),
            seed: None,
        }
    }

    pub fn teams_in_cohort<'a>(&'a self, cohort: &'a str) -> impl Iterator<Item = &'a Team> + 'a {
        self.teams.iter().filter(move |t| t.cohort == cohort)
    }

    pub fn assigned_count(&self) -> usize {
        self.teams.iter().map(Team::len).sum()
    }
}
