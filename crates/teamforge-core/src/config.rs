//! Event profile configuration: cohorts, team sizes, and balancing passes.
//!
//! Profiles are plain values. Built-in ones come from [`crate::presets`];
//! custom ones are loaded from TOML:
//!
//! ```toml
//! name = "Phase 2 API Hackathon"
//! base_cohort = "All"
//!
//! [[cohorts]]
//! name = "All"
//! team_prefix = "Team"
//! target_size = 5
//!
//! [[cohorts.passes]]
//! kind = "balance"
//! predicate = { is = "prior_experience" }
//!
//! [[cohorts.passes]]
//! kind = "time_zone_affinity"
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::category::{ExpertiseLevel, UNKNOWN_TRACK};
use crate::error::{ConfigResult, ProfileError};
use crate::types::Participant;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventProfile {
    pub name: String,
    /// Cohort that receives participants matching no cohort's patterns.
    pub base_cohort: String,
    pub cohorts: Vec<CohortProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortProfile {
    pub name: String,
    /// Teams are named `"<team_prefix> <n>"`.
    pub team_prefix: String,
    pub target_size: usize,
    #[serde(default)]
    pub sizing: SizingStrategy,
    /// Case-insensitive substrings of the course-level label.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub level_patterns: Vec<String>,
    /// A label containing any of these never matches this cohort.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_patterns: Vec<String>,
    #[serde(default)]
    pub passes: Vec<PassSpec>,
}

/// How the team count is derived from the cohort size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingStrategy {
    /// Floor or floor+1 teams, whichever average is closer to the target.
    #[default]
    Nearest,
    /// Enough teams that none needs more than the target.
    Ceiling,
}

/// One step of a cohort's balancing pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PassSpec {
    /// Spread members satisfying the predicate evenly across teams.
    Balance { predicate: Predicate },
    /// One balance pass per distinct value of the attribute.
    Spread { attribute: Attribute },
    /// Give each team up to `per_team` members of the track first.
    TrackCap { track: String, per_team: usize },
    /// Split two dominant tracks proportionally within remaining room.
    ProportionalSplit { primary: String, secondary: String },
    /// Place the rest by time-zone compatibility.
    TimeZoneAffinity,
}

impl PassSpec {
    pub fn balance(predicate: Predicate) -> Self {
        PassSpec::Balance { predicate }
    }

    pub fn track_cap(track: &str, per_team: usize) -> Self {
        PassSpec::TrackCap {
            track: track.to_string(),
            per_team,
        }
    }

    pub fn proportional_split(primary: &str, secondary: &str) -> Self {
        PassSpec::ProportionalSplit {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
        }
    }

    /// Short label used in logs.
    pub fn label(&self) -> String {
        match self {
            PassSpec::Balance { predicate } => format!("balance:{}", predicate.label()),
            PassSpec::Spread { attribute } => format!("spread:{}", attribute.label()),
            PassSpec::TrackCap { track, per_team } => format!("cap:{track}x{per_team}"),
            PassSpec::ProportionalSplit { primary, secondary } => {
                format!("split:{primary}/{secondary}")
            }
            PassSpec::TimeZoneAffinity => "time-zone".to_string(),
        }
    }
}

/// Participant predicate for a balance pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "is", rename_all = "snake_case")]
pub enum Predicate {
    Any,
    PriorExperience,
    Employed,
    Track { code: String },
    Batch { label: String },
    Expertise { level: ExpertiseLevel },
}

impl Predicate {
    pub fn track(code: &str) -> Self {
        Predicate::Track {
            code: code.to_string(),
        }
    }

    pub fn expertise(level: ExpertiseLevel) -> Self {
        Predicate::Expertise { level }
    }

    pub fn matches(&self, participant: &Participant) -> bool {
        match self {
            Predicate::Any => true,
            Predicate::PriorExperience => participant.prior_experience,
            Predicate::Employed => participant.employed,
            Predicate::Track { code } => participant.has_track(code),
            Predicate::Batch { label } => participant
                .batch
                .as_deref()
                .is_some_and(|b| b.trim().eq_ignore_ascii_case(label.trim())),
            Predicate::Expertise { level } => participant.expertise_level() == *level,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Predicate::Any => "any".to_string(),
            Predicate::PriorExperience => "prior-experience".to_string(),
            Predicate::Employed => "employed".to_string(),
            Predicate::Track { code } => format!("track={code}"),
            Predicate::Batch { label } => format!("batch={label}"),
            Predicate::Expertise { level } => format!("expertise={level}"),
        }
    }
}

/// Categorical attribute a spread pass iterates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Track,
    Batch,
    Expertise,
}

impl Attribute {
    /// The participant's value for this attribute, with absent values
    /// folded into a default bucket.
    pub fn value_of(self, participant: &Participant) -> String {
        match self {
            Attribute::Track => participant.track_label().to_string(),
            Attribute::Batch => participant
                .batch
                .as_deref()
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .unwrap_or(UNKNOWN_TRACK)
                .to_string(),
            Attribute::Expertise => participant.expertise_level().label().to_string(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Attribute::Track => "track",
            Attribute::Batch => "batch",
            Attribute::Expertise => "expertise",
        }
    }
}

impl CohortProfile {
    pub fn new(name: &str, team_prefix: &str, target_size: usize) -> Self {
        Self {
            name: name.to_string(),
            team_prefix: team_prefix.to_string(),
            target_size,
            sizing: SizingStrategy::Nearest,
            level_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            passes: Vec::new(),
        }
    }

    pub fn sizing(mut self, sizing: SizingStrategy) -> Self {
        self.sizing = sizing;
        self
    }

    pub fn matching(mut self, patterns: &[&str]) -> Self {
        self.level_patterns = patterns.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn excluding(mut self, patterns: &[&str]) -> Self {
        self.exclude_patterns = patterns.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_passes(mut self, passes: Vec<PassSpec>) -> Self {
        self.passes = passes;
        self
    }

    fn validate(&self) -> Result<(), ProfileError> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::BlankCohortName);
        }
        if self.target_size == 0 {
            return Err(ProfileError::ZeroTargetSize(self.name.clone()));
        }
        for pass in &self.passes {
            match pass {
                PassSpec::TrackCap { track, per_team: 0 } => {
                    return Err(ProfileError::ZeroTrackCap {
                        cohort: self.name.clone(),
                        track: track.clone(),
                    });
                }
                PassSpec::ProportionalSplit { primary, secondary }
                    if primary.trim().eq_ignore_ascii_case(secondary.trim()) =>
                {
                    return Err(ProfileError::SameSplitTracks {
                        cohort: self.name.clone(),
                        track: primary.clone(),
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl EventProfile {
    /// Build and validate a profile.
    pub fn new(
        name: &str,
        base_cohort: &str,
        cohorts: Vec<CohortProfile>,
    ) -> Result<Self, ProfileError> {
        let profile = Self {
            name: name.to_string(),
            base_cohort: base_cohort.to_string(),
            cohorts,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// A profile with one cohort covering the whole roster.
    pub fn single(
        name: &str,
        team_prefix: &str,
        target_size: usize,
        passes: Vec<PassSpec>,
    ) -> Result<Self, ProfileError> {
        let cohort = CohortProfile::new("All", team_prefix, target_size).with_passes(passes);
        Self::new(name, "All", vec![cohort])
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.cohorts.is_empty() {
            return Err(ProfileError::NoCohorts(self.name.clone()));
        }
        let mut seen = HashSet::new();
        for cohort in &self.cohorts {
            cohort.validate()?;
            if !seen.insert(cohort.name.trim().to_lowercase()) {
                return Err(ProfileError::DuplicateCohort(cohort.name.clone()));
            }
        }
        if self.base_cohort_index().is_none() {
            return Err(ProfileError::UnknownBaseCohort(self.base_cohort.clone()));
        }
        Ok(())
    }

    pub fn base_cohort_index(&self) -> Option<usize> {
        self.cohorts
            .iter()
            .position(|c| c.name.trim().eq_ignore_ascii_case(self.base_cohort.trim()))
    }

    /// Whether the roster is split by course level before allocation.
    pub fn is_split(&self) -> bool {
        self.cohorts.len() > 1
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let profile: EventProfile = toml::from_str(content)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_parse_minimal() {
        let toml_str = r#"
name = "Demo"
base_cohort = "All"

[[cohorts]]
name = "All"
team_prefix = "Team"
target_size = 5
"#;
        let profile = EventProfile::from_toml_str(toml_str).unwrap();
        assert_eq!(profile.name, "Demo");
        assert_eq!(profile.cohorts[0].sizing, SizingStrategy::Nearest);
        assert!(profile.cohorts[0].passes.is_empty());
        assert!(!profile.is_split());
    }

    #[test]
    fn test_parse_passes() {
        let toml_str = r#"
name = "Bootcamp"
base_cohort = "Full"

[[cohorts]]
name = "Advanced"
team_prefix = "Advanced Team"
target_size = 5
sizing = "ceiling"
level_patterns = ["advanced"]
exclude_patterns = ["full"]

[[cohorts.passes]]
kind = "balance"
predicate = { is = "any" }

[[cohorts]]
name = "Full"
team_prefix = "Full Course Team"
target_size = 7
level_patterns = ["full"]

[[cohorts.passes]]
kind = "track_cap"
track = "DVLPR"
per_team = 1

[[cohorts.passes]]
kind = "proportional_split"
primary = "SDET"
secondary = "DA"

[[cohorts.passes]]
kind = "balance"
predicate = { is = "expertise", level = "advanced" }

[[cohorts.passes]]
kind = "spread"
attribute = "batch"

[[cohorts.passes]]
kind = "time_zone_affinity"
"#;
        let profile = EventProfile::from_toml_str(toml_str).unwrap();
        assert!(profile.is_split());
        assert_eq!(profile.base_cohort_index(), Some(1));

        let advanced = &profile.cohorts[0];
        assert_eq!(advanced.sizing, SizingStrategy::Ceiling);
        assert_eq!(advanced.exclude_patterns, vec!["full".to_string()]);
        assert_eq!(advanced.passes, vec![PassSpec::balance(Predicate::Any)]);

        let full = &profile.cohorts[1];
        assert_eq!(
            full.passes,
            vec![
                PassSpec::track_cap("DVLPR", 1),
                PassSpec::proportional_split("SDET", "DA"),
                PassSpec::balance(Predicate::expertise(ExpertiseLevel::Advanced)),
                PassSpec::Spread { attribute: Attribute::Batch },
                PassSpec::TimeZoneAffinity,
            ]
        );
    }

    #[test]
    fn rejects_zero_target_size() {
        let err = EventProfile::single("Demo", "Team", 0, Vec::new()).unwrap_err();
        assert_eq!(err, ProfileError::ZeroTargetSize("All".to_string()));
    }

    #[test]
    fn rejects_unknown_base_cohort() {
        let err = EventProfile::new("Demo", "Missing", vec![CohortProfile::new("All", "Team", 5)])
            .unwrap_err();
        assert_eq!(err, ProfileError::UnknownBaseCohort("Missing".to_string()));
    }

    #[test]
    fn rejects_duplicate_cohorts() {
        let cohorts = vec![
            CohortProfile::new("Full", "Team", 5),
            CohortProfile::new("full", "Other Team", 7),
        ];
        let err = EventProfile::new("Demo", "Full", cohorts).unwrap_err();
        assert_eq!(err, ProfileError::DuplicateCohort("full".to_string()));
    }

    #[test]
    fn rejects_empty_profile() {
        let err = EventProfile::new("Demo", "All", Vec::new()).unwrap_err();
        assert_eq!(err, ProfileError::NoCohorts("Demo".to_string()));
    }

    #[test]
    fn rejects_degenerate_quota_rules() {
        let err = EventProfile::single("Demo", "Team", 5, vec![PassSpec::track_cap("DVLPR", 0)])
            .unwrap_err();
        assert!(matches!(err, ProfileError::ZeroTrackCap { .. }));

        let err = EventProfile::single(
            "Demo",
            "Team",
            5,
            vec![PassSpec::proportional_split("SDET", "sdet")],
        )
        .unwrap_err();
        assert!(matches!(err, ProfileError::SameSplitTracks { .. }));
    }

    #[test]
    fn invalid_toml_profile_is_rejected_at_load() {
        let toml_str = r#"
name = "Demo"
base_cohort = "All"

[[cohorts]]
name = "All"
team_prefix = "Team"
target_size = 0
"#;
        let err = EventProfile::from_toml_str(toml_str).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ProfileError::ZeroTargetSize(_))));
    }

    #[test]
    fn predicates_match_participants() {
        let p = Participant::new("a@x.io", "A")
            .with_track("DA")
            .with_batch(" Batch 7 ")
            .with_expertise("Intermediate")
            .employed();

        assert!(Predicate::Any.matches(&p));
        assert!(Predicate::Employed.matches(&p));
        assert!(!Predicate::PriorExperience.matches(&p));
        assert!(Predicate::track("da").matches(&p));
        assert!(Predicate::Batch { label: "batch 7".to_string() }.matches(&p));
        assert!(Predicate::expertise(ExpertiseLevel::Intermediate).matches(&p));
        assert!(!Predicate::expertise(ExpertiseLevel::Beginner).matches(&p));
    }

    #[test]
    fn attribute_values_fold_absent_into_defaults() {
        let p = Participant::new("a@x.io", "A");
        assert_eq!(Attribute::Track.value_of(&p), "Unknown");
        assert_eq!(Attribute::Batch.value_of(&p), "Unknown");
        assert_eq!(Attribute::Expertise.value_of(&p), "Beginner");
    }
}
