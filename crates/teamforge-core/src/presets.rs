//! Built-in event profiles.

use std::fmt;
use std::str::FromStr;

use crate::category::ExpertiseLevel;
use crate::config::{Attribute, CohortProfile, EventProfile, PassSpec, Predicate, SizingStrategy};
use crate::error::ProfileError;

const HACKATHON_TEAM_SIZE: usize = 5;
const BOOTCAMP_FULL_COURSE_TEAM_SIZE: usize = 7;
const BOOTCAMP_ADVANCED_TEAM_SIZE: usize = 5;

/// Event categories with a built-in profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    SqlBootcamp,
    GherkinHackathon,
    SeleniumHackathon,
    Phase1ApiHackathon,
    Phase2ApiHackathon,
    SqlHackathon,
    PythonHackathon,
    RecipeScrapingHackathon,
}

impl EventKind {
    pub const ALL: [EventKind; 8] = [
        EventKind::SqlBootcamp,
        EventKind::GherkinHackathon,
        EventKind::SeleniumHackathon,
        EventKind::Phase1ApiHackathon,
        EventKind::Phase2ApiHackathon,
        EventKind::SqlHackathon,
        EventKind::PythonHackathon,
        EventKind::RecipeScrapingHackathon,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            EventKind::SqlBootcamp => "SQL Bootcamp",
            EventKind::GherkinHackathon => "Phase 1 Gherkin Hackathon",
            EventKind::SeleniumHackathon => "Phase 2 Selenium Hackathon",
            EventKind::Phase1ApiHackathon => "Phase 1 API Hackathon",
            EventKind::Phase2ApiHackathon => "Phase 2 API Hackathon",
            EventKind::SqlHackathon => "SQL Hackathon",
            EventKind::PythonHackathon => "Python Hackathon",
            EventKind::RecipeScrapingHackathon => "Recipe Scraping Hackathon",
        }
    }

    /// Command-line spelling.
    pub fn slug(self) -> &'static str {
        match self {
            EventKind::SqlBootcamp => "sql-bootcamp",
            EventKind::GherkinHackathon => "gherkin-hackathon",
            EventKind::SeleniumHackathon => "selenium-hackathon",
            EventKind::Phase1ApiHackathon => "phase1-api-hackathon",
            EventKind::Phase2ApiHackathon => "phase2-api-hackathon",
            EventKind::SqlHackathon => "sql-hackathon",
            EventKind::PythonHackathon => "python-hackathon",
            EventKind::RecipeScrapingHackathon => "recipe-scraping-hackathon",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for EventKind {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == wanted)
            .ok_or_else(|| ProfileError::UnknownEvent(s.to_string()))
    }
}

impl EventProfile {
    /// The built-in profile for an event kind.
    pub fn preset(kind: EventKind) -> Self {
        let name = kind.display_name().to_string();
        let (base_cohort, cohorts) = match kind {
            EventKind::SqlBootcamp => ("Full Course", sql_bootcamp_cohorts()),
            EventKind::SeleniumHackathon => ("All", vec![hackathon_cohort(Vec::new())]),
            EventKind::Phase1ApiHackathon => (
                "All",
                vec![hackathon_cohort(vec![
                    PassSpec::balance(Predicate::track("DA")),
                    PassSpec::balance(Predicate::track("DVLPR")),
                ])],
            ),
            EventKind::Phase2ApiHackathon => (
                "All",
                vec![hackathon_cohort(vec![PassSpec::balance(Predicate::track("DVLPR"))])],
            ),
            EventKind::SqlHackathon => ("All", vec![expertise_cohort("SQL Team")]),
            EventKind::PythonHackathon => ("All", vec![expertise_cohort("Python Team")]),
            EventKind::GherkinHackathon | EventKind::RecipeScrapingHackathon => (
                "All",
                vec![
                    CohortProfile::new("All", "Team", HACKATHON_TEAM_SIZE)
                        .sizing(SizingStrategy::Ceiling)
                        .with_passes(vec![PassSpec::balance(Predicate::Any)]),
                ],
            ),
        };

        EventProfile {
            name,
            base_cohort: base_cohort.to_string(),
            cohorts,
        }
    }
}

fn sql_bootcamp_cohorts() -> Vec<CohortProfile> {
    vec![
        CohortProfile::new("Advanced", "Advanced Team", BOOTCAMP_ADVANCED_TEAM_SIZE)
            .sizing(SizingStrategy::Ceiling)
            .matching(&["advanced"])
            .excluding(&["full"])
            .with_passes(vec![PassSpec::balance(Predicate::Any)]),
        CohortProfile::new("Full Course", "Full Course Team", BOOTCAMP_FULL_COURSE_TEAM_SIZE)
            .sizing(SizingStrategy::Ceiling)
            .matching(&["full"])
            .with_passes(vec![
                PassSpec::track_cap("DVLPR", 1),
                PassSpec::track_cap("SMPO", 1),
                PassSpec::proportional_split("SDET", "DA"),
            ]),
    ]
}

/// Experience and employment first, the event's track rules, then
/// time-zone affinity for everyone left.
fn hackathon_cohort(track_passes: Vec<PassSpec>) -> CohortProfile {
    let mut passes = vec![
        PassSpec::balance(Predicate::PriorExperience),
        PassSpec::balance(Predicate::Employed),
    ];
    passes.extend(track_passes);
    passes.push(PassSpec::TimeZoneAffinity);

    CohortProfile::new("All", "Team", HACKATHON_TEAM_SIZE).with_passes(passes)
}

fn expertise_cohort(team_prefix: &str) -> CohortProfile {
    CohortProfile::new("All", team_prefix, HACKATHON_TEAM_SIZE)
        .sizing(SizingStrategy::Ceiling)
        .with_passes(vec![
            PassSpec::balance(Predicate::expertise(ExpertiseLevel::Advanced)),
            PassSpec::balance(Predicate::expertise(ExpertiseLevel::Intermediate)),
            PassSpec::balance(Predicate::expertise(ExpertiseLevel::Beginner)),
            PassSpec::Spread {
                attribute: Attribute::Track,
            },
        ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_is_valid() {
        for kind in EventKind::ALL {
            let profile = EventProfile::preset(kind);
            assert!(profile.validate().is_ok(), "{kind} preset is invalid");
            assert_eq!(profile.name, kind.display_name());
        }
    }

    #[test]
    fn presets_survive_toml_round_trip() {
        for kind in EventKind::ALL {
            let profile = EventProfile::preset(kind);
            let toml_str = profile.to_toml_string().unwrap();
            let parsed = EventProfile::from_toml_str(&toml_str).unwrap();
            assert_eq!(parsed, profile, "{kind} did not round-trip");
        }
    }

    #[test]
    fn parses_event_slugs() {
        assert_eq!("sql-bootcamp".parse::<EventKind>().unwrap(), EventKind::SqlBootcamp);
        assert_eq!(
            "PHASE1_API_HACKATHON".parse::<EventKind>().unwrap(),
            EventKind::Phase1ApiHackathon
        );
        assert_eq!(
            "chess-night".parse::<EventKind>().unwrap_err(),
            ProfileError::UnknownEvent("chess-night".to_string())
        );
    }

    #[test]
    fn bootcamp_splits_by_course_level() {
        let profile = EventProfile::preset(EventKind::SqlBootcamp);
        assert!(profile.is_split());
        assert_eq!(profile.cohorts[0].target_size, 5);
        assert_eq!(profile.cohorts[1].target_size, 7);
        assert_eq!(profile.base_cohort_index(), Some(1));
    }

    #[test]
    fn hackathons_end_with_time_zone_affinity() {
        for kind in [
            EventKind::SeleniumHackathon,
            EventKind::Phase1ApiHackathon,
            EventKind::Phase2ApiHackathon,
        ] {
            let profile = EventProfile::preset(kind);
            assert_eq!(
                profile.cohorts[0].passes.last(),
                Some(&PassSpec::TimeZoneAffinity)
            );
        }
    }
}
