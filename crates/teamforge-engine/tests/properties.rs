//! Property tests over generated rosters.

use std::collections::HashSet;

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use teamforge_core::{EventKind, EventProfile, Participant, PassSpec, Predicate, SizingStrategy};
use teamforge_engine::pipeline::balance_pass;
use teamforge_engine::{TeamPool, allocate_teams_seeded, plan_teams};

const TRACKS: [&str; 5] = ["SDET", "DA", "DVLPR", "SMPO", ""];
const ZONES: [&str; 5] = ["EST", "Central", "Pacific", "IST", ""];
const LEVELS: [&str; 3] = ["Full Course", "SQL Advanced", ""];
const EXPERTISE: [&str; 3] = ["Advanced", "Intermediate", "beginner"];

/// One generated roster row: email id (small range so duplicates occur),
/// track, zone, course level, expertise, employed, prior experience.
type Row = (usize, usize, usize, usize, usize, bool, bool);

fn row() -> impl Strategy<Value = Row> {
    (0usize..60, 0usize..5, 0usize..5, 0usize..3, 0usize..3, any::<bool>(), any::<bool>())
}

fn build_roster(rows: &[Row]) -> Vec<Participant> {
    rows.iter()
        .enumerate()
        .map(|(n, &(id, track, zone, level, expertise, employed, experienced))| {
            let email = if n % 2 == 0 {
                format!("person{id}@example.com")
            } else {
                format!("PERSON{id}@Example.com")
            };
            let mut p = Participant::new(email, format!("Person {n}"))
                .with_track(TRACKS[track])
                .with_time_zone(ZONES[zone])
                .with_course_level(LEVELS[level])
                .with_expertise(EXPERTISE[expertise]);
            p.employed = employed;
            p.prior_experience = experienced;
            p
        })
        .collect()
}

fn kind() -> impl Strategy<Value = EventKind> {
    (0..EventKind::ALL.len()).prop_map(|i| EventKind::ALL[i])
}

proptest! {
    /// Every roster entry ends up in exactly one team or in the unassigned list.
    #[test]
    fn prop_conservation(rows in prop::collection::vec(row(), 0..60), kind in kind(), seed in any::<u64>()) {
        let roster = build_roster(&rows);
        let result = allocate_teams_seeded(&roster, &EventProfile::preset(kind), seed);

        prop_assert_eq!(result.assigned_count() + result.unassigned.len(), roster.len());
        prop_assert_eq!(result.stats.assigned + result.stats.unassigned, roster.len());
        prop_assert!(result.teams.iter().all(|t| !t.is_empty()));
    }

    /// No identity is placed twice, and only duplicates stay unassigned.
    #[test]
    fn prop_identities_unique(rows in prop::collection::vec(row(), 1..60), kind in kind(), seed in any::<u64>()) {
        let roster = build_roster(&rows);
        let result = allocate_teams_seeded(&roster, &EventProfile::preset(kind), seed);

        let mut seen = HashSet::new();
        for team in &result.teams {
            for member in &team.members {
                prop_assert!(seen.insert(member.identity_key()), "{} placed twice", member.email);
            }
        }
        prop_assert_eq!(result.unassigned.len(), result.stats.duplicate_identities);
    }

    /// Custom profiles with any target size place everyone distinct.
    #[test]
    fn prop_custom_target_places_everyone(
        rows in prop::collection::vec(row(), 1..40),
        target in 1usize..9,
        seed in any::<u64>(),
    ) {
        let roster = build_roster(&rows);
        let profile = EventProfile::single(
            "Custom",
            "Team",
            target,
            vec![
                PassSpec::balance(Predicate::PriorExperience),
                PassSpec::track_cap("DVLPR", 1),
                PassSpec::proportional_split("SDET", "DA"),
                PassSpec::TimeZoneAffinity,
            ],
        )
        .unwrap();

        let result = allocate_teams_seeded(&roster, &profile, seed);

        prop_assert_eq!(result.stats.overflowing_teams, 0);
        prop_assert_eq!(result.unassigned.len(), result.stats.duplicate_identities);
    }

    /// Same seed, same membership.
    #[test]
    fn prop_seed_determinism(rows in prop::collection::vec(row(), 0..40), kind in kind(), seed in any::<u64>()) {
        let roster = build_roster(&rows);
        let profile = EventProfile::preset(kind);

        let first = allocate_teams_seeded(&roster, &profile, seed);
        let second = allocate_teams_seeded(&roster, &profile, seed);

        let emails = |r: &teamforge_core::AllocationResult| -> Vec<Vec<String>> {
            r.teams.iter().map(|t| t.members.iter().map(|m| m.email.clone()).collect()).collect()
        };
        prop_assert_eq!(emails(&first), emails(&second));
    }

    /// After balancing over fresh teams, teams that still have room differ
    /// by at most one in predicate count.
    #[test]
    fn prop_balance_is_even_among_open_teams(
        flags in prop::collection::vec(any::<bool>(), 1..50),
        target in 1usize..8,
        seed in any::<u64>(),
    ) {
        let roster: Vec<Participant> = flags
            .iter()
            .enumerate()
            .map(|(i, &employed)| {
                let p = Participant::new(format!("p{i}@x.io"), format!("P{i}"));
                if employed { p.employed() } else { p }
            })
            .collect();
        let plan = plan_teams(roster.len(), target, SizingStrategy::Nearest);
        let mut pool = TeamPool::new(&roster, (0..roster.len()).collect(), &plan, "Team");
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        balance_pass(&mut pool, |p| p.employed, &mut rng);

        let open: Vec<usize> = (0..pool.team_count())
            .filter(|&t| pool.has_room(t))
            .map(|t| pool.count_matching(t, |p| p.employed))
            .collect();
        if let (Some(max), Some(min)) = (open.iter().max(), open.iter().min()) {
            prop_assert!(max - min <= 1, "open team counts {:?}", open);
        }
    }
}
