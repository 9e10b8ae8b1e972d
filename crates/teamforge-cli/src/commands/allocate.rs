//! `teamforge allocate`: load a roster, pick a profile, form teams.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use teamforge_core::{AllocationResult, EventKind, EventProfile, Participant};
use teamforge_engine::{allocate_teams, allocate_teams_seeded};

pub fn allocate(
    roster: &str,
    event: Option<&str>,
    profile: Option<&str>,
    seed: Option<u64>,
    format: &str,
) -> Result<()> {
    let profile = resolve_profile(event, profile)?;
    let participants = load_roster(Path::new(roster))?;
    info!(event = %profile.name, participants = participants.len(), "allocating teams");

    let result = match seed {
        Some(seed) => allocate_teams_seeded(&participants, &profile, seed),
        None => allocate_teams(&participants, &profile),
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => print!("{}", format_report(&result)),
    }

    Ok(())
}

/// Built-in profile by event slug, or a profile file.
pub fn resolve_profile(event: Option<&str>, profile: Option<&str>) -> Result<EventProfile> {
    match (event, profile) {
        (Some(slug), None) => {
            let kind: EventKind = slug.parse()?;
            Ok(EventProfile::preset(kind))
        }
        (None, Some(path)) => EventProfile::from_file(Path::new(path))
            .with_context(|| format!("failed to load profile {path}")),
        (Some(_), Some(_)) => bail!("use either --event or --profile, not both"),
        (None, None) => bail!("an --event or --profile is required"),
    }
}

/// Read a JSON roster. Rows with a blank email or name are skipped with
/// a warning, since the engine expects both to be present.
pub fn load_roster(path: &Path) -> Result<Vec<Participant>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster {}", path.display()))?;
    let rows: Vec<Participant> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse roster {}", path.display()))?;

    let total = rows.len();
    let roster: Vec<Participant> = rows
        .into_iter()
        .filter(|p| !p.email.trim().is_empty() && !p.name.trim().is_empty())
        .collect();

    if roster.len() < total {
        warn!(skipped = total - roster.len(), "roster rows without email or name were skipped");
    }
    Ok(roster)
}

pub fn format_report(result: &AllocationResult) -> String {
    let mut out = String::new();

    out.push_str(&result.summary);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    if let Some(seed) = result.seed {
        out.push_str(&format!("Seed: {seed}\n"));
    }
    out.push('\n');

    for team in &result.teams {
        out.push_str(&format!("{} [{}] ({}/{})\n", team.name, team.cohort, team.len(), team.capacity));
        out.push_str(&format!("  {}\n", team.stats));
        for member in &team.members {
            out.push_str(&format!(
                "  • {} <{}> {} {}\n",
                member.name,
                member.email,
                member.track_label(),
                member.time_zone_bucket()
            ));
        }
        out.push('\n');
    }

    if !result.unassigned.is_empty() {
        out.push_str("UNASSIGNED:\n");
        for p in &result.unassigned {
            out.push_str(&format!("  • {} <{}>\n", p.name, p.email));
        }
    }

    out
}
