use std::path::Path;

use anyhow::{Context, Result};

use teamforge_core::{EventKind, EventProfile};

pub fn show(event: &str) -> Result<()> {
    let kind: EventKind = event.parse()?;
    print!("{}", EventProfile::preset(kind).to_toml_string()?);
    Ok(())
}

pub fn check(path: &str) -> Result<()> {
    let profile = EventProfile::from_file(Path::new(path))
        .with_context(|| format!("profile {path} is not valid"))?;
    print!("{}", describe(&profile));
    Ok(())
}

fn describe(profile: &EventProfile) -> String {
    let mut out = format!("✓ {} ({} cohorts)\n", profile.name, profile.cohorts.len());
    for cohort in &profile.cohorts {
        let base = if cohort.name.eq_ignore_ascii_case(&profile.base_cohort) {
            ", base"
        } else {
            ""
        };
        out.push_str(&format!(
            "  {}: target {}{}, {} passes\n",
            cohort.name,
            cohort.target_size,
            base,
            cohort.passes.len()
        ));
    }
    out
}
