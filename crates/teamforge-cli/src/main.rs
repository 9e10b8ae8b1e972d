use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "teamforge",
    about = "Teamforge: balanced team formation for cohort events",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Allocate a roster into teams.
    ///
    /// The roster is a JSON array of participants. Use --event for a
    /// built-in event profile or --profile for a TOML profile file.
    Allocate {
        /// Path to the roster JSON file
        #[arg(short, long)]
        roster: String,
        /// Built-in event type (e.g. sql-bootcamp, selenium-hackathon)
        #[arg(short, long, conflicts_with = "profile", required_unless_present = "profile")]
        event: Option<String>,
        /// Path to an event profile TOML file
        #[arg(short, long)]
        profile: Option<String>,
        /// Seed for reproducible team membership
        #[arg(short, long)]
        seed: Option<u64>,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Inspect event profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Print a built-in event profile as TOML
    Show {
        #[arg(short, long)]
        event: String,
    },
    /// Validate a profile file
    Check {
        #[arg(short, long)]
        path: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("teamforge=info".parse()?)
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Allocate { roster, event, profile, seed, format } => {
            commands::allocate::allocate(&roster, event.as_deref(), profile.as_deref(), seed, &format)
        }
        Commands::Profile { action } => match action {
            ProfileAction::Show { event } => commands::profile::show(&event),
            ProfileAction::Check { path } => commands::profile::check(&path),
        },
    }
}
