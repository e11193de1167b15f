//! Command-line front end over a JSON document store file.
//!
//! ```bash
//! vitals-cli summary --store store.json --user u1
//! vitals-cli generate --store store.json --user u1 --profile sick --from 2025-11-20 --to 2025-11-26
//! vitals-cli admin --store store.json --email admin@samsung.cl --search juan
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vitals_core::{
    AdminEmailPolicy, CurrentReading, DailySummary, Identity, StressBand, VitalsConfig,
};
use vitals_records::overview::filter_users;
use vitals_store::{load_admin_overview, upload_events, DashboardState, MemoryStore};
use vitals_synth::Profile;

#[derive(Parser, Debug)]
#[command(
    name = "vitals-cli",
    about = "Daily health summaries, synthetic records and the admin overview."
)]
struct Cli {
    /// Log at debug level unless RUST_LOG is set.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reconcile a user's records into the trailing daily window.
    Summary(SummaryArgs),
    /// Generate synthetic records and upload them, or preview them.
    Generate(GenerateArgs),
    /// Print the admin overview for an authorized email.
    Admin(AdminArgs),
}

#[derive(Args, Debug)]
struct StoreArgs {
    /// JSON file holding the document store.
    #[arg(short, long)]
    store: PathBuf,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    #[command(flatten)]
    store: StoreArgs,
    #[arg(short, long)]
    user: String,
    /// Distinct dates to keep.
    #[arg(long)]
    window: Option<usize>,
    /// Raw documents to read.
    #[arg(long)]
    limit: Option<usize>,
    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    store: StoreArgs,
    #[arg(short, long)]
    user: String,
    /// healthy or sick.
    #[arg(long, default_value = "healthy")]
    profile: String,
    /// Use the weekly routine instead of a profile.
    #[arg(long)]
    routine: bool,
    /// First date, YYYY-MM-DD.
    #[arg(long)]
    from: NaiveDate,
    /// Last date, YYYY-MM-DD.
    #[arg(long)]
    to: NaiveDate,
    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// Print the records instead of writing them.
    #[arg(long)]
    preview: bool,
}

#[derive(Args, Debug)]
struct AdminArgs {
    #[command(flatten)]
    store: StoreArgs,
    /// Email of the caller.
    #[arg(short, long)]
    email: String,
    /// Only list users matching this term.
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = VitalsConfig::from_env();
    match cli.command {
        Command::Summary(args) => summary(args, config).await,
        Command::Generate(args) => generate(args).await,
        Command::Admin(args) => admin(args, config).await,
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn summary(args: SummaryArgs, mut config: VitalsConfig) -> anyhow::Result<()> {
    if let Some(window) = args.window {
        config.window_days = window;
    }
    if let Some(limit) = args.limit {
        config.fetch_limit = limit;
    }

    let store = load_store(&args.store.store)?;
    let mut state = DashboardState::new();
    state.refresh(&store, &args.user, &config).await;
    if let Some(err) = state.last_error() {
        bail!("could not load health records for {}: {err}", args.user);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(state.summary())?);
    } else {
        print_summary(state.summary());
    }
    Ok(())
}

fn print_summary(summary: &DailySummary) {
    println!("Generated at: {}", summary.generated_at);
    println!("Days: {} (skipped documents: {})", summary.days.len(), summary.skipped);
    for day in &summary.days {
        println!(
            "  {}  sleep {:>4.1} h  hr {:>3} ({}-{})  steps {:>6}  stress {}  spo2 {}",
            day.date,
            day.sleep_hours,
            day.heart_rate,
            day.heart_rate_min,
            day.heart_rate_max,
            day.daily_steps,
            display_option(day.stress_level),
            display_option(day.oxygen_saturation),
        );
    }

    match summary.average_sleep() {
        Some(hours) => println!("Average sleep: {hours:.1} h"),
        None => println!("Average sleep: no data"),
    }

    let stress = match summary.current() {
        Some(CurrentReading::Written(event)) => event.stress_level,
        Some(CurrentReading::Daily(day)) => day.stress_level,
        None => None,
    };
    if let Some(level) = stress {
        println!("Current stress: {level} ({:?})", StressBand::from_level(level));
    }
}

fn display_option(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

async fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let events = if args.routine {
        vitals_synth::generate_routine(args.from, args.to, &mut rng)
    } else {
        let profile: Profile = args.profile.parse()?;
        vitals_synth::generate(profile, args.from, args.to, &mut rng)
    };
    info!(records = events.len(), from = %args.from, to = %args.to, "generated records");

    if args.preview {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    let path = &args.store.store;
    let store = if path.exists() {
        load_store(path)?
    } else {
        MemoryStore::new()
    };

    let report = upload_events(&store, &args.user, &events, |done, total| {
        tracing::debug!(done, total, "record written");
    })
    .await;

    let contents = serde_json::to_string_pretty(&store.to_json().await)?;
    std::fs::write(path, contents).with_context(|| format!("Could not write {path:?}"))?;

    println!("{}", report.message());
    if !report.is_complete() {
        bail!("upload did not complete");
    }
    Ok(())
}

async fn admin(args: AdminArgs, config: VitalsConfig) -> anyhow::Result<()> {
    let store = load_store(&args.store.store)?;
    let identity = Identity::new(args.email.clone(), Some(args.email.clone()));
    let policy = AdminEmailPolicy::from_config(&config);

    let dashboard = load_admin_overview(&store, &identity, &policy, &config).await?;
    let users = match args.search.as_deref() {
        Some(term) => filter_users(&dashboard.users, term),
        None => dashboard.users.iter().collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&dashboard.overview)?);
        return Ok(());
    }

    let stats = &dashboard.overview.stats;
    println!(
        "Users: {}  with data: {}  with emergency contact: {}  high stress: {}",
        stats.total, stats.with_health_data, stats.with_emergency_contact, stats.high_stress
    );
    if let Some(avg) = &dashboard.overview.averages {
        println!(
            "Averages: sleep {:.1} h  stress {:.0}  steps {:.0}  hr {:.0}  spo2 {:.0}",
            avg.sleep_hours, avg.stress_level, avg.daily_steps, avg.heart_rate, avg.oxygen_saturation
        );
    }
    for user in users {
        let latest = user
            .last_health_record
            .as_ref()
            .map_or_else(|| "no records".to_string(), |r| format!("last {}", r.date));
        let risk = dashboard
            .overview
            .risks
            .iter()
            .find(|risk| risk.id == user.profile.id)
            .map_or_else(String::new, |risk| format!("  risk {:?}", risk.risk));
        println!("  {:<24} {:<28} {latest}{risk}", user.profile.name, user.profile.email);
    }
    Ok(())
}

fn load_store(path: &Path) -> anyhow::Result<MemoryStore> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read store file {path:?}"))?;
    MemoryStore::from_json_str(&data).with_context(|| format!("Invalid store file {path:?}"))
}
