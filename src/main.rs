//! Binary entrypoint for the Aetheria profile CLI.
//!
//! Commands:
//! - `init` - create a starter `config.toml` and the data directory
//! - `status` - print the active profile summary
//! - `onboard <name> <specialty>` - create the profile
//! - `rename`, `appearance`, `visit`, `buy` - profile edits
//! - `districts`, `market`, `chronicle` - read-only listings
//! - `export [--out <path>]`, `import <path>`, `reset --yes` - whole-document operations
//! - `briefing`, `advise <prompt>` - text from the advice service
//!
//! See the library crate docs for module-level details: `aetheria::`.
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::time::Duration;
use tokio::sync::watch;

use aetheria::advice::{
    advisor_from_config, AdviceDesk, AdvicePurpose, AdviceReply, CreativeProject,
};
use aetheria::config::Config;
use aetheria::profile::{AppearanceField, AvatarState};
use aetheria::world;

#[derive(Parser)]
#[command(name = "aetheria")]
#[command(about = "Persistent player profile manager for the Aetheria world")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file and create the data directory
    Init,
    /// Show the active profile
    Status,
    /// Create the profile (Vanguard, Architect or Envoy)
    Onboard { name: String, specialty: String },
    /// Change the display name
    Rename { name: String },
    /// Set one appearance field (hair-color, skin-tone, outfit)
    Appearance { field: String, value: String },
    /// Visit a district by id
    Visit { district: String },
    /// Buy a catalog item by id
    Buy { item: String },
    /// List districts and when they were last visited
    Districts,
    /// List the market catalog
    Market,
    /// Show recent chronicle entries
    Chronicle {
        /// Number of entries to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Export the profile document
    Export {
        /// Output file (defaults to aetheria_profile_<name>.json)
        #[arg(short, long)]
        out: Option<String>,
    },
    /// Replace the profile with a previously exported document
    Import { path: String },
    /// Erase the saved profile
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
    /// Ask the advice service for a daily briefing
    Briefing,
    /// Ask the creative assistant for ideas
    Advise {
        prompt: String,
        /// Project context line (defaults to the sandbox map)
        #[arg(long)]
        context: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init writes the config, so it runs with defaults
    let config = match cli.command {
        Commands::Init => Config::default(),
        _ => Config::load_or_default(&cli.config).await?,
    };
    init_logging(&config, cli.verbose);

    match cli.command {
        Commands::Init => {
            if std::path::Path::new(&cli.config).exists() {
                println!("Configuration already exists at {}", cli.config);
            } else {
                Config::create_default(&cli.config).await?;
                println!("Created default configuration at {}", cli.config);
            }
            let config = Config::load(&cli.config).await?;
            tokio::fs::create_dir_all(&config.profile.data_dir).await?;
            println!("Data directory: {}", config.profile.data_dir);
        }
        Commands::Status => {
            let store = config.profile.open_store()?;
            match store.profile() {
                Some(profile) => print_status(profile),
                None => println!("No profile. Run `aetheria onboard <name> <specialty>` to begin."),
            }
            println!("Slot: {}", store.slot_description());
        }
        Commands::Onboard { name, specialty } => {
            let mut store = config.profile.open_store()?;
            let profile = store.complete_onboarding(&name, &specialty)?;
            println!(
                "Welcome, {}. {} identity synchronized with {} Aethels.",
                profile.name, profile.specialty, profile.currency
            );
        }
        Commands::Rename { name } => {
            let mut store = config.profile.open_store()?;
            store.rename(&name)?;
            println!("Display name set to {}", name);
        }
        Commands::Appearance { field, value } => {
            let field: AppearanceField = field.parse().map_err(|e: String| anyhow!(e))?;
            let mut store = config.profile.open_store()?;
            store.set_appearance(field, &value)?;
            println!("{} set to {}", field.key(), value);
        }
        Commands::Visit { district } => {
            let target = world::find_district(&district)
                .ok_or_else(|| anyhow!("unknown district '{}'", district))?;
            let mut store = config.profile.open_store()?;
            store.visit_district(target.id, target.name)?;
            println!("{} Entered {}.", target.icon, target.name);
        }
        Commands::Buy { item } => {
            let item = world::find_item(&item).ok_or_else(|| anyhow!("unknown item '{}'", item))?;
            let mut store = config.profile.open_store()?;
            let balance = store.purchase(&item)?;
            println!("Acquired {} for {}. Balance: {} Aethels", item.name, item.price, balance);
        }
        Commands::Districts => {
            let store = config.profile.open_store()?;
            for district in world::districts() {
                let visited = store
                    .profile()
                    .and_then(|p| p.last_visit(district.id))
                    .map(format_millis)
                    .unwrap_or_else(|| "never".to_string());
                println!(
                    "{:<3} {} {:<14} {:<8} last visit: {}",
                    district.id,
                    district.icon,
                    district.name,
                    format!("{:?}", district.kind),
                    visited
                );
            }
        }
        Commands::Market => {
            let store = config.profile.open_store()?;
            for item in world::catalog() {
                let owned = store.profile().map(|p| p.owned_count(&item.id)).unwrap_or(0);
                let marker = if owned > 0 { format!(" (owned x{})", owned) } else { String::new() };
                println!(
                    "{:<3} {:<16} {:>5} {:<9} {:<10}{}",
                    item.id,
                    item.name,
                    item.price,
                    item.category,
                    item.rarity.to_string(),
                    marker
                );
            }
        }
        Commands::Chronicle { limit } => {
            let store = config.profile.open_store()?;
            let profile = store.profile().ok_or_else(|| anyhow!("no active profile"))?;
            for entry in profile.chronicles.iter().take(limit) {
                println!("{} [{}] {}", format_millis(entry.timestamp), entry.kind, entry.text);
            }
        }
        Commands::Export { out } => {
            let store = config.profile.open_store()?;
            let document = store.export_raw()?;
            let path = match out.or_else(|| store.export_filename()) {
                Some(path) => path,
                None => return Err(anyhow!("no active profile")),
            };
            tokio::fs::write(&path, document).await?;
            info!("exported profile to {}", path);
            println!("Profile exported to {}", path);
        }
        Commands::Import { path } => {
            let document = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| anyhow!("Failed to read {}: {}", path, e))?;
            let mut store = config.profile.open_store()?;
            store.import_raw(&document)?;
            println!("Identity restored from {}", path);
        }
        Commands::Reset { yes } => {
            if !yes {
                println!("This permanently erases the saved profile. Re-run with --yes to confirm.");
                return Ok(());
            }
            let mut store = config.profile.open_store()?;
            store.reset_profile()?;
            println!("Profile erased.");
        }
        Commands::Briefing => {
            let store = config.profile.open_store()?;
            let snapshot = store
                .profile()
                .map(AvatarState::briefing_snapshot)
                .ok_or_else(|| anyhow!("no active profile"))?;
            let desk = advice_desk(&config);
            let replies = desk.subscribe(AdvicePurpose::Briefing);
            desk.submit_briefing(snapshot);
            println!("{}", next_reply(replies).await?);
        }
        Commands::Advise { prompt, context } => {
            let context = context.unwrap_or_else(|| CreativeProject::default().context());
            let desk = advice_desk(&config);
            let replies = desk.subscribe(AdvicePurpose::Creative);
            desk.submit_creative(prompt, context);
            println!("{}", next_reply(replies).await?);
        }
    }

    Ok(())
}

fn advice_desk(config: &Config) -> AdviceDesk<aetheria::advice::ConfiguredAdvisor> {
    let advisor = advisor_from_config(&config.advice);
    if config.advice.enabled && !advisor.is_online() {
        warn!("advice is enabled but no API key is set; using offline text");
    }
    // Slightly longer than the HTTP timeout
    let deadline = Duration::from_secs(u64::from(config.advice.timeout_seconds) + 1);
    AdviceDesk::new(advisor).with_deadline(deadline)
}

/// Wait for the next published reply and return its text.
async fn next_reply(mut replies: watch::Receiver<Option<AdviceReply>>) -> Result<String> {
    replies.changed().await?;
    let reply = replies.borrow_and_update().clone();
    reply
        .map(|reply| reply.text)
        .ok_or_else(|| anyhow!("advice desk published an empty reply"))
}

fn print_status(profile: &AvatarState) {
    let (top_skill, top_value) = profile.top_skill();
    println!("{} - Level {} {}", profile.name, profile.level, profile.specialty);
    println!(
        "Aethels: {} (season progress {}%)",
        profile.currency,
        profile.season_progress_percent()
    );
    println!(
        "Skills: {}",
        profile
            .skills
            .entries()
            .iter()
            .map(|(name, value)| format!("{} {}", name, value))
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("Top skill: {} ({})", top_skill, top_value);
    println!(
        "Appearance: hair {}, skin {}, outfit {}",
        profile.appearance.hair_color, profile.appearance.skin_tone, profile.appearance.outfit
    );
    println!(
        "Inventory: {} item(s); districts discovered: {}/{}",
        profile.inventory.len(),
        profile.world_discovery.len(),
        world::districts().len()
    );
    if let Some(latest) = profile.chronicles.first() {
        println!("Latest: {}", latest.text);
    }
}

fn format_millis(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn init_logging(config: &Config, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config.logging.level_filter(),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config.logging.file.as_ref().and_then(|path| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });

    if let Some(f) = log_file {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Echo to stderr only when attached to a terminal
        let is_tty = atty::is(atty::Stream::Stderr);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
