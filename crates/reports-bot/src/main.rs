//! Disaster-report stream bot.
//!
//! Pushes the configured rule set to the upstream filtering service, then
//! keeps one stream connection alive and routes each inbound event through
//! dedup, classification, and reply dispatch.

use std::env;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use database::Database;
use responder_core::{CardClient, CardConfig, Dialogue, ReplyDispatcher};
use stream_client::{Rule, StreamClient, StreamConfig};
use stream_listener::{
    ClassifierConfig, ConnectionManager, DedupGate, EventClassifier, EventProcessor,
    ManagerConfig,
};

mod reply;
mod store;

use reply::{HttpReplySender, ReplyConfig};
use store::{SqliteInvitees, SqliteMarkStore};

#[derive(Debug, Parser)]
#[command(name = "reports-bot")]
#[command(about = "Ingest filtered social-media events and route disaster-report replies")]
struct Args {
    /// Stream endpoint URL
    #[arg(long)]
    stream_url: String,

    /// Rule replacement endpoint URL
    #[arg(long)]
    rules_url: String,

    /// Stream username. Falls back to STREAM_USERNAME env.
    #[arg(long)]
    username: Option<String>,

    /// Stream password. Falls back to STREAM_PASSWORD env.
    #[arg(long)]
    password: Option<String>,

    /// Backfill window in minutes requested on connect (0 disables)
    #[arg(long, default_value_t = 5)]
    backfill_minutes: u32,

    /// Filter rule as tag=expression (repeatable)
    #[arg(long = "rule")]
    rules: Vec<String>,

    /// SQLite database URL
    #[arg(long, default_value = "sqlite:data/reports.db?mode=rwc")]
    database_url: String,

    /// Card service base URL
    #[arg(long)]
    card_url: String,

    /// Card service API key. Falls back to CARD_API_KEY env.
    #[arg(long)]
    card_api_key: Option<String>,

    /// Network name reported with card requests
    #[arg(long, default_value = "twitter")]
    network: String,

    /// Prefix of user-facing card links
    #[arg(long)]
    card_url_prefix: String,

    /// Engagement service base URL (receives replies and operator notices)
    #[arg(long)]
    reply_url: String,

    /// Engagement service API key. Falls back to REPLY_API_KEY env.
    #[arg(long)]
    reply_api_key: Option<String>,

    /// Tag prefix marking events inside the tracked area
    #[arg(long, default_value = "area")]
    area_tag_prefix: String,

    /// Tag prefix marking events addressing our account
    #[arg(long, default_value = "addressed")]
    addressed_tag_prefix: String,

    /// Default language for replies
    #[arg(long, default_value = "id")]
    default_language: String,

    /// Initial reconnect backoff in milliseconds
    #[arg(long, default_value_t = 1000)]
    initial_backoff_ms: u64,

    /// Maximum reconnect backoff in milliseconds
    #[arg(long, default_value_t = 300_000)]
    max_backoff_ms: u64,

    /// Reconnect when no data arrives for this many milliseconds
    #[arg(long, default_value_t = 90_000)]
    idle_timeout_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let username = required(args.username.clone(), "STREAM_USERNAME")?;
    let password = required(args.password.clone(), "STREAM_PASSWORD")?;
    let card_api_key = required(args.card_api_key.clone(), "CARD_API_KEY")?;
    let reply_api_key = required(args.reply_api_key.clone(), "REPLY_API_KEY")?;

    let db = Database::connect(&args.database_url).await?;
    db.migrate().await?;

    let stream_config = StreamConfig::new(&args.stream_url, &args.rules_url, username, password)
        .with_backfill_minutes(args.backfill_minutes);
    let client = StreamClient::new(stream_config)?;

    // Replace the server-side rule set before opening the stream. A rejected
    // push is fatal: the stream must not be opened without known-good rules.
    let rules = parse_rules(&args.rules)?;
    client.replace_rules(&rules).await?;

    let sender = HttpReplySender::new(ReplyConfig {
        base_url: args.reply_url.clone(),
        api_key: reply_api_key,
    })?;
    let cards = CardClient::new(CardConfig {
        base_url: args.card_url.clone(),
        api_key: card_api_key,
        network: args.network.clone(),
        card_url_prefix: args.card_url_prefix.clone(),
    })?;
    let dispatcher = ReplyDispatcher::new(
        sender.clone(),
        SqliteInvitees::new(db.clone()),
        cards,
        dialogue(&args.default_language),
    );

    let mut classifier_config = ClassifierConfig::default();
    classifier_config.area_tag_prefix = args.area_tag_prefix.clone();
    classifier_config.addressed_tag_prefix = args.addressed_tag_prefix.clone();
    classifier_config.default_language = args.default_language.clone();

    let processor = EventProcessor::new(
        DedupGate::new(SqliteMarkStore::new(db.clone())),
        EventClassifier::new(classifier_config),
        dispatcher,
    );

    let manager_config = ManagerConfig {
        initial_backoff: Duration::from_millis(args.initial_backoff_ms),
        max_backoff: Duration::from_millis(args.max_backoff_ms),
        idle_timeout: Duration::from_millis(args.idle_timeout_ms),
    };
    let manager = ConnectionManager::new(client, processor, sender, manager_config);

    info!("Starting report stream bot v{}", env!("CARGO_PKG_VERSION"));
    manager
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for Ctrl+C");
        })
        .await?;

    info!("Shut down cleanly");
    Ok(())
}

/// Resolve a secret from the CLI flag or the named environment variable.
fn required(arg: Option<String>, var: &str) -> Result<String, Box<dyn std::error::Error>> {
    match arg {
        Some(value) => Ok(value),
        None => env::var(var).map_err(|_| format!("{} not set", var).into()),
    }
}

/// Parse repeated `tag=expression` flags into the rule set.
fn parse_rules(raw: &[String]) -> Result<Vec<Rule>, Box<dyn std::error::Error>> {
    raw.iter()
        .map(|entry| {
            entry
                .split_once('=')
                .map(|(tag, value)| Rule::new(tag, value))
                .ok_or_else(|| format!("invalid rule (want tag=expression): {}", entry).into())
        })
        .collect()
}

/// Reply text tables. These are configuration handed to the dispatcher, not
/// globals baked into the pipeline.
fn dialogue(default_language: &str) -> Dialogue {
    Dialogue::new(default_language)
        .with_welcome(
            "en",
            "Hello, I am ReportBot, reply with #flood to send me your flood report.",
        )
        .with_welcome(
            "id",
            "Halo, saya ReportBot. Untuk melaporkan banjir di sekitarmu, silakan balas dengan #banjir.",
        )
        .with_card_request("en", "Hi! Report flood using this link. Thanks!")
        .with_card_request(
            "id",
            "Hai! Gunakan link ini untuk menginput lokasi banjir, keterangan, & foto.",
        )
        .with_disaster_mention("flood", "Balas dengan #banjir / reply with #flood.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rules_accepts_tag_expression_pairs() {
        let rules = parse_rules(&[
            "area_city=point_radius:[106.8 -6.2 25km]".to_string(),
            "addressed_bot=@reportbot".to_string(),
        ])
        .unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].tag, "area_city");
        assert_eq!(rules[1].value, "@reportbot");
    }

    #[test]
    fn parse_rules_rejects_missing_separator() {
        assert!(parse_rules(&["nonsense".to_string()]).is_err());
    }

    #[test]
    fn empty_rule_list_is_allowed() {
        // Whether an empty set is acceptable is the upstream's call; the
        // push itself goes through.
        assert!(parse_rules(&[]).unwrap().is_empty());
    }

    #[test]
    fn dialogue_falls_back_to_default_language() {
        let d = dialogue("id");
        assert!(d.welcome_text("fr").unwrap().contains("#banjir"));
    }
}
