use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hub_stats::api::{build_router, state::AppState};
use hub_stats::calculate::{summarize_match, Standings};
use hub_stats::config::AppConfig;
use hub_stats::fetch::{ClientConfig, FaceitClient, HubDataSource};
use hub_stats::models::{HubSnapshot, MatchId};
use hub_stats::parse_duration;
use hub_stats::sync::{load_hub_snapshot, HubDashboard, LoadSettings};

#[derive(Parser)]
#[command(name = "hub-stats")]
#[command(about = "Aggregated player statistics for a FACEIT hub")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,

        /// Reload the hub periodically (e.g., "10m", "1h")
        #[arg(long)]
        reload_interval: Option<String>,
    },

    /// Load the hub once and print the ranked table
    Stats {
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,

        /// Only show the first N players
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print the scoreboard of one match
    Match {
        /// Match ID
        match_id: String,
    },

    /// Print the configured leaderboard
    Leaderboard,
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_client(config: &AppConfig) -> Result<FaceitClient> {
    let api_key = config.upstream.api_key();
    if api_key.is_none() {
        tracing::warn!(
            "{} is not set; upstream requests will be unauthenticated",
            config.upstream.api_key_env
        );
    }
    let client_config = ClientConfig::new(&config.upstream.base_url, api_key)?
        .with_timeout(config.upstream.timeout());
    Ok(FaceitClient::new(client_config)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    let log_level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    init_tracing(log_level, cli.json_logs);

    tracing::info!("Starting hub-stats v{}", env!("CARGO_PKG_VERSION"));

    let client = Arc::new(build_client(&config)?);
    let settings = LoadSettings::from(&config);

    match cli.command {
        Commands::Serve {
            host,
            port,
            reload_interval,
        } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let reload_interval =
                reload_interval.or_else(|| config.server.reload_interval.clone());
            let reload_interval = match reload_interval {
                Some(raw) => match parse_duration(&raw) {
                    Some(d) if !d.is_zero() => Some(d),
                    _ => bail!("Invalid reload interval: {}", raw),
                },
                None => None,
            };

            let source: Arc<dyn HubDataSource> = client.clone();
            let dashboard = Arc::new(HubDashboard::new(source, settings));

            let generation = dashboard.spawn_reload().await;
            tracing::info!("Initial load started (generation {})", generation);

            if let Some(every) = reload_interval {
                tokio::spawn(dashboard.clone().run_periodic(every));
            }

            let state = AppState::new(dashboard, client);
            let app = build_router(state, &config.server.cors_origin);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Dashboard: http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Stats { json, limit } => {
            let mut snapshot = load_hub_snapshot(&*client, &settings, 1)
                .await
                .context("Hub load failed")?;
            if let Some(limit) = limit {
                snapshot.players.truncate(limit);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print_snapshot(&snapshot);
            }
        }
        Commands::Match { match_id } => {
            let stats = client
                .match_statistics(&MatchId::from(match_id.as_str()))
                .await
                .with_context(|| format!("Failed to fetch match {}", match_id))?;
            let summary = summarize_match(&stats);

            println!(
                "\n=== {} | {} | {} ({} rounds) ===",
                summary.map, summary.region, summary.score, summary.rounds
            );
            for team in &summary.teams {
                println!(
                    "\n{} {} - {} kills, avg ADR {}",
                    team.name,
                    if team.win { "(W)" } else { "(L)" },
                    team.total_kills(),
                    team.average_adr()
                        .map(|adr| format!("{:.1}", adr))
                        .unwrap_or_else(|| "-".to_string())
                );
                for p in &team.players {
                    println!(
                        "  {:<20} {:>3} / {:>3}  K/D {}",
                        p.nickname,
                        p.kills,
                        p.deaths,
                        p.kd_ratio
                            .map(|kd| format!("{:.2}", kd))
                            .unwrap_or_else(|| "-".to_string())
                    );
                }
            }
        }
        Commands::Leaderboard => {
            let Some(leaderboard_id) = settings.leaderboard_id.clone() else {
                bail!("No leaderboard_id configured");
            };
            let response = client
                .leaderboard(&leaderboard_id)
                .await
                .context("Failed to fetch leaderboard")?;
            let standings = Standings::new(leaderboard_id, &response);

            if let Some(name) = &standings.name {
                println!("\n=== {} ===", name);
            }
            println!(
                "{:>4}  {:<20} {:>7} {:>4} {:>4} {:>7}",
                "#", "Player", "Points", "W", "L", "Win%"
            );
            for row in &standings.entries {
                println!(
                    "{:>4}  {:<20} {:>7.0} {:>4} {:>4} {:>6.1}%",
                    row.position, row.nickname, row.points, row.won, row.lost, row.win_rate
                );
            }
        }
    }

    Ok(())
}

fn print_snapshot(snapshot: &HubSnapshot) {
    println!(
        "\n=== Hub {} - {} finished matches ===",
        snapshot.hub_id, snapshot.match_count
    );
    for warning in &snapshot.warnings {
        println!("warning: {}", warning);
    }
    if snapshot.is_empty() {
        println!("No players.");
        return;
    }

    println!(
        "{:>3}  {:<20} {:>6} {:>4} {:>4} {:>6} {:>5} {:>5} {:>5} {:>6} {:>5}",
        "#", "Player", "Pts", "M", "W", "Win%", "K", "D", "K/D", "ADR", "HS%"
    );
    for row in &snapshot.players {
        let p = &row.stats;
        println!(
            "{:>3}  {:<20} {:>6.0} {:>4} {:>4} {:>5.1}% {:>5} {:>5} {:>5.2} {:>6.1} {:>4.0}%",
            row.position,
            p.nickname,
            p.points,
            p.matches,
            p.wins,
            p.win_rate,
            p.stats.kills,
            p.stats.deaths,
            p.kd_ratio,
            p.adr,
            p.hs_percent
        );
    }
}
