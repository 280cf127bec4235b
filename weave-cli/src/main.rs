//! weave-cli — operator frontend for the connection-graph analytics engine
//!
//! # Subcommands
//! - `health`                         — check database connectivity
//! - `stats <user-id>`                — per-user network statistics
//! - `ego [--depth N] [--center ID]`  — ego network (or full bounded graph)
//! - `top [--limit N]`                — top connectors leaderboard
//! - `refresh-badges`                 — run one badge synchronization sweep

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};
use weave_core::models::{ConnectorProfile, EgoNetwork, NetworkStats};
use weave_core::storage::PgStorage;
use weave_core::WeaveConfig;
use weave_engine::AnalyticsService;

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "weave-cli",
    version,
    about = "Connection graph analytics — ego networks, statistics, connector scores, badges"
)]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, env = "WEAVE_CONFIG", default_value = "weave.toml")]
    config: String,

    /// Emit machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check database connectivity
    Health,

    /// Network statistics for one user
    Stats {
        /// User id
        user_id: i64,
    },

    /// Extract an ego network (or the full graph at bounded depth)
    Ego {
        /// Traversal depth, 1–5
        #[arg(short, long, default_value_t = 2)]
        depth: u32,

        /// Center user id; omit for the full graph
        #[arg(long)]
        center: Option<i64>,
    },

    /// Top connectors by composite strength score
    Top {
        /// Number of profiles to return, 1–50
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Run one badge synchronization sweep
    RefreshBadges,
}

// ============================================================================
// Output Formatting
// ============================================================================

fn format_stats(stats: &NetworkStats) -> String {
    format!(
        "User {}\n\
         Direct connections:  {}\n\
         Second degree:       {}\n\
         Network size:        {}\n\
         Clustering:          {:.3}\n\
         Avg path length:     {:.2}",
        stats.user_id,
        stats.direct_connections,
        stats.second_degree_connections,
        stats.network_size,
        stats.clustering_coefficient,
        stats.average_path_length
    )
}

fn format_ego(network: &EgoNetwork) -> String {
    let mut lines = vec![format!(
        "{} nodes, {} links",
        network.nodes.len(),
        network.links.len()
    )];
    for node in &network.nodes {
        lines.push(format!(
            "  [{}] {} <{}> — {} connections",
            node.id, node.label, node.email, node.connection_count
        ));
    }
    for link in &network.links {
        lines.push(format!(
            "  {} — {} (strength {})",
            link.source, link.target, link.strength
        ));
    }
    lines.join("\n")
}

fn format_profiles(profiles: &[ConnectorProfile]) -> String {
    let mut lines = Vec::new();
    for (i, profile) in profiles.iter().enumerate() {
        let badges: Vec<String> = profile.badges.iter().map(|b| b.to_string()).collect();
        lines.push(format!(
            "#{:<3} {} (id {}) — score {:.0}, {} connections, {} pts{}",
            i + 1,
            profile.display_name,
            profile.user_id,
            profile.strength_score,
            profile.connection_count,
            profile.point_balance,
            if badges.is_empty() {
                String::new()
            } else {
                format!(" [{}]", badges.join(", "))
            }
        ));
    }
    lines.join("\n")
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience — production uses real env vars)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = match WeaveConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", cli.config, e);
            std::process::exit(1);
        }
    };

    let pool = match weave_core::db::create_pool(&config.database).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    let service =
        AnalyticsService::with_badge_config(PgStorage::new(pool.clone()), config.badges);

    match cli.command {
        Commands::Health => {
            match weave_core::db::health_check(&pool).await {
                Ok(v) => println!("PostgreSQL connected: {}", v),
                Err(e) => {
                    eprintln!("PostgreSQL connection failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Stats { user_id } => {
            let stats = service.user_stats(user_id).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{}", format_stats(&stats));
            }
        }
        Commands::Ego { depth, center } => {
            let network = service.ego_graph(depth, center).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&network)?);
            } else {
                println!("{}", format_ego(&network));
            }
        }
        Commands::Top { limit } => {
            let profiles = service.top_connectors(limit).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&profiles)?);
            } else {
                println!("{}", format_profiles(&profiles));
            }
        }
        Commands::RefreshBadges => {
            let report = service.refresh_badges().await?;
            println!(
                "Badge sweep: super_connector +{}/-{}, top_earner +{}/-{}, early_adopter +{} ({}ms)",
                report.super_connector_granted,
                report.super_connector_revoked,
                report.top_earner_granted,
                report.top_earner_revoked,
                report.early_adopter_granted,
                report.elapsed_ms
            );
        }
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
