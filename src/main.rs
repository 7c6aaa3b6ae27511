use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quake_rankings::api::{build_router, cors_layer, state::AppState};
use quake_rankings::calculate::{
    filter_summary, rank_players, search_players, sort_ranked, sort_tournaments, RankedPlayer,
    SortKey, SortOrder, TournamentSortKey,
};
use quake_rankings::config::AppConfig;
use quake_rankings::engine::RankingEngine;
use quake_rankings::models::{Filters, TournamentRecord};
use quake_rankings::source;
use quake_rankings::storage::{JsonlWriter, StorageConfig};

#[derive(Parser)]
#[command(name = "quake-rankings")]
#[command(about = "Rankings and player pages for competitive Quake tournaments")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Filter overrides shared by `rank` and `player`.
#[derive(clap::Args)]
struct FilterArgs {
    /// Only this game ("All" for every game)
    #[arg(long)]
    game: Option<String>,

    /// Only this mode ("All" for every mode)
    #[arg(long)]
    mode: Option<String>,

    /// First year, inclusive
    #[arg(long)]
    from: Option<i32>,

    /// Last year, inclusive
    #[arg(long)]
    to: Option<i32>,

    /// Only LAN tournaments
    #[arg(long)]
    lan: bool,
}

impl FilterArgs {
    fn apply(&self, base: &Filters) -> Result<Filters> {
        let mut filters = base.clone();
        if let Some(game) = &self.game {
            filters.game = Filters::selection(game);
        }
        if let Some(mode) = &self.mode {
            filters.mode = Filters::selection(mode);
        }
        if let Some(from) = self.from {
            filters.year_range.0 = from;
        }
        if let Some(to) = self.to {
            filters.year_range.1 = to;
        }
        if self.lan {
            filters.lan_only = true;
        }
        if filters.year_range.0 > filters.year_range.1 {
            bail!(
                "--from {} is after --to {}",
                filters.year_range.0,
                filters.year_range.1
            );
        }
        Ok(filters)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the aggregate ranking
    Rank {
        #[command(flatten)]
        filters: FilterArgs,

        /// Column to sort by (rank, player, games, modes, 1st, 2nd, top4, top8, participations, points)
        #[arg(long, default_value = "points")]
        sort: String,

        /// Sort direction (asc, desc)
        #[arg(long, default_value = "desc")]
        order: String,

        /// Only players whose name contains this text
        #[arg(long)]
        search: Option<String>,

        /// Max rows to print
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print a player's page
    Player {
        /// Player name (case-insensitive)
        name: String,

        #[command(flatten)]
        filters: FilterArgs,

        /// Order tournaments by event_name, year, placement or points
        #[arg(long, default_value = "year")]
        sort: String,

        /// Sort direction (asc, desc)
        #[arg(long, default_value = "asc")]
        order: String,
    },

    /// Print the number of tournament rows in the source
    Count,

    /// Start the API server
    Serve {
        /// Bind address (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides the config file)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Import a JSON array export of the tournament table into the data directory
    Import {
        /// JSON file containing an array of tournament rows
        input: PathBuf,

        /// Append to the existing table instead of replacing it
        #[arg(long)]
        append: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config {:?}", cli.config))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    // Initialize tracing
    let log_level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting quake-rankings v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Rank {
            filters,
            sort,
            order,
            search,
            limit,
        } => {
            let sort: SortKey = sort.parse().map_err(anyhow::Error::msg)?;
            let order: SortOrder = order.parse().map_err(anyhow::Error::msg)?;
            let scoring = config
                .scoring
                .with_filters(filters.apply(&config.scoring.filters)?);

            let engine = RankingEngine::new(source::from_config(&config)?);
            let result = engine.rankings(&scoring).await;

            let mut ranked = rank_players(result.players.clone());
            sort_ranked(&mut ranked, sort, order);
            let shown: Vec<&RankedPlayer> = match search.as_deref() {
                Some(query) => search_players(&ranked, query),
                None => ranked.iter().collect(),
            };

            println!("{}", filter_summary(shown.len(), &result));
            println!();
            println!(
                "{:>4}  {:<20} {:>7} {:>4} {:>4} {:>5} {:>5} {:>6}  {:<30} Modes",
                "#", "Player", "Points", "1st", "2nd", "Top4", "Top8", "Played", "Games"
            );
            for player in shown.iter().take(limit.unwrap_or(usize::MAX)) {
                let p = &player.aggregate;
                println!(
                    "{:>4}  {:<20} {:>7} {:>4} {:>4} {:>5} {:>5} {:>6}  {:<30} {}",
                    player.rank,
                    p.player,
                    p.points,
                    p.placements.first,
                    p.placements.second,
                    p.placements.top4,
                    p.placements.top8,
                    p.participations,
                    p.games_joined(),
                    p.modes_joined()
                );
            }
        }
        Commands::Player {
            name,
            filters,
            sort,
            order,
        } => {
            let sort: TournamentSortKey = sort.parse().map_err(anyhow::Error::msg)?;
            let order: SortOrder = order.parse().map_err(anyhow::Error::msg)?;
            let scoring = config
                .scoring
                .with_filters(filters.apply(&config.scoring.filters)?);

            let engine = RankingEngine::new(source::from_config(&config)?);
            let mut detail = engine.player_detail(&name, &scoring).await;

            if !detail.has_results() {
                println!("No results for {}", name);
                return Ok(());
            }

            let stats = &detail.stats;
            println!("=== {} ===", detail.player);
            println!("Points:           {:.1}", detail.rounded_points);
            println!("Active:           {}", detail.year_ranges);
            println!("Tournaments:      {}", stats.total_tournaments);
            println!(
                "Placements:       {} (1st {}, 2nd {}, top4 {}, top8 {})",
                stats.total_placements,
                stats.first_places,
                stats.second_places,
                stats.top4,
                stats.top8
            );
            println!("Avg placement:    {}", stats.average_placement_display());
            println!(
                "Grand finals:     {} ({} won)",
                stats.grand_finals,
                stats.grand_final_win_rate_display()
            );

            for (game, group) in detail.grouped_by_game.iter_mut() {
                sort_tournaments(&mut group.tournaments, sort, order);
                println!();
                println!("--- {} ({:.1} points) ---", game, group.total_points);
                for entry in &group.tournaments {
                    println!(
                        "  {:<4} {:<40} {:<5} T{} {:<4} {:>5}  {:.1}",
                        entry.year,
                        entry.event_name,
                        entry.mode,
                        entry.tier,
                        if entry.is_lan { "LAN" } else { "" },
                        entry.placement_label(),
                        entry.points
                    );
                }
            }
        }
        Commands::Count => {
            let engine = RankingEngine::new(source::from_config(&config)?);
            println!(
                "{} tournaments in {} source",
                engine.total_tournaments().await,
                engine.source_name()
            );
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let engine = RankingEngine::new(source::from_config(&config)?);
            tracing::info!("Serving rankings from {} source", engine.source_name());
            let state = AppState::new(engine, config.scoring.clone());
            let cors = cors_layer(&config.server.cors_origin)?;
            let app = build_router(state).layer(cors);

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Import { input, append } => {
            let contents = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {:?}", input))?;
            let records: Vec<TournamentRecord> = serde_json::from_str(&contents)
                .with_context(|| format!("{:?} is not a JSON array of tournament rows", input))?;

            let invalid = records.iter().filter(|r| r.validate().is_err()).count();
            if invalid > 0 {
                tracing::warn!("{} of {} rows are missing required fields", invalid, records.len());
            }

            let storage = StorageConfig::new(config.data_dir.clone());
            let writer = JsonlWriter::new(storage.tournaments_path());
            let written = if append {
                writer.append_batch(&records)?
            } else {
                writer.write_all(&records)?
            };
            println!(
                "Imported {} tournaments into {:?}",
                written,
                storage.tournaments_path()
            );
        }
    }

    Ok(())
}
