mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use subseek_core::config::Config;
use subseek_index::{BuildOptions, IndexStats, SearchHit};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise pick defaults from the verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "subseek=debug,subseek_index=debug,subseek_parser=debug,subseek_av=debug,subseek_server=debug,tower_http=debug".to_string()
        } else {
            "subseek=info,subseek_index=info,subseek_parser=warn,subseek_av=info,subseek_server=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load_or_default(cli.config.as_deref());
    if let Some(db) = cli.db {
        config.server.db_path = db;
    }
    tracing::debug!(db = %config.server.db_path.display(), "Configuration loaded");

    match cli.command {
        Commands::Index { source } => index(&config, source.as_deref()),
        Commands::Search { query, limit, json } => search(&config, &query, limit, json),
        Commands::Stats { json } => stats(&config, json),
        Commands::Start { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(subseek_server::start(config))?;
            Ok(())
        }
        Commands::CheckTools => check_tools(&config),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("subseek {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn open_db(config: &Config) -> Result<subseek_db::pool::DbPool> {
    let path = &config.server.db_path;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    subseek_db::pool::init_pool(path)
        .with_context(|| format!("opening index database {}", path.display()))
}

fn index(config: &Config, source: Option<&Path>) -> Result<()> {
    let source = source.unwrap_or(config.index.source_dir.as_path());
    let pool = open_db(config)?;
    let conn = subseek_db::pool::get_conn(&pool)?;

    let report = subseek_index::build_index(&conn, source, &BuildOptions::from(&config.index))?;

    println!("Indexed {} of {} files", report.files_indexed, report.files_seen);
    println!("  Dialogues: {}", report.dialogues_indexed);
    if report.files_skipped > 0 {
        println!("  Skipped (no S##E## in name): {}", report.files_skipped);
    }
    if report.files_failed > 0 {
        println!("  Failed: {}", report.files_failed);
    }
    println!("Database: {}", config.server.db_path.display());
    Ok(())
}

fn search(config: &Config, query: &str, limit: Option<usize>, json: bool) -> Result<()> {
    let pool = open_db(config)?;
    let conn = subseek_db::pool::get_conn(&pool)?;
    let limit = limit.unwrap_or(config.index.default_limit);
    let hits = subseek_index::search(&conn, query, limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("No matches for {query:?}");
        return Ok(());
    }
    for hit in &hits {
        print_hit(hit);
    }
    println!("{} result(s)", hits.len());
    Ok(())
}

fn print_hit(hit: &SearchHit) {
    println!(
        "S{:02}E{:02} #{} [{} --> {}]",
        hit.season, hit.episode, hit.dialogue_index, hit.start_time, hit.end_time
    );
    println!("  {}", hit.chinese_text);
    println!("  {}", hit.english_text);
    println!();
}

fn stats(config: &Config, json: bool) -> Result<()> {
    let pool = open_db(config)?;
    let conn = subseek_db::pool::get_conn(&pool)?;
    let stats: IndexStats = subseek_index::get_statistics(&conn)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Files: {}", stats.total_files);
    println!("Dialogues: {}", stats.total_dialogues);
    for (season, info) in &stats.seasons {
        let episodes: Vec<String> = info.episodes.iter().map(u32::to_string).collect();
        println!(
            "  Season {season}: {} episode(s) [{}]",
            info.episode_count,
            episodes.join(", ")
        );
    }
    Ok(())
}

fn check_tools(config: &Config) -> Result<()> {
    println!("Checking external tools...\n");

    let tools = subseek_av::ToolRegistry::discover(&config.tools).check_all();
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({version})");
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Clip generation needs ffmpeg.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let text =
                std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            let config = Config::from_json(&text)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Database: {}", config.server.db_path.display());
    println!("  Subtitles: {}", config.index.source_dir.display());
    println!("  Audio media: {}", config.clips.audio.media_dir.display());
    println!("  Video media: {}", config.clips.video.media_dir.display());

    let warnings = config.validate();
    for warning in &warnings {
        println!("  ⚠ {warning}");
    }

    Ok(())
}
