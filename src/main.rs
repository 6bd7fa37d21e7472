mod cli;

use sceneprep::{
    catalog::{Catalog, SnapshotCatalog},
    config,
    pipeline::{Decision, Pipeline, PolicyResolver},
    report::RunReport,
    scanner::{classify, Payload, ScanMode},
};
use sp_parser::Normalizer;
use sp_probe::Prober;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "sceneprep=trace,sp_parser=debug,sp_probe=debug,sp_core=debug".to_string()
        } else {
            "sceneprep=info,sp_probe=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Scan {
            path,
            mode,
            catalog,
            on_duplicate,
            json,
        } => scan(&path, mode, catalog, on_duplicate, json, cli.config.as_deref()),
        Commands::Probe { file, json } => probe_file(&file, json, cli.config.as_deref()),
        Commands::Normalize { name, json } => normalize_name(&name, json, cli.config.as_deref()),
        Commands::CheckTools => check_tools(),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("sceneprep {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn scan(
    path: &Path,
    mode: ScanMode,
    catalog_path: Option<PathBuf>,
    on_duplicate: Decision,
    json: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    if !path.exists() {
        anyhow::bail!("Path does not exist: {:?}", path);
    }

    let catalog: Option<Arc<dyn Catalog>> = catalog_path
        .or_else(|| config.duplicates.snapshot.clone())
        .map(|p| {
            tracing::info!("Using catalog snapshot {:?}", p);
            Arc::new(SnapshotCatalog::open(p)) as Arc<dyn Catalog>
        });
    if catalog.is_none() && config.duplicates.enabled {
        tracing::warn!("No catalog configured, duplicate check disabled for this run");
    }

    let prober: Arc<dyn Prober> = Arc::from(sp_probe::build_prober(config.probe.backend));
    let pipeline = Pipeline::new(config, prober, catalog, Box::new(PolicyResolver(on_duplicate)))?;

    let rt = tokio::runtime::Runtime::new()?;
    let report = rt.block_on(async {
        let cancel = CancellationToken::new();
        let on_signal = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, cancelling");
                on_signal.cancel();
            }
        });
        pipeline.run(path, mode, cancel).await
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &RunReport) {
    for accepted in &report.accepted {
        let bundle = &accepted.bundle;
        println!("{} [{}]", bundle.canonical_name, bundle.category);
        println!("  Path: {}", bundle.path.display());
        println!("  Display name: {}", bundle.display_name);
        println!(
            "  Size: {} bytes in {} file(s)",
            bundle.size_bytes,
            bundle.manifest.len()
        );
        println!("  Resolution: {}", bundle.resolution);
        println!("  Languages: {}", bundle.audio_languages.join(", "));
        if bundle.is_season_pack {
            println!("  Season pack");
        }
        if !bundle.game_crew_tags.is_empty() {
            println!("  Crew: {}", bundle.game_crew_tags.join(", "));
        }
        println!("  Torrent: {}", bundle.torrent_path.display());
        for m in &accepted.duplicates.matches {
            println!(
                "  Possible duplicate: {} (id {}, similarity {}%, size delta {}%)",
                m.entry_name, m.existing_entry_id, m.title_similarity, m.size_delta_percent
            );
        }
        println!();
    }

    if !report.skipped.is_empty() {
        println!("Skipped:");
        for item in &report.skipped {
            println!("  {}", item);
        }
        println!();
    }

    let summary = &report.summary;
    println!(
        "{} candidate(s): {} accepted, {} skipped, {} with possible duplicates",
        summary.candidates, summary.accepted, summary.skipped, summary.with_duplicates
    );
    if report.aborted {
        println!("Run aborted on duplicate.");
    }
}

fn probe_file(file: &Path, json: bool, config_path: Option<&Path>) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let config = config::load_config_or_default(config_path)?;
    let (tool, tool_path) = sp_probe::require_backend(config.probe.backend)
        .with_context(|| format!("No tool for probe backend {:?}", config.probe.backend))?;
    tracing::debug!("Probing with {} at {:?}", tool, tool_path);
    let prober = sp_probe::build_prober(config.probe.backend);
    let media_info = prober
        .probe(file)
        .with_context(|| format!("Failed to probe {:?}", file))?;

    if json {
        let json_str = serde_json::to_string_pretty(&media_info)?;
        println!("{}", json_str);
        return Ok(());
    }

    println!("File: {}", media_info.file_path.display());
    println!("Container: {}", media_info.container);
    if let Some(ref duration) = media_info.duration {
        let secs = duration.as_secs();
        let mins = secs / 60;
        let hours = mins / 60;
        println!("Duration: {:02}:{:02}:{:02}", hours, mins % 60, secs % 60);
    }

    println!("Resolution: {}", media_info.resolution());

    println!("\nVideo Tracks: {}", media_info.video_tracks.len());
    for (i, track) in media_info.video_tracks.iter().enumerate() {
        print!("  [{}] {} {}x{}", i, track.codec, track.width, track.height);
        if let Some(scan) = track.scan_type {
            print!(" {:?}", scan);
        }
        println!();
    }

    println!("\nAudio Tracks: {}", media_info.audio_tracks.len());
    for (i, track) in media_info.audio_tracks.iter().enumerate() {
        print!("  [{}] {} {}ch", i, track.codec, track.channels);
        if let Some(ref lang) = track.language {
            print!(" ({})", lang);
        }
        if track.default {
            print!(" [default]");
        }
        println!();
    }

    Ok(())
}

fn normalize_name(name: &str, json: bool, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let normalizer = Normalizer::new(config.tags)?;
    let normalized = normalizer.normalize(name);

    if json {
        println!("{}", serde_json::to_string_pretty(&normalized)?);
        return Ok(());
    }

    let guess = &normalized.guess;
    println!("Title: {}", normalized.title);
    println!("Sanitized: {}", normalized.sanitized);
    println!("Category: {}", classify(&normalized, Payload::Video));
    if let Some(ref alt) = guess.alternative_title {
        println!("Alternative title: {}", alt);
    }
    if let Some(year) = guess.year {
        println!("Year: {}", year);
    }
    if let Some(season) = guess.season {
        print!("Season: {}", season);
        if let Some(episode) = guess.episode {
            print!(", episode: {}", episode);
        }
        println!();
    }
    if let Some(ref title) = guess.episode_title {
        println!("Episode title: {}", title);
    }
    println!("Season pack: {}", sp_parser::is_season_pack(name));
    if let Some(ref size) = guess.screen_size {
        println!("Screen size: {}", size);
    }
    if let Some(ref source) = guess.source {
        println!("Source: {}", source);
    }
    if let Some(ref audio) = guess.audio_codec {
        println!("Audio: {}", audio);
    }
    if guess.subtitles {
        println!("Subtitles: yes");
    }
    if !normalized.crew_tags.is_empty() {
        println!("Crew tags: {}", normalized.crew_tags.join(", "));
    }
    if !normalized.platform_tags.is_empty() {
        println!("Platform tags: {}", normalized.platform_tags.join(", "));
    }

    Ok(())
}

fn check_tools() -> Result<()> {
    println!("Checking external tools...\n");

    let tools = sp_probe::check_tools();
    let mut any_ok = false;

    for tool in &tools {
        let status = if tool.available {
            any_ok = true;
            "✓"
        } else {
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if any_ok {
        println!("At least one probe backend is available.");
    } else {
        println!("No probe backend found. Install ffprobe or mediainfo to decode resolutions.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    println!("  Video extensions: {}", config.scan.video_extensions.join(", "));
    println!("  Document extensions: {}", config.scan.document_extensions.join(", "));
    println!(
        "  Extra tags: {} crew, {} platform",
        config.tags.extra_crew.len(),
        config.tags.extra_platform.len()
    );
    println!("  Tracker: {}", config.bundle.tracker_name);
    println!("  Preferred language: {}", config.bundle.preferred_language);
    println!(
        "  Duplicates: {} (size threshold {}%, catalog errors: {:?})",
        if config.duplicates.enabled { "enabled" } else { "disabled" },
        config.duplicates.size_threshold_percent,
        config.duplicates.on_catalog_error
    );
    println!("  Workers: {}", config.batch.workers);
    println!("  Probe backend: {:?}", config.probe.backend);

    Ok(())
}
