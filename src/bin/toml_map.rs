use anyhow::Context;
use clap::Parser;
use quake_map::core::ConfigProvider;
use quake_map::utils::{logger, validation::Validate};
use quake_map::{LocalStorage, MapEngine, MapSession, QuakePipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-map")]
#[command(about = "Earthquake map renderer driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "quake-map.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - show what would be rendered without fetching the feed
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    if config.json_logs() {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based earthquake map");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - the feed will not be fetched");
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = QuakePipeline::new(storage, config);
    let engine = MapEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("✅ Map rendered with {} markers", summary.marker_count);
            for path in &summary.output_paths {
                println!("📁 Output saved to: {}", path);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.severity().exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    let session = MapSession::from_config(config);
    let view = session.view();

    tracing::info!("📋 Configuration Summary:");
    tracing::info!("  Feed: {}", config.feed_url());
    tracing::info!("  Timeout: {}s", config.timeout_seconds());
    tracing::info!(
        "  View: ({}, {}) zoom {}",
        view.center.latitude,
        view.center.longitude,
        view.zoom
    );
    let layer_names: Vec<_> = session
        .base_layers()
        .iter()
        .map(|l| l.name.as_str())
        .collect();
    tracing::info!("  Base layers: {}", layer_names.join(", "));
    tracing::info!("  Output: {} ({})", config.output_path(), config.output_formats().join(", "));
}
