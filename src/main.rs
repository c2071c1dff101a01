use clap::Parser;
use quake_map::utils::{logger, validation::Validate};
use quake_map::{CliConfig, LocalStorage, MapEngine, QuakePipeline, QuakeMapError, RunSummary};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting quake-map CLI");
    if config.verbose {
        tracing::debug!("Feed: {}, formats: {:?}", config.feed_url, config.formats);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = QuakePipeline::new(storage, config);
    let engine = MapEngine::new_with_monitoring(pipeline, monitor_enabled);

    // Ctrl-C 時放棄本次執行，進行中的請求隨之中止
    let outcome = tokio::select! {
        result = engine.run() => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    match outcome {
        Some(result) => report(result),
        None => {
            tracing::warn!("🛑 Interrupted, feed request aborted");
            std::process::exit(130);
        }
    }
    Ok(())
}

fn report(result: Result<RunSummary, QuakeMapError>) {
    match result {
        Ok(summary) => {
            tracing::info!(
                "✅ Map rendered with {} markers ({} records skipped)",
                summary.marker_count,
                summary.skipped_features
            );
            println!("✅ Map rendered with {} markers", summary.marker_count);
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
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.severity().exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}
