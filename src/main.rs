use clap::Parser;
use secret_message::core::sample;
use secret_message::utils::logger;
use secret_message::{CliConfig, EtlEngine, LocalStorage, SecretError, SecretMessagePipeline};

fn exit_with(error: &SecretError) -> ! {
    tracing::error!("❌ {}", error);
    tracing::error!("💡 Suggestion: {}", error.recovery_suggestion());
    eprintln!("❌ {}", error.user_friendly_message());
    std::process::exit(error.exit_code());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    if config.wants_self_test() {
        if let Err(e) = sample::self_test() {
            exit_with(&e);
        }
        println!("✅ self-test passed");
        return Ok(());
    }

    let settings = match config.to_settings() {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };
    let output_format = settings.output_format;

    let storage_root = settings
        .output_path
        .clone()
        .unwrap_or_else(|| ".".to_string());
    let storage = LocalStorage::new(storage_root);
    let pipeline = match SecretMessagePipeline::new(storage, settings) {
        Ok(pipeline) => pipeline,
        Err(e) => exit_with(&e),
    };
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(report) => {
            if let Some(notice) = &report.fallback_notice {
                eprintln!("⚠️  fetch failed: {}", notice);
                eprintln!("Using offline sample instead:");
            }
            match report.output_path {
                Some(path) => println!("📁 Message saved to: {}", path),
                None => println!("{}", report.message.render_as(output_format)?),
            }
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}
