use anyhow::Context;
use clap::Parser;
use lsc_cpm::core::ConfigProvider;
use lsc_cpm::utils::error::ErrorSeverity;
use lsc_cpm::utils::{logger, validation::Validate};
use lsc_cpm::{CliConfig, CpmPipeline, ExtractError, ExtractionEngine, LocalStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    // 載入儀器設定檔
    if let Err(e) = config.load_profile() {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    if config.print_profile {
        let text = config
            .profile()
            .to_toml_string()
            .context("failed to render instrument profile")?;
        print!("{}", text);
        return Ok(());
    }

    tracing::info!("Starting lsc-cpm");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 相對的輸入路徑以目前目錄為準，而不是輸出目錄
    let input = std::path::absolute(config.input_path())
        .with_context(|| format!("cannot resolve input path '{}'", config.input_path()))?;
    config.input = Some(input.to_string_lossy().into_owned());

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = CpmPipeline::new(storage, config);
    let engine = ExtractionEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(summary) if summary.record_count == 0 => {
            tracing::warn!("⚠️ No sample records were extracted");
            println!("⚠️ {}", ExtractError::NoDataExtracted.user_friendly_message());
            println!("📁 Output saved to: {}", summary.output_path);
        }
        Ok(summary) => {
            tracing::info!("✅ Extraction completed successfully!");
            println!(
                "✅ Extracted {} samples into {} plate rows",
                summary.record_count, summary.row_count
            );
            println!("📁 Output saved to: {}", summary.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Extraction failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
