use clap::Parser;
use sales_cleaner::core::ConfigProvider;
use sales_cleaner::utils::error::{EtlError, ErrorSeverity};
use sales_cleaner::utils::{logger, validation::Validate};
use sales_cleaner::{CliConfig, EtlEngine, EtlOutcome, LocalStorage, SalesPipeline, TomlConfig};
use std::fmt::Debug;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 有指定 --config 時改用 TOML 設定
    let toml_config = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let verbose = cli.verbose
        || toml_config
            .as_ref()
            .and_then(|c| c.log_level())
            .is_some_and(|level| level.eq_ignore_ascii_case("debug"));

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("--- Starting sales data cleaning ---");

    let monitor_enabled = cli.monitor
        || toml_config
            .as_ref()
            .map(|c| c.monitoring_enabled())
            .unwrap_or(false);
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let result = match toml_config {
        Some(config) => {
            tracing::info!(
                "📁 Using configuration from: {}",
                cli.config.as_deref().unwrap_or_default()
            );
            run(config, monitor_enabled)
        }
        None => run(cli, monitor_enabled),
    };

    match result {
        Ok(outcome) => {
            println!("✅ Cleaning completed successfully!");
            println!("📁 Report saved to: {}", outcome.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Cleaning failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn run<C>(config: C, monitor_enabled: bool) -> Result<EtlOutcome, EtlError>
where
    C: ConfigProvider + Validate + Debug,
{
    tracing::debug!("Config: {:?}", config);

    // 驗證配置
    config.validate()?;

    tracing::info!("📥 Input: {}", config.input_path());
    tracing::info!("📤 Output: {}", config.output_path());

    let pipeline = SalesPipeline::new(LocalStorage::default(), config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);
    engine.run()
}
