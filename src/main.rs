use clap::Parser;
use geo_upload::utils::error::{EtlError, ErrorSeverity};
use geo_upload::utils::{logger, validation::Validate};
use geo_upload::{CliConfig, LocalStorage, Runner};

fn exit_with(e: &EtlError) -> ! {
    tracing::error!(
        "❌ Upload failed: {} (Category: {:?}, Severity: {:?})",
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
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting geo-upload");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let file_config = cli.load_file().unwrap_or_else(|e| exit_with(&e));
    let settings = cli
        .resolve(file_config.as_ref())
        .unwrap_or_else(|e| exit_with(&e));

    // 驗證配置；不合法時不執行上傳
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let monitor_enabled = cli.monitor_enabled(file_config.as_ref());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let runner = Runner::new_with_monitoring(LocalStorage::default(), monitor_enabled);

    match runner.run(&settings).await {
        Ok(counters) => {
            println!("✅ completed upload: {}", counters);
            if counters.batch_failure_count > 0 {
                println!(
                    "⚠️ {} batch(es) failed; {} records were not uploaded and will not be retried",
                    counters.batch_failure_count, counters.dropped_record_count
                );
            }
        }
        Err(e) => exit_with(&e),
    }
}
