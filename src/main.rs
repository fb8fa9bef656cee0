use anyhow::Context;
use clap::Parser;
use prereq_lookup::domain::model::ResultPane;
use prereq_lookup::utils::error::{CatalogError, ErrorSeverity};
use prereq_lookup::utils::{logger, validation::Validate};
use prereq_lookup::{CliConfig, Command, HttpCatalogClient, LogFormat, Session};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 載入 TOML 配置（若有指定）
    let toml = config
        .load_toml()
        .with_context(|| format!("failed to load config file {:?}", config.config))?;

    // 初始化日誌
    let verbose = config.effective_verbose(toml.as_ref());
    match config.effective_log_format(toml.as_ref()) {
        LogFormat::Compact => logger::init_cli_logger(verbose),
        LogFormat::Json => logger::init_json_logger(verbose),
    }

    tracing::info!("Starting prereq-lookup");
    if verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    let settings = config.resolve_settings(toml.as_ref());
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }
    tracing::debug!("Using catalog backend at {}", settings.base_url);

    let client = HttpCatalogClient::from_config(&settings)?;
    let session = Session::new(client);
    let mut stdout = std::io::stdout();

    let outcome = match &config.command {
        Command::Subjects => session.list_subjects(&mut stdout).await,
        Command::Courses { subject } => session.list_courses(subject, &mut stdout).await,
        Command::Prereqs {
            subject,
            number,
            format,
        } => {
            match session
                .show_prerequisites(subject, number, *format, &mut stdout)
                .await
            {
                // 查詢失敗的訊息已輸出在結果中，以可重試的代碼結束
                Ok(ResultPane::Errored(_)) => std::process::exit(2),
                other => other.map(|_| ()),
            }
        }
        Command::Browse => {
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            session.browse(input, &mut stdout).await
        }
    };

    if let Err(e) = outcome {
        report_failure(&e);
    }

    Ok(())
}

fn report_failure(e: &CatalogError) {
    tracing::error!(
        "❌ Lookup failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,      // 被較新的請求取代，不算失敗
        ErrorSeverity::Medium => 2,   // 可重試的網路或後端錯誤
        ErrorSeverity::High => 1,     // 選擇錯誤
        ErrorSeverity::Critical => 3, // 配置或系統錯誤
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}
