use clap::Parser;
use mercuriale::core::ConfigProvider;
use mercuriale::utils::error::ErrorSeverity;
use mercuriale::utils::{logger, validation::Validate};
use mercuriale::{
    CatalogLoader, CliConfig, Console, LocalStorage, MercurialeError, OrderSession, SourceReader,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting mercuriale");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => fail(e),
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(e);
    }

    let reader = match config.request_timeout() {
        Some(timeout) => SourceReader::with_timeout(timeout)?,
        None => SourceReader::new(),
    };

    let storage = LocalStorage::new(config.output_path().to_string());
    let export_filename = config.export_filename();
    let default_source = config.default_source();

    // 三份資料都載入成功才進入互動模式
    let catalog = match CatalogLoader::new(reader, config).load().await {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("❌ Loading failed: {}", e);
            eprintln!("💡 Rechargez l'application après avoir vérifié les fichiers de données.");
            fail(e);
        }
    };
    tracing::info!("✅ Données chargées avec succès !");

    let session = OrderSession::with_source(catalog, default_source);
    let mut console = Console::new(session, storage, export_filename);
    console
        .run(
            tokio::io::BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
        )
        .await?;

    tracing::info!("Session ended");
    Ok(())
}

fn fail(e: MercurialeError) -> ! {
    tracing::error!(
        "💡 Recovery suggestion: {} (Severity: {:?})",
        e.recovery_suggestion(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
