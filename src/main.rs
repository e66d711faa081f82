use clap::Parser;
use sheetload::config::mapping_file::MappingFile;
use sheetload::core::exporter::Exporter;
use sheetload::core::stats::StatsCollector;
use sheetload::domain::ports::SheetReader;
use sheetload::utils::monitor::ResourceMonitor;
use sheetload::utils::{logger, validation, validation::Validate};
use sheetload::{
    AppConfig, Cli, Command, CsvSheetReader, CsvSheetWriter, EtlError, ImportOptions, Importer,
    MappingSpec, SqliteStore,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting sheetload CLI");

    if let Err(e) = run(cli).await {
        tracing::error!("❌ Command failed: {}", e);
        eprintln!("❌ {}", e);

        // 輸入/配置錯誤與執行期錯誤使用不同退出碼
        let exit_code = match e {
            EtlError::InputError { .. }
            | EtlError::ConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => 2,
            _ => 1,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run(cli: Cli) -> sheetload::Result<()> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load_default()?,
    };
    if let Some(database) = &cli.database {
        config.database_path = database.clone();
    }
    if let Some(collection) = &cli.collection {
        config.collection = collection.clone();
    }

    // 驗證配置
    config.validate()?;
    if cli.verbose {
        tracing::debug!("Configuration: {:?}", config);
    }

    let monitor = ResourceMonitor::new(cli.monitor);
    if monitor.is_enabled() {
        tracing::info!("🔍 Resource monitoring enabled");
    }

    // 連線在啟動時建立一次，共享給所有需要儲存的元件
    let store = Arc::new(SqliteStore::open(&config.database_path)?);

    match cli.command {
        Command::Import {
            file,
            mapping,
            clear_existing,
            no_generate_id,
            id_prefix,
        } => {
            validation::validate_file_extensions("source_file", &[file.clone()], &["csv"])?;

            let spec = match mapping {
                Some(path) => MappingFile::from_file(&path)?.to_spec()?,
                None => MappingSpec::empty(),
            };

            let mut options = ImportOptions::new(id_prefix.unwrap_or_else(|| config.id_prefix.clone()));
            options.clear_existing = clear_existing;
            options.generate_id = !no_generate_id;
            validation::validate_non_empty_string("id_prefix", &options.id_prefix)?;

            let reader = CsvSheetReader::new();
            let rows = reader.read_rows(&file).await?;
            tracing::info!("📥 Read {} rows from {}", rows.len(), file);

            let importer = Importer::new(
                Arc::clone(&store),
                config.collection.clone(),
                config.counter_key.clone(),
            );
            let report = importer.ingest(rows, &spec, &options).await?;

            monitor.log_stats("Import finished");
            println!(
                "✅ Imported {} records into '{}'",
                report.imported, config.collection
            );
            if !report.generated_ids.is_empty() {
                println!("🆔 Generated IDs: {}", report.generated_ids.join(", "));
            }
        }

        Command::Export { output } => {
            let exporter = Exporter::new(
                Arc::clone(&store),
                CsvSheetWriter::new(),
                config.collection.clone(),
            );
            let report = exporter.export(&output).await?;

            println!(
                "✅ Exported {} records to {}",
                report.exported, report.output_path
            );
        }

        Command::Stats => {
            let collector = StatsCollector::new(
                Arc::clone(&store),
                config.collection.clone(),
                config.counter_key.clone(),
            );
            let report = collector.collect(&config.id_prefix).await?;

            println!(
                "📊 Collection '{}': {} records",
                config.collection, report.total
            );
            println!(
                "   Price min: {:.2}, max: {:.2}, average: {:.2}",
                report.price_min, report.price_max, report.price_avg
            );
            match &report.last_id {
                Some(last) => println!("   Last ID: {}, next: {}", last, report.next_id),
                None => println!("   No IDs generated yet, next: {}", report.next_id),
            }
        }
    }

    Ok(())
}
