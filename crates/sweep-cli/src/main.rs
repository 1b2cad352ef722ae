use std::process::ExitCode;
use std::sync::Arc;

use sweep_core::app::{AppBuilder, ProcessorConfig};
use sweep_core::domain::NewRecord;
use sweep_core::impls::InMemoryRecordStore;
use sweep_core::observability::init_tracing;
use tracing::{error, info, warn};

fn demo_records() -> Vec<NewRecord> {
    vec![
        NewRecord::new("Alice", "first demo record", "alice@example.com"),
        NewRecord::new("Bob", "second demo record", "bob@example.com"),
        NewRecord::new("Carol", "third demo record", "carol@example.com"),
        NewRecord::new("Dave", "fourth demo record", "dave@example.com"),
    ]
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "sweep failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // (A) 設定とストア
    let config = ProcessorConfig::from_env()?;
    let store = Arc::new(InMemoryRecordStore::seeded(demo_records()).await);

    // (B) pool を起動
    let app = AppBuilder::new()
        .with_config(config)
        .with_store(store)
        .build()?;

    // (C) 全件処理して結果を待つ
    let handle = app.service().process_all().await?;
    let processed = handle.await;

    // (D) 結果に関係なく pool は止める
    let report = app.shutdown().await?;
    if report.forced {
        warn!("worker pool was force-stopped");
    }

    let processed = processed?;
    info!(processed = processed.len(), "batch finished");
    println!("{}", serde_json::to_string_pretty(&processed)?);
    Ok(())
}
