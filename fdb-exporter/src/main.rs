use std::sync::Arc;

use clap::Parser;
use fdb_exporter::api::{ApiServer, AppState};
use fdb_exporter::{Collector, ExporterConfig, logging};
use fdb_status::{FIELD_MAPPINGS, FdbCliSource, validate_mappings};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads them
    dotenvy::dotenv().ok();

    let config = ExporterConfig::parse();
    config.validate()?;

    logging::init_logging(&config.log_filter, config.log_format)?;
    validate_mappings(FIELD_MAPPINGS)?;

    let mut source = FdbCliSource::new()
        .with_program(&config.fdbcli_path)
        .with_timeout(config.fdbcli_timeout());
    if let Some(cluster_file) = &config.cluster_file {
        source = source.with_cluster_file(cluster_file);
    }

    tracing::info!(
        fdbcli = %config.fdbcli_path.display(),
        cluster_file = ?config.cluster_file,
        timeout_secs = config.timeout_secs,
        metrics = FIELD_MAPPINGS.len(),
        "Starting FoundationDB exporter"
    );

    let collector = Collector::new(Arc::new(source), config.timeout());
    let server = ApiServer::new(config.socket_addr()?, AppState::new(Arc::new(collector)));

    tokio::spawn(shutdown_on_signal(server.cancel_token()));

    server.run().await?;
    Ok(())
}

async fn shutdown_on_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    cancel_token.cancel();
}
