use std::sync::Arc;

use psn_catalog::{AppState, AuditLog, Collection, Config, JsonDocument, RecordStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();
    tracing::info!(
        data_file = %config.data_file.display(),
        audit_log = %config.audit_log.display(),
        "starting psn-catalog"
    );

    let document = JsonDocument::new(&config.data_file);
    if !config.data_file.exists() {
        // First run: seed an empty collection so the store has a document
        // to load. After this point a missing or corrupt file is an error.
        if let Some(dir) = config.data_file.parent() {
            std::fs::create_dir_all(dir)?;
        }
        document.save(&Collection::default())?;
        tracing::info!(path = %config.data_file.display(), "seeded empty collection");
    }

    let state = AppState {
        store: Arc::new(RecordStore::new(document)),
        audit: Arc::new(AuditLog::new(&config.audit_log)),
    };
    psn_catalog::serve(state, &config.bind_addr).await?;
    Ok(())
}
