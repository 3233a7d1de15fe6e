mod bootstrap;

use anyhow::Result;
use pickup_core::settings::Settings;
use pickup_runtime::orchestrator::{shared_loader, LoadOrchestrator, LoadRequest};
use pickup_ui::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    let log_path = bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Pickup dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Source: {}, rows: {}, theme: {}, log: {}",
        settings.source,
        settings.rows,
        settings.theme,
        log_path.display()
    );

    let loader = shared_loader(settings.date_column.clone())?;
    let orchestrator = LoadOrchestrator::new(
        loader,
        LoadRequest {
            source: settings.source.clone(),
            row_limit: settings.rows,
        },
    );
    let (rx, handle) = orchestrator.start();

    let app = App::new(
        &settings.theme,
        settings.source.clone(),
        settings.initial_hour_bucket(),
    );

    // The TUI exits on 'q' / Ctrl+C itself; the OS-level signal covers
    // anything delivered while the terminal is not reading keys.
    tokio::select! {
        result = app.run(rx) => {
            handle.abort();
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; stopping load task");
            handle.abort();
        }
    }

    tracing::info!("Pickup dashboard stopped");
    Ok(())
}
