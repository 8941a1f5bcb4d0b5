//! Tracing initialisation for the console binary.

use std::path::Path;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Set to a file path to write logs there instead of stderr.
pub const LOG_FILE_ENV: &str = "FOLIO_LOG";

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize tracing, honouring `FOLIO_LOG` when set.
pub fn init() {
    if let Some(path) = std::env::var_os(LOG_FILE_ENV) {
        init_file(Path::new(&path));
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();
}

/// Initialize tracing into a per-process log file.
///
/// The file is named `{path}.{timestamp}.{pid}` so concurrent runs never
/// share one.
pub fn init_file(path: &Path) {
    let pid = std::process::id();
    let timestamp = chrono::Utc::now().timestamp();
    let unique_path = format!("{}.{}.{}", path.display(), timestamp, pid);

    let Ok(file) = std::fs::File::create(&unique_path) else {
        eprintln!("Warning: Failed to create log file: {}", unique_path);
        return;
    };

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339());

    tracing_subscriber::registry()
        .with(filter())
        .with(file_layer)
        .init();
}
