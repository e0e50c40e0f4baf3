//! Tracing init: SKILLSYNC_LOG_LEVEL / SKILLSYNC_QUIET.

use tracing_subscriber::{prelude::*, EnvFilter};

/// Initialize tracing. Call at process startup.
/// When SKILLSYNC_QUIET=1, only WARN and above are logged.
pub fn init_tracing() {
    let quiet = std::env::var("SKILLSYNC_QUIET")
        .map(|v| !matches!(v.trim().to_lowercase().as_str(), "" | "0" | "false" | "no"))
        .unwrap_or(false);
    let level = if quiet {
        "skillsync=warn,skillsync_core=warn".to_string()
    } else {
        std::env::var("SKILLSYNC_LOG_LEVEL")
            .unwrap_or_else(|_| "skillsync=info,skillsync_core=info".to_string())
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}
