use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

const DEFAULT_FILTER: &str = "info";

/// Installs the fmt subscriber once. `RUST_LOG` overrides `verbosity`.
pub fn init_logging(verbosity: u8) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    INIT.call_once(|| {
        let fallback = match verbosity {
            0 => DEFAULT_FILTER,
            1 => "info,nd_client=debug,nd_web=debug",
            _ => "debug",
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    });
}
