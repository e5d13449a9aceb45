use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_FILTER: &str = "info";

/// Initialisation of the `tracing` subscriber that receives the engine's own
/// diagnostics, including reports of failing transports.
pub struct Logging {
    default_filter: String,
}

impl Default for Logging {
    fn default() -> Self {
        Self::new()
    }
}

impl Logging {
    pub fn new() -> Self {
        Self { default_filter: DEFAULT_FILTER.to_owned() }
    }

    /// Filter directive used when `RUST_LOG` is unset or invalid.
    pub fn with_default_filter(mut self, directive: impl Into<String>) -> Self {
        self.default_filter = directive.into();
        self
    }

    /// Installs the fmt subscriber filtered by `RUST_LOG`.
    ///
    /// Returns `false` if a global subscriber was already installed.
    pub fn early_init(self) -> bool {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.default_filter));
        tracing_subscriber::registry().with(fmt::layer()).with(filter).try_init().is_ok()
    }
}
