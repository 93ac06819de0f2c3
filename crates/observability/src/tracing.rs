//! Subscriber setup.
//!
//! Filtering follows `RUST_LOG`, defaulting to `info`. Audit sink failures
//! are `error` events on [`AUDIT_TARGET`], so they pass any filter that keeps
//! errors for that target.

use tracing_subscriber::EnvFilter;

/// Target used for audit sink failures. The access logger in
/// `gatepass-infra` emits on this constant.
pub const AUDIT_TARGET: &str = "gatepass::audit";

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable, for local development.
    Pretty,
}

impl LogFormat {
    /// `GATEPASS_LOG_FORMAT=pretty` selects [`LogFormat::Pretty`]; anything
    /// else is JSON.
    pub fn from_env() -> Self {
        Self::parse(std::env::var("GATEPASS_LOG_FORMAT").ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("pretty") => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime);

    let _ = match format {
        LogFormat::Json => builder.json().with_target(true).try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}
