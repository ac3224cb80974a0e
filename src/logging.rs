// ── Logging ───────────────────────────────────────────────────────────────────
//
// The library only emits `tracing` events.  The binary installs a
// `tracing-subscriber` fmt subscriber writing to stderr.  The filter comes
// from `--log-level`, then the `QUILLPAD_LOG` environment variable (full
// `EnvFilter` directive syntax), then defaults to `warn`.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted when no level is given on the command line.
pub const LOG_ENV: &str = "QUILLPAD_LOG";

/// Build the event filter: explicit level, else environment directives, else
/// `warn`.  Blank or unparsable environment values fall back to `warn`.
pub fn build_filter(explicit: Option<LevelFilter>, env: Option<&str>) -> EnvFilter {
    if let Some(level) = explicit {
        return EnvFilter::default().add_directive(level.into());
    }
    env.map(str::trim)
        .filter(|spec| !spec.is_empty())
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::default().add_directive(LevelFilter::WARN.into()))
}

/// Install the stderr subscriber.
pub fn init(explicit: Option<LevelFilter>) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::util::SubscriberInitExt;

    let env = std::env::var(LOG_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(explicit, env.as_deref()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish()
        .try_init()
}
