use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Level of the `cambio` target. Once `RUST_LOG` is set it alone decides.
fn app_level(verbose: bool, env_filter_set: bool) -> LevelFilter {
    if env_filter_set {
        LevelFilter::TRACE
    } else if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    }
}

/// Logs go to stderr so they never interleave with the rendered widget.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "off" };
    let env_filter = EnvFilter::try_from_default_env().ok();
    let app_filter =
        Targets::new().with_target("cambio", app_level(verbose, env_filter.is_some()));
    let env_filter = env_filter.unwrap_or_else(|| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(app_filter)
        .with(env_filter)
        .init();
}
