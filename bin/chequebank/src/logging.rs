//! Logging setup for the chequebank CLI.

use eyre::{Result, WrapErr};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::Directive,
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::args::LogArgs;

/// Install the global subscriber.
///
/// Commands print their results on stdout, so every log line goes to stderr.
/// Warnings are on by default and each `-v` lowers the floor by one level.
/// `RUST_LOG`, when set, replaces that floor. Directives given with
/// `--log.filter` are layered on top, and `--quiet` drops everything below
/// errors.
pub fn init_logging(args: &LogArgs) -> Result<()> {
    let filter = build_filter(args)?;

    let layer = fmt::layer().with_writer(std::io::stderr).without_time();
    let layer = if args.json {
        layer.json().boxed()
    } else {
        layer.boxed()
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()?;

    Ok(())
}

fn floor(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn build_filter(args: &LogArgs) -> Result<EnvFilter> {
    if args.quiet {
        return Ok(EnvFilter::default().add_directive(LevelFilter::ERROR.into()));
    }

    let mut filter = EnvFilter::builder()
        .with_default_directive(floor(args.verbosity).into())
        .from_env_lossy();

    for raw in args.filter.iter().flat_map(|f| f.split(',')) {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let directive: Directive = raw
            .parse()
            .wrap_err_with(|| format!("bad --log.filter directive `{raw}`"))?;
        filter = filter.add_directive(directive);
    }

    Ok(filter)
}
