//! Structured logging helpers built on `slog`, plus a small set of
//! process-wide log-volume metrics exported through `lighthouse_metrics`. No
//! sampled source for this crate exists in the retrieved example pack (only
//! its `Cargo.toml` was present); written from `slog`'s/`slog-term`'s own
//! public APIs, following the drain-wrapping idiom this workspace's other
//! crates use for their own `lazy_static!`-registered metrics.

use lighthouse_metrics::{inc_counter, try_create_int_counter, IntCounter, Result as MetricsResult};
use slog::{Drain, Level, Logger};

lazy_static::lazy_static! {
    pub static ref INFO_COUNT: MetricsResult<IntCounter> = try_create_int_counter(
        "log_info_total",
        "Count of log messages at the info level or above"
    );
    pub static ref WARN_COUNT: MetricsResult<IntCounter> = try_create_int_counter(
        "log_warn_total",
        "Count of log messages at the warn level"
    );
    pub static ref ERROR_COUNT: MetricsResult<IntCounter> = try_create_int_counter(
        "log_error_total",
        "Count of log messages at the error level"
    );
    pub static ref CRIT_COUNT: MetricsResult<IntCounter> = try_create_int_counter(
        "log_crit_total",
        "Count of log messages at the critical level"
    );
}

/// A `slog::Drain` that increments the counters above as records pass
/// through it, then forwards the record to the wrapped drain unchanged.
pub struct MetricsDrain<D: Drain> {
    drain: D,
}

impl<D: Drain> MetricsDrain<D> {
    pub fn new(drain: D) -> Self {
        Self { drain }
    }
}

impl<D: Drain> Drain for MetricsDrain<D> {
    type Ok = D::Ok;
    type Err = D::Err;

    fn log(
        &self,
        record: &slog::Record,
        values: &slog::OwnedKVList,
    ) -> std::result::Result<Self::Ok, Self::Err> {
        match record.level() {
            Level::Critical => inc_counter(&CRIT_COUNT),
            Level::Error => inc_counter(&ERROR_COUNT),
            Level::Warning => inc_counter(&WARN_COUNT),
            Level::Info => inc_counter(&INFO_COUNT),
            Level::Debug | Level::Trace => {}
        }
        self.drain.log(record, values)
    }
}

/// Builds the default terminal logger used by the node and its
/// sub-processes: a full-format terminal decorator, synchronized across
/// threads with a mutex, wrapped in `MetricsDrain` so log volume is
/// observable, filtered at `level`.
pub fn root_logger(level: Level) -> Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = std::sync::Mutex::new(drain).fuse();
    let drain = slog::LevelFilter::new(drain, level).fuse();
    let drain = MetricsDrain::new(drain).fuse();

    Logger::root(drain, slog::o!())
}

/// A `Logger` that discards every record, used by tests and by any caller
/// that explicitly opts out of logging.
pub fn null_logger() -> Logger {
    Logger::root(slog::Discard, slog::o!())
}

#[cfg(test)]
mod tests {
    use super::*;
    use slog::info;

    #[test]
    fn test_root_logger_accepts_records() {
        let log = root_logger(Level::Debug);
        info!(log, "constructed in a test"; "component" => "logging");
    }

    #[test]
    fn test_null_logger_discards_records() {
        let log = null_logger();
        info!(log, "this should go nowhere");
    }
}
