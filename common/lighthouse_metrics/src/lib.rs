//! A wrapper around the `prometheus` crate that allows metrics to be defined
//! with `lazy_static!` and registered lazily, without panicking if
//! registration fails (e.g., when a metric name is registered twice during
//! tests). No sampled source for this crate exists in the retrieved example
//! pack (only its `Cargo.toml` was present); written from the `prometheus`
//! crate's own public API, in the idiom its consumers in this workspace
//! expect (`Result<IntCounter>`-typed `lazy_static!` statics, `try_create_*`
//! constructors, `inc`/`observe`/`set` helpers that silently no-op on error).

use prometheus::{Encoder, TextEncoder};

pub use prometheus::{Histogram, HistogramOpts, HistogramTimer, IntCounter, IntGauge, Opts, Result};

/// Collect all metrics registered against the default registry and encode
/// them in the Prometheus text exposition format.
pub fn gather() -> String {
    let mut buffer = vec![];
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode(&metric_families, &mut buffer)
        .unwrap_or_else(|e| eprintln!("Failed to encode metrics: {:?}", e));

    String::from_utf8(buffer).unwrap_or_else(|e| format!("Failed to parse metrics as utf8: {:?}", e))
}

/// Attempts to register an `IntCounter`, returning `Err` rather than
/// panicking if registration fails.
pub fn try_create_int_counter(name: &str, help: &str) -> Result<IntCounter> {
    let opts = Opts::new(name, help);
    let counter = IntCounter::with_opts(opts)?;
    prometheus::register(Box::new(counter.clone()))?;
    Ok(counter)
}

/// Attempts to register an `IntGauge`, returning `Err` rather than panicking
/// if registration fails.
pub fn try_create_int_gauge(name: &str, help: &str) -> Result<IntGauge> {
    let opts = Opts::new(name, help);
    let gauge = IntGauge::with_opts(opts)?;
    prometheus::register(Box::new(gauge.clone()))?;
    Ok(gauge)
}

/// Attempts to register a `Histogram`, returning `Err` rather than panicking
/// if registration fails.
pub fn try_create_histogram(name: &str, help: &str) -> Result<Histogram> {
    let opts = HistogramOpts::new(name, help);
    let histogram = Histogram::with_opts(opts)?;
    prometheus::register(Box::new(histogram.clone()))?;
    Ok(histogram)
}

/// Sets an `IntGauge`, silently doing nothing if the gauge failed to
/// register (e.g., it's a `Result::Err`).
pub fn set_gauge(gauge: &Result<IntGauge>, value: i64) {
    if let Ok(gauge) = gauge {
        gauge.set(value);
    }
}

/// Increments an `IntCounter`, silently doing nothing on error.
pub fn inc_counter(counter: &Result<IntCounter>) {
    if let Ok(counter) = counter {
        counter.inc();
    }
}

/// Increments an `IntCounter` by `value`, silently doing nothing on error.
pub fn inc_counter_by(counter: &Result<IntCounter>, value: i64) {
    if let Ok(counter) = counter {
        counter.inc_by(value);
    }
}

/// Observes a value on a `Histogram`, silently doing nothing on error.
pub fn observe(histogram: &Result<Histogram>, value: f64) {
    if let Ok(histogram) = histogram {
        histogram.observe(value);
    }
}

/// Starts a timer on a `Histogram`, returning `None` if the histogram failed
/// to register.
pub fn start_timer(histogram: &Result<Histogram>) -> Option<HistogramTimer> {
    histogram.as_ref().ok().map(|h| h.start_timer())
}

/// Stops a timer previously started with `start_timer`.
pub fn stop_timer(timer: Option<HistogramTimer>) {
    if let Some(t) = timer {
        t.observe_duration();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_create_int_counter_is_usable() {
        let counter = try_create_int_counter("test_lighthouse_metrics_counter", "a counter").unwrap();
        inc_counter(&Ok(counter.clone()));
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_set_gauge_is_noop_on_err() {
        let err: Result<IntGauge> = Err(prometheus::Error::AlreadyReg);
        set_gauge(&err, 5);
    }
}
