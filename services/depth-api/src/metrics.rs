//! Prometheus counters and histograms for the image routes.

use std::time::Duration;

use metrics::{counter, histogram};

pub fn record_image_request(route: &'static str) {
    counter!("image_requests_total", "route" => route).increment(1);
}

pub fn record_render_error(route: &'static str) {
    counter!("image_render_errors_total", "route" => route).increment(1);
}

pub fn record_resized_cache_hit() {
    counter!("resized_cache_hits_total").increment(1);
}

pub fn record_resized_cache_miss() {
    counter!("resized_cache_misses_total").increment(1);
}

/// Wall time of one synthesis run, in milliseconds.
pub fn record_synthesis_duration(route: &'static str, elapsed: Duration) {
    histogram!("image_synthesis_duration_ms", "route" => route)
        .record(elapsed.as_secs_f64() * 1000.0);
}
