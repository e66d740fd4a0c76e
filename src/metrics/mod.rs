//! Prometheus metrics.

use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and describe the counters the rest of the
/// code increments. The returned handle renders the scrape payload.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_counter!(
        "orderboard_orders_made_total",
        "Resting orders inserted into the book"
    );
    describe_counter!(
        "orderboard_orders_taken_total",
        "Take operations that consumed resting orders"
    );
    describe_counter!(
        "orderboard_orders_deleted_total",
        "Resting orders cancelled by id"
    );
    describe_counter!(
        "orderboard_board_cache_hits_total",
        "Board reads served from the cache"
    );
    describe_counter!(
        "orderboard_board_cache_misses_total",
        "Board reads that recomputed the snapshot"
    );
    describe_counter!(
        "orderboard_notifications_sent_total",
        "Notification jobs handed to the outbound worker"
    );
    describe_counter!(
        "orderboard_notifications_dropped_total",
        "Notification jobs dropped because the queue was full"
    );
    describe_counter!(
        "orderboard_http_requests_total",
        "HTTP requests by method and status"
    );

    Ok(handle)
}
