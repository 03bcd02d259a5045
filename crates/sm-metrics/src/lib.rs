//! Prometheus exporter bootstrap and the metric names shared by SkillMatch
//! services. Recording through the `metrics` facade is a no-op until
//! [`init_metrics`] installs the exporter.

use std::env;
use std::sync::OnceLock;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{info, warn};

pub const MATCH_REQUESTS_TOTAL: &str = "skillmatch_match_requests_total";
pub const MATCH_RESULTS: &str = "skillmatch_match_results";

static EXPORTER_PORT: OnceLock<Option<u16>> = OnceLock::new();

fn resolve_port(raw: Option<&str>, default_port: u16) -> u16 {
    raw.and_then(|raw| raw.trim().parse::<u16>().ok())
        .filter(|port| *port != 0)
        .unwrap_or(default_port)
}

/// Start a Prometheus exporter on `0.0.0.0:<port>`, the port coming from
/// `port_env` or `default_port`. Only the first call does anything; it
/// returns the bound port, or `None` when the exporter could not start.
pub fn init_metrics(port_env: &str, default_port: u16) -> Option<u16> {
    *EXPORTER_PORT.get_or_init(|| {
        let port = resolve_port(env::var(port_env).ok().as_deref(), default_port);

        match PrometheusBuilder::new()
            .with_http_listener(([0, 0, 0, 0], port))
            .install()
        {
            Ok(()) => {
                describe_counter!(
                    MATCH_REQUESTS_TOTAL,
                    "Match requests by outcome (ok, not_found, integrity_error, error)"
                );
                describe_histogram!(MATCH_RESULTS, "Ranked personnel returned per match");
                info!(metrics_port = port, "started prometheus exporter");
                Some(port)
            }
            Err(err) => {
                warn!(error = %err, metrics_port = port, "failed to start prometheus exporter");
                None
            }
        }
    })
}

/// Count one match request. `results` is the size of the full ranking and is
/// only recorded for successful requests.
pub fn record_match_request(outcome: &'static str, results: Option<usize>) {
    counter!(MATCH_REQUESTS_TOTAL, "outcome" => outcome).increment(1);
    if let Some(results) = results {
        histogram!(MATCH_RESULTS).record(results as f64);
    }
}
