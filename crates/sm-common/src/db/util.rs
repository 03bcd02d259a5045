#![allow(async_fn_in_trait)]

use deadpool_postgres::GenericClient;
use std::{sync::OnceLock, time::Instant};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;
use tracing::warn;

pub const SLOW_QUERY_ENV: &str = "SM_DB_LOG_MIN_DURATION_MS";

type Params<'a> = &'a [&'a (dyn ToSql + Sync)];

fn parse_threshold(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|raw| raw.trim().parse::<i64>().ok())
        .map(|v| v.max(0) as u64)
        .filter(|v| *v > 0)
}

fn slow_query_threshold_ms() -> Option<u64> {
    static CACHE: OnceLock<Option<u64>> = OnceLock::new();

    *CACHE.get_or_init(|| parse_threshold(std::env::var(SLOW_QUERY_ENV).ok().as_deref()))
}

fn log_if_slow(label: &str, started_at: Instant) {
    let Some(threshold_ms) = slow_query_threshold_ms() else {
        return;
    };
    let elapsed_ms = started_at.elapsed().as_millis() as u64;
    if elapsed_ms >= threshold_ms {
        warn!(query = label, elapsed_ms, threshold_ms, "slow_query_detected");
    }
}

/// Query helpers that prepare through the statement cache and log statements
/// slower than `SM_DB_LOG_MIN_DURATION_MS`. Timing covers preparation.
pub trait TimedClientExt: GenericClient {
    async fn timed_query(
        &self,
        statement: &str,
        params: Params<'_>,
        label: &str,
    ) -> Result<Vec<Row>, tokio_postgres::Error> {
        let started = Instant::now();
        let prepared = self.prepare_cached(statement).await?;
        let result = self.query(&prepared, params).await;
        log_if_slow(label, started);
        result
    }

    async fn timed_query_opt(
        &self,
        statement: &str,
        params: Params<'_>,
        label: &str,
    ) -> Result<Option<Row>, tokio_postgres::Error> {
        let started = Instant::now();
        let prepared = self.prepare_cached(statement).await?;
        let result = self.query_opt(&prepared, params).await;
        log_if_slow(label, started);
        result
    }

    async fn timed_query_one(
        &self,
        statement: &str,
        params: Params<'_>,
        label: &str,
    ) -> Result<Row, tokio_postgres::Error> {
        let started = Instant::now();
        let prepared = self.prepare_cached(statement).await?;
        let result = self.query_one(&prepared, params).await;
        log_if_slow(label, started);
        result
    }

    async fn timed_execute(
        &self,
        statement: &str,
        params: Params<'_>,
        label: &str,
    ) -> Result<u64, tokio_postgres::Error> {
        let started = Instant::now();
        let prepared = self.prepare_cached(statement).await?;
        let result = self.execute(&prepared, params).await;
        log_if_slow(label, started);
        result
    }
}

impl<T: GenericClient + ?Sized> TimedClientExt for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_requires_positive_integer() {
        assert_eq!(parse_threshold(None), None);
        assert_eq!(parse_threshold(Some("0")), None);
        assert_eq!(parse_threshold(Some("-5")), None);
        assert_eq!(parse_threshold(Some("abc")), None);
        assert_eq!(parse_threshold(Some(" 250 ")), Some(250));
    }
}
