//! Keeps a cached `WeatherReport` fresh in the background.
//!
//! The cache only hits the network once per update interval. Failed fetches keep
//! the previous report and are retried sooner than a normal refresh.

use super::{OpenMeteoClient, WeatherLocation};
use crate::models::WeatherReport;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Delay before retrying after a failed fetch.
pub const RETRY_AFTER_FAILURE: Duration = Duration::from_secs(60);

/// Last good report plus the bookkeeping that decides when to fetch again.
#[derive(Debug, Clone)]
pub struct WeatherCache {
    report: WeatherReport,
    interval: Duration,
    next_attempt: Option<Instant>,
}

impl WeatherCache {
    pub fn new(interval: Duration) -> Self {
        Self {
            report: WeatherReport::default(),
            interval,
            next_attempt: None,
        }
    }

    /// True when nothing was fetched yet or the next attempt time has passed.
    pub fn is_due(&self, now: Instant) -> bool {
        self.next_attempt.map_or(true, |at| now >= at)
    }

    /// Time left until the next fetch (zero when due).
    pub fn wait_time(&self, now: Instant) -> Duration {
        self.next_attempt
            .map(|at| at.saturating_duration_since(now))
            .unwrap_or_default()
    }

    pub fn record_success(&mut self, report: WeatherReport, now: Instant) {
        self.report = report;
        self.next_attempt = Some(now + self.interval);
    }

    pub fn record_failure(&mut self, now: Instant) {
        self.next_attempt = Some(now + RETRY_AFTER_FAILURE.min(self.interval));
    }

    pub fn report(&self) -> &WeatherReport {
        &self.report
    }
}

/// Spawns the refresher task. The receiver starts with the default report and is
/// updated after every successful fetch.
pub fn spawn_weather_refresher(
    client: OpenMeteoClient,
    location: WeatherLocation,
    interval: Duration,
) -> (watch::Receiver<WeatherReport>, JoinHandle<()>) {
    let (tx, rx) = watch::channel(WeatherReport::default());

    let handle = tokio::spawn(async move {
        let mut cache = WeatherCache::new(interval);
        loop {
            let now = Instant::now();
            if cache.is_due(now) {
                match client.get_current_weather(&location).await {
                    Ok(report) => {
                        cache.record_success(report.clone(), Instant::now());
                        if tx.send(report).is_err() {
                            debug!("Weather receivers gone, stopping refresher");
                            return;
                        }
                    },
                    Err(e) => {
                        warn!("Weather refresh failed, keeping cached report: {}", e);
                        cache.record_failure(Instant::now());
                    },
                }
            }
            tokio::time::sleep(cache.wait_time(Instant::now())).await;
        }
    });

    (rx, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeatherCondition;

    fn report(temp_f: f64) -> WeatherReport {
        WeatherReport {
            temp_f,
            condition: WeatherCondition::Cloud,
            forecast_f: vec![temp_f],
        }
    }

    #[test]
    fn test_cache_due_initially_and_after_interval() {
        let start = Instant::now();
        let mut cache = WeatherCache::new(Duration::from_secs(600));
        assert!(cache.is_due(start));

        cache.record_success(report(70.0), start);
        assert!(!cache.is_due(start + Duration::from_secs(599)));
        assert!(cache.is_due(start + Duration::from_secs(600)));
        assert_eq!(cache.report().temp_f, 70.0);
    }

    #[test]
    fn test_cache_keeps_report_on_failure_and_retries_sooner() {
        let start = Instant::now();
        let mut cache = WeatherCache::new(Duration::from_secs(600));
        cache.record_success(report(70.0), start);

        let later = start + Duration::from_secs(600);
        cache.record_failure(later);
        assert_eq!(cache.report().temp_f, 70.0);
        assert!(!cache.is_due(later + Duration::from_secs(59)));
        assert!(cache.is_due(later + RETRY_AFTER_FAILURE));
        assert_eq!(cache.wait_time(later), RETRY_AFTER_FAILURE);
    }
}
