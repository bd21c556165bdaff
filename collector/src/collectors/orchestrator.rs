use crate::{
    collectors::Collector,
    metrics::Metrics,
    session::{
        Connector,
        SessionManager,
    },
};
use chrono::{
    DateTime,
    Utc,
};
use std::{
    sync::{
        Arc,
        Mutex as StdMutex,
        PoisonError,
    },
    time::Duration,
};
use tokio::{
    sync::Mutex,
    time::Instant,
};

#[derive(Debug, Clone, Copy)]
pub struct OrchestratorOptions {
    /// Upper bound for one whole cycle, including waiting for a cycle that is already running.
    pub scrape_timeout: Duration,
    /// A new cycle only starts this long after the previous one finished. Zero scrapes on every request.
    pub min_scrape_interval: Duration,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            scrape_timeout: Duration::from_secs(10),
            min_scrape_interval: Duration::ZERO,
        }
    }
}

/// What happened during one cycle.
#[derive(Debug, Clone)]
pub struct CollectionOutcome {
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub connect_error: Option<String>,
    /// Routine name and error of every routine that failed.
    pub collector_errors: Vec<(&'static str, String)>,
    pub timed_out: bool,
}

impl CollectionOutcome {
    pub fn is_success(&self) -> bool {
        self.connect_error.is_none() && self.collector_errors.is_empty() && !self.timed_out
    }
}

#[derive(Default)]
struct CycleReport {
    connect_error: Option<String>,
    collector_errors: Vec<(&'static str, String)>,
}

/// Everything a cycle mutates. Only one cycle holds it at a time.
struct CycleState {
    session: SessionManager,
    collectors: Vec<Box<dyn Collector>>,
}

/// Runs scrape cycles: authenticate, run every routine, maintain the exporter's own metrics.
///
/// Cycles are serialized. A request arriving while a cycle runs waits for it to finish and then runs its
/// own, so no query is ever issued while a login is in progress.
pub struct Orchestrator {
    metrics: Arc<Metrics>,
    options: OrchestratorOptions,
    state: Mutex<CycleState>,
    last_finished: StdMutex<Option<Instant>>,
}

impl Orchestrator {
    pub fn new(
        connector: Box<dyn Connector>,
        collectors: Vec<Box<dyn Collector>>,
        metrics: Arc<Metrics>,
        options: OrchestratorOptions,
    ) -> Self {
        for collector in &collectors {
            metrics.exporter.init_scrape_errors(collector.name());
        }

        Self {
            metrics,
            options,
            state: Mutex::new(CycleState {
                session: SessionManager::new(connector),
                collectors,
            }),
            last_finished: StdMutex::new(None),
        }
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn options(&self) -> &OrchestratorOptions {
        &self.options
    }

    /// Run one full cycle.
    pub async fn collect(&self) -> CollectionOutcome {
        let started_at = Utc::now();
        let started = Instant::now();
        self.metrics.exporter.inc_total_scrapes();

        let (report, timed_out) = match tokio::time::timeout(self.options.scrape_timeout, self.run_cycle()).await {
            Ok(report) => (report, false),
            Err(_) => {
                warn!(timeout = ?self.options.scrape_timeout, "Scrape timed out");
                self.metrics.exporter.mark_down();
                (CycleReport::default(), true)
            }
        };

        let duration = started.elapsed();
        self.metrics.exporter.set_duration(duration);
        *self.last_finished.lock().unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());

        let outcome = CollectionOutcome {
            started_at,
            duration,
            connect_error: report.connect_error,
            collector_errors: report.collector_errors,
            timed_out,
        };
        debug!(
            success = outcome.is_success(),
            duration = ?outcome.duration,
            "Scrape finished"
        );
        outcome
    }

    /// Like [`Orchestrator::collect`], but skips the cycle and returns `None` when the previous one finished
    /// less than the minimum scrape interval ago.
    pub async fn collect_throttled(&self) -> Option<CollectionOutcome> {
        let interval = self.options.min_scrape_interval;
        if !interval.is_zero() {
            let last_finished = *self.last_finished.lock().unwrap_or_else(PoisonError::into_inner);
            if last_finished.is_some_and(|finished| finished.elapsed() < interval) {
                trace!("Serving the previous scrape");
                return None;
            }
        }
        Some(self.collect().await)
    }

    async fn run_cycle(&self) -> CycleReport {
        let mut state = self.state.lock().await;
        let CycleState {
            session,
            collectors,
        } = &mut *state;

        let mut report = CycleReport::default();
        let client = match session.ensure().await {
            Ok(client) => client,
            Err(err) => {
                error!(error = %err, "Cannot connect to the FRITZ!Box");
                self.metrics.exporter.mark_down();
                report.connect_error = Some(err.to_string());
                return report;
            }
        };
        self.metrics.exporter.mark_up();

        for collector in collectors.iter_mut() {
            let name = collector.name();
            if let Err(err) = collector.collect(client, &self.metrics).await {
                error!(collector = name, error = %err, "Scrape routine failed");
                self.metrics.exporter.inc_scrape_errors(name);
                report.collector_errors.push((name, err.to_string()));
            }
        }
        report
    }
}
