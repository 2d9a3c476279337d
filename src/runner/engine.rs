use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures::StreamExt;
use serde::{Deserialize, Serialize};

use super::progress::{ProgressEvent, ProgressSink};
use crate::analyzer::summarize;
use crate::catalog::{Catalog, TestCase};
use crate::error::ProbeError;
use crate::http::HttpTransport;
use crate::models::{ProbeResult, RunConfig, RunSummary};
use crate::probe::{build_request, execute_probe, validate_target};
use crate::reporter::{JsonExporter, ReportMetadata};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunPhase {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

/// Exclusively owned and mutated by the [`Runner`]; observers read snapshots
/// through progress events or the accessors below.
#[derive(Debug)]
pub struct RunState {
    phase: RunPhase,
    config: Option<RunConfig>,
    results: Vec<ProbeResult>,
    completed: usize,
    total: usize,
}

impl RunState {
    fn idle() -> Self {
        Self {
            phase: RunPhase::Idle,
            config: None,
            results: Vec::new(),
            completed: 0,
            total: 0,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn config(&self) -> Option<&RunConfig> {
        self.config.as_ref()
    }

    pub fn results(&self) -> &[ProbeResult] {
        &self.results
    }

    pub fn progress(&self) -> (usize, usize) {
        (self.completed, self.total)
    }
}

/// Cooperative cancellation. The flag is checked at loop boundaries only; an
/// in-flight probe always completes or times out first.
#[derive(Clone)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Everything a completed or cancelled run hands back: the final phase, the
/// aggregated summary, the ordered result log, and the serialized JSON
/// report when auto-export was requested. The engine never writes it.
#[derive(Debug)]
pub struct RunOutcome {
    pub phase: RunPhase,
    pub summary: RunSummary,
    pub results: Vec<ProbeResult>,
    pub export: Option<Vec<u8>>,
}

/// Drives selected categories against one target: builds each probe,
/// executes it, logs the result, reports progress, and honors the inter-case
/// delay and cancellation. At most one run per instance at a time.
pub struct Runner<T: HttpTransport> {
    catalog: Catalog,
    transport: T,
    cancel: CancelHandle,
    state: RunState,
}

impl<T: HttpTransport> Runner<T> {
    pub fn new(catalog: Catalog, transport: T) -> Self {
        Self {
            catalog,
            transport,
            cancel: CancelHandle(Arc::new(AtomicBool::new(false))),
            state: RunState::idle(),
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub async fn start(
        &mut self,
        config: RunConfig,
        sink: &dyn ProgressSink,
    ) -> Result<RunOutcome, ProbeError> {
        if self.state.phase == RunPhase::Running {
            return Err(ProbeError::AlreadyRunning);
        }
        if config.categories.is_empty() {
            return Err(ProbeError::EmptySelection);
        }
        validate_target(&config.target)?;

        // Full traversal plan, in config category order then catalogue case
        // order. Also validates every selected category before any probe.
        let mut plan: Vec<TestCase> = Vec::new();
        for id in &config.categories {
            plan.extend_from_slice(self.catalog.tests_for(*id)?);
        }

        self.cancel.0.store(false, Ordering::Relaxed);
        self.state = RunState {
            phase: RunPhase::Running,
            config: Some(config.clone()),
            results: Vec::with_capacity(plan.len()),
            completed: 0,
            total: plan.len(),
        };

        let run = if config.settings.concurrency > 1 {
            self.run_bounded(&plan, &config, sink).await
        } else {
            self.run_sequential(&plan, &config, sink).await
        };

        match run {
            Ok(cancelled) => {
                self.state.phase = if cancelled {
                    RunPhase::Cancelled
                } else {
                    RunPhase::Completed
                };
                let summary = summarize(&self.state.results);
                let export = if config.settings.auto_export
                    && self.state.phase == RunPhase::Completed
                {
                    let metadata = ReportMetadata::for_target(&config.target);
                    Some(JsonExporter::to_json(&summary, &self.state.results, &metadata)?)
                } else {
                    None
                };
                Ok(RunOutcome {
                    phase: self.state.phase,
                    summary,
                    results: self.state.results.clone(),
                    export,
                })
            }
            Err(e) => {
                // Partial results stay readable through state().
                self.state.phase = RunPhase::Failed;
                Err(e)
            }
        }
    }

    /// Default mode. Returns Ok(true) when the run was cancelled.
    async fn run_sequential(
        &mut self,
        plan: &[TestCase],
        config: &RunConfig,
        sink: &dyn ProgressSink,
    ) -> Result<bool, ProbeError> {
        for case in plan {
            if self.cancel.is_cancelled() {
                return Ok(true);
            }

            let request = build_request(&config.target, case)?;
            let result =
                execute_probe(&self.transport, &request, config.settings.timeout_secs, case).await;

            self.state.completed += 1;
            sink.event(&ProgressEvent {
                completed: self.state.completed,
                total: self.state.total,
                description: &case.description,
                result: Some(&result),
            });
            self.state.results.push(result);

            if self.state.completed < self.state.total && config.settings.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(config.settings.delay_ms)).await;
            }
        }
        Ok(false)
    }

    /// Opt-in bounded fan-out. `buffered` keeps output order equal to plan
    /// order, so downstream ordering guarantees match sequential mode. The
    /// inter-case delay does not apply here.
    async fn run_bounded(
        &mut self,
        plan: &[TestCase],
        config: &RunConfig,
        sink: &dyn ProgressSink,
    ) -> Result<bool, ProbeError> {
        let mut requests = Vec::with_capacity(plan.len());
        for case in plan {
            requests.push(build_request(&config.target, case)?);
        }

        let transport = &self.transport;
        let timeout_secs = config.settings.timeout_secs;
        let mut probes = futures::stream::iter(plan.iter().zip(requests.iter()))
            .map(|(case, request)| async move {
                let result = execute_probe(transport, request, timeout_secs, case).await;
                (case, result)
            })
            .buffered(config.settings.concurrency);

        loop {
            if self.cancel.is_cancelled() {
                return Ok(true);
            }
            let Some((case, result)) = probes.next().await else {
                break;
            };

            self.state.completed += 1;
            sink.event(&ProgressEvent {
                completed: self.state.completed,
                total: self.state.total,
                description: &case.description,
                result: Some(&result),
            });
            self.state.results.push(result);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CategoryId;
    use crate::http::{ProbeRequest, ProbeResponse};
    use crate::models::{ProbeStatus, RunSettings, Severity};
    use crate::probe::TIMEOUT_MESSAGE;
    use crate::runner::progress::NullSink;
    use anyhow::Result;
    use std::sync::atomic::AtomicUsize;

    struct AlwaysOk;

    impl HttpTransport for AlwaysOk {
        async fn send(&self, _request: &ProbeRequest) -> Result<ProbeResponse> {
            Ok(ProbeResponse { status: 200 })
        }
    }

    struct AlwaysHanging;

    impl HttpTransport for AlwaysHanging {
        async fn send(&self, _request: &ProbeRequest) -> Result<ProbeResponse> {
            std::future::pending().await
        }
    }

    /// Flips the shared cancellation flag while serving the Nth request.
    struct CancelOnNth {
        calls: AtomicUsize,
        nth: usize,
        handle: CancelHandle,
    }

    impl HttpTransport for CancelOnNth {
        async fn send(&self, _request: &ProbeRequest) -> Result<ProbeResponse> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call == self.nth {
                self.handle.cancel();
            }
            Ok(ProbeResponse { status: 403 })
        }
    }

    fn fast(categories: Vec<CategoryId>) -> RunConfig {
        RunConfig::new("https://svc.example.test/account/delete", categories).with_settings(
            RunSettings {
                delay_ms: 0,
                timeout_secs: 1,
                ..RunSettings::default()
            },
        )
    }

    #[tokio::test]
    async fn test_completed_run_all_success() {
        let mut runner = Runner::new(Catalog::builtin(), AlwaysOk);
        let outcome = runner
            .start(fast(vec![CategoryId::Method]), &NullSink)
            .await
            .unwrap();

        assert_eq!(outcome.phase, RunPhase::Completed);
        assert_eq!(outcome.summary.total, 20);
        assert_eq!(outcome.summary.counts.success, 20);
        assert_eq!(outcome.summary.findings.len(), 20);
        assert!(outcome
            .summary
            .findings
            .iter()
            .all(|f| f.severity == Severity::High));
        assert_eq!(runner.state().progress(), (20, 20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_timeouts_yield_errors() {
        let mut runner = Runner::new(Catalog::builtin(), AlwaysHanging);
        let outcome = runner
            .start(fast(vec![CategoryId::Method]), &NullSink)
            .await
            .unwrap();

        assert_eq!(outcome.summary.total, 20);
        assert_eq!(outcome.summary.counts.error, 20);
        assert!(outcome.summary.findings.is_empty());
        assert!(outcome
            .results
            .iter()
            .all(|r| r.status == ProbeStatus::Error
                && r.error.as_deref() == Some(TIMEOUT_MESSAGE)));
    }

    #[tokio::test]
    async fn test_cancellation_retains_partial_results() {
        let transport = CancelOnNth {
            calls: AtomicUsize::new(0),
            nth: 10,
            handle: CancelHandle(Arc::new(AtomicBool::new(false))),
        };
        let shared = transport.handle.clone();
        let mut runner = Runner::new(Catalog::builtin(), transport);
        // Runner resets its own flag at start; wire the transport to the
        // runner's handle instead of the placeholder it was built with.
        runner.cancel = shared;

        let outcome = runner
            .start(
                fast(vec![CategoryId::Parameter, CategoryId::Header]),
                &NullSink,
            )
            .await
            .unwrap();

        assert_eq!(outcome.phase, RunPhase::Cancelled);
        assert_eq!(outcome.results.len(), 10);
        assert_eq!(runner.state().phase(), RunPhase::Cancelled);
    }

    #[tokio::test]
    async fn test_result_order_matches_catalogue_traversal() {
        let catalog = Catalog::builtin();
        let mut expected: Vec<String> = Vec::new();
        for id in [CategoryId::Header, CategoryId::Parameter] {
            for case in catalog.tests_for(id).unwrap() {
                expected.push(case.description.clone());
            }
        }

        let mut runner = Runner::new(catalog, AlwaysOk);
        let outcome = runner
            .start(
                fast(vec![CategoryId::Header, CategoryId::Parameter]),
                &NullSink,
            )
            .await
            .unwrap();

        let got: Vec<String> = outcome.results.iter().map(|r| r.description.clone()).collect();
        assert_eq!(got, expected);
    }

    #[tokio::test]
    async fn test_bounded_mode_preserves_order_and_totals() {
        let mut config = fast(vec![CategoryId::Parameter, CategoryId::Header]);
        config.settings.concurrency = 4;

        let mut runner = Runner::new(Catalog::builtin(), AlwaysOk);
        let outcome = runner.start(config, &NullSink).await.unwrap();

        assert_eq!(outcome.phase, RunPhase::Completed);
        assert_eq!(outcome.summary.total, 30);

        let catalog = Catalog::builtin();
        let mut expected: Vec<String> = Vec::new();
        for id in [CategoryId::Parameter, CategoryId::Header] {
            for case in catalog.tests_for(id).unwrap() {
                expected.push(case.description.clone());
            }
        }
        let got: Vec<String> = outcome.results.iter().map(|r| r.description.clone()).collect();
        assert_eq!(got, expected);
    }

    #[tokio::test]
    async fn test_rejects_empty_selection_and_bad_target() {
        let mut runner = Runner::new(Catalog::builtin(), AlwaysOk);

        let err = runner.start(fast(vec![]), &NullSink).await.unwrap_err();
        assert!(matches!(err, ProbeError::EmptySelection));

        let config = RunConfig::new("not-a-url", vec![CategoryId::Header]);
        let err = runner.start(config, &NullSink).await.unwrap_err();
        assert!(matches!(err, ProbeError::InvalidTarget(_)));

        // Config errors leave no partial state behind.
        assert_eq!(runner.state().results().len(), 0);
        assert_eq!(runner.state().phase(), RunPhase::Idle);
    }

    #[tokio::test]
    async fn test_rejects_second_start_while_running() {
        let mut runner = Runner::new(Catalog::builtin(), AlwaysOk);
        runner.state.phase = RunPhase::Running;

        let err = runner
            .start(fast(vec![CategoryId::Header]), &NullSink)
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::AlreadyRunning));
    }

    #[tokio::test]
    async fn test_auto_export_attaches_json() {
        let mut config = fast(vec![CategoryId::Race]);
        config.settings.auto_export = true;

        let mut runner = Runner::new(Catalog::builtin(), AlwaysOk);
        let outcome = runner.start(config, &NullSink).await.unwrap();

        let bytes = outcome.export.expect("auto export bytes");
        let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(doc["summary"]["total"], 5);
        assert_eq!(doc["target"], "https://svc.example.test/account/delete");
    }
}
