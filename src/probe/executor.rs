use std::time::{Duration, Instant};

use crate::catalog::TestCase;
use crate::http::{HttpTransport, ProbeRequest};
use crate::models::ProbeResult;

pub const TIMEOUT_MESSAGE: &str = "Request timeout";

/// Issues one probe under a deadline and classifies the outcome. Every
/// failure path lands in the returned [`ProbeResult`]; nothing escapes this
/// boundary, so one broken probe cannot abort a run.
pub async fn execute_probe<T: HttpTransport>(
    transport: &T,
    request: &ProbeRequest,
    timeout_secs: u64,
    case: &TestCase,
) -> ProbeResult {
    let start = Instant::now();
    let deadline = Duration::from_secs(timeout_secs);

    let outcome = tokio::time::timeout(deadline, transport.send(request)).await;
    let duration_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(Ok(response)) => ProbeResult::classified(
            case.category,
            case.description.clone(),
            case.payload.render(),
            response.status,
            duration_ms,
        ),
        Ok(Err(e)) => ProbeResult::errored(
            case.category,
            case.description.clone(),
            case.payload.render(),
            e.to_string(),
            duration_ms,
        ),
        Err(_) => ProbeResult::errored(
            case.category,
            case.description.clone(),
            case.payload.render(),
            TIMEOUT_MESSAGE.to_string(),
            duration_ms,
        ),
    }
}
