use crate::models::{CategoryBreakdown, Finding, ProbeResult, RunSummary, StatusCounts};

/// Folds an ordered result log into a [`RunSummary`]. Pure and
/// deterministic: identical input yields an identical summary, and an empty
/// log yields a zeroed one. Category breakdowns appear in first-seen order.
pub fn summarize(results: &[ProbeResult]) -> RunSummary {
    let mut counts = StatusCounts::default();
    let mut per_category: Vec<CategoryBreakdown> = Vec::new();
    let mut findings = Vec::new();

    for result in results {
        counts.record(result.status);

        match per_category
            .iter_mut()
            .find(|b| b.category == result.category)
        {
            Some(breakdown) => breakdown.counts.record(result.status),
            None => {
                let mut fresh = StatusCounts::default();
                fresh.record(result.status);
                per_category.push(CategoryBreakdown {
                    category: result.category,
                    counts: fresh,
                });
            }
        }

        if let Some(finding) = Finding::from_result(result) {
            findings.push(finding);
        }
    }

    RunSummary {
        total: results.len(),
        counts,
        per_category,
        findings,
    }
}
