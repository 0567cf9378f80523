use super::aggregate::LedgerSnapshot;
use super::ledger::LedgerSource;
use super::period::Period;
use super::records::{AdvanceExpenseRecord, AdvanceRecord};
use anyhow::{Context, Result};
use futures::try_join;
use tracing::debug;

/// Fetches every collection needed to report on `period` concurrently.
///
/// The reads are joined before anything is computed; if one of them fails the
/// whole load fails and no partial snapshot is returned.
pub async fn load_snapshot(source: &dyn LedgerSource, period: Period) -> Result<LedgerSnapshot> {
    let previous = period.previous();
    debug!(%period, %previous, "Loading ledger snapshot");

    let (revenue, expenses, balance_sheet, previous_balance_sheet, (advances, advance_expenses)) = try_join!(
        async {
            source
                .fetch_revenue(period)
                .await
                .with_context(|| format!("Failed to load revenue for {period}"))
        },
        async {
            source
                .fetch_expenses(period)
                .await
                .with_context(|| format!("Failed to load expenses for {period}"))
        },
        async {
            source
                .fetch_balance_sheet(period)
                .await
                .with_context(|| format!("Failed to load balance sheet for {period}"))
        },
        async {
            source
                .fetch_balance_sheet(previous)
                .await
                .with_context(|| format!("Failed to load balance sheet for {previous}"))
        },
        load_advances(source, period),
    )?;

    debug!(
        revenue = revenue.len(),
        expenses = expenses.len(),
        balance_sheet = balance_sheet.len(),
        previous_balance_sheet = previous_balance_sheet.len(),
        advances = advances.len(),
        advance_expenses = advance_expenses.len(),
        "Loaded ledger snapshot"
    );

    Ok(LedgerSnapshot {
        revenue,
        expenses,
        balance_sheet,
        previous_balance_sheet,
        advances,
        advance_expenses,
    })
}

/// Advances held up to the end of `period` and all advance expenses.
pub async fn load_advances(
    source: &dyn LedgerSource,
    period: Period,
) -> Result<(Vec<AdvanceRecord>, Vec<AdvanceExpenseRecord>)> {
    let until = period.end_date();
    try_join!(
        async {
            source
                .fetch_advances(until)
                .await
                .with_context(|| format!("Failed to load advances up to {until}"))
        },
        async {
            source
                .fetch_advance_expenses()
                .await
                .context("Failed to load advance expenses")
        },
    )
}
