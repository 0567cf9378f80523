use super::ui;
use crate::core::records::{parse_amount, parse_date};
use crate::core::{LedgerSink, Period, Roster, Transfer};
use anyhow::{Context, Result};
use tracing::info;

/// Moves `amount` from one participant to another. The period defaults to
/// the month containing `date`.
pub async fn run(
    sink: &dyn LedgerSink,
    roster: &Roster,
    from: &str,
    to: &str,
    amount: &str,
    date: Option<&str>,
    period: Option<Period>,
) -> Result<Transfer> {
    let amount = parse_amount(amount)?;
    let date = date.map(parse_date).transpose()?;
    let period = period.or_else(|| date.map(Period::containing));
    let transfer = Transfer::new(
        roster,
        from,
        to,
        amount,
        date,
        period.unwrap_or_else(Period::current),
    )?;

    sink.record_transfer(&transfer)
        .await
        .context("Failed to save transfer")?;

    info!(
        from = transfer.from(),
        to = transfer.to(),
        amount = %transfer.amount(),
        period = %transfer.period(),
        "Saved transfer"
    );
    println!(
        "Transferred {} from {} to {} on {}",
        ui::style_text(&ui::format_amount(transfer.amount()), ui::StyleType::TotalValue),
        transfer.from(),
        transfer.to(),
        transfer.date()
    );
    Ok(transfer)
}
