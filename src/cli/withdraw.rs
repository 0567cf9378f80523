use super::ui;
use crate::core::records::parse_amount;
use crate::core::{LedgerSink, Period, Roster, TakeHome};
use anyhow::{Context, Result};
use tracing::info;

/// Records `amount` as the take-home of `participant` for `period`,
/// replacing any earlier figure for the same month.
pub async fn run(
    sink: &dyn LedgerSink,
    roster: &Roster,
    participant: &str,
    period: Period,
    amount: &str,
) -> Result<TakeHome> {
    let amount = parse_amount(amount)?;
    let take_home = TakeHome::new(roster, participant, period, amount)?;

    sink.upsert_take_home(&take_home)
        .await
        .context("Failed to save take-home")?;

    info!(participant = take_home.participant(), %period, %amount, "Saved take-home");
    println!(
        "Saved take-home of {} for {} in {}",
        ui::style_text(&ui::format_amount(amount), ui::StyleType::TotalValue),
        take_home.participant(),
        period
    );
    Ok(take_home)
}
