use super::{balance, ui};
use crate::core::aggregate::{self, AdvanceSummary};
use crate::core::fetch;
use crate::core::{LedgerSource, Period};
use anyhow::Result;

/// Deposits held as of the end of `period`, less everything spent from them.
pub async fn load_summary(source: &dyn LedgerSource, period: Period) -> Result<AdvanceSummary> {
    let (advances, advance_expenses) = fetch::load_advances(source, period).await?;
    Ok(aggregate::summarize_advances(
        &advances,
        &advance_expenses,
        period.end_date(),
    ))
}

pub async fn run(source: &dyn LedgerSource, period: Period, currency: &str) -> Result<()> {
    let pb = ui::new_spinner("Fetching advances...");
    let summary = load_summary(source, period).await;
    pb.finish_and_clear();
    let summary = summary?;

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Advances"),
        ui::header_cell(&format!("Amount ({currency})")),
    ]);
    balance::add_advance_rows(&mut table, &summary);

    println!(
        "Advances as of {}\n\n{}",
        ui::style_text(&period.end_date().to_string(), ui::StyleType::Title),
        table
    );
    Ok(())
}
