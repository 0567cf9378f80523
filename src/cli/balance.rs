use super::ui;
use crate::core::aggregate::{self, AdvanceSummary, BalanceReport, ParticipantSummary};
use crate::core::cache::KeyValueCollection;
use crate::core::fetch;
use crate::core::{LedgerSource, Period, Roster};
use anyhow::{Context, Result};
use comfy_table::Cell;
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Collection holding the last successful report per period.
pub const REPORTS_COLLECTION: &str = "reports";

impl BalanceReport {
    pub fn display_as_table(&self, roster: &Roster, currency: &str) -> String {
        let mut table = ui::new_styled_table();

        let mut header = vec![ui::header_cell(&format!("({currency})"))];
        header.extend(roster.iter().map(ui::header_cell));
        table.set_header(header);

        let rows: [(&str, fn(&ParticipantSummary) -> Decimal); 7] = [
            ("Revenue", |s: &ParticipantSummary| s.revenue),
            ("Expenses", |s: &ParticipantSummary| s.expenses),
            ("Net profit", |s: &ParticipantSummary| s.net_profit),
            ("Brought forward", |s: &ParticipantSummary| s.previous_take_home),
            ("Transfers out", |s: &ParticipantSummary| s.transfers_out),
            ("Transfers net", |s: &ParticipantSummary| s.transfers_net),
            ("Take-home", |s: &ParticipantSummary| s.this_month_take_home),
        ];
        let last = rows.len() - 1;
        for (i, (label, value)) in rows.iter().enumerate() {
            let mut row = vec![Cell::new(*label)];
            for participant in roster.iter() {
                let amount = self
                    .participants
                    .get(participant)
                    .map(*value)
                    .unwrap_or_default();
                row.push(if i == last {
                    ui::total_cell(amount)
                } else {
                    ui::amount_cell(amount)
                });
            }
            table.add_row(row);
        }

        let mut output = format!(
            "Balance for {}\n\n",
            ui::style_text(&self.period.to_string(), ui::StyleType::Title)
        );
        output.push_str(&table.to_string());
        output.push_str("\n\n");
        output.push_str(&global_table(self, currency));
        output
    }
}

fn global_table(report: &BalanceReport, currency: &str) -> String {
    let global = &report.global;
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Summary"),
        ui::header_cell(&format!("Amount ({currency})")),
    ]);
    table.add_row(vec![Cell::new("Total revenue"), ui::amount_cell(global.total_revenue)]);
    table.add_row(vec![Cell::new("Total expense"), ui::amount_cell(global.total_expense)]);
    table.add_row(vec![Cell::new("Net income"), ui::total_cell(global.net_income)]);
    add_advance_rows(&mut table, &global.advances);
    table.to_string()
}

pub(crate) fn add_advance_rows(table: &mut comfy_table::Table, advances: &AdvanceSummary) {
    table.add_row(vec![Cell::new("Total advance"), ui::amount_cell(advances.total_advance)]);
    table.add_row(vec![
        Cell::new("Advance expenses"),
        ui::amount_cell(advances.advance_expenses),
    ]);
    table.add_row(vec![
        Cell::new("Advance in hand"),
        ui::total_cell(advances.advance_in_hand),
    ]);
}

fn cache_key(period: Period) -> String {
    period.to_string()
}

/// Fetches, aggregates and remembers the report for `period`.
pub async fn load_report(
    source: &dyn LedgerSource,
    reports: &dyn KeyValueCollection,
    roster: &Roster,
    period: Period,
) -> Result<BalanceReport> {
    let snapshot = fetch::load_snapshot(source, period).await?;
    let report = aggregate::build_report(&snapshot, roster, period);

    match serde_json::to_vec(&report) {
        Ok(bytes) => reports.put(cache_key(period).as_bytes(), &bytes).await,
        Err(e) => warn!("Could not store report for {}: {}", period, e),
    }
    Ok(report)
}

/// The last report successfully built for `period`, if any. An entry that no
/// longer decodes is dropped so the next successful load replaces it cleanly.
pub async fn cached_report(reports: &dyn KeyValueCollection, period: Period) -> Option<BalanceReport> {
    let key = cache_key(period);
    let bytes = reports.get(key.as_bytes()).await?;
    match serde_json::from_slice(&bytes) {
        Ok(report) => Some(report),
        Err(e) => {
            debug!("Discarding unreadable cached report for {}: {}", period, e);
            reports.remove(key.as_bytes()).await;
            None
        }
    }
}

fn format_report(report: &BalanceReport, roster: &Roster, currency: &str, as_json: bool) -> Result<String> {
    if as_json {
        serde_json::to_string_pretty(report).context("Failed to serialize report")
    } else {
        Ok(report.display_as_table(roster, currency))
    }
}

/// A failed load, with the last saved report for the period rendered when
/// one exists.
#[derive(Debug)]
pub struct StaleReport {
    pub error: anyhow::Error,
    pub cached: Option<String>,
}

/// Loads and renders the report for `period`, falling back to the cached
/// report when the backend fails.
pub async fn render(
    source: &dyn LedgerSource,
    reports: &dyn KeyValueCollection,
    roster: &Roster,
    period: Period,
    currency: &str,
    as_json: bool,
) -> Result<String, StaleReport> {
    let error = match load_report(source, reports, roster, period).await {
        Ok(report) => {
            return format_report(&report, roster, currency, as_json)
                .map_err(|error| StaleReport { error, cached: None });
        }
        Err(error) => error,
    };

    let cached = match cached_report(reports, period).await {
        Some(stale) => format_report(&stale, roster, currency, as_json)
            .map_err(|e| warn!("Could not render cached report for {}: {}", period, e))
            .ok(),
        None => None,
    };
    Err(StaleReport { error, cached })
}

pub async fn run(
    source: &dyn LedgerSource,
    reports: &dyn KeyValueCollection,
    roster: &Roster,
    period: Period,
    currency: &str,
    as_json: bool,
) -> Result<()> {
    let pb = ui::new_spinner(&format!("Fetching ledger for {period}..."));
    let rendered = render(source, reports, roster, period, currency, as_json).await;
    pb.finish_and_clear();

    match rendered {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(StaleReport { error, cached }) => {
            if let Some(output) = cached {
                eprintln!(
                    "{}",
                    ui::style_text(
                        "Showing last saved report; the backend could not be reached.",
                        ui::StyleType::Warning
                    )
                );
                println!("{output}");
            }
            Err(error)
        }
    }
}
