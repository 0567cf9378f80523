//! Monthly balance and take-home aggregation.
//!
//! Everything here is a pure function over an already fetched
//! [`LedgerSnapshot`]. Take-home is a running balance: this month's figure is
//! the previous month's recorded take-home plus this month's net profit plus
//! any transfers.
use super::period::Period;
use super::records::{
    AdvanceExpenseRecord, AdvanceRecord, BalanceSheetEntry, ExpenseRecord, RevenueRecord,
};
use super::roster::Roster;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Raw collections for one period, joined before any computation starts.
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    pub revenue: Vec<RevenueRecord>,
    pub expenses: Vec<ExpenseRecord>,
    /// Balance-sheet rows of the selected period.
    pub balance_sheet: Vec<BalanceSheetEntry>,
    /// Balance-sheet rows of the preceding period.
    pub previous_balance_sheet: Vec<BalanceSheetEntry>,
    pub advances: Vec<AdvanceRecord>,
    pub advance_expenses: Vec<AdvanceExpenseRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub revenue: Decimal,
    pub expenses: Decimal,
    pub net_profit: Decimal,
    pub transfers_out: Decimal,
    pub transfers_net: Decimal,
    /// Brought forward from the preceding month.
    pub previous_take_home: Decimal,
    pub this_month_take_home: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvanceSummary {
    pub total_advance: Decimal,
    pub advance_expenses: Decimal,
    pub advance_in_hand: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalSummary {
    pub total_revenue: Decimal,
    pub total_expense: Decimal,
    pub net_income: Decimal,
    #[serde(flatten)]
    pub advances: AdvanceSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub period: Period,
    pub participants: BTreeMap<String, ParticipantSummary>,
    pub global: GlobalSummary,
}

pub fn revenue_for(records: &[RevenueRecord], participant: &str) -> Decimal {
    records
        .iter()
        .filter(|r| r.received_by == participant)
        .map(|r| r.revenue_amount)
        .sum()
}

pub fn expenses_for(records: &[ExpenseRecord], participant: &str) -> Decimal {
    records
        .iter()
        .filter(|r| r.spent_by == participant)
        .map(|r| r.amount)
        .sum()
}

fn entries_in<'a>(
    entries: &'a [BalanceSheetEntry],
    participant: &'a str,
    period: Period,
) -> impl Iterator<Item = &'a BalanceSheetEntry> {
    entries
        .iter()
        .filter(move |e| e.user_name == participant && period.matches(e.month, e.year))
}

/// Total sent to other participants, as a positive amount.
pub fn transfers_out_for(entries: &[BalanceSheetEntry], participant: &str, period: Period) -> Decimal {
    entries_in(entries, participant, period)
        .filter(|e| e.is_transfer() && e.amount < Decimal::ZERO)
        .map(|e| e.amount.abs())
        .sum()
}

/// Signed sum of transfer legs. Negative when the participant sent more than
/// they received.
pub fn transfers_net_for(entries: &[BalanceSheetEntry], participant: &str, period: Period) -> Decimal {
    entries_in(entries, participant, period)
        .filter(|e| e.is_transfer())
        .map(|e| e.amount)
        .sum()
}

pub fn take_home_for(entries: &[BalanceSheetEntry], participant: &str, period: Period) -> Decimal {
    entries_in(entries, participant, period)
        .filter(|e| e.is_take_home())
        .map(|e| e.amount)
        .sum()
}

/// Deposits held as of `as_of`, refunds applied. Records without a start date
/// are trusted to have been filtered by the backend.
pub fn total_advance(advances: &[AdvanceRecord], as_of: NaiveDate) -> Decimal {
    advances
        .iter()
        .filter(|a| a.start_date().is_none_or(|start| start <= as_of))
        .map(AdvanceRecord::net)
        .sum()
}

pub fn summarize_advances(
    advances: &[AdvanceRecord],
    advance_expenses: &[AdvanceExpenseRecord],
    as_of: NaiveDate,
) -> AdvanceSummary {
    let total_advance = total_advance(advances, as_of);
    let advance_expenses: Decimal = advance_expenses.iter().map(|e| e.amount).sum();
    AdvanceSummary {
        total_advance,
        advance_expenses,
        advance_in_hand: total_advance - advance_expenses,
    }
}

pub fn summarize_participant(
    snapshot: &LedgerSnapshot,
    participant: &str,
    period: Period,
) -> ParticipantSummary {
    let revenue = revenue_for(&snapshot.revenue, participant);
    let expenses = expenses_for(&snapshot.expenses, participant);
    let net_profit = revenue - expenses;
    let transfers_out = transfers_out_for(&snapshot.balance_sheet, participant, period);
    let transfers_net = transfers_net_for(&snapshot.balance_sheet, participant, period);
    let previous_take_home =
        take_home_for(&snapshot.previous_balance_sheet, participant, period.previous());

    ParticipantSummary {
        revenue,
        expenses,
        net_profit,
        transfers_out,
        transfers_net,
        previous_take_home,
        this_month_take_home: previous_take_home + net_profit + transfers_net,
    }
}

/// Distinct names on any fetched record that are not in the roster.
fn strangers<'a>(snapshot: &'a LedgerSnapshot, roster: &Roster) -> BTreeSet<&'a str> {
    snapshot
        .revenue
        .iter()
        .map(|r| r.received_by.as_str())
        .chain(snapshot.expenses.iter().map(|e| e.spent_by.as_str()))
        .chain(snapshot.balance_sheet.iter().map(|e| e.user_name.as_str()))
        .chain(snapshot.previous_balance_sheet.iter().map(|e| e.user_name.as_str()))
        .filter(|name| !roster.contains(name))
        .collect()
}

/// Builds the per-participant and global summaries for `period`.
pub fn build_report(snapshot: &LedgerSnapshot, roster: &Roster, period: Period) -> BalanceReport {
    for name in strangers(snapshot, roster) {
        warn!(participant = %name, "Ignoring records for participant outside the roster");
    }

    let participants: BTreeMap<String, ParticipantSummary> = roster
        .iter()
        .map(|p| (p.to_string(), summarize_participant(snapshot, p, period)))
        .collect();

    let total_revenue: Decimal = participants.values().map(|s| s.revenue).sum();
    let total_expense: Decimal = participants.values().map(|s| s.expenses).sum();
    let advances = summarize_advances(
        &snapshot.advances,
        &snapshot.advance_expenses,
        period.end_date(),
    );
    debug!(%period, %total_revenue, %total_expense, "Built balance report");

    BalanceReport {
        period,
        participants,
        global: GlobalSummary {
            total_revenue,
            total_expense,
            net_income: total_revenue - total_expense,
            advances,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::records::EntryKind;
    use rust_decimal_macros::dec;

    fn revenue(by: &str, amount: Decimal) -> RevenueRecord {
        RevenueRecord {
            received_by: by.to_string(),
            revenue_amount: amount,
            ..Default::default()
        }
    }

    fn expense(by: &str, amount: Decimal) -> ExpenseRecord {
        ExpenseRecord {
            spent_by: by.to_string(),
            amount,
            ..Default::default()
        }
    }

    fn entry(user: &str, amount: Decimal, period: Period, kind: Option<EntryKind>) -> BalanceSheetEntry {
        BalanceSheetEntry {
            user_name: user.to_string(),
            amount,
            month: period.month(),
            year: period.year(),
            kind,
            date: None,
        }
    }

    fn advance(amount: Decimal, refund: Decimal, start: Option<&str>) -> AdvanceRecord {
        AdvanceRecord {
            advance_amount: amount,
            advance_refund: refund,
            start_date: start.map(str::to_string),
        }
    }

    #[test]
    fn test_take_home_carries_forward_from_december() {
        let january = Period::new(0, 2024).unwrap();
        let december = Period::new(11, 2023).unwrap();
        let snapshot = LedgerSnapshot {
            revenue: vec![revenue("Balu", dec!(6000)), revenue("Balu", dec!(4000))],
            expenses: vec![expense("Balu", dec!(2000))],
            previous_balance_sheet: vec![entry("Balu", dec!(5000), december, Some(EntryKind::Normal))],
            ..Default::default()
        };

        let summary = summarize_participant(&snapshot, "Balu", january);

        assert_eq!(summary.revenue, dec!(10000));
        assert_eq!(summary.expenses, dec!(2000));
        assert_eq!(summary.net_profit, dec!(8000));
        assert_eq!(summary.previous_take_home, dec!(5000));
        assert_eq!(summary.transfers_net, Decimal::ZERO);
        assert_eq!(summary.this_month_take_home, dec!(13000));
    }

    #[test]
    fn test_january_ignores_december_of_same_year() {
        let january = Period::new(0, 2024).unwrap();
        let wrong_december = Period::new(11, 2024).unwrap();
        let snapshot = LedgerSnapshot {
            previous_balance_sheet: vec![entry("Balu", dec!(700), wrong_december, None)],
            ..Default::default()
        };

        let summary = summarize_participant(&snapshot, "Balu", january);
        assert_eq!(summary.previous_take_home, Decimal::ZERO);
    }

    #[test]
    fn test_untyped_rows_count_as_take_home() {
        let march = Period::new(2, 2024).unwrap();
        let feb = march.previous();
        let entries = vec![
            entry("Mani", dec!(300), feb, None),
            entry("Mani", dec!(200), feb, Some(EntryKind::Normal)),
            entry("Mani", dec!(-50), feb, Some(EntryKind::Transfer)),
            entry("Mani", dec!(999), feb, Some(EntryKind::Other)),
        ];
        assert_eq!(take_home_for(&entries, "Mani", feb), dec!(500));
    }

    #[test]
    fn test_transfer_between_partners() {
        let march = Period::new(2, 2024).unwrap();
        let snapshot = LedgerSnapshot {
            balance_sheet: vec![
                entry("Balu", dec!(-1500), march, Some(EntryKind::Transfer)),
                entry("Mani", dec!(1500), march, Some(EntryKind::Transfer)),
            ],
            ..Default::default()
        };
        let report = build_report(&snapshot, &Roster::default(), march);

        let balu = &report.participants["Balu"];
        let mani = &report.participants["Mani"];
        assert_eq!(balu.transfers_out, dec!(1500));
        assert_eq!(balu.transfers_net, dec!(-1500));
        assert_eq!(mani.transfers_out, Decimal::ZERO);
        assert_eq!(mani.transfers_net, dec!(1500));
        assert_eq!(balu.transfers_net + mani.transfers_net, Decimal::ZERO);
        assert_eq!(balu.this_month_take_home, dec!(-1500));
        assert_eq!(mani.this_month_take_home, dec!(1500));
    }

    #[test]
    fn test_transfers_out_counts_only_outgoing_legs() {
        let march = Period::new(2, 2024).unwrap();
        let entries = vec![
            entry("Balu", dec!(-100), march, Some(EntryKind::Transfer)),
            entry("Balu", dec!(40), march, Some(EntryKind::Transfer)),
            entry("Balu", dec!(-25), march, Some(EntryKind::Transfer)),
            entry("Balu", dec!(-999), march, Some(EntryKind::Normal)),
        ];
        assert_eq!(transfers_out_for(&entries, "Balu", march), dec!(125));
        assert_eq!(transfers_net_for(&entries, "Balu", march), dec!(-85));
    }

    #[test]
    fn test_rows_from_other_periods_are_ignored() {
        let march = Period::new(2, 2024).unwrap();
        let april = Period::new(3, 2024).unwrap();
        let entries = vec![
            entry("Balu", dec!(-100), march, Some(EntryKind::Transfer)),
            entry("Balu", dec!(-100), april, Some(EntryKind::Transfer)),
        ];
        assert_eq!(transfers_net_for(&entries, "Balu", march), dec!(-100));
    }

    #[test]
    fn test_advance_totals() {
        let advances = vec![
            advance(dec!(2000), dec!(2000), None),
            advance(dec!(3000), Decimal::ZERO, None),
        ];
        let expenses = vec![
            AdvanceExpenseRecord {
                amount: dec!(500),
                ..Default::default()
            },
            AdvanceExpenseRecord {
                amount: dec!(300),
                ..Default::default()
            },
        ];
        let as_of = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();

        let summary = summarize_advances(&advances, &expenses, as_of);
        assert_eq!(summary.total_advance, dec!(3000));
        assert_eq!(summary.advance_expenses, dec!(800));
        assert_eq!(summary.advance_in_hand, dec!(2200));
    }

    #[test]
    fn test_advances_after_period_end_are_excluded() {
        let advances = vec![
            advance(dec!(1000), Decimal::ZERO, Some("2024-03-31")),
            advance(dec!(4000), Decimal::ZERO, Some("2024-04-01")),
            advance(dec!(250), Decimal::ZERO, None),
        ];
        let as_of = Period::new(2, 2024).unwrap().end_date();
        assert_eq!(total_advance(&advances, as_of), dec!(1250));
    }

    #[test]
    fn test_advance_in_hand_does_not_depend_on_month_activity() {
        let advances = vec![advance(dec!(5000), dec!(1000), None)];
        let advance_expenses = vec![AdvanceExpenseRecord {
            amount: dec!(600),
            ..Default::default()
        }];
        for month in [0, 5, 11] {
            let period = Period::new(month, 2024).unwrap();
            let snapshot = LedgerSnapshot {
                revenue: vec![revenue("Balu", Decimal::from(month * 100))],
                advances: advances.clone(),
                advance_expenses: advance_expenses.clone(),
                ..Default::default()
            };
            let report = build_report(&snapshot, &Roster::default(), period);
            assert_eq!(report.global.advances.total_advance, dec!(4000));
            assert_eq!(report.global.advances.advance_in_hand, dec!(3400));
        }
    }

    #[test]
    fn test_global_summary_ignores_participants_outside_roster() {
        let period = Period::new(5, 2024).unwrap();
        let snapshot = LedgerSnapshot {
            revenue: vec![
                revenue("Balu", dec!(1000)),
                revenue("Mani", dec!(2000)),
                revenue("Ravi", dec!(9000)),
            ],
            expenses: vec![expense("Mani", dec!(500)), expense("Ravi", dec!(100))],
            ..Default::default()
        };

        let report = build_report(&snapshot, &Roster::default(), period);

        assert_eq!(report.participants.len(), 2);
        assert!(!report.participants.contains_key("Ravi"));
        assert_eq!(report.global.total_revenue, dec!(3000));
        assert_eq!(report.global.total_expense, dec!(500));
        assert_eq!(report.global.net_income, dec!(2500));
    }

    #[test]
    fn test_strangers_are_listed_once_including_previous_month() {
        let period = Period::new(5, 2024).unwrap();
        let snapshot = LedgerSnapshot {
            revenue: vec![revenue("Ravi", dec!(10)), revenue("Ravi", dec!(20)), revenue("Balu", dec!(5))],
            expenses: vec![expense("Ravi", dec!(1)), expense("", dec!(1))],
            previous_balance_sheet: vec![entry("Kumar", dec!(700), period.previous(), None)],
            ..Default::default()
        };

        let names: Vec<&str> = strangers(&snapshot, &Roster::default()).into_iter().collect();

        assert_eq!(names, vec!["", "Kumar", "Ravi"]);
    }

    #[test]
    fn test_take_home_identity_holds_for_every_participant() {
        let period = Period::new(7, 2024).unwrap();
        let previous = period.previous();
        let roster = Roster::new(["A", "B", "C"]);
        let snapshot = LedgerSnapshot {
            revenue: vec![revenue("A", dec!(120)), revenue("C", dec!(75.5))],
            expenses: vec![expense("B", dec!(30)), expense("C", dec!(10.25))],
            balance_sheet: vec![
                entry("A", dec!(-40), period, Some(EntryKind::Transfer)),
                entry("B", dec!(40), period, Some(EntryKind::Transfer)),
            ],
            previous_balance_sheet: vec![
                entry("A", dec!(10), previous, Some(EntryKind::Normal)),
                entry("C", dec!(-5), previous, None),
            ],
            ..Default::default()
        };

        let report = build_report(&snapshot, &roster, period);
        for summary in report.participants.values() {
            assert_eq!(
                summary.this_month_take_home,
                summary.previous_take_home + summary.net_profit + summary.transfers_net
            );
        }
        assert_eq!(report.participants["A"].this_month_take_home, dec!(90));
        assert_eq!(report.participants["B"].this_month_take_home, dec!(10));
        assert_eq!(report.participants["C"].this_month_take_home, dec!(60.25));
    }
}
