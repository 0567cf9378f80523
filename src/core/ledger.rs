//! Backend abstractions and the two write commands.

use super::error::LedgerError;
use super::period::Period;
use super::records::{
    AdvanceExpenseRecord, AdvanceRecord, BalanceSheetEntry, EntryKind, ExpenseRecord,
    RevenueRecord,
};
use super::roster::Roster;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Read side of the backend.
#[async_trait]
pub trait LedgerSource: Send + Sync {
    async fn fetch_revenue(&self, period: Period) -> Result<Vec<RevenueRecord>>;
    async fn fetch_expenses(&self, period: Period) -> Result<Vec<ExpenseRecord>>;
    async fn fetch_balance_sheet(&self, period: Period) -> Result<Vec<BalanceSheetEntry>>;
    /// Advances whose start is on or before `until`.
    async fn fetch_advances(&self, until: NaiveDate) -> Result<Vec<AdvanceRecord>>;
    async fn fetch_advance_expenses(&self) -> Result<Vec<AdvanceExpenseRecord>>;
}

/// Write side of the backend.
#[async_trait]
pub trait LedgerSink: Send + Sync {
    /// Creates or replaces the take-home row for (participant, month, year).
    /// Implementations must do this as one conditional write.
    async fn upsert_take_home(&self, take_home: &TakeHome) -> Result<()>;

    /// Records both legs of a transfer in one request.
    async fn record_transfer(&self, transfer: &Transfer) -> Result<()>;
}

/// A take-home snapshot for one participant and month.
#[derive(Debug, Clone, PartialEq)]
pub struct TakeHome {
    participant: String,
    period: Period,
    amount: Decimal,
}

impl TakeHome {
    pub fn new(
        roster: &Roster,
        participant: &str,
        period: Period,
        amount: Decimal,
    ) -> Result<Self, LedgerError> {
        let participant = roster.require(participant)?.to_string();
        Ok(Self {
            participant,
            period,
            amount,
        })
    }

    pub fn participant(&self) -> &str {
        &self.participant
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn entry(&self) -> BalanceSheetEntry {
        BalanceSheetEntry {
            user_name: self.participant.clone(),
            amount: self.amount,
            month: self.period.month(),
            year: self.period.year(),
            kind: Some(EntryKind::Normal),
            date: None,
        }
    }
}

/// A cash movement from one participant to another. The signed balance-sheet
/// rows are derived from it, so the pair always nets to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    from: String,
    to: String,
    amount: Decimal,
    date: NaiveDate,
    period: Period,
}

impl Transfer {
    pub fn new(
        roster: &Roster,
        from: &str,
        to: &str,
        amount: Decimal,
        date: Option<NaiveDate>,
        period: Period,
    ) -> Result<Self, LedgerError> {
        let from = roster.require(from)?;
        let to = roster.require(to)?;
        if from == to {
            return Err(LedgerError::InvalidTransfer(format!(
                "cannot transfer from {from} to themselves"
            )));
        }
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidTransfer(format!(
                "amount must be positive, got {amount}"
            )));
        }
        let date = date.ok_or(LedgerError::MissingDate)?;

        Ok(Self {
            from: from.to_string(),
            to: to.to_string(),
            amount,
            date,
            period,
        })
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn period(&self) -> Period {
        self.period
    }

    /// Outgoing leg first, incoming leg second.
    pub fn legs(&self) -> [BalanceSheetEntry; 2] {
        let leg = |user_name: &str, amount: Decimal| BalanceSheetEntry {
            user_name: user_name.to_string(),
            amount,
            month: self.period.month(),
            year: self.period.year(),
            kind: Some(EntryKind::Transfer),
            date: Some(self.date.format("%Y-%m-%d").to_string()),
        };
        [leg(&self.from, -self.amount), leg(&self.to, self.amount)]
    }
}
