use crate::core::ledger::{LedgerSink, LedgerSource, TakeHome, Transfer};
use crate::core::period::Period;
use crate::core::records::{
    AdvanceExpenseRecord, AdvanceRecord, BalanceSheetEntry, ExpenseRecord, RevenueRecord,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct Tables {
    revenue: Vec<(Period, RevenueRecord)>,
    expenses: Vec<(Period, ExpenseRecord)>,
    balance_sheet: Vec<BalanceSheetEntry>,
    advances: Vec<AdvanceRecord>,
    advance_expenses: Vec<AdvanceExpenseRecord>,
}

/// An in-process ledger implementing both sides of the backend contract.
///
/// All writes happen under a single lock, so the take-home upsert is one
/// conditional write and a transfer's legs land together.
#[derive(Default)]
pub struct MemoryLedger {
    tables: RwLock<Tables>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_revenue(&self, period: Period, record: RevenueRecord) {
        self.tables.write().await.revenue.push((period, record));
    }

    pub async fn add_expense(&self, period: Period, record: ExpenseRecord) {
        self.tables.write().await.expenses.push((period, record));
    }

    pub async fn add_balance_sheet_entry(&self, entry: BalanceSheetEntry) {
        self.tables.write().await.balance_sheet.push(entry);
    }

    pub async fn add_advance(&self, record: AdvanceRecord) {
        self.tables.write().await.advances.push(record);
    }

    pub async fn add_advance_expense(&self, record: AdvanceExpenseRecord) {
        self.tables.write().await.advance_expenses.push(record);
    }

    pub async fn balance_sheet(&self) -> Vec<BalanceSheetEntry> {
        self.tables.read().await.balance_sheet.clone()
    }
}

#[async_trait]
impl LedgerSource for MemoryLedger {
    async fn fetch_revenue(&self, period: Period) -> Result<Vec<RevenueRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .revenue
            .iter()
            .filter(|(p, _)| *p == period)
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn fetch_expenses(&self, period: Period) -> Result<Vec<ExpenseRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .expenses
            .iter()
            .filter(|(p, _)| *p == period)
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn fetch_balance_sheet(&self, period: Period) -> Result<Vec<BalanceSheetEntry>> {
        let tables = self.tables.read().await;
        Ok(tables
            .balance_sheet
            .iter()
            .filter(|e| period.matches(e.month, e.year))
            .cloned()
            .collect())
    }

    async fn fetch_advances(&self, until: NaiveDate) -> Result<Vec<AdvanceRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .advances
            .iter()
            .filter(|a| a.start_date().is_none_or(|start| start <= until))
            .cloned()
            .collect())
    }

    async fn fetch_advance_expenses(&self) -> Result<Vec<AdvanceExpenseRecord>> {
        Ok(self.tables.read().await.advance_expenses.clone())
    }
}

#[async_trait]
impl LedgerSink for MemoryLedger {
    async fn upsert_take_home(&self, take_home: &TakeHome) -> Result<()> {
        let period = take_home.period();
        let mut tables = self.tables.write().await;
        let existing = tables.balance_sheet.iter_mut().find(|e| {
            e.is_take_home()
                && e.user_name == take_home.participant()
                && period.matches(e.month, e.year)
        });
        match existing {
            Some(entry) => {
                debug!(participant = take_home.participant(), %period, "Replacing take-home");
                entry.amount = take_home.amount();
            }
            None => {
                debug!(participant = take_home.participant(), %period, "Creating take-home");
                tables.balance_sheet.push(take_home.entry());
            }
        }
        Ok(())
    }

    async fn record_transfer(&self, transfer: &Transfer) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.balance_sheet.extend(transfer.legs());
        Ok(())
    }
}
