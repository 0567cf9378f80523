use super::util::{fetch_json, send_checked};
use crate::core::ledger::{LedgerSink, LedgerSource, TakeHome, Transfer};
use crate::core::period::Period;
use crate::core::records::{
    AdvanceExpenseRecord, AdvanceRecord, BalanceSheetEntry, ExpenseRecord, RevenueRecord,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

/// The hosted backend, spoken to over JSON/HTTP.
pub struct RestLedger {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct TransferRequest<'a> {
    entries: &'a [BalanceSheetEntry],
}

impl RestLedger {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("parkledger/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn period_url(&self, collection: &str, period: Period) -> String {
        format!(
            "{}/{}?month={}&year={}",
            self.base_url,
            collection,
            period.month(),
            period.year()
        )
    }
}

#[async_trait]
impl LedgerSource for RestLedger {
    async fn fetch_revenue(&self, period: Period) -> Result<Vec<RevenueRecord>> {
        let url = self.period_url("revenue", period);
        debug!("Requesting revenue from {}", url);
        fetch_json(self.client.get(&url), &format!("revenue {period}")).await
    }

    async fn fetch_expenses(&self, period: Period) -> Result<Vec<ExpenseRecord>> {
        let url = self.period_url("expenses", period);
        debug!("Requesting expenses from {}", url);
        fetch_json(self.client.get(&url), &format!("expenses {period}")).await
    }

    async fn fetch_balance_sheet(&self, period: Period) -> Result<Vec<BalanceSheetEntry>> {
        let url = self.period_url("balance-sheet", period);
        debug!("Requesting balance sheet from {}", url);
        fetch_json(self.client.get(&url), &format!("balance sheet {period}")).await
    }

    async fn fetch_advances(&self, until: NaiveDate) -> Result<Vec<AdvanceRecord>> {
        let url = format!("{}/advances?until={}", self.base_url, until.format("%Y-%m-%d"));
        debug!("Requesting advances from {}", url);
        fetch_json(self.client.get(&url), &format!("advances until {until}")).await
    }

    async fn fetch_advance_expenses(&self) -> Result<Vec<AdvanceExpenseRecord>> {
        let url = format!("{}/advance-expenses", self.base_url);
        debug!("Requesting advance expenses from {}", url);
        fetch_json(self.client.get(&url), "advance expenses").await
    }
}

#[async_trait]
impl LedgerSink for RestLedger {
    /// The backend keys this endpoint on (userName, month, year, type) and
    /// replaces any existing row.
    async fn upsert_take_home(&self, take_home: &TakeHome) -> Result<()> {
        let url = format!("{}/balance-sheet/take-home", self.base_url);
        debug!("Upserting take-home at {}", url);
        send_checked(self.client.put(&url).json(&take_home.entry()), "save take-home").await
    }

    async fn record_transfer(&self, transfer: &Transfer) -> Result<()> {
        let url = format!("{}/balance-sheet/transfers", self.base_url);
        debug!("Recording transfer at {}", url);
        let legs = transfer.legs();
        let body = TransferRequest { entries: &legs };
        send_checked(self.client.post(&url).json(&body), "save transfer").await
    }
}
