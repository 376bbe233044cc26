//! Logic for aggregating billing events into the analytics page.
//!
//! Events are grouped in memory: per-month counts of completed checkouts,
//! totals per event type, and the current month's checkout and failed-invoice
//! counts. Months are calendar months in UTC.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use truview_adapters::{CHECKOUT_COMPLETED, INVOICE_PAYMENT_FAILED};

use crate::database::models::BillingEvent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    /// `YYYY-MM`
    pub month: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    pub event_type: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BillingAnalytics {
    pub checkouts_this_month: u64,
    pub failed_invoices_this_month: u64,
    pub total_events: u64,
    /// Newest month first.
    pub monthly_checkouts: Vec<MonthlyCount>,
    /// Most frequent type first.
    pub by_type: Vec<TypeCount>,
}

/// Unix seconds at 00:00 UTC on the first day of `now`'s month.
pub fn month_start(now: DateTime<Utc>) -> i64 {
    now.date_naive()
        .with_day(1)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().timestamp())
        .unwrap_or_else(|| now.timestamp())
}

fn month_key(timestamp: i64) -> Option<String> {
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.format("%Y-%m").to_string())
}

pub fn aggregate(events: &[BillingEvent], now: DateTime<Utc>) -> BillingAnalytics {
    let since = month_start(now);
    let mut checkouts_this_month = 0;
    let mut failed_invoices_this_month = 0;
    let mut monthly: BTreeMap<String, u64> = BTreeMap::new();
    let mut by_type: BTreeMap<&str, u64> = BTreeMap::new();

    for event in events {
        *by_type.entry(event.event_type.as_str()).or_insert(0) += 1;

        let this_month = event.timestamp >= since;
        match event.event_type.as_str() {
            CHECKOUT_COMPLETED => {
                if this_month {
                    checkouts_this_month += 1;
                }
                if let Some(month) = month_key(event.timestamp) {
                    *monthly.entry(month).or_insert(0) += 1;
                }
            }
            INVOICE_PAYMENT_FAILED if this_month => failed_invoices_this_month += 1,
            _ => {}
        }
    }

    let mut by_type: Vec<TypeCount> = by_type
        .into_iter()
        .map(|(event_type, count)| TypeCount {
            event_type: event_type.to_string(),
            count,
        })
        .collect();
    by_type.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.event_type.cmp(&b.event_type)));

    BillingAnalytics {
        checkouts_this_month,
        failed_invoices_this_month,
        total_events: events.len() as u64,
        monthly_checkouts: monthly
            .into_iter()
            .rev()
            .map(|(month, count)| MonthlyCount { month, count })
            .collect(),
        by_type,
    }
}
