//! Deterministic sample transactions.
//!
//! Stands in for a real record source. Dates are derived from a fixed anchor,
//! so the same set is produced on every run.

use crate::amount::Amount;
use crate::transaction::{CashbackStatus, NewTransaction, SettlementStatus};
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Store labels cycled through by generated rows.
pub const STORES: [&str; 5] = [
    "Main Branch",
    "Downtown Branch",
    "Uptown Branch",
    "East Side",
    "West End",
];

/// Highest generated transaction index.
pub const LAST_INDEX: u32 = 100;

/// Anchor for generated rows: 2024-04-01 09:00 UTC.
pub fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .unwrap_or_default()
}

fn fixed(
    id: &str,
    occurred_at: DateTime<Utc>,
    customer: &str,
    gross: u32,
    reach: Option<u32>,
    store: &str,
    status: SettlementStatus,
) -> NewTransaction {
    let posted = reach.is_some();
    NewTransaction {
        id: id.to_string(),
        occurred_at,
        customer: customer.to_string(),
        gross: Amount::from(gross),
        posted,
        store: store.to_string(),
        post_reach: reach,
        cashback: posted.then_some(CashbackStatus::Redeemed),
        status,
    }
}

/// Row `i` of the generated range.
fn generated(i: u32) -> NewTransaction {
    let offset = Duration::days(i64::from(i))
        + Duration::hours(i64::from(i % 10))
        + Duration::minutes(i64::from(i % 30));

    let posted = i % 5 != 0;
    let cashback = match (posted, i % 2) {
        (true, 0) => CashbackStatus::Redeemed,
        _ => CashbackStatus::NotRedeemed,
    };

    NewTransaction {
        id: format!("TRX{:03}", i),
        occurred_at: anchor() + offset,
        customer: format!("****{}", 1000 + (i * 73) % 9000),
        gross: Amount::from(200 + (i * 37) % 3000),
        posted,
        store: STORES[(i % 5) as usize].to_string(),
        post_reach: posted.then_some((i * 13) % 1000),
        cashback: Some(cashback),
        status: SettlementStatus::ALL[(i % 3) as usize],
    }
}

/// Three hand-written rows followed by `TRX004..=TRX100`.
pub fn sample_transactions() -> Vec<NewTransaction> {
    let mut rows = vec![
        fixed(
            "TRX001",
            utc(2024, 6, 1, 10, 0),
            "****4321",
            1250,
            Some(234),
            "Main Branch",
            SettlementStatus::SettledMerchant,
        ),
        fixed(
            "TRX002",
            utc(2024, 5, 30, 11, 30),
            "****8765",
            850,
            None,
            "Main Branch",
            SettlementStatus::OnHold,
        ),
        fixed(
            "TRX003",
            utc(2024, 5, 22, 14, 45),
            "****1234",
            2100,
            Some(567),
            "Downtown Branch",
            SettlementStatus::SettledConsumer,
        ),
    ];

    rows.extend((4..=LAST_INDEX).map(generated));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_is_deterministic() {
        let a = sample_transactions();
        let b = sample_transactions();

        assert_eq!(a.len(), 100);
        let ids_a: Vec<_> = a.iter().map(|t| t.id.clone()).collect();
        let ids_b: Vec<_> = b.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn test_sample_ids_are_unique() {
        let rows = sample_transactions();
        let ids: HashSet<_> = rows.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), rows.len());
    }

    #[test]
    fn test_generated_row_values() {
        let row = generated(7);

        assert_eq!(row.id, "TRX007");
        assert_eq!(row.occurred_at, utc(2024, 4, 8, 16, 7));
        assert_eq!(row.customer, "****1511");
        assert_eq!(row.gross, Amount::from(459));
        assert!(row.posted);
        assert_eq!(row.store, "Uptown Branch");
        assert_eq!(row.post_reach, Some(91));
        assert_eq!(row.cashback, Some(CashbackStatus::NotRedeemed));
        assert_eq!(row.status, SettlementStatus::OnHold);
    }

    #[test]
    fn test_every_fifth_row_is_unposted() {
        let row = generated(10);

        assert!(!row.posted);
        assert_eq!(row.post_reach, None);
        assert_eq!(row.cashback, Some(CashbackStatus::NotRedeemed));
    }
}
