//! Transaction models for CSV ingestion and the immutable ledger record.

use crate::amount::Amount;
use crate::error::{LedgerError, Result};
use crate::fees::FeeSchedule;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// Timestamp layouts accepted besides RFC 3339. Naive values are read as UTC.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parses `YYYY-MM-DD HH:MM[:SS]` (UTC) or an RFC 3339 timestamp.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| LedgerError::InvalidTimestamp(trimmed.to_string()))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_timestamp(&s).map_err(serde::de::Error::custom)
}

/// Display tone of a status chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Info,
    Neutral,
}

/// Presentation metadata attached to a status variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chip {
    pub label: &'static str,
    pub tone: Tone,
    pub icon: &'static str,
}

/// Terminal settlement state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    /// Funds returned to the consumer.
    SettledConsumer,

    /// Funds held pending review.
    OnHold,

    /// Funds paid out to the merchant.
    SettledMerchant,
}

impl SettlementStatus {
    pub const ALL: [SettlementStatus; 3] = [
        SettlementStatus::SettledConsumer,
        SettlementStatus::OnHold,
        SettlementStatus::SettledMerchant,
    ];

    /// Machine name, as used in CSV input and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementStatus::SettledConsumer => "settled_consumer",
            SettlementStatus::OnHold => "on_hold",
            SettlementStatus::SettledMerchant => "settled_merchant",
        }
    }

    pub fn chip(&self) -> Chip {
        match self {
            SettlementStatus::SettledConsumer => Chip {
                label: "Settled to consumer",
                tone: Tone::Success,
                icon: "check_circle",
            },
            SettlementStatus::OnHold => Chip {
                label: "On Hold",
                tone: Tone::Warning,
                icon: "warning_amber",
            },
            SettlementStatus::SettledMerchant => Chip {
                label: "Settled to merchant",
                tone: Tone::Info,
                icon: "local_shipping",
            },
        }
    }

    pub fn label(&self) -> &'static str {
        self.chip().label
    }
}

impl FromStr for SettlementStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        SettlementStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| LedgerError::InvalidFilter {
                field: "status",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the customer redeemed the cashback tied to a posted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashbackStatus {
    Redeemed,
    #[default]
    NotRedeemed,
}

impl CashbackStatus {
    pub fn chip(&self) -> Chip {
        match self {
            CashbackStatus::Redeemed => Chip {
                label: "Redeemed",
                tone: Tone::Success,
                icon: "redeem",
            },
            CashbackStatus::NotRedeemed => Chip {
                label: "Not Redeemed",
                tone: Tone::Neutral,
                icon: "redeem",
            },
        }
    }

    pub fn label(&self) -> &'static str {
        self.chip().label
    }
}

/// An unvalidated transaction as read from CSV input.
///
/// Fees are not part of the input; they are derived from the ledger's
/// [`FeeSchedule`] when the row is turned into a [`TransactionRecord`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    pub id: String,

    #[serde(deserialize_with = "deserialize_timestamp")]
    pub occurred_at: DateTime<Utc>,

    /// Masked customer identifier, e.g. `****4321`
    pub customer: String,

    pub gross: Amount,

    pub posted: bool,

    pub store: String,

    /// Absent means zero
    pub post_reach: Option<u32>,

    /// Absent means not redeemed
    pub cashback: Option<CashbackStatus>,

    pub status: SettlementStatus,
}

impl NewTransaction {
    /// Validates the row and derives its fees.
    ///
    /// Rejects rows that break the record invariants instead of repairing
    /// them: an unposted transaction must have no reach and no redeemed
    /// cashback.
    pub fn into_record(self, fees: &FeeSchedule) -> Result<TransactionRecord> {
        let id = self.id.trim().to_string();
        let invalid = |message: &str| LedgerError::InvalidRecord {
            id: id.clone(),
            message: message.to_string(),
        };

        if id.is_empty() {
            return Err(invalid("missing id"));
        }
        if self.customer.trim().is_empty() {
            return Err(invalid("missing customer"));
        }
        if self.store.trim().is_empty() {
            return Err(invalid("missing store"));
        }
        if self.gross.is_negative() {
            return Err(invalid("gross amount is negative"));
        }

        let post_reach = self.post_reach.unwrap_or(0);
        let cashback = self.cashback.unwrap_or_default();

        if !self.posted {
            if post_reach != 0 {
                return Err(invalid("unposted transaction has post reach"));
            }
            if cashback == CashbackStatus::Redeemed {
                return Err(invalid("unposted transaction has redeemed cashback"));
            }
        }

        let derived = fees.fees_for(self.gross, self.posted);

        Ok(TransactionRecord {
            customer: self.customer.trim().to_string(),
            store: self.store.trim().to_string(),
            occurred_at: self.occurred_at,
            gross: self.gross,
            posted: self.posted,
            advertising_fee: derived.advertising,
            platform_fee: derived.platform,
            cashback,
            post_reach,
            status: self.status,
            id,
        })
    }
}

/// A validated, immutable payment event.
///
/// # Invariants
///
/// - When `posted` is false: both fees are zero, `post_reach` is zero and
///   cashback is not redeemed
/// - `net_amount()` is never negative for records built from a valid
///   [`FeeSchedule`]
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    id: String,
    occurred_at: DateTime<Utc>,
    customer: String,
    gross: Amount,
    posted: bool,
    advertising_fee: Amount,
    platform_fee: Amount,
    cashback: CashbackStatus,
    store: String,
    post_reach: u32,
    status: SettlementStatus,
}

impl TransactionRecord {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn gross(&self) -> Amount {
        self.gross
    }

    pub fn is_posted(&self) -> bool {
        self.posted
    }

    pub fn advertising_fee(&self) -> Amount {
        self.advertising_fee
    }

    pub fn platform_fee(&self) -> Amount {
        self.platform_fee
    }

    pub fn cashback(&self) -> CashbackStatus {
        self.cashback
    }

    pub fn store(&self) -> &str {
        &self.store
    }

    pub fn post_reach(&self) -> u32 {
        self.post_reach
    }

    pub fn status(&self) -> SettlementStatus {
        self.status
    }

    /// Gross minus advertising and platform fees.
    pub fn net_amount(&self) -> Amount {
        self.gross - self.advertising_fee - self.platform_fee
    }
}
