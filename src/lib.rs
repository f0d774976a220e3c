//! # Merchant Ledger
//!
//! The transaction ledger behind a merchant dashboard: an immutable set of
//! payment records, a composable filter pipeline and a CSV report export.
//!
//! ## Design Principles
//!
//! - **Exact money**: amounts use `rust_decimal`; rounding to 2 places only
//!   happens when formatting
//! - **Derived fees**: advertising and platform fees come from a configurable
//!   [`FeeSchedule`], never from input rows
//! - **Pure views**: a view depends only on the records, the [`ViewParams`]
//!   and a pinned [`Clock`]
//! - **Deterministic output**: most recent first, ties broken by id
//!
//! ## Example
//!
//! ```no_run
//! use chrono::Utc;
//! use merchant_ledger::{export, Clock, FeeSchedule, Ledger, ViewParams};
//!
//! let ledger = Ledger::with_sample(FeeSchedule::default());
//! let visible = ledger
//!     .view(&ViewParams::default(), &Clock::at(Utc::now()))
//!     .unwrap();
//! export::write_csv(std::io::stdout(), visible).unwrap();
//! ```

pub mod amount;
pub mod config;
pub mod error;
pub mod export;
pub mod fees;
pub mod ledger;
pub mod sample;
pub mod transaction;
pub mod view;

pub use amount::Amount;
pub use config::Config;
pub use error::{ConfigError, LedgerError, Result};
pub use fees::{FeeSchedule, Fees};
pub use ledger::{Ledger, LoadReport};
pub use transaction::{
    parse_timestamp, CashbackStatus, Chip, NewTransaction, SettlementStatus, Tone,
    TransactionRecord,
};
pub use view::{visible_set, Clock, Selection, TimeRange, ViewParams, ViewTotals};
