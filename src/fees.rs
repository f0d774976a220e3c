//! Fee schedule applied to posted transactions.

use crate::amount::Amount;
use crate::error::ConfigError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Rates charged on the gross amount of a posted transaction.
///
/// # Invariants
///
/// - Each rate lies in `[0, 1]`
/// - `advertising_rate + platform_rate <= 1`, so the net amount of any
///   record built from this schedule is never negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Share of gross charged for advertising the post.
    #[serde(default = "default_advertising_rate")]
    pub advertising_rate: Decimal,

    /// Share of gross kept by the platform.
    #[serde(default = "default_platform_rate")]
    pub platform_rate: Decimal,
}

fn default_advertising_rate() -> Decimal {
    Decimal::new(3, 2)
}

fn default_platform_rate() -> Decimal {
    Decimal::new(2, 2)
}

impl Default for FeeSchedule {
    fn default() -> Self {
        FeeSchedule {
            advertising_rate: default_advertising_rate(),
            platform_rate: default_platform_rate(),
        }
    }
}

/// Fees derived for a single transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fees {
    pub advertising: Amount,
    pub platform: Amount,
}

impl Fees {
    /// No fees, used for transactions that were never posted.
    pub const NONE: Self = Fees {
        advertising: Amount::ZERO,
        platform: Amount::ZERO,
    };

    pub fn total(&self) -> Amount {
        self.advertising + self.platform
    }
}

impl FeeSchedule {
    /// Creates a validated schedule.
    pub fn new(advertising_rate: Decimal, platform_rate: Decimal) -> Result<Self, ConfigError> {
        let schedule = FeeSchedule {
            advertising_rate,
            platform_rate,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Checks the rate bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_rate("fees.advertising_rate", self.advertising_rate)?;
        check_rate("fees.platform_rate", self.platform_rate)?;

        if self.advertising_rate + self.platform_rate > Decimal::ONE {
            return Err(ConfigError::Invalid {
                field: "fees",
                message: format!(
                    "advertising_rate + platform_rate must not exceed 1, got {}",
                    self.advertising_rate + self.platform_rate
                ),
            });
        }

        Ok(())
    }

    /// Computes the fees for a transaction. Unposted transactions pay nothing.
    pub fn fees_for(&self, gross: Amount, posted: bool) -> Fees {
        if !posted {
            return Fees::NONE;
        }

        Fees {
            advertising: gross.scaled(self.advertising_rate),
            platform: gross.scaled(self.platform_rate),
        }
    }
}

fn check_rate(field: &'static str, rate: Decimal) -> Result<(), ConfigError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(ConfigError::Invalid {
            field,
            message: format!("rate must be between 0 and 1, got {}", rate),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_rates() {
        let schedule = FeeSchedule::default();
        assert_eq!(schedule.advertising_rate, dec!(0.03));
        assert_eq!(schedule.platform_rate, dec!(0.02));
    }

    #[test]
    fn test_posted_transaction_pays_both_fees() {
        let fees = FeeSchedule::default().fees_for(Amount::from(1250), true);
        assert_eq!(fees.advertising.to_string(), "37.50");
        assert_eq!(fees.platform.to_string(), "25.00");
        assert_eq!(fees.total().to_string(), "62.50");
    }

    #[test]
    fn test_unposted_transaction_pays_nothing() {
        let fees = FeeSchedule::default().fees_for(Amount::from(1250), false);
        assert_eq!(fees, Fees::NONE);
    }

    #[test]
    fn test_rejects_out_of_range_rate() {
        assert!(FeeSchedule::new(dec!(-0.01), dec!(0.02)).is_err());
        assert!(FeeSchedule::new(dec!(0.03), dec!(1.5)).is_err());
    }

    #[test]
    fn test_rejects_rates_summing_above_one() {
        assert!(FeeSchedule::new(dec!(0.6), dec!(0.5)).is_err());
        assert!(FeeSchedule::new(dec!(0.5), dec!(0.5)).is_ok());
    }
}
