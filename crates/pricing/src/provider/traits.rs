//! Pricing provider trait definition.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::PricingError;

/// Trait for external pricing services.
///
/// Implement this trait to back the rate resolver with a different pricing
/// source. Implementations must not cache and must not rate-limit; both are
/// the resolver's responsibility.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "COINGECKO". Used for logging.
    fn id(&self) -> &'static str;

    /// Fetch the USD rate for one unit of the given currency on a date.
    ///
    /// # Arguments
    ///
    /// * `symbol_id` - The pricing service's canonical identifier
    /// * `date` - The calendar date the rate is for
    ///
    /// # Returns
    ///
    /// The rate of 1 unit of the currency in USD on that date, or a
    /// `PricingError` classifying the failure.
    async fn usd_rate(&self, symbol_id: &str, date: NaiveDate) -> Result<Decimal, PricingError>;
}
