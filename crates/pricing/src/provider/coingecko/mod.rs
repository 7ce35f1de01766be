//! CoinGecko provider for crypto currency USD rates.
//!
//! Answers the simple-price lookup: given a canonical coin id and a date,
//! return the USD rate of one unit of the coin. The response shape is a JSON
//! object keyed by coin id, whose value is a currency-to-rate mapping:
//!
//! ```text
//! { "ethereum": { "usd": 2500.0 } }
//! ```
//!
//! Any other shape, a missing `usd` entry, or a non-success status is an
//! error.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;

use crate::errors::PricingError;
use crate::provider::PriceProvider;

/// Provider ID constant
const PROVIDER_ID: &str = "COINGECKO";

/// Default API endpoint
const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Decoded simple-price response: coin id -> currency -> rate.
type PriceResponse = HashMap<String, HashMap<String, f64>>;

/// CoinGecko pricing provider.
///
/// # Example
///
/// ```ignore
/// use blockdata_pricing::CoinGeckoProvider;
///
/// let provider = CoinGeckoProvider::new("your_api_key".to_string());
/// ```
pub struct CoinGeckoProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl CoinGeckoProvider {
    /// Create a new CoinGecko provider with the given API key.
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the API endpoint. Used to point the provider at a stub.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn price_url(&self, symbol_id: &str, date: NaiveDate) -> String {
        format!(
            "{}/simple/price?ids={}&vs_currencies=usd&date={}",
            self.base_url,
            symbol_id,
            date.format("%Y-%m-%d")
        )
    }
}

/// Extract the usd rate for `symbol_id` from a decoded response.
fn rate_from_response(response: &PriceResponse, symbol_id: &str) -> Result<Decimal, PricingError> {
    let rate = response
        .get(symbol_id)
        .and_then(|rates| rates.get("usd"))
        .ok_or_else(|| PricingError::MissingUsdRate {
            id: symbol_id.to_string(),
        })?;

    Decimal::try_from(*rate).map_err(|_| PricingError::InvalidRate {
        id: symbol_id.to_string(),
        value: *rate,
    })
}

#[async_trait]
impl PriceProvider for CoinGeckoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn usd_rate(&self, symbol_id: &str, date: NaiveDate) -> Result<Decimal, PricingError> {
        let url = self.price_url(symbol_id, date);

        let response = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .header("x-cg-api-key", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PricingError::UnexpectedStatus {
                status: response.status(),
            });
        }

        let decoded: PriceResponse = response.json().await?;
        let rate = rate_from_response(&decoded, symbol_id)?;

        log::debug!(
            "Pricing service call succeeded | Symbol-Date: {} - {}",
            symbol_id,
            date
        );

        Ok(rate)
    }
}
