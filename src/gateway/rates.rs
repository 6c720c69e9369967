use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Fixed base currency the public API quotes against.
pub const BASE_CURRENCY: &str = "BRL";

/// Currency set shown on the dashboard ticker.
pub const DEFAULT_CODES: [&str; 4] = ["USD", "EUR", "GBP", "BTC"];

const DEFAULT_BASE_URL: &str = "https://economia.awesomeapi.com.br/json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Rate request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Malformed rate response: {0}")]
    InvalidResponse(String),
}

/// One quote from the API. The endpoint returns every numeric field as a
/// string; only the bid price is used.
#[derive(Debug, Deserialize)]
struct Quote {
    bid: String,
}

/// Current exchange rates against the base currency. A code missing from
/// the table means "data not yet available", never a fatal condition.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    rates: HashMap<String, f64>,
}

impl RateTable {
    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Client for the AwesomeAPI currency endpoint. No retry and no caching;
/// that policy belongs to the caller if it wants one.
pub struct RateGateway {
    client: Client,
    base_url: String,
}

impl RateGateway {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the gateway at a different endpoint (used by tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Fetch current rates for the given codes against [`BASE_CURRENCY`].
    ///
    /// The endpoint takes comma-separated pairs ("USD-BRL,EUR-BRL") and
    /// keys the response by concatenated pair code ("USDBRL"). Codes the
    /// response does not carry are simply absent from the table.
    pub async fn fetch_rates(&self, codes: &[&str]) -> Result<RateTable, GatewayError> {
        let pairs = codes
            .iter()
            .map(|code| format!("{}-{}", code, BASE_CURRENCY))
            .collect::<Vec<_>>()
            .join(",");
        let url = format!("{}/last/{}", self.base_url, pairs);

        debug!(%url, "fetching exchange rates");
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let body: HashMap<String, Quote> = response.json().await?;

        let mut table = RateTable::default();
        for code in codes {
            let key = format!("{}{}", code, BASE_CURRENCY);
            let Some(quote) = body.get(&key) else {
                warn!(code, "rate missing from response");
                continue;
            };
            let bid: f64 = quote.bid.parse().map_err(|_| {
                GatewayError::InvalidResponse(format!("unparseable bid for {}: {}", code, quote.bid))
            })?;
            table.rates.insert((*code).to_string(), bid);
        }

        Ok(table)
    }
}

impl Default for RateGateway {
    fn default() -> Self {
        Self::new()
    }
}
