// [libs/infra/oracles/src/rate_oracle.rs]
/*!
 * APARATO: RATE ORACLE ADAPTER (V1.0)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L4)
 * RESPONSABILIDAD: TASA DE CONVERSIÓN NATIVO -> USD
 *
 * El cacheo de corta duración (<= 60s) es responsabilidad del llamador
 * (Credit Manager), no de este adaptador: el adaptador es un shim de
 * transporte puro.
 */

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::errors::OracleError;

#[async_trait]
pub trait RateOracle: Send + Sync {
    async fn hbar_to_usd(&self, network: &str) -> Result<f64, OracleError>;
}

pub struct HttpRateOracle {
    client: Client,
    base_url: String,
}

impl HttpRateOracle {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .user_agent("tollgate-credit-core/1.0")
                .build()
                .expect("CRITICAL: failed to initialize rate oracle HTTP client"),
            base_url: base_url.into(),
        }
    }
}

#[derive(Deserialize)]
struct RateResponse {
    #[serde(rename = "usd")]
    rate: f64,
}

#[async_trait]
impl RateOracle for HttpRateOracle {
    #[instrument(skip(self))]
    async fn hbar_to_usd(&self, network: &str) -> Result<f64, OracleError> {
        let url = format!("{}/v1/rate/hbar-usd?network={}", self.base_url, network);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(OracleError::Rejected(format!(
                "rate oracle returned status {}",
                response.status()
            )));
        }

        let decoded: RateResponse = response
            .json()
            .await
            .map_err(|e| OracleError::Malformed(e.to_string()))?;

        Ok(decoded.rate)
    }
}
