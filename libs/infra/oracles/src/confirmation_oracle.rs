// [libs/infra/oracles/src/confirmation_oracle.rs]
/*!
 * APARATO: CONFIRMATION ORACLE ADAPTER (V1.0)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L4)
 * RESPONSABILIDAD: CONSULTA DE ESTADO DE CONFIRMACIÓN DE TRANSACCIONES
 */

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::errors::OracleError;
use crate::identifiers::to_oracle_transaction_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionResult {
    Success,
    Failure,
    Unknown,
}

#[derive(Debug, Clone)]
pub struct Transfer {
    pub account: String,
    /// Monto firmado en la sub-unidad nativa (p.ej. tinybars); positivo
    /// hacia la cuenta, negativo desde ella.
    pub amount: i64,
}

#[derive(Debug, Clone)]
pub struct TransactionReport {
    pub result: TransactionResult,
    pub consensus_timestamp: Option<DateTime<Utc>>,
    pub transfers: Vec<Transfer>,
}

#[async_trait]
pub trait ConfirmationOracle: Send + Sync {
    /// `external_id` se le pasa en la forma interna `acct@sec.nanos`; el
    /// adaptador la convierte a la forma con guiones del oráculo.
    async fn get_transaction(&self, external_id: &str) -> Result<Option<TransactionReport>, OracleError>;
}

pub struct HttpConfirmationOracle {
    client: Client,
    base_url: String,
}

impl HttpConfirmationOracle {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .user_agent("tollgate-credit-core/1.0")
                .build()
                .expect("CRITICAL: failed to initialize confirmation oracle HTTP client"),
            base_url: base_url.into(),
        }
    }
}

#[derive(Deserialize)]
struct TransferDto {
    account: String,
    amount: i64,
}

#[derive(Deserialize)]
struct TransactionResponseDto {
    result: String,
    consensus_timestamp: Option<String>,
    transfers: Vec<TransferDto>,
}

#[async_trait]
impl ConfirmationOracle for HttpConfirmationOracle {
    #[instrument(skip(self))]
    async fn get_transaction(&self, external_id: &str) -> Result<Option<TransactionReport>, OracleError> {
        let oracle_id = to_oracle_transaction_id(external_id);
        let url = format!("{}/v1/transactions/{}", self.base_url, oracle_id);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(OracleError::Rejected(format!(
                "confirmation oracle returned status {}",
                response.status()
            )));
        }

        let decoded: TransactionResponseDto = response
            .json()
            .await
            .map_err(|e| OracleError::Malformed(e.to_string()))?;

        let result = match decoded.result.to_ascii_uppercase().as_str() {
            "SUCCESS" => TransactionResult::Success,
            "FAILURE" | "FAILED" => TransactionResult::Failure,
            _ => TransactionResult::Unknown,
        };

        let consensus_timestamp = decoded
            .consensus_timestamp
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(Some(TransactionReport {
            result,
            consensus_timestamp,
            transfers: decoded
                .transfers
                .into_iter()
                .map(|t| Transfer {
                    account: t.account,
                    amount: t.amount,
                })
                .collect(),
        }))
    }
}
