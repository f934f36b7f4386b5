// [libs/domain/manager/src/rate_cache.rs]
/*!
 * Caché de corta duración (<= 60s) de la tasa nativo -> USD. Vive junto al
 * dueño de la política de cacheo (el Credit Manager), no dentro del
 * adaptador de oráculo, que se mantiene como un shim de transporte puro.
 */

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tollgate_infra_oracles::RateOracle;
use tracing::debug;

use tollgate_domain_models::CoreError;

const RATE_CACHE_TTL_SECONDS: i64 = 60;

pub struct RateCache {
    oracle: Arc<dyn RateOracle>,
    cached: RwLock<Option<(DateTime<Utc>, f64)>>,
}

impl RateCache {
    pub fn new(oracle: Arc<dyn RateOracle>) -> Self {
        Self {
            oracle,
            cached: RwLock::new(None),
        }
    }

    pub async fn rate(&self, network: &str) -> Result<f64, CoreError> {
        {
            let cached = self.cached.read().await;
            if let Some((fetched_at, rate)) = *cached {
                if Utc::now().signed_duration_since(fetched_at).num_seconds() < RATE_CACHE_TTL_SECONDS {
                    return Ok(rate);
                }
            }
        }

        let fresh_rate = tokio::time::timeout(StdDuration::from_secs(30), self.oracle.hbar_to_usd(network))
            .await
            .map_err(|_| CoreError::OracleUnavailable("rate oracle timed out".into()))?
            .map_err(|e| CoreError::OracleUnavailable(e.to_string()))?;

        let mut cached = self.cached.write().await;
        *cached = Some((Utc::now(), fresh_rate));
        debug!("💱 [RATE_CACHE]: refreshed native->usd rate to {}", fresh_rate);
        Ok(fresh_rate)
    }
}
