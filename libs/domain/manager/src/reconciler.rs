// [libs/domain/manager/src/reconciler.rs]
/*!
 * =================================================================
 * APARATO: RECONCILER (V1.0)
 * CLASIFICACIÓN: BACKGROUND INFRASTRUCTURE (ESTRATO L4)
 * RESPONSABILIDAD: VERIFICACIÓN PERIÓDICA DE PAGOS PENDIENTES
 *
 * Una sola tarea de larga vida, iniciada por el Credit Manager. Cada tick
 * tolera fallos por pago individual sin abortar el lote; nunca hay dos
 * ticks en vuelo a la vez (el temporizador se salta el siguiente disparo
 * si el anterior aún no terminó, al estar el loop bloqueado en `tick`).
 * =================================================================
 */

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::interval;
use tollgate_core_pricing::credits_for_amount;
use tollgate_domain_models::{Payment, PaymentStatus};
use tollgate_infra_oracles::TransactionResult;
use tracing::{error, info, instrument, warn};

use crate::manager::CreditManager;

const SERVER_CREDIT_TOLERANCE: f64 = 0.99;

impl CreditManager {
    /// Arranca el loop del reconciler en su propia tarea `tokio::spawn`.
    /// Debe llamarse sobre un `Arc<CreditManager>` compartido: la tarea
    /// mantiene su propio clon vivo mientras corre.
    pub async fn start_reconciler(self: &Arc<Self>) {
        let manager = self.clone();
        let stop_flag = self.stop_flag();
        let interval_ms = self.config.reconcile_interval_ms;

        let handle = tokio::spawn(async move {
            info!("🔄 [RECONCILER]: active, ticking every {}ms", interval_ms);
            let mut ticker = interval(Duration::from_millis(interval_ms));

            loop {
                ticker.tick().await;
                if stop_flag.load(Ordering::SeqCst) {
                    info!("🔄 [RECONCILER]: stop requested, exiting loop.");
                    break;
                }
                manager.reconcile_once().await;
            }
        });

        self.set_reconciler_handle(handle).await;
    }

    #[instrument(skip(self))]
    pub async fn reconcile_once(&self) {
        let pending = match self.store.list_pending_payments().await {
            Ok(payments) => payments,
            Err(e) => {
                error!("❌ [RECONCILER]: failed to list pending payments: {}", e);
                return;
            }
        };

        for payment in pending {
            if let Err(e) = self.reconcile_payment(payment).await {
                error!("❌ [RECONCILER]: tick failed for a pending payment: {}", e);
            }
        }
    }

    async fn reconcile_payment(&self, payment: Payment) -> Result<(), tollgate_domain_models::CoreError> {
        let age_seconds = Utc::now().signed_duration_since(payment.created_at).num_seconds();
        if age_seconds > self.config.max_pending_age_sec {
            self.store
                .update_payment_status(&payment.tx_id, PaymentStatus::Failed)
                .await?;
            warn!("⏳ [RECONCILER]: payment '{}' aged out after {}s", payment.tx_id, age_seconds);
            return Ok(());
        }

        let report = match self.confirmation_oracle.get_transaction(&payment.tx_id).await {
            Ok(Some(report)) => report,
            Ok(None) => {
                info!("🔎 [RECONCILER]: payment '{}' not yet visible to oracle, retrying next tick", payment.tx_id);
                return Ok(());
            }
            Err(e) => {
                warn!("⚠️ [RECONCILER]: confirmation oracle unavailable for '{}': {}", payment.tx_id, e);
                return Ok(());
            }
        };

        if report.result != TransactionResult::Success {
            self.store
                .update_payment_status(&payment.tx_id, PaymentStatus::Failed)
                .await?;
            warn!("🚫 [RECONCILER]: payment '{}' confirmed as non-success, marking FAILED", payment.tx_id);
            return Ok(());
        }

        let server_leg = report
            .transfers
            .iter()
            .find(|t| t.account == self.config.server_account_id && t.amount > 0);

        let Some(server_leg) = server_leg else {
            warn!("⚠️ [RECONCILER]: payment '{}' has no inbound leg to the server account, skipping", payment.tx_id);
            return Ok(());
        };

        let payer_candidates: Vec<_> = report
            .transfers
            .iter()
            .filter(|t| t.amount < 0 && (t.amount.unsigned_abs() as f64) >= server_leg.amount as f64 * SERVER_CREDIT_TOLERANCE)
            .collect();

        if payer_candidates.len() != 1 {
            warn!(
                "⚠️ [RECONCILER]: payment '{}' has an ambiguous transfer set ({} offsetting legs), skipping",
                payment.tx_id,
                payer_candidates.len()
            );
            return Ok(());
        }

        let billed_account = payment
            .memo
            .as_deref()
            .and_then(|memo| memo.strip_prefix("credits:"))
            .map(str::to_string)
            .unwrap_or_else(|| payer_candidates[0].account.clone());

        let native_amount = server_leg.amount as f64 * self.config.pricing.sub_unit_tick;
        let rate = self.rate_cache.rate(&self.config.network).await?;
        let usd_amount = native_amount * rate;
        let credits = credits_for_amount(usd_amount, &self.config.pricing);

        let mut confirmed = payment;
        confirmed.payer_account = billed_account;
        confirmed.status = PaymentStatus::Completed;
        confirmed.credits_allocated = credits;

        self.process_payment(confirmed).await?;
        Ok(())
    }
}
