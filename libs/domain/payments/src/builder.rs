// [libs/domain/payments/src/builder.rs]
/*!
 * =================================================================
 * APARATO: PAYMENT BUILDER (V1.0)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L5)
 * RESPONSABILIDAD: CONSTRUCCIÓN DE PAYLOADS DE TRANSFERENCIA SIN FIRMAR
 *
 * No persiste estado parcial: si la validación, el oráculo de tasa o el
 * store fallan, no queda ningún pago PENDING huérfano (la única escritura
 * ocurre al final, vía el Credit Manager, y es la intencionada).
 * =================================================================
 */

use base64::Engine;
use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use tollgate_core_pricing::credits_for_amount;
use tollgate_domain_manager::CreditManager;
use tollgate_domain_models::{CoreError, Payment};

/// Resultado de `build_payment`: el payload sin firmar, el identificador de
/// transacción asignado y los créditos esperados a la tasa actual
/// (indicativos; la confirmación vía Reconciler recalcula con autoridad).
#[derive(Debug, Clone)]
pub struct UnsignedPaymentPayload {
    pub tx_id: String,
    pub payload_base64: String,
    pub amount: f64,
    pub expected_credits: i64,
}

pub struct PaymentBuilder<'a> {
    manager: &'a CreditManager,
    server_account_id: String,
    min_payment: f64,
    max_payment: f64,
}

impl<'a> PaymentBuilder<'a> {
    pub fn new(manager: &'a CreditManager, server_account_id: impl Into<String>, min_payment: f64, max_payment: f64) -> Self {
        Self {
            manager,
            server_account_id: server_account_id.into(),
            min_payment,
            max_payment,
        }
    }

    #[instrument(skip(self, memo))]
    pub async fn build_payment(
        &self,
        payer: &str,
        amount: f64,
        memo: Option<String>,
    ) -> Result<UnsignedPaymentPayload, CoreError> {
        if amount < self.min_payment || amount > self.max_payment {
            return Err(CoreError::validation(format!(
                "amount {} outside allowed range [{}, {}]",
                amount, self.min_payment, self.max_payment
            )));
        }

        let tx_id = Uuid::new_v4().to_string();
        let resolved_memo = memo.unwrap_or_else(|| format!("credits:{}", payer));

        let payload_json = serde_json::json!({
            "from": payer,
            "to": self.server_account_id,
            "amount": amount,
            "memo": resolved_memo,
        });
        let payload_base64 = base64::engine::general_purpose::STANDARD.encode(payload_json.to_string());

        let rate = self.manager.current_rate().await?;
        let expected_credits = credits_for_amount(amount * rate, self.manager.pricing());

        let pending = Payment::new_pending(tx_id.clone(), payer, None, amount, Some(resolved_memo), Utc::now());
        self.manager.process_payment(pending).await?;

        info!(
            "🧾 [PAYMENT_BUILDER]: built pending payment '{}' for payer '{}', expected_credits={}",
            tx_id, payer, expected_credits
        );

        Ok(UnsignedPaymentPayload {
            tx_id,
            payload_base64,
            amount,
            expected_credits,
        })
    }
}
