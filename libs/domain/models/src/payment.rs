// [libs/domain/models/src/payment.rs]
/*!
 * APARATO: PAYMENT RECORD & STATE MACHINE (ESTRATO L2)
 * RESPONSABILIDAD: TRANSICIONES LEGALES DEL CICLO DE VIDA DE UN PAGO
 *
 * El estado de un pago forma un DAG:
 *   PENDING -> COMPLETED -> REFUNDED
 *   PENDING -> FAILED
 * Ninguna otra transición está permitida. `PaymentStatus` valida esto
 * directamente para que cada implementación del store (SQL, memoria)
 * comparta exactamente la misma regla.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    /// Forma canónica persistida (mayúsculas).
    pub fn as_canonical_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Completed => "COMPLETED",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Refunded => "REFUNDED",
        }
    }

    /// Acepta tanto la forma canónica como variantes en minúsculas
    /// (compatibilidad retroactiva exigida por la especificación).
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "PENDING" => Some(PaymentStatus::Pending),
            "COMPLETED" => Some(PaymentStatus::Completed),
            "FAILED" => Some(PaymentStatus::Failed),
            "REFUNDED" => Some(PaymentStatus::Refunded),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Completed | PaymentStatus::Failed | PaymentStatus::Refunded
        )
    }

    /// Verifica si `self -> next` es una arista legal del DAG.
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (PaymentStatus::Pending, PaymentStatus::Completed)
                | (PaymentStatus::Pending, PaymentStatus::Failed)
                | (PaymentStatus::Completed, PaymentStatus::Refunded)
        )
    }
}

/// Registro de un pago externo correlacionado con una asignación de créditos.
/// Único por `tx_id` (identificador de transacción externa).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub tx_id: String,
    pub payer_account: String,
    pub target_account: Option<String>,
    /// Monto en el token nativo (p.ej. HBAR).
    pub amount: f64,
    /// Créditos asignados en el momento de la confirmación. Sobre una fila
    /// `PENDING`, este valor es sólo indicativo: la escritura posterior de
    /// confirmación es la autoridad (ver Open Questions, SPEC_FULL §9).
    pub credits_allocated: i64,
    pub memo: Option<String>,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    pub fn new_pending(
        tx_id: impl Into<String>,
        payer_account: impl Into<String>,
        target_account: Option<String>,
        amount: f64,
        memo: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            tx_id: tx_id.into(),
            payer_account: payer_account.into(),
            target_account,
            amount,
            credits_allocated: 0,
            memo,
            status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Cuenta a facturar: el beneficiario si se indicó, de lo contrario el pagador.
    pub fn billed_account(&self) -> &str {
        self.target_account.as_deref().unwrap_or(&self.payer_account)
    }
}
