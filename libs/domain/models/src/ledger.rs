// [libs/domain/models/src/ledger.rs]
/*!
 * APARATO: LEDGER ENTRY MODEL (ESTRATO L2)
 * RESPONSABILIDAD: REGISTRO INMUTABLE DE VARIACIONES DE BALANCE
 *
 * Invariante: para cada cuenta, la secuencia de `balance_after` de sus
 * entradas es la suma acumulada de los montos firmados, comenzando en 0;
 * ninguna entrada puede producir `balance_after < 0`.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEntryKind {
    Purchase,
    Consumption,
    Refund,
    AdminAdjustment,
}

impl LedgerEntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerEntryKind::Purchase => "purchase",
            LedgerEntryKind::Consumption => "consumption",
            LedgerEntryKind::Refund => "refund",
            LedgerEntryKind::AdminAdjustment => "admin_adjustment",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "purchase" => Some(LedgerEntryKind::Purchase),
            "consumption" => Some(LedgerEntryKind::Consumption),
            "refund" => Some(LedgerEntryKind::Refund),
            "admin_adjustment" => Some(LedgerEntryKind::AdminAdjustment),
            _ => None,
        }
    }
}

/// Entrada de append-only del ledger de una cuenta.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub account_id: String,
    pub kind: LedgerEntryKind,
    /// Monto firmado en créditos (negativo para consumo/admin-debit).
    pub amount: i64,
    /// Snapshot del balance inmediatamente después de aplicar `amount`.
    pub balance_after: i64,
    pub description: String,
    pub operation: Option<String>,
    pub payment_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        account_id: impl Into<String>,
        kind: LedgerEntryKind,
        amount: i64,
        balance_after: i64,
        description: impl Into<String>,
        operation: Option<String>,
        payment_ref: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            kind,
            amount,
            balance_after,
            description: description.into(),
            operation,
            payment_ref,
            created_at: now,
        }
    }
}
