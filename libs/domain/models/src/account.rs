// [libs/domain/models/src/account.rs]
/*!
 * APARATO: ACCOUNT & BALANCE MODELS (ESTRATO L2)
 * RESPONSABILIDAD: IDENTIDAD DE CUENTA Y SNAPSHOT DE SALDO DE CRÉDITOS
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Clasificación administrativa de una cuenta. Sólo afecta vistas de admin;
/// nunca bloquea la mutación del balance por sí sola.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Suspended,
    Blocked,
}

impl Default for AccountStatus {
    fn default() -> Self {
        AccountStatus::Active
    }
}

/// Cuenta identificada por un id externo opaco (cuenta de blockchain).
/// Se crea en la primera referencia; nunca se elimina.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            status: AccountStatus::Active,
            created_at: now,
        }
    }
}

/// Snapshot de saldo de créditos de una cuenta.
///
/// Invariante: `balance = total_purchased - total_consumed + refunds -
/// admin_adjustments_negative + admin_adjustments_positive`. El store es el
/// único autorizado a mutar estos campos; este tipo es una vista de lectura.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditBalance {
    pub account_id: String,
    pub balance: i64,
    pub total_purchased: i64,
    pub total_consumed: i64,
    pub updated_at: DateTime<Utc>,
}

impl CreditBalance {
    /// Balance de cero para una cuenta aún no referenciada. Nunca `null`.
    pub fn zero(account_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            account_id: account_id.into(),
            balance: 0,
            total_purchased: 0,
            total_consumed: 0,
            updated_at: now,
        }
    }
}
