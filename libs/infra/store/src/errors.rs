// [libs/infra/store/src/errors.rs]
/*!
 * APARATO: LEDGER STORE ERROR CATALOG (V1.0)
 * CLASIFICACIÓN: INFRASTRUCTURE CORE (ESTRATO L3)
 * RESPONSABILIDAD: CATALOGACIÓN SEMÁNTICA DE FALLOS DE PERSISTENCIA
 *
 * Local a esta librería. `From<StoreError> for CoreError` también vive aquí
 * (no en `tollgate-domain-models`, que no conoce este crate): es válido bajo
 * las reglas de coherencia porque `StoreError` es el tipo local que aparece
 * en la posición de parámetro de `From`.
 */

use thiserror::Error;
use tollgate_domain_models::CoreError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("[STORE_CONN_FAULT]: DATABASE_UPLINK_SEVERED -> {0}")]
    Connection(String),

    #[error("[STORE_QUERY_FAULT]: SQL_QUERY_REJECTED -> {0}")]
    Query(#[from] libsql::Error),

    #[error("[STORE_MAPPING_FAULT]: ROW_DECODE_VIOLATION -> {0}")]
    Mapping(String),

    #[error("[STORE_FAULT]: ACCOUNT_NOT_FOUND -> {0}")]
    AccountNotFound(String),

    #[error("[STORE_FAULT]: PAYMENT_NOT_FOUND -> {0}")]
    PaymentNotFound(String),

    #[error("[STORE_FAULT]: INVALID_STATE_TRANSITION -> {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("[STORE_FAULT]: BALANCE_WOULD_GO_NEGATIVE -> account={account} current={current} delta={delta}")]
    NegativeBalance {
        account: String,
        current: i64,
        delta: i64,
    },
}

impl From<StoreError> for CoreError {
    fn from(error: StoreError) -> Self {
        CoreError::store(error.to_string())
    }
}
