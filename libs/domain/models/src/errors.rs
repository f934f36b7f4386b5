// [libs/domain/models/src/errors.rs]
/*!
 * =================================================================
 * APARATO: CORE ERROR CATALOG (ESTRATO L2)
 * RESPONSABILIDAD: CATALOGACIÓN SEMÁNTICA DE FALLOS DE DOMINIO
 *
 * Vocabulario de errores compartido por todas las capas del núcleo de
 * medición de créditos. Las capas de infraestructura (store, oracles)
 * mantienen su propia taxonomía local y se traducen explícitamente a
 * `CoreError` en el límite del Credit Manager, evitando conversiones
 * automáticas entre tipos foráneos.
 * =================================================================
 */

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Entradas inválidas: montos no positivos, pagos fuera de rango,
    /// identificadores de cuenta malformados. No hay cambio de estado.
    #[error("[VALIDATION_FAULT]: {0}")]
    Validation(String),

    /// Transición de estado fuera del DAG permitido (pago, ledger).
    #[error("[INVALID_STATE_TRANSITION]: {0}")]
    InvalidStateTransition(String),

    /// Balance insuficiente para cubrir el costo de una operación.
    #[error("[INSUFFICIENT_CREDITS]: current={current} required={required} shortfall={shortfall}")]
    InsufficientCredits {
        current: i64,
        required: i64,
        shortfall: i64,
    },

    /// Pago duplicado cuyo registro existente no es compatible con el terminal esperado.
    #[error("[DUPLICATE_PAYMENT]: {0}")]
    DuplicatePayment(String),

    /// Fallo de persistencia propagado desde la capa de infraestructura.
    #[error("[STORE_FAULT]: {0}")]
    Store(String),

    /// El oráculo externo (tasa o confirmación) no respondió a tiempo o falló.
    /// Nunca se propaga fuera del Reconciler: se registra y se reintenta.
    #[error("[ORACLE_UNAVAILABLE]: {0}")]
    OracleUnavailable(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }
}
