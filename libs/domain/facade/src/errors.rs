// [libs/domain/facade/src/errors.rs]
/*!
 * APARATO: OPERATION FACADE ERROR CATALOG (ESTRATO L6)
 * RESPONSABILIDAD: VOCABULARIO DE RESPUESTA HACIA LA CAPA DE TRANSPORTE
 *
 * Cada variante mapea 1:1 al `status` de la respuesta estructurada que
 * exige la capa de transporte (`unauthorized`, `forbidden`,
 * `insufficient_credits`, `failed`).
 */

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FacadeError {
    #[error("[UNAUTHORIZED]: {0}")]
    Unauthorized(String),

    #[error("[FORBIDDEN]: {0}")]
    Forbidden(String),

    #[error("[INSUFFICIENT_CREDITS]: current={current} required={required} shortfall={shortfall}")]
    InsufficientCredits {
        required: i64,
        current: i64,
        shortfall: i64,
    },

    #[error("[FAILED]: {0}")]
    Failed(String),
}

impl FacadeError {
    pub fn status(&self) -> &'static str {
        match self {
            FacadeError::Unauthorized(_) => "unauthorized",
            FacadeError::Forbidden(_) => "forbidden",
            FacadeError::InsufficientCredits { .. } => "insufficient_credits",
            FacadeError::Failed(_) => "failed",
        }
    }
}
