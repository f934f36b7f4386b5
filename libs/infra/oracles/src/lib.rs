// [libs/infra/oracles/src/lib.rs]
/*!
 * APARATO: TOLLGATE INFRA ORACLES (V1.0)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L4)
 * RESPONSABILIDAD: COLABORADORES EXTERNOS DE TASA Y CONFIRMACIÓN
 */

pub mod confirmation_oracle;
pub mod errors;
pub mod identifiers;
pub mod rate_oracle;

pub use confirmation_oracle::{ConfirmationOracle, HttpConfirmationOracle, TransactionReport, TransactionResult, Transfer};
pub use errors::OracleError;
pub use identifiers::to_oracle_transaction_id;
pub use rate_oracle::{HttpRateOracle, RateOracle};
