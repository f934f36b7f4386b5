// [libs/core/pricing/src/lib.rs]
/*!
 * =================================================================
 * APARATO: TOLLGATE CORE PRICING (V1.0)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L1-CORE)
 * RESPONSABILIDAD: MOTOR DE PRECIOS PURO DEL NÚCLEO DE CRÉDITOS
 *
 * Expone la matemática de tramos (`credits_for_amount`, `amount_for_credits`)
 * y la composición de modificadores de costo (`operation_cost`), más el
 * catálogo semilla de operaciones. Sin I/O: toda persistencia vive en
 * `tollgate-infra-store`.
 * =================================================================
 */

pub mod catalog;
pub mod engine;

pub use catalog::seed_operation_costs;
pub use engine::{amount_for_credits, credits_for_amount, operation_cost};
