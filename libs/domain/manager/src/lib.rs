// [libs/domain/manager/src/lib.rs]
/*!
 * =================================================================
 * APARATO: TOLLGATE DOMAIN MANAGER (V1.0)
 * CLASIFICACIÓN: DOMAIN ORCHESTRATION (ESTRATO L4)
 * RESPONSABILIDAD: CREDIT MANAGER + RECONCILER
 * =================================================================
 */

pub mod manager;
pub mod rate_cache;
pub mod reconciler;
pub mod sufficiency;

pub use manager::CreditManager;
pub use sufficiency::Sufficiency;
