// [libs/domain/facade/src/lib.rs]
/*!
 * =================================================================
 * APARATO: TOLLGATE DOMAIN FACADE (V1.0)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L6)
 * RESPONSABILIDAD: OPERATION FACADE
 * =================================================================
 */

pub mod collaborator;
pub mod errors;
pub mod facade;

pub use collaborator::Collaborator;
pub use errors::FacadeError;
pub use facade::{OperationFacade, OperationResponse};
