// [libs/infra/store/src/lib.rs]
/*!
 * =================================================================
 * APARATO: TOLLGATE INFRA STORE (V1.0)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3)
 * RESPONSABILIDAD: LEDGER STORE — DOS BACKENDS, UN CONTRATO
 *
 * Expone `LedgerStore`, `SqlLedgerStore` (libSQL durable) y
 * `MemoryLedgerStore` (efímero). `build_store` elige el backend según el
 * prefijo de `database_url`, tal como describe la configuración del núcleo.
 * =================================================================
 */

pub mod client;
pub mod errors;
pub mod memory_store;
pub mod schema;
pub mod sql_store;
pub mod store;

use std::sync::Arc;

pub use client::LedgerClient;
pub use errors::StoreError;
pub use memory_store::MemoryLedgerStore;
pub use sql_store::SqlLedgerStore;
pub use store::LedgerStore;

/// Construye el backend apropiado a partir de `database_url`: `sqlite://` y
/// `postgresql://` enrutan al backend libSQL embebido; cualquier otro valor
/// cae en el backend en memoria.
pub async fn build_store(database_url: &str) -> Result<Arc<dyn LedgerStore>, StoreError> {
    if database_url.starts_with("sqlite://") || database_url.starts_with("postgresql://") {
        let store = SqlLedgerStore::connect(database_url).await?;
        Ok(Arc::new(store))
    } else {
        Ok(Arc::new(MemoryLedgerStore::new()))
    }
}
