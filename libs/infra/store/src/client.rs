// [libs/infra/store/src/client.rs]
/*!
 * APARATO: LEDGER DATABASE CLIENT (V1.0)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3)
 * RESPONSABILIDAD: GESTIÓN DE ENLACES Y BOOTSTRAP DE ESQUEMA
 *
 * Envuelve un `libsql::Database`. En modo memoria ancla una conexión viva
 * para que SQLite no purgue las tablas entre adquisiciones de conexión.
 */

use std::sync::Arc;

use libsql::{Builder, Connection, Database};
use tracing::{error, info, instrument};

use crate::errors::StoreError;
use crate::schema::apply_ledger_schema;

#[derive(Clone)]
pub struct LedgerClient {
    driver: Arc<Database>,
    _memory_anchor: Option<Arc<Connection>>,
}

impl LedgerClient {
    /// Conecta según el prefijo de `database_url`: `sqlite://`/`postgresql://`
    /// enrutan al backend libSQL local (ver nota en DESIGN.md sobre por qué
    /// ambos prefijos comparten adaptador); cualquier otra cosa es
    /// responsabilidad del llamador, que debe construir `MemoryLedgerStore`
    /// en su lugar.
    #[instrument]
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        if database_url.is_empty() {
            return Err(StoreError::Connection("DATABASE_URL_EMPTY".into()));
        }

        info!("🔌 [LEDGER_STORE]: opening libSQL link to [{}]", database_url);

        let local_path = normalize_local_path(database_url);
        let driver = Builder::new_local(&local_path)
            .build()
            .await
            .map_err(|e| StoreError::Connection(format!("DRIVER_IGNITION_FAILURE: {}", e)))?;

        let shared_driver = Arc::new(driver);
        let is_memory = local_path.contains(":memory:");

        let anchor = if is_memory {
            let anchor_conn = shared_driver
                .connect()
                .map_err(|e| StoreError::Connection(format!("ANCHOR_FAULT: {}", e)))?;
            apply_ledger_schema(&anchor_conn).await?;
            info!("⚓ [LEDGER_STORE]: memory strata anchored.");
            Some(Arc::new(anchor_conn))
        } else {
            let bootstrap_conn = shared_driver
                .connect()
                .map_err(|e| StoreError::Connection(format!("BOOTSTRAP_LINK_FAULT: {}", e)))?;
            apply_ledger_schema(&bootstrap_conn).await?;
            None
        };

        Ok(Self {
            driver: shared_driver,
            _memory_anchor: anchor,
        })
    }

    pub fn get_connection(&self) -> Result<Connection, StoreError> {
        self.driver.connect().map_err(|e| {
            error!("⚠️ [LEDGER_STORE]: connection allocation failed: {}", e);
            StoreError::Connection(e.to_string())
        })
    }
}

/// `sqlite:///path/to/file.db` y `postgresql://...` se tratan como el mismo
/// backend libSQL embebido (no hay driver de red Postgres real en este
/// workspace); `:memory:` y cualquier URL vacía de esquema caen en memoria.
fn normalize_local_path(database_url: &str) -> String {
    if let Some(path) = database_url.strip_prefix("sqlite://") {
        path.to_string()
    } else if database_url.starts_with("postgresql://") {
        ":memory:".to_string()
    } else {
        database_url.to_string()
    }
}
