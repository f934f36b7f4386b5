// [libs/infra/store/src/schema.rs]
/*!
 * APARATO: LEDGER STORE SCHEMA (V1.0)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3)
 * RESPONSABILIDAD: GOBERNANZA ESTRUCTURAL E IDEMPOTENCIA TOTAL
 *
 * Cinco tablas: accounts, credit_balances, payments, credit_transactions y
 * el catálogo sembrado operation_costs. Todas las sentencias son
 * `CREATE TABLE IF NOT EXISTS`, de forma que el bootstrap sea idempotente
 * entre reinicios y entre pruebas que comparten una base en memoria.
 */

use libsql::Connection;
use tracing::{debug, instrument};

use crate::errors::StoreError;

const LEDGER_TABLES: &[(&str, &str)] = &[
    ("TABLE_ACCOUNTS", r#"
        CREATE TABLE IF NOT EXISTS accounts (
            id TEXT PRIMARY KEY,
            status TEXT NOT NULL DEFAULT 'active',
            created_at TEXT NOT NULL
        );
    "#),
    ("TABLE_CREDIT_BALANCES", r#"
        CREATE TABLE IF NOT EXISTS credit_balances (
            account_id TEXT PRIMARY KEY REFERENCES accounts(id),
            balance INTEGER NOT NULL DEFAULT 0,
            total_purchased INTEGER NOT NULL DEFAULT 0,
            total_consumed INTEGER NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL
        );
    "#),
    ("TABLE_PAYMENTS", r#"
        CREATE TABLE IF NOT EXISTS payments (
            tx_id TEXT PRIMARY KEY,
            payer_account TEXT NOT NULL,
            target_account TEXT,
            amount REAL NOT NULL,
            credits_allocated INTEGER NOT NULL DEFAULT 0,
            memo TEXT,
            status TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
    "#),
    ("TABLE_CREDIT_TRANSACTIONS", r#"
        CREATE TABLE IF NOT EXISTS credit_transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            account_id TEXT NOT NULL,
            kind TEXT NOT NULL,
            amount INTEGER NOT NULL,
            balance_after INTEGER NOT NULL,
            description TEXT NOT NULL,
            operation TEXT,
            payment_ref TEXT,
            created_at TEXT NOT NULL
        );
    "#),
    ("INDEX_CREDIT_TRANSACTIONS_ACCOUNT", r#"
        CREATE INDEX IF NOT EXISTS idx_credit_transactions_account
            ON credit_transactions(account_id, id DESC);
    "#),
    ("TABLE_OPERATION_COSTS", r#"
        CREATE TABLE IF NOT EXISTS operation_costs (
            name TEXT PRIMARY KEY,
            base_cost INTEGER NOT NULL,
            category TEXT NOT NULL,
            network_class_multiplier REAL,
            size_multiplier REAL
        );
    "#),
];

#[instrument(skip(connection))]
pub async fn apply_ledger_schema(connection: &Connection) -> Result<(), StoreError> {
    for (label, statement) in LEDGER_TABLES {
        connection.execute(statement, ()).await.map_err(|e| {
            StoreError::Mapping(format!("schema step '{}' failed: {}", label, e))
        })?;
        debug!("🧱 [SCHEMA]: applied '{}'", label);
    }
    Ok(())
}
