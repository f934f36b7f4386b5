// [libs/infra/store/src/store.rs]
/*!
 * APARATO: LEDGER STORE CONTRACT (V1.0)
 * CLASIFICACIÓN: INFRASTRUCTURE BOUNDARY (ESTRATO L3)
 * RESPONSABILIDAD: SUPERFICIE MÍNIMA COMÚN A AMBOS BACKENDS
 *
 * `SqlLedgerStore` (libSQL) y `MemoryLedgerStore` implementan este mismo
 * contrato con semántica observable idéntica: serialización por cuenta,
 * balances nunca negativos, pagos únicos por identificador externo.
 */

use async_trait::async_trait;
use tollgate_domain_models::{Account, CreditBalance, LedgerEntry, LedgerEntryKind, OperationCost, Payment, PaymentStatus};

use crate::errors::StoreError;

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Crea la fila de la cuenta (y su balance cero) si está ausente; no-op
    /// en cualquier otro caso.
    async fn ensure_account(&self, account_id: &str) -> Result<Account, StoreError>;

    /// Nunca devuelve "no encontrado": una cuenta desconocida produce un
    /// balance en cero con `updated_at = now`.
    async fn get_balance(&self, account_id: &str) -> Result<CreditBalance, StoreError>;

    /// Más recientes primero.
    async fn get_history(&self, account_id: &str, limit: usize) -> Result<Vec<LedgerEntry>, StoreError>;

    async fn list_operation_costs(&self) -> Result<Vec<OperationCost>, StoreError>;

    /// Siembra el catálogo si está vacío; idempotente.
    async fn seed_operation_costs(&self, costs: &[OperationCost]) -> Result<(), StoreError>;

    async fn find_payment(&self, tx_id: &str) -> Result<Option<Payment>, StoreError>;

    /// Reconoce tanto `PENDING` como `pending` al leer.
    async fn list_pending_payments(&self) -> Result<Vec<Payment>, StoreError>;

    /// Atómico por `tx_id`. Inserta o fusiona el estado del pago según el
    /// DAG; si se provee `entry` y su monto es distinto de cero, la añade y
    /// actualiza el balance cacheado en la misma unidad de serialización.
    /// Devuelve `true` si esta llamada produjo una nueva concesión de
    /// crédito, `false` si fue un no-op exitoso sobre un pago ya terminal.
    async fn record_payment_and_ledger(
        &self,
        payment: Payment,
        entry: Option<LedgerEntry>,
    ) -> Result<bool, StoreError>;

    /// Atómico por cuenta: calcula `balance_after`, rechaza si el resultado
    /// sería negativo, y persiste la entrada junto con el balance cacheado.
    async fn append_ledger(
        &self,
        account_id: &str,
        kind: LedgerEntryKind,
        amount: i64,
        description: &str,
        operation: Option<&str>,
        payment_ref: Option<&str>,
    ) -> Result<LedgerEntry, StoreError>;

    /// Falla con `StoreError::InvalidStateTransition` si la transición no es
    /// válida según el DAG `PENDING -> COMPLETED|FAILED -> REFUNDED`.
    async fn update_payment_status(&self, tx_id: &str, status: PaymentStatus) -> Result<(), StoreError>;
}
