// [libs/infra/store/src/memory_store.rs]
/*!
 * APARATO: MEMORY LEDGER STORE (V1.0)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: BACKEND EFÍMERO PARA PRUEBAS Y DESPLIEGUES SIN SQL
 *
 * Serialización por cuenta vía un mapa de `tokio::sync::Mutex<()>` dedicado,
 * adquirido antes de tocar el estado compartido. El estado en sí vive detrás
 * de un único `Mutex` interno; el candado por cuenta es lo que garantiza que
 * dos escrituras concurrentes sobre la misma cuenta jamás se entrelacen,
 * exactamente como exige el contrato de concurrencia del store.
 */

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tollgate_domain_models::{
    Account, CreditBalance, LedgerEntry, LedgerEntryKind, OperationCost, Payment, PaymentStatus,
};
use tracing::{info, instrument, warn};

use crate::errors::StoreError;
use crate::store::LedgerStore;

#[derive(Default)]
struct MemoryState {
    accounts: HashMap<String, Account>,
    balances: HashMap<String, CreditBalance>,
    ledger: HashMap<String, Vec<LedgerEntry>>,
    payments: HashMap<String, Payment>,
    operation_costs: HashMap<String, OperationCost>,
}

pub struct MemoryLedgerStore {
    state: Mutex<MemoryState>,
    account_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Default for MemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            account_locks: Mutex::new(HashMap::new()),
        }
    }

    async fn lock_for(&self, account_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.account_locks.lock().await;
        locks
            .entry(account_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn ensure_account_locked(state: &mut MemoryState, account_id: &str) -> Account {
        state
            .accounts
            .entry(account_id.to_string())
            .or_insert_with(|| Account::new(account_id.to_string(), Utc::now()))
            .clone()
    }

    fn balance_locked(state: &mut MemoryState, account_id: &str) -> CreditBalance {
        state
            .balances
            .entry(account_id.to_string())
            .or_insert_with(|| CreditBalance::zero(account_id.to_string(), Utc::now()))
            .clone()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    #[instrument(skip(self))]
    async fn ensure_account(&self, account_id: &str) -> Result<Account, StoreError> {
        let account_lock = self.lock_for(account_id).await;
        let _guard = account_lock.lock().await;
        let mut state = self.state.lock().await;
        Ok(Self::ensure_account_locked(&mut state, account_id))
    }

    async fn get_balance(&self, account_id: &str) -> Result<CreditBalance, StoreError> {
        let mut state = self.state.lock().await;
        Ok(Self::balance_locked(&mut state, account_id))
    }

    async fn get_history(&self, account_id: &str, limit: usize) -> Result<Vec<LedgerEntry>, StoreError> {
        let state = self.state.lock().await;
        let mut entries = state.ledger.get(account_id).cloned().unwrap_or_default();
        entries.reverse();
        entries.truncate(limit);
        Ok(entries)
    }

    async fn list_operation_costs(&self) -> Result<Vec<OperationCost>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.operation_costs.values().cloned().collect())
    }

    async fn seed_operation_costs(&self, costs: &[OperationCost]) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if !state.operation_costs.is_empty() {
            return Ok(());
        }
        for cost in costs {
            state.operation_costs.insert(cost.name.clone(), cost.clone());
        }
        info!("🌱 [LEDGER_STORE_MEM]: seeded {} operation costs", costs.len());
        Ok(())
    }

    async fn find_payment(&self, tx_id: &str) -> Result<Option<Payment>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.payments.get(tx_id).cloned())
    }

    async fn list_pending_payments(&self) -> Result<Vec<Payment>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .payments
            .values()
            .filter(|p| p.status == PaymentStatus::Pending)
            .cloned()
            .collect())
    }

    #[instrument(skip(self, payment, entry))]
    async fn record_payment_and_ledger(
        &self,
        payment: Payment,
        entry: Option<LedgerEntry>,
    ) -> Result<bool, StoreError> {
        let billed_account = payment.billed_account().to_string();
        let account_lock = self.lock_for(&billed_account).await;
        let _guard = account_lock.lock().await;
        let mut state = self.state.lock().await;

        Self::ensure_account_locked(&mut state, &billed_account);

        let existing = state.payments.get(&payment.tx_id).cloned();
        let credit_granted = match &existing {
            None => {
                state.payments.insert(payment.tx_id.clone(), payment.clone());
                payment.status.is_terminal() && entry.is_some()
            }
            Some(stored) if stored.status == PaymentStatus::Completed => {
                info!(
                    "🔁 [LEDGER_STORE_MEM]: duplicate payment '{}' already completed, no-op.",
                    payment.tx_id
                );
                false
            }
            Some(stored) if stored.status == PaymentStatus::Pending && payment.status == PaymentStatus::Completed => {
                let mut upgraded = stored.clone();
                upgraded.status = PaymentStatus::Completed;
                upgraded.credits_allocated = payment.credits_allocated;
                upgraded.updated_at = Utc::now();
                state.payments.insert(payment.tx_id.clone(), upgraded);
                true
            }
            Some(stored) => {
                warn!(
                    "⚠️ [LEDGER_STORE_MEM]: unexpected payment collision for '{}': stored={:?} incoming={:?}",
                    payment.tx_id, stored.status, payment.status
                );
                return Ok(false);
            }
        };

        if credit_granted {
            if let Some(entry) = entry {
                if entry.amount != 0 {
                    let balance = Self::balance_locked(&mut state, &billed_account);
                    let new_balance_value = balance.balance + entry.amount;
                    if new_balance_value < 0 {
                        return Err(StoreError::NegativeBalance {
                            account: billed_account,
                            current: balance.balance,
                            delta: entry.amount,
                        });
                    }
                    let mut stamped_entry = entry;
                    stamped_entry.balance_after = new_balance_value;
                    state
                        .ledger
                        .entry(billed_account.clone())
                        .or_default()
                        .push(stamped_entry);

                    let updated = CreditBalance {
                        account_id: billed_account.clone(),
                        balance: new_balance_value,
                        total_purchased: balance.total_purchased + entry.amount.max(0),
                        total_consumed: balance.total_consumed,
                        updated_at: Utc::now(),
                    };
                    state.balances.insert(billed_account, updated);
                }
            }
        }

        Ok(credit_granted)
    }

    #[instrument(skip(self))]
    async fn append_ledger(
        &self,
        account_id: &str,
        kind: LedgerEntryKind,
        amount: i64,
        description: &str,
        operation: Option<&str>,
        payment_ref: Option<&str>,
    ) -> Result<LedgerEntry, StoreError> {
        let account_lock = self.lock_for(account_id).await;
        let _guard = account_lock.lock().await;
        let mut state = self.state.lock().await;

        Self::ensure_account_locked(&mut state, account_id);
        let balance = Self::balance_locked(&mut state, account_id);
        let new_balance_value = balance.balance + amount;
        if new_balance_value < 0 {
            return Err(StoreError::NegativeBalance {
                account: account_id.to_string(),
                current: balance.balance,
                delta: amount,
            });
        }

        let now = Utc::now();
        let entry = LedgerEntry::new(
            account_id.to_string(),
            kind,
            amount,
            new_balance_value,
            description.to_string(),
            operation.map(str::to_string),
            payment_ref.map(str::to_string),
            now,
        );

        state.ledger.entry(account_id.to_string()).or_default().push(entry.clone());

        let updated = CreditBalance {
            account_id: account_id.to_string(),
            balance: new_balance_value,
            total_purchased: balance.total_purchased + if matches!(kind, LedgerEntryKind::Purchase) { amount.max(0) } else { 0 },
            total_consumed: balance.total_consumed + if matches!(kind, LedgerEntryKind::Consumption) { amount.unsigned_abs() as i64 } else { 0 },
            updated_at: now,
        };
        state.balances.insert(account_id.to_string(), updated);

        Ok(entry)
    }

    #[instrument(skip(self))]
    async fn update_payment_status(&self, tx_id: &str, status: PaymentStatus) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let stored = state
            .payments
            .get(tx_id)
            .ok_or_else(|| StoreError::PaymentNotFound(tx_id.to_string()))?
            .clone();

        if !stored.status.can_transition_to(status) {
            return Err(StoreError::InvalidStateTransition {
                from: stored.status.as_canonical_str().to_string(),
                to: status.as_canonical_str().to_string(),
            });
        }

        let mut updated = stored;
        updated.status = status;
        updated.updated_at = Utc::now();
        state.payments.insert(tx_id.to_string(), updated);
        Ok(())
    }
}
