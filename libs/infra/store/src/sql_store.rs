// [libs/infra/store/src/sql_store.rs]
/*!
 * APARATO: SQL LEDGER STORE (V1.0 - libSQL)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: BACKEND DURABLE DEL LEDGER STORE
 *
 * Serializa mutaciones por cuenta con un candado `tokio::sync::Mutex`
 * dedicado por `account_id` (emulando un SELECT ... FOR UPDATE sobre un
 * motor que no soporta bloqueo de filas nativo en modo embebido), y ejecuta
 * cada operación mutadora dentro de una transacción libSQL para que la fila
 * de payment, la entrada de ledger y el balance cacheado avancen juntos o
 * ninguno lo haga.
 */

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::params;
use tokio::sync::Mutex;
use tollgate_domain_models::{
    Account, AccountStatus, CreditBalance, LedgerEntry, LedgerEntryKind, OperationCost, Payment,
    PaymentStatus,
};
use tracing::{info, instrument, warn};

use crate::client::LedgerClient;
use crate::errors::StoreError;
use crate::store::LedgerStore;

pub struct SqlLedgerStore {
    client: LedgerClient,
    account_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SqlLedgerStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let client = LedgerClient::connect(database_url).await?;
        Ok(Self {
            client,
            account_locks: Mutex::new(HashMap::new()),
        })
    }

    async fn lock_for(&self, account_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.account_locks.lock().await;
        locks
            .entry(account_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn ensure_account_row(
        connection: &libsql::Connection,
        account_id: &str,
    ) -> Result<Account, StoreError> {
        let now = Utc::now();
        connection
            .execute(
                "INSERT INTO accounts (id, status, created_at) VALUES (?1, 'active', ?2)
                 ON CONFLICT(id) DO NOTHING",
                params![account_id, now.to_rfc3339()],
            )
            .await?;
        connection
            .execute(
                "INSERT INTO credit_balances (account_id, balance, total_purchased, total_consumed, updated_at)
                 VALUES (?1, 0, 0, 0, ?2)
                 ON CONFLICT(account_id) DO NOTHING",
                params![account_id, now.to_rfc3339()],
            )
            .await?;

        Ok(Account {
            id: account_id.to_string(),
            status: AccountStatus::Active,
            created_at: now,
        })
    }

    async fn balance_row(
        connection: &libsql::Connection,
        account_id: &str,
    ) -> Result<CreditBalance, StoreError> {
        let mut rows = connection
            .query(
                "SELECT balance, total_purchased, total_consumed, updated_at
                 FROM credit_balances WHERE account_id = ?1",
                params![account_id],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(CreditBalance {
                account_id: account_id.to_string(),
                balance: row.get::<i64>(0)?,
                total_purchased: row.get::<i64>(1)?,
                total_consumed: row.get::<i64>(2)?,
                updated_at: parse_timestamp(&row.get::<String>(3)?)?,
            })
        } else {
            Ok(CreditBalance::zero(account_id, Utc::now()))
        }
    }
}

#[async_trait]
impl LedgerStore for SqlLedgerStore {
    #[instrument(skip(self))]
    async fn ensure_account(&self, account_id: &str) -> Result<Account, StoreError> {
        let account_lock = self.lock_for(account_id).await;
        let _guard = account_lock.lock().await;
        let connection = self.client.get_connection()?;
        Self::ensure_account_row(&connection, account_id).await
    }

    async fn get_balance(&self, account_id: &str) -> Result<CreditBalance, StoreError> {
        let connection = self.client.get_connection()?;
        Self::balance_row(&connection, account_id).await
    }

    async fn get_history(&self, account_id: &str, limit: usize) -> Result<Vec<LedgerEntry>, StoreError> {
        let connection = self.client.get_connection()?;
        let mut rows = connection
            .query(
                "SELECT account_id, kind, amount, balance_after, description, operation, payment_ref, created_at
                 FROM credit_transactions WHERE account_id = ?1
                 ORDER BY id DESC LIMIT ?2",
                params![account_id, limit as i64],
            )
            .await?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_ledger_entry(&row)?);
        }
        Ok(entries)
    }

    async fn list_operation_costs(&self) -> Result<Vec<OperationCost>, StoreError> {
        let connection = self.client.get_connection()?;
        let mut rows = connection
            .query(
                "SELECT name, base_cost, category, network_class_multiplier, size_multiplier
                 FROM operation_costs",
                (),
            )
            .await?;

        let mut costs = Vec::new();
        while let Some(row) = rows.next().await? {
            costs.push(OperationCost {
                name: row.get::<String>(0)?,
                base_cost: row.get::<i64>(1)?,
                category: row.get::<String>(2)?,
                network_class_multiplier: row.get::<Option<f64>>(3)?,
                size_multiplier: row.get::<Option<f64>>(4)?,
            });
        }
        Ok(costs)
    }

    #[instrument(skip(self, costs))]
    async fn seed_operation_costs(&self, costs: &[OperationCost]) -> Result<(), StoreError> {
        let connection = self.client.get_connection()?;
        for cost in costs {
            connection
                .execute(
                    "INSERT INTO operation_costs (name, base_cost, category, network_class_multiplier, size_multiplier)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(name) DO NOTHING",
                    params![
                        cost.name.clone(),
                        cost.base_cost,
                        cost.category.clone(),
                        cost.network_class_multiplier,
                        cost.size_multiplier
                    ],
                )
                .await?;
        }
        info!("🌱 [LEDGER_STORE_SQL]: seeded {} operation costs", costs.len());
        Ok(())
    }

    async fn find_payment(&self, tx_id: &str) -> Result<Option<Payment>, StoreError> {
        let connection = self.client.get_connection()?;
        let mut rows = connection
            .query(
                "SELECT tx_id, payer_account, target_account, amount, credits_allocated, memo, status, created_at, updated_at
                 FROM payments WHERE tx_id = ?1",
                params![tx_id],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(row_to_payment(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_pending_payments(&self) -> Result<Vec<Payment>, StoreError> {
        let connection = self.client.get_connection()?;
        let mut rows = connection
            .query(
                "SELECT tx_id, payer_account, target_account, amount, credits_allocated, memo, status, created_at, updated_at
                 FROM payments WHERE UPPER(status) = 'PENDING'",
                (),
            )
            .await?;

        let mut payments = Vec::new();
        while let Some(row) = rows.next().await? {
            payments.push(row_to_payment(&row)?);
        }
        Ok(payments)
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

        let connection = self.client.get_connection()?;
        let transaction = connection.transaction().await?;

        Self::ensure_account_row(&transaction, &billed_account).await?;

        let existing = {
            let mut rows = transaction
                .query("SELECT status FROM payments WHERE tx_id = ?1", params![payment.tx_id.clone()])
                .await?;
            match rows.next().await? {
                Some(row) => PaymentStatus::parse_lenient(&row.get::<String>(0)?),
                None => None,
            }
        };

        let credit_granted = match existing {
            None => {
                transaction
                    .execute(
                        "INSERT INTO payments (tx_id, payer_account, target_account, amount, credits_allocated, memo, status, created_at, updated_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                        params![
                            payment.tx_id.clone(),
                            payment.payer_account.clone(),
                            payment.target_account.clone(),
                            payment.amount,
                            payment.credits_allocated,
                            payment.memo.clone(),
                            payment.status.as_canonical_str(),
                            payment.created_at.to_rfc3339(),
                            payment.updated_at.to_rfc3339()
                        ],
                    )
                    .await?;
                payment.status.is_terminal() && entry.is_some()
            }
            Some(PaymentStatus::Completed) => {
                info!(
                    "🔁 [LEDGER_STORE_SQL]: duplicate payment '{}' already completed, no-op.",
                    payment.tx_id
                );
                transaction.commit().await?;
                return Ok(false);
            }
            Some(PaymentStatus::Pending) if payment.status == PaymentStatus::Completed => {
                transaction
                    .execute(
                        "UPDATE payments SET status = ?2, credits_allocated = ?3, updated_at = ?4 WHERE tx_id = ?1",
                        params![
                            payment.tx_id.clone(),
                            PaymentStatus::Completed.as_canonical_str(),
                            payment.credits_allocated,
                            Utc::now().to_rfc3339()
                        ],
                    )
                    .await?;
                true
            }
            Some(status) => {
                warn!(
                    "⚠️ [LEDGER_STORE_SQL]: unexpected payment collision for '{}': stored={:?} incoming={:?}",
                    payment.tx_id, status, payment.status
                );
                transaction.commit().await?;
                return Ok(false);
            }
        };

        if credit_granted {
            if let Some(entry) = entry {
                if entry.amount != 0 {
                    let balance = Self::balance_row(&transaction, &billed_account).await?;
                    let new_balance_value = balance.balance + entry.amount;
                    if new_balance_value < 0 {
                        return Err(StoreError::NegativeBalance {
                            account: billed_account,
                            current: balance.balance,
                            delta: entry.amount,
                        });
                    }

                    let now = Utc::now();
                    transaction
                        .execute(
                            "INSERT INTO credit_transactions (account_id, kind, amount, balance_after, description, operation, payment_ref, created_at)
                             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                            params![
                                billed_account.clone(),
                                entry.kind.as_str(),
                                entry.amount,
                                new_balance_value,
                                entry.description.clone(),
                                entry.operation.clone(),
                                entry.payment_ref.clone(),
                                now.to_rfc3339()
                            ],
                        )
                        .await?;

                    transaction
                        .execute(
                            "UPDATE credit_balances SET balance = ?2, total_purchased = total_purchased + ?3, updated_at = ?4
                             WHERE account_id = ?1",
                            params![billed_account, new_balance_value, entry.amount.max(0), now.to_rfc3339()],
                        )
                        .await?;
                }
            }
        }

        transaction.commit().await?;
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

        let connection = self.client.get_connection()?;
        let transaction = connection.transaction().await?;

        Self::ensure_account_row(&transaction, account_id).await?;
        let balance = Self::balance_row(&transaction, account_id).await?;
        let new_balance_value = balance.balance + amount;
        if new_balance_value < 0 {
            return Err(StoreError::NegativeBalance {
                account: account_id.to_string(),
                current: balance.balance,
                delta: amount,
            });
        }

        let now = Utc::now();
        transaction
            .execute(
                "INSERT INTO credit_transactions (account_id, kind, amount, balance_after, description, operation, payment_ref, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    account_id,
                    kind.as_str(),
                    amount,
                    new_balance_value,
                    description,
                    operation,
                    payment_ref,
                    now.to_rfc3339()
                ],
            )
            .await?;

        let consumed_delta = if matches!(kind, LedgerEntryKind::Consumption) { amount.unsigned_abs() as i64 } else { 0 };
        let purchased_delta = if matches!(kind, LedgerEntryKind::Purchase) { amount.max(0) } else { 0 };

        transaction
            .execute(
                "UPDATE credit_balances
                 SET balance = ?2, total_purchased = total_purchased + ?3, total_consumed = total_consumed + ?4, updated_at = ?5
                 WHERE account_id = ?1",
                params![account_id, new_balance_value, purchased_delta, consumed_delta, now.to_rfc3339()],
            )
            .await?;

        transaction.commit().await?;

        Ok(LedgerEntry::new(
            account_id.to_string(),
            kind,
            amount,
            new_balance_value,
            description.to_string(),
            operation.map(str::to_string),
            payment_ref.map(str::to_string),
            now,
        ))
    }

    #[instrument(skip(self))]
    async fn update_payment_status(&self, tx_id: &str, status: PaymentStatus) -> Result<(), StoreError> {
        let connection = self.client.get_connection()?;
        let mut rows = connection
            .query("SELECT status FROM payments WHERE tx_id = ?1", params![tx_id])
            .await?;

        let Some(row) = rows.next().await? else {
            return Err(StoreError::PaymentNotFound(tx_id.to_string()));
        };
        let stored_raw = row.get::<String>(0)?;
        let stored = PaymentStatus::parse_lenient(&stored_raw)
            .ok_or_else(|| StoreError::Mapping(format!("unrecognized stored status '{}'", stored_raw)))?;

        if !stored.can_transition_to(status) {
            return Err(StoreError::InvalidStateTransition {
                from: stored.as_canonical_str().to_string(),
                to: status.as_canonical_str().to_string(),
            });
        }

        connection
            .execute(
                "UPDATE payments SET status = ?2, updated_at = ?3 WHERE tx_id = ?1",
                params![tx_id, status.as_canonical_str(), Utc::now().to_rfc3339()],
            )
            .await?;
        Ok(())
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Mapping(format!("bad timestamp '{}': {}", raw, e)))
}

fn row_to_ledger_entry(row: &libsql::Row) -> Result<LedgerEntry, StoreError> {
    let kind_raw = row.get::<String>(1)?;
    let kind = LedgerEntryKind::parse(&kind_raw)
        .ok_or_else(|| StoreError::Mapping(format!("unrecognized ledger kind '{}'", kind_raw)))?;

    Ok(LedgerEntry {
        account_id: row.get::<String>(0)?,
        kind,
        amount: row.get::<i64>(2)?,
        balance_after: row.get::<i64>(3)?,
        description: row.get::<String>(4)?,
        operation: row.get::<Option<String>>(5)?,
        payment_ref: row.get::<Option<String>>(6)?,
        created_at: parse_timestamp(&row.get::<String>(7)?)?,
    })
}

fn row_to_payment(row: &libsql::Row) -> Result<Payment, StoreError> {
    let status_raw = row.get::<String>(6)?;
    let status = PaymentStatus::parse_lenient(&status_raw)
        .ok_or_else(|| StoreError::Mapping(format!("unrecognized payment status '{}'", status_raw)))?;

    Ok(Payment {
        tx_id: row.get::<String>(0)?,
        payer_account: row.get::<String>(1)?,
        target_account: row.get::<Option<String>>(2)?,
        amount: row.get::<f64>(3)?,
        credits_allocated: row.get::<i64>(4)?,
        memo: row.get::<Option<String>>(5)?,
        status,
        created_at: parse_timestamp(&row.get::<String>(7)?)?,
        updated_at: parse_timestamp(&row.get::<String>(8)?)?,
    })
}
