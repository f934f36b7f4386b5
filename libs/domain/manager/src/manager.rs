// [libs/domain/manager/src/manager.rs]
/*!
 * =================================================================
 * APARATO: CREDIT MANAGER (V1.0)
 * CLASIFICACIÓN: DOMAIN ORCHESTRATION (ESTRATO L4)
 * RESPONSABILIDAD: SUFICIENCIA, CONSUMO, PAGOS Y CICLO DE VIDA
 *
 * No muta filas directamente: toda mutación pasa por el `LedgerStore`
 * inyectado, que serializa por cuenta. El manager es sin estado salvo por
 * el flag de inicialización, la caché de tasa y el handle del Reconciler.
 * =================================================================
 */

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use tollgate_core_pricing::{credits_for_amount, operation_cost};
use tollgate_domain_models::{
    CoreConfig, CoreError, LedgerEntry, LedgerEntryKind, OperationCostOptions, Payment, PaymentStatus,
};
use tollgate_infra_oracles::{ConfirmationOracle, RateOracle};
use tollgate_infra_store::LedgerStore;

use crate::rate_cache::RateCache;
use crate::sufficiency::Sufficiency;

pub struct CreditManager {
    pub(crate) store: Arc<dyn LedgerStore>,
    pub(crate) confirmation_oracle: Arc<dyn ConfirmationOracle>,
    pub(crate) rate_cache: RateCache,
    pub(crate) config: CoreConfig,
    initialized: AtomicBool,
    reconciler_handle: AsyncMutex<Option<JoinHandle<()>>>,
    reconciler_stop: Arc<AtomicBool>,
}

impl CreditManager {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        rate_oracle: Arc<dyn RateOracle>,
        confirmation_oracle: Arc<dyn ConfirmationOracle>,
        config: CoreConfig,
    ) -> Self {
        Self {
            store,
            confirmation_oracle,
            rate_cache: RateCache::new(rate_oracle),
            config,
            initialized: AtomicBool::new(false),
            reconciler_handle: AsyncMutex::new(None),
            reconciler_stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Siembra el catálogo de costos de operación desde el motor de precios.
    /// Idempotente: una segunda llamada es un no-op silencioso.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<(), CoreError> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            warn!("⚠️ [CREDIT_MANAGER]: initialize() called more than once; ignoring.");
            return Ok(());
        }

        let seed = tollgate_core_pricing::seed_operation_costs();
        let costs: Vec<_> = seed.into_values().collect();
        self.store
            .seed_operation_costs(&costs)
            .await?;

        info!("✅ [CREDIT_MANAGER]: initialized, operation cost catalog seeded.");
        Ok(())
    }

    async fn catalog(&self) -> Result<std::collections::HashMap<String, tollgate_domain_models::OperationCost>, CoreError> {
        let costs = self
            .store
            .list_operation_costs()
            .await?;
        Ok(costs.into_iter().map(|c| (c.name.clone(), c)).collect())
    }

    #[instrument(skip(self))]
    pub async fn sufficiency(
        &self,
        account: &str,
        operation_name: &str,
        mut options: OperationCostOptions,
    ) -> Result<Sufficiency, CoreError> {
        let balance = self
            .store
            .get_balance(account)
            .await?;
        options.user_total_consumed = balance.total_consumed;

        let catalog = self.catalog().await?;
        let required = operation_cost(&catalog, operation_name, &self.config.pricing, options, chrono::Utc::now());

        Ok(Sufficiency::evaluate(balance.balance, required))
    }

    #[instrument(skip(self, description))]
    pub async fn consume(
        &self,
        account: &str,
        operation_name: &str,
        description: Option<&str>,
        options: OperationCostOptions,
    ) -> Result<bool, CoreError> {
        let sufficiency = self.sufficiency(account, operation_name, options).await?;

        if !sufficiency.sufficient {
            warn!(
                "⚠️ [CREDIT_MANAGER]: account '{}' insufficient for '{}': current={} required={}",
                account, operation_name, sufficiency.current, sufficiency.required
            );
            return Ok(false);
        }

        let entry_description = description
            .map(str::to_string)
            .unwrap_or_else(|| format!("consume:{}", operation_name));

        if sufficiency.required == 0 {
            self.store
                .append_ledger(account, LedgerEntryKind::Consumption, 0, &entry_description, Some(operation_name), None)
                .await?;
            return Ok(true);
        }

        match self
            .store
            .append_ledger(
                account,
                LedgerEntryKind::Consumption,
                -sufficiency.required,
                &entry_description,
                Some(operation_name),
                None,
            )
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                warn!(
                    "⚠️ [CREDIT_MANAGER]: concurrent consume raced account '{}' below zero: {}",
                    account, e
                );
                Ok(false)
            }
        }
    }

    /// Ruta canónica, tarifada por tramos. Si el llamador ya suministró
    /// `credits_allocated` (p.ej. el Reconciler, que ya convirtió vía rate
    /// oracle), ese valor es autoritativo; de lo contrario se convierte el
    /// monto nativo a USD con la tasa cacheada y se tarifica por tramos.
    /// El `credits_allocated` de un `PENDING` previo es sólo indicativo.
    #[instrument(skip(self, payment))]
    pub async fn process_payment(&self, payment: Payment) -> Result<bool, CoreError> {
        if payment.amount <= 0.0 {
            return Err(CoreError::validation("payment amount must be positive"));
        }

        let credits_to_allocate = if payment.credits_allocated != 0 {
            payment.credits_allocated
        } else {
            let rate = self.rate_cache.rate(&self.config.network).await?;
            credits_for_amount(payment.amount * rate, &self.config.pricing)
        };

        self.commit_payment(payment, credits_to_allocate).await
    }

    /// Escape hatch administrativo: el llamador suministra `credits_allocated`
    /// directamente (esquema plano heredado), nunca el motor de precios.
    #[instrument(skip(self, payment))]
    pub async fn admin_process_payment(&self, payment: Payment, credits_allocated: i64) -> Result<bool, CoreError> {
        if payment.amount <= 0.0 {
            return Err(CoreError::validation("payment amount must be positive"));
        }
        warn!(
            "⚠️ [CREDIT_MANAGER]: admin_process_payment bypassing tiered pricing for '{}' (credits={})",
            payment.tx_id, credits_allocated
        );
        self.commit_payment(payment, credits_allocated).await
    }

    async fn commit_payment(&self, mut payment: Payment, credits_to_allocate: i64) -> Result<bool, CoreError> {
        self.store
            .ensure_account(payment.billed_account())
            .await?;

        payment.credits_allocated = credits_to_allocate;

        let entry = if payment.status == PaymentStatus::Completed {
            Some(LedgerEntry::new(
                payment.billed_account().to_string(),
                LedgerEntryKind::Purchase,
                credits_to_allocate,
                0,
                format!("purchase:{}", payment.tx_id),
                None,
                Some(payment.tx_id.clone()),
                chrono::Utc::now(),
            ))
        } else {
            None
        };

        let granted = self
            .store
            .record_payment_and_ledger(payment.clone(), entry)
            .await?;

        if granted {
            info!("💰 [CREDIT_MANAGER]: payment '{}' granted {} credits", payment.tx_id, credits_to_allocate);
        } else {
            info!("🔁 [CREDIT_MANAGER]: payment '{}' produced no new credit grant", payment.tx_id);
        }
        Ok(granted)
    }

    /// Delta firmado de ajuste administrativo; nunca invoca el motor de
    /// precios. Siempre registrado en `warn!` dado que es una acción de
    /// operador con superficie estrecha.
    #[instrument(skip(self, reason))]
    pub async fn admin_adjust_credits(&self, account: &str, delta: i64, reason: &str) -> Result<LedgerEntry, CoreError> {
        if reason.trim().is_empty() {
            return Err(CoreError::validation("admin adjustment requires a reason"));
        }

        warn!("⚠️ [CREDIT_MANAGER]: admin adjustment on '{}': delta={} reason='{}'", account, delta, reason);

        Ok(self
            .store
            .append_ledger(account, LedgerEntryKind::AdminAdjustment, delta, reason, None, None)
            .await?)
    }

    /// Única vía hacia `REFUNDED`. El monto reembolsado se limita al balance
    /// actual para que `balance_after` nunca sea negativo.
    #[instrument(skip(self))]
    pub async fn refund_payment(&self, tx_id: &str) -> Result<LedgerEntry, CoreError> {
        let payment = self
            .store
            .find_payment(tx_id)
            .await?
            .ok_or_else(|| CoreError::validation(format!("no payment found for '{}'", tx_id)))?;

        if payment.status != PaymentStatus::Completed {
            return Err(CoreError::InvalidStateTransition(format!(
                "cannot refund payment '{}' in state {:?}",
                tx_id, payment.status
            )));
        }

        self.store
            .update_payment_status(tx_id, PaymentStatus::Refunded)
            .await?;

        let balance = self
            .store
            .get_balance(payment.billed_account())
            .await?;
        let refund_amount = -(payment.credits_allocated.min(balance.balance));

        let entry = self
            .store
            .append_ledger(
                payment.billed_account(),
                LedgerEntryKind::Refund,
                refund_amount,
                &format!("refund:{}", tx_id),
                None,
                Some(tx_id),
            )
            .await?;

        info!("↩️ [CREDIT_MANAGER]: refunded {} credits for payment '{}'", -refund_amount, tx_id);
        Ok(entry)
    }

    /// Expone la tasa nativo->USD cacheada a colaboradores externos (p.ej.
    /// el Payment Builder), que la necesitan para estimar `expected_credits`
    /// sin duplicar la política de cacheo del Credit Manager.
    pub async fn current_rate(&self) -> Result<f64, CoreError> {
        self.rate_cache.rate(&self.config.network).await
    }

    /// Configuración de tarifas vigente, de sólo lectura.
    pub fn pricing(&self) -> &tollgate_domain_models::PricingConfig {
        &self.config.pricing
    }

    pub(crate) fn stop_flag(&self) -> Arc<AtomicBool> {
        self.reconciler_stop.clone()
    }

    pub(crate) async fn set_reconciler_handle(&self, handle: JoinHandle<()>) {
        *self.reconciler_handle.lock().await = Some(handle);
    }

    /// Cancela y une la tarea del reconciler, si hay una en curso.
    #[instrument(skip(self))]
    pub async fn close(&self) {
        self.reconciler_stop.store(true, Ordering::SeqCst);
        let handle = self.reconciler_handle.lock().await.take();
        if let Some(handle) = handle {
            handle.abort();
            let _ = handle.await;
            info!("🛑 [CREDIT_MANAGER]: reconciler stopped.");
        }
    }
}
