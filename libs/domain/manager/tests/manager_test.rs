// [libs/domain/manager/tests/manager_test.rs]
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use tollgate_domain_manager::CreditManager;
use tollgate_domain_models::{CoreConfig, OperationCostOptions, Payment, PaymentStatus};
use tollgate_infra_oracles::{ConfirmationOracle, OracleError, RateOracle, TransactionReport, TransactionResult, Transfer};
use tollgate_infra_store::{LedgerStore, MemoryLedgerStore};

struct FixedRateOracle(f64);

#[async_trait]
impl RateOracle for FixedRateOracle {
    async fn hbar_to_usd(&self, _network: &str) -> Result<f64, OracleError> {
        Ok(self.0)
    }
}

struct ScriptedConfirmationOracle {
    report: Option<TransactionReport>,
}

#[async_trait]
impl ConfirmationOracle for ScriptedConfirmationOracle {
    async fn get_transaction(&self, _external_id: &str) -> Result<Option<TransactionReport>, OracleError> {
        Ok(self.report.clone())
    }
}

fn test_config() -> CoreConfig {
    CoreConfig {
        server_account_id: "server".to_string(),
        ..CoreConfig::default()
    }
}

fn manager_with(rate: f64, confirmation: Option<TransactionReport>) -> (Arc<CreditManager>, Arc<dyn LedgerStore>) {
    let store: Arc<dyn LedgerStore> = Arc::new(MemoryLedgerStore::new());
    let manager = Arc::new(CreditManager::new(
        store.clone(),
        Arc::new(FixedRateOracle(rate)),
        Arc::new(ScriptedConfirmationOracle { report: confirmation }),
        test_config(),
    ));
    (manager, store)
}

#[tokio::test]
async fn scenario_one_pure_purchase() {
    let (manager, store) = manager_with(0.05, None);
    manager.initialize().await.unwrap();

    let now = Utc::now();
    let payment = Payment {
        tx_id: "T1".into(),
        payer_account: "A".into(),
        target_account: None,
        amount: 1.0,
        credits_allocated: 0,
        memo: None,
        status: PaymentStatus::Completed,
        created_at: now,
        updated_at: now,
    };

    let ok = manager.process_payment(payment).await.unwrap();
    assert!(ok);

    let balance = store.get_balance("A").await.unwrap();
    assert_eq!(balance.balance, 50);

    let history = store.get_history("A", 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].amount, 50);
    assert_eq!(history[0].balance_after, 50);
}

#[tokio::test]
async fn scenario_two_free_then_priced_operation() {
    let (manager, store) = manager_with(0.05, None);
    manager.initialize().await.unwrap();

    store
        .append_ledger("A", tollgate_domain_models::LedgerEntryKind::AdminAdjustment, 100, "seed", None, None)
        .await
        .unwrap();

    let free_ok = manager
        .consume("A", "account.balance.query", None, OperationCostOptions::default())
        .await
        .unwrap();
    assert!(free_ok);
    assert_eq!(store.get_balance("A").await.unwrap().balance, 100);

    let priced_ok = manager
        .consume("A", "transfer.native", None, OperationCostOptions::default())
        .await
        .unwrap();
    assert!(priced_ok);
    assert_eq!(store.get_balance("A").await.unwrap().balance, 90);
}

#[tokio::test]
async fn scenario_three_insufficient_balance() {
    let (manager, _store) = manager_with(0.05, None);
    manager.initialize().await.unwrap();

    let sufficiency = manager
        .sufficiency("B", "transfer.native", OperationCostOptions::default())
        .await
        .unwrap();
    assert!(!sufficiency.sufficient);
    assert_eq!(sufficiency.current, 0);
    assert_eq!(sufficiency.required, 10);
    assert_eq!(sufficiency.shortfall, 10);

    let consumed = manager
        .consume("B", "transfer.native", None, OperationCostOptions::default())
        .await
        .unwrap();
    assert!(!consumed);
}

#[tokio::test]
async fn scenario_four_duplicate_confirmation_grants_credit_once() {
    let (manager, store) = manager_with(0.05, None);
    manager.initialize().await.unwrap();

    let now = Utc::now();
    let payment = Payment {
        tx_id: "T2".into(),
        payer_account: "A".into(),
        target_account: None,
        amount: 0.5,
        credits_allocated: 0,
        memo: None,
        status: PaymentStatus::Completed,
        created_at: now,
        updated_at: now,
    };

    manager.process_payment(payment.clone()).await.unwrap();
    manager.process_payment(payment).await.unwrap();

    let history = store.get_history("A", 10).await.unwrap();
    let purchases: Vec<_> = history.iter().filter(|e| e.kind == tollgate_domain_models::LedgerEntryKind::Purchase).collect();
    assert_eq!(purchases.len(), 1);

    let expected_credits = tollgate_core_pricing::credits_for_amount(0.5 * 0.05, &CoreConfig::default().pricing);
    assert_eq!(store.get_balance("A").await.unwrap().balance, expected_credits);
}

#[tokio::test]
async fn scenario_five_pending_confirmed_via_reconciler() {
    let report = TransactionReport {
        result: TransactionResult::Success,
        consensus_timestamp: Some(Utc::now()),
        transfers: vec![
            Transfer { account: "server".to_string(), amount: 20_000_000 },
            Transfer { account: "A".to_string(), amount: -20_000_000 },
        ],
    };
    let (manager, store) = manager_with(0.05, Some(report));
    manager.initialize().await.unwrap();

    let now = Utc::now();
    let pending = Payment::new_pending("T3", "A", None, 0.2, None, now);
    store.record_payment_and_ledger(pending, None).await.unwrap();

    manager.reconcile_once().await;

    let expected_credits = tollgate_core_pricing::credits_for_amount(0.2 * 0.05, &CoreConfig::default().pricing);
    assert_eq!(store.get_balance("A").await.unwrap().balance, expected_credits);

    let payment = store.find_payment("T3").await.unwrap().unwrap();
    assert_eq!(payment.status, PaymentStatus::Completed);
}

#[tokio::test]
async fn scenario_six_pending_ages_out_to_failed() {
    let (manager, store) = manager_with(0.05, None);
    manager.initialize().await.unwrap();

    let old_timestamp = Utc::now() - ChronoDuration::seconds(600);
    let mut pending = Payment::new_pending("T4", "A", None, 0.1, None, old_timestamp);
    pending.created_at = old_timestamp;
    store.record_payment_and_ledger(pending, None).await.unwrap();

    manager.reconcile_once().await;

    let payment = store.find_payment("T4").await.unwrap().unwrap();
    assert_eq!(payment.status, PaymentStatus::Failed);
    assert_eq!(store.get_history("A", 10).await.unwrap().len(), 0);
}

#[tokio::test]
async fn refund_payment_caps_at_current_balance_and_reaches_refunded() {
    let (manager, store) = manager_with(0.05, None);
    manager.initialize().await.unwrap();

    let now = Utc::now();
    let payment = Payment {
        tx_id: "T5".into(),
        payer_account: "A".into(),
        target_account: None,
        amount: 1.0,
        credits_allocated: 0,
        memo: None,
        status: PaymentStatus::Completed,
        created_at: now,
        updated_at: now,
    };
    manager.process_payment(payment).await.unwrap();

    manager
        .consume("A", "transfer.native", None, OperationCostOptions::default())
        .await
        .unwrap();

    let refund_entry = manager.refund_payment("T5").await.unwrap();
    assert!(refund_entry.amount <= 0);

    let payment_after = store.find_payment("T5").await.unwrap().unwrap();
    assert_eq!(payment_after.status, PaymentStatus::Refunded);

    let balance = store.get_balance("A").await.unwrap();
    assert!(balance.balance >= 0);
}

#[tokio::test]
async fn admin_adjust_credits_requires_a_reason() {
    let (manager, _store) = manager_with(0.05, None);
    manager.initialize().await.unwrap();

    let err = manager.admin_adjust_credits("A", 10, "").await;
    assert!(err.is_err());

    let ok = manager.admin_adjust_credits("A", 10, "support ticket #88").await;
    assert!(ok.is_ok());
}
