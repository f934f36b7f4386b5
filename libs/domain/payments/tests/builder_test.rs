// [libs/domain/payments/tests/builder_test.rs]
use std::sync::Arc;

use async_trait::async_trait;
use tollgate_domain_manager::CreditManager;
use tollgate_domain_models::CoreConfig;
use tollgate_domain_payments::PaymentBuilder;
use tollgate_infra_oracles::{ConfirmationOracle, OracleError, RateOracle, TransactionReport};
use tollgate_infra_store::{LedgerStore, MemoryLedgerStore};

struct FixedRateOracle(f64);

#[async_trait]
impl RateOracle for FixedRateOracle {
    async fn hbar_to_usd(&self, _network: &str) -> Result<f64, OracleError> {
        Ok(self.0)
    }
}

struct NullConfirmationOracle;

#[async_trait]
impl ConfirmationOracle for NullConfirmationOracle {
    async fn get_transaction(&self, _external_id: &str) -> Result<Option<TransactionReport>, OracleError> {
        Ok(None)
    }
}

fn test_manager(min_payment: f64, max_payment: f64) -> (Arc<CreditManager>, Arc<dyn LedgerStore>) {
    let store: Arc<dyn LedgerStore> = Arc::new(MemoryLedgerStore::new());
    let config = CoreConfig {
        min_payment,
        max_payment,
        server_account_id: "server".to_string(),
        ..CoreConfig::default()
    };
    let manager = Arc::new(CreditManager::new(
        store.clone(),
        Arc::new(FixedRateOracle(0.05)),
        Arc::new(NullConfirmationOracle),
        config,
    ));
    (manager, store)
}

#[tokio::test]
async fn amount_below_minimum_is_rejected() {
    let (manager, _store) = test_manager(0.01, 100.0);
    manager.initialize().await.unwrap();
    let builder = PaymentBuilder::new(&manager, "server", 0.01, 100.0);

    let result = builder.build_payment("payer-a", 0.001, None).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn amount_above_maximum_is_rejected() {
    let (manager, _store) = test_manager(0.01, 100.0);
    manager.initialize().await.unwrap();
    let builder = PaymentBuilder::new(&manager, "server", 0.01, 100.0);

    let result = builder.build_payment("payer-a", 100.01, None).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn amount_at_exact_boundaries_is_accepted() {
    let (manager, _store) = test_manager(0.01, 100.0);
    manager.initialize().await.unwrap();
    let builder = PaymentBuilder::new(&manager, "server", 0.01, 100.0);

    assert!(builder.build_payment("payer-a", 0.01, None).await.is_ok());
    assert!(builder.build_payment("payer-b", 100.0, None).await.is_ok());
}

#[tokio::test]
async fn happy_path_produces_a_pending_payment_with_expected_credits() {
    let (manager, store) = test_manager(0.01, 100.0);
    manager.initialize().await.unwrap();
    let builder = PaymentBuilder::new(&manager, "server", 0.01, 100.0);

    let result = builder.build_payment("payer-a", 1.0, None).await.unwrap();

    assert_eq!(result.expected_credits, 50);
    assert!(!result.payload_base64.is_empty());

    let payment = store.find_payment(&result.tx_id).await.unwrap().unwrap();
    assert_eq!(payment.status, tollgate_domain_models::PaymentStatus::Pending);
    assert_eq!(payment.payer_account, "payer-a");
    assert_eq!(payment.memo.as_deref(), Some("credits:payer-a"));
}

#[tokio::test]
async fn explicit_memo_overrides_the_canonical_default() {
    let (manager, store) = test_manager(0.01, 100.0);
    manager.initialize().await.unwrap();
    let builder = PaymentBuilder::new(&manager, "server", 0.01, 100.0);

    let result = builder
        .build_payment("payer-a", 1.0, Some("order-42".to_string()))
        .await
        .unwrap();

    let payment = store.find_payment(&result.tx_id).await.unwrap().unwrap();
    assert_eq!(payment.memo.as_deref(), Some("order-42"));
}
