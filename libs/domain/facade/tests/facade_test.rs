// [libs/domain/facade/tests/facade_test.rs]
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tollgate_domain_facade::{Collaborator, FacadeError, OperationFacade};
use tollgate_domain_manager::CreditManager;
use tollgate_domain_models::{CoreConfig, LedgerEntryKind, OperationCostOptions};
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

struct EchoCollaborator;

#[async_trait]
impl Collaborator for EchoCollaborator {
    async fn invoke(&self, operation_name: &str, args: Value) -> Result<Value, String> {
        Ok(json!({ "echoed_operation": operation_name, "args": args }))
    }
}

struct FailingCollaborator;

#[async_trait]
impl Collaborator for FailingCollaborator {
    async fn invoke(&self, _operation_name: &str, _args: Value) -> Result<Value, String> {
        Err("downstream network unreachable".to_string())
    }
}

fn facade_with(collaborator: Arc<dyn Collaborator>) -> (OperationFacade, Arc<dyn LedgerStore>) {
    let store: Arc<dyn LedgerStore> = Arc::new(MemoryLedgerStore::new());
    let manager = Arc::new(CreditManager::new(
        store.clone(),
        Arc::new(FixedRateOracle(0.05)),
        Arc::new(NullConfirmationOracle),
        CoreConfig::default(),
    ));
    (OperationFacade::new(manager, collaborator), store)
}

#[tokio::test]
async fn priced_operation_consumes_credits_and_forwards_collaborator_result() {
    let (facade, store) = facade_with(Arc::new(EchoCollaborator));
    store
        .append_ledger("caller-a", LedgerEntryKind::AdminAdjustment, 100, "seed", None, None)
        .await
        .unwrap();

    let response = facade
        .execute_operation(
            "caller-a",
            false,
            None,
            "transfer.native",
            json!({"to": "x"}),
            OperationCostOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(response.status, "ok");
    assert_eq!(response.result["echoed_operation"], "transfer.native");
    assert_eq!(store.get_balance("caller-a").await.unwrap().balance, 90);
}

#[tokio::test]
async fn insufficient_balance_returns_structured_error_without_consuming() {
    let (facade, store) = facade_with(Arc::new(EchoCollaborator));

    let err = facade
        .execute_operation(
            "caller-b",
            false,
            None,
            "transfer.native",
            json!({}),
            OperationCostOptions::default(),
        )
        .await
        .unwrap_err();

    match err {
        FacadeError::InsufficientCredits { required, current, shortfall } => {
            assert_eq!(required, 10);
            assert_eq!(current, 0);
            assert_eq!(shortfall, 10);
        }
        other => panic!("expected InsufficientCredits, got {:?}", other),
    }
    assert_eq!(store.get_balance("caller-b").await.unwrap().balance, 0);
}

#[tokio::test]
async fn free_operation_appends_a_zero_amount_audit_entry() {
    let (facade, store) = facade_with(Arc::new(EchoCollaborator));

    let response = facade
        .execute_operation(
            "caller-c",
            false,
            None,
            "account.balance.query",
            json!({}),
            OperationCostOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(response.status, "ok");
    let history = store.get_history("caller-c", 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].amount, 0);
}

#[tokio::test]
async fn non_admin_cannot_bill_a_different_account() {
    let (facade, _store) = facade_with(Arc::new(EchoCollaborator));

    let err = facade
        .execute_operation(
            "caller-d",
            false,
            Some("someone-else"),
            "transfer.native",
            json!({}),
            OperationCostOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, FacadeError::Forbidden(_)));
}

#[tokio::test]
async fn admin_may_bill_a_different_account() {
    let (facade, store) = facade_with(Arc::new(EchoCollaborator));
    store
        .append_ledger("target-account", LedgerEntryKind::AdminAdjustment, 50, "seed", None, None)
        .await
        .unwrap();

    let response = facade
        .execute_operation(
            "admin-user",
            true,
            Some("target-account"),
            "transfer.native",
            json!({}),
            OperationCostOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(response.status, "ok");
    assert_eq!(store.get_balance("target-account").await.unwrap().balance, 40);
}

#[tokio::test]
async fn consumption_survives_a_failing_collaborator() {
    let (facade, store) = facade_with(Arc::new(FailingCollaborator));
    store
        .append_ledger("caller-e", LedgerEntryKind::AdminAdjustment, 100, "seed", None, None)
        .await
        .unwrap();

    let err = facade
        .execute_operation(
            "caller-e",
            false,
            None,
            "transfer.native",
            json!({}),
            OperationCostOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, FacadeError::Failed(_)));
    // Los créditos ya fueron consumidos: el trabajo fue planeado y los
    // recursos retenidos, sin importar el desenlace del colaborador.
    assert_eq!(store.get_balance("caller-e").await.unwrap().balance, 90);
}
