// [libs/infra/store/tests/memory_store_test.rs]
use chrono::Utc;
use tollgate_domain_models::{LedgerEntry, LedgerEntryKind, Payment, PaymentStatus};
use tollgate_infra_store::{LedgerStore, MemoryLedgerStore};

#[tokio::test]
async fn unknown_account_reports_zero_balance_never_none() {
    let store = MemoryLedgerStore::new();
    let balance = store.get_balance("ghost").await.unwrap();
    assert_eq!(balance.balance, 0);
    assert_eq!(balance.total_purchased, 0);
}

#[tokio::test]
async fn append_ledger_updates_balance_and_rejects_negative_results() {
    let store = MemoryLedgerStore::new();
    store.ensure_account("alice").await.unwrap();

    let entry = store
        .append_ledger("alice", LedgerEntryKind::Purchase, 100, "top up", None, None)
        .await
        .unwrap();
    assert_eq!(entry.balance_after, 100);

    let err = store
        .append_ledger("alice", LedgerEntryKind::Consumption, -150, "overspend", Some("op"), None)
        .await;
    assert!(err.is_err());

    let balance = store.get_balance("alice").await.unwrap();
    assert_eq!(balance.balance, 100, "rejected mutation must not partially apply");
}

#[tokio::test]
async fn record_payment_and_ledger_grants_credit_exactly_once_on_duplicate() {
    let store = MemoryLedgerStore::new();
    let now = Utc::now();
    let payment = Payment {
        tx_id: "T1".into(),
        payer_account: "alice".into(),
        target_account: None,
        amount: 1.0,
        credits_allocated: 50,
        memo: None,
        status: PaymentStatus::Completed,
        created_at: now,
        updated_at: now,
    };
    let entry = LedgerEntry::new(
        "alice".to_string(),
        LedgerEntryKind::Purchase,
        50,
        0,
        "purchase".to_string(),
        None,
        Some("T1".to_string()),
        now,
    );

    let first = store
        .record_payment_and_ledger(payment.clone(), Some(entry.clone()))
        .await
        .unwrap();
    assert!(first);

    let second = store.record_payment_and_ledger(payment, Some(entry)).await.unwrap();
    assert!(!second, "duplicate terminal payment must be a no-op");

    let balance = store.get_balance("alice").await.unwrap();
    assert_eq!(balance.balance, 50);
}

#[tokio::test]
async fn update_payment_status_enforces_the_dag() {
    let store = MemoryLedgerStore::new();
    let now = Utc::now();
    let payment = Payment {
        tx_id: "T2".into(),
        payer_account: "bob".into(),
        target_account: None,
        amount: 0.5,
        credits_allocated: 0,
        memo: None,
        status: PaymentStatus::Pending,
        created_at: now,
        updated_at: now,
    };
    store.record_payment_and_ledger(payment, None).await.unwrap();

    store.update_payment_status("T2", PaymentStatus::Completed).await.unwrap();

    let err = store.update_payment_status("T2", PaymentStatus::Pending).await;
    assert!(err.is_err(), "COMPLETED -> PENDING is not a legal DAG edge");

    store.update_payment_status("T2", PaymentStatus::Refunded).await.unwrap();
}

#[tokio::test]
async fn list_pending_payments_only_returns_pending_status() {
    let store = MemoryLedgerStore::new();
    let now = Utc::now();
    let pending = Payment::new_pending("T3", "carol", None, 0.2, None, now);
    store.record_payment_and_ledger(pending, None).await.unwrap();

    let completed_now = now;
    let completed = Payment {
        tx_id: "T4".into(),
        payer_account: "dave".into(),
        target_account: None,
        amount: 1.0,
        credits_allocated: 10,
        memo: None,
        status: PaymentStatus::Completed,
        created_at: completed_now,
        updated_at: completed_now,
    };
    store.record_payment_and_ledger(completed, None).await.unwrap();

    let pending_list = store.list_pending_payments().await.unwrap();
    assert_eq!(pending_list.len(), 1);
    assert_eq!(pending_list[0].tx_id, "T3");
}

#[tokio::test]
async fn seed_operation_costs_is_idempotent() {
    use tollgate_domain_models::OperationCost;

    let store = MemoryLedgerStore::new();
    let costs = vec![OperationCost {
        name: "transfer.native".into(),
        base_cost: 10,
        category: "transfer".into(),
        network_class_multiplier: None,
        size_multiplier: None,
    }];

    store.seed_operation_costs(&costs).await.unwrap();
    store.seed_operation_costs(&costs).await.unwrap();

    let listed = store.list_operation_costs().await.unwrap();
    assert_eq!(listed.len(), 1);
}
