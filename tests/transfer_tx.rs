mod common;

use std::collections::HashSet;

use bank_ledger::db::StoreError;
use bank_ledger::models::entry::ListEntriesParams;
use bank_ledger::models::transfer::ListTransfersParams;
use bank_ledger::services::TransferTxParams;
use common::{create_account_with_balance, create_random_account, lazy_store, test_store};

fn transfer(from_account_id: i64, to_account_id: i64, amount: i64) -> TransferTxParams {
    TransferTxParams {
        from_account_id,
        to_account_id,
        amount,
    }
}

#[tokio::test]
#[ignore = "Requires PostgreSQL instance"]
async fn transfer_moves_funds_and_records_ledger() {
    let store = test_store().await;
    let a = create_account_with_balance(&store, 100).await;
    let b = create_account_with_balance(&store, 50).await;

    let result = store.transfer_tx(transfer(a.id, b.id, 30)).await.unwrap();

    assert_eq!(result.transfer.from_account_id, a.id);
    assert_eq!(result.transfer.to_account_id, b.id);
    assert_eq!(result.transfer.amount, 30);
    assert_eq!(result.from_entry.account_id, a.id);
    assert_eq!(result.from_entry.amount, -30);
    assert_eq!(result.to_entry.account_id, b.id);
    assert_eq!(result.to_entry.amount, 30);
    assert_eq!(result.from_account.id, a.id);
    assert_eq!(result.from_account.balance, 70);
    assert_eq!(result.to_account.id, b.id);
    assert_eq!(result.to_account.balance, 80);

    let mut q = store.queries().await.unwrap();
    assert_eq!(q.get_transfer(result.transfer.id).await.unwrap(), result.transfer);
    assert_eq!(q.get_entry(result.from_entry.id).await.unwrap(), result.from_entry);
    assert_eq!(q.get_entry(result.to_entry.id).await.unwrap(), result.to_entry);

    let transfers = q
        .list_transfers(ListTransfersParams {
            from_account_id: a.id,
            to_account_id: a.id,
            limit: 10,
            offset: 0,
        })
        .await
        .unwrap();
    assert_eq!(transfers, vec![result.transfer.clone()]);

    for (account_id, amount) in [(a.id, -30), (b.id, 30)] {
        let entries = q
            .list_entries(ListEntriesParams {
                account_id,
                limit: 10,
                offset: 0,
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].amount, amount);
    }
}

#[tokio::test]
#[ignore = "Requires PostgreSQL instance"]
async fn concurrent_transfers_lose_no_updates() {
    let store = test_store().await;
    let a = create_account_with_balance(&store, 1000).await;
    let b = create_random_account(&store).await;

    let n = 10;
    let amount = 10;

    let handles: Vec<_> = (0..n)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.transfer_tx(transfer(a.id, b.id, amount)).await })
        })
        .collect();

    let mut existed = HashSet::new();
    for handle in handles {
        let result = handle.await.unwrap().unwrap();

        let diff_from = a.balance - result.from_account.balance;
        let diff_to = result.to_account.balance - b.balance;
        assert_eq!(diff_from, diff_to);
        assert!(diff_from > 0);
        assert_eq!(diff_from % amount, 0);

        // Each transaction observes a distinct cumulative amount
        let k = diff_from / amount;
        assert!((1..=n).contains(&k));
        assert!(existed.insert(k), "amount moved {k} observed twice");
    }

    let mut q = store.queries().await.unwrap();
    let updated_a = q.get_account(a.id).await.unwrap();
    let updated_b = q.get_account(b.id).await.unwrap();
    assert_eq!(updated_a.balance, 900);
    assert_eq!(updated_b.balance, b.balance + n * amount);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL instance"]
async fn opposite_direction_transfers_do_not_deadlock() {
    let store = test_store().await;
    let a = create_random_account(&store).await;
    let b = create_random_account(&store).await;

    let n = 10;
    let amount = 10;

    let handles: Vec<_> = (0..n)
        .map(|i| {
            let store = store.clone();
            let (from, to) = if i % 2 == 0 { (b.id, a.id) } else { (a.id, b.id) };
            tokio::spawn(async move { store.transfer_tx(transfer(from, to, amount)).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let mut q = store.queries().await.unwrap();
    assert_eq!(q.get_account(a.id).await.unwrap().balance, a.balance);
    assert_eq!(q.get_account(b.id).await.unwrap().balance, b.balance);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL instance"]
async fn overdraft_is_rejected_and_nothing_persists() {
    let store = test_store().await;
    let a = create_account_with_balance(&store, 20).await;
    let b = create_account_with_balance(&store, 0).await;

    let err = store.transfer_tx(transfer(a.id, b.id, 21)).await.unwrap_err();
    assert!(matches!(err, StoreError::InsufficientFunds), "{err:?}");

    let mut q = store.queries().await.unwrap();
    assert_eq!(q.get_account(a.id).await.unwrap().balance, 20);
    assert_eq!(q.get_account(b.id).await.unwrap().balance, 0);
    assert_eq!(q.sum_entries(a.id).await.unwrap(), 0);
    assert_eq!(q.sum_entries(b.id).await.unwrap(), 0);
    let transfers = q
        .list_transfers(ListTransfersParams {
            from_account_id: a.id,
            to_account_id: b.id,
            limit: 10,
            offset: 0,
        })
        .await
        .unwrap();
    assert!(transfers.is_empty());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL instance"]
async fn transfer_to_missing_account_is_not_found() {
    let store = test_store().await;
    let a = create_account_with_balance(&store, 100).await;

    let err = store
        .transfer_tx(transfer(a.id, i64::MAX, 10))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound), "{err:?}");

    let mut q = store.queries().await.unwrap();
    assert_eq!(q.get_account(a.id).await.unwrap().balance, 100);
    assert_eq!(q.sum_entries(a.id).await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL instance"]
async fn balances_reconcile_with_ledger() {
    let store = test_store().await;
    let a = create_account_with_balance(&store, 500).await;
    let b = create_account_with_balance(&store, 500).await;

    for (from, to, amount) in [(a.id, b.id, 120), (b.id, a.id, 45), (a.id, b.id, 5)] {
        store.transfer_tx(transfer(from, to, amount)).await.unwrap();
    }

    let mut q = store.queries().await.unwrap();
    for opening in [&a, &b] {
        let account = q.get_account(opening.id).await.unwrap();
        let ledger = q.sum_entries(opening.id).await.unwrap();
        assert_eq!(account.balance, opening.balance + ledger);
    }
    assert_eq!(q.sum_entries(a.id).await.unwrap(), -80);
}

#[tokio::test]
async fn same_account_transfer_is_rejected_before_any_statement() {
    // The lazy pool cannot connect, so reaching the database would fail differently
    let store = lazy_store();

    let err = store.transfer_tx(transfer(7, 7, 10)).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidTransfer(_)), "{err:?}");
}

#[tokio::test]
async fn non_positive_amount_is_rejected_before_any_statement() {
    let store = lazy_store();

    for amount in [0, -10] {
        let err = store.transfer_tx(transfer(1, 2, amount)).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidTransfer(_)), "{err:?}");
    }
}
