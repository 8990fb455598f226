mod common;

use std::time::Duration;

use bank_ledger::db::StoreError;
use bank_ledger::models::account::{CreateAccountParams, ListAccountsParams};
use common::{connect_store, create_random_user, test_store};

#[tokio::test]
#[ignore = "Requires PostgreSQL instance"]
async fn committed_body_is_visible_afterwards() {
    let store = test_store().await;
    let user = create_random_user(&store).await;
    let params = CreateAccountParams {
        owner: user.username.clone(),
        balance: 10,
        currency: "EUR".to_string(),
    };

    let account = store
        .run_atomic(move |q| Box::pin(async move { q.create_account(&params).await }))
        .await
        .unwrap();

    let mut q = store.queries().await.unwrap();
    assert_eq!(q.get_account(account.id).await.unwrap(), account);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL instance"]
async fn failed_body_rolls_back_earlier_statements() {
    let store = test_store().await;
    let user = create_random_user(&store).await;
    let params = CreateAccountParams {
        owner: user.username.clone(),
        balance: 10,
        currency: "USD".to_string(),
    };

    let err = store
        .run_atomic(move |q| {
            Box::pin(async move {
                q.create_account(&params).await?;
                // Second account in the same currency violates the owner/currency key
                q.create_account(&params).await?;
                Ok(())
            })
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateIdentity), "{err:?}");

    let accounts = store
        .queries()
        .await
        .unwrap()
        .list_accounts(&ListAccountsParams {
            owner: user.username,
            limit: 10,
            offset: 0,
        })
        .await
        .unwrap();
    assert!(accounts.is_empty());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL instance"]
async fn body_error_is_returned_unchanged() {
    let store = test_store().await;

    let err = store
        .run_atomic(|_q| Box::pin(async move { Err::<(), _>(StoreError::InvalidSecret) }))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidSecret), "{err:?}");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL instance"]
async fn slow_body_is_canceled_and_rolled_back() {
    let store = connect_store(Duration::from_millis(200)).await;
    let user = create_random_user(&store).await;
    let params = CreateAccountParams {
        owner: user.username.clone(),
        balance: 10,
        currency: "CAD".to_string(),
    };

    let err = store
        .run_atomic(move |q| {
            Box::pin(async move {
                q.create_account(&params).await?;
                tokio::time::sleep(Duration::from_secs(2)).await;
                Ok(())
            })
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::CanceledOperation), "{err:?}");

    let accounts = store
        .queries()
        .await
        .unwrap()
        .list_accounts(&ListAccountsParams {
            owner: user.username,
            limit: 10,
            offset: 0,
        })
        .await
        .unwrap();
    assert!(accounts.is_empty());
}
