mod common;

use anyhow::Result;
use common::{seed_scenario, test_service};
use saldo::application::{AppError, EditInput, ValidationError};
use saldo::domain::Kind;
use saldo::storage::StoreError;
use uuid::Uuid;

#[tokio::test]
async fn test_insert_list_remove_roundtrip() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let recorded = service.record("Lunch", "12.50", "expense").await?;
    assert_eq!(recorded.description, "Lunch");
    assert_eq!(recorded.amount_cents, 1250);
    assert_eq!(recorded.kind, Kind::Expense);

    let listed = service.list().await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], recorded);

    service.remove(recorded.id).await?;
    assert!(service.list().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_list_keeps_insertion_order_and_history_reverses_it() -> Result<()> {
    let (service, _temp) = test_service().await?;
    seed_scenario(&service).await?;

    let listed = service.list().await?;
    let descriptions: Vec<&str> = listed.iter().map(|tx| tx.description.as_str()).collect();
    assert_eq!(descriptions, ["Salary", "Rent", "Coffee"]);

    let history = service.history().await?;
    let descriptions: Vec<&str> = history.iter().map(|tx| tx.description.as_str()).collect();
    assert_eq!(descriptions, ["Coffee", "Rent", "Salary"]);

    Ok(())
}

#[tokio::test]
async fn test_end_to_end_balance_and_series() -> Result<()> {
    let (service, _temp) = test_service().await?;
    seed_scenario(&service).await?;

    // 1000 - 400 - 5 = 595
    assert_eq!(service.balance().await?, 59_500);

    let series = service.series().await?;
    assert_eq!(series.income, vec![100_000, 100_000, 100_000]);
    assert_eq!(series.expense, vec![0, 40_000, 40_500]);
    assert_eq!(series.labels, vec!["T1", "T2", "T3"]);

    Ok(())
}

#[tokio::test]
async fn test_update_changes_only_supplied_fields() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let recorded = service.record("Groceries", "45.00", "expense").await?;
    let updated = service
        .update(
            recorded.id,
            EditInput {
                amount_text: Some("52.30"),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(updated.amount_cents, 5230);
    assert_eq!(updated.description, "Groceries");
    assert_eq!(updated.kind, Kind::Expense);
    assert_eq!(updated.id, recorded.id);
    // Edits never re-stamp the original timestamp
    assert_eq!(updated.timestamp, recorded.timestamp);

    let listed = service.list().await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], updated);

    Ok(())
}

#[tokio::test]
async fn test_update_is_idempotent_for_same_patch() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let recorded = service.record("Rent", "400", "expense").await?;
    let edit = EditInput {
        description: Some("Monthly rent"),
        amount_text: Some("410"),
        kind_text: Some("expense"),
    };

    let first = service.update(recorded.id, edit.clone()).await?;
    let second = service.update(recorded.id, edit).await?;
    assert_eq!(first, second);
    assert_eq!(service.list().await?, vec![second]);

    Ok(())
}

#[tokio::test]
async fn test_update_can_flip_kind() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let recorded = service.record("Adjustment", "20", "expense").await?;
    assert_eq!(service.balance().await?, -2000);

    service
        .update(
            recorded.id,
            EditInput {
                kind_text: Some("income"),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(service.balance().await?, 2000);

    Ok(())
}

#[tokio::test]
async fn test_remove_twice_fails_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let recorded = service.record("Coffee", "5", "expense").await?;
    service.remove(recorded.id).await?;

    let err = service.remove(recorded.id).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Store(StoreError::NotFound(id)) if id == recorded.id
    ));

    Ok(())
}

#[tokio::test]
async fn test_update_unknown_id_fails_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let unknown = Uuid::new_v4();
    let err = service
        .update(
            unknown,
            EditInput {
                description: Some("nope"),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Store(StoreError::NotFound(id)) if id == unknown
    ));

    Ok(())
}

#[tokio::test]
async fn test_record_rejects_invalid_input_without_persisting() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service.record("", "10", "income").await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::EmptyField("description"))
    ));

    let err = service.record("Lunch", "abc", "expense").await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::NotANumber(_))
    ));

    let err = service.record("Lunch", "10", "loan").await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::InvalidKind(_))
    ));

    assert!(service.list().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_data_survives_reconnect() -> Result<()> {
    let temp_dir = tempfile::TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let path = db_path.to_str().unwrap();

    let recorded = {
        let service = saldo::application::LedgerService::init(path).await?;
        service.record("Salary", "1000", "income").await?
    };

    let service = saldo::application::LedgerService::connect(path).await?;
    let listed = service.list().await?;
    assert_eq!(listed, vec![recorded]);
    assert_eq!(service.balance().await?, 100_000);

    Ok(())
}
