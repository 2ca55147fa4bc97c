use chrono::Duration;
use quiz_core::model::{AttemptKind, ModuleId, ModuleStatus, PositioningStatus};
use quiz_core::time::fixed_now;
use storage::repository::{ProgressRepository, StorageError};
use storage::sqlite::SqliteRepository;

async fn repo(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn positioning_status_round_trips() {
    let repo = repo("memdb_positioning").await;
    assert_eq!(repo.get_positioning_status("Finance").await.unwrap(), None);

    repo.record_positioning_result("Finance", 40.0, fixed_now())
        .await
        .unwrap();
    assert_eq!(
        repo.get_positioning_status("Finance").await.unwrap(),
        Some(PositioningStatus::Failed)
    );

    let record = repo
        .record_positioning_result("Finance", 75.0, fixed_now() + Duration::days(1))
        .await
        .unwrap();
    assert_eq!(record.status, PositioningStatus::Passed);
    assert_eq!(
        repo.get_positioning_status("Finance").await.unwrap(),
        Some(PositioningStatus::Passed)
    );
}

async fn insert_raw_status(repo: &SqliteRepository, course: &str, status: &str) {
    sqlx::query(
        "INSERT INTO positioning_results (course, status, score, updated_at) VALUES (?1, ?2, NULL, ?3)",
    )
    .bind(course)
    .bind(status)
    .bind(fixed_now())
    .execute(repo.pool())
    .await
    .unwrap();
}

#[tokio::test]
async fn blank_status_is_a_serialization_error() {
    let repo = repo("memdb_corrupt").await;
    insert_raw_status(&repo, "Marketing", "").await;

    let err = repo.get_positioning_status("Marketing").await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[tokio::test]
async fn completed_status_reads_back_as_a_retake() {
    let repo = repo("memdb_completed").await;
    insert_raw_status(&repo, "Marketing", "completed").await;

    let status = repo.get_positioning_status("Marketing").await.unwrap();
    assert_eq!(status, Some(PositioningStatus::Attempted));
    assert_eq!(AttemptKind::from_status(status), AttemptKind::Retake);
}

#[tokio::test]
async fn module_progress_accumulates_attempts() {
    let repo = repo("memdb_modules").await;
    let module = ModuleId::new("Module_1:_Basics");

    let first = repo
        .record_module_result("Finance", &module, 35.0, fixed_now())
        .await
        .unwrap();
    assert_eq!(first.status(), ModuleStatus::InProgress);

    let later = fixed_now() + Duration::hours(2);
    repo.record_module_result("Finance", &module, 90.0, later)
        .await
        .unwrap();

    let stored = repo
        .get_module_progress("Finance", &module)
        .await
        .unwrap()
        .expect("module progress stored");
    assert_eq!(stored.attempts(), 2);
    assert_eq!(stored.best_score(), Some(90.0));
    assert_eq!(stored.status(), ModuleStatus::Completed);
    assert_eq!(stored.last_activity(), Some(later));
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = repo("memdb_migrate_twice").await;
    repo.migrate().await.expect("second migrate");
}
