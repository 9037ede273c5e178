// ==========================================
// 批量写入 Repository 集成测试
// ==========================================
// 覆盖: 单事务整批写入、外键/检查约束回滚、列白名单
// ==========================================

use serde_json::json;
use travel_import::repository::{BulkInsertRepository, BulkInsertRepositoryImpl, RepositoryError};

use test_helpers::{count_rows, create_test_db, id_by_name, row, shared_connection};

#[tokio::test]
async fn test_insert_generates_ids_and_timestamps() {
    let (_temp, db_path) = create_test_db().unwrap();
    let conn = shared_connection(&db_path);
    let repo = BulkInsertRepositoryImpl::from_connection(conn.clone()).unwrap();

    let count = repo
        .bulk_insert(
            "countries",
            vec![row(json!({"name": "Georgia", "code": "GE"})), row(json!({"name": "Armenia"}))],
        )
        .await
        .unwrap();
    assert_eq!(count, 2);

    let (id, created_at, code): (String, String, Option<String>) = {
        let c = conn.lock().unwrap();
        c.query_row(
            "SELECT id, created_at, code FROM countries WHERE name = 'Armenia'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .unwrap()
    };
    assert_eq!(id.len(), 36);
    assert!(chrono::DateTime::parse_from_rfc3339(&created_at).is_ok());
    assert_eq!(code, None);
}

#[tokio::test]
async fn test_check_constraint_rolls_back_batch() {
    let (_temp, db_path) = create_test_db().unwrap();
    let conn = shared_connection(&db_path);
    let repo = BulkInsertRepositoryImpl::from_connection(conn.clone()).unwrap();

    // 准备层级数据
    repo.bulk_insert("countries", vec![row(json!({"name": "Georgia"}))])
        .await
        .unwrap();
    let country_id = id_by_name(&conn, "countries", "Georgia");
    repo.bulk_insert("regions", vec![row(json!({"country_id": country_id, "name": "Adjara"}))])
        .await
        .unwrap();
    let region_id = id_by_name(&conn, "regions", "Adjara");
    repo.bulk_insert("cities", vec![row(json!({"region_id": region_id, "name": "Batumi"}))])
        .await
        .unwrap();
    let city_id = id_by_name(&conn, "cities", "Batumi");

    // stars=7 违反 CHECK，整批回滚
    let result = repo
        .bulk_insert(
            "hotels",
            vec![
                row(json!({"city_id": city_id, "name": "Hotel X", "stars": 5})),
                row(json!({"city_id": city_id, "name": "Hotel Y", "stars": 7})),
            ],
        )
        .await;

    assert!(matches!(result, Err(RepositoryError::CheckConstraintViolation(_))));
    assert_eq!(count_rows(&conn, "hotels"), 0);
}

#[tokio::test]
async fn test_foreign_key_violation() {
    let (_temp, db_path) = create_test_db().unwrap();
    let repo = BulkInsertRepositoryImpl::new(&db_path).unwrap();

    let result = repo
        .bulk_insert("room_types", vec![row(json!({"hotel_id": "missing", "name": "Double"}))])
        .await;
    assert!(matches!(result, Err(RepositoryError::ForeignKeyViolation(_))));
    assert_eq!(repo.count_records("room_types").unwrap(), 0);
}

#[tokio::test]
async fn test_list_values_stored_as_json_text() {
    let (_temp, db_path) = create_test_db().unwrap();
    let conn = shared_connection(&db_path);
    let repo = BulkInsertRepositoryImpl::from_connection(conn.clone()).unwrap();

    repo.bulk_insert("countries", vec![row(json!({"name": "Georgia"}))])
        .await
        .unwrap();
    let country_id = id_by_name(&conn, "countries", "Georgia");
    repo.bulk_insert("regions", vec![row(json!({"country_id": country_id, "name": "Imereti"}))])
        .await
        .unwrap();
    let region_id = id_by_name(&conn, "regions", "Imereti");
    repo.bulk_insert(
        "cities",
        vec![row(json!({"region_id": region_id, "name": "Kutaisi", "latitude": 42.27}))],
    )
    .await
    .unwrap();
    let city_id = id_by_name(&conn, "cities", "Kutaisi");

    repo.bulk_insert(
        "hotels",
        vec![row(json!({"city_id": city_id, "name": "Hotel K", "images": ["a.jpg", "b.jpg"]}))],
    )
    .await
    .unwrap();

    let images: String = {
        let c = conn.lock().unwrap();
        c.query_row("SELECT images FROM hotels WHERE name = 'Hotel K'", [], |r| r.get(0))
            .unwrap()
    };
    assert_eq!(images, r#"["a.jpg","b.jpg"]"#);
}

#[tokio::test]
async fn test_unknown_column_rejects_before_sql() {
    let (_temp, db_path) = create_test_db().unwrap();
    let repo = BulkInsertRepositoryImpl::new(&db_path).unwrap();

    let result = repo
        .bulk_insert("placements", vec![row(json!({"name": "Top", "\"; DROP TABLE placements; --": 1}))])
        .await;
    assert!(matches!(result, Err(RepositoryError::UnknownColumn { .. })));
    assert_eq!(repo.count_records("placements").unwrap(), 0);
}
