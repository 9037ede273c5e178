// ==========================================
// 行转换/校验集成测试
// ==========================================
// 覆盖: 文件解析 → 实体配置 → 行转换 全链路（不落库）
// ==========================================

use serde_json::json;
use travel_import::importer::{lookup_schema, RowErrorKind, RowTransformer, UniversalFileParser};
use travel_import::{EntityType, ImportError};

use test_helpers::row;

#[test]
fn test_csv_countries_accepted() {
    let table = UniversalFileParser
        .decode(b"name,code\nGeorgia,GE\n", "countries.csv")
        .unwrap();
    let result = RowTransformer.transform(&table.rows, "countries").unwrap();

    assert_eq!(result.accepted, vec![row(json!({"name": "Georgia", "code": "GE"}))]);
    assert!(result.errors.is_empty());
}

#[test]
fn test_missing_required_field_reports_row_and_column() {
    let rows = vec![row(json!({"country_id": "", "name": "Adjara"}))];
    let result = RowTransformer.transform(&rows, "regions").unwrap();

    assert!(result.accepted.is_empty());
    assert_eq!(
        result.error_messages(),
        vec!["Row 1: Missing required field \"country_id\""]
    );
    assert_eq!(result.errors[0].row, 1);
    assert_eq!(result.errors[0].column, "country_id");
    assert_eq!(result.errors[0].kind, RowErrorKind::MissingRequiredField);
}

#[test]
fn test_hotel_transforms() {
    let rows = vec![row(json!({
        "city_id": "c1",
        "name": "Hotel X",
        "stars": "5",
        "amenities": "wifi, pool"
    }))];
    let result = RowTransformer.transform(&rows, "hotels").unwrap();

    assert_eq!(result.accepted.len(), 1);
    let record = &result.accepted[0];
    assert_eq!(record.get("stars"), Some(&json!(5)));
    assert_eq!(record.get("amenities"), Some(&json!(["wifi", "pool"])));
    assert!(!record.contains_key("images"));
}

#[test]
fn test_all_column_errors_collected_per_row() {
    let rows = vec![row(json!({
        "hotel_id": "",
        "name": "",
        "capacity": "two",
        "price_per_night": "cheap"
    }))];
    let result = RowTransformer.transform(&rows, "room_types").unwrap();

    assert_eq!(
        result.error_messages(),
        vec![
            "Row 1: Missing required field \"hotel_id\"",
            "Row 1: Missing required field \"name\"",
            "Row 1: Invalid value for \"capacity\"",
            "Row 1: Invalid value for \"price_per_night\"",
        ]
    );
}

#[test]
fn test_accepted_preserves_input_order() {
    let rows: Vec<_> = ["A", "", "C", "", "E"]
        .iter()
        .map(|name| row(json!({ "name": name })))
        .collect();
    let result = RowTransformer.transform(&rows, "placements").unwrap();

    let names: Vec<_> = result
        .accepted
        .iter()
        .map(|r| r.get("name").and_then(|v| v.as_str()).unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, vec!["A", "C", "E"]);
    assert_eq!(result.total_rows, 5);
    assert_eq!(result.errors.len(), 2);
    assert_eq!(result.errors[1].row, 4);
}

#[test]
fn test_errors_empty_iff_every_row_accepted() {
    for entity in EntityType::ALL {
        let schema = lookup_schema(entity.as_str()).unwrap();
        // 只填必填列
        let mut full = serde_json::Map::new();
        for col in schema.required_columns() {
            full.insert(col.source.to_string(), json!("x"));
        }
        let rows = vec![full.clone(), full];

        let result = RowTransformer.transform(&rows, entity.as_str()).unwrap();
        assert!(result.is_clean(), "{} should be clean", entity);
        assert_eq!(result.valid_rows(), rows.len());
    }
}

#[test]
fn test_unknown_entity_type() {
    let result = RowTransformer.transform(&[], "foo");
    assert!(matches!(result, Err(ImportError::UnknownEntityType(ref name)) if name == "foo"));
}

#[test]
fn test_unsupported_format_before_rows() {
    let result = UniversalFileParser.decode(b"anything", "brochure.pdf");
    assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
}

#[test]
fn test_comma_only_csv_row_keeps_row_numbers() {
    let table = UniversalFileParser
        .decode(b"name,code\nGeorgia,GE\n,\n,AM\n", "countries.csv")
        .unwrap();
    let result = RowTransformer.transform(&table.rows, "countries").unwrap();

    assert_eq!(result.total_rows, 3);
    assert_eq!(
        result.error_messages(),
        vec![
            "Row 2: Missing required field \"name\"",
            "Row 3: Missing required field \"name\"",
        ]
    );
}

#[test]
fn test_whitespace_only_csv_cell_counts_as_missing() {
    let table = UniversalFileParser
        .decode(b"name,code\n   ,GE\n", "countries.csv")
        .unwrap();
    let result = RowTransformer.transform(&table.rows, "countries").unwrap();
    assert_eq!(result.valid_rows(), 0);
    assert_eq!(result.error_messages(), vec!["Row 1: Missing required field \"name\""]);
}
