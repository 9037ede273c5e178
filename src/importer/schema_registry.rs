// ==========================================
// 旅游后台批量导入 - 实体配置表
// ==========================================
// 职责: 每种可导入实体一条配置（目标集合 + 列映射 + 必填 + 转换）
// 生命周期: 进程级静态配置，只读
// ==========================================

use crate::domain::types::EntityType;
use crate::importer::error::ImportResult;
use crate::importer::value_transform::TransformKind;
use serde::Serialize;

/// 列配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    /// 源文件列名
    pub source: &'static str,
    /// 目标字段名
    pub target: &'static str,
    /// 是否必填
    pub required: bool,
    /// 值转换
    pub transform: TransformKind,
}

impl ColumnSpec {
    const fn text(name: &'static str) -> Self {
        Self {
            source: name,
            target: name,
            required: false,
            transform: TransformKind::Identity,
        }
    }

    const fn required(name: &'static str) -> Self {
        Self {
            source: name,
            target: name,
            required: true,
            transform: TransformKind::Identity,
        }
    }

    const fn with(name: &'static str, transform: TransformKind) -> Self {
        Self {
            source: name,
            target: name,
            required: false,
            transform,
        }
    }
}

/// 实体配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntitySchema {
    /// 实体类型
    pub entity_type: EntityType,
    /// 目标集合（表）名
    pub collection: &'static str,
    /// 列配置（有序）
    pub columns: &'static [ColumnSpec],
}

impl EntitySchema {
    /// 必填列
    pub fn required_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|c| c.required)
    }
}

// ==========================================
// 静态配置表
// ==========================================

const COUNTRY_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::required("name"),
    ColumnSpec::text("name_ka"),
    ColumnSpec::text("code"),
];

const REGION_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::required("country_id"),
    ColumnSpec::required("name"),
    ColumnSpec::text("name_ka"),
    ColumnSpec::text("description"),
];

const CITY_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::required("region_id"),
    ColumnSpec::required("name"),
    ColumnSpec::text("name_ka"),
    ColumnSpec::text("description"),
    ColumnSpec::with("latitude", TransformKind::ParseFloat),
    ColumnSpec::with("longitude", TransformKind::ParseFloat),
];

const HOTEL_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::required("city_id"),
    ColumnSpec::required("name"),
    ColumnSpec::text("name_ka"),
    ColumnSpec::text("description"),
    ColumnSpec::text("address"),
    ColumnSpec::with("stars", TransformKind::ParseInt),
    ColumnSpec::with("amenities", TransformKind::SplitTrim),
    ColumnSpec::with("images", TransformKind::SplitTrim),
];

const ROOM_TYPE_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::required("hotel_id"),
    ColumnSpec::required("name"),
    ColumnSpec::text("name_ka"),
    ColumnSpec::text("description"),
    ColumnSpec::with("capacity", TransformKind::ParseInt),
    ColumnSpec::with("price_per_night", TransformKind::ParseFloat),
];

const PLACEMENT_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::required("name"),
    ColumnSpec::text("description"),
];

static SCHEMAS: [EntitySchema; 6] = [
    EntitySchema {
        entity_type: EntityType::Countries,
        collection: "countries",
        columns: COUNTRY_COLUMNS,
    },
    EntitySchema {
        entity_type: EntityType::Regions,
        collection: "regions",
        columns: REGION_COLUMNS,
    },
    EntitySchema {
        entity_type: EntityType::Cities,
        collection: "cities",
        columns: CITY_COLUMNS,
    },
    EntitySchema {
        entity_type: EntityType::Hotels,
        collection: "hotels",
        columns: HOTEL_COLUMNS,
    },
    EntitySchema {
        entity_type: EntityType::RoomTypes,
        collection: "room_types",
        columns: ROOM_TYPE_COLUMNS,
    },
    EntitySchema {
        entity_type: EntityType::Placements,
        collection: "placements",
        columns: PLACEMENT_COLUMNS,
    },
];

// ==========================================
// 查询接口
// ==========================================

/// 全部实体配置
pub fn all_schemas() -> &'static [EntitySchema] {
    &SCHEMAS
}

/// 按实体类型取配置
pub fn schema_for(entity_type: EntityType) -> &'static EntitySchema {
    // 下标与 SCHEMAS 声明顺序一致
    let idx = match entity_type {
        EntityType::Countries => 0,
        EntityType::Regions => 1,
        EntityType::Cities => 2,
        EntityType::Hotels => 3,
        EntityType::RoomTypes => 4,
        EntityType::Placements => 5,
    };
    &SCHEMAS[idx]
}

/// 按名称查找实体配置
///
/// # 返回
/// - Ok(&EntitySchema): 找到配置
/// - Err(ImportError::UnknownEntityType): 名称不在固定集合内
pub fn lookup_schema(entity_type: &str) -> ImportResult<&'static EntitySchema> {
    let kind: EntityType = entity_type.parse()?;
    Ok(schema_for(kind))
}

/// 按集合名查找实体配置（仓储层列白名单使用）
pub fn schema_for_collection(collection: &str) -> Option<&'static EntitySchema> {
    SCHEMAS.iter().find(|s| s.collection == collection)
}
