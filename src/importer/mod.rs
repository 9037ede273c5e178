// ==========================================
// 旅游后台批量导入 - 导入层
// ==========================================
// 职责: 上传文件 → 统一表格 → 实体记录
// 支持: Excel (.xlsx/.xls), CSV
// ==========================================

// 模块声明
pub mod error;
pub mod file_parser;
pub mod importer_trait;
pub mod row_transformer;
pub mod schema_registry;
pub mod value_transform;

// 重导出核心类型
pub use error::{advance_phase, ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelFormat, ExcelParser, UniversalFileParser};
pub use row_transformer::{RowError, RowErrorKind, RowTransformer, TransformResult};
pub use schema_registry::{all_schemas, lookup_schema, schema_for, ColumnSpec, EntitySchema};
pub use value_transform::{TransformError, TransformKind};

// 重导出 Trait 接口
pub use importer_trait::{FileParser, RowValidator};
