// ==========================================
// 旅游后台批量导入 - 领域模型层
// ==========================================
// 职责: 定义实体类型、表格结构、导入阶段、当前用户
// 红线: 不含数据访问逻辑,不含解析/校验逻辑
// ==========================================

pub mod table;
pub mod types;
pub mod user;

// 重导出核心类型
pub use table::{headers_from_rows, EntityRecord, ParsedTable, RawRow, DEFAULT_PREVIEW_ROWS};
pub use types::{EntityType, ImportPhase, UnknownEntityType};
pub use user::User;
