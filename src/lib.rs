// ==========================================
// 旅游后台批量导入 - 核心库
// ==========================================
// 管道: 文件解析 → 列映射/校验 → 整批事务写入
// 技术栈: Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体类型与表格结构
pub mod domain;

// 导入层 - 文件解析、实体配置、行转换
pub mod importer;

// 数据仓储层 - 整批写入
pub mod repository;

// 配置层 - 导入配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 预览/提交边界
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{EntityRecord, EntityType, ImportPhase, ParsedTable, RawRow, User};

// 导入器
pub use importer::{
    lookup_schema, ColumnSpec, EntitySchema, ImportError, RowError, RowTransformer,
    TransformKind, TransformResult, UniversalFileParser,
};

// 仓储
pub use repository::{BulkInsertRepository, BulkInsertRepositoryImpl, RepositoryError};

// 配置
pub use config::{ConfigManager, ImportConfigReader, StaticImportConfig};

// API
pub use api::{ApiError, AuthProvider, ImportApi, StaticAuthProvider};

// ==========================================
// 系统常量
// ==========================================

/// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 系统名称
pub const APP_NAME: &str = "旅游后台批量导入";
