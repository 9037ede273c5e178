// ==========================================
// 旅游后台批量导入 - 配置层
// ==========================================
// 职责: 导入相关配置（预览行数、上传大小、批次行数上限）
// 存储: config_kv 表，缺失时使用默认值
// ==========================================

pub mod config_manager;
pub mod error;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use import_config_trait::{
    ImportConfigReader, StaticImportConfig, DEFAULT_MAX_ROWS, DEFAULT_MAX_UPLOAD_BYTES,
    DEFAULT_PREVIEW_ROW_LIMIT,
};
