// ==========================================
// 旅游后台批量导入 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::error::ConfigResult;
use async_trait::async_trait;

/// 默认预览行数
pub const DEFAULT_PREVIEW_ROW_LIMIT: usize = 10;

/// 默认上传文件大小上限（字节）
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// 默认单批最大行数
pub const DEFAULT_MAX_ROWS: usize = 10_000;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）, StaticImportConfig（内存默认值）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取预览行数
    ///
    /// # 默认值
    /// - 10
    async fn get_preview_row_limit(&self) -> ConfigResult<usize>;

    /// 获取上传文件大小上限（字节）
    ///
    /// # 默认值
    /// - 10 MiB
    ///
    /// # 用途
    /// - 超限文件在解析前直接拒绝
    async fn get_max_upload_bytes(&self) -> ConfigResult<usize>;

    /// 获取单批最大行数
    ///
    /// # 默认值
    /// - 10000
    ///
    /// # 用途
    /// - 超限批次在转换前直接拒绝
    async fn get_max_rows(&self) -> ConfigResult<usize>;
}

// ==========================================
// StaticImportConfig - 内存配置
// ==========================================
/// 不依赖数据库的固定配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticImportConfig {
    pub preview_row_limit: usize,
    pub max_upload_bytes: usize,
    pub max_rows: usize,
}

impl Default for StaticImportConfig {
    fn default() -> Self {
        Self {
            preview_row_limit: DEFAULT_PREVIEW_ROW_LIMIT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_rows: DEFAULT_MAX_ROWS,
        }
    }
}

#[async_trait]
impl ImportConfigReader for StaticImportConfig {
    async fn get_preview_row_limit(&self) -> ConfigResult<usize> {
        Ok(self.preview_row_limit)
    }

    async fn get_max_upload_bytes(&self) -> ConfigResult<usize> {
        Ok(self.max_upload_bytes)
    }

    async fn get_max_rows(&self) -> ConfigResult<usize> {
        Ok(self.max_rows)
    }
}
