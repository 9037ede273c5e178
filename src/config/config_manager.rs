// ==========================================
// 旅游后台批量导入 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)，缺失时回退默认值
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::import_config_trait::{
    ImportConfigReader, DEFAULT_MAX_ROWS, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PREVIEW_ROW_LIMIT,
};
use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    pub const PREVIEW_ROW_LIMIT: &str = "import/preview_row_limit";
    pub const MAX_UPLOAD_BYTES: &str = "import/max_upload_bytes";
    pub const MAX_ROWS: &str = "import/max_rows";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| ConfigError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| ConfigError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)
                .map_err(|e| ConfigError::DatabaseConnectionError(e.to_string()))?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;

        conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|e| ConfigError::ConfigReadError {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    /// 写入 global scope 配置（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )
        .map_err(|e| ConfigError::ConfigReadError {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        tracing::info!(key = %key, value = %value, "配置已更新");
        Ok(())
    }

    /// 读取正整数配置，缺失时使用默认值
    fn get_positive_usize(&self, key: &str, default: usize) -> ConfigResult<usize> {
        match self.get_global_config_value(key)? {
            None => Ok(default),
            Some(raw) => parse_positive_usize(key, &raw),
        }
    }
}

fn parse_positive_usize(key: &str, raw: &str) -> ConfigResult<usize> {
    match raw.trim().parse::<usize>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(ConfigError::ConfigValueError {
            key: key.to_string(),
            value: raw.to_string(),
            message: "需要正整数".to_string(),
        }),
    }
}

#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_preview_row_limit(&self) -> ConfigResult<usize> {
        self.get_positive_usize(config_keys::PREVIEW_ROW_LIMIT, DEFAULT_PREVIEW_ROW_LIMIT)
    }

    async fn get_max_upload_bytes(&self) -> ConfigResult<usize> {
        self.get_positive_usize(config_keys::MAX_UPLOAD_BYTES, DEFAULT_MAX_UPLOAD_BYTES)
    }

    async fn get_max_rows(&self) -> ConfigResult<usize> {
        self.get_positive_usize(config_keys::MAX_ROWS, DEFAULT_MAX_ROWS)
    }
}
