// ==========================================
// 旅游后台批量导入 - API层错误类型
// ==========================================
// 职责: 定义边界错误类型，转换导入/仓储/配置错误为调用方可处理的错误
// 约束: 所有错误信息必须包含显式原因（行号、列名或底层消息）
// ==========================================

use crate::config::error::ConfigError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use serde::Serialize;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 边界错误
    // ==========================================
    #[error("Unauthorized")]
    Unauthorized,

    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),

    // ==========================================
    // 文件错误
    // ==========================================
    #[error("文件格式不支持: {0}")]
    UnsupportedFormat(String),

    #[error("文件内容为空: {0}")]
    EmptyInput(String),

    #[error("文件解析失败: {0}")]
    FileDecodeError(String),

    // ==========================================
    // 提交错误
    // ==========================================
    /// 提交闸门：整批拒绝，未写入任何数据
    #[error("数据校验失败: {} 个错误", .errors.len())]
    ValidationFailed { errors: Vec<String> },

    /// 存储协作方失败（原样透出底层消息）
    #[error("数据写入失败: {0}")]
    PersistenceFailed(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ApiError {
    /// 稳定错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::UnknownEntityType(_) => "UNKNOWN_ENTITY_TYPE",
            ApiError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            ApiError::EmptyInput(_) => "EMPTY_INPUT",
            ApiError::FileDecodeError(_) => "FILE_DECODE_ERROR",
            ApiError::ValidationFailed { .. } => "VALIDATION_FAILED",
            ApiError::PersistenceFailed(_) => "PERSISTENCE_FAILED",
            ApiError::ConfigError(_) => "CONFIG_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// 对应 HTTP 状态码
    pub fn http_status(&self) -> u16 {
        match self {
            ApiError::Unauthorized => 401,
            ApiError::InvalidInput(_)
            | ApiError::UnknownEntityType(_)
            | ApiError::UnsupportedFormat(_)
            | ApiError::EmptyInput(_)
            | ApiError::FileDecodeError(_)
            | ApiError::ValidationFailed { .. } => 400,
            ApiError::PersistenceFailed(_) | ApiError::ConfigError(_) | ApiError::InternalError(_) => 500,
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::UnsupportedFormat(ext) => ApiError::UnsupportedFormat(ext),
            ImportError::EmptyInput(msg) => ApiError::EmptyInput(msg),
            ImportError::CsvParseError(msg)
            | ImportError::ExcelParseError(msg)
            | ImportError::FileReadError(msg) => ApiError::FileDecodeError(msg),
            ImportError::UnknownEntityType(name) => ApiError::UnknownEntityType(name),
            ImportError::InvalidPhaseTransition { from, to } => {
                ApiError::InternalError(format!("无效的导入阶段转换: {} -> {}", from, to))
            }
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// 存储层的任何失败都归为 PersistenceFailed
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        ApiError::PersistenceFailed(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// 错误响应体
// ==========================================

/// 错误响应（JSON）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub error: String,

    /// 行级错误列表（仅校验失败时）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,

    /// 详细信息（可选）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            code: err.code().to_string(),
            error: err.to_string(),
            errors: match err {
                ApiError::ValidationFailed { errors } => Some(errors.clone()),
                _ => None,
            },
            details: match err {
                ApiError::ValidationFailed { errors } => {
                    Some(serde_json::json!({ "error_count": errors.len() }))
                }
                ApiError::PersistenceFailed(msg) => Some(serde_json::json!({ "message": msg })),
                _ => None,
            },
        }
    }
}

/// 将 ApiError 转换为 JSON 字符串
pub fn map_api_error(err: &ApiError) -> String {
    serde_json::to_string(&ErrorResponse::from(err)).unwrap_or_else(|_| err.to_string())
}
