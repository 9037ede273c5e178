// ==========================================
// 旅游后台批量导入 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 行级校验错误不走此类型（见 row_transformer::RowError）
// ==========================================

use crate::domain::types::{ImportPhase, UnknownEntityType};
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件内容为空: {0}")]
    EmptyInput(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 配置表错误 =====
    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),

    // ===== 阶段状态机错误 =====
    #[error("无效的导入阶段转换: from={from} to={to}")]
    InvalidPhaseTransition { from: ImportPhase, to: ImportPhase },
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::XlsxError>
impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

// 实现 From<calamine::XlsError>
impl From<calamine::XlsError> for ImportError {
    fn from(err: calamine::XlsError) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

impl From<UnknownEntityType> for ImportError {
    fn from(err: UnknownEntityType) -> Self {
        ImportError::UnknownEntityType(err.0)
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

/// 推进导入阶段（非法转换返回错误）
pub fn advance_phase(from: ImportPhase, to: ImportPhase) -> ImportResult<ImportPhase> {
    if from.can_transition_to(to) {
        Ok(to)
    } else {
        Err(ImportError::InvalidPhaseTransition { from, to })
    }
}
