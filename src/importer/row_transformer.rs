// ==========================================
// 旅游后台批量导入 - 行转换/校验器
// ==========================================
// 职责: 原始行 → 实体记录（列映射 + 必填校验 + 值转换）
// 规则:
// - 行内不短路：收集该行所有列错误
// - 任一列出错的行不进入 accepted，但错误保留在汇总列表
// - 可选列缺失时不写入目标字段（不写 null）
// - 行号从 1 开始
// ==========================================

use crate::domain::table::{EntityRecord, RawRow};
use crate::importer::error::ImportResult;
use crate::importer::importer_trait::RowValidator;
use crate::importer::schema_registry::{lookup_schema, EntitySchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{debug, info};

// ==========================================
// 行级错误
// ==========================================

/// 行级错误类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowErrorKind {
    MissingRequiredField,
    InvalidValue,
}

/// 行级错误（行号 + 源列名）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// 行号（从 1 开始）
    pub row: usize,
    /// 源文件列名
    pub column: String,
    pub kind: RowErrorKind,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            RowErrorKind::MissingRequiredField => {
                write!(f, "Row {}: Missing required field \"{}\"", self.row, self.column)
            }
            RowErrorKind::InvalidValue => {
                write!(f, "Row {}: Invalid value for \"{}\"", self.row, self.column)
            }
        }
    }
}

// ==========================================
// 转换结果
// ==========================================

/// 转换结果
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransformResult {
    /// 输入行数
    pub total_rows: usize,
    /// 可落库记录（保持输入顺序，跳过无效行）
    pub accepted: Vec<EntityRecord>,
    /// 行级错误（按行号、列顺序）
    pub errors: Vec<RowError>,
}

impl TransformResult {
    /// 有效行数
    pub fn valid_rows(&self) -> usize {
        self.accepted.len()
    }

    /// 是否全部通过
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// 错误消息列表（对外展示格式）
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// 空值判定：null / 空字符串（键不存在由调用方处理）
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

// ==========================================
// RowTransformer
// ==========================================
pub struct RowTransformer;

impl RowTransformer {
    /// 按实体类型名转换
    ///
    /// # 返回
    /// - Ok(TransformResult): 转换结果（行级错误不会导致 Err）
    /// - Err(ImportError::UnknownEntityType): 实体类型不存在
    pub fn transform(&self, rows: &[RawRow], entity_type: &str) -> ImportResult<TransformResult> {
        let schema = lookup_schema(entity_type)?;
        Ok(self.transform_with_schema(rows, schema))
    }

    /// 按给定配置转换
    pub fn transform_with_schema(&self, rows: &[RawRow], schema: &EntitySchema) -> TransformResult {
        let mut accepted = Vec::with_capacity(rows.len());
        let mut errors = Vec::new();

        for (idx, row) in rows.iter().enumerate() {
            if let Some(record) = Self::transform_row(row, idx + 1, schema, &mut errors) {
                accepted.push(record);
            }
        }

        info!(
            entity_type = %schema.entity_type,
            total = rows.len(),
            valid = accepted.len(),
            errors = errors.len(),
            "行转换完成"
        );

        TransformResult {
            total_rows: rows.len(),
            accepted,
            errors,
        }
    }

    /// 转换单行；该行有任何错误时返回 None
    fn transform_row(
        row: &RawRow,
        row_number: usize,
        schema: &EntitySchema,
        errors: &mut Vec<RowError>,
    ) -> Option<EntityRecord> {
        let mut record = EntityRecord::new();
        let mut has_error = false;

        for col in schema.columns {
            let value = match row.get(col.source) {
                Some(v) if !is_blank(v) => v,
                _ => {
                    if col.required {
                        debug!(row = row_number, column = col.source, "必填字段缺失");
                        errors.push(RowError {
                            row: row_number,
                            column: col.source.to_string(),
                            kind: RowErrorKind::MissingRequiredField,
                        });
                        has_error = true;
                    }
                    continue;
                }
            };

            match col.transform.apply(value) {
                Ok(converted) => {
                    record.insert(col.target.to_string(), converted);
                }
                Err(e) => {
                    debug!(row = row_number, column = col.source, error = %e, "字段值转换失败");
                    errors.push(RowError {
                        row: row_number,
                        column: col.source.to_string(),
                        kind: RowErrorKind::InvalidValue,
                    });
                    has_error = true;
                }
            }
        }

        (!has_error).then_some(record)
    }
}

impl RowValidator for RowTransformer {
    fn transform_rows(&self, rows: &[RawRow], schema: &EntitySchema) -> TransformResult {
        self.transform_with_schema(rows, schema)
    }
}
