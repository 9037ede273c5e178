// ==========================================
// 旅游后台批量导入 - 表格数据结构
// ==========================================
// 职责: 上传文件解析后的统一表格结构（表头 + 行映射）
// 生命周期: 每次上传创建，请求结束即丢弃
// ==========================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 原始行：表头 → 原始单元格值
pub type RawRow = Map<String, Value>;

/// 实体记录：目标字段 → 转换后的值（可直接落库）
pub type EntityRecord = Map<String, Value>;

/// 默认预览行数
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// 解析后的表格
///
/// 不变量: 每行的键都是 headers 的子集
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedTable {
    /// 表头（保持源文件顺序）
    pub headers: Vec<String>,
    /// 全部数据行
    pub rows: Vec<RawRow>,
    /// 前若干行（仅用于展示）
    pub preview: Vec<RawRow>,
}

impl ParsedTable {
    /// 以默认预览行数构建
    pub fn new(headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self::with_preview_limit(headers, rows, DEFAULT_PREVIEW_ROWS)
    }

    /// 指定预览行数构建
    pub fn with_preview_limit(headers: Vec<String>, rows: Vec<RawRow>, limit: usize) -> Self {
        let preview = rows.iter().take(limit).cloned().collect();
        Self {
            headers,
            rows,
            preview,
        }
    }

    /// 数据行数
    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    /// 校验不变量：行内不存在表头以外的键
    pub fn keys_within_headers(&self) -> bool {
        self.rows
            .iter()
            .all(|row| row.keys().all(|k| self.headers.iter().any(|h| h == k)))
    }
}

/// 从行集合推导表头（按首次出现顺序去重）
///
/// 用于请求只携带行数据、未携带表头的情况
pub fn headers_from_rows(rows: &[RawRow]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !headers.iter().any(|h| h == key) {
                headers.push(key.clone());
            }
        }
    }
    headers
}
