// ==========================================
// 旅游后台批量导入 - 导入组件 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 管道: 文件解析 → 行转换/校验 → 落库（见 repository）
// ==========================================

use crate::domain::table::{ParsedTable, RawRow};
use crate::importer::error::ImportResult;
use crate::importer::row_transformer::TransformResult;
use crate::importer::schema_registry::EntitySchema;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析上传文件内容为统一表格
    ///
    /// # 参数
    /// - bytes: 文件内容
    ///
    /// # 返回
    /// - Ok(ParsedTable): 表头 + 行记录 + 预览
    /// - Err: 内容为空、格式损坏
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<ParsedTable>;
}

// ==========================================
// RowValidator Trait
// ==========================================
// 用途: 行转换/校验接口（阶段 1）
// 实现者: RowTransformer
pub trait RowValidator: Send + Sync {
    /// 按实体配置转换原始行
    ///
    /// # 参数
    /// - rows: 原始行记录
    /// - schema: 实体配置
    ///
    /// # 返回
    /// - TransformResult: 可落库记录 + 行级错误（行级错误不中断整批）
    fn transform_rows(&self, rows: &[RawRow], schema: &EntitySchema) -> TransformResult;
}
