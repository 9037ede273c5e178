// ==========================================
// 旅游后台批量导入 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 输出: ParsedTable（表头 + 行映射 + 前 10 行预览）
// ==========================================

use crate::domain::table::{ParsedTable, RawRow};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::FileParser;
use calamine::{Data, Range, Reader, Xls, Xlsx};
use csv::{ReaderBuilder, Trim};
use serde_json::{Number, Value};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::{debug, info, warn};

const UTF8_BOM: char = '\u{feff}';

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<ParsedTable> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .trim(Trim::All)
            .from_reader(bytes);

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches(UTF8_BOM).trim().to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::EmptyInput("CSV 文件无表头".to_string()));
        }

        // 读取所有行
        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;

            // 仅跳过空行（无单元格或单个空字段）；",," 这类行保留，行号与源文件一致
            if record.iter().all(str::is_empty) && record.len() <= 1 {
                continue;
            }

            let mut row = RawRow::new();

            // 短行只映射已有单元格，保证键是表头子集
            for (header, value) in headers.iter().zip(record.iter()) {
                if header.is_empty() {
                    continue;
                }
                row.insert(header.clone(), Value::String(value.to_string()));
            }

            rows.push(row);
        }

        debug!(columns = headers.len(), rows = rows.len(), "CSV 解析完成");
        Ok(ParsedTable::new(headers, rows))
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================

/// Excel 文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExcelFormat {
    Xlsx,
    Xls,
}

pub struct ExcelParser {
    format: ExcelFormat,
}

impl ExcelParser {
    pub fn new(format: ExcelFormat) -> Self {
        Self { format }
    }

    /// 读取第一个工作表
    fn first_sheet_range(&self, bytes: &[u8]) -> ImportResult<Range<Data>> {
        let cursor = Cursor::new(bytes);
        match self.format {
            ExcelFormat::Xlsx => {
                let mut workbook: Xlsx<_> = Xlsx::new(cursor)?;
                first_worksheet(&mut workbook)
            }
            ExcelFormat::Xls => {
                let mut workbook: Xls<_> = Xls::new(cursor)?;
                first_worksheet(&mut workbook)
            }
        }
    }
}

fn first_worksheet<RS, R>(workbook: &mut R) -> ImportResult<Range<Data>>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: std::fmt::Display,
{
    match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| ImportError::ExcelParseError(e.to_string())),
        None => Err(ImportError::EmptyInput("Excel 文件无工作表".to_string())),
    }
}

impl FileParser for ExcelParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<ParsedTable> {
        let range = self.first_sheet_range(bytes)?;
        if range.is_empty() {
            return Err(ImportError::EmptyInput("Excel 工作表为空".to_string()));
        }

        // 提取表头（第一行）
        let mut sheet_rows = range.rows();
        let header_row = sheet_rows
            .next()
            .ok_or_else(|| ImportError::EmptyInput("Excel 工作表为空".to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::EmptyInput("Excel 文件无表头".to_string()));
        }

        // 读取数据行：按位置与表头对齐，空单元格保留为 null
        let mut rows = Vec::new();
        for data_row in sheet_rows {
            let mut row = RawRow::new();

            for (col_idx, header) in headers.iter().enumerate() {
                if header.is_empty() {
                    continue;
                }
                let value = data_row.get(col_idx).map(cell_to_value).unwrap_or(Value::Null);
                row.insert(header.clone(), value);
            }

            // 跳过完全空白的行
            if row.values().all(is_blank_cell) {
                continue;
            }

            rows.push(row);
        }

        debug!(columns = headers.len(), rows = rows.len(), "Excel 解析完成");
        Ok(ParsedTable::new(headers, rows))
    }
}

/// Excel 单元格 → JSON 值
fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => Value::String(s.trim().to_string()),
        Data::Int(v) => Value::from(*v),
        Data::Float(v) => Number::from_f64(*v).map(Value::Number).unwrap_or(Value::Null),
        Data::Bool(v) => Value::Bool(*v),
        // 日期/时间单元格按 Excel 序列号文本输出，当前实体配置没有日期列
        other => Value::String(other.to_string()),
    }
}

fn is_blank_cell(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    /// 根据文件名扩展名选择解析器
    ///
    /// # 返回
    /// - Err(ImportError::UnsupportedFormat): 扩展名不是 csv/xlsx/xls（不读取内容）
    pub fn parser_for(file_name: &str) -> ImportResult<Box<dyn FileParser>> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => Ok(Box::new(CsvParser)),
            "xlsx" => Ok(Box::new(ExcelParser::new(ExcelFormat::Xlsx))),
            "xls" => Ok(Box::new(ExcelParser::new(ExcelFormat::Xls))),
            _ => {
                warn!(file_name = %file_name, "文件格式不支持");
                Err(ImportError::UnsupportedFormat(if ext.is_empty() {
                    file_name.to_string()
                } else {
                    ext
                }))
            }
        }
    }

    /// 解析上传文件内容
    ///
    /// # 参数
    /// - bytes: 文件内容
    /// - file_name: 原始文件名（用于判断格式）
    pub fn decode(&self, bytes: &[u8], file_name: &str) -> ImportResult<ParsedTable> {
        let parser = Self::parser_for(file_name)?;

        if bytes.is_empty() {
            return Err(ImportError::EmptyInput(format!("文件 {} 无内容", file_name)));
        }

        let table = parser.parse_bytes(bytes)?;
        info!(
            file_name = %file_name,
            columns = table.headers.len(),
            rows = table.total_rows(),
            "文件解析完成"
        );
        Ok(table)
    }

    /// 从本地路径读取并解析
    pub fn decode_path<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ParsedTable> {
        let path = file_path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        // 先校验扩展名，避免读取不支持的文件
        Self::parser_for(&file_name)?;

        let bytes = std::fs::read(path)?;
        self.decode(&bytes, &file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use serde_json::json;

    fn decode(content: &str, file_name: &str) -> ImportResult<ParsedTable> {
        UniversalFileParser.decode(content.as_bytes(), file_name)
    }

    #[test]
    fn test_csv_basic() {
        let table = decode("name,code\nGeorgia,GE\n", "countries.csv").unwrap();

        assert_eq!(table.headers, vec!["name".to_string(), "code".to_string()]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].get("name"), Some(&json!("Georgia")));
        assert_eq!(table.rows[0].get("code"), Some(&json!("GE")));
        assert_eq!(table.preview, table.rows);
    }

    #[test]
    fn test_csv_skip_empty_rows() {
        let table = decode("name,code\nGeorgia,GE\n\n\nArmenia,AM\n", "c.csv").unwrap();
        // 应跳过空行
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].get("name"), Some(&json!("Armenia")));
    }

    #[test]
    fn test_csv_comma_only_row_kept() {
        let table = decode("name,code\nGeorgia,GE\n,\n,AM\n", "c.csv").unwrap();

        // "," 行不是空行，保留为一条全空记录
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[1].get("name"), Some(&json!("")));
        assert_eq!(table.rows[1].get("code"), Some(&json!("")));
        assert_eq!(table.rows[2].get("code"), Some(&json!("AM")));
    }

    #[test]
    fn test_csv_bom_and_whitespace() {
        let table = decode("\u{feff} name , code \n Georgia , GE \n", "c.csv").unwrap();
        assert_eq!(table.headers, vec!["name".to_string(), "code".to_string()]);
        assert_eq!(table.rows[0].get("name"), Some(&json!("Georgia")));
    }

    #[test]
    fn test_csv_short_row_keys_subset() {
        let table = decode("name,name_ka,code\nGeorgia\n", "c.csv").unwrap();
        assert_eq!(table.rows[0].len(), 1);
        assert!(table.keys_within_headers());
    }

    #[test]
    fn test_csv_quoted_commas_kept() {
        let table = decode("name,amenities\n\"Hotel X\",\"wifi, pool\"\n", "h.csv").unwrap();
        assert_eq!(table.rows[0].get("amenities"), Some(&json!("wifi, pool")));
    }

    #[test]
    fn test_csv_header_only() {
        let table = decode("name,code\n", "c.csv").unwrap();
        assert!(table.rows.is_empty());
        assert!(table.preview.is_empty());
    }

    #[test]
    fn test_csv_empty_input() {
        assert!(matches!(decode("", "c.csv"), Err(ImportError::EmptyInput(_))));
        assert!(matches!(decode("\n\n", "c.csv"), Err(ImportError::EmptyInput(_))));
    }

    #[test]
    fn test_unsupported_format() {
        match decode("%PDF-1.4", "tours.pdf") {
            Err(ImportError::UnsupportedFormat(ext)) => assert_eq!(ext, "pdf"),
            other => panic!("Expected UnsupportedFormat, got {:?}", other),
        }
        assert!(matches!(
            decode("name\nx\n", "no_extension"),
            Err(ImportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_extension_case_insensitive() {
        assert!(decode("name\nGeorgia\n", "COUNTRIES.CSV").is_ok());
    }

    fn build_xlsx(write: impl FnOnce(&mut rust_xlsxwriter::Worksheet)) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        write(sheet);
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_xlsx_positional_empty_cells() {
        let bytes = build_xlsx(|sheet| {
            sheet.write_string(0, 0, "name").unwrap();
            sheet.write_string(0, 1, "name_ka").unwrap();
            sheet.write_string(0, 2, "code").unwrap();
            sheet.write_string(1, 0, "Georgia").unwrap();
            // (1, 1) 留空
            sheet.write_string(1, 2, "GE").unwrap();
        });

        let table = UniversalFileParser.decode(&bytes, "countries.xlsx").unwrap();

        assert_eq!(table.headers, vec!["name", "name_ka", "code"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].get("name_ka"), Some(&Value::Null));
        assert_eq!(table.rows[0].get("code"), Some(&json!("GE")));
    }

    #[test]
    fn test_xlsx_numbers_and_blank_rows() {
        let bytes = build_xlsx(|sheet| {
            sheet.write_string(0, 0, "name").unwrap();
            sheet.write_string(0, 1, "stars").unwrap();
            sheet.write_string(1, 0, "Hotel X").unwrap();
            sheet.write_number(1, 1, 5).unwrap();
            // 第 3 行整行空白
            sheet.write_string(3, 0, "Hotel Y").unwrap();
        });

        let table = UniversalFileParser.decode(&bytes, "hotels.xlsx").unwrap();

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].get("stars"), Some(&json!(5.0)));
        assert_eq!(table.rows[1].get("name"), Some(&json!("Hotel Y")));
    }

    #[test]
    fn test_xlsx_empty_worksheet() {
        let bytes = build_xlsx(|_sheet| {});
        let result = UniversalFileParser.decode(&bytes, "empty.xlsx");
        assert!(matches!(result, Err(ImportError::EmptyInput(_))));
    }

    #[test]
    fn test_xlsx_reads_first_sheet_only() {
        let mut workbook = Workbook::new();
        let first = workbook.add_worksheet();
        first.write_string(0, 0, "name").unwrap();
        first.write_string(1, 0, "First").unwrap();
        let second = workbook.add_worksheet();
        second.write_string(0, 0, "name").unwrap();
        second.write_string(1, 0, "Second").unwrap();
        second.write_string(2, 0, "Third").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let table = UniversalFileParser.decode(&bytes, "placements.xlsx").unwrap();

        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].get("name"), Some(&json!("First")));
    }

    #[test]
    fn test_xls_corrupted() {
        let result = UniversalFileParser.decode(b"not an ole2 compound file", "legacy.xls");
        assert!(matches!(result, Err(ImportError::ExcelParseError(_))));
    }

    #[test]
    fn test_xlsx_corrupted() {
        let result = UniversalFileParser.decode(b"not a zip archive", "broken.xlsx");
        assert!(matches!(result, Err(ImportError::ExcelParseError(_))));
    }

    #[test]
    fn test_decode_path() {
        use std::io::Write;
        let mut temp_file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(temp_file, "name,code").unwrap();
        writeln!(temp_file, "Georgia,GE").unwrap();

        let table = UniversalFileParser.decode_path(temp_file.path()).unwrap();
        assert_eq!(table.rows.len(), 1);
    }
}
