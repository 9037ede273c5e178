// ==========================================
// 旅游后台批量导入 - 列值转换
// ==========================================
// 职责: 单列原始值 → 目标值的纯函数转换
// 转换种类: Identity / ParseInt / ParseFloat / SplitTrim
// 红线: 不修改输入，无法转换时返回错误（不返回哨兵值）
// ==========================================

use serde::Serialize;
use serde_json::{Number, Value};
use thiserror::Error;

/// 转换种类（静态可序列化，替代按实体注册的运行时闭包）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransformKind {
    /// 原样复制
    #[default]
    Identity,
    /// 整数解析
    ParseInt,
    /// 浮点数解析
    ParseFloat,
    /// 逗号分隔字符串 → 去空白字符串列表
    SplitTrim,
}

/// 转换失败
#[derive(Error, Debug, Clone, PartialEq)]
#[error("无法将 {value} 转换为 {kind:?}")]
pub struct TransformError {
    pub kind: TransformKind,
    pub value: String,
}

impl TransformError {
    fn new(kind: TransformKind, value: &Value) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl TransformKind {
    /// 对单个原始值执行转换
    ///
    /// # 参数
    /// - raw: 原始值（调用方保证非缺失）
    ///
    /// # 返回
    /// - Ok(Value): 转换后的值
    /// - Err(TransformError): 值无法转换
    pub fn apply(&self, raw: &Value) -> Result<Value, TransformError> {
        match self {
            TransformKind::Identity => Ok(raw.clone()),
            TransformKind::ParseInt => parse_int(raw)
                .map(Value::from)
                .ok_or_else(|| TransformError::new(*self, raw)),
            TransformKind::ParseFloat => parse_float(raw)
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| TransformError::new(*self, raw)),
            TransformKind::SplitTrim => {
                split_trim(raw).ok_or_else(|| TransformError::new(*self, raw))
            }
        }
    }
}

/// 整数解析：接受整数、小数部分为 0 的浮点数、以及对应的文本
fn parse_int(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral_f64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral_f64))
        }
        _ => None,
    }
}

fn integral_f64(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// 浮点数解析：拒绝 NaN / 无穷大
fn parse_float(raw: &Value) -> Option<f64> {
    let f = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    f.is_finite().then_some(f)
}

/// 逗号分隔 → 列表；丢弃空片段
fn split_trim(raw: &Value) -> Option<Value> {
    let items: Vec<Value> = match raw {
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| Value::String(part.to_string()))
            .collect(),
        Value::Array(values) => values
            .iter()
            .map(|v| match v {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect::<Option<Vec<String>>>()?
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(Value::String)
            .collect(),
        Value::Number(n) => vec![Value::String(n.to_string())],
        _ => return None,
    };
    Some(Value::Array(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identity_copies_value() {
        let raw = json!("Hotel X");
        assert_eq!(TransformKind::Identity.apply(&raw).unwrap(), raw);
    }

    #[test]
    fn test_parse_int_from_text() {
        assert_eq!(TransformKind::ParseInt.apply(&json!("5")).unwrap(), json!(5));
        assert_eq!(TransformKind::ParseInt.apply(&json!(" 12 ")).unwrap(), json!(12));
        assert_eq!(TransformKind::ParseInt.apply(&json!("3.0")).unwrap(), json!(3));
    }

    #[test]
    fn test_parse_int_from_excel_number() {
        // Excel 数值单元格读出为浮点
        assert_eq!(TransformKind::ParseInt.apply(&json!(4.0)).unwrap(), json!(4));
        assert_eq!(TransformKind::ParseInt.apply(&json!(7)).unwrap(), json!(7));
    }

    #[test]
    fn test_parse_int_rejects_garbage() {
        assert!(TransformKind::ParseInt.apply(&json!("five")).is_err());
        assert!(TransformKind::ParseInt.apply(&json!("4.5")).is_err());
        assert!(TransformKind::ParseInt.apply(&json!(true)).is_err());

        let err = TransformKind::ParseInt.apply(&json!("5 stars")).unwrap_err();
        assert_eq!(err.kind, TransformKind::ParseInt);
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(
            TransformKind::ParseFloat.apply(&json!("41.7151")).unwrap(),
            json!(41.7151)
        );
        assert_eq!(TransformKind::ParseFloat.apply(&json!(44.8)).unwrap(), json!(44.8));
        assert!(TransformKind::ParseFloat.apply(&json!("north")).is_err());
        assert!(TransformKind::ParseFloat.apply(&json!("NaN")).is_err());
        assert!(TransformKind::ParseFloat.apply(&json!("inf")).is_err());
    }

    #[test]
    fn test_split_trim() {
        assert_eq!(
            TransformKind::SplitTrim.apply(&json!("wifi, pool")).unwrap(),
            json!(["wifi", "pool"])
        );
        assert_eq!(
            TransformKind::SplitTrim.apply(&json!(" spa ,, gym ,")).unwrap(),
            json!(["spa", "gym"])
        );
        assert_eq!(
            TransformKind::SplitTrim.apply(&json!(["a.jpg ", " b.jpg"])).unwrap(),
            json!(["a.jpg", "b.jpg"])
        );
        assert!(TransformKind::SplitTrim.apply(&json!({"k": "v"})).is_err());
    }

    #[test]
    fn test_transform_does_not_mutate_input() {
        let raw = json!(" wifi , pool ");
        let before = raw.clone();
        let _ = TransformKind::SplitTrim.apply(&raw).unwrap();
        assert_eq!(raw, before);
    }
}
