// ==========================================
// 旅游后台批量导入 - 批量写入 Repository 实现
// ==========================================
// 职责: 实现整批写入（使用 rusqlite，单事务）
// 约束: 列名只来自静态实体配置（白名单），值全部参数化
// ==========================================

use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::domain::table::EntityRecord;
use crate::importer::schema_registry::{schema_for_collection, EntitySchema};
use crate::repository::bulk_insert_repo::BulkInsertRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection, Transaction};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};
use uuid::Uuid;

// ==========================================
// BulkInsertRepositoryImpl
// ==========================================
pub struct BulkInsertRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl BulkInsertRepositoryImpl {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（会再次应用统一 PRAGMA，幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 统计集合记录数
    pub fn count_records(&self, collection: &str) -> RepositoryResult<i64> {
        let schema = Self::resolve_schema(collection)?;
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        let sql = format!("SELECT COUNT(*) FROM {}", schema.collection);
        let count = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count)
    }

    fn resolve_schema(collection: &str) -> RepositoryResult<&'static EntitySchema> {
        schema_for_collection(collection)
            .ok_or_else(|| RepositoryError::UnknownCollection(collection.to_string()))
    }

    /// 单事务写入整批（任一行失败则回滚）
    fn insert_all(&self, schema: &EntitySchema, records: &[EntityRecord]) -> RepositoryResult<usize> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let count = Self::insert_records_tx(&tx, schema, records)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(count)
    }

    /// 在事务中逐条插入
    fn insert_records_tx(
        tx: &Transaction,
        schema: &EntitySchema,
        records: &[EntityRecord],
    ) -> RepositoryResult<usize> {
        let now = Utc::now().to_rfc3339();
        let mut count = 0;

        for record in records {
            let mut columns: Vec<&str> = vec!["id", "created_at", "updated_at"];
            let mut values: Vec<SqlValue> = vec![
                SqlValue::Text(Uuid::new_v4().to_string()),
                SqlValue::Text(now.clone()),
                SqlValue::Text(now.clone()),
            ];

            for (field, value) in record {
                let column = schema
                    .columns
                    .iter()
                    .find(|c| c.target == field.as_str())
                    .ok_or_else(|| RepositoryError::UnknownColumn {
                        collection: schema.collection.to_string(),
                        column: field.clone(),
                    })?;
                columns.push(column.target);
                values.push(to_sql_value(value));
            }

            let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
            let sql = format!(
                "INSERT INTO {} ({}) VALUES ({})",
                schema.collection,
                columns.join(", "),
                placeholders.join(", ")
            );

            tx.prepare_cached(&sql)?.execute(params_from_iter(values))?;
            count += 1;
        }

        debug!(collection = schema.collection, count, "事务内写入完成");
        Ok(count)
    }
}

/// JSON 值 → SQLite 值
///
/// 列表/对象以 JSON 文本存储
fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => n.as_f64().map(SqlValue::Real).unwrap_or(SqlValue::Null),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => SqlValue::Text(value.to_string()),
    }
}

#[async_trait]
impl BulkInsertRepository for BulkInsertRepositoryImpl {
    async fn bulk_insert(
        &self,
        collection: &str,
        records: Vec<EntityRecord>,
    ) -> RepositoryResult<usize> {
        let schema = Self::resolve_schema(collection)?;
        let total = records.len();

        match self.insert_all(schema, &records) {
            Ok(count) => {
                info!(collection = %collection, count, "批量写入成功");
                Ok(count)
            }
            Err(e) => {
                error!(collection = %collection, total, error = %e, "批量写入失败，事务已回滚");
                Err(e)
            }
        }
    }
}
