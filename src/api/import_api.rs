// ==========================================
// 旅游后台批量导入 - 导入API
// ==========================================
// 职责: 预览（只校验不落库）/ 提交（重新校验 + 整批落库）
// 状态机: Idle → Previewed → Committing → {Done, Failed}（每次调用独立推进）
// 红线: 提交必须在服务端重新校验，不信任客户端的预览结果
// ==========================================

use crate::api::auth::AuthProvider;
use crate::api::error::{ApiError, ApiResult};
use crate::config::import_config_trait::ImportConfigReader;
use crate::domain::table::{headers_from_rows, EntityRecord, RawRow};
use crate::domain::types::{EntityType, ImportPhase};
use crate::domain::user::User;
use crate::importer::error::advance_phase;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::importer_trait::RowValidator;
use crate::importer::row_transformer::{RowError, RowTransformer};
use crate::importer::schema_registry::{all_schemas, lookup_schema, ColumnSpec, EntitySchema};
use crate::repository::bulk_insert_repo::BulkInsertRepository;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

// ==========================================
// 请求 / 响应
// ==========================================

/// 预览请求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreviewRequest {
    /// 实体类型（countries / regions / ...）
    pub entity_type: String,
    /// 表头（可选；缺省时从行数据推导）
    #[serde(default)]
    pub headers: Option<Vec<String>>,
    /// 原始行
    #[serde(default)]
    pub rows: Vec<RawRow>,
}

/// 预览响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub entity_type: String,
    /// 原始表头
    pub headers: Vec<String>,
    /// 原始表格的前若干行（仅展示，非转换结果）
    pub preview: Vec<RawRow>,
    /// 输入行数
    pub total_rows: usize,
    /// 可落库行数
    pub valid_rows: usize,
    /// 行级错误消息
    pub errors: Vec<String>,
    /// 行级错误明细（行号 + 列名 + 类型）
    pub error_details: Vec<RowError>,
    /// 转换后的记录（仅有效行）
    pub records: Vec<EntityRecord>,
    pub phase: ImportPhase,
}

/// 提交请求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitRequest {
    pub entity_type: String,
    #[serde(default)]
    pub rows: Vec<RawRow>,
}

/// 提交响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitResponse {
    pub entity_type: String,
    /// 目标集合
    pub collection: String,
    /// 写入记录数
    pub inserted_count: usize,
    pub phase: ImportPhase,
}

/// 实体配置摘要（供管理端下拉选择）
#[derive(Debug, Clone, Serialize)]
pub struct EntitySchemaSummary {
    pub entity_type: EntityType,
    /// 显示名称
    pub label: &'static str,
    pub collection: &'static str,
    pub columns: Vec<ColumnSpec>,
}

impl From<&EntitySchema> for EntitySchemaSummary {
    fn from(schema: &EntitySchema) -> Self {
        Self {
            entity_type: schema.entity_type,
            label: schema.entity_type.label(),
            collection: schema.collection,
            columns: schema.columns.to_vec(),
        }
    }
}

// ==========================================
// ImportApi
// ==========================================
pub struct ImportApi {
    repo: Arc<dyn BulkInsertRepository>,
    auth: Arc<dyn AuthProvider>,
    config: Arc<dyn ImportConfigReader>,
    validator: Box<dyn RowValidator>,
    decoder: UniversalFileParser,
}

impl ImportApi {
    /// 创建新的ImportApi实例（默认使用 RowTransformer 校验）
    pub fn new(
        repo: Arc<dyn BulkInsertRepository>,
        auth: Arc<dyn AuthProvider>,
        config: Arc<dyn ImportConfigReader>,
    ) -> Self {
        Self {
            repo,
            auth,
            config,
            validator: Box::new(RowTransformer),
            decoder: UniversalFileParser,
        }
    }

    /// 替换行校验器
    pub fn with_validator(mut self, validator: Box<dyn RowValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// 列出全部可导入实体
    pub fn list_entity_schemas(&self) -> Vec<EntitySchemaSummary> {
        all_schemas().iter().map(EntitySchemaSummary::from).collect()
    }

    // ==========================================
    // 预览
    // ==========================================

    /// 预览（不落库，可重复调用）
    ///
    /// # 返回
    /// - Ok(PreviewResponse): 计数、错误、原始表格预览
    /// - Err(ApiError::Unauthorized): 未登录
    /// - Err(ApiError::UnknownEntityType / InvalidInput)
    #[instrument(skip(self, req), fields(entity_type = %req.entity_type, rows = req.rows.len()))]
    pub async fn preview(&self, req: PreviewRequest) -> ApiResult<PreviewResponse> {
        self.require_user().await?;
        let schema = Self::resolve_schema(&req.entity_type)?;
        let headers = req.headers.unwrap_or_else(|| headers_from_rows(&req.rows));
        self.run_preview(schema, headers, req.rows).await
    }

    /// 解析上传文件后预览
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn preview_file(
        &self,
        entity_type: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> ApiResult<PreviewResponse> {
        self.require_user().await?;
        let schema = Self::resolve_schema(entity_type)?;
        self.check_upload_size(bytes.len()).await?;

        let table = self.decoder.decode(bytes, file_name)?;
        self.run_preview(schema, table.headers, table.rows).await
    }

    async fn run_preview(
        &self,
        schema: &'static EntitySchema,
        headers: Vec<String>,
        rows: Vec<RawRow>,
    ) -> ApiResult<PreviewResponse> {
        self.check_row_count(rows.len()).await?;
        let preview_limit = self.config.get_preview_row_limit().await?;

        let result = self.validator.transform_rows(&rows, schema);
        let phase = advance_phase(ImportPhase::Idle, ImportPhase::Previewed)?;

        info!(
            entity_type = %schema.entity_type,
            total = result.total_rows,
            valid = result.valid_rows(),
            errors = result.errors.len(),
            phase = %phase,
            "预览完成"
        );

        Ok(PreviewResponse {
            entity_type: schema.entity_type.to_string(),
            headers,
            preview: rows.iter().take(preview_limit).cloned().collect(),
            total_rows: rows.len(),
            valid_rows: result.valid_rows(),
            errors: result.error_messages(),
            records: result.accepted,
            error_details: result.errors,
            phase,
        })
    }

    // ==========================================
    // 提交
    // ==========================================

    /// 提交（重新校验；有任何错误则整批拒绝）
    ///
    /// # 返回
    /// - Ok(CommitResponse): 写入记录数
    /// - Err(ApiError::ValidationFailed): 存在行级错误，未写入任何数据
    /// - Err(ApiError::PersistenceFailed): 存储失败（整批回滚）
    /// - Err(ApiError::Unauthorized): 未登录
    #[instrument(skip(self, req), fields(entity_type = %req.entity_type, rows = req.rows.len()))]
    pub async fn commit(&self, req: CommitRequest) -> ApiResult<CommitResponse> {
        self.require_user().await?;
        let schema = Self::resolve_schema(&req.entity_type)?;
        self.run_commit(schema, req.rows).await
    }

    /// 解析上传文件后提交（重新解析、重新校验）
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn commit_file(
        &self,
        entity_type: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> ApiResult<CommitResponse> {
        self.require_user().await?;
        let schema = Self::resolve_schema(entity_type)?;
        self.check_upload_size(bytes.len()).await?;

        let table = self.decoder.decode(bytes, file_name)?;
        self.run_commit(schema, table.rows).await
    }

    async fn run_commit(
        &self,
        schema: &'static EntitySchema,
        rows: Vec<RawRow>,
    ) -> ApiResult<CommitResponse> {
        self.check_row_count(rows.len()).await?;
        let mut phase = advance_phase(ImportPhase::Idle, ImportPhase::Committing)?;

        let result = self.validator.transform_rows(&rows, schema);

        // 提交闸门：全部通过才写入
        if !result.is_clean() {
            phase = advance_phase(phase, ImportPhase::Failed)?;
            warn!(
                entity_type = %schema.entity_type,
                errors = result.errors.len(),
                phase = %phase,
                "校验未通过，整批拒绝"
            );
            return Err(ApiError::ValidationFailed {
                errors: result.error_messages(),
            });
        }

        let records = result.accepted;
        let inserted_count = if records.is_empty() {
            debug!(entity_type = %schema.entity_type, "无可写入记录，跳过存储调用");
            0
        } else {
            match self.repo.bulk_insert(schema.collection, records).await {
                Ok(count) => count,
                Err(e) => {
                    phase = advance_phase(phase, ImportPhase::Failed)?;
                    error!(
                        collection = schema.collection,
                        error = %e,
                        phase = %phase,
                        "批量写入失败"
                    );
                    return Err(e.into());
                }
            }
        };

        phase = advance_phase(phase, ImportPhase::Done)?;
        info!(
            collection = schema.collection,
            inserted_count,
            phase = %phase,
            "提交完成"
        );
        debug_assert!(phase.is_terminal());

        Ok(CommitResponse {
            entity_type: schema.entity_type.to_string(),
            collection: schema.collection.to_string(),
            inserted_count,
            phase,
        })
    }

    // ==========================================
    // 前置检查
    // ==========================================

    async fn require_user(&self) -> ApiResult<User> {
        match self.auth.current_user().await {
            Some(user) => {
                debug!(user_id = %user.id, "已认证");
                Ok(user)
            }
            None => {
                warn!("未认证的导入请求");
                Err(ApiError::Unauthorized)
            }
        }
    }

    fn resolve_schema(entity_type: &str) -> ApiResult<&'static EntitySchema> {
        let entity_type = entity_type.trim();
        if entity_type.is_empty() {
            return Err(ApiError::InvalidInput("Missing required fields".to_string()));
        }
        Ok(lookup_schema(entity_type)?)
    }

    async fn check_upload_size(&self, size: usize) -> ApiResult<()> {
        let max = self.config.get_max_upload_bytes().await?;
        if size > max {
            return Err(ApiError::InvalidInput(format!(
                "文件大小 {} 字节超过上限 {} 字节",
                size, max
            )));
        }
        Ok(())
    }

    async fn check_row_count(&self, rows: usize) -> ApiResult<()> {
        let max = self.config.get_max_rows().await?;
        if rows > max {
            return Err(ApiError::InvalidInput(format!(
                "行数 {} 超过单批上限 {}",
                rows, max
            )));
        }
        Ok(())
    }
}
