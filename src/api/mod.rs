// ==========================================
// 旅游后台批量导入 - API 层
// ==========================================
// 职责: 请求/响应边界（认证前置、预览、提交）
// ==========================================

pub mod auth;
pub mod error;
pub mod import_api;

// 重导出核心类型
pub use auth::{AuthProvider, StaticAuthProvider};
pub use error::{map_api_error, ApiError, ApiResult, ErrorResponse};
pub use import_api::{
    CommitRequest, CommitResponse, EntitySchemaSummary, ImportApi, PreviewRequest,
    PreviewResponse,
};
