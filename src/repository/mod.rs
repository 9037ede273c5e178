// ==========================================
// 旅游后台批量导入 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供整批写入接口,屏蔽数据库细节
// 约束: 所有写入使用参数化,防止 SQL 注入
// ==========================================

pub mod bulk_insert_repo;
pub mod bulk_insert_repo_impl;
pub mod error;

// 重导出核心仓储
pub use bulk_insert_repo::BulkInsertRepository;
pub use bulk_insert_repo_impl::BulkInsertRepositoryImpl;
pub use error::{RepositoryError, RepositoryResult};
