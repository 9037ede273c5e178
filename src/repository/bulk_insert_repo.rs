// ==========================================
// 旅游后台批量导入 - 批量写入 Repository Trait
// ==========================================
// 职责: 定义外部存储协作方接口（不包含业务逻辑）
// 红线: Repository 不含校验规则，只做整批写入
// ==========================================

use crate::domain::table::EntityRecord;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// BulkInsertRepository Trait
// ==========================================
// 用途: 导入提交阶段的整批落库
// 实现者: BulkInsertRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait BulkInsertRepository: Send + Sync {
    /// 整批写入目标集合（全成功或全失败）
    ///
    /// # 参数
    /// - collection: 目标集合名
    /// - records: 已校验的实体记录
    ///
    /// # 返回
    /// - Ok(usize): 写入的记录数
    /// - Err: 数据库错误（整个事务回滚，不留部分数据）
    async fn bulk_insert(
        &self,
        collection: &str,
        records: Vec<EntityRecord>,
    ) -> RepositoryResult<usize>;
}
