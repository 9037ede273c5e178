// ==========================================
// 旅游后台批量导入 - 认证协作方
// ==========================================
// 职责: 提供"当前用户"查询（认证本身由外部平台完成）
// 红线: 预览/提交前必须已认证
// ==========================================

use crate::domain::user::User;
use async_trait::async_trait;

// ==========================================
// AuthProvider Trait
// ==========================================
// 实现者: StaticAuthProvider（CLI/测试），外部会话服务
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// 当前已认证用户；未登录返回 None
    async fn current_user(&self) -> Option<User>;
}

/// 固定用户的认证提供者
#[derive(Debug, Clone, Default)]
pub struct StaticAuthProvider {
    user: Option<User>,
}

impl StaticAuthProvider {
    pub fn authenticated(user: User) -> Self {
        Self { user: Some(user) }
    }

    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

#[async_trait]
impl AuthProvider for StaticAuthProvider {
    async fn current_user(&self) -> Option<User> {
        self.user.clone()
    }
}
