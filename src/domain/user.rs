// ==========================================
// 旅游后台批量导入 - 当前用户
// ==========================================
// 由认证协作方提供，核心只关心"是否已登录"
// ==========================================

use serde::{Deserialize, Serialize};

/// 已认证用户
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// 用户ID
    pub id: String,
    /// 邮箱（可选）
    pub email: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}
