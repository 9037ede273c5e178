// ==========================================
// 旅游后台批量导入 - 领域类型定义
// ==========================================
// 职责: 可导入实体类型 + 导入阶段状态机
// 实体类型集合固定: countries / regions / cities / hotels / room_types / placements
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 实体类型 (Entity Type)
// ==========================================
// 序列化格式: snake_case (与集合名一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Countries,
    Regions,
    Cities,
    Hotels,
    RoomTypes,
    Placements,
}

impl EntityType {
    /// 全部实体类型（管理端下拉框顺序）
    pub const ALL: [EntityType; 6] = [
        EntityType::Countries,
        EntityType::Regions,
        EntityType::Cities,
        EntityType::Hotels,
        EntityType::RoomTypes,
        EntityType::Placements,
    ];

    /// 对外名称（请求参数中的 entityType）
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Countries => "countries",
            EntityType::Regions => "regions",
            EntityType::Cities => "cities",
            EntityType::Hotels => "hotels",
            EntityType::RoomTypes => "room_types",
            EntityType::Placements => "placements",
        }
    }

    /// 管理端显示名
    pub fn label(&self) -> &'static str {
        match self {
            EntityType::Countries => "Countries",
            EntityType::Regions => "Regions",
            EntityType::Cities => "Cities",
            EntityType::Hotels => "Hotels",
            EntityType::RoomTypes => "Room Types",
            EntityType::Placements => "Placements",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 未知实体类型（携带原始输入）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEntityType(pub String);

impl fmt::Display for UnknownEntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown entity type: {}", self.0)
    }
}

impl std::error::Error for UnknownEntityType {}

impl FromStr for EntityType {
    type Err = UnknownEntityType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // 精确匹配：不做大小写/空白容错；API 入口先去掉首尾空白再查表
        EntityType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownEntityType(s.to_string()))
    }
}

// ==========================================
// 导入阶段 (Import Phase)
// ==========================================
// 状态机: Idle → Previewed → Committing → {Done, Failed}
// 每次请求独立推进，不跨请求保留
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportPhase {
    Idle,       // 尚未处理
    Previewed,  // 预览完成（未落库）
    Committing, // 提交中（重新校验 + 落库）
    Done,       // 落库成功
    Failed,     // 校验或落库失败
}

impl ImportPhase {
    /// 是否允许从当前阶段转到 next
    pub fn can_transition_to(&self, next: ImportPhase) -> bool {
        use ImportPhase::{Committing, Done, Failed, Idle, Previewed};
        matches!(
            (self, next),
            (Idle, Previewed)
                | (Previewed, Previewed)
                | (Idle, Committing)
                | (Previewed, Committing)
                | (Committing, Done)
                | (Committing, Failed)
        )
    }

    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, ImportPhase::Done | ImportPhase::Failed)
    }
}

impl fmt::Display for ImportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportPhase::Idle => write!(f, "IDLE"),
            ImportPhase::Previewed => write!(f, "PREVIEWED"),
            ImportPhase::Committing => write!(f, "COMMITTING"),
            ImportPhase::Done => write!(f, "DONE"),
            ImportPhase::Failed => write!(f, "FAILED"),
        }
    }
}
