// ==========================================
// 孵化场生产管理系统 - 领域类型定义
// ==========================================
// 职责: 生产阶段、损耗口径、各类状态枚举
// 序列化格式与前端表单取值保持一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 生产阶段 (Stage)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    EggCollection,   // 收蛋
    EggSetting,      // 上蛋
    Candling,        // 照蛋
    Incubation,      // 孵化中
    Lockdown,        // 落盘
    Hatching,        // 出雏
    Packaging,       // 装箱
    Sales,           // 销售
    Alerts,          // 告警
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::EggCollection => "EGG_COLLECTION",
            Stage::EggSetting => "EGG_SETTING",
            Stage::Candling => "CANDLING",
            Stage::Incubation => "INCUBATION",
            Stage::Lockdown => "LOCKDOWN",
            Stage::Hatching => "HATCHING",
            Stage::Packaging => "PACKAGING",
            Stage::Sales => "SALES",
            Stage::Alerts => "ALERTS",
        };
        write!(f, "{}", s)
    }
}

// ==========================================
// 照蛋类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandlingKind {
    Fertile, // 受精蛋
    Clear,   // 无精蛋
}

impl fmt::Display for CandlingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandlingKind::Fertile => write!(f, "fertile"),
            CandlingKind::Clear => write!(f, "clear"),
        }
    }
}

// ==========================================
// 出雏状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HatchStatus {
    #[default]
    InProgress, // 出雏中
    Completed,  // 已完成
}

impl fmt::Display for HatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HatchStatus::InProgress => write!(f, "in-progress"),
            HatchStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for HatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in-progress" => Ok(HatchStatus::InProgress),
            "completed" => Ok(HatchStatus::Completed),
            other => Err(other.to_string()),
        }
    }
}

// ==========================================
// 装箱状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackagingStatus {
    #[default]
    Pending,
    Completed,
}

impl fmt::Display for PackagingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackagingStatus::Pending => write!(f, "pending"),
            PackagingStatus::Completed => write!(f, "completed"),
        }
    }
}

// ==========================================
// 销售状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaleStatus::Pending => write!(f, "pending"),
            SaleStatus::Completed => write!(f, "completed"),
            SaleStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for SaleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(SaleStatus::Pending),
            "completed" => Ok(SaleStatus::Completed),
            "cancelled" => Ok(SaleStatus::Cancelled),
            other => Err(other.to_string()),
        }
    }
}

// ==========================================
// 告警级别 / 告警状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Critical,
    Warning,
    Info,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertSeverity::Critical => write!(f, "critical"),
            AlertSeverity::Warning => write!(f, "warning"),
            AlertSeverity::Info => write!(f, "info"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    #[default]
    Active,       // 待处理
    Acknowledged, // 已确认
    Resolved,     // 已解决（终态）
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertStatus::Active => write!(f, "active"),
            AlertStatus::Acknowledged => write!(f, "acknowledged"),
            AlertStatus::Resolved => write!(f, "resolved"),
        }
    }
}

// ==========================================
// 箱型 (Box Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxType {
    Small,  // 小箱
    Medium, // 中箱
    Large,  // 大箱
    Export, // 出口箱
}

impl BoxType {
    pub const ALL: [BoxType; 4] = [BoxType::Small, BoxType::Medium, BoxType::Large, BoxType::Export];

    pub fn as_str(&self) -> &'static str {
        match self {
            BoxType::Small => "small",
            BoxType::Medium => "medium",
            BoxType::Large => "large",
            BoxType::Export => "export",
        }
    }

    /// 箱型出厂默认容量（可被配置覆盖）
    pub fn default_capacity(&self) -> i64 {
        match self {
            BoxType::Small => 50,
            BoxType::Medium => 100,
            BoxType::Large => 200,
            BoxType::Export => 150,
        }
    }
}

impl fmt::Display for BoxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BoxType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(BoxType::Small),
            "medium" => Ok(BoxType::Medium),
            "large" => Ok(BoxType::Large),
            "export" => Ok(BoxType::Export),
            other => Err(other.to_string()),
        }
    }
}

// ==========================================
// 校验违规详情
// ==========================================

/// 字段级校验违规
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationViolation {
    /// 字段名
    pub field: String,
    /// 记录ID（新建记录为 None）
    pub record_id: Option<i64>,
    /// 违规原因
    pub reason: String,
}

impl ValidationViolation {
    pub fn new(field: &str, record_id: Option<i64>, reason: String) -> Self {
        Self {
            field: field.to_string(),
            record_id,
            reason,
        }
    }
}
