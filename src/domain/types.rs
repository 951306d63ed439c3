// ==========================================
// 采购治理驾驶舱 - 领域类型定义
// ==========================================
// 存储格式: 与数据库 CHECK 约束一致 ('Low','Medium','High')
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// PR / RFQ 默认状态（当前仅观察到 Open）
pub const STATUS_OPEN: &str = "Open";

// ==========================================
// 供应商风险等级 (Risk Rating)
// ==========================================
// 顺序: Low < Medium < High（越高越差）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskRating {
    Low,
    Medium,
    High,
}

impl RiskRating {
    /// 从数据库字符串解析
    ///
    /// 无法识别的值返回 None，由调用方决定兜底策略（评分时按 Medium 处理）
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Low" => Some(RiskRating::Low),
            "Medium" => Some(RiskRating::Medium),
            "High" => Some(RiskRating::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskRating::Low => "Low",
            RiskRating::Medium => "Medium",
            RiskRating::High => "High",
        }
    }
}

impl fmt::Display for RiskRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 原材料关键度 (Criticality)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Criticality {
    Low,
    Medium,
    High,
}

impl Criticality {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Low" => Some(Criticality::Low),
            "Medium" => Some(Criticality::Medium),
            "High" => Some(Criticality::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Criticality::Low => "Low",
            Criticality::Medium => "Medium",
            Criticality::High => "High",
        }
    }
}

impl fmt::Display for Criticality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 偏离状态 (Deviation Status)
// ==========================================
// 纯派生视图: 只比较 selected 与 recommended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviationStatus {
    Pending,  // 尚未决策
    Match,    // 与系统推荐一致
    Deviated, // 偏离系统推荐
}

impl DeviationStatus {
    /// 由已选供应商与推荐供应商派生偏离状态
    ///
    /// - selected 为空 → Pending
    /// - selected == recommended → Match
    /// - 其他（含推荐缺失）→ Deviated
    pub fn derive(selected_vendor_id: Option<i64>, recommended_vendor_id: Option<i64>) -> Self {
        match selected_vendor_id {
            None => DeviationStatus::Pending,
            Some(selected) if Some(selected) == recommended_vendor_id => DeviationStatus::Match,
            Some(_) => DeviationStatus::Deviated,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviationStatus::Pending => "Pending",
            DeviationStatus::Match => "Match",
            DeviationStatus::Deviated => "Deviated",
        }
    }
}

impl fmt::Display for DeviationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
