// ==========================================
// 采购治理驾驶舱 - 主数据领域模型
// ==========================================
// 对齐: rm_master / vendors 表
// 主数据为参考数据，极少变更
// ==========================================

use crate::domain::types::{Criticality, RiskRating};
use serde::{Deserialize, Serialize};

// ==========================================
// RawMaterial - 原材料主数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMaterial {
    pub rm_id: i64,                 // 原材料ID
    pub rm_name: String,            // 名称
    pub spec_short: Option<String>, // 简要规格
    pub criticality: Criticality,   // 关键度
}

/// 新建原材料参数（ID 由数据库分配）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRawMaterial {
    pub rm_name: String,
    pub spec_short: Option<String>,
    pub criticality: Criticality,
}

// ==========================================
// Vendor - 供应商主数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub vendor_id: i64,          // 供应商ID
    pub vendor_name: String,     // 名称
    pub approved: bool,          // 是否合格供应商
    pub risk_rating: RiskRating, // 风险等级
}

/// 新建供应商参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVendor {
    pub vendor_name: String,
    pub approved: bool,
    pub risk_rating: RiskRating,
}
