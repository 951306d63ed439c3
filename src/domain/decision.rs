// ==========================================
// 采购治理驾驶舱 - 决策领域模型
// ==========================================
// 对齐: rfq_recommendation_snapshot / rfq_decision 表
// 约束: 两张表均以 rfq_id 唯一，重复保存为覆盖而非追加
// ==========================================

use crate::domain::types::DeviationStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// RecommendationSnapshot - 推荐快照
// ==========================================
// 冻结"决策当时系统怎么说"，weights 记录计算时的权重串
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSnapshot {
    pub rfq_id: i64,
    pub recommended_vendor_id: i64,
    pub cheapest_vendor_id: i64,
    pub weights: String,
    pub created_on: Option<NaiveDateTime>, // 写入前为 None，由数据库落时间戳
}

// ==========================================
// Decision - 人工最终选择
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub rfq_id: i64,
    pub selected_vendor_id: i64,
    pub selected_by: String,
    pub override_reason: Option<String>, // 空原因存 NULL，不存空串
    pub created_on: Option<NaiveDateTime>,
}

// ==========================================
// DecisionRecord - 已保存决策 + 快照（含供应商名称）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub rfq_id: i64,
    pub selected_vendor_id: i64,
    pub selected_vendor: String,
    pub selected_by: String,
    pub override_reason: Option<String>,
    pub decision_time: Option<NaiveDateTime>,
    pub recommended_vendor_id: Option<i64>,
    pub recommended_vendor: Option<String>,
    pub cheapest_vendor_id: Option<i64>,
    pub cheapest_vendor: Option<String>,
    pub weights: Option<String>,
    pub snapshot_time: Option<NaiveDateTime>,
}

impl DecisionRecord {
    pub fn deviation(&self) -> DeviationStatus {
        DeviationStatus::derive(Some(self.selected_vendor_id), self.recommended_vendor_id)
    }
}
