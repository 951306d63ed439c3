// ==========================================
// 采购治理驾驶舱 - API 请求/响应结构
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::DeviationStatus;
use crate::engine::scorer::QuoteScore;
use crate::repository::decision_repo::GovernanceRow;
use crate::repository::quote_repo::QuoteDetailRow;

// ==========================================
// 决策
// ==========================================

/// 保存决策请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDecisionRequest {
    pub rfq_id: i64,
    pub selected_vendor_id: i64,
    pub selected_by: String,
    pub override_reason: Option<String>,
}

/// 保存决策结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionOutcome {
    pub rfq_id: i64,
    pub selected_vendor_id: i64,
    pub recommended_vendor_id: i64,
    pub cheapest_vendor_id: i64,
    pub weights: String,
    pub deviation: DeviationStatus,
    pub action_id: String,
}

/// 推荐预览（不落库）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationPreview {
    pub rfq_id: i64,
    pub cheapest_vendor_id: i64,
    pub cheapest_vendor: String,
    pub recommended_vendor_id: i64,
    pub recommended_vendor: String,
    pub weights: String,
    /// final_score 降序
    pub ranked: Vec<QuoteScore>,
}

// ==========================================
// 驾驶舱
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub open_prs: i64,
    pub open_rfqs: i64,
    pub total_quotes: i64,
}

/// 治理视图过滤条件
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GovernanceFilter {
    pub pr_id: Option<i64>,
    pub rfq_id: Option<i64>,
}

/// 治理视图行（含偏离标签）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernanceView {
    pub rfq_id: i64,
    pub pr_id: i64,
    pub rm_name: String,
    pub cheapest_vendor: Option<String>,
    pub recommended_vendor: Option<String>,
    pub selected_vendor: Option<String>,
    pub deviation: DeviationStatus,
    pub override_reason: Option<String>,
    pub selected_by: Option<String>,
    pub decision_time: Option<NaiveDateTime>,
}

impl From<GovernanceRow> for GovernanceView {
    fn from(row: GovernanceRow) -> Self {
        let deviation = DeviationStatus::derive(row.selected_vendor_id, row.recommended_vendor_id);
        Self {
            rfq_id: row.rfq_id,
            pr_id: row.pr_id,
            rm_name: row.rm_name,
            cheapest_vendor: row.cheapest_vendor,
            recommended_vendor: row.recommended_vendor,
            selected_vendor: row.selected_vendor,
            deviation,
            override_reason: row.override_reason,
            selected_by: row.selected_by,
            decision_time: row.decision_time,
        }
    }
}

/// 报价明细（附最低价 / 高风险标记）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteDetailView {
    #[serde(flatten)]
    pub detail: QuoteDetailRow,
    pub flag_low_price: bool,
    pub flag_high_risk: bool,
}

/// 单个 RFQ 的评分明细
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub rfq_id: i64,
    pub weights: String,
    /// final_score 降序
    pub scores: Vec<QuoteScore>,
}

/// 最低价 vs 推荐 对比
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationSummary {
    pub rfq_id: i64,
    pub cheapest_vendor_id: i64,
    pub cheapest_vendor: String,
    pub cheapest_price: f64,
    pub recommended_vendor_id: i64,
    pub recommended_vendor: String,
    pub recommended_score: f64,
}

impl RecommendationSummary {
    pub fn is_same_vendor(&self) -> bool {
        self.cheapest_vendor_id == self.recommended_vendor_id
    }
}
