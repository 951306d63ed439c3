// ==========================================
// 采购治理驾驶舱 - 驾驶舱 API
// ==========================================
// 职责: 只读聚合查询（KPI、治理视图、报价明细、评分明细）与 CSV 导出
// 红线: 无快照/无决策不是错误，治理视图标记为 Pending
// ==========================================

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

use crate::api::decision_api::{engine_error_for_rfq, scorer_from_config};
use crate::api::dto::{
    GovernanceFilter, GovernanceView, KpiSummary, QuoteDetailView, RecommendationSummary,
    ScoreBreakdown,
};
use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::ConfigManager;
use crate::domain::procurement::QuoteLine;
use crate::domain::types::{RiskRating, STATUS_OPEN};
use crate::engine::scorer::ScoringResult;
use crate::repository::decision_repo::DecisionRepository;
use crate::repository::pr_repo::{PurchaseRequirementRepository, RfqRepository};
use crate::repository::quote_repo::QuoteRepository;

/// 治理视图 CSV 表头
const GOVERNANCE_CSV_HEADER: &[&str] = &[
    "rfq_id",
    "pr_id",
    "rm_name",
    "cheapest_vendor",
    "recommended_vendor",
    "selected_vendor",
    "deviation",
    "override_reason",
    "selected_by",
    "decision_time",
];

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================

/// 驾驶舱API
///
/// 职责：
/// 1. KPI 卡片（未关闭 PR / RFQ、报价总数）
/// 2. 治理视图（最低价 / 推荐 / 实选 + 偏离标签）
/// 3. 报价明细与评分明细
/// 4. 治理视图导出
pub struct DashboardApi {
    pr_repo: Arc<PurchaseRequirementRepository>,
    rfq_repo: Arc<RfqRepository>,
    quote_repo: Arc<QuoteRepository>,
    decision_repo: Arc<DecisionRepository>,
    config_manager: Arc<ConfigManager>,
}

impl DashboardApi {
    pub fn new(
        pr_repo: Arc<PurchaseRequirementRepository>,
        rfq_repo: Arc<RfqRepository>,
        quote_repo: Arc<QuoteRepository>,
        decision_repo: Arc<DecisionRepository>,
        config_manager: Arc<ConfigManager>,
    ) -> Self {
        Self {
            pr_repo,
            rfq_repo,
            quote_repo,
            decision_repo,
            config_manager,
        }
    }

    // ==========================================
    // KPI
    // ==========================================

    pub fn get_kpis(&self) -> ApiResult<KpiSummary> {
        Ok(KpiSummary {
            open_prs: self.pr_repo.count_by_status(STATUS_OPEN)?,
            open_rfqs: self.rfq_repo.count_by_status(STATUS_OPEN)?,
            total_quotes: self.quote_repo.count_all()?,
        })
    }

    // ==========================================
    // 治理视图
    // ==========================================

    /// 治理视图（rfq_id 降序）
    pub fn list_governance_view(&self, filter: GovernanceFilter) -> ApiResult<Vec<GovernanceView>> {
        let rows = self
            .decision_repo
            .list_governance_rows(filter.pr_id, filter.rfq_id)?;
        Ok(rows.into_iter().map(GovernanceView::from).collect())
    }

    /// 治理视图导出为 CSV
    ///
    /// # 返回
    /// - Ok(usize): 写出的数据行数（不含表头）
    pub fn export_governance_csv<W: Write>(
        &self,
        writer: W,
        filter: GovernanceFilter,
    ) -> ApiResult<usize> {
        let rows = self.list_governance_view(filter)?;
        let mut wtr = csv::Writer::from_writer(writer);

        wtr.write_record(GOVERNANCE_CSV_HEADER)
            .map_err(|e| ApiError::ExportError(e.to_string()))?;

        for row in &rows {
            let decision_time = row
                .decision_time
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default();

            wtr.write_record([
                row.rfq_id.to_string(),
                row.pr_id.to_string(),
                row.rm_name.clone(),
                row.cheapest_vendor.clone().unwrap_or_default(),
                row.recommended_vendor.clone().unwrap_or_default(),
                row.selected_vendor.clone().unwrap_or_default(),
                row.deviation.as_str().to_string(),
                row.override_reason.clone().unwrap_or_default(),
                row.selected_by.clone().unwrap_or_default(),
                decision_time,
            ])
            .map_err(|e| ApiError::ExportError(e.to_string()))?;
        }

        wtr.flush()
            .map_err(|e| ApiError::ExportError(e.to_string()))?;

        tracing::info!(rows = rows.len(), "治理视图已导出");
        Ok(rows.len())
    }

    // ==========================================
    // 报价明细 / 评分明细
    // ==========================================

    /// 报价明细（按 RFQ、价格升序），附最低价 / 高风险标记
    pub fn list_quote_details(&self, rfq_id: Option<i64>) -> ApiResult<Vec<QuoteDetailView>> {
        let details = self.quote_repo.list_details(rfq_id)?;

        let mut min_price: BTreeMap<i64, f64> = BTreeMap::new();
        for d in &details {
            min_price
                .entry(d.rfq_id)
                .and_modify(|m| *m = m.min(d.price))
                .or_insert(d.price);
        }

        Ok(details
            .into_iter()
            .map(|detail| {
                let flag_low_price = min_price
                    .get(&detail.rfq_id)
                    .map(|m| detail.price == *m)
                    .unwrap_or(false);
                let flag_high_risk = RiskRating::parse(&detail.risk_rating) == Some(RiskRating::High);
                QuoteDetailView {
                    detail,
                    flag_low_price,
                    flag_high_risk,
                }
            })
            .collect())
    }

    /// 按 RFQ 分组评分（rfq_id 升序）
    fn score_by_rfq(&self, rfq_id: Option<i64>) -> ApiResult<Vec<(i64, ScoringResult)>> {
        let details = self.quote_repo.list_details(rfq_id)?;

        let mut grouped: BTreeMap<i64, Vec<QuoteLine>> = BTreeMap::new();
        for d in &details {
            grouped.entry(d.rfq_id).or_default().push(d.to_quote_line());
        }

        let scorer = scorer_from_config(&self.config_manager)?;
        grouped
            .into_iter()
            .map(|(id, lines)| {
                scorer
                    .score(&lines)
                    .map(|result| (id, result))
                    .map_err(|e| engine_error_for_rfq(id, e))
            })
            .collect()
    }

    /// 评分明细（每个 RFQ 按 final_score 降序）
    pub fn list_score_breakdown(&self, rfq_id: Option<i64>) -> ApiResult<Vec<ScoreBreakdown>> {
        Ok(self
            .score_by_rfq(rfq_id)?
            .into_iter()
            .map(|(id, result)| ScoreBreakdown {
                rfq_id: id,
                scores: result.ranked(),
                weights: result.weights,
            })
            .collect())
    }

    /// 最低价 vs 推荐 对比
    pub fn list_recommendation_summary(
        &self,
        rfq_id: Option<i64>,
    ) -> ApiResult<Vec<RecommendationSummary>> {
        let mut summaries = Vec::new();

        for (id, result) in self.score_by_rfq(rfq_id)? {
            // 同一供应商可能多次报价：最低价取最低一条，推荐取最高分一条
            let cheapest = result
                .breakdown
                .iter()
                .filter(|s| s.vendor_id == result.cheapest_vendor_id)
                .min_by(|a, b| a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal))
                .ok_or_else(|| ApiError::InternalError(format!("RFQ {} 缺少最低价得分明细", id)))?;
            let recommended = result
                .breakdown
                .iter()
                .filter(|s| s.vendor_id == result.recommended_vendor_id)
                .max_by(|a, b| {
                    a.final_score
                        .partial_cmp(&b.final_score)
                        .unwrap_or(Ordering::Equal)
                })
                .ok_or_else(|| ApiError::InternalError(format!("RFQ {} 缺少推荐得分明细", id)))?;

            summaries.push(RecommendationSummary {
                rfq_id: id,
                cheapest_vendor_id: cheapest.vendor_id,
                cheapest_vendor: cheapest.vendor_name.clone(),
                cheapest_price: cheapest.price,
                recommended_vendor_id: recommended.vendor_id,
                recommended_vendor: recommended.vendor_name.clone(),
                recommended_score: recommended.final_score,
            });
        }

        Ok(summaries)
    }
}
