// ==========================================
// 采购治理驾驶舱 - 供应商评分引擎
// ==========================================
// 职责: 对单个 RFQ 的报价集合计算最低价供应商与推荐供应商
// 输入: QuoteLine 列表（报价 JOIN 供应商风险等级）
// 输出: ScoringResult（含逐条得分明细与权重串）
// ==========================================
// 公式:
//   price_score = (max_price - price) / (max_price - min_price) * 100，全部相等时为 100
//   lt_score    = 对 lead_time_days 做同样的反向归一化
//   final_score = w_price * price_score + w_lead * lt_score + risk_penalty
// 红线: 纯函数，无随机数，无外部状态
// ==========================================

use crate::config::scoring_profile::ScoringWeights;
use crate::domain::procurement::QuoteLine;
use crate::domain::types::RiskRating;
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

/// 得分比较容差（浮点并列判定）
const SCORE_EPSILON: f64 = 1e-9;

// ==========================================
// QuoteScore - 单条报价得分明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteScore {
    pub quote_id: i64,
    pub vendor_id: i64,
    pub vendor_name: String,
    pub risk_rating: String,
    pub price: f64,
    pub lead_time_days: i64,
    pub price_score: f64,
    pub lt_score: f64,
    pub risk_penalty: f64,
    pub final_score: f64,
}

// ==========================================
// ScoringResult - 评分结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub cheapest_vendor_id: i64,
    pub recommended_vendor_id: i64,
    /// 计算时生效的权重串（写入快照）
    pub weights: String,
    /// 与输入顺序一致的得分明细
    pub breakdown: Vec<QuoteScore>,
}

impl ScoringResult {
    /// 得分明细按 final_score 降序（展示用）
    pub fn ranked(&self) -> Vec<QuoteScore> {
        let mut ranked = self.breakdown.clone();
        ranked.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.vendor_id.cmp(&b.vendor_id))
        });
        ranked
    }

    /// 查找某供应商的得分明细
    pub fn score_of(&self, vendor_id: i64) -> Option<&QuoteScore> {
        self.breakdown.iter().find(|s| s.vendor_id == vendor_id)
    }
}

// ==========================================
// VendorScorer - 供应商评分引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct VendorScorer {
    weights: ScoringWeights,
}

impl VendorScorer {
    /// 构造函数
    ///
    /// # 参数
    /// - `weights`: 评分权重（通常来自 ConfigManager）
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// 当前权重
    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算最低价供应商与推荐供应商
    ///
    /// 并列规则:
    /// - 最低价并列 → vendor_id 较小者
    /// - 最高分并列（容差内）→ vendor_id 较小者
    /// - 同一供应商多条报价 → 输入顺序靠前者
    ///
    /// # 返回
    /// - `Ok(ScoringResult)`
    /// - `Err(EngineError::EmptyQuoteSet)`: 报价集合为空
    pub fn score(&self, quotes: &[QuoteLine]) -> EngineResult<ScoringResult> {
        if quotes.is_empty() {
            return Err(EngineError::EmptyQuoteSet);
        }

        let prices: Vec<f64> = quotes.iter().map(|q| q.price).collect();
        let lead_times: Vec<f64> = quotes.iter().map(|q| q.lead_time_days as f64).collect();

        let price_scores = normalize_inverse(&prices);
        let lt_scores = normalize_inverse(&lead_times);

        let breakdown: Vec<QuoteScore> = quotes
            .iter()
            .zip(price_scores.iter().zip(lt_scores.iter()))
            .map(|(q, (&price_score, &lt_score))| {
                let risk_penalty = self.weights.penalty_for(RiskRating::parse(&q.risk_rating));
                let final_score = self.weights.price_weight * price_score
                    + self.weights.lead_weight * lt_score
                    + risk_penalty;

                QuoteScore {
                    quote_id: q.quote_id,
                    vendor_id: q.vendor_id,
                    vendor_name: q.vendor_name.clone(),
                    risk_rating: q.risk_rating.clone(),
                    price: q.price,
                    lead_time_days: q.lead_time_days,
                    price_score,
                    lt_score,
                    risk_penalty,
                    final_score,
                }
            })
            .collect();

        let cheapest_vendor_id = pick_cheapest(quotes);
        let recommended_vendor_id = pick_recommended(&breakdown);

        tracing::debug!(
            quote_count = quotes.len(),
            cheapest_vendor_id,
            recommended_vendor_id,
            "评分完成"
        );

        Ok(ScoringResult {
            cheapest_vendor_id,
            recommended_vendor_id,
            weights: self.weights.to_weights_string(),
            breakdown,
        })
    }
}

/// 反向归一化到 0-100：值越小得分越高；全部相等时均为 100
pub fn normalize_inverse(values: &[f64]) -> Vec<f64> {
    let min_v = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max_v = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max_v == min_v {
        return vec![100.0; values.len()];
    }

    values
        .iter()
        .map(|v| (max_v - v) / (max_v - min_v) * 100.0)
        .collect()
}

/// 调用方保证 quotes 非空
fn pick_cheapest(quotes: &[QuoteLine]) -> i64 {
    let mut best = &quotes[0];
    for q in &quotes[1..] {
        if q.price < best.price || (q.price == best.price && q.vendor_id < best.vendor_id) {
            best = q;
        }
    }
    best.vendor_id
}

/// 调用方保证 breakdown 非空
fn pick_recommended(breakdown: &[QuoteScore]) -> i64 {
    let mut best = &breakdown[0];
    for s in &breakdown[1..] {
        let diff = s.final_score - best.final_score;
        if diff > SCORE_EPSILON || (diff.abs() <= SCORE_EPSILON && s.vendor_id < best.vendor_id) {
            best = s;
        }
    }
    best.vendor_id
}
