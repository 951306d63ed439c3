// ==========================================
// 采购治理驾驶舱 - 决策 API
// ==========================================
// 职责: 保存供应商决策（快照 + 决策 + 审计同事务）、推荐预览、已存记录查询
// 红线: 每次保存都以当前报价重新评分，不信任旧快照
// 红线: 偏离推荐必须附合规原因，校验失败不落任何数据
// ==========================================

use std::sync::Arc;

use crate::api::dto::{DecisionOutcome, RecommendationPreview, RecordDecisionRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::DecisionRequestValidator;
use crate::config::config_manager::ConfigManager;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::decision::{Decision, DecisionRecord, RecommendationSnapshot};
use crate::domain::types::DeviationStatus;
use crate::engine::error::EngineError;
use crate::engine::override_policy::{normalize_reason, OverridePolicy};
use crate::engine::scorer::{ScoringResult, VendorScorer};
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::decision_repo::DecisionStore;
use crate::repository::pr_repo::RfqRepository;
use crate::repository::quote_repo::QuoteRepository;

/// 按当前配置构建评分引擎
pub(crate) fn scorer_from_config(config: &ConfigManager) -> ApiResult<VendorScorer> {
    let weights = config
        .get_scoring_weights()
        .map_err(|e| ApiError::ConfigError(e.to_string()))?;
    Ok(VendorScorer::new(weights))
}

/// 引擎错误补全 rfq_id
pub(crate) fn engine_error_for_rfq(rfq_id: i64, err: EngineError) -> ApiError {
    match err {
        EngineError::EmptyQuoteSet => ApiError::EmptyQuoteSet(rfq_id),
        other => other.into(),
    }
}

// ==========================================
// DecisionApi - 决策 API
// ==========================================
pub struct DecisionApi {
    rfq_repo: Arc<RfqRepository>,
    quote_repo: Arc<QuoteRepository>,
    decision_store: Arc<dyn DecisionStore>,
    action_log_repo: Arc<ActionLogRepository>,
    config_manager: Arc<ConfigManager>,
}

impl DecisionApi {
    pub fn new(
        rfq_repo: Arc<RfqRepository>,
        quote_repo: Arc<QuoteRepository>,
        decision_store: Arc<dyn DecisionStore>,
        action_log_repo: Arc<ActionLogRepository>,
        config_manager: Arc<ConfigManager>,
    ) -> Self {
        Self {
            rfq_repo,
            quote_repo,
            decision_store,
            action_log_repo,
            config_manager,
        }
    }

    fn ensure_rfq_exists(&self, rfq_id: i64) -> ApiResult<()> {
        match self.rfq_repo.find_by_id(rfq_id)? {
            Some(_) => Ok(()),
            None => Err(ApiError::NotFound(format!("RFQ(id={})不存在", rfq_id))),
        }
    }

    fn load_override_policy(&self) -> ApiResult<OverridePolicy> {
        let (min_words, max_words) = self
            .config_manager
            .get_override_word_bounds()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        Ok(OverridePolicy::new(min_words, max_words))
    }

    /// 以当前报价与当前权重评分
    fn score_rfq(&self, rfq_id: i64) -> ApiResult<ScoringResult> {
        let lines = self.quote_repo.find_lines_by_rfq(rfq_id)?;
        let scorer = scorer_from_config(&self.config_manager)?;
        let result = scorer
            .score(&lines)
            .map_err(|e| engine_error_for_rfq(rfq_id, e))?;

        tracing::debug!(
            rfq_id,
            quotes = lines.len(),
            cheapest_vendor_id = result.cheapest_vendor_id,
            recommended_vendor_id = result.recommended_vendor_id,
            "RFQ 评分完成"
        );
        Ok(result)
    }

    /// 保存决策
    ///
    /// 顺序:
    /// 1. 决策人身份
    /// 2. RFQ 存在
    /// 3. 当前报价重新评分（无报价拒绝）
    /// 4. 所选供应商须在报价集合内
    /// 5. 偏离推荐时校验覆写原因
    /// 6. 快照 + 决策 + 审计日志 同事务 UPSERT
    ///
    /// # 返回
    /// - Ok(DecisionOutcome): 保存成功
    /// - Err(ApiError): 任一校验失败，数据库不变
    pub fn record_decision(&self, request: RecordDecisionRequest) -> ApiResult<DecisionOutcome> {
        let rfq_id = request.rfq_id;
        let selected_vendor_id = request.selected_vendor_id;

        let selected_by = DecisionRequestValidator::validate_identity(&request.selected_by)?;
        self.ensure_rfq_exists(rfq_id)?;

        let scoring = self.score_rfq(rfq_id)?;
        DecisionRequestValidator::validate_selection(rfq_id, selected_vendor_id, &scoring)?;

        let reason = normalize_reason(request.override_reason.as_deref());
        let policy = self.load_override_policy()?;
        if let Err(e) = policy.check_selection(
            selected_vendor_id,
            scoring.recommended_vendor_id,
            reason.as_deref(),
        ) {
            tracing::warn!(
                rfq_id,
                selected_vendor_id,
                recommended_vendor_id = scoring.recommended_vendor_id,
                error = %e,
                "覆写原因未通过校验，拒绝保存"
            );
            return Err(e.into());
        }

        let deviation =
            DeviationStatus::derive(Some(selected_vendor_id), Some(scoring.recommended_vendor_id));

        let snapshot = RecommendationSnapshot {
            rfq_id,
            recommended_vendor_id: scoring.recommended_vendor_id,
            cheapest_vendor_id: scoring.cheapest_vendor_id,
            weights: scoring.weights.clone(),
            created_on: None,
        };
        let decision = Decision {
            rfq_id,
            selected_vendor_id,
            selected_by: selected_by.clone(),
            override_reason: reason.clone(),
            created_on: None,
        };

        let action_id = uuid::Uuid::new_v4().to_string();
        let audit = ActionLog {
            action_id: action_id.clone(),
            rfq_id: Some(rfq_id),
            action_type: ActionType::RecordDecision.to_string(),
            action_ts: chrono::Local::now().naive_local(),
            actor: selected_by.clone(),
            payload_json: Some(serde_json::json!({
                "selected_vendor_id": selected_vendor_id,
                "recommended_vendor_id": scoring.recommended_vendor_id,
                "cheapest_vendor_id": scoring.cheapest_vendor_id,
                "weights": scoring.weights,
                "deviation": deviation.as_str(),
                "override_reason": reason,
            })),
            detail: Some(format!(
                "RFQ {} 选定供应商 {} ({})",
                rfq_id, selected_vendor_id, deviation
            )),
        };

        self.decision_store
            .save_decision_atomically(&snapshot, &decision, Some(&audit))?;

        tracing::info!(
            rfq_id,
            selected_vendor_id,
            recommended_vendor_id = scoring.recommended_vendor_id,
            cheapest_vendor_id = scoring.cheapest_vendor_id,
            deviation = %deviation,
            selected_by = %selected_by,
            "决策已保存"
        );

        Ok(DecisionOutcome {
            rfq_id,
            selected_vendor_id,
            recommended_vendor_id: scoring.recommended_vendor_id,
            cheapest_vendor_id: scoring.cheapest_vendor_id,
            weights: scoring.weights,
            deviation,
            action_id,
        })
    }

    /// 推荐预览（不落库）
    pub fn preview_recommendation(&self, rfq_id: i64) -> ApiResult<RecommendationPreview> {
        self.ensure_rfq_exists(rfq_id)?;
        let scoring = self.score_rfq(rfq_id)?;

        let vendor_name = |vendor_id: i64| {
            scoring
                .score_of(vendor_id)
                .map(|s| s.vendor_name.clone())
                .unwrap_or_default()
        };

        Ok(RecommendationPreview {
            rfq_id,
            cheapest_vendor_id: scoring.cheapest_vendor_id,
            cheapest_vendor: vendor_name(scoring.cheapest_vendor_id),
            recommended_vendor_id: scoring.recommended_vendor_id,
            recommended_vendor: vendor_name(scoring.recommended_vendor_id),
            weights: scoring.weights.clone(),
            ranked: scoring.ranked(),
        })
    }

    /// 已保存记录核对
    ///
    /// # 返回
    /// - Ok(Some(DecisionRecord)): 已保存的决策与快照
    /// - Ok(None): 尚未决策
    pub fn get_decision_record(&self, rfq_id: i64) -> ApiResult<Option<DecisionRecord>> {
        Ok(self.decision_store.find_decision_record(rfq_id)?)
    }

    /// RFQ 审计轨迹（新→旧）
    pub fn list_audit_trail(&self, rfq_id: i64) -> ApiResult<Vec<ActionLog>> {
        Ok(self.action_log_repo.find_by_rfq_id(rfq_id)?)
    }

    /// 全局最近审计日志（新→旧），含演示数据写入等无 RFQ 的条目
    pub fn list_recent_audit(&self, limit: u32) -> ApiResult<Vec<ActionLog>> {
        if limit == 0 {
            return Err(ApiError::InvalidInput("limit 必须大于 0".to_string()));
        }
        Ok(self.action_log_repo.find_recent(limit)?)
    }
}
