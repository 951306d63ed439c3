// ==========================================
// 采购治理驾驶舱 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行与集成调用
// ==========================================

pub mod dashboard_api;
pub mod decision_api;
pub mod dto;
pub mod error;
pub mod procurement_api;
pub mod validator;

// 重导出核心类型
pub use dashboard_api::DashboardApi;
pub use decision_api::DecisionApi;
pub use dto::{
    DecisionOutcome, GovernanceFilter, GovernanceView, KpiSummary, QuoteDetailView,
    RecommendationPreview, RecommendationSummary, RecordDecisionRequest, ScoreBreakdown,
};
pub use error::{ApiError, ApiResult};
pub use procurement_api::ProcurementApi;
pub use validator::DecisionRequestValidator;
