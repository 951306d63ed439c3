// ==========================================
// 采购治理驾驶舱 - 引擎层
// ==========================================
// 职责: 评分与覆写原因策略，纯计算
// 红线: Engine 不拼 SQL
// ==========================================

pub mod error;
pub mod override_policy;
pub mod scorer;

// 重导出核心引擎
pub use error::{EngineError, EngineResult};
pub use override_policy::{normalize_reason, word_count, OverridePolicy};
pub use scorer::{normalize_inverse, QuoteScore, ScoringResult, VendorScorer};
