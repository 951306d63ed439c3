// ==========================================
// 采购治理驾驶舱 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod action_log;
pub mod decision;
pub mod master;
pub mod procurement;
pub mod types;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType};
pub use decision::{Decision, DecisionRecord, RecommendationSnapshot};
pub use master::{NewRawMaterial, NewVendor, RawMaterial, Vendor};
pub use procurement::{
    NewPurchaseRequirement, NewQuote, PurchaseRequirement, Quote, QuoteLine, Rfq, RfqContext,
};
pub use types::{Criticality, DeviationStatus, RiskRating, STATUS_OPEN};
