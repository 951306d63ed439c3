// ==========================================
// 采购治理驾驶舱 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod action_log_repo;
pub mod decision_repo;
pub mod error;
pub mod master_repo;
pub mod pr_repo;
pub mod quote_repo;

// 重导出核心仓储
pub use action_log_repo::{insert_action_log, ActionLogRepository};
pub use decision_repo::{DecisionRepository, DecisionStore, GovernanceRow};
pub use error::{RepositoryError, RepositoryResult};
pub use master_repo::{RawMaterialRepository, VendorRepository};
pub use pr_repo::{PurchaseRequirementRepository, RfqRepository};
pub use quote_repo::{QuoteDetailRow, QuoteRepository};
