// ==========================================
// 采购治理驾驶舱 - 应用层
// ==========================================
// 职责: 装配仓储与 API，演示数据写入
// ==========================================

pub mod seed;
pub mod state;

// 重导出
pub use seed::SeedSummary;
pub use state::{get_default_db_path, AppState};
