// ==========================================
// 采购治理驾驶舱 - 操作日志数据仓储
// ==========================================
// 对齐: action_log 表
// 红线: 决策写入必须记录
// ==========================================

mod core;
mod queries;

#[cfg(test)]
mod tests;

pub use self::core::{insert_action_log, ActionLogRepository};
