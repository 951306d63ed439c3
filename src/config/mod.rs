// ==========================================
// 采购治理驾驶舱 - 配置层
// ==========================================
// 职责: 评分权重与覆写原因策略的配置管理
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod scoring_profile;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use scoring_profile::ScoringWeights;
