// ==========================================
// 采购治理驾驶舱 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 决策支持系统 (人工最终选择供应商, 系统给出推荐并留痕)
// 数据流: PR → RFQ → 报价 → 评分 → 决策记录 → 治理报表
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 评分与覆写策略
pub mod engine;

// 配置层 - 评分权重/覆写策略配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 依赖装配与演示数据
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Criticality, DeviationStatus, RiskRating};

// 领域实体
pub use domain::{
    ActionLog, ActionType, Decision, PurchaseRequirement, Quote, QuoteLine, RawMaterial,
    RecommendationSnapshot, Rfq, Vendor,
};

// 引擎
pub use engine::{EngineError, OverridePolicy, ScoringResult, VendorScorer};

// 配置
pub use config::{ConfigManager, ScoringWeights};

// API
pub use api::{ApiError, ApiResult, DashboardApi, DecisionApi, ProcurementApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "采购治理驾驶舱";
