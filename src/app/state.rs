// ==========================================
// 采购治理驾驶舱 - 应用状态
// ==========================================
// 职责: 打开数据库、建表，并以同一共享连接装配所有仓储与 API
// 约束: 无全局连接，所有组件显式注入
// ==========================================

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::api::{DashboardApi, DecisionApi, ProcurementApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::repository::{
    action_log_repo::ActionLogRepository,
    decision_repo::{DecisionRepository, DecisionStore},
    master_repo::{RawMaterialRepository, VendorRepository},
    pr_repo::{PurchaseRequirementRepository, RfqRepository},
    quote_repo::QuoteRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 共享连接（种子数据等需要整体事务的场景直接使用）
    pub conn: Arc<Mutex<Connection>>,

    /// 决策API
    pub decision_api: Arc<DecisionApi>,

    /// 驾驶舱API
    pub dashboard_api: Arc<DashboardApi>,

    /// 需求录入API
    pub procurement_api: Arc<ProcurementApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 操作日志仓储（用于审计追踪）
    pub action_log_repo: Arc<ActionLogRepository>,

    /// 供应商仓储（用于判断是否已写入演示数据）
    pub vendor_repo: Arc<VendorRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;

        Self::from_connection(db_path, conn)
    }

    /// 从已打开的连接装配（测试可传入内存库）
    pub fn from_connection(db_path: String, conn: Connection) -> Result<Self, String> {
        ensure_schema(&conn).map_err(|e| format!("建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let rm_repo = Arc::new(RawMaterialRepository::new(conn.clone()));
        let vendor_repo = Arc::new(VendorRepository::new(conn.clone()));
        let pr_repo = Arc::new(PurchaseRequirementRepository::new(conn.clone()));
        let rfq_repo = Arc::new(RfqRepository::new(conn.clone()));
        let quote_repo = Arc::new(QuoteRepository::new(conn.clone()));
        let decision_repo = Arc::new(DecisionRepository::new(conn.clone()));
        let action_log_repo = Arc::new(ActionLogRepository::new(conn.clone()));

        let config_manager = Arc::new(ConfigManager::from_connection(conn.clone()));

        // ==========================================
        // 初始化API层
        // ==========================================
        let decision_store: Arc<dyn DecisionStore> = decision_repo.clone();

        let decision_api = Arc::new(DecisionApi::new(
            rfq_repo.clone(),
            quote_repo.clone(),
            decision_store,
            action_log_repo.clone(),
            config_manager.clone(),
        ));

        let dashboard_api = Arc::new(DashboardApi::new(
            pr_repo.clone(),
            rfq_repo.clone(),
            quote_repo.clone(),
            decision_repo,
            config_manager.clone(),
        ));

        let procurement_api = Arc::new(ProcurementApi::new(
            rm_repo,
            vendor_repo.clone(),
            pr_repo,
            rfq_repo,
            quote_repo,
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            conn,
            decision_api,
            dashboard_api,
            procurement_api,
            config_manager,
            action_log_repo,
            vendor_repo,
        })
    }
}

/// 默认数据库路径
///
/// 优先级: 环境变量 PROCURE_LIVE_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("PROCURE_LIVE_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./procurement.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("procure-live");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("procurement.db");
        }
    }

    path.to_string_lossy().to_string()
}
