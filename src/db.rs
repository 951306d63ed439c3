// ==========================================
// 采购治理驾驶舱 - SQLite 连接初始化与建表
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键、busy_timeout）
// - 统一建表入口，启动时幂等执行
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 建表（幂等）并写入 schema_version
///
/// 表结构:
/// - 主数据: rm_master, vendors
/// - 业务数据: pr, rfq, quotes
/// - 决策数据: rfq_recommendation_snapshot, rfq_decision（均以 rfq_id 唯一）
/// - 基础设施: config_kv, action_log, schema_version
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    configure_sqlite_connection(conn)?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS rm_master (
            rm_id INTEGER PRIMARY KEY AUTOINCREMENT,
            rm_name TEXT NOT NULL,
            spec_short TEXT,
            criticality TEXT CHECK(criticality IN ('Low','Medium','High')) DEFAULT 'Medium'
        );

        CREATE TABLE IF NOT EXISTS vendors (
            vendor_id INTEGER PRIMARY KEY AUTOINCREMENT,
            vendor_name TEXT NOT NULL,
            approved INTEGER DEFAULT 0,
            risk_rating TEXT NOT NULL CHECK(risk_rating IN ('Low','Medium','High')) DEFAULT 'Medium'
        );

        CREATE TABLE IF NOT EXISTS pr (
            pr_id INTEGER PRIMARY KEY AUTOINCREMENT,
            rm_id INTEGER NOT NULL,
            qty REAL NOT NULL,
            need_by TEXT NOT NULL,
            site TEXT,
            created_by TEXT,
            status TEXT DEFAULT 'Open',
            created_on TEXT DEFAULT (datetime('now')),
            FOREIGN KEY (rm_id) REFERENCES rm_master(rm_id)
        );

        CREATE TABLE IF NOT EXISTS rfq (
            rfq_id INTEGER PRIMARY KEY AUTOINCREMENT,
            pr_id INTEGER NOT NULL,
            status TEXT DEFAULT 'Open',
            created_on TEXT DEFAULT (datetime('now')),
            FOREIGN KEY (pr_id) REFERENCES pr(pr_id)
        );

        CREATE TABLE IF NOT EXISTS quotes (
            quote_id INTEGER PRIMARY KEY AUTOINCREMENT,
            rfq_id INTEGER NOT NULL,
            vendor_id INTEGER NOT NULL,
            price REAL NOT NULL CHECK(price > 0),
            lead_time_days INTEGER NOT NULL CHECK(lead_time_days > 0),
            payment_terms TEXT,
            validity_days INTEGER,
            notes TEXT,
            created_on TEXT DEFAULT (datetime('now')),
            FOREIGN KEY (rfq_id) REFERENCES rfq(rfq_id),
            FOREIGN KEY (vendor_id) REFERENCES vendors(vendor_id)
        );

        CREATE INDEX IF NOT EXISTS idx_quotes_rfq ON quotes(rfq_id);

        CREATE TABLE IF NOT EXISTS rfq_decision (
            decision_id INTEGER PRIMARY KEY AUTOINCREMENT,
            rfq_id INTEGER NOT NULL,
            selected_vendor_id INTEGER NOT NULL,
            selected_by TEXT NOT NULL,
            override_reason TEXT,
            created_on TEXT DEFAULT (datetime('now')),
            FOREIGN KEY (rfq_id) REFERENCES rfq(rfq_id),
            FOREIGN KEY (selected_vendor_id) REFERENCES vendors(vendor_id),
            UNIQUE (rfq_id)
        );

        CREATE TABLE IF NOT EXISTS rfq_recommendation_snapshot (
            snapshot_id INTEGER PRIMARY KEY AUTOINCREMENT,
            rfq_id INTEGER NOT NULL UNIQUE,
            recommended_vendor_id INTEGER NOT NULL,
            cheapest_vendor_id INTEGER NOT NULL,
            weights TEXT,
            created_on TEXT DEFAULT (datetime('now')),
            FOREIGN KEY (rfq_id) REFERENCES rfq(rfq_id),
            FOREIGN KEY (recommended_vendor_id) REFERENCES vendors(vendor_id),
            FOREIGN KEY (cheapest_vendor_id) REFERENCES vendors(vendor_id)
        );

        CREATE TABLE IF NOT EXISTS action_log (
            action_id TEXT PRIMARY KEY,
            rfq_id INTEGER,
            action_type TEXT NOT NULL,
            action_ts TEXT NOT NULL,
            actor TEXT NOT NULL,
            payload_json TEXT,
            detail TEXT,
            FOREIGN KEY (rfq_id) REFERENCES rfq(rfq_id)
        );

        CREATE INDEX IF NOT EXISTS idx_action_log_rfq_ts ON action_log(rfq_id, action_ts);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}
