// ==========================================
// 采购治理驾驶舱 - 演示数据
// ==========================================
// 内容: 2 种原材料、3 家合格供应商、1 个 PR、1 个 RFQ、3 条报价
// 约束: 整体一个事务；供应商表非空即视为已写入，不重复写入
// ==========================================

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::app::state::AppState;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::types::STATUS_OPEN;
use crate::repository::action_log_repo::insert_action_log;
use crate::repository::error::{RepositoryError, RepositoryResult};

/// 演示数据写入结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedSummary {
    pub rm_ids: Vec<i64>,
    pub vendor_ids: Vec<i64>,
    pub pr_id: i64,
    pub rfq_id: i64,
    pub quote_ids: Vec<i64>,
}

const DEMO_RAW_MATERIALS: &[(&str, &str, &str)] = &[
    ("Paracetamol API", "IP Grade, Assay ≥ 99%", "High"),
    ("Microcrystalline Cellulose (MCC)", "PH102 Grade", "Medium"),
];

const DEMO_VENDORS: &[(&str, &str)] = &[
    ("HealthyChem Pharma Pvt Ltd", "Low"),
    ("BudgetBulk Chemicals", "Medium"),
    ("FastDeal Traders", "High"),
];

// (供应商下标, 单价, 交期, 付款条件, 有效期, 备注)
const DEMO_QUOTES: &[(usize, f64, i64, &str, i64, &str)] = &[
    (0, 520.0, 12, "30 days credit", 10, "Reliable GMP, best quality"),
    (1, 495.0, 18, "Advance", 7, "Cheapest but slower lead time"),
    (2, 480.0, 15, "Advance", 7, "Low price; risk/quality concerns"),
];

/// 供应商表非空即视为已写入
pub fn is_seeded(conn: &Connection) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM vendors", [], |row| row.get(0))?;
    Ok(count > 0)
}

/// 在一个事务内写入演示数据
pub fn seed_demo_data(conn: &mut Connection) -> rusqlite::Result<SeedSummary> {
    let tx = conn.transaction()?;

    let mut rm_ids = Vec::with_capacity(DEMO_RAW_MATERIALS.len());
    for (name, spec, criticality) in DEMO_RAW_MATERIALS {
        tx.execute(
            "INSERT INTO rm_master (rm_name, spec_short, criticality) VALUES (?1, ?2, ?3)",
            params![name, spec, criticality],
        )?;
        rm_ids.push(tx.last_insert_rowid());
    }

    let mut vendor_ids = Vec::with_capacity(DEMO_VENDORS.len());
    for (name, risk) in DEMO_VENDORS {
        tx.execute(
            "INSERT INTO vendors (vendor_name, approved, risk_rating) VALUES (?1, 1, ?2)",
            params![name, risk],
        )?;
        vendor_ids.push(tx.last_insert_rowid());
    }

    tx.execute(
        r#"
        INSERT INTO pr (rm_id, qty, need_by, site, created_by, status)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            rm_ids[0],
            1000.0,
            "2026-03-10",
            "Formulation-Unit-1",
            "Purchase",
            STATUS_OPEN
        ],
    )?;
    let pr_id = tx.last_insert_rowid();

    tx.execute(
        "INSERT INTO rfq (pr_id, status) VALUES (?1, ?2)",
        params![pr_id, STATUS_OPEN],
    )?;
    let rfq_id = tx.last_insert_rowid();

    let mut quote_ids = Vec::with_capacity(DEMO_QUOTES.len());
    for (vendor_idx, price, lead, terms, validity, notes) in DEMO_QUOTES {
        tx.execute(
            r#"
            INSERT INTO quotes (rfq_id, vendor_id, price, lead_time_days, payment_terms, validity_days, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![rfq_id, vendor_ids[*vendor_idx], price, lead, terms, validity, notes],
        )?;
        quote_ids.push(tx.last_insert_rowid());
    }

    let summary = SeedSummary {
        rm_ids,
        vendor_ids,
        pr_id,
        rfq_id,
        quote_ids,
    };

    insert_action_log(
        &tx,
        &ActionLog {
            action_id: uuid::Uuid::new_v4().to_string(),
            rfq_id: None,
            action_type: ActionType::SeedDemoData.to_string(),
            action_ts: chrono::Local::now().naive_local(),
            actor: "system".to_string(),
            payload_json: serde_json::to_value(&summary).ok(),
            detail: Some("写入演示数据".to_string()),
        },
    )?;

    tx.commit()?;
    Ok(summary)
}

impl AppState {
    pub fn is_seeded(&self) -> RepositoryResult<bool> {
        Ok(self.vendor_repo.count()? > 0)
    }

    /// 空库时写入演示数据
    ///
    /// # 返回
    /// - Ok(Some(SeedSummary)): 已写入
    /// - Ok(None): 库中已有供应商，跳过
    pub fn seed_if_empty(&self) -> RepositoryResult<Option<SeedSummary>> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        if is_seeded(&conn)? {
            tracing::info!("演示数据已存在，跳过写入");
            return Ok(None);
        }

        let summary = seed_demo_data(&mut conn)?;
        tracing::info!(
            rfq_id = summary.rfq_id,
            vendors = summary.vendor_ids.len(),
            quotes = summary.quote_ids.len(),
            "演示数据已写入"
        );
        Ok(Some(summary))
    }
}
