// ==========================================
// 采购治理驾驶舱 - 采购需求 / 询价单仓储
// ==========================================
// 对齐: pr / rfq 表
// ==========================================

use crate::domain::procurement::{NewPurchaseRequirement, PurchaseRequirement, Rfq, RfqContext};
use crate::domain::types::STATUS_OPEN;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// PurchaseRequirementRepository - PR 仓储
// ==========================================
pub struct PurchaseRequirementRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PurchaseRequirementRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入 PR（状态固定为 Open），返回 pr_id
    pub fn insert(&self, pr: &NewPurchaseRequirement) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO pr (rm_id, qty, need_by, site, created_by, status)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                pr.rm_id,
                pr.qty,
                pr.need_by.format("%Y-%m-%d").to_string(),
                pr.site,
                pr.created_by,
                STATUS_OPEN,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id(&self, pr_id: i64) -> RepositoryResult<Option<PurchaseRequirement>> {
        let conn = self.get_conn()?;
        let pr = conn
            .query_row(
                r#"
                SELECT pr_id, rm_id, qty, need_by, site, created_by, status, created_on
                FROM pr WHERE pr_id = ?1
                "#,
                params![pr_id],
                map_pr,
            )
            .optional()?;
        Ok(pr)
    }

    pub fn count_by_status(&self, status: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM pr WHERE status = ?1",
            params![status],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn map_pr(row: &Row) -> rusqlite::Result<PurchaseRequirement> {
    Ok(PurchaseRequirement {
        pr_id: row.get(0)?,
        rm_id: row.get(1)?,
        qty: row.get(2)?,
        need_by: row.get(3)?,
        site: row.get(4)?,
        created_by: row.get(5)?,
        status: row.get(6)?,
        created_on: row.get(7)?,
    })
}

// ==========================================
// RfqRepository - 询价单仓储
// ==========================================
pub struct RfqRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RfqRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 为 PR 创建询价单，返回 rfq_id
    pub fn insert(&self, pr_id: i64) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO rfq (pr_id, status) VALUES (?1, ?2)",
            params![pr_id, STATUS_OPEN],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id(&self, rfq_id: i64) -> RepositoryResult<Option<Rfq>> {
        let conn = self.get_conn()?;
        let rfq = conn
            .query_row(
                "SELECT rfq_id, pr_id, status, created_on FROM rfq WHERE rfq_id = ?1",
                params![rfq_id],
                |row| {
                    Ok(Rfq {
                        rfq_id: row.get(0)?,
                        pr_id: row.get(1)?,
                        status: row.get(2)?,
                        created_on: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(rfq)
    }

    /// 询价单 + PR + 原材料上下文（rfq_id 降序）
    pub fn list_with_context(&self) -> RepositoryResult<Vec<RfqContext>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT rfq.rfq_id, pr.pr_id, rm.rm_name, pr.qty, pr.need_by, pr.site
            FROM rfq
            JOIN pr ON rfq.pr_id = pr.pr_id
            JOIN rm_master rm ON pr.rm_id = rm.rm_id
            ORDER BY rfq.rfq_id DESC
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(RfqContext {
                    rfq_id: row.get(0)?,
                    pr_id: row.get(1)?,
                    rm_name: row.get(2)?,
                    qty: row.get(3)?,
                    need_by: row.get(4)?,
                    site: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    pub fn count_by_status(&self, status: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM rfq WHERE status = ?1",
            params![status],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
