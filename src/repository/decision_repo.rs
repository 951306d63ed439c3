// ==========================================
// 采购治理驾驶舱 - 决策与推荐快照仓储
// ==========================================
// 对齐: rfq_recommendation_snapshot / rfq_decision 表
// 约束: 两表均以 rfq_id 唯一 → 写入一律 UPSERT（覆盖，不追加）
// 红线: 快照与决策必须在同一事务内写入
// ==========================================

use crate::domain::action_log::ActionLog;
use crate::domain::decision::{Decision, DecisionRecord, RecommendationSnapshot};
use crate::repository::action_log_repo::insert_action_log;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};


/// 治理视图行（RFQ LEFT JOIN 快照 / 决策）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernanceRow {
    pub rfq_id: i64,
    pub pr_id: i64,
    pub rm_name: String,
    pub cheapest_vendor_id: Option<i64>,
    pub cheapest_vendor: Option<String>,
    pub recommended_vendor_id: Option<i64>,
    pub recommended_vendor: Option<String>,
    pub selected_vendor_id: Option<i64>,
    pub selected_vendor: Option<String>,
    pub selected_by: Option<String>,
    pub override_reason: Option<String>,
    pub decision_time: Option<chrono::NaiveDateTime>,
}

// ==========================================
// DecisionStore - 决策持久化接口
// ==========================================
// 决策记录器只依赖该接口，不依赖具体存储引擎的冲突处理语法
pub trait DecisionStore: Send + Sync {
    /// 原子保存推荐快照与决策
    ///
    /// 契约:
    /// - 快照按 rfq_id UPSERT（覆盖推荐/最低价/权重，重置时间戳）
    /// - 决策按 rfq_id UPSERT（覆盖所选供应商/决策人/原因，重置时间戳）
    /// - audit 非空时在同一事务内追加操作日志
    /// - 任一步失败则整体回滚，不留下部分写入
    fn save_decision_atomically(
        &self,
        snapshot: &RecommendationSnapshot,
        decision: &Decision,
        audit: Option<&ActionLog>,
    ) -> RepositoryResult<()>;

    /// 查询推荐快照
    fn find_snapshot(&self, rfq_id: i64) -> RepositoryResult<Option<RecommendationSnapshot>>;

    /// 查询决策
    fn find_decision(&self, rfq_id: i64) -> RepositoryResult<Option<Decision>>;

    /// 已保存决策 + 快照（含供应商名称）；未决策返回 None
    fn find_decision_record(&self, rfq_id: i64) -> RepositoryResult<Option<DecisionRecord>>;
}

// ==========================================
// DecisionRepository - SQLite 实现
// ==========================================
pub struct DecisionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DecisionRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 治理视图（rfq_id 降序），可按 PR / RFQ 过滤
    pub fn list_governance_rows(
        &self,
        pr_id: Option<i64>,
        rfq_id: Option<i64>,
    ) -> RepositoryResult<Vec<GovernanceRow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT rfq.rfq_id, pr.pr_id, rm.rm_name,
                   s.cheapest_vendor_id, vcheap.vendor_name,
                   s.recommended_vendor_id, vrec.vendor_name,
                   d.selected_vendor_id, vsel.vendor_name,
                   d.selected_by, d.override_reason, d.created_on
            FROM rfq
            JOIN pr ON rfq.pr_id = pr.pr_id
            JOIN rm_master rm ON pr.rm_id = rm.rm_id
            LEFT JOIN rfq_recommendation_snapshot s ON s.rfq_id = rfq.rfq_id
            LEFT JOIN vendors vcheap ON s.cheapest_vendor_id = vcheap.vendor_id
            LEFT JOIN vendors vrec   ON s.recommended_vendor_id = vrec.vendor_id
            LEFT JOIN rfq_decision d ON d.rfq_id = rfq.rfq_id
            LEFT JOIN vendors vsel   ON d.selected_vendor_id = vsel.vendor_id
            WHERE (?1 IS NULL OR pr.pr_id = ?1)
              AND (?2 IS NULL OR rfq.rfq_id = ?2)
            ORDER BY rfq.rfq_id DESC
            "#,
        )?;

        let rows = stmt
            .query_map(params![pr_id, rfq_id], |row| {
                Ok(GovernanceRow {
                    rfq_id: row.get(0)?,
                    pr_id: row.get(1)?,
                    rm_name: row.get(2)?,
                    cheapest_vendor_id: row.get(3)?,
                    cheapest_vendor: row.get(4)?,
                    recommended_vendor_id: row.get(5)?,
                    recommended_vendor: row.get(6)?,
                    selected_vendor_id: row.get(7)?,
                    selected_vendor: row.get(8)?,
                    selected_by: row.get(9)?,
                    override_reason: row.get(10)?,
                    decision_time: row.get(11)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }
}

impl DecisionStore for DecisionRepository {
    fn save_decision_atomically(
        &self,
        snapshot: &RecommendationSnapshot,
        decision: &Decision,
        audit: Option<&ActionLog>,
    ) -> RepositoryResult<()> {
        if snapshot.rfq_id != decision.rfq_id {
            return Err(RepositoryError::ValidationError(format!(
                "快照与决策的 rfq_id 不一致: {} != {}",
                snapshot.rfq_id, decision.rfq_id
            )));
        }

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO rfq_recommendation_snapshot (rfq_id, recommended_vendor_id, cheapest_vendor_id, weights)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(rfq_id) DO UPDATE SET
              recommended_vendor_id = excluded.recommended_vendor_id,
              cheapest_vendor_id = excluded.cheapest_vendor_id,
              weights = excluded.weights,
              created_on = datetime('now')
            "#,
            params![
                snapshot.rfq_id,
                snapshot.recommended_vendor_id,
                snapshot.cheapest_vendor_id,
                snapshot.weights,
            ],
        )?;

        tx.execute(
            r#"
            INSERT INTO rfq_decision (rfq_id, selected_vendor_id, selected_by, override_reason)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(rfq_id) DO UPDATE SET
              selected_vendor_id = excluded.selected_vendor_id,
              selected_by = excluded.selected_by,
              override_reason = excluded.override_reason,
              created_on = datetime('now')
            "#,
            params![
                decision.rfq_id,
                decision.selected_vendor_id,
                decision.selected_by,
                decision.override_reason,
            ],
        )?;

        if let Some(log) = audit {
            insert_action_log(&tx, log)?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(())
    }

    fn find_decision_record(&self, rfq_id: i64) -> RepositoryResult<Option<DecisionRecord>> {
        let conn = self.get_conn()?;
        let record = conn
            .query_row(
                r#"
                SELECT d.rfq_id, d.selected_vendor_id, vsel.vendor_name, d.selected_by,
                       d.override_reason, d.created_on,
                       s.recommended_vendor_id, vrec.vendor_name,
                       s.cheapest_vendor_id, vcheap.vendor_name,
                       s.weights, s.created_on
                FROM rfq_decision d
                JOIN vendors vsel ON d.selected_vendor_id = vsel.vendor_id
                LEFT JOIN rfq_recommendation_snapshot s ON s.rfq_id = d.rfq_id
                LEFT JOIN vendors vrec ON s.recommended_vendor_id = vrec.vendor_id
                LEFT JOIN vendors vcheap ON s.cheapest_vendor_id = vcheap.vendor_id
                WHERE d.rfq_id = ?1
                "#,
                params![rfq_id],
                |row| {
                    Ok(DecisionRecord {
                        rfq_id: row.get(0)?,
                        selected_vendor_id: row.get(1)?,
                        selected_vendor: row.get(2)?,
                        selected_by: row.get(3)?,
                        override_reason: row.get(4)?,
                        decision_time: row.get(5)?,
                        recommended_vendor_id: row.get(6)?,
                        recommended_vendor: row.get(7)?,
                        cheapest_vendor_id: row.get(8)?,
                        cheapest_vendor: row.get(9)?,
                        weights: row.get(10)?,
                        snapshot_time: row.get(11)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    fn find_snapshot(&self, rfq_id: i64) -> RepositoryResult<Option<RecommendationSnapshot>> {
        let conn = self.get_conn()?;
        let snapshot = conn
            .query_row(
                r#"
                SELECT rfq_id, recommended_vendor_id, cheapest_vendor_id, weights, created_on
                FROM rfq_recommendation_snapshot WHERE rfq_id = ?1
                "#,
                params![rfq_id],
                |row| {
                    Ok(RecommendationSnapshot {
                        rfq_id: row.get(0)?,
                        recommended_vendor_id: row.get(1)?,
                        cheapest_vendor_id: row.get(2)?,
                        weights: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                        created_on: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(snapshot)
    }

    fn find_decision(&self, rfq_id: i64) -> RepositoryResult<Option<Decision>> {
        let conn = self.get_conn()?;
        let decision = conn
            .query_row(
                r#"
                SELECT rfq_id, selected_vendor_id, selected_by, override_reason, created_on
                FROM rfq_decision WHERE rfq_id = ?1
                "#,
                params![rfq_id],
                |row| {
                    Ok(Decision {
                        rfq_id: row.get(0)?,
                        selected_vendor_id: row.get(1)?,
                        selected_by: row.get(2)?,
                        override_reason: row.get(3)?,
                        created_on: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(decision)
    }
}
