// ==========================================
// 采购治理驾驶舱 - 报价仓储
// ==========================================
// 对齐: quotes 表
// 红线: 报价只插入不更新
// ==========================================

use crate::domain::procurement::{NewQuote, Quote, QuoteLine};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

/// 报价明细行（报表用：报价 + RFQ/PR/原材料/供应商上下文）
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct QuoteDetailRow {
    pub rfq_id: i64,
    pub pr_id: i64,
    pub rm_name: String,
    pub qty: f64,
    pub need_by: chrono::NaiveDate,
    pub site: Option<String>,
    pub vendor_id: i64,
    pub vendor_name: String,
    pub risk_rating: String,
    pub quote_id: i64,
    pub price: f64,
    pub lead_time_days: i64,
    pub payment_terms: Option<String>,
    pub validity_days: Option<i64>,
    pub notes: Option<String>,
}

// ==========================================
// QuoteRepository - 报价仓储
// ==========================================
pub struct QuoteRepository {
    conn: Arc<Mutex<Connection>>,
}

impl QuoteRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入报价，返回 quote_id
    pub fn insert(&self, quote: &NewQuote) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO quotes (rfq_id, vendor_id, price, lead_time_days, payment_terms, validity_days, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                quote.rfq_id,
                quote.vendor_id,
                quote.price,
                quote.lead_time_days,
                quote.payment_terms,
                quote.validity_days,
                quote.notes,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id(&self, quote_id: i64) -> RepositoryResult<Option<Quote>> {
        let conn = self.get_conn()?;
        let quote = conn
            .query_row(
                r#"
                SELECT quote_id, rfq_id, vendor_id, price, lead_time_days,
                       payment_terms, validity_days, notes, created_on
                FROM quotes WHERE quote_id = ?1
                "#,
                params![quote_id],
                |row| {
                    Ok(Quote {
                        quote_id: row.get(0)?,
                        rfq_id: row.get(1)?,
                        vendor_id: row.get(2)?,
                        price: row.get(3)?,
                        lead_time_days: row.get(4)?,
                        payment_terms: row.get(5)?,
                        validity_days: row.get(6)?,
                        notes: row.get(7)?,
                        created_on: row.get(8)?,
                    })
                },
            )
            .optional()?;
        Ok(quote)
    }

    /// 查询某 RFQ 的评分输入行（按 quote_id 输出）
    ///
    /// 最低价/推荐的选取只看 vendor_id 平局规则，与行顺序无关
    pub fn find_lines_by_rfq(&self, rfq_id: i64) -> RepositoryResult<Vec<QuoteLine>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT q.quote_id, v.vendor_id, v.vendor_name, v.risk_rating, q.price,
                   q.lead_time_days, q.payment_terms, q.validity_days, q.notes
            FROM quotes q
            JOIN vendors v ON q.vendor_id = v.vendor_id
            WHERE q.rfq_id = ?1
            ORDER BY q.quote_id ASC
            "#,
        )?;

        let lines = stmt
            .query_map(params![rfq_id], map_quote_line)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(lines)
    }

    /// 报价明细（可按 RFQ 过滤），按 rfq_id、价格升序
    pub fn list_details(&self, rfq_id: Option<i64>) -> RepositoryResult<Vec<QuoteDetailRow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT rfq.rfq_id, pr.pr_id, rm.rm_name, pr.qty, pr.need_by, pr.site,
                   v.vendor_id, v.vendor_name, v.risk_rating,
                   q.quote_id, q.price, q.lead_time_days, q.payment_terms, q.validity_days, q.notes
            FROM quotes q
            JOIN rfq ON q.rfq_id = rfq.rfq_id
            JOIN pr  ON rfq.pr_id = pr.pr_id
            JOIN rm_master rm ON pr.rm_id = rm.rm_id
            JOIN vendors v ON q.vendor_id = v.vendor_id
            WHERE (?1 IS NULL OR rfq.rfq_id = ?1)
            ORDER BY rfq.rfq_id, q.price ASC, q.quote_id ASC
            "#,
        )?;

        let rows = stmt
            .query_map(params![rfq_id], |row| {
                Ok(QuoteDetailRow {
                    rfq_id: row.get(0)?,
                    pr_id: row.get(1)?,
                    rm_name: row.get(2)?,
                    qty: row.get(3)?,
                    need_by: row.get(4)?,
                    site: row.get(5)?,
                    vendor_id: row.get(6)?,
                    vendor_name: row.get(7)?,
                    risk_rating: read_risk_text(row, 8)?,
                    quote_id: row.get(9)?,
                    price: row.get(10)?,
                    lead_time_days: row.get(11)?,
                    payment_terms: row.get(12)?,
                    validity_days: row.get(13)?,
                    notes: row.get(14)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    pub fn count_all(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM quotes", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn map_quote_line(row: &Row) -> rusqlite::Result<QuoteLine> {
    Ok(QuoteLine {
        quote_id: row.get(0)?,
        vendor_id: row.get(1)?,
        vendor_name: row.get(2)?,
        risk_rating: read_risk_text(row, 3)?,
        price: row.get(4)?,
        lead_time_days: row.get(5)?,
        payment_terms: row.get(6)?,
        validity_days: row.get(7)?,
        notes: row.get(8)?,
    })
}

/// 风险等级原样读出；NULL 读为空串，评分时按无法识别处理（Medium 扣分）
fn read_risk_text(row: &Row, idx: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}

impl QuoteDetailRow {
    /// 转为评分输入行
    pub fn to_quote_line(&self) -> QuoteLine {
        QuoteLine {
            quote_id: self.quote_id,
            vendor_id: self.vendor_id,
            vendor_name: self.vendor_name.clone(),
            risk_rating: self.risk_rating.clone(),
            price: self.price,
            lead_time_days: self.lead_time_days,
            payment_terms: self.payment_terms.clone(),
            validity_days: self.validity_days,
            notes: self.notes.clone(),
        }
    }
}
