// ==========================================
// 采购治理驾驶舱 - 主数据仓储
// ==========================================
// 对齐: rm_master / vendors 表
// 红线: Repository 不做业务逻辑,只做数据映射
// ==========================================

use crate::domain::master::{NewRawMaterial, NewVendor, RawMaterial, Vendor};
use crate::domain::types::{Criticality, RiskRating};
use crate::repository::error::{text_conversion_error, RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// RawMaterialRepository - 原材料仓储
// ==========================================
pub struct RawMaterialRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RawMaterialRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入原材料，返回 rm_id
    pub fn insert(&self, rm: &NewRawMaterial) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO rm_master (rm_name, spec_short, criticality) VALUES (?1, ?2, ?3)",
            params![rm.rm_name, rm.spec_short, rm.criticality.as_str()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id(&self, rm_id: i64) -> RepositoryResult<Option<RawMaterial>> {
        let conn = self.get_conn()?;
        let rm = conn
            .query_row(
                "SELECT rm_id, rm_name, spec_short, criticality FROM rm_master WHERE rm_id = ?1",
                params![rm_id],
                map_raw_material,
            )
            .optional()?;
        Ok(rm)
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<RawMaterial>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT rm_id, rm_name, spec_short, criticality FROM rm_master ORDER BY rm_id",
        )?;
        let rows = stmt
            .query_map([], map_raw_material)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

fn map_raw_material(row: &Row) -> rusqlite::Result<RawMaterial> {
    let raw: String = row.get(3)?;
    let criticality = Criticality::parse(&raw)
        .ok_or_else(|| text_conversion_error(3, format!("未知关键度: {}", raw)))?;

    Ok(RawMaterial {
        rm_id: row.get(0)?,
        rm_name: row.get(1)?,
        spec_short: row.get(2)?,
        criticality,
    })
}

// ==========================================
// VendorRepository - 供应商仓储
// ==========================================
pub struct VendorRepository {
    conn: Arc<Mutex<Connection>>,
}

impl VendorRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入供应商，返回 vendor_id
    pub fn insert(&self, vendor: &NewVendor) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO vendors (vendor_name, approved, risk_rating) VALUES (?1, ?2, ?3)",
            params![
                vendor.vendor_name,
                vendor.approved as i64,
                vendor.risk_rating.as_str()
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id(&self, vendor_id: i64) -> RepositoryResult<Option<Vendor>> {
        let conn = self.get_conn()?;
        let vendor = conn
            .query_row(
                "SELECT vendor_id, vendor_name, approved, risk_rating FROM vendors WHERE vendor_id = ?1",
                params![vendor_id],
                map_vendor,
            )
            .optional()?;
        Ok(vendor)
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<Vendor>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT vendor_id, vendor_name, approved, risk_rating FROM vendors ORDER BY vendor_id",
        )?;
        let rows = stmt
            .query_map([], map_vendor)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// 供应商数量（用于判断是否已写入演示数据）
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM vendors", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn map_vendor(row: &Row) -> rusqlite::Result<Vendor> {
    // 旧库 risk_rating 列可为 NULL，按 Medium 读出（与评分扣分一致）
    let risk_rating = match row.get::<_, Option<String>>(3)? {
        None => RiskRating::Medium,
        Some(raw) => RiskRating::parse(&raw)
            .ok_or_else(|| text_conversion_error(3, format!("未知风险等级: {}", raw)))?,
    };
    let approved: i64 = row.get(2)?;

    Ok(Vendor {
        vendor_id: row.get(0)?,
        vendor_name: row.get(1)?,
        approved: approved != 0,
        risk_rating,
    })
}
