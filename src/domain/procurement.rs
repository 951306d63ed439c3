// ==========================================
// 采购治理驾驶舱 - 采购业务领域模型
// ==========================================
// 对齐: pr / rfq / quotes 表
// 关系: PR 1—N RFQ, RFQ 1—N Quote
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// PurchaseRequirement - 采购需求 (PR)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRequirement {
    pub pr_id: i64,
    pub rm_id: i64,                 // 原材料
    pub qty: f64,                   // 需求数量
    pub need_by: NaiveDate,         // 需求日期
    pub site: Option<String>,       // 需求工厂/车间
    pub created_by: Option<String>, // 创建人
    pub status: String,             // 默认 Open
    pub created_on: NaiveDateTime,
}

/// 新建 PR 参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPurchaseRequirement {
    pub rm_id: i64,
    pub qty: f64,
    pub need_by: NaiveDate,
    pub site: Option<String>,
    pub created_by: Option<String>,
}

// ==========================================
// Rfq - 询价单
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rfq {
    pub rfq_id: i64,
    pub pr_id: i64,
    pub status: String,
    pub created_on: NaiveDateTime,
}

/// 询价单上下文（决策页 RFQ 选择器：RFQ + PR + 原材料）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RfqContext {
    pub rfq_id: i64,
    pub pr_id: i64,
    pub rm_name: String,
    pub qty: f64,
    pub need_by: NaiveDate,
    pub site: Option<String>,
}

// ==========================================
// Quote - 供应商报价（创建后不可变）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub quote_id: i64,
    pub rfq_id: i64,
    pub vendor_id: i64,
    pub price: f64,                    // 单价，必须 > 0
    pub lead_time_days: i64,           // 交期（天），必须 > 0
    pub payment_terms: Option<String>, // 付款条件
    pub validity_days: Option<i64>,    // 报价有效期（天）
    pub notes: Option<String>,
    pub created_on: NaiveDateTime,
}

/// 新建报价参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuote {
    pub rfq_id: i64,
    pub vendor_id: i64,
    pub price: f64,
    pub lead_time_days: i64,
    pub payment_terms: Option<String>,
    pub validity_days: Option<i64>,
    pub notes: Option<String>,
}

// ==========================================
// QuoteLine - 评分输入行（报价 JOIN 供应商）
// ==========================================
// 评分引擎只依赖这一内存结构
// risk_rating 保留原始字符串，无法识别的值由引擎兜底
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteLine {
    pub quote_id: i64,
    pub vendor_id: i64,
    pub vendor_name: String,
    pub risk_rating: String,
    pub price: f64,
    pub lead_time_days: i64,
    pub payment_terms: Option<String>,
    pub validity_days: Option<i64>,
    pub notes: Option<String>,
}
