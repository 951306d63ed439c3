// ==========================================
// 采购治理驾驶舱 - 需求录入 API
// ==========================================
// 职责: 原材料 / 供应商 / PR / RFQ / 报价录入与查询
// 红线: 报价只插入不更新；引用的记录必须存在（外键开启）
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{
    validate_new_pr, validate_new_quote, validate_new_raw_material, validate_new_vendor,
};
use crate::domain::master::{NewRawMaterial, NewVendor, RawMaterial, Vendor};
use crate::domain::procurement::{NewPurchaseRequirement, NewQuote, RfqContext};
use crate::repository::master_repo::{RawMaterialRepository, VendorRepository};
use crate::repository::pr_repo::{PurchaseRequirementRepository, RfqRepository};
use crate::repository::quote_repo::QuoteRepository;

pub struct ProcurementApi {
    rm_repo: Arc<RawMaterialRepository>,
    vendor_repo: Arc<VendorRepository>,
    pr_repo: Arc<PurchaseRequirementRepository>,
    rfq_repo: Arc<RfqRepository>,
    quote_repo: Arc<QuoteRepository>,
}

impl ProcurementApi {
    pub fn new(
        rm_repo: Arc<RawMaterialRepository>,
        vendor_repo: Arc<VendorRepository>,
        pr_repo: Arc<PurchaseRequirementRepository>,
        rfq_repo: Arc<RfqRepository>,
        quote_repo: Arc<QuoteRepository>,
    ) -> Self {
        Self {
            rm_repo,
            vendor_repo,
            pr_repo,
            rfq_repo,
            quote_repo,
        }
    }

    // ==========================================
    // 主数据
    // ==========================================

    pub fn create_raw_material(&self, rm: NewRawMaterial) -> ApiResult<i64> {
        validate_new_raw_material(&rm)?;
        let rm_id = self.rm_repo.insert(&rm)?;
        tracing::info!(rm_id, rm_name = %rm.rm_name, "原材料已创建");
        Ok(rm_id)
    }

    pub fn create_vendor(&self, vendor: NewVendor) -> ApiResult<i64> {
        validate_new_vendor(&vendor)?;
        let vendor_id = self.vendor_repo.insert(&vendor)?;
        tracing::info!(vendor_id, vendor_name = %vendor.vendor_name, "供应商已创建");
        Ok(vendor_id)
    }

    pub fn list_raw_materials(&self) -> ApiResult<Vec<RawMaterial>> {
        Ok(self.rm_repo.list_all()?)
    }

    pub fn list_vendors(&self) -> ApiResult<Vec<Vendor>> {
        Ok(self.vendor_repo.list_all()?)
    }

    // ==========================================
    // PR / RFQ / 报价
    // ==========================================

    pub fn create_pr(&self, pr: NewPurchaseRequirement) -> ApiResult<i64> {
        validate_new_pr(&pr)?;
        if self.rm_repo.find_by_id(pr.rm_id)?.is_none() {
            return Err(ApiError::NotFound(format!("原材料(id={})不存在", pr.rm_id)));
        }
        let pr_id = self.pr_repo.insert(&pr)?;
        tracing::info!(pr_id, rm_id = pr.rm_id, qty = pr.qty, "PR 已创建");
        Ok(pr_id)
    }

    pub fn create_rfq(&self, pr_id: i64) -> ApiResult<i64> {
        if self.pr_repo.find_by_id(pr_id)?.is_none() {
            return Err(ApiError::NotFound(format!("PR(id={})不存在", pr_id)));
        }
        let rfq_id = self.rfq_repo.insert(pr_id)?;
        tracing::info!(rfq_id, pr_id, "RFQ 已创建");
        Ok(rfq_id)
    }

    pub fn add_quote(&self, quote: NewQuote) -> ApiResult<i64> {
        validate_new_quote(&quote)?;
        if self.rfq_repo.find_by_id(quote.rfq_id)?.is_none() {
            return Err(ApiError::NotFound(format!("RFQ(id={})不存在", quote.rfq_id)));
        }
        if self.vendor_repo.find_by_id(quote.vendor_id)?.is_none() {
            return Err(ApiError::NotFound(format!(
                "供应商(id={})不存在",
                quote.vendor_id
            )));
        }
        let quote_id = self.quote_repo.insert(&quote)?;
        tracing::info!(
            quote_id,
            rfq_id = quote.rfq_id,
            vendor_id = quote.vendor_id,
            price = quote.price,
            "报价已录入"
        );
        Ok(quote_id)
    }

    /// RFQ 选择器（含 PR / 原材料上下文，rfq_id 降序）
    pub fn list_rfqs(&self) -> ApiResult<Vec<RfqContext>> {
        Ok(self.rfq_repo.list_with_context()?)
    }
}
