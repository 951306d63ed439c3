// ==========================================
// 采购治理驾驶舱 - 请求校验器
// ==========================================
// 职责: 决策请求与录入请求的前置校验
// 红线: 所有校验在事务开启前完成，失败即拒绝
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::master::{NewRawMaterial, NewVendor};
use crate::domain::procurement::{NewPurchaseRequirement, NewQuote};
use crate::engine::scorer::ScoringResult;

// ==========================================
// DecisionRequestValidator - 决策请求校验
// ==========================================
pub struct DecisionRequestValidator;

impl DecisionRequestValidator {
    /// 校验决策人身份，返回去除首尾空白后的身份
    pub fn validate_identity(selected_by: &str) -> ApiResult<String> {
        let identity = selected_by.trim();
        if identity.is_empty() {
            return Err(ApiError::MissingIdentity);
        }
        Ok(identity.to_string())
    }

    /// 校验所选供应商在该 RFQ 的报价集合内
    pub fn validate_selection(
        rfq_id: i64,
        selected_vendor_id: i64,
        scoring: &ScoringResult,
    ) -> ApiResult<()> {
        if scoring.score_of(selected_vendor_id).is_none() {
            return Err(ApiError::UnknownVendorSelection {
                rfq_id,
                vendor_id: selected_vendor_id,
            });
        }
        Ok(())
    }
}

// ==========================================
// 录入校验
// ==========================================

fn require_name(field: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidInput(format!("{}不能为空", field)));
    }
    Ok(())
}

pub fn validate_new_raw_material(rm: &NewRawMaterial) -> ApiResult<()> {
    require_name("原材料名称", &rm.rm_name)
}

pub fn validate_new_vendor(vendor: &NewVendor) -> ApiResult<()> {
    require_name("供应商名称", &vendor.vendor_name)
}

pub fn validate_new_pr(pr: &NewPurchaseRequirement) -> ApiResult<()> {
    if !(pr.qty.is_finite() && pr.qty > 0.0) {
        return Err(ApiError::InvalidInput(format!(
            "需求数量必须大于0: qty={}",
            pr.qty
        )));
    }
    Ok(())
}

pub fn validate_new_quote(quote: &NewQuote) -> ApiResult<()> {
    if !(quote.price.is_finite() && quote.price > 0.0) {
        return Err(ApiError::InvalidInput(format!(
            "报价必须为大于0的有限数: price={}",
            quote.price
        )));
    }
    if quote.lead_time_days <= 0 {
        return Err(ApiError::InvalidInput(format!(
            "交期必须大于0天: lead_time_days={}",
            quote.lead_time_days
        )));
    }
    if let Some(validity) = quote.validity_days {
        if validity < 0 {
            return Err(ApiError::InvalidInput(format!(
                "报价有效期不能为负: validity_days={}",
                validity
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::RiskRating;

    fn quote(price: f64, lead: i64, validity: Option<i64>) -> NewQuote {
        NewQuote {
            rfq_id: 1,
            vendor_id: 1,
            price,
            lead_time_days: lead,
            payment_terms: None,
            validity_days: validity,
            notes: None,
        }
    }

    #[test]
    fn test_identity_is_trimmed() {
        assert_eq!(
            DecisionRequestValidator::validate_identity("  Purchase ").unwrap(),
            "Purchase"
        );
        assert!(matches!(
            DecisionRequestValidator::validate_identity("   "),
            Err(ApiError::MissingIdentity)
        ));
    }

    #[test]
    fn test_selection_must_be_quoted() {
        let scoring = ScoringResult {
            cheapest_vendor_id: 2,
            recommended_vendor_id: 2,
            weights: String::new(),
            breakdown: vec![crate::engine::scorer::QuoteScore {
                quote_id: 1,
                vendor_id: 2,
                vendor_name: "VendorB".to_string(),
                risk_rating: "Low".to_string(),
                price: 10.0,
                lead_time_days: 3,
                price_score: 100.0,
                lt_score: 100.0,
                risk_penalty: 0.0,
                final_score: 100.0,
            }],
        };

        assert!(DecisionRequestValidator::validate_selection(1, 2, &scoring).is_ok());
        match DecisionRequestValidator::validate_selection(1, 9, &scoring) {
            Err(ApiError::UnknownVendorSelection { rfq_id, vendor_id }) => {
                assert_eq!(rfq_id, 1);
                assert_eq!(vendor_id, 9);
            }
            other => panic!("Expected UnknownVendorSelection, got {:?}", other),
        }
    }

    #[test]
    fn test_quote_validation() {
        assert!(validate_new_quote(&quote(480.0, 15, Some(7))).is_ok());
        assert!(validate_new_quote(&quote(0.0, 15, None)).is_err());
        assert!(validate_new_quote(&quote(f64::NAN, 15, None)).is_err());
        assert!(validate_new_quote(&quote(480.0, 0, None)).is_err());
        assert!(validate_new_quote(&quote(480.0, 15, Some(-1))).is_err());
    }

    #[test]
    fn test_master_data_names_required() {
        let vendor = NewVendor {
            vendor_name: " ".to_string(),
            approved: true,
            risk_rating: RiskRating::Low,
        };
        assert!(matches!(
            validate_new_vendor(&vendor),
            Err(ApiError::InvalidInput(_))
        ));
    }
}
