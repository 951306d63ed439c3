// ==========================================
// ProcurementApi 集成测试
// ==========================================

mod test_helpers;

use chrono::NaiveDate;
use procure_live::api::ApiError;
use procure_live::domain::master::{NewRawMaterial, NewVendor};
use procure_live::domain::procurement::{NewPurchaseRequirement, NewQuote};
use procure_live::domain::types::{Criticality, RiskRating};
use test_helpers::*;

fn new_quote(rfq_id: i64, vendor_id: i64, price: f64, lead: i64) -> NewQuote {
    NewQuote {
        rfq_id,
        vendor_id,
        price,
        lead_time_days: lead,
        payment_terms: Some("Advance".to_string()),
        validity_days: Some(7),
        notes: None,
    }
}

#[test]
fn test_完整录入流程() {
    let env = create_test_env().expect("无法创建测试环境");
    let api = &env.state.procurement_api;

    let rm_id = api
        .create_raw_material(NewRawMaterial {
            rm_name: "Lactose Monohydrate".to_string(),
            spec_short: Some("Ph. Eur.".to_string()),
            criticality: Criticality::Low,
        })
        .unwrap();
    let v1 = api
        .create_vendor(NewVendor {
            vendor_name: "Alpha Excipients".to_string(),
            approved: true,
            risk_rating: RiskRating::Low,
        })
        .unwrap();
    let v2 = api
        .create_vendor(NewVendor {
            vendor_name: "Beta Trading".to_string(),
            approved: false,
            risk_rating: RiskRating::High,
        })
        .unwrap();

    let pr_id = api
        .create_pr(NewPurchaseRequirement {
            rm_id,
            qty: 500.0,
            need_by: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            site: Some("Formulation-Unit-2".to_string()),
            created_by: Some("Planner".to_string()),
        })
        .unwrap();
    let rfq_id = api.create_rfq(pr_id).unwrap();

    api.add_quote(new_quote(rfq_id, v1, 12.5, 10)).unwrap();
    api.add_quote(new_quote(rfq_id, v2, 11.0, 20)).unwrap();

    let rfqs = api.list_rfqs().unwrap();
    assert_eq!(rfqs.len(), 1);
    assert_eq!(rfqs[0].rm_name, "Lactose Monohydrate");
    assert_eq!(rfqs[0].site.as_deref(), Some("Formulation-Unit-2"));

    let vendors = api.list_vendors().unwrap();
    assert_eq!(vendors.len(), 2);
    assert!(!vendors[1].approved);
    assert_eq!(api.list_raw_materials().unwrap()[0].criticality, Criticality::Low);

    let preview = env
        .state
        .decision_api
        .preview_recommendation(rfq_id)
        .unwrap();
    assert_eq!(preview.cheapest_vendor_id, v2);
}

#[test]
fn test_录入校验() {
    let (env, seed) = create_seeded_env().expect("无法创建测试环境");
    let api = &env.state.procurement_api;
    let vendor = seed.vendor_ids[0];

    for bad in [
        new_quote(seed.rfq_id, vendor, 0.0, 10),
        new_quote(seed.rfq_id, vendor, -5.0, 10),
        new_quote(seed.rfq_id, vendor, f64::INFINITY, 10),
        new_quote(seed.rfq_id, vendor, 100.0, 0),
    ] {
        assert!(matches!(api.add_quote(bad), Err(ApiError::InvalidInput(_))));
    }

    assert!(matches!(
        api.add_quote(new_quote(999, vendor, 100.0, 5)),
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(
        api.add_quote(new_quote(seed.rfq_id, 999, 100.0, 5)),
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(api.create_rfq(999), Err(ApiError::NotFound(_))));

    let bad_pr = NewPurchaseRequirement {
        rm_id: seed.rm_ids[0],
        qty: 0.0,
        need_by: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
        site: None,
        created_by: None,
    };
    assert!(matches!(api.create_pr(bad_pr), Err(ApiError::InvalidInput(_))));

    // 报价数不变
    assert_eq!(count_rows(&env.state, "quotes"), 3);
}
