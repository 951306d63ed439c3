// ==========================================
// DecisionApi 集成测试
// ==========================================
// 测试范围:
// 1. 演示场景评分与推荐预览
// 2. 决策保存: 一致 / 偏离 / 覆盖保存
// 3. 拒绝路径: 身份、RFQ、报价集合、覆写原因边界，均不落数据
// 4. 配置: 权重与原因字数范围
// ==========================================

mod test_helpers;

use procure_live::api::{ApiError, RecordDecisionRequest};
use procure_live::app::{AppState, SeedSummary};
use procure_live::config::{config_keys, ScoringWeights};
use procure_live::domain::master::NewVendor;
use procure_live::domain::procurement::NewPurchaseRequirement;
use procure_live::domain::types::{DeviationStatus, RiskRating};
use rusqlite::{params, Connection};
use test_helpers::*;

const VENDOR_A: i64 = 1; // HealthyChem, Low
const VENDOR_B: i64 = 2; // BudgetBulk, Medium
const VENDOR_C: i64 = 3; // FastDeal, High

fn request(rfq_id: i64, vendor: i64, reason: Option<&str>) -> RecordDecisionRequest {
    RecordDecisionRequest {
        rfq_id,
        selected_vendor_id: vendor,
        selected_by: "Purchase".to_string(),
        override_reason: reason.map(|s| s.to_string()),
    }
}

fn assert_nothing_written(env: &TestEnv) {
    assert_eq!(count_rows(&env.state, "rfq_recommendation_snapshot"), 0);
    assert_eq!(count_rows(&env.state, "rfq_decision"), 0);
    assert_eq!(
        count_rows(&env.state, "action_log WHERE action_type = 'RecordDecision'"),
        0
    );
}

// ==========================================
// 评分场景
// ==========================================

#[test]
fn test_preview_演示场景() {
    let (env, seed) = create_seeded_env().expect("无法创建测试环境");

    let preview = env
        .state
        .decision_api
        .preview_recommendation(seed.rfq_id)
        .expect("预览失败");

    assert_eq!(preview.cheapest_vendor_id, VENDOR_C);
    assert_eq!(preview.recommended_vendor_id, VENDOR_C);
    assert_eq!(preview.recommended_vendor, "FastDeal Traders");
    assert_eq!(
        preview.weights,
        "price=0.65,lead=0.35,penalty_high=-40,penalty_medium=-15,penalty_low=0"
    );

    let order: Vec<i64> = preview.ranked.iter().map(|s| s.vendor_id).collect();
    assert_eq!(order, vec![VENDOR_C, VENDOR_A, VENDOR_B]);
    assert_close(preview.ranked[0].final_score, 42.5);
    assert_close(preview.ranked[1].final_score, 35.0);
    assert_close(preview.ranked[2].final_score, 25.625);

    // 预览不落库
    assert_nothing_written(&env);
}

// ==========================================
// 保存路径
// ==========================================

#[test]
fn test_record_decision_一致选择无需原因() {
    let (env, seed) = create_seeded_env().expect("无法创建测试环境");
    let api = &env.state.decision_api;

    let outcome = api
        .record_decision(request(seed.rfq_id, VENDOR_C, Some("   ")))
        .expect("保存失败");

    assert_eq!(outcome.deviation, DeviationStatus::Match);
    assert_eq!(outcome.recommended_vendor_id, VENDOR_C);
    assert_eq!(outcome.cheapest_vendor_id, VENDOR_C);

    let record = api
        .get_decision_record(seed.rfq_id)
        .unwrap()
        .expect("应有已保存记录");
    assert_eq!(record.selected_vendor, "FastDeal Traders");
    assert_eq!(record.override_reason, None, "空白原因应存为 NULL");
    assert_eq!(record.deviation(), DeviationStatus::Match);
    assert!(record.decision_time.is_some());
    assert!(record.snapshot_time.is_some());

    let trail = api.list_audit_trail(seed.rfq_id).unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].action_id, outcome.action_id);
    assert_eq!(trail[0].actor, "Purchase");
}

#[test]
fn test_list_recent_audit_全局视图() {
    let (env, seed) = create_seeded_env().expect("无法创建测试环境");
    let api = &env.state.decision_api;

    let outcome = api
        .record_decision(request(seed.rfq_id, VENDOR_C, None))
        .expect("保存失败");

    let recent = api.list_recent_audit(10).unwrap();
    let types: Vec<&str> = recent.iter().map(|l| l.action_type.as_str()).collect();
    assert_eq!(types, vec!["RecordDecision", "SeedDemoData"]);
    assert_eq!(recent[0].action_id, outcome.action_id);
    assert_eq!(recent[1].rfq_id, None);

    assert_eq!(api.list_recent_audit(1).unwrap().len(), 1);
    assert!(matches!(api.list_recent_audit(0), Err(ApiError::InvalidInput(_))));
}

#[test]
fn test_record_decision_偏离需合规原因() {
    let (env, seed) = create_seeded_env().expect("无法创建测试环境");
    let api = &env.state.decision_api;

    let reason = "  Prefer GMP reliable vendor with proven quality record  ";
    let outcome = api
        .record_decision(request(seed.rfq_id, VENDOR_A, Some(reason)))
        .expect("保存失败");
    assert_eq!(outcome.deviation, DeviationStatus::Deviated);

    let record = api.get_decision_record(seed.rfq_id).unwrap().unwrap();
    assert_eq!(
        record.override_reason.as_deref(),
        Some("Prefer GMP reliable vendor with proven quality record")
    );
    assert_eq!(record.recommended_vendor_id, Some(VENDOR_C));
    assert_eq!(record.deviation(), DeviationStatus::Deviated);
}

#[test]
fn test_record_decision_重复保存覆盖() {
    let (env, seed) = create_seeded_env().expect("无法创建测试环境");
    let api = &env.state.decision_api;

    api.record_decision(request(seed.rfq_id, VENDOR_C, None))
        .expect("首次保存失败");
    api.record_decision(request(seed.rfq_id, VENDOR_B, Some(&words(10))))
        .expect("再次保存失败");

    assert_eq!(count_rows(&env.state, "rfq_decision"), 1);
    assert_eq!(count_rows(&env.state, "rfq_recommendation_snapshot"), 1);

    let record = api.get_decision_record(seed.rfq_id).unwrap().unwrap();
    assert_eq!(record.selected_vendor_id, VENDOR_B);

    // 审计追加，不覆盖
    assert_eq!(api.list_audit_trail(seed.rfq_id).unwrap().len(), 2);
}

// ==========================================
// 覆写原因边界
// ==========================================

#[test]
fn test_override_reason_边界() {
    let (env, seed) = create_seeded_env().expect("无法创建测试环境");
    let api = &env.state.decision_api;

    match api.record_decision(request(seed.rfq_id, VENDOR_A, Some(&words(4)))) {
        Err(ApiError::ReasonTooShort { actual, min }) => {
            assert_eq!(actual, 4);
            assert_eq!(min, 5);
        }
        other => panic!("Expected ReasonTooShort, got {:?}", other),
    }
    assert_nothing_written(&env);

    match api.record_decision(request(seed.rfq_id, VENDOR_A, Some(&words(51)))) {
        Err(ApiError::ReasonTooLong { actual, max }) => {
            assert_eq!(actual, 51);
            assert_eq!(max, 50);
        }
        other => panic!("Expected ReasonTooLong, got {:?}", other),
    }
    assert_nothing_written(&env);

    api.record_decision(request(seed.rfq_id, VENDOR_A, Some(&words(5))))
        .expect("5 词应通过");
    api.record_decision(request(seed.rfq_id, VENDOR_A, Some(&words(50))))
        .expect("50 词应通过");
}

#[test]
fn test_override_reason_缺失() {
    let (env, seed) = create_seeded_env().expect("无法创建测试环境");
    let api = &env.state.decision_api;

    let result = api.record_decision(request(seed.rfq_id, VENDOR_B, None));
    assert!(matches!(result, Err(ApiError::MissingOverrideReason)));

    let result = api.record_decision(request(seed.rfq_id, VENDOR_B, Some(" \t ")));
    assert!(matches!(result, Err(ApiError::MissingOverrideReason)));

    assert_nothing_written(&env);
}

// ==========================================
// 其他拒绝路径
// ==========================================

#[test]
fn test_record_decision_缺少身份() {
    let (env, seed) = create_seeded_env().expect("无法创建测试环境");

    let mut req = request(seed.rfq_id, VENDOR_C, None);
    req.selected_by = "   ".to_string();
    let result = env.state.decision_api.record_decision(req);
    assert!(matches!(result, Err(ApiError::MissingIdentity)));

    // 身份校验先于 RFQ 校验
    let mut req = request(999, VENDOR_C, None);
    req.selected_by = String::new();
    let result = env.state.decision_api.record_decision(req);
    assert!(matches!(result, Err(ApiError::MissingIdentity)));

    assert_nothing_written(&env);
}

#[test]
fn test_record_decision_rfq不存在() {
    let (env, _seed) = create_seeded_env().expect("无法创建测试环境");

    let result = env
        .state
        .decision_api
        .record_decision(request(999, VENDOR_C, None));
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[test]
fn test_record_decision_供应商未报价() {
    let (env, seed) = create_seeded_env().expect("无法创建测试环境");

    // 合格供应商，但未对 RFQ 1 报价
    let idle_vendor = env
        .state
        .procurement_api
        .create_vendor(NewVendor {
            vendor_name: "Idle Supplier".to_string(),
            approved: true,
            risk_rating: RiskRating::Low,
        })
        .unwrap();

    let result = env.state.decision_api.record_decision(request(
        seed.rfq_id,
        idle_vendor,
        Some(&words(8)),
    ));
    match result {
        Err(ApiError::UnknownVendorSelection { rfq_id, vendor_id }) => {
            assert_eq!(rfq_id, seed.rfq_id);
            assert_eq!(vendor_id, idle_vendor);
        }
        other => panic!("Expected UnknownVendorSelection, got {:?}", other),
    }
    assert_nothing_written(&env);
}

#[test]
fn test_record_decision_无报价() {
    let (env, seed) = create_seeded_env().expect("无法创建测试环境");
    let procurement = &env.state.procurement_api;

    let pr_id = procurement
        .create_pr(NewPurchaseRequirement {
            rm_id: seed.rm_ids[1],
            qty: 250.0,
            need_by: chrono::NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            site: None,
            created_by: Some("Purchase".to_string()),
        })
        .unwrap();
    let empty_rfq = procurement.create_rfq(pr_id).unwrap();

    let result = env
        .state
        .decision_api
        .record_decision(request(empty_rfq, VENDOR_A, None));
    assert!(matches!(result, Err(ApiError::EmptyQuoteSet(id)) if id == empty_rfq));

    let result = env.state.decision_api.preview_recommendation(empty_rfq);
    assert!(matches!(result, Err(ApiError::EmptyQuoteSet(_))));

    assert_nothing_written(&env);
}

// ==========================================
// 配置
// ==========================================

#[test]
fn test_config_权重写入快照() {
    let (env, seed) = create_seeded_env().expect("无法创建测试环境");

    env.state
        .config_manager
        .set_scoring_weights(&ScoringWeights {
            price_weight: 1.0,
            lead_weight: 0.0,
            penalty_high: -100.0,
            penalty_medium: -15.0,
            penalty_low: 0.0,
        })
        .unwrap();

    // A=0, B=62.5-15=47.5, C=100-100=0 → 推荐 B
    let outcome = env
        .state
        .decision_api
        .record_decision(request(seed.rfq_id, VENDOR_B, None))
        .expect("保存失败");

    assert_eq!(outcome.recommended_vendor_id, VENDOR_B);
    assert_eq!(outcome.cheapest_vendor_id, VENDOR_C);
    assert_eq!(outcome.deviation, DeviationStatus::Match);

    let record = env
        .state
        .decision_api
        .get_decision_record(seed.rfq_id)
        .unwrap()
        .unwrap();
    let weights = record.weights.unwrap();
    assert!(weights.contains("price=1"));
    assert!(weights.contains("penalty_high=-100"));
}

#[test]
fn test_config_原因字数范围() {
    let (env, seed) = create_seeded_env().expect("无法创建测试环境");
    let config = &env.state.config_manager;

    config
        .set_config_value(config_keys::OVERRIDE_MIN_WORDS, "2")
        .unwrap();
    config
        .set_config_value(config_keys::OVERRIDE_MAX_WORDS, "3")
        .unwrap();

    env.state
        .decision_api
        .record_decision(request(seed.rfq_id, VENDOR_A, Some("GMP preferred")))
        .expect("2 词应通过");

    let result = env.state.decision_api.record_decision(request(
        seed.rfq_id,
        VENDOR_A,
        Some(&words(4)),
    ));
    assert!(matches!(
        result,
        Err(ApiError::ReasonTooLong { actual: 4, max: 3 })
    ));
}

// ==========================================
// 旧库兼容: vendors.risk_rating 可为 NULL
// ==========================================

/// 旧版 vendors 表（risk_rating 无 NOT NULL），ensure_schema 不会改动已存在的表
fn create_legacy_vendor_state() -> (AppState, SeedSummary) {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE vendors (
            vendor_id INTEGER PRIMARY KEY AUTOINCREMENT,
            vendor_name TEXT NOT NULL,
            approved INTEGER DEFAULT 0,
            risk_rating TEXT CHECK(risk_rating IN ('Low','Medium','High')) DEFAULT 'Medium'
        );
        "#,
    )
    .unwrap();

    let state = AppState::from_connection(":memory:".to_string(), conn).unwrap();
    let seed = state.seed_if_empty().unwrap().unwrap();
    (state, seed)
}

#[test]
fn test_null_risk_rating_按medium扣分() {
    let (state, seed) = create_legacy_vendor_state();

    // vendor 4: 风险等级 NULL，价格与交期均为最优
    {
        let conn = state.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO vendors (vendor_name, approved, risk_rating) VALUES ('Unrated Supplies', 1, NULL)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO quotes (rfq_id, vendor_id, price, lead_time_days) VALUES (?1, 4, 480.0, 12)",
            params![seed.rfq_id],
        )
        .unwrap();
    }

    let preview = state
        .decision_api
        .preview_recommendation(seed.rfq_id)
        .expect("NULL 风险等级不应导致评分失败");

    // 最低价 480 并列 → vendor_id 较小者 (3)
    assert_eq!(preview.cheapest_vendor_id, VENDOR_C);
    assert_eq!(preview.recommended_vendor_id, 4);

    let unrated = preview.ranked.iter().find(|s| s.vendor_id == 4).unwrap();
    assert_eq!(unrated.risk_penalty, -15.0);
    assert_close(unrated.final_score, 85.0);

    let outcome = state
        .decision_api
        .record_decision(request(seed.rfq_id, 4, None))
        .expect("保存失败");
    assert_eq!(outcome.deviation, DeviationStatus::Match);

    let breakdown = state
        .dashboard_api
        .list_score_breakdown(Some(seed.rfq_id))
        .unwrap();
    assert_eq!(breakdown[0].scores[0].vendor_id, 4);

    let details = state
        .dashboard_api
        .list_quote_details(Some(seed.rfq_id))
        .unwrap();
    let row = details.iter().find(|d| d.detail.vendor_id == 4).unwrap();
    assert!(row.flag_low_price);
    assert!(!row.flag_high_risk);

    let vendor = state
        .procurement_api
        .list_vendors()
        .unwrap()
        .into_iter()
        .find(|v| v.vendor_id == 4)
        .unwrap();
    assert_eq!(vendor.risk_rating, RiskRating::Medium);
}
