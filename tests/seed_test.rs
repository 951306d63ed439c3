// ==========================================
// 演示数据集成测试
// ==========================================

mod test_helpers;

use procure_live::app::AppState;
use test_helpers::*;

#[test]
fn test_seed_if_empty_幂等() {
    let env = create_test_env().expect("无法创建测试环境");
    assert!(!env.state.is_seeded().unwrap());

    let summary = env.state.seed_if_empty().unwrap().expect("空库应写入");
    assert_eq!(summary.vendor_ids, vec![1, 2, 3]);
    assert!(env.state.is_seeded().unwrap());

    assert!(env.state.seed_if_empty().unwrap().is_none());
    assert_eq!(count_rows(&env.state, "vendors"), 3);
    assert_eq!(count_rows(&env.state, "quotes"), 3);
}

#[test]
fn test_重新打开数据库保留数据() {
    let (env, seed) = create_seeded_env().expect("无法创建测试环境");

    let reopened = AppState::new(env.db_path.clone()).expect("重新打开失败");
    assert!(reopened.is_seeded().unwrap());

    let rfqs = reopened.procurement_api.list_rfqs().unwrap();
    assert_eq!(rfqs.len(), 1);
    assert_eq!(rfqs[0].rfq_id, seed.rfq_id);
    assert_eq!(rfqs[0].rm_name, "Paracetamol API");
}
