// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库 + AppState 装配、演示数据、常用断言辅助
// ==========================================

#![allow(dead_code)]

use procure_live::app::{AppState, SeedSummary};
use procure_live::logging;
use std::error::Error;
use tempfile::NamedTempFile;

/// 测试环境（临时文件需与 AppState 同生命周期）
pub struct TestEnv {
    _temp_file: NamedTempFile,
    pub db_path: String,
    pub state: AppState,
}

/// 创建空库测试环境（已建表）
pub fn create_test_env() -> Result<TestEnv, Box<dyn Error>> {
    logging::init_test();

    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是合法 UTF-8")?
        .to_string();

    let state = AppState::new(db_path.clone())?;

    Ok(TestEnv {
        _temp_file: temp_file,
        db_path,
        state,
    })
}

/// 创建已写入演示数据的测试环境
///
/// 演示数据: vendor 1 = HealthyChem (Low), 2 = BudgetBulk (Medium), 3 = FastDeal (High)；
/// RFQ 1 上三条报价，最低价与推荐均为 vendor 3
pub fn create_seeded_env() -> Result<(TestEnv, SeedSummary), Box<dyn Error>> {
    let env = create_test_env()?;
    let summary = env
        .state
        .seed_if_empty()?
        .ok_or("空库应写入演示数据")?;
    Ok((env, summary))
}

/// 统计表行数
pub fn count_rows(state: &AppState, table: &str) -> i64 {
    let conn = state.conn.lock().unwrap();
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
        .unwrap()
}

/// 生成 n 个词的原因
pub fn words(n: usize) -> String {
    (1..=n)
        .map(|i| format!("reason{}", i))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
