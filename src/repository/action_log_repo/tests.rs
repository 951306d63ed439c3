use super::ActionLogRepository;
use crate::domain::action_log::{ActionLog, ActionType};
use chrono::{Duration, Utc};
use rusqlite::Connection;
use serde_json::json;
use std::sync::{Arc, Mutex};

fn setup_test_db() -> Arc<Mutex<Connection>> {
    let conn = Connection::open_in_memory().unwrap();
    crate::db::ensure_schema(&conn).unwrap();

    // action_log.rfq_id 外键需要真实 RFQ
    conn.execute_batch(
        r#"
        INSERT INTO rm_master (rm_name) VALUES ('Paracetamol API');
        INSERT INTO pr (rm_id, qty, need_by) VALUES (1, 1000, '2026-03-10');
        INSERT INTO rfq (pr_id) VALUES (1);
        INSERT INTO rfq (pr_id) VALUES (1);
        "#,
    )
    .unwrap();

    Arc::new(Mutex::new(conn))
}

fn make_test_log(action_id: &str, rfq_id: Option<i64>, minutes_ago: i64) -> ActionLog {
    ActionLog {
        action_id: action_id.to_string(),
        rfq_id,
        action_type: ActionType::RecordDecision.to_string(),
        action_ts: Utc::now().naive_utc() - Duration::minutes(minutes_ago),
        actor: "Purchase".to_string(),
        payload_json: Some(json!({ "selected_vendor_id": 1 })),
        detail: Some("Test log".to_string()),
    }
}

#[test]
fn test_insert_and_find_by_id() {
    let repo = ActionLogRepository::new(setup_test_db());

    let log = make_test_log("log1", Some(1), 0);
    assert_eq!(repo.insert(&log).unwrap(), "log1");

    let found = repo.find_by_id("log1").unwrap().unwrap();
    assert_eq!(found.rfq_id, Some(1));
    assert_eq!(found.actor, "Purchase");
    assert_eq!(found.payload_json, Some(json!({ "selected_vendor_id": 1 })));

    assert!(repo.find_by_id("missing").unwrap().is_none());
}

#[test]
fn test_find_by_rfq_id_newest_first() {
    let repo = ActionLogRepository::new(setup_test_db());

    repo.insert(&make_test_log("old", Some(1), 10)).unwrap();
    repo.insert(&make_test_log("new", Some(1), 1)).unwrap();
    repo.insert(&make_test_log("other", Some(2), 5)).unwrap();

    let logs = repo.find_by_rfq_id(1).unwrap();
    let ids: Vec<&str> = logs.iter().map(|l| l.action_id.as_str()).collect();
    assert_eq!(ids, vec!["new", "old"]);
}

#[test]
fn test_find_recent_across_rfqs() {
    let repo = ActionLogRepository::new(setup_test_db());

    let mut seed = make_test_log("seed", None, 30);
    seed.action_type = ActionType::SeedDemoData.to_string();
    repo.insert(&seed).unwrap();

    for i in 1..=4 {
        repo.insert(&make_test_log(&format!("log{}", i), Some(1), i)).unwrap();
    }

    let recent = repo.find_recent(3).unwrap();
    let ids: Vec<&str> = recent.iter().map(|l| l.action_id.as_str()).collect();
    assert_eq!(ids, vec!["log1", "log2", "log3"]);

    // 无 RFQ 的日志也在全局视图中
    let all = repo.find_recent(10).unwrap();
    assert_eq!(all.len(), 5);
    assert_eq!(all.last().unwrap().action_id, "seed");
}
