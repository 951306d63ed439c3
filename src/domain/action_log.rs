// ==========================================
// 采购治理驾驶舱 - 操作日志领域模型
// ==========================================
// 红线: 决策写入必须留痕
// 对齐: action_log 表
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

// ==========================================
// ActionLog - 操作日志
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,        // 日志ID (uuid)
    pub rfq_id: Option<i64>,      // 关联询价单 (种子数据等系统操作可为None)
    pub action_type: String,      // 操作类型 (存储为字符串)
    pub action_ts: NaiveDateTime, // 操作时间戳
    pub actor: String,            // 操作人

    pub payload_json: Option<JsonValue>, // 操作参数/结果 (JSON)
    pub detail: Option<String>,          // 详细描述
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    RecordDecision, // 保存决策 + 推荐快照
    SeedDemoData,   // 写入演示数据
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionType::RecordDecision => write!(f, "RecordDecision"),
            ActionType::SeedDemoData => write!(f, "SeedDemoData"),
        }
    }
}
