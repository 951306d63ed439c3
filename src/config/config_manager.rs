// ==========================================
// 采购治理驾驶舱 - 配置管理器
// ==========================================
// 职责: 评分权重 / 覆写原因策略的加载与覆写
// 存储: config_kv 表 (key-value)
// ==========================================

use crate::config::scoring_profile::ScoringWeights;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 覆写原因默认字数下限（含）
pub const DEFAULT_OVERRIDE_MIN_WORDS: usize = 5;
/// 覆写原因默认字数上限（含）
pub const DEFAULT_OVERRIDE_MAX_WORDS: usize = 50;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 从 config_kv 表读取配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 写入配置值（存在则覆盖）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET
              value = excluded.value,
              updated_at = datetime('now')
            "#,
            params![key, value],
        )?;

        tracing::info!(config_key = key, value = value, "配置已更新");
        Ok(())
    }

    /// 读取 f64 配置，缺失或格式错误时回退默认值
    fn get_f64_or_default(&self, key: &str, default: f64) -> Result<f64, Box<dyn Error>> {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                _ => {
                    tracing::warn!(config_key = key, raw_value = %raw, "配置格式错误，使用默认值");
                    Ok(default)
                }
            },
        }
    }

    fn get_usize_or_default(&self, key: &str, default: usize) -> Result<usize, Box<dyn Error>> {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(v) => Ok(v),
                Err(_) => {
                    tracing::warn!(config_key = key, raw_value = %raw, "配置格式错误，使用默认值");
                    Ok(default)
                }
            },
        }
    }

    // ===== 评分配置 =====

    /// 读取当前生效的评分权重
    pub fn get_scoring_weights(&self) -> Result<ScoringWeights, Box<dyn Error>> {
        let defaults = ScoringWeights::default();

        Ok(ScoringWeights {
            price_weight: self.get_f64_or_default(config_keys::PRICE_WEIGHT, defaults.price_weight)?,
            lead_weight: self.get_f64_or_default(config_keys::LEAD_WEIGHT, defaults.lead_weight)?,
            penalty_high: self.get_f64_or_default(config_keys::PENALTY_HIGH, defaults.penalty_high)?,
            penalty_medium: self
                .get_f64_or_default(config_keys::PENALTY_MEDIUM, defaults.penalty_medium)?,
            penalty_low: self.get_f64_or_default(config_keys::PENALTY_LOW, defaults.penalty_low)?,
        })
    }

    /// 整体覆写评分权重
    pub fn set_scoring_weights(&self, weights: &ScoringWeights) -> Result<(), Box<dyn Error>> {
        self.set_config_value(config_keys::PRICE_WEIGHT, &weights.price_weight.to_string())?;
        self.set_config_value(config_keys::LEAD_WEIGHT, &weights.lead_weight.to_string())?;
        self.set_config_value(config_keys::PENALTY_HIGH, &weights.penalty_high.to_string())?;
        self.set_config_value(config_keys::PENALTY_MEDIUM, &weights.penalty_medium.to_string())?;
        self.set_config_value(config_keys::PENALTY_LOW, &weights.penalty_low.to_string())?;
        Ok(())
    }

    // ===== 覆写原因策略 =====

    /// 读取覆写原因字数范围 (min_words, max_words)，均为闭区间
    pub fn get_override_word_bounds(&self) -> Result<(usize, usize), Box<dyn Error>> {
        let min = self.get_usize_or_default(config_keys::OVERRIDE_MIN_WORDS, DEFAULT_OVERRIDE_MIN_WORDS)?;
        let max = self.get_usize_or_default(config_keys::OVERRIDE_MAX_WORDS, DEFAULT_OVERRIDE_MAX_WORDS)?;

        if min > max {
            tracing::warn!(min, max, "覆写原因字数范围无效，使用默认值");
            return Ok((DEFAULT_OVERRIDE_MIN_WORDS, DEFAULT_OVERRIDE_MAX_WORDS));
        }

        Ok((min, max))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 评分权重
    pub const PRICE_WEIGHT: &str = "scoring/price_weight";
    pub const LEAD_WEIGHT: &str = "scoring/lead_weight";

    // 风险扣分
    pub const PENALTY_HIGH: &str = "scoring/penalty_high";
    pub const PENALTY_MEDIUM: &str = "scoring/penalty_medium";
    pub const PENALTY_LOW: &str = "scoring/penalty_low";

    // 覆写原因字数范围
    pub const OVERRIDE_MIN_WORDS: &str = "override_policy/min_words";
    pub const OVERRIDE_MAX_WORDS: &str = "override_policy/max_words";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::ensure_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_defaults_when_empty() {
        let cm = setup();
        assert_eq!(cm.get_scoring_weights().unwrap(), ScoringWeights::default());
        assert_eq!(cm.get_override_word_bounds().unwrap(), (5, 50));
    }

    #[test]
    fn test_override_weights() {
        let cm = setup();
        cm.set_config_value(config_keys::PRICE_WEIGHT, "0.5").unwrap();
        cm.set_config_value(config_keys::LEAD_WEIGHT, "0.5").unwrap();

        let w = cm.get_scoring_weights().unwrap();
        assert_eq!(w.price_weight, 0.5);
        assert_eq!(w.lead_weight, 0.5);
        assert_eq!(w.penalty_high, -40.0);
        assert!(w.to_weights_string().starts_with("price=0.5,lead=0.5,"));
    }

    #[test]
    fn test_bad_value_falls_back() {
        let cm = setup();
        cm.set_config_value(config_keys::PENALTY_HIGH, "very bad").unwrap();
        cm.set_config_value(config_keys::OVERRIDE_MIN_WORDS, "60").unwrap();

        assert_eq!(cm.get_scoring_weights().unwrap().penalty_high, -40.0);
        // min > max 视为无效
        assert_eq!(cm.get_override_word_bounds().unwrap(), (5, 50));
    }
}
