// ==========================================
// 采购治理驾驶舱 - 评分权重配置
// ==========================================

use crate::domain::types::RiskRating;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 默认价格权重
pub const DEFAULT_PRICE_WEIGHT: f64 = 0.65;
/// 默认交期权重
pub const DEFAULT_LEAD_WEIGHT: f64 = 0.35;
/// 默认风险扣分
pub const DEFAULT_PENALTY_HIGH: f64 = -40.0;
pub const DEFAULT_PENALTY_MEDIUM: f64 = -15.0;
pub const DEFAULT_PENALTY_LOW: f64 = 0.0;

/// 评分权重配置
///
/// 存储位置：config_kv（key='scoring/*'）
/// 快照中以权重串形式记录，例如
/// `price=0.65,lead=0.35,penalty_high=-40,penalty_medium=-15,penalty_low=0`，
/// 保证权重调整后历史快照仍可解读。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub price_weight: f64,
    pub lead_weight: f64,
    pub penalty_high: f64,
    pub penalty_medium: f64,
    pub penalty_low: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            price_weight: DEFAULT_PRICE_WEIGHT,
            lead_weight: DEFAULT_LEAD_WEIGHT,
            penalty_high: DEFAULT_PENALTY_HIGH,
            penalty_medium: DEFAULT_PENALTY_MEDIUM,
            penalty_low: DEFAULT_PENALTY_LOW,
        }
    }
}

impl ScoringWeights {
    /// 风险扣分查表；无法识别的风险等级按 Medium 扣分
    pub fn penalty_for(&self, risk: Option<RiskRating>) -> f64 {
        match risk {
            Some(RiskRating::Low) => self.penalty_low,
            Some(RiskRating::Medium) | None => self.penalty_medium,
            Some(RiskRating::High) => self.penalty_high,
        }
    }

    /// 生成快照用的权重串
    pub fn to_weights_string(&self) -> String {
        format!(
            "price={},lead={},penalty_high={},penalty_medium={},penalty_low={}",
            self.price_weight, self.lead_weight, self.penalty_high, self.penalty_medium, self.penalty_low
        )
    }

    /// 解析权重串（用于解读历史快照）
    ///
    /// 缺失的键取默认值；未知键或非数字值返回错误
    pub fn parse_weights_string(raw: &str) -> Result<Self, String> {
        let mut weights = Self::default();

        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| format!("权重项缺少'=': {}", part))?;
            let value: f64 = value
                .trim()
                .parse()
                .map_err(|_| format!("权重值不是数字: {}", part))?;

            match key.trim() {
                "price" => weights.price_weight = value,
                "lead" => weights.lead_weight = value,
                "penalty_high" => weights.penalty_high = value,
                "penalty_medium" => weights.penalty_medium = value,
                "penalty_low" => weights.penalty_low = value,
                other => return Err(format!("未知权重项: {}", other)),
            }
        }

        Ok(weights)
    }
}

impl fmt::Display for ScoringWeights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_weights_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_string() {
        assert_eq!(
            ScoringWeights::default().to_weights_string(),
            "price=0.65,lead=0.35,penalty_high=-40,penalty_medium=-15,penalty_low=0"
        );
    }

    #[test]
    fn test_parse_weights_string() {
        let parsed = ScoringWeights::parse_weights_string(
            "price=0.5,lead=0.5,penalty_high=-30,penalty_medium=-10,penalty_low=0",
        )
        .unwrap();
        assert_eq!(parsed.price_weight, 0.5);
        assert_eq!(parsed.penalty_high, -30.0);

        // 缺失项取默认
        let partial = ScoringWeights::parse_weights_string("price=0.7").unwrap();
        assert_eq!(partial.lead_weight, DEFAULT_LEAD_WEIGHT);

        assert!(ScoringWeights::parse_weights_string("price=abc").is_err());
        assert!(ScoringWeights::parse_weights_string("quality=1").is_err());
        assert!(ScoringWeights::parse_weights_string("price").is_err());
    }

    #[test]
    fn test_penalty_lookup() {
        let w = ScoringWeights::default();
        assert_eq!(w.penalty_for(Some(RiskRating::Low)), 0.0);
        assert_eq!(w.penalty_for(Some(RiskRating::Medium)), -15.0);
        assert_eq!(w.penalty_for(Some(RiskRating::High)), -40.0);
        assert_eq!(w.penalty_for(None), -15.0);
    }
}
