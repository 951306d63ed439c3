// ==========================================
// 采购治理驾驶舱 - 覆写原因策略
// ==========================================
// 规则: 所选供应商 ≠ 系统推荐时，覆写原因必须存在，
//       且按空白分词后的词数落在 [min_words, max_words] 闭区间内
// ==========================================

use crate::config::config_manager::{DEFAULT_OVERRIDE_MAX_WORDS, DEFAULT_OVERRIDE_MIN_WORDS};
use crate::engine::error::{EngineError, EngineResult};

/// 按空白分词计数；None / 空白串为 0
pub fn word_count(text: Option<&str>) -> usize {
    text.map(|t| t.split_whitespace().count()).unwrap_or(0)
}

/// 规范化覆写原因：去除首尾空白，空串视为未填写
pub fn normalize_reason(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

// ==========================================
// OverridePolicy - 覆写原因校验
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverridePolicy {
    pub min_words: usize,
    pub max_words: usize,
}

impl Default for OverridePolicy {
    fn default() -> Self {
        Self {
            min_words: DEFAULT_OVERRIDE_MIN_WORDS,
            max_words: DEFAULT_OVERRIDE_MAX_WORDS,
        }
    }
}

impl OverridePolicy {
    pub fn new(min_words: usize, max_words: usize) -> Self {
        Self { min_words, max_words }
    }

    /// 校验覆写原因
    ///
    /// # 返回
    /// - `Ok(())`: 通过
    /// - `Err(MissingOverrideReason)`: 未填写或仅空白
    /// - `Err(ReasonTooShort)` / `Err(ReasonTooLong)`: 词数越界（附实际词数与边界）
    pub fn validate_reason(&self, reason: Option<&str>) -> EngineResult<()> {
        let count = word_count(reason);

        if count == 0 {
            return Err(EngineError::MissingOverrideReason);
        }
        if count < self.min_words {
            return Err(EngineError::ReasonTooShort {
                actual: count,
                min: self.min_words,
            });
        }
        if count > self.max_words {
            return Err(EngineError::ReasonTooLong {
                actual: count,
                max: self.max_words,
            });
        }

        Ok(())
    }

    /// 决策级校验：仅在偏离推荐时要求覆写原因
    pub fn check_selection(
        &self,
        selected_vendor_id: i64,
        recommended_vendor_id: i64,
        reason: Option<&str>,
    ) -> EngineResult<()> {
        if selected_vendor_id == recommended_vendor_id {
            return Ok(());
        }
        self.validate_reason(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(None), 0);
        assert_eq!(word_count(Some("   ")), 0);
        assert_eq!(word_count(Some("  quality\taudit\npassed  ")), 3);
    }

    #[test]
    fn test_inclusive_bounds() {
        let policy = OverridePolicy::default();

        assert_eq!(
            policy.validate_reason(Some(&words(4))),
            Err(EngineError::ReasonTooShort { actual: 4, min: 5 })
        );
        assert!(policy.validate_reason(Some(&words(5))).is_ok());
        assert!(policy.validate_reason(Some(&words(50))).is_ok());
        assert_eq!(
            policy.validate_reason(Some(&words(51))),
            Err(EngineError::ReasonTooLong { actual: 51, max: 50 })
        );
    }

    #[test]
    fn test_missing_reason() {
        let policy = OverridePolicy::default();
        assert_eq!(policy.validate_reason(None), Err(EngineError::MissingOverrideReason));
        assert_eq!(
            policy.validate_reason(Some(" \n ")),
            Err(EngineError::MissingOverrideReason)
        );
    }

    #[test]
    fn test_check_selection_only_on_deviation() {
        let policy = OverridePolicy::default();
        assert!(policy.check_selection(3, 3, None).is_ok());
        assert_eq!(
            policy.check_selection(1, 3, None),
            Err(EngineError::MissingOverrideReason)
        );
        assert!(policy
            .check_selection(1, 3, Some("GMP audit history outweighs small price gap"))
            .is_ok());
    }

    #[test]
    fn test_error_message_names_bound() {
        let err = OverridePolicy::default()
            .validate_reason(Some("too short"))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains('2'));
        assert!(msg.contains('5'));
    }

    #[test]
    fn test_normalize_reason() {
        assert_eq!(normalize_reason(None), None);
        assert_eq!(normalize_reason(Some("   ")), None);
        assert_eq!(normalize_reason(Some("  ok  ")), Some("ok".to_string()));
    }
}
