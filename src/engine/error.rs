// ==========================================
// 采购治理驾驶舱 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 引擎错误均为"计算前/写入前"可判定的错误
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    // ===== 评分错误 =====
    /// 询价单没有任何报价，无法计算最低价/推荐供应商
    #[error("报价集合为空，无法计算推荐供应商")]
    EmptyQuoteSet,

    // ===== 覆写原因策略错误 =====
    #[error("所选供应商与系统推荐不一致，必须填写覆写原因")]
    MissingOverrideReason,

    #[error("覆写原因过短: 当前{actual}个词，至少需要{min}个词")]
    ReasonTooShort { actual: usize, min: usize },

    #[error("覆写原因过长: 当前{actual}个词，最多允许{max}个词")]
    ReasonTooLong { actual: usize, max: usize },
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
