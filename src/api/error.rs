// ==========================================
// 采购治理驾驶舱 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换 Engine / Repository 错误为用户友好的错误消息
// 红线: 所有拒绝必须带显式原因（可解释性）
// ==========================================

use crate::engine::error::EngineError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 决策治理错误
    // ==========================================
    /// 决策人为空
    #[error("缺少决策人身份: selected_by 不能为空")]
    MissingIdentity,

    /// 所选供应商不在该 RFQ 的报价集合内
    #[error("所选供应商不在报价集合内: rfq_id={rfq_id}, vendor_id={vendor_id}")]
    UnknownVendorSelection { rfq_id: i64, vendor_id: i64 },

    #[error("RFQ 没有任何报价，无法评分: rfq_id={0}")]
    EmptyQuoteSet(i64),

    #[error("偏离系统推荐时必须填写原因")]
    MissingOverrideReason,

    #[error("覆写原因过短: {actual} 词 (最少 {min} 词)")]
    ReasonTooShort { actual: usize, min: usize },

    #[error("覆写原因过长: {actual} 词 (最多 {max} 词)")]
    ReasonTooLong { actual: usize, max: usize },

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    // ==========================================
    // 配置 / 导出错误
    // ==========================================
    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("导出失败: {0}")]
    ExportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

// ==========================================
// 从 EngineError 转换
// ==========================================
// rfq_id 在引擎层不可见，EmptyQuoteSet 由调用方补全；此处兜底为 0
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::EmptyQuoteSet => ApiError::EmptyQuoteSet(0),
            EngineError::MissingOverrideReason => ApiError::MissingOverrideReason,
            EngineError::ReasonTooShort { actual, min } => ApiError::ReasonTooShort { actual, min },
            EngineError::ReasonTooLong { actual, max } => ApiError::ReasonTooLong { actual, max },
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// 目的: 将Repository层的技术错误转换为用户友好的业务错误
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }

            // 数据质量错误
            RepositoryError::ValidationError(msg) => ApiError::ValidationError(msg),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
