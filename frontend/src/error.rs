//! 前端统一错误类型。
//!
//! 所有接口调用都收敛到 [`ApiError`]，组件层只负责把
//! `Display` 的结果放进提示条，分类逻辑集中在
//! [`ApiError::from_response`] 一处。

use std::fmt;

use bloodlink_shared::ValidationIssue;

pub type ApiResult<T> = Result<T, ApiError>;

/// 接口调用失败的归类
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// 请求根本没有拿到 HTTP 状态（断网、CORS、域名错误）
    Network(String),
    /// 响应体不是预期的 JSON 结构
    Decode(String),
    /// 401：令牌缺失、过期或凭据错误
    Unauthorized(String),
    /// 422：后端字段校验失败，逐条列出
    Validation(Vec<ValidationIssue>),
    /// 400 且后端明确说明用户名/邮箱已被占用
    DuplicateUser(String),
    /// 其余非 2xx 状态
    Api { status: u16, detail: String },
}

impl ApiError {
    pub fn network(message: impl Into<String>) -> Self {
        ApiError::Network(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        ApiError::Decode(message.into())
    }

    /// 按状态码和响应体归类一个非 2xx 响应
    ///
    /// 后端的错误响应统一是 `{"detail": ...}`，其中 `detail`
    /// 在 422 下可能是数组（逐字段校验）也可能是字符串
    /// （按角色的必填项检查），两种都要处理
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("detail").cloned());
        let detail_text = detail
            .as_ref()
            .and_then(|d| d.as_str().map(|s| s.to_string()))
            .unwrap_or_else(|| body.trim().to_string());

        match status {
            401 => {
                let message = if detail_text.is_empty() {
                    "Please log in to continue.".to_string()
                } else {
                    detail_text
                };
                ApiError::Unauthorized(message)
            }
            422 => {
                let issues = detail
                    .and_then(|d| serde_json::from_value::<Vec<ValidationIssue>>(d).ok());
                match issues {
                    Some(issues) if !issues.is_empty() => ApiError::Validation(issues),
                    _ => ApiError::Api {
                        status,
                        detail: detail_text,
                    },
                }
            }
            400 if detail_text.contains("already registered") => {
                ApiError::DuplicateUser(detail_text)
            }
            _ => ApiError::Api {
                status,
                detail: detail_text,
            },
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    pub fn is_duplicate_user(&self) -> bool {
        matches!(self, ApiError::DuplicateUser(_))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(message) => write!(f, "Network error: {message}"),
            ApiError::Decode(message) => write!(f, "Unexpected response from server: {message}"),
            ApiError::Unauthorized(message) => f.write_str(message),
            ApiError::Validation(issues) => {
                // 每条一行："字段名: 错误信息"
                for (index, issue) in issues.iter().enumerate() {
                    if index > 0 {
                        f.write_str("\n")?;
                    }
                    write!(f, "{}: {}", issue.field(), issue.msg)?;
                }
                Ok(())
            }
            ApiError::DuplicateUser(message) => f.write_str(message),
            ApiError::Api { status, detail } => {
                if detail.is_empty() {
                    write!(f, "Request failed with status {status}")
                } else {
                    f.write_str(detail)
                }
            }
        }
    }
}

impl std::error::Error for ApiError {}
