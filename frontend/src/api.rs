//! 后端 REST 接口客户端。
//!
//! 所有端点方法都走同一个 [`Transport`]，返回统一的
//! [`ApiResult`]。客户端本身只管拼 URL、挂请求头和
//! 编解码，错误分类在 `error` 模块完成。

use std::rc::Rc;

use serde::Serialize;

use bloodlink_shared::{
    Donation, NewDonation, NewReport, PATH_DONATIONS, PATH_ME, PATH_REPORTS, PATH_TOKEN,
    PATH_USERS, ProfileUpdate, RegistrationRequest, Role, TokenResponse, UserProfile,
};

use crate::error::{ApiError, ApiResult};
use crate::web::http::{FetchTransport, HttpMethod, HttpRequest, HttpResponse, Transport};

// =========================================================
// 运行时配置 (Runtime Configuration)
// =========================================================

/// 默认后端地址，本地开发时的 FastAPI 端口
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// LocalStorage 里的后端地址覆盖键，部署时可以改指向
const STORAGE_API_URL_KEY: &str = "bloodlink_api_url";

/// 解析后端基地址：LocalStorage 覆盖优先，否则用默认值
pub fn api_base_url() -> String {
    use gloo_storage::{LocalStorage, Storage};

    LocalStorage::get(STORAGE_API_URL_KEY).unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

// =========================================================
// API 客户端
// =========================================================

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    transport: Rc<dyn Transport>,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self::with_transport(base_url, Rc::new(FetchTransport))
    }

    /// 指定传输层构造，测试里换 Mock 用
    pub fn with_transport(base_url: String, transport: Rc<dyn Transport>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            token: None,
            transport,
        }
    }

    /// 携带访问令牌的客户端副本
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 有令牌就挂 Bearer 头；没有令牌时请求照发，
    /// 让后端用 401 把未登录暴露出来
    fn authed(&self, request: HttpRequest) -> HttpRequest {
        match &self.token {
            Some(token) => request.with_header("Authorization", &format!("Bearer {token}")),
            None => request,
        }
    }

    /// 构造 JSON 请求体
    fn json_request<T: Serialize>(
        &self,
        path: &str,
        method: HttpMethod,
        payload: &T,
    ) -> ApiResult<HttpRequest> {
        let body = serde_json::to_string(payload).map_err(|e| ApiError::decode(e.to_string()))?;
        Ok(HttpRequest::new(self.url(path), method)
            .with_header("Content-Type", "application/json")
            .with_body(body))
    }

    /// 发送请求，非 2xx 统一转成分类后的 [`ApiError`]
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        let response = self.transport.send(request).await?;
        if response.ok() {
            Ok(response)
        } else {
            Err(ApiError::from_response(response.status, &response.body))
        }
    }

    // =====================================================
    // 端点方法
    // =====================================================

    /// POST /token：OAuth2 密码登录，请求体是表单编码
    pub async fn request_token(&self, username: &str, password: &str) -> ApiResult<TokenResponse> {
        let body = form_encode(&[("username", username), ("password", password)]);
        let request = HttpRequest::new(self.url(PATH_TOKEN), HttpMethod::Post)
            .with_header("Content-Type", "application/x-www-form-urlencoded")
            .with_body(body);
        self.send(request).await?.json()
    }

    /// GET /users/me：当前用户资料
    pub async fn fetch_me(&self) -> ApiResult<UserProfile> {
        let request = self.authed(HttpRequest::new(self.url(PATH_ME), HttpMethod::Get));
        self.send(request).await?.json()
    }

    /// PUT /users/me：更新资料，只发可编辑字段
    pub async fn update_me(&self, update: &ProfileUpdate) -> ApiResult<UserProfile> {
        let request = self.authed(self.json_request(PATH_ME, HttpMethod::Put, update)?);
        self.send(request).await?.json()
    }

    /// POST /users/：注册新账号（无需认证）
    pub async fn create_user(&self, registration: &RegistrationRequest) -> ApiResult<UserProfile> {
        let request = self.json_request(PATH_USERS, HttpMethod::Post, registration)?;
        self.send(request).await?.json()
    }

    /// GET /users/?role=...：按角色列出用户
    pub async fn list_users_by_role(&self, role: Role) -> ApiResult<Vec<UserProfile>> {
        let path = format!("{}?role={}", PATH_USERS, role.as_str());
        let request = self.authed(HttpRequest::new(self.url(&path), HttpMethod::Get));
        self.send(request).await?.json()
    }

    /// GET /donations/：全量献血记录，归属过滤在前端做
    pub async fn list_donations(&self) -> ApiResult<Vec<Donation>> {
        let request = self.authed(HttpRequest::new(self.url(PATH_DONATIONS), HttpMethod::Get));
        self.send(request).await?.json()
    }

    /// POST /donations/：新建献血记录
    pub async fn create_donation(&self, donation: &NewDonation) -> ApiResult<Donation> {
        let request = self.authed(self.json_request(PATH_DONATIONS, HttpMethod::Post, donation)?);
        self.send(request).await?.json()
    }

    /// POST /reports/：提交验证报告，响应体结构不固定，
    /// 调用方只关心成功与否
    pub async fn create_report(&self, report: &NewReport) -> ApiResult<serde_json::Value> {
        let request = self.authed(self.json_request(PATH_REPORTS, HttpMethod::Post, report)?);
        self.send(request).await?.json()
    }
}

// =========================================================
// 表单编码
// =========================================================

/// application/x-www-form-urlencoded 编码
fn form_encode(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// RFC 3986 非保留字符之外全部转义
fn percent_encode(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char);
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

#[cfg(test)]
mod tests;
