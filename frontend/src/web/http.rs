//! HTTP 传输层封装。
//!
//! 请求/响应用纯数据结构描述，真正的发送动作抽象成
//! [`Transport`] trait：浏览器里走 `gloo-net` 的 fetch，
//! 测试里换成内存 Mock，上层 API 客户端完全无感。

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::error::{ApiError, ApiResult};

// =========================================================
// 请求 / 响应结构
// =========================================================

/// HTTP 请求方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

/// 一次待发送的 HTTP 请求
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: impl Into<String>, method: HttpMethod) -> Self {
        HttpRequest {
            url: url.into(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }
}

/// 已收到的 HTTP 响应，响应体统一按文本保存
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 是否为 2xx
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 把响应体解析成指定类型
    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::decode(e.to_string()))
    }
}

// =========================================================
// 传输抽象
// =========================================================

/// 发送请求的唯一入口
///
/// 浏览器环境是单线程的，trait 对象不要求 `Send`
#[async_trait::async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse>;
}

/// 生产实现：基于 `gloo-net` 的浏览器 fetch
pub struct FetchTransport;

#[async_trait::async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        use gloo_net::http::Request;

        let mut builder = match request.method {
            HttpMethod::Get => Request::get(&request.url),
            HttpMethod::Post => Request::post(&request.url),
            HttpMethod::Put => Request::put(&request.url),
        };
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        let prepared = match request.body {
            Some(body) => builder
                .body(body)
                .map_err(|e| ApiError::network(e.to_string()))?,
            None => builder
                .build()
                .map_err(|e| ApiError::network(e.to_string()))?,
        };

        let response = prepared
            .send()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;

        let status = response.status();
        // 错误响应的 body 也要留着，分类时要读里面的 detail
        let body = response.text().await.unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}

// =========================================================
// 测试 Mock
// =========================================================

/// 测试用传输层：按 URL 预置响应并记录所有收到的请求
#[cfg(test)]
pub struct MockTransport {
    responses: std::cell::RefCell<HashMap<String, (u16, String)>>,
    /// (url, method, headers, body)
    pub requests:
        std::cell::RefCell<Vec<(String, String, HashMap<String, String>, Option<String>)>>,
}

#[cfg(test)]
impl MockTransport {
    pub fn new() -> Self {
        MockTransport {
            responses: std::cell::RefCell::new(HashMap::new()),
            requests: std::cell::RefCell::new(Vec::new()),
        }
    }

    pub fn mock_response(&self, url: &str, status: u16, body: serde_json::Value) {
        self.responses
            .borrow_mut()
            .insert(url.to_string(), (status, body.to_string()));
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        self.requests.borrow_mut().push((
            request.url.clone(),
            request.method.as_str().to_string(),
            request.headers.clone(),
            request.body.clone(),
        ));

        match self.responses.borrow().get(&request.url) {
            Some((status, body)) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            None => Ok(HttpResponse {
                status: 404,
                body: "{\"detail\": \"Not Found\"}".to_string(),
            }),
        }
    }
}
