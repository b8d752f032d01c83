//! 认证模块。
//!
//! 认证状态是一个显式的状态机：匿名 -> 登录中 -> 已登录，
//! 失败态只作为下一次提交前的展示。建立会话的过程是原子的：
//! 令牌和资料都拿到之后才一次性提交（内存 + 存储），中途
//! 任何失败都不会留下半个会话。

use leptos::prelude::*;

use bloodlink_shared::{Role, Session};

use crate::api::{ApiClient, api_base_url};
use crate::error::ApiResult;
use crate::web::SessionStore;

/// 认证状态机
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthState {
    /// 未登录
    #[default]
    Anonymous,
    /// 正在交换令牌 / 拉取资料
    Authenticating,
    /// 持有有效会话
    Authenticated(Session),
    /// 上一次登录失败，携带给用户看的错误文案
    Failed(String),
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.session().map(|s| s.role)
    }
}

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 认证状态（只读）
    pub state: ReadSignal<AuthState>,
    /// 设置认证状态（写入）
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState::default());
        Self { state, set_state }
    }

    /// 登录与否的派生信号，导航栏用
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().is_authenticated())
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 当前状态对应的 API 客户端；未登录时返回匿名客户端
pub fn client_for(state: &AuthState) -> ApiClient {
    let client = ApiClient::new(api_base_url());
    match state.session() {
        Some(session) => client.with_token(session.token.clone()),
        None => client,
    }
}

/// 初始化认证状态：启动时从存储读回上次的会话
///
/// 令牌不在这里做有效性检查，过期令牌会在第一次请求时
/// 被 401 暴露，页面按未登录处理
pub fn init_auth(ctx: &AuthContext, store: &dyn SessionStore) {
    if let Some(session) = store.load() {
        leptos::logging::log!("[Auth] Restored session for {}", session.username);
        ctx.set_state.set(AuthState::Authenticated(session));
    }
}

/// 原子地建立会话：换令牌 -> 拉资料 -> 提交
///
/// 存储写入放在最后一步，前两步失败时什么都没有落盘，
/// 不需要回滚。存储不可用只降级为"本标签页内有效"
pub async fn establish_session(
    api: &ApiClient,
    store: &dyn SessionStore,
    username: &str,
    password: &str,
) -> ApiResult<Session> {
    let token = api.request_token(username, password).await?.access_token;
    let profile = api.clone().with_token(token.clone()).fetch_me().await?;

    let session = Session {
        token,
        username: profile.username,
        role: profile.role,
    };
    if !store.save(&session) {
        leptos::logging::warn!("[Auth] Session storage unavailable; session kept in memory only");
    }
    Ok(session)
}

/// 登录并推进状态机
///
/// # Returns
/// 登录是否成功
pub async fn login(
    ctx: &AuthContext,
    api: &ApiClient,
    store: &dyn SessionStore,
    username: &str,
    password: &str,
) -> bool {
    ctx.set_state.set(AuthState::Authenticating);

    match establish_session(api, store, username, password).await {
        Ok(session) => {
            leptos::logging::log!(
                "[Auth] Logged in as {} ({})",
                session.username,
                session.role
            );
            ctx.set_state.set(AuthState::Authenticated(session));
            true
        }
        Err(error) => {
            leptos::logging::warn!("[Auth] Login failed: {}", error);
            ctx.set_state.set(AuthState::Failed(error.to_string()));
            false
        }
    }
}

/// 注销：清掉存储里的会话并回到匿名态
pub fn logout(ctx: &AuthContext, store: &dyn SessionStore) {
    store.clear();
    ctx.set_state.set(AuthState::Anonymous);
    leptos::logging::log!("[Auth] Logged out");
}

#[cfg(test)]
mod tests;
