//! Smart Blood Link 前端应用
//!
//! 模块划分：
//! - `web::route` / `web::router`: 路由定义与路由服务
//! - `auth`: 认证状态机与会话持久化
//! - `api`: 后端 REST 客户端
//! - `verification`: 急救员身份核验的模拟器
//! - `components`: UI 组件层

mod api;
mod auth;
mod error;
mod verification;
mod web;

mod components {
    pub mod dashboard;
    pub mod donations;
    mod icons;
    pub mod login;
    pub mod navbar;
    mod paramedic;
    pub mod profile;
    pub mod register;
    pub mod requests;
}

use leptos::prelude::*;

use crate::auth::{AuthContext, init_auth};
use crate::components::dashboard::DashboardPage;
use crate::components::donations::DonationsPage;
use crate::components::login::LoginPage;
use crate::components::navbar::Navbar;
use crate::components::profile::ProfilePage;
use crate::components::register::RegisterPage;
use crate::components::requests::RequestsPage;
use crate::web::BrowserStore;
use crate::web::route::AppRoute;
use crate::web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
        AppRoute::DonationHistory => view! { <DonationsPage /> }.into_any(),
        AppRoute::BloodRequests => view! { <RequestsPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 2. 启动时从浏览器存储恢复上次的会话
    init_auth(&auth_ctx, &BrowserStore);

    view! {
        <Router>
            <div class="min-h-screen bg-base-200">
                <Navbar />
                <RouterOutlet matcher=route_matcher />
            </div>
        </Router>
    }
}
