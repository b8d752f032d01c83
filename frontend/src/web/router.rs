//! 路由服务模块 - 核心引擎
//!
//! 封装 web_sys 的 History API，所有对 window.history 的
//! 操作都集中在此模块。路由本身不做守卫：任何路径都可以
//! 直达，页面内容自行对未登录状态降级。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::AppRoute;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 当前路由放在 Signal 里驱动界面更新
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
}

impl RouterService {
    /// 从当前 URL 初始化路由状态
    fn new() -> Self {
        let path = current_path();
        let initial_route = AppRoute::from_path(&path);
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 导航到目标路径：推入 History 并更新界面
    pub fn navigate(&self, path: &str) {
        let target_route = AppRoute::from_path(path);
        leptos::logging::log!("[Router] Navigating to {}", target_route.to_path());
        push_history_state(target_route.to_path());
        self.set_route.set(target_route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;

        let closure = Closure::<dyn Fn()>::new(move || {
            let path = current_path();
            set_route.set(AppRoute::from_path(&path));
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router() -> RouterService {
    let router = RouterService::new();
    router.init_popstate_listener();
    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

/// 导航函数（返回一个可调用的闭包）
pub fn use_navigate() -> impl Fn(&str) + Clone {
    let router = use_router();
    move |to: &str| {
        router.navigate(to);
    }
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router();

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接：拦截点击走 History 导航，保留 href 供右键/新标签
#[component]
pub fn Link(
    /// 目标路径
    #[prop(into)]
    to: String,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let to_clone = to.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(&to_clone);
    };

    view! {
        <a href=to on:click=on_click>
            {children()}
        </a>
    }
}
