//! 路由定义模块 - 领域模型
//!
//! 纯业务层，不依赖 DOM 或 web_sys。
//!
//! 注意：路由层不做任何认证守卫。未登录访问受保护页面时，
//! 页面自己渲染"请先登录"的提示，真正的安全边界在后端。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页（默认路由）
    #[default]
    Login,
    /// 注册页
    Register,
    /// 角色仪表盘
    Dashboard,
    /// 个人资料
    Profile,
    /// 献血记录
    DonationHistory,
    /// 血液请求
    BloodRequests,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" | "/login" => Self::Login,
            "/register" => Self::Register,
            "/dashboard" => Self::Dashboard,
            "/profile" => Self::Profile,
            "/donation-history" => Self::DonationHistory,
            "/blood-request" => Self::BloodRequests,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::Profile => "/profile",
            Self::DonationHistory => "/donation-history",
            Self::BloodRequests => "/blood-request",
            Self::NotFound => "/404",
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_paths_resolve() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/login"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/register"), AppRoute::Register);
        assert_eq!(AppRoute::from_path("/dashboard"), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_path("/profile"), AppRoute::Profile);
        assert_eq!(
            AppRoute::from_path("/donation-history"),
            AppRoute::DonationHistory
        );
        assert_eq!(AppRoute::from_path("/blood-request"), AppRoute::BloodRequests);
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        assert_eq!(AppRoute::from_path("/admin/secret"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path(""), AppRoute::NotFound);
    }

    #[test]
    fn test_paths_round_trip() {
        for route in [
            AppRoute::Register,
            AppRoute::Dashboard,
            AppRoute::Profile,
            AppRoute::DonationHistory,
            AppRoute::BloodRequests,
        ] {
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
    }
}
