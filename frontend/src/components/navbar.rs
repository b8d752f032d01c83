//! 顶部导航栏：链接集合随登录状态与角色变化

use leptos::prelude::*;

use bloodlink_shared::Role;

use crate::auth::{logout, use_auth};
use crate::components::icons::{Droplet, LogOut};
use crate::web::BrowserStore;
use crate::web::router::{Link, use_navigate};

/// 每个角色能看到的导航项
fn links_for(role: Option<Role>) -> Vec<(&'static str, &'static str)> {
    match role {
        None => vec![("Login", "/login"), ("Register", "/register")],
        Some(Role::User) => vec![("Dashboard", "/dashboard"), ("Profile", "/profile")],
        Some(Role::Paramedic) => vec![
            ("Dashboard", "/dashboard"),
            ("Donation History", "/donation-history"),
            ("Profile", "/profile"),
        ],
        Some(Role::Hospital) => vec![
            ("Dashboard", "/dashboard"),
            ("Blood Requests", "/blood-request"),
            ("Profile", "/profile"),
        ],
        Some(Role::BloodBank) => vec![("Dashboard", "/dashboard"), ("Profile", "/profile")],
        Some(Role::Admin) => vec![
            ("Dashboard", "/dashboard"),
            ("Blood Requests", "/blood-request"),
            ("Profile", "/profile"),
        ],
    }
}

#[component]
pub fn Navbar() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let on_logout = move |_| {
        logout(&auth, &BrowserStore);
        navigate("/");
    };

    view! {
        <div class="navbar bg-base-100 shadow-lg px-4">
            <div class="flex-1 gap-1">
                <Droplet attr:class="text-error h-6 w-6" />
                <Link to="/">
                    <span class="btn btn-ghost text-xl px-2">"Smart Blood Link"</span>
                </Link>
            </div>
            <div class="flex-none">
                <ul class="menu menu-horizontal items-center gap-1 px-1">
                    {move || {
                        links_for(auth.state.get().role())
                            .into_iter()
                            .map(|(label, path)| {
                                view! {
                                    <li>
                                        <Link to=path>{label}</Link>
                                    </li>
                                }
                            })
                            .collect_view()
                    }}
                    <Show when=move || auth.state.get().is_authenticated()>
                        <li>
                            <button
                                on:click=on_logout.clone()
                                class="btn btn-outline btn-error btn-sm gap-2 ml-2"
                            >
                                <LogOut attr:class="h-4 w-4" />
                                "Logout"
                            </button>
                        </li>
                    </Show>
                </ul>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_sees_login_and_register() {
        let links = links_for(None);
        assert_eq!(links, vec![("Login", "/login"), ("Register", "/register")]);
    }

    #[test]
    fn test_hospital_and_admin_see_blood_requests() {
        for role in [Role::Hospital, Role::Admin] {
            let paths: Vec<&str> = links_for(Some(role)).iter().map(|l| l.1).collect();
            assert!(paths.contains(&"/blood-request"), "{role} misses requests link");
        }
    }

    #[test]
    fn test_paramedic_sees_donation_history() {
        let paths: Vec<&str> = links_for(Some(Role::Paramedic)).iter().map(|l| l.1).collect();
        assert!(paths.contains(&"/donation-history"));
    }

    #[test]
    fn test_every_logged_in_role_sees_dashboard_and_profile() {
        for role in Role::ALL {
            let paths: Vec<&str> = links_for(Some(role)).iter().map(|l| l.1).collect();
            assert!(paths.contains(&"/dashboard"));
            assert!(paths.contains(&"/profile"));
        }
    }
}
