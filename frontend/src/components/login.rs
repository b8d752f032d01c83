use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use bloodlink_shared::Role;

use crate::api::{ApiClient, api_base_url};
use crate::auth::{AuthState, login, use_auth};
use crate::components::icons::{Fingerprint, ShieldCheck};
use crate::web::BrowserStore;
use crate::web::router::{Link, use_navigate};

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    // 角色选择只是界面提示，真正的角色来自登录后的资料
    let (role_hint, set_role_hint) = signal("user".to_string());
    let (bio_busy, set_bio_busy) = signal(false);
    let (bio_notice, set_bio_notice) = signal(Option::<String>::None);

    let is_submitting = move || auth.state.get() == AuthState::Authenticating;
    let error_msg = move || match auth.state.get() {
        AuthState::Failed(message) => Some(message),
        _ => None,
    };

    let on_submit = {
        let navigate = navigate.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            if username.get().is_empty() || password.get().is_empty() {
                return;
            }

            let navigate = navigate.clone();
            let username_value = username.get();
            let password_value = password.get();
            spawn_local(async move {
                let api = ApiClient::new(api_base_url());
                let success =
                    login(&auth, &api, &BrowserStore, &username_value, &password_value).await;
                if success {
                    navigate("/dashboard");
                }
            });
        }
    };

    // 模拟扫描两秒后如实告知该入口尚未接入
    let on_biometric = move |_| {
        if bio_busy.get() {
            return;
        }
        set_bio_busy.set(true);
        set_bio_notice.set(None);
        spawn_local(async move {
            TimeoutFuture::new(2_000).await;
            set_bio_busy.set(false);
            set_bio_notice.set(Some(
                "Biometric sign-in is not available yet. Please use your credentials.".to_string(),
            ));
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-error/10 rounded-2xl text-error">
                            <ShieldCheck attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"Smart Blood Link"</h1>
                        <p class="text-base-content/70">"Sign in to your account to continue"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="username">
                                <span class="label-text">"Username"</span>
                            </label>
                            <input
                                id="username"
                                type="text"
                                placeholder="username"
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                prop:value=username
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="role">
                                <span class="label-text">"Login as"</span>
                            </label>
                            <select
                                id="role"
                                class="select select-bordered"
                                on:change=move |ev| set_role_hint.set(event_target_value(&ev))
                                prop:value=role_hint
                            >
                                {Role::ALL
                                    .iter()
                                    .map(|role| {
                                        view! { <option value=role.as_str()>{role.label()}</option> }
                                    })
                                    .collect_view()}
                            </select>
                        </div>

                        <div class="form-control mt-6">
                            <button class="btn btn-error" disabled=move || is_submitting()>
                                {move || {
                                    if is_submitting() {
                                        view! {
                                            <span class="loading loading-spinner"></span>
                                            "Signing in..."
                                        }
                                            .into_any()
                                    } else {
                                        "Sign In".into_any()
                                    }
                                }}
                            </button>
                        </div>

                        <div class="divider text-xs text-base-content/50">"OR"</div>

                        <Show when=move || bio_notice.get().is_some()>
                            <div role="alert" class="alert alert-info text-sm py-2">
                                <span>{move || bio_notice.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <button
                            type="button"
                            class="btn btn-outline gap-2"
                            on:click=on_biometric
                            disabled=move || bio_busy.get()
                        >
                            <Fingerprint attr:class="h-4 w-4" />
                            {move || if bio_busy.get() { "Verifying..." } else { "Biometric Login" }}
                        </button>
                        <Show when=move || bio_busy.get()>
                            <p class="text-center text-sm text-base-content/60 animate-pulse">
                                "Simulating biometric verification..."
                            </p>
                        </Show>

                        <p class="text-center text-sm mt-2">
                            "New here? "
                            <Link to="/register">
                                <span class="link link-error">"Create an account"</span>
                            </Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
