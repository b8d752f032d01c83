//! 注册页：按角色展开表单，注册成功后直接用同一份凭据登录。

pub mod form_state;

mod account_fields;
mod role_sections;


use leptos::prelude::*;
use leptos::task::spawn_local;

use bloodlink_shared::{RegistrationRequest, Role, Session};

use crate::api::{ApiClient, api_base_url};
use crate::auth::{AuthState, establish_session, use_auth};
use crate::components::icons::HeartPulse;
use crate::error::ApiError;
use crate::web::router::{Link, use_navigate};
use crate::web::{BrowserStore, SessionStore};
use account_fields::AccountFields;
use form_state::FormState;
use role_sections::{BloodBankSection, DonorSection, HospitalSection, ParamedicSection};

/// 开放自助注册的角色；管理员账户由后台直接建立。
const REGISTRABLE_ROLES: [Role; 4] = [
    Role::User,
    Role::Paramedic,
    Role::Hospital,
    Role::BloodBank,
];

// =========================================================
// 提交流程
// =========================================================

/// 注册流程的阶段。
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RegisterStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Rejected {
        message: String,
        /// 用户名或邮箱已被占用时为真，界面给出换个凭据的提示
        existing_user: bool,
    },
}

impl RegisterStatus {
    pub fn is_submitting(&self) -> bool {
        matches!(self, RegisterStatus::Submitting)
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, RegisterStatus::Succeeded)
    }
}

/// 创建账户，成功后立即建立会话。
///
/// 返回最终状态；会话只在注册与登录都成功时存在，由调用方
/// 负责推进全局认证状态。
pub async fn submit_registration(
    api: &ApiClient,
    store: &dyn SessionStore,
    registration: &RegistrationRequest,
) -> (RegisterStatus, Option<Session>) {
    if let Err(error) = api.create_user(registration).await {
        let existing_user = error.is_duplicate_user();
        let message = match &error {
            ApiError::DuplicateUser(_) => {
                "Username or email already registered. Please try different credentials."
                    .to_string()
            }
            // 校验错误逐条展示，其余错误用后端给的描述
            ApiError::Validation(_) => error.to_string(),
            ApiError::Network(_) => "Registration failed. Please try again.".to_string(),
            other => other.to_string(),
        };
        return (
            RegisterStatus::Rejected {
                message,
                existing_user,
            },
            None,
        );
    }

    match establish_session(api, store, &registration.username, &registration.password).await {
        Ok(session) => (RegisterStatus::Succeeded, Some(session)),
        Err(error) => (
            RegisterStatus::Rejected {
                message: format!("Account created, but automatic sign-in failed: {error}"),
                existing_user: false,
            },
            None,
        ),
    }
}

// =========================================================
// 页面
// =========================================================

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let state = FormState::new();
    let status = RwSignal::new(RegisterStatus::Idle);

    // 提交中与成功等待跳转期间都锁住表单
    let busy = move || {
        let current = status.get();
        current.is_submitting() || current.succeeded()
    };
    let error_msg = move || match status.get() {
        RegisterStatus::Rejected { message, .. } => Some(message),
        _ => None,
    };

    let on_submit = {
        let navigate = navigate.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            if busy() {
                return;
            }

            status.set(RegisterStatus::Submitting);
            let registration = state.to_request();
            let navigate = navigate.clone();
            spawn_local(async move {
                let api = ApiClient::new(api_base_url());
                let (outcome, session) =
                    submit_registration(&api, &BrowserStore, &registration).await;
                let succeeded = outcome.succeeded();
                if let Some(session) = session {
                    auth.set_state.set(AuthState::Authenticated(session));
                }
                status.set(outcome);
                if succeeded {
                    // 留两秒给成功横幅，再跳转仪表盘
                    set_timeout(
                        move || navigate("/dashboard"),
                        std::time::Duration::from_secs(2),
                    );
                }
            });
        }
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content w-full max-w-3xl flex-col">
                <div class="text-center">
                    <h1 class="text-4xl font-bold text-error">"Join Smart Blood Link"</h1>
                    <p class="py-4 text-base-content/70">
                        "Create an account to donate, request, or coordinate blood supplies."
                    </p>
                </div>

                <div class="card w-full bg-base-100 shadow-2xl">
                    <form class="card-body" on:submit=on_submit>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"I am registering as"</span>
                            </label>
                            <div class="grid grid-cols-2 md:grid-cols-4 gap-2">
                                {REGISTRABLE_ROLES
                                    .iter()
                                    .map(|role| {
                                        let role = *role;
                                        view! {
                                            <button
                                                type="button"
                                                class=move || {
                                                    if state.role.get() == role {
                                                        "btn btn-error btn-sm"
                                                    } else {
                                                        "btn btn-outline btn-sm"
                                                    }
                                                }
                                                on:click=move |_| state.role.set(role)
                                            >
                                                {role.label()}
                                            </button>
                                        }
                                    })
                                    .collect_view()}
                            </div>
                        </div>

                        <div class="divider">"Account"</div>
                        <AccountFields state=state />

                        <div class="divider">
                            {move || format!("{} Details", state.role.get().label())}
                        </div>
                        {move || match state.role.get() {
                            Role::Hospital => view! { <HospitalSection state=state /> }.into_any(),
                            Role::Paramedic => {
                                view! { <ParamedicSection state=state /> }.into_any()
                            }
                            Role::BloodBank => {
                                view! { <BloodBankSection state=state /> }.into_any()
                            }
                            Role::User | Role::Admin => {
                                view! { <DonorSection state=state /> }.into_any()
                            }
                        }}

                        <Show when=move || status.get().succeeded()>
                            <div class="alert alert-success mt-4">
                                <HeartPulse attr:class="h-5 w-5" />
                                <div>
                                    <p>"Registration successful! You are now logged in."</p>
                                    <p class="text-sm">"Redirecting to your dashboard..."</p>
                                </div>
                            </div>
                        </Show>

                        <Show when=move || error_msg().is_some()>
                            <div class="alert alert-error mt-4">
                                <span class="whitespace-pre-line">
                                    {move || error_msg().unwrap_or_default()}
                                </span>
                            </div>
                        </Show>

                        <div class="form-control mt-6">
                            <button
                                type="submit"
                                class="btn btn-error"
                                disabled=move || busy()
                            >
                                <Show
                                    when=move || status.get().is_submitting()
                                    fallback=|| view! { "Register" }
                                >
                                    <span class="loading loading-spinner loading-sm"></span>
                                    "Registering..."
                                </Show>
                            </button>
                        </div>

                        <p class="text-center text-sm mt-2">
                            "Already have an account? "
                            <Link to="/login">
                                <span class="link link-error">"Sign in"</span>
                            </Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
