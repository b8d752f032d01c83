//! 仪表盘：按角色渲染互斥的布局。
//!
//! 挂载时顺序拉取当前用户资料和全量献血记录，献血者的
//! 三项指标（血型、上次献血、下次可献日期）在前端推导。

use chrono::{Duration, NaiveDateTime, Utc};
use leptos::prelude::*;
use leptos::task::spawn_local;

use bloodlink_shared::{
    Donation, Role, UserProfile, latest_donation_date, next_eligible_date,
};

use crate::auth::{client_for, use_auth};
use crate::components::icons::{Droplet, FileText, RefreshCw, ShieldCheck};
use crate::components::paramedic::VerificationPanel;

// 平台还没有聚合统计接口，医院/管理员布局先展示占位数字
const STUB_PENDING_REQUESTS: u32 = 5;
const STUB_AVAILABLE_UNITS: u32 = 75;
const STUB_TOTAL_USERS: &str = "1,234";
const STUB_ACTIVE_HOSPITALS: u32 = 45;
const STUB_REGISTERED_PARAMEDICS: u32 = 89;

// =========================================================
// 日期展示
// =========================================================

/// 毫秒级向上取整的天数差，负值朝零取整。
fn days_ceil(delta: Duration) -> i64 {
    const DAY_MS: i64 = 86_400_000;
    let ms = delta.num_milliseconds();
    if ms > 0 {
        (ms + DAY_MS - 1) / DAY_MS
    } else {
        ms / DAY_MS
    }
}

/// 上次献血的相对时间；30 天内按天数，更早按月数。
pub fn format_relative_past(last: Option<NaiveDateTime>, now: NaiveDateTime) -> String {
    let Some(last) = last else {
        return "No donations yet".to_string();
    };

    let days = days_ceil((now - last).abs());
    if days < 30 {
        format!("{days} days ago")
    } else {
        let months = days / 30;
        if months > 1 {
            format!("{months} months ago")
        } else {
            "1 month ago".to_string()
        }
    }
}

/// 距下次可献血的倒计时；已过期显示立即可献。
pub fn format_countdown(next: NaiveDateTime, now: NaiveDateTime) -> String {
    let days = days_ceil(next - now);
    if days <= 0 {
        "Eligible now".to_string()
    } else if days < 30 {
        format!("In {days} days")
    } else {
        let months = days / 30;
        if months > 1 {
            format!("In {months} months")
        } else {
            "In 1 month".to_string()
        }
    }
}

// =========================================================
// 页面
// =========================================================

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();

    let profile = RwSignal::new(Option::<UserProfile>::None);
    let donations = RwSignal::new(Vec::<Donation>::new());
    let loading = RwSignal::new(true);
    let load_error = RwSignal::new(Option::<String>::None);

    // 挂载与重新登录时拉数据；两个请求与旧版一样串行发出
    Effect::new(move |_| {
        let state = auth.state.get();
        if !state.is_authenticated() {
            loading.set(false);
            return;
        }

        let api = client_for(&state);
        loading.set(true);
        load_error.set(None);
        spawn_local(async move {
            match api.fetch_me().await {
                Ok(me) => {
                    match api.list_donations().await {
                        Ok(list) => donations.set(list),
                        Err(error) => {
                            load_error.set(Some(format!("Failed to load donations: {error}")));
                        }
                    }
                    profile.set(Some(me));
                }
                Err(error) => {
                    load_error.set(Some(format!("Failed to load profile: {error}")));
                }
            }
            loading.set(false);
        });
    });

    // 本人名下的最近一次献血
    let last_donation = Signal::derive(move || {
        profile
            .get()
            .and_then(|p| p.id)
            .and_then(|id| latest_donation_date(&donations.get(), &id))
    });
    let last_text = Signal::derive(move || {
        format_relative_past(last_donation.get(), Utc::now().naive_utc())
    });
    let next_text = Signal::derive(move || {
        let now = Utc::now().naive_utc();
        format_countdown(next_eligible_date(last_donation.get(), now), now)
    });
    let blood_group_text = Signal::derive(move || {
        profile
            .get()
            .and_then(|p| p.blood_group)
            .map(|g| g.as_str().to_string())
            .unwrap_or_else(|| "Not specified".to_string())
    });
    let own_donation_count = Signal::derive(move || {
        let Some(id) = profile.get().and_then(|p| p.id) else {
            return 0;
        };
        donations.get().iter().filter(|d| d.user_id == id).count()
    });

    view! {
        <div class="container mx-auto px-4 py-8">
            <Show when=move || load_error.get().is_some()>
                <div class="alert alert-warning mb-6">
                    <span>{move || load_error.get().unwrap_or_default()}</span>
                </div>
            </Show>

            <Show
                when=move || !loading.get()
                fallback=|| {
                    view! {
                        <div class="flex justify-center py-16">
                            <span class="loading loading-spinner loading-lg text-error"></span>
                        </div>
                    }
                }
            >
                {move || {
                    let state = auth.state.get();
                    match state.session() {
                        None => view! { <SignedOutNotice /> }.into_any(),
                        Some(session) => {
                            let username = session.username.clone();
                            match session.role {
                                Role::User => {
                                    view! {
                                        <DonorOverview
                                            username=username
                                            blood_group=blood_group_text
                                            last_donation=last_text
                                            next_eligible=next_text
                                        />
                                    }
                                        .into_any()
                                }
                                Role::Paramedic => view! {
                                    <div class="space-y-6">
                                        <h2 class="text-2xl font-bold">"Paramedic Dashboard"</h2>
                                        <VerificationPanel />
                                    </div>
                                }
                                    .into_any(),
                                Role::Hospital => view! {
                                    <HospitalOverview donation_count=own_donation_count />
                                }
                                    .into_any(),
                                Role::Admin => view! { <AdminOverview /> }.into_any(),
                                Role::BloodBank => view! { <BloodBankOverview /> }.into_any(),
                            }
                        }
                    }
                }}
            </Show>
        </div>
    }
}

#[component]
fn SignedOutNotice() -> impl IntoView {
    view! {
        <div class="card max-w-md mx-auto bg-base-100 shadow-xl">
            <div class="card-body items-center text-center">
                <ShieldCheck attr:class="h-10 w-10 text-error" />
                <h2 class="card-title">"Sign in required"</h2>
                <p>"Please log in to see your dashboard."</p>
            </div>
        </div>
    }
}

#[component]
fn DonorOverview(
    username: String,
    blood_group: Signal<String>,
    last_donation: Signal<String>,
    next_eligible: Signal<String>,
) -> impl IntoView {
    view! {
        <div class="space-y-6">
            <h2 class="text-2xl font-bold">{format!("Welcome, {username}")}</h2>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-6">
                <div class="card bg-base-100 shadow-md">
                    <div class="card-body">
                        <h3 class="card-title text-lg">
                            <Droplet attr:class="h-5 w-5 text-error" />
                            "Your Blood Group"
                        </h3>
                        <p class="text-3xl font-bold text-error">{move || blood_group.get()}</p>
                    </div>
                </div>
                <div class="card bg-base-100 shadow-md">
                    <div class="card-body">
                        <h3 class="card-title text-lg">
                            <FileText attr:class="h-5 w-5" />
                            "Last Donation"
                        </h3>
                        <p class="text-base-content/70">{move || last_donation.get()}</p>
                    </div>
                </div>
                <div class="card bg-base-100 shadow-md">
                    <div class="card-body">
                        <h3 class="card-title text-lg">
                            <RefreshCw attr:class="h-5 w-5" />
                            "Next Eligible"
                        </h3>
                        <p class="text-base-content/70">{move || next_eligible.get()}</p>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[component]
fn HospitalOverview(donation_count: Signal<usize>) -> impl IntoView {
    view! {
        <div class="space-y-6">
            <h2 class="text-2xl font-bold">"Hospital Dashboard"</h2>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-6">
                <div class="card bg-base-100 shadow-md">
                    <div class="card-body">
                        <h3 class="card-title text-lg">"Pending Requests"</h3>
                        <p class="text-3xl font-bold text-error">{STUB_PENDING_REQUESTS}</p>
                    </div>
                </div>
                <div class="card bg-base-100 shadow-md">
                    <div class="card-body">
                        <h3 class="card-title text-lg">"Available Units"</h3>
                        <p class="text-3xl font-bold text-success">{STUB_AVAILABLE_UNITS}</p>
                    </div>
                </div>
                <div class="card bg-base-100 shadow-md">
                    <div class="card-body">
                        <h3 class="card-title text-lg">"Total Donations"</h3>
                        <p class="text-3xl font-bold text-info">
                            {move || donation_count.get()}
                        </p>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[component]
fn AdminOverview() -> impl IntoView {
    view! {
        <div class="space-y-6">
            <h2 class="text-2xl font-bold">"Admin Dashboard"</h2>
            <div class="grid grid-cols-1 md:grid-cols-2 gap-6">
                <div class="card bg-base-100 shadow-md">
                    <div class="card-body">
                        <h3 class="card-title text-lg">"System Statistics"</h3>
                        <ul class="space-y-2">
                            <li class="flex justify-between">
                                <span>"Total Users"</span>
                                <span>{STUB_TOTAL_USERS}</span>
                            </li>
                            <li class="flex justify-between">
                                <span>"Active Hospitals"</span>
                                <span>{STUB_ACTIVE_HOSPITALS}</span>
                            </li>
                            <li class="flex justify-between">
                                <span>"Registered Paramedics"</span>
                                <span>{STUB_REGISTERED_PARAMEDICS}</span>
                            </li>
                        </ul>
                    </div>
                </div>
                <div class="card bg-base-100 shadow-md">
                    <div class="card-body">
                        <h3 class="card-title text-lg">"Quick Actions"</h3>
                        <div class="space-y-2">
                            <button class="btn btn-error w-full">"Manage Users"</button>
                            <button class="btn btn-error w-full">"View Reports"</button>
                            <button class="btn btn-error w-full">"System Settings"</button>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[component]
fn BloodBankOverview() -> impl IntoView {
    view! {
        <div class="space-y-6">
            <h2 class="text-2xl font-bold">"Blood Bank Dashboard"</h2>
            <div class="card bg-base-100 shadow-md">
                <div class="card-body">
                    <h3 class="card-title text-lg">
                        <Droplet attr:class="h-5 w-5 text-error" />
                        "Inventory Console"
                    </h3>
                    <p class="text-base-content/70">
                        "Stock management is not available yet. Incoming paramedic reports will reference your bank directly."
                    </p>
                </div>
            </div>
        </div>
    }
}

// =========================================================
// 测试
// =========================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_missing_history_reads_as_no_donations() {
        assert_eq!(format_relative_past(None, at(2024, 5, 1)), "No donations yet");
    }

    #[test]
    fn test_recent_donation_counts_days() {
        let now = at(2024, 5, 11);
        assert_eq!(
            format_relative_past(Some(at(2024, 5, 6)), now),
            "5 days ago"
        );
        // 一天也沿用复数写法，与既有界面一致
        assert_eq!(
            format_relative_past(Some(at(2024, 5, 10)), now),
            "1 days ago"
        );
    }

    #[test]
    fn test_partial_days_round_up() {
        let last = NaiveDate::from_ymd_opt(2024, 5, 9)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let now = NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        // 36 小时向上取整到 2 天
        assert_eq!(format_relative_past(Some(last), now), "2 days ago");
    }

    #[test]
    fn test_old_donation_counts_months() {
        let now = at(2024, 7, 1);
        // 61 天 -> 2 个月
        assert_eq!(
            format_relative_past(Some(at(2024, 5, 1)), now),
            "2 months ago"
        );
        // 30 天整恰好进入月档
        assert_eq!(
            format_relative_past(Some(at(2024, 6, 1)), now),
            "1 month ago"
        );
    }

    #[test]
    fn test_countdown_past_dates_are_eligible_now() {
        let now = at(2024, 5, 1);
        assert_eq!(format_countdown(at(2024, 4, 20), now), "Eligible now");
        assert_eq!(format_countdown(now, now), "Eligible now");
    }

    #[test]
    fn test_countdown_in_days_then_months() {
        let now = at(2024, 5, 1);
        assert_eq!(format_countdown(at(2024, 5, 11), now), "In 10 days");
        assert_eq!(format_countdown(at(2024, 5, 31), now), "In 1 month");
        assert_eq!(format_countdown(at(2024, 7, 30), now), "In 3 months");
    }

    #[test]
    fn test_fresh_donor_is_eligible_immediately() {
        let now = at(2024, 5, 1);
        let next = next_eligible_date(None, now);
        assert_eq!(format_countdown(next, now), "Eligible now");
    }
}
