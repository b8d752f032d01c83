//! 献血记录页：列出本人名下的记录，并可登记新的一次献血。
//!
//! 新记录的创建接口在后端只对急救员和管理员开放，普通用户
//! 提交会收到 403，错误原样展示在表单旁。

use chrono::NaiveDate;
use leptos::prelude::*;
use leptos::task::spawn_local;

use bloodlink_shared::{
    BloodGroup, Donation, DonationStatus, NewDonation, UserProfile, donations_for_user,
};

use crate::auth::{client_for, use_auth};
use crate::components::icons::Plus;

#[component]
pub fn DonationsPage() -> impl IntoView {
    let auth = use_auth();

    let profile = RwSignal::new(Option::<UserProfile>::None);
    let donations = RwSignal::new(Vec::<Donation>::new());
    let loading = RwSignal::new(true);
    let submitting = RwSignal::new(false);
    let notification = RwSignal::new(Option::<(String, bool)>::None); // 消息内容, 是否出错

    // 新记录表单
    let date = RwSignal::new(String::new());
    let blood_type = RwSignal::new(String::new());
    let units = RwSignal::new(String::new());
    let location = RwSignal::new(String::new());
    let verified_by = RwSignal::new(String::new());

    Effect::new(move |_| {
        let state = auth.state.get();
        if !state.is_authenticated() {
            loading.set(false);
            return;
        }
        let api = client_for(&state);
        loading.set(true);
        spawn_local(async move {
            match api.fetch_me().await {
                Ok(me) => {
                    match api.list_donations().await {
                        Ok(list) => donations.set(list),
                        Err(error) => {
                            notification
                                .set(Some((format!("Failed to load donations: {error}"), true)));
                        }
                    }
                    profile.set(Some(me));
                }
                Err(error) => {
                    notification.set(Some((format!("Failed to load profile: {error}"), true)));
                }
            }
            loading.set(false);
        });
    });

    // 本人名下的记录
    let own_donations = Signal::derive(move || {
        let Some(id) = profile.get().and_then(|p| p.id) else {
            return Vec::new();
        };
        donations_for_user(&donations.get(), &id)
            .into_iter()
            .cloned()
            .collect::<Vec<_>>()
    });
    let username = Signal::derive(move || {
        auth.state
            .get()
            .session()
            .map(|s| s.username.clone())
            .unwrap_or_default()
    });

    let reset_form = move || {
        date.set(String::new());
        blood_type.set(String::new());
        units.set(String::new());
        location.set(String::new());
        verified_by.set(String::new());
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get() {
            return;
        }

        let Some(user_id) = profile.get().and_then(|p| p.id) else {
            notification.set(Some(("Profile is still loading.".to_string(), true)));
            return;
        };
        let Some(group) = BloodGroup::parse(&blood_type.get()) else {
            notification.set(Some(("Select a blood type.".to_string(), true)));
            return;
        };
        let Ok(unit_count) = units.get().trim().parse::<u32>() else {
            notification.set(Some(("Units must be a whole number.".to_string(), true)));
            return;
        };
        let Some(day) = NaiveDate::parse_from_str(&date.get(), "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        else {
            notification.set(Some(("Pick a donation date.".to_string(), true)));
            return;
        };

        submitting.set(true);
        let record = NewDonation {
            user_id,
            blood_type: group,
            units: unit_count,
            location: location.get(),
            verified_by: verified_by.get(),
            status: DonationStatus::Pending,
            date: day,
        };
        let state = auth.state.get_untracked();
        let api = client_for(&state);
        spawn_local(async move {
            match api.create_donation(&record).await {
                Ok(created) => {
                    donations.update(|list| list.push(created));
                    reset_form();
                    notification.set(Some(("Donation record added.".to_string(), false)));
                }
                Err(error) => {
                    notification.set(Some((format!("Failed to add record: {error}"), true)));
                }
            }
            submitting.set(false);
        });
    };

    // 3 秒后清除通知
    Effect::new(move |_| {
        if notification.get().is_some() {
            set_timeout(
                move || notification.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    view! {
        <div class="container mx-auto px-4 py-8">
            <h2 class="text-2xl font-bold mb-2">"Donation History"</h2>
            <p class="text-base-content/70 mb-6">
                {move || format!("Welcome, {}! Here's your donation history.", username.get())}
            </p>

            <Show when=move || notification.get().is_some()>
                <div class=move || {
                    if notification.get().map(|(_, is_err)| is_err).unwrap_or(false) {
                        "alert alert-error mb-4"
                    } else {
                        "alert alert-success mb-4"
                    }
                }>
                    <span>{move || notification.get().map(|(msg, _)| msg).unwrap_or_default()}</span>
                </div>
            </Show>

            <div class="card bg-base-100 shadow-md mb-8">
                <div class="card-body">
                    <h3 class="card-title text-lg">"New Donation Record"</h3>
                    <form class="space-y-4" on:submit=on_submit>
                        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                            <div class="form-control">
                                <label class="label">
                                    <span class="label-text">"Date"</span>
                                </label>
                                <input
                                    type="date"
                                    class="input input-bordered"
                                    required
                                    on:input=move |ev| date.set(event_target_value(&ev))
                                    prop:value=move || date.get()
                                />
                            </div>

                            <div class="form-control">
                                <label class="label">
                                    <span class="label-text">"Blood Type"</span>
                                </label>
                                <select
                                    class="select select-bordered"
                                    required
                                    on:change=move |ev| blood_type.set(event_target_value(&ev))
                                    prop:value=move || blood_type.get()
                                >
                                    <option value="">"Select Blood Type"</option>
                                    {BloodGroup::ALL
                                        .iter()
                                        .map(|group| {
                                            view! {
                                                <option value=group
                                                    .as_str()>{group.as_str()}</option>
                                            }
                                        })
                                        .collect_view()}
                                </select>
                            </div>

                            <div class="form-control">
                                <label class="label">
                                    <span class="label-text">"Units"</span>
                                </label>
                                <input
                                    type="number"
                                    class="input input-bordered"
                                    min="1"
                                    required
                                    on:input=move |ev| units.set(event_target_value(&ev))
                                    prop:value=move || units.get()
                                />
                            </div>

                            <div class="form-control">
                                <label class="label">
                                    <span class="label-text">"Location"</span>
                                </label>
                                <input
                                    type="text"
                                    class="input input-bordered"
                                    placeholder="Donation center"
                                    required
                                    on:input=move |ev| location.set(event_target_value(&ev))
                                    prop:value=move || location.get()
                                />
                            </div>

                            <div class="form-control md:col-span-2">
                                <label class="label">
                                    <span class="label-text">"Verified By"</span>
                                </label>
                                <input
                                    type="text"
                                    class="input input-bordered"
                                    placeholder="Attending clinician"
                                    required
                                    on:input=move |ev| verified_by.set(event_target_value(&ev))
                                    prop:value=move || verified_by.get()
                                />
                            </div>
                        </div>

                        <button
                            type="submit"
                            class="btn btn-error w-full"
                            disabled=move || submitting.get()
                        >
                            <Show
                                when=move || submitting.get()
                                fallback=|| {
                                    view! {
                                        <Plus attr:class="h-4 w-4" />
                                        "Add Donation Record"
                                    }
                                }
                            >
                                <span class="loading loading-spinner loading-sm"></span>
                                "Saving..."
                            </Show>
                        </button>
                    </form>
                </div>
            </div>

            <div class="card bg-base-100 shadow-md">
                <div class="card-body p-0">
                    <Show
                        when=move || !loading.get()
                        fallback=|| {
                            view! {
                                <div class="flex justify-center py-8">
                                    <span class="loading loading-spinner loading-lg text-error"></span>
                                </div>
                            }
                        }
                    >
                        <div class="overflow-x-auto">
                            <table class="table">
                                <thead>
                                    <tr>
                                        <th>"Date"</th>
                                        <th>"Blood Type"</th>
                                        <th>"Units"</th>
                                        <th>"Location"</th>
                                        <th>"Verified By"</th>
                                        <th>"Status"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    <Show when=move || own_donations.get().is_empty()>
                                        <tr>
                                            <td
                                                colspan="6"
                                                class="text-center py-8 text-base-content/50"
                                            >
                                                "No donation records yet."
                                            </td>
                                        </tr>
                                    </Show>
                                    <For
                                        each=move || own_donations.get()
                                        key=|donation| donation.id.clone().unwrap_or_default()
                                        children=|donation: Donation| {
                                            let badge =
                                                if donation.status == DonationStatus::Completed {
                                                    "badge badge-success"
                                                } else {
                                                    "badge badge-warning"
                                                };
                                            view! {
                                                <tr>
                                                    <td>
                                                        {donation
                                                            .date
                                                            .format("%Y-%m-%d")
                                                            .to_string()}
                                                    </td>
                                                    <td>{donation.blood_type.as_str()}</td>
                                                    <td>{donation.units}</td>
                                                    <td>{donation.location}</td>
                                                    <td>{donation.verified_by}</td>
                                                    <td>
                                                        <span class=badge>
                                                            {donation.status.label()}
                                                        </span>
                                                    </td>
                                                </tr>
                                            }
                                        }
                                    />
                                </tbody>
                            </table>
                        </div>
                    </Show>
                </div>
            </div>
        </div>
    }
}
