//! 个人资料页：展示当前资料，可切换到编辑态提交部分更新。

use chrono::NaiveDate;
use leptos::prelude::*;
use leptos::task::spawn_local;

use bloodlink_shared::{BloodGroup, ProfileUpdate, UserProfile};

use crate::auth::{client_for, use_auth};

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();

    let profile = RwSignal::new(Option::<UserProfile>::None);
    let loading = RwSignal::new(true);
    let editing = RwSignal::new(false);
    let saving = RwSignal::new(false);
    let notification = RwSignal::new(Option::<(String, bool)>::None); // 消息内容, 是否出错

    // 可编辑字段的草稿
    let draft_name = RwSignal::new(String::new());
    let draft_dob = RwSignal::new(String::new());
    let draft_phone = RwSignal::new(String::new());
    let draft_address = RwSignal::new(String::new());
    let draft_blood = RwSignal::new(String::new());
    let draft_history = RwSignal::new(String::new());

    // 每次进入页面都重新拉取，资料不做本地缓存
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
                Ok(me) => profile.set(Some(me)),
                Err(error) => {
                    notification.set(Some((format!("Failed to load profile: {error}"), true)));
                }
            }
            loading.set(false);
        });
    });

    let seed_drafts = move || {
        if let Some(current) = profile.get() {
            draft_name.set(current.full_name);
            draft_dob.set(
                current
                    .date_of_birth
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
            );
            draft_phone.set(current.phone_number.unwrap_or_default());
            draft_address.set(current.address.unwrap_or_default());
            draft_blood.set(
                current
                    .blood_group
                    .map(|g| g.as_str().to_string())
                    .unwrap_or_default(),
            );
            draft_history.set(current.medical_history.unwrap_or_default());
        }
    };

    let on_toggle_edit = move |_| {
        if editing.get() {
            editing.set(false);
        } else {
            seed_drafts();
            editing.set(true);
        }
    };

    let on_save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if saving.get() {
            return;
        }
        saving.set(true);

        let update = ProfileUpdate {
            full_name: Some(draft_name.get()),
            phone_number: Some(draft_phone.get()),
            address: Some(draft_address.get()),
            blood_group: BloodGroup::parse(&draft_blood.get()),
            date_of_birth: NaiveDate::parse_from_str(&draft_dob.get(), "%Y-%m-%d").ok(),
            medical_history: Some(draft_history.get()),
        };
        let state = auth.state.get_untracked();
        let api = client_for(&state);
        spawn_local(async move {
            match api.update_me(&update).await {
                Ok(updated) => {
                    profile.set(Some(updated));
                    editing.set(false);
                    notification.set(Some(("Profile updated.".to_string(), false)));
                }
                Err(error) => {
                    notification.set(Some((format!("Failed to save profile: {error}"), true)));
                }
            }
            saving.set(false);
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
            <div class="max-w-2xl mx-auto">
                <Show when=move || notification.get().is_some()>
                    <div class=move || {
                        if notification.get().map(|(_, is_err)| is_err).unwrap_or(false) {
                            "alert alert-error mb-4"
                        } else {
                            "alert alert-success mb-4"
                        }
                    }>
                        <span>
                            {move || notification.get().map(|(msg, _)| msg).unwrap_or_default()}
                        </span>
                    </div>
                </Show>

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <div class="flex justify-between items-center mb-4">
                            <h2 class="card-title text-2xl">"User Profile"</h2>
                            <button class="btn btn-error btn-sm" on:click=on_toggle_edit>
                                {move || if editing.get() { "Cancel" } else { "Edit Profile" }}
                            </button>
                        </div>

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
                            <Show
                                when=move || editing.get()
                                fallback=move || {
                                    view! { <ProfileReadView profile=profile /> }
                                }
                            >
                                <form class="space-y-4" on:submit=on_save>
                                    <div class="form-control">
                                        <label class="label">
                                            <span class="label-text">"Name"</span>
                                        </label>
                                        <input
                                            type="text"
                                            class="input input-bordered"
                                            on:input=move |ev| {
                                                draft_name.set(event_target_value(&ev))
                                            }
                                            prop:value=move || draft_name.get()
                                        />
                                    </div>
                                    <div class="form-control">
                                        <label class="label">
                                            <span class="label-text">"Date of Birth"</span>
                                        </label>
                                        <input
                                            type="date"
                                            class="input input-bordered"
                                            on:input=move |ev| {
                                                draft_dob.set(event_target_value(&ev))
                                            }
                                            prop:value=move || draft_dob.get()
                                        />
                                    </div>
                                    <div class="form-control">
                                        <label class="label">
                                            <span class="label-text">"Phone Number"</span>
                                        </label>
                                        <input
                                            type="tel"
                                            class="input input-bordered"
                                            on:input=move |ev| {
                                                draft_phone.set(event_target_value(&ev))
                                            }
                                            prop:value=move || draft_phone.get()
                                        />
                                    </div>
                                    <div class="form-control">
                                        <label class="label">
                                            <span class="label-text">"Address"</span>
                                        </label>
                                        <textarea
                                            class="textarea textarea-bordered"
                                            on:input=move |ev| {
                                                draft_address.set(event_target_value(&ev))
                                            }
                                            prop:value=move || draft_address.get()
                                        ></textarea>
                                    </div>
                                    <div class="form-control">
                                        <label class="label">
                                            <span class="label-text">"Blood Group"</span>
                                        </label>
                                        <select
                                            class="select select-bordered"
                                            on:change=move |ev| {
                                                draft_blood.set(event_target_value(&ev))
                                            }
                                            prop:value=move || draft_blood.get()
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
                                            <span class="label-text">"Medical History"</span>
                                        </label>
                                        <textarea
                                            class="textarea textarea-bordered"
                                            on:input=move |ev| {
                                                draft_history.set(event_target_value(&ev))
                                            }
                                            prop:value=move || draft_history.get()
                                        ></textarea>
                                    </div>
                                    <button
                                        type="submit"
                                        class="btn btn-error w-full"
                                        disabled=move || saving.get()
                                    >
                                        <Show
                                            when=move || saving.get()
                                            fallback=|| view! { "Save Changes" }
                                        >
                                            <span class="loading loading-spinner loading-sm"></span>
                                            "Saving..."
                                        </Show>
                                    </button>
                                </form>
                            </Show>
                        </Show>
                    </div>
                </div>
            </div>
        </div>
    }
}

/// 只读态的资料卡片。
#[component]
fn ProfileReadView(profile: RwSignal<Option<UserProfile>>) -> impl IntoView {
    let field = move |pick: fn(&UserProfile) -> String| {
        profile.get().map(|p| pick(&p)).unwrap_or_default()
    };

    view! {
        <div class="space-y-4">
            <ProfileRow label="Name" value=Signal::derive(move || field(|p| p.full_name.clone())) />
            <ProfileRow
                label="Date of Birth"
                value=Signal::derive(move || {
                    field(|p| {
                        p.date_of_birth
                            .map(|d| d.format("%Y-%m-%d").to_string())
                            .unwrap_or_default()
                    })
                })
            />
            <ProfileRow
                label="Phone Number"
                value=Signal::derive(move || field(|p| p.phone_number.clone().unwrap_or_default()))
            />
            <ProfileRow
                label="Address"
                value=Signal::derive(move || field(|p| p.address.clone().unwrap_or_default()))
            />
            <ProfileRow
                label="Blood Group"
                value=Signal::derive(move || {
                    field(|p| {
                        p.blood_group.map(|g| g.as_str().to_string()).unwrap_or_default()
                    })
                })
            />
            <ProfileRow
                label="Medical History"
                value=Signal::derive(move || {
                    field(|p| {
                        p.medical_history
                            .clone()
                            .unwrap_or_else(|| "No significant medical history".to_string())
                    })
                })
            />
            <div>
                <label class="text-sm font-medium text-base-content/60">"Biometric Data"</label>
                <p class="mt-1 font-mono text-sm text-base-content/50">
                    {move || field(|p| p.biometric_data.clone().unwrap_or_default())}
                </p>
            </div>
        </div>
    }
}

#[component]
fn ProfileRow(label: &'static str, value: Signal<String>) -> impl IntoView {
    view! {
        <div>
            <label class="text-sm font-medium text-base-content/60">{label}</label>
            <p class="mt-1">{move || value.get()}</p>
        </div>
    }
}
