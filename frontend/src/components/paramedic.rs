//! 急救员控制台：模拟身份核验，核验通过后向血库与医院提交报告。

use chrono::Utc;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use bloodlink_shared::{NewReport, Role, UserProfile};

use crate::auth::{client_for, use_auth};
use crate::components::icons::{FileText, Fingerprint, Plus};
use crate::verification::{
    IdentityVerifier, SimulatedScanner, VerificationLog, VerificationStatus, report_submittable,
};
use crate::web::router::use_navigate;

/// 扫描动画时长（毫秒）。
const SCAN_DELAY_MS: u32 = 2_000;

/// 一次核验的推进阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ScanPhase {
    #[default]
    Idle,
    Scanning,
    Complete(VerificationStatus),
}

/// 勾选/取消勾选一个机构 id。
fn toggle_selection(list: RwSignal<Vec<String>>, id: &str) {
    list.update(|selected| {
        if let Some(pos) = selected.iter().position(|s| s == id) {
            selected.remove(pos);
        } else {
            selected.push(id.to_string());
        }
    });
}

#[component]
pub fn VerificationPanel() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let patient = RwSignal::new(String::new());
    let phase = RwSignal::new(ScanPhase::Idle);
    let log = RwSignal::new(VerificationLog::new());

    let banks = RwSignal::new(Vec::<UserProfile>::new());
    let hospitals = RwSignal::new(Vec::<UserProfile>::new());
    let selected_banks = RwSignal::new(Vec::<String>::new());
    let selected_hospitals = RwSignal::new(Vec::<String>::new());
    let lists_loaded = RwSignal::new(false);
    let submitting = RwSignal::new(false);
    let notification = RwSignal::new(Option::<(String, bool)>::None); // 消息内容, 是否出错

    let verified = move || matches!(phase.get(), ScanPhase::Complete(VerificationStatus::Verified));
    let scanning = move || phase.get() == ScanPhase::Scanning;
    let can_verify = move || !patient.get().trim().is_empty() && !scanning();
    let can_submit = Signal::derive(move || {
        report_submittable(
            selected_banks.get().len(),
            selected_hospitals.get().len(),
            submitting.get(),
        )
    });

    let on_verify = move |_| {
        let name = patient.get().trim().to_string();
        if name.is_empty() || scanning() {
            return;
        }
        phase.set(ScanPhase::Scanning);
        spawn_local(async move {
            TimeoutFuture::new(SCAN_DELAY_MS).await;
            // 每次核验独立抽签
            let status = SimulatedScanner::from_clock().verify(&name).await;
            log.update(|l| l.record(name, status, Utc::now().naive_utc()));
            phase.set(ScanPhase::Complete(status));
        });
    };

    // 第一次核验通过后拉取可选机构，两个请求串行发出
    Effect::new(move |_| {
        if !matches!(phase.get(), ScanPhase::Complete(VerificationStatus::Verified))
            || lists_loaded.get()
        {
            return;
        }
        let state = auth.state.get_untracked();
        let api = client_for(&state);
        spawn_local(async move {
            match api.list_users_by_role(Role::BloodBank).await {
                Ok(list) => banks.set(list),
                Err(error) => {
                    notification.set(Some((format!("Failed to load blood banks: {error}"), true)));
                }
            }
            match api.list_users_by_role(Role::Hospital).await {
                Ok(list) => hospitals.set(list),
                Err(error) => {
                    notification.set(Some((format!("Failed to load hospitals: {error}"), true)));
                }
            }
            lists_loaded.set(true);
        });
    });

    let on_submit_report = move |_| {
        if !can_submit.get() {
            return;
        }
        // 报告绑定最近一条核验记录的身份与时间
        let Some(record) = log.get().entries().first().cloned() else {
            return;
        };
        submitting.set(true);
        notification.set(None);

        let state = auth.state.get_untracked();
        let api = client_for(&state);
        let report = NewReport::new(
            record.name,
            record.timestamp,
            selected_banks.get(),
            selected_hospitals.get(),
        );
        spawn_local(async move {
            match api.create_report(&report).await {
                Ok(_) => {
                    notification.set(Some(("Report submitted.".to_string(), false)));
                }
                Err(error) => {
                    notification.set(Some((format!("Failed to submit report: {error}"), true)));
                }
            }
            submitting.set(false);
        });
    };

    let on_register_patient = {
        let navigate = navigate.clone();
        move |_| {
            navigate("/register");
        }
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
        <div class="space-y-6">
            <Show when=move || notification.get().is_some()>
                <div class=move || {
                    if notification.get().map(|(_, is_err)| is_err).unwrap_or(false) {
                        "alert alert-error"
                    } else {
                        "alert alert-success"
                    }
                }>
                    <span>{move || notification.get().map(|(msg, _)| msg).unwrap_or_default()}</span>
                </div>
            </Show>

            <div class="grid grid-cols-1 md:grid-cols-2 gap-6">
                <div class="card bg-base-100 shadow-md">
                    <div class="card-body">
                        <h3 class="card-title text-lg">"Verify Donor"</h3>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"Patient Name"</span>
                            </label>
                            <input
                                type="text"
                                class="input input-bordered"
                                placeholder="Full name of the patient"
                                on:input=move |ev| patient.set(event_target_value(&ev))
                                prop:value=move || patient.get()
                            />
                        </div>
                        <button
                            class="btn btn-error w-full mt-4"
                            disabled=move || !can_verify()
                            on:click=on_verify
                        >
                            <Show
                                when=scanning
                                fallback=|| {
                                    view! {
                                        <Fingerprint attr:class="h-4 w-4" />
                                        "Start Biometric Verification"
                                    }
                                }
                            >
                                <span class="loading loading-spinner loading-sm"></span>
                                "Scanning fingerprint..."
                            </Show>
                        </button>

                        {move || match phase.get() {
                            ScanPhase::Complete(VerificationStatus::Verified) => view! {
                                <div class="alert alert-success mt-4">
                                    <span>"Identity verified. You can submit a report below."</span>
                                </div>
                            }
                                .into_any(),
                            ScanPhase::Complete(VerificationStatus::Failed) => view! {
                                <div class="alert alert-error mt-4">
                                    <div class="flex w-full items-center justify-between gap-2">
                                        <span>"Verification failed. No matching record."</span>
                                        <button
                                            class="btn btn-sm btn-outline"
                                            on:click=on_register_patient.clone()
                                        >
                                            <Plus attr:class="h-4 w-4" />
                                            "Register New Patient"
                                        </button>
                                    </div>
                                </div>
                            }
                                .into_any(),
                            _ => ().into_any(),
                        }}
                    </div>
                </div>

                <div class="card bg-base-100 shadow-md">
                    <div class="card-body">
                        <h3 class="card-title text-lg">"Recent Verifications"</h3>
                        <Show
                            when=move || !log.get().is_empty()
                            fallback=|| {
                                view! {
                                    <p class="text-base-content/60">"No verifications yet."</p>
                                }
                            }
                        >
                            <ul class="space-y-2">
                                <For
                                    each=move || log.get().entries().to_vec()
                                    key=|record| record.id
                                    children=|record| {
                                        let badge = if record.status.is_verified() {
                                            "badge badge-success"
                                        } else {
                                            "badge badge-error"
                                        };
                                        view! {
                                            <li class="flex items-center justify-between">
                                                <span>{record.name}</span>
                                                <span class="flex items-center gap-2">
                                                    <span class="text-xs text-base-content/60">
                                                        {record.timestamp.format("%H:%M:%S").to_string()}
                                                    </span>
                                                    <span class=badge>{record.status.label()}</span>
                                                </span>
                                            </li>
                                        }
                                    }
                                />
                            </ul>
                        </Show>
                    </div>
                </div>
            </div>

            <Show when=verified>
                <div class="card bg-base-100 shadow-md">
                    <div class="card-body">
                        <h3 class="card-title text-lg">
                            <FileText attr:class="h-5 w-5" />
                            "Generate Report"
                        </h3>
                        <p class="text-sm text-base-content/60">
                            "Select at least one blood bank and one hospital to notify."
                        </p>
                        <div class="grid grid-cols-1 md:grid-cols-2 gap-4 mt-2">
                            <InstitutionPicker
                                title="Blood Banks"
                                entries=banks
                                selected=selected_banks
                            />
                            <InstitutionPicker
                                title="Hospitals"
                                entries=hospitals
                                selected=selected_hospitals
                            />
                        </div>
                        <button
                            class="btn btn-error mt-4"
                            disabled=move || !can_submit.get()
                            on:click=on_submit_report
                        >
                            <Show
                                when=move || submitting.get()
                                fallback=|| view! { "Submit Report" }
                            >
                                <span class="loading loading-spinner loading-sm"></span>
                                "Submitting..."
                            </Show>
                        </button>
                    </div>
                </div>
            </Show>
        </div>
    }
}

/// 机构多选列表，没有 id 的记录不可选。
#[component]
fn InstitutionPicker(
    title: &'static str,
    entries: RwSignal<Vec<UserProfile>>,
    selected: RwSignal<Vec<String>>,
) -> impl IntoView {
    view! {
        <div>
            <h4 class="font-semibold mb-2">{title}</h4>
            <Show
                when=move || !entries.get().is_empty()
                fallback=|| view! { <p class="text-sm text-base-content/60">"None available."</p> }
            >
                <div class="space-y-1">
                    <For
                        each=move || {
                            entries
                                .get()
                                .into_iter()
                                .filter(|p| p.id.is_some())
                                .collect::<Vec<_>>()
                        }
                        key=|profile| profile.id.clone().unwrap_or_default()
                        children=move |profile: UserProfile| {
                            let id = profile.id.clone().unwrap_or_default();
                            let check_id = id.clone();
                            view! {
                                <label class="label cursor-pointer justify-start gap-2 py-1">
                                    <input
                                        type="checkbox"
                                        class="checkbox checkbox-sm"
                                        prop:checked=move || {
                                            selected.get().iter().any(|s| *s == check_id)
                                        }
                                        on:change=move |_| toggle_selection(selected, &id)
                                    />
                                    <span class="label-text">{profile.full_name}</span>
                                </label>
                            }
                        }
                    />
                </div>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leptos::prelude::Owner;

    #[test]
    fn test_toggle_selection_adds_then_removes() {
        let owner = Owner::new();
        owner.set();

        let selected = RwSignal::new(Vec::<String>::new());
        toggle_selection(selected, "bank-1");
        toggle_selection(selected, "bank-2");
        assert_eq!(selected.get(), vec!["bank-1".to_string(), "bank-2".to_string()]);

        toggle_selection(selected, "bank-1");
        assert_eq!(selected.get(), vec!["bank-2".to_string()]);

        std::mem::forget(owner);
    }
}
