//! 血液请求页：医院发起请求，管理员审批。
//!
//! 后端还没有请求相关的接口，这一页的数据只活在内存里，
//! 刷新后回到种子数据。

use chrono::{NaiveDate, NaiveDateTime, Utc};
use leptos::prelude::*;

use bloodlink_shared::{BloodGroup, BloodRequest, RequestStatus, Role};

use crate::auth::use_auth;

fn seeded_at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// 演示用的初始请求列表。
fn seed_requests() -> Vec<BloodRequest> {
    vec![
        BloodRequest {
            id: Some("1".to_string()),
            blood_type: BloodGroup::APositive,
            units: 2,
            hospital: "City General Hospital".to_string(),
            location: "123 Main St, City".to_string(),
            status: RequestStatus::Pending,
            date: seeded_at(2024, 4, 8),
        },
        BloodRequest {
            id: Some("2".to_string()),
            blood_type: BloodGroup::ONegative,
            units: 1,
            hospital: "County Medical Center".to_string(),
            location: "456 Oak Ave, County".to_string(),
            status: RequestStatus::Approved,
            date: seeded_at(2024, 4, 7),
        },
    ]
}

fn next_request_id(list: &[BloodRequest]) -> String {
    (list.len() + 1).to_string()
}

/// 修改指定请求的状态，未命中时什么都不做。
fn set_request_status(list: &mut [BloodRequest], id: &str, status: RequestStatus) {
    if let Some(request) = list.iter_mut().find(|r| r.id.as_deref() == Some(id)) {
        request.status = status;
    }
}

#[component]
pub fn RequestsPage() -> impl IntoView {
    let auth = use_auth();

    let requests = RwSignal::new(seed_requests());

    // 新请求表单（医院）
    let blood_type = RwSignal::new(String::new());
    let units = RwSignal::new(String::new());
    let hospital = RwSignal::new(String::new());
    let location = RwSignal::new(String::new());
    let form_error = RwSignal::new(Option::<String>::None);

    let role = Signal::derive(move || auth.state.get().role());
    let is_hospital = move || role.get() == Some(Role::Hospital);
    let is_admin = move || role.get() == Some(Role::Admin);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let Some(group) = BloodGroup::parse(&blood_type.get()) else {
            form_error.set(Some("Select a blood type.".to_string()));
            return;
        };
        let Ok(unit_count) = units.get().trim().parse::<u32>() else {
            form_error.set(Some("Units must be a whole number.".to_string()));
            return;
        };
        form_error.set(None);

        requests.update(|list| {
            let request = BloodRequest {
                id: Some(next_request_id(list)),
                blood_type: group,
                units: unit_count,
                hospital: hospital.get(),
                location: location.get(),
                status: RequestStatus::Pending,
                date: Utc::now().naive_utc(),
            };
            list.push(request);
        });

        blood_type.set(String::new());
        units.set(String::new());
        hospital.set(String::new());
        location.set(String::new());
    };

    view! {
        <div class="container mx-auto px-4 py-8">
            <h2 class="text-2xl font-bold mb-6">"Blood Requests"</h2>

            <Show when=is_hospital>
                <div class="card bg-base-100 shadow-md mb-8">
                    <div class="card-body">
                        <h3 class="card-title text-lg">"New Blood Request"</h3>
                        <form class="space-y-4" on:submit=on_submit>
                            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                                <div class="form-control">
                                    <label class="label">
                                        <span class="label-text">"Blood Type"</span>
                                    </label>
                                    <select
                                        class="select select-bordered"
                                        required
                                        on:change=move |ev| {
                                            blood_type.set(event_target_value(&ev))
                                        }
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
                                        <span class="label-text">"Units Required"</span>
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
                                        <span class="label-text">"Hospital Name"</span>
                                    </label>
                                    <input
                                        type="text"
                                        class="input input-bordered"
                                        required
                                        on:input=move |ev| hospital.set(event_target_value(&ev))
                                        prop:value=move || hospital.get()
                                    />
                                </div>

                                <div class="form-control">
                                    <label class="label">
                                        <span class="label-text">"Location"</span>
                                    </label>
                                    <input
                                        type="text"
                                        class="input input-bordered"
                                        required
                                        on:input=move |ev| location.set(event_target_value(&ev))
                                        prop:value=move || location.get()
                                    />
                                </div>
                            </div>

                            <Show when=move || form_error.get().is_some()>
                                <div class="alert alert-error">
                                    <span>{move || form_error.get().unwrap_or_default()}</span>
                                </div>
                            </Show>

                            <button type="submit" class="btn btn-error w-full">
                                "Submit Request"
                            </button>
                        </form>
                    </div>
                </div>
            </Show>

            <div class="card bg-base-100 shadow-md">
                <div class="card-body p-0">
                    <div class="overflow-x-auto">
                        <table class="table">
                            <thead>
                                <tr>
                                    <th>"Blood Type"</th>
                                    <th>"Units"</th>
                                    <th>"Hospital"</th>
                                    <th>"Location"</th>
                                    <th>"Status"</th>
                                    <th>"Date"</th>
                                    {move || is_admin().then(|| view! { <th>"Actions"</th> })}
                                </tr>
                            </thead>
                            // 状态会被原地修改，整表重渲染而不是按键缓存行
                            <tbody>
                                {move || {
                                    requests
                                        .get()
                                        .into_iter()
                                        .map(|request| {
                                            let id = request.id.clone().unwrap_or_default();
                                            let approve_id = id.clone();
                                            let reject_id = id;
                                            let badge = if request.status
                                                == RequestStatus::Approved
                                            {
                                                "badge badge-success"
                                            } else {
                                                "badge badge-warning"
                                            };
                                            view! {
                                                <tr>
                                                    <td>{request.blood_type.as_str()}</td>
                                                    <td>{request.units}</td>
                                                    <td>{request.hospital}</td>
                                                    <td>{request.location}</td>
                                                    <td>
                                                        <span class=badge>
                                                            {request.status.label()}
                                                        </span>
                                                    </td>
                                                    <td>
                                                        {request
                                                            .date
                                                            .format("%Y-%m-%d")
                                                            .to_string()}
                                                    </td>
                                                    {is_admin()
                                                        .then(|| {
                                                            view! {
                                                                <td>
                                                                    <button
                                                                        class="btn btn-ghost btn-xs text-success"
                                                                        on:click=move |_| {
                                                                            requests
                                                                                .update(|list| {
                                                                                    set_request_status(
                                                                                        list,
                                                                                        &approve_id,
                                                                                        RequestStatus::Approved,
                                                                                    )
                                                                                });
                                                                        }
                                                                    >
                                                                        "Approve"
                                                                    </button>
                                                                    <button
                                                                        class="btn btn-ghost btn-xs text-error"
                                                                        on:click=move |_| {
                                                                            requests
                                                                                .update(|list| {
                                                                                    set_request_status(
                                                                                        list,
                                                                                        &reject_id,
                                                                                        RequestStatus::Rejected,
                                                                                    )
                                                                                });
                                                                        }
                                                                    >
                                                                        "Reject"
                                                                    </button>
                                                                </td>
                                                            }
                                                        })}
                                                </tr>
                                            }
                                        })
                                        .collect_view()
                                }}
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_contains_two_known_requests() {
        let seed = seed_requests();
        assert_eq!(seed.len(), 2);
        assert_eq!(seed[0].hospital, "City General Hospital");
        assert_eq!(seed[0].status, RequestStatus::Pending);
        assert_eq!(seed[1].blood_type, BloodGroup::ONegative);
        assert_eq!(seed[1].status, RequestStatus::Approved);
    }

    #[test]
    fn test_new_requests_get_sequential_ids() {
        let list = seed_requests();
        assert_eq!(next_request_id(&list), "3");
    }

    #[test]
    fn test_status_change_touches_only_the_matching_request() {
        let mut list = seed_requests();
        set_request_status(&mut list, "1", RequestStatus::Rejected);

        assert_eq!(list[0].status, RequestStatus::Rejected);
        assert_eq!(list[1].status, RequestStatus::Approved);
    }

    #[test]
    fn test_status_change_ignores_unknown_ids() {
        let mut list = seed_requests();
        set_request_status(&mut list, "99", RequestStatus::Approved);

        assert_eq!(list[0].status, RequestStatus::Pending);
        assert_eq!(list[1].status, RequestStatus::Approved);
    }
}
