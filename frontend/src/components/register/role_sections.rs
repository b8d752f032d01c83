//! 按角色展开的注册扩展字段区。

use super::form_state::FormState;
use crate::components::icons::Fingerprint;
use crate::verification::sample_biometric_token;
use bloodlink_shared::BloodGroup;
use leptos::prelude::*;

/// 医院可勾选的设施列表。
const FACILITIES: [&str; 6] = [
    "ICU",
    "Emergency Room",
    "Blood Bank",
    "Pharmacy",
    "Lab Services",
    "Ambulance",
];

#[component]
pub fn DonorSection(state: FormState) -> impl IntoView {
    let collected = move || !state.biometric_data.get().is_empty();

    view! {
        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
            <div class="form-control">
                <label class="label">
                    <span class="label-text">"Date of Birth"</span>
                </label>
                <input
                    type="date"
                    class="input input-bordered"
                    on:input=move |ev| state.date_of_birth.set(event_target_value(&ev))
                    prop:value=move || state.date_of_birth.get()
                />
            </div>

            <div class="form-control">
                <label class="label">
                    <span class="label-text">"Blood Group"</span>
                </label>
                <select
                    class="select select-bordered"
                    on:change=move |ev| state.blood_group.set(event_target_value(&ev))
                    prop:value=move || state.blood_group.get()
                >
                    <option value="">"Select blood group"</option>
                    {BloodGroup::ALL
                        .iter()
                        .map(|group| {
                            view! { <option value=group.as_str()>{group.as_str()}</option> }
                        })
                        .collect_view()}
                </select>
            </div>

            <div class="form-control md:col-span-2">
                <label class="label">
                    <span class="label-text">"Medical History"</span>
                </label>
                <textarea
                    class="textarea textarea-bordered"
                    placeholder="Allergies, chronic conditions..."
                    on:input=move |ev| state.medical_history.set(event_target_value(&ev))
                    prop:value=move || state.medical_history.get()
                ></textarea>
            </div>

            <div class="form-control md:col-span-2">
                <button
                    type="button"
                    class=move || {
                        if collected() { "btn btn-success" } else { "btn btn-outline" }
                    }
                    on:click=move |_| state.biometric_data.set(sample_biometric_token())
                >
                    <Fingerprint attr:class="h-4 w-4" />
                    {move || {
                        if collected() { "Biometric Data Collected" } else { "Collect Biometric Data" }
                    }}
                </button>
            </div>
        </div>
    }
}

#[component]
pub fn HospitalSection(state: FormState) -> impl IntoView {
    view! {
        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
            <div class="form-control">
                <label class="label">
                    <span class="label-text">"Hospital Name"</span>
                </label>
                <input
                    type="text"
                    class="input input-bordered"
                    required
                    on:input=move |ev| state.hospital_name.set(event_target_value(&ev))
                    prop:value=move || state.hospital_name.get()
                />
            </div>

            <div class="form-control">
                <label class="label">
                    <span class="label-text">"Registration Number"</span>
                </label>
                <input
                    type="text"
                    class="input input-bordered"
                    required
                    on:input=move |ev| {
                        state.hospital_registration_number.set(event_target_value(&ev))
                    }
                    prop:value=move || state.hospital_registration_number.get()
                />
            </div>

            <div class="form-control md:col-span-2">
                <label class="label">
                    <span class="label-text">"Emergency Contact"</span>
                </label>
                <input
                    type="tel"
                    class="input input-bordered"
                    placeholder="24h contact number"
                    on:input=move |ev| state.emergency_contact.set(event_target_value(&ev))
                    prop:value=move || state.emergency_contact.get()
                />
            </div>

            <div class="form-control md:col-span-2">
                <label class="label">
                    <span class="label-text">"Available Facilities"</span>
                </label>
                <div class="grid grid-cols-2 md:grid-cols-3 gap-2">
                    {FACILITIES
                        .iter()
                        .map(|name| {
                            let name = *name;
                            view! {
                                <label class="label cursor-pointer justify-start gap-2">
                                    <input
                                        type="checkbox"
                                        class="checkbox checkbox-sm"
                                        prop:checked=move || {
                                            state.facilities.get().iter().any(|f| f == name)
                                        }
                                        on:change=move |_| state.toggle_facility(name)
                                    />
                                    <span class="label-text">{name}</span>
                                </label>
                            }
                        })
                        .collect_view()}
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn ParamedicSection(state: FormState) -> impl IntoView {
    view! {
        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
            <div class="form-control">
                <label class="label">
                    <span class="label-text">"License Number"</span>
                </label>
                <input
                    type="text"
                    class="input input-bordered"
                    required
                    on:input=move |ev| state.license_number.set(event_target_value(&ev))
                    prop:value=move || state.license_number.get()
                />
            </div>

            <div class="form-control">
                <label class="label">
                    <span class="label-text">"Certification"</span>
                </label>
                <input
                    type="text"
                    class="input input-bordered"
                    placeholder="EMT-B, EMT-P..."
                    required
                    on:input=move |ev| state.certification.set(event_target_value(&ev))
                    prop:value=move || state.certification.get()
                />
            </div>

            <div class="form-control">
                <label class="label">
                    <span class="label-text">"Years of Experience"</span>
                </label>
                <input
                    type="number"
                    class="input input-bordered"
                    min="0"
                    on:input=move |ev| state.years_of_experience.set(event_target_value(&ev))
                    prop:value=move || state.years_of_experience.get()
                />
            </div>

            <div class="form-control">
                <label class="label">
                    <span class="label-text">"Specialization"</span>
                </label>
                <input
                    type="text"
                    class="input input-bordered"
                    placeholder="Trauma, cardiac..."
                    on:input=move |ev| state.specialization.set(event_target_value(&ev))
                    prop:value=move || state.specialization.get()
                />
            </div>
        </div>
    }
}

#[component]
pub fn BloodBankSection(state: FormState) -> impl IntoView {
    view! {
        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
            <div class="form-control">
                <label class="label">
                    <span class="label-text">"Blood Bank Name"</span>
                </label>
                <input
                    type="text"
                    class="input input-bordered"
                    required
                    on:input=move |ev| state.blood_bank_name.set(event_target_value(&ev))
                    prop:value=move || state.blood_bank_name.get()
                />
            </div>

            <div class="form-control">
                <label class="label">
                    <span class="label-text">"License Number"</span>
                </label>
                <input
                    type="text"
                    class="input input-bordered"
                    required
                    on:input=move |ev| state.license_number.set(event_target_value(&ev))
                    prop:value=move || state.license_number.get()
                />
            </div>

            <div class="form-control">
                <label class="label">
                    <span class="label-text">"Storage Capacity (units)"</span>
                </label>
                <input
                    type="number"
                    class="input input-bordered"
                    min="0"
                    on:input=move |ev| state.storage_capacity.set(event_target_value(&ev))
                    prop:value=move || state.storage_capacity.get()
                />
            </div>

            <div class="form-control">
                <label class="label">
                    <span class="label-text">"Operating Hours"</span>
                </label>
                <input
                    type="text"
                    class="input input-bordered"
                    placeholder="Mon-Fri 9:00-17:00"
                    on:input=move |ev| state.operating_hours.set(event_target_value(&ev))
                    prop:value=move || state.operating_hours.get()
                />
            </div>

            <div class="form-control md:col-span-2">
                <label class="label cursor-pointer justify-start gap-2">
                    <input
                        type="checkbox"
                        class="toggle toggle-error"
                        prop:checked=move || state.emergency_service.get()
                        on:change=move |_| state.emergency_service.update(|v| *v = !*v)
                    />
                    <span class="label-text">"24/7 Emergency Service"</span>
                </label>
            </div>

            <div class="form-control md:col-span-2">
                <label class="label">
                    <span class="label-text">"Certification Details"</span>
                </label>
                <textarea
                    class="textarea textarea-bordered"
                    placeholder="Accreditations, inspection records..."
                    on:input=move |ev| state.certification_details.set(event_target_value(&ev))
                    prop:value=move || state.certification_details.get()
                ></textarea>
            </div>
        </div>
    }
}
