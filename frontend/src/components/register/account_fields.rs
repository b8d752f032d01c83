//! 所有角色共用的账户信息输入区。

use super::form_state::FormState;
use leptos::prelude::*;

#[component]
pub fn AccountFields(state: FormState) -> impl IntoView {
    view! {
        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
            <div class="form-control">
                <label class="label">
                    <span class="label-text">"Username"</span>
                </label>
                <input
                    type="text"
                    class="input input-bordered"
                    placeholder="Choose a username"
                    required
                    on:input=move |ev| state.username.set(event_target_value(&ev))
                    prop:value=move || state.username.get()
                />
            </div>

            <div class="form-control">
                <label class="label">
                    <span class="label-text">"Email"</span>
                </label>
                <input
                    type="email"
                    class="input input-bordered"
                    placeholder="you@example.com"
                    required
                    on:input=move |ev| state.email.set(event_target_value(&ev))
                    prop:value=move || state.email.get()
                />
            </div>

            <div class="form-control">
                <label class="label">
                    <span class="label-text">"Password"</span>
                </label>
                <input
                    type="password"
                    class="input input-bordered"
                    placeholder="Password"
                    required
                    on:input=move |ev| state.password.set(event_target_value(&ev))
                    prop:value=move || state.password.get()
                />
            </div>

            <div class="form-control">
                <label class="label">
                    <span class="label-text">"Confirm Password"</span>
                </label>
                <input
                    type="password"
                    class="input input-bordered"
                    placeholder="Repeat password"
                    required
                    on:input=move |ev| state.confirm_password.set(event_target_value(&ev))
                    prop:value=move || state.confirm_password.get()
                />
            </div>

            <div class="form-control">
                <label class="label">
                    <span class="label-text">"Full Name"</span>
                </label>
                <input
                    type="text"
                    class="input input-bordered"
                    placeholder="Your full name"
                    required
                    on:input=move |ev| state.full_name.set(event_target_value(&ev))
                    prop:value=move || state.full_name.get()
                />
            </div>

            <div class="form-control">
                <label class="label">
                    <span class="label-text">"Phone Number"</span>
                </label>
                <input
                    type="tel"
                    class="input input-bordered"
                    placeholder="Contact number"
                    required
                    on:input=move |ev| state.phone_number.set(event_target_value(&ev))
                    prop:value=move || state.phone_number.get()
                />
            </div>

            <div class="form-control md:col-span-2">
                <label class="label">
                    <span class="label-text">"Address"</span>
                </label>
                <input
                    type="text"
                    class="input input-bordered"
                    placeholder="Street, city"
                    required
                    on:input=move |ev| state.address.set(event_target_value(&ev))
                    prop:value=move || state.address.get()
                />
            </div>
        </div>
    }
}
