//! 注册表单的响应式状态。
//!
//! 所有角色的字段集中在一个 `FormState` 中,切换角色时已填内容不会丢失,
//! 提交时按当前角色挑选对应的扩展字段。

use bloodlink_shared::{
    BloodBankExtension, BloodGroup, DonorExtension, HospitalExtension, ParamedicExtension,
    RegistrationRequest, Role, RoleExtension,
};
use chrono::NaiveDate;
use leptos::prelude::*;

/// 注册表单状态,内部全是 `RwSignal`,可以按值复制进各个子组件。
#[derive(Clone, Copy)]
pub struct FormState {
    // 公共账户字段
    pub username: RwSignal<String>,
    pub email: RwSignal<String>,
    pub password: RwSignal<String>,
    /// 仅在前端收集,后端接口不接收该字段。
    pub confirm_password: RwSignal<String>,
    pub full_name: RwSignal<String>,
    pub phone_number: RwSignal<String>,
    pub address: RwSignal<String>,
    pub role: RwSignal<Role>,

    // 献血者字段
    pub date_of_birth: RwSignal<String>,
    pub blood_group: RwSignal<String>,
    pub medical_history: RwSignal<String>,
    pub biometric_data: RwSignal<String>,

    // 医院字段
    pub hospital_name: RwSignal<String>,
    pub hospital_registration_number: RwSignal<String>,
    pub emergency_contact: RwSignal<String>,
    pub facilities: RwSignal<Vec<String>>,

    // 急救员与血库共用执照号
    pub license_number: RwSignal<String>,
    pub certification: RwSignal<String>,
    pub years_of_experience: RwSignal<String>,
    pub specialization: RwSignal<String>,

    // 血库字段
    pub blood_bank_name: RwSignal<String>,
    pub storage_capacity: RwSignal<String>,
    pub operating_hours: RwSignal<String>,
    pub emergency_service: RwSignal<bool>,
    pub certification_details: RwSignal<String>,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            username: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
            confirm_password: RwSignal::new(String::new()),
            full_name: RwSignal::new(String::new()),
            phone_number: RwSignal::new(String::new()),
            address: RwSignal::new(String::new()),
            role: RwSignal::new(Role::User),
            date_of_birth: RwSignal::new(String::new()),
            blood_group: RwSignal::new(String::new()),
            medical_history: RwSignal::new(String::new()),
            biometric_data: RwSignal::new(String::new()),
            hospital_name: RwSignal::new(String::new()),
            hospital_registration_number: RwSignal::new(String::new()),
            emergency_contact: RwSignal::new(String::new()),
            facilities: RwSignal::new(Vec::new()),
            license_number: RwSignal::new(String::new()),
            certification: RwSignal::new(String::new()),
            years_of_experience: RwSignal::new(String::new()),
            specialization: RwSignal::new(String::new()),
            blood_bank_name: RwSignal::new(String::new()),
            storage_capacity: RwSignal::new(String::new()),
            operating_hours: RwSignal::new(String::new()),
            emergency_service: RwSignal::new(false),
            certification_details: RwSignal::new(String::new()),
        }
    }

    /// 勾选/取消勾选一项医院设施。
    pub fn toggle_facility(&self, name: &str) {
        self.facilities.update(|list| {
            if let Some(pos) = list.iter().position(|f| f == name) {
                list.remove(pos);
            } else {
                list.push(name.to_string());
            }
        });
    }

    pub fn reset(&self) {
        self.username.set(String::new());
        self.email.set(String::new());
        self.password.set(String::new());
        self.confirm_password.set(String::new());
        self.full_name.set(String::new());
        self.phone_number.set(String::new());
        self.address.set(String::new());
        self.role.set(Role::User);
        self.date_of_birth.set(String::new());
        self.blood_group.set(String::new());
        self.medical_history.set(String::new());
        self.biometric_data.set(String::new());
        self.hospital_name.set(String::new());
        self.hospital_registration_number.set(String::new());
        self.emergency_contact.set(String::new());
        self.facilities.set(Vec::new());
        self.license_number.set(String::new());
        self.certification.set(String::new());
        self.years_of_experience.set(String::new());
        self.specialization.set(String::new());
        self.blood_bank_name.set(String::new());
        self.storage_capacity.set(String::new());
        self.operating_hours.set(String::new());
        self.emergency_service.set(false);
        self.certification_details.set(String::new());
    }

    /// 按当前角色组装注册请求。
    pub fn to_request(&self) -> RegistrationRequest {
        let extension = match self.role.get() {
            // 注册入口只开放四种角色,管理员账户由后台直接建立
            Role::User | Role::Admin => RoleExtension::Donor(DonorExtension {
                date_of_birth: NaiveDate::parse_from_str(&self.date_of_birth.get(), "%Y-%m-%d")
                    .ok(),
                blood_group: BloodGroup::parse(&self.blood_group.get()),
                medical_history: opt(self.medical_history.get()),
                biometric_data: opt(self.biometric_data.get()),
            }),
            Role::Hospital => RoleExtension::Hospital(HospitalExtension {
                hospital_name: self.hospital_name.get(),
                hospital_registration_number: self.hospital_registration_number.get(),
                emergency_contact: opt(self.emergency_contact.get()),
                available_facilities: self.facilities.get(),
            }),
            Role::Paramedic => RoleExtension::Paramedic(ParamedicExtension {
                license_number: self.license_number.get(),
                certification: self.certification.get(),
                years_of_experience: self.years_of_experience.get().trim().parse().unwrap_or(0),
                specialization: opt(self.specialization.get()),
            }),
            Role::BloodBank => RoleExtension::BloodBank(BloodBankExtension {
                blood_bank_name: self.blood_bank_name.get(),
                license_number: self.license_number.get(),
                storage_capacity: self.storage_capacity.get().trim().parse().ok(),
                operating_hours: opt(self.operating_hours.get()),
                emergency_service: self.emergency_service.get(),
                certification_details: opt(self.certification_details.get()),
            }),
        };

        RegistrationRequest::new(
            self.username.get(),
            self.email.get(),
            self.password.get(),
            self.full_name.get(),
            self.phone_number.get(),
            self.address.get(),
            extension,
        )
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

/// 空串按"未填写"处理。
fn opt(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
