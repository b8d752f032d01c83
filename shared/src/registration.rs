//! 注册请求模型。
//!
//! 不同角色在公共字段之外各带一组扩展字段，后端按角色校验
//! 必填项。扩展字段通过 `#[serde(flatten)]` 平铺进同一个
//! JSON 对象，线上格式与旧版表单提交完全一致。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{BloodGroup, Role};

/// 注册请求：公共字段 + 按角色的扩展字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
    pub phone_number: String,
    pub address: String,
    #[serde(flatten)]
    pub extension: RoleExtension,
}

impl RegistrationRequest {
    /// 扩展字段与 `role` 必须一致，构造时从扩展推导
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        full_name: impl Into<String>,
        phone_number: impl Into<String>,
        address: impl Into<String>,
        extension: RoleExtension,
    ) -> Self {
        RegistrationRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            full_name: full_name.into(),
            role: extension.role(),
            phone_number: phone_number.into(),
            address: address.into(),
            extension,
        }
    }
}

/// 角色扩展字段，每个角色一个变体
///
/// `untagged` 序列化后只剩字段本身，角色信息由外层的
/// `role` 字段携带。变体顺序影响反序列化：必填字段多的
/// 放前面，全可选的 `Donor` 兜底。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleExtension {
    Hospital(HospitalExtension),
    Paramedic(ParamedicExtension),
    BloodBank(BloodBankExtension),
    Donor(DonorExtension),
}

impl RoleExtension {
    pub fn role(&self) -> Role {
        match self {
            RoleExtension::Donor(_) => Role::User,
            RoleExtension::Hospital(_) => Role::Hospital,
            RoleExtension::Paramedic(_) => Role::Paramedic,
            RoleExtension::BloodBank(_) => Role::BloodBank,
        }
    }
}

/// 普通用户（献血者）的可选资料
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DonorExtension {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<BloodGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biometric_data: Option<String>,
}

/// 医院注册信息，前两项为后端必填
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HospitalExtension {
    pub hospital_name: String,
    pub hospital_registration_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub available_facilities: Vec<String>,
}

/// 急救员注册信息，前三项为后端必填
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamedicExtension {
    pub license_number: String,
    pub certification: String,
    pub years_of_experience: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
}

/// 血库注册信息，前两项为后端必填
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BloodBankExtension {
    pub blood_bank_name: String,
    pub license_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_capacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_hours: Option<String>,
    #[serde(default)]
    pub emergency_service: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certification_details: Option<String>,
}
