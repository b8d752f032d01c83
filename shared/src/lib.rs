use serde::{Deserialize, Serialize};

mod donation;
mod registration;

pub use donation::{
    BloodRequest, Donation, DonationStatus, NewDonation, RequestStatus, donations_for_user,
    latest_donation_date, next_eligible_date,
};
pub use registration::{
    BloodBankExtension, DonorExtension, HospitalExtension, ParamedicExtension,
    RegistrationRequest, RoleExtension,
};

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// OAuth2 表单登录端点
pub const PATH_TOKEN: &str = "/token";
/// 用户注册 / 按角色查询端点
pub const PATH_USERS: &str = "/users/";
/// 当前用户资料端点
pub const PATH_ME: &str = "/users/me";
/// 献血记录端点
pub const PATH_DONATIONS: &str = "/donations/";
/// 验证报告端点
pub const PATH_REPORTS: &str = "/reports/";

/// 两次献血之间的最短间隔（天）
pub const ELIGIBILITY_WINDOW_DAYS: i64 = 90;

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 平台上的账号角色，后端以 snake_case 字符串存储
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Paramedic,
    Hospital,
    BloodBank,
    Admin,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::User,
        Role::Paramedic,
        Role::Hospital,
        Role::BloodBank,
        Role::Admin,
    ];

    /// 后端使用的标识符
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Paramedic => "paramedic",
            Role::Hospital => "hospital",
            Role::BloodBank => "blood_bank",
            Role::Admin => "admin",
        }
    }

    /// 界面展示名称
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Paramedic => "Paramedic",
            Role::Hospital => "Hospital",
            Role::BloodBank => "Blood Bank",
            Role::Admin => "Admin",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        Role::ALL.iter().copied().find(|r| r.as_str() == value)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 血型，采用医学写法（"A+"、"O-" 等）上行下行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::APositive,
        BloodGroup::ANegative,
        BloodGroup::BPositive,
        BloodGroup::BNegative,
        BloodGroup::AbPositive,
        BloodGroup::AbNegative,
        BloodGroup::OPositive,
        BloodGroup::ONegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
        }
    }

    pub fn parse(value: &str) -> Option<BloodGroup> {
        BloodGroup::ALL.iter().copied().find(|g| g.as_str() == value)
    }
}

impl std::fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// POST /token 的响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
}

/// 登录后的本地会话：令牌 + 身份三元组
///
/// 注意令牌本身只在这里和请求头中出现，不进入任何页面状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub role: Role,
}

/// GET /users/me 返回的用户资料
///
/// 后端把 Mongo 的 `_id` 原样透出，注册响应里则叫 `id`，
/// 两个写法都接受
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(
        default,
        rename = "_id",
        alias = "id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<BloodGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<chrono::NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biometric_data: Option<String>,
}

/// PUT /users/me 的部分更新载荷
///
/// 只包含用户可编辑的字段，身份字段（username / email / role）
/// 后端会直接丢弃，所以这里根本不提供
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<BloodGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<chrono::NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
}

/// 422 响应 `detail` 数组里的单条校验错误
///
/// `loc` 形如 `["body", "email"]`，第二个元素是字段名
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValidationIssue {
    #[serde(default)]
    pub loc: Vec<serde_json::Value>,
    pub msg: String,
}

impl ValidationIssue {
    /// 提取字段名，取不到时退回占位符
    pub fn field(&self) -> &str {
        self.loc
            .get(1)
            .and_then(|v| v.as_str())
            .unwrap_or("field")
    }
}

/// 急救员完成身份验证后提交的报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewReport {
    pub patient: String,
    pub verified_at: chrono::NaiveDateTime,
    pub blood_bank_ids: Vec<String>,
    pub hospital_ids: Vec<String>,
    pub status: String,
}

impl NewReport {
    pub fn new(
        patient: impl Into<String>,
        verified_at: chrono::NaiveDateTime,
        blood_bank_ids: Vec<String>,
        hospital_ids: Vec<String>,
    ) -> Self {
        NewReport {
            patient: patient.into(),
            verified_at,
            blood_bank_ids,
            hospital_ids,
            status: "pending".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("superuser"), None);
    }

    #[test]
    fn test_role_wire_format_is_snake_case() {
        let json = serde_json::to_string(&Role::BloodBank).unwrap();
        assert_eq!(json, "\"blood_bank\"");
        let parsed: Role = serde_json::from_str("\"blood_bank\"").unwrap();
        assert_eq!(parsed, Role::BloodBank);
    }

    #[test]
    fn test_blood_group_wire_format() {
        let json = serde_json::to_string(&BloodGroup::AbNegative).unwrap();
        assert_eq!(json, "\"AB-\"");
        let parsed: BloodGroup = serde_json::from_str("\"O+\"").unwrap();
        assert_eq!(parsed, BloodGroup::OPositive);
    }

    #[test]
    fn test_user_profile_accepts_mongo_and_plain_ids() {
        let with_mongo_id = r#"{
            "_id": "6600aa",
            "username": "alice",
            "email": "alice@example.com",
            "full_name": "Alice",
            "role": "user"
        }"#;
        let profile: UserProfile = serde_json::from_str(with_mongo_id).unwrap();
        assert_eq!(profile.id.as_deref(), Some("6600aa"));
        assert!(!profile.disabled);
        assert_eq!(profile.blood_group, None);

        let with_plain_id = r#"{
            "id": "77",
            "username": "bob",
            "email": "bob@example.com",
            "full_name": "Bob",
            "role": "paramedic"
        }"#;
        let profile: UserProfile = serde_json::from_str(with_plain_id).unwrap();
        assert_eq!(profile.id.as_deref(), Some("77"));
        assert_eq!(profile.role, Role::Paramedic);
    }

    #[test]
    fn test_profile_update_skips_untouched_fields() {
        let update = ProfileUpdate {
            phone_number: Some("555-0100".to_string()),
            ..ProfileUpdate::default()
        };
        let value = serde_json::to_value(&update).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["phone_number"], "555-0100");
    }

    #[test]
    fn test_validation_issue_field_extraction() {
        let issue: ValidationIssue =
            serde_json::from_str(r#"{"loc": ["body", "email"], "msg": "field required"}"#).unwrap();
        assert_eq!(issue.field(), "email");

        let bare: ValidationIssue = serde_json::from_str(r#"{"loc": [], "msg": "bad"}"#).unwrap();
        assert_eq!(bare.field(), "field");
    }

    #[test]
    fn test_new_report_defaults_to_pending() {
        let ts = chrono::NaiveDate::from_ymd_opt(2024, 4, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let report = NewReport::new("John Doe", ts, vec!["b1".into()], vec!["h1".into()]);
        assert_eq!(report.status, "pending");
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["patient"], "John Doe");
        assert_eq!(value["status"], "pending");
    }
}
