//! 献血记录与血液请求模型，以及献血资格的日期推算。
//!
//! 后端存储的 `status` 是小写字符串，但历史数据里存在首字母
//! 大写的写法，反序列化时两种都接受。

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{BloodGroup, ELIGIBILITY_WINDOW_DAYS};

/// 献血记录状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DonationStatus {
    #[serde(rename = "pending", alias = "Pending")]
    Pending,
    #[serde(rename = "completed", alias = "Completed")]
    Completed,
}

impl DonationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DonationStatus::Pending => "Pending",
            DonationStatus::Completed => "Completed",
        }
    }
}

/// 血液请求状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    #[serde(rename = "pending", alias = "Pending")]
    Pending,
    #[serde(rename = "approved", alias = "Approved")]
    Approved,
    #[serde(rename = "rejected", alias = "Rejected")]
    Rejected,
}

impl RequestStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
        }
    }
}

/// 一条已存在的献血记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    #[serde(
        default,
        rename = "_id",
        alias = "id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub user_id: String,
    pub blood_type: BloodGroup,
    pub units: u32,
    pub location: String,
    pub verified_by: String,
    pub status: DonationStatus,
    pub date: NaiveDateTime,
}

/// 新建献血记录的请求体（没有 `_id`，由后端分配）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDonation {
    pub user_id: String,
    pub blood_type: BloodGroup,
    pub units: u32,
    pub location: String,
    pub verified_by: String,
    pub status: DonationStatus,
    pub date: NaiveDateTime,
}

/// 医院发起的血液请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodRequest {
    #[serde(
        default,
        rename = "_id",
        alias = "id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub blood_type: BloodGroup,
    pub units: u32,
    pub hospital: String,
    pub location: String,
    pub status: RequestStatus,
    pub date: NaiveDateTime,
}

/// 过滤出属于某个用户的献血记录
///
/// 接口返回的是全量列表，按 `user_id` 归属在前端完成
pub fn donations_for_user<'a>(donations: &'a [Donation], user_id: &str) -> Vec<&'a Donation> {
    donations.iter().filter(|d| d.user_id == user_id).collect()
}

/// 该用户最近一次献血的日期，没有记录时返回 `None`
pub fn latest_donation_date(donations: &[Donation], user_id: &str) -> Option<NaiveDateTime> {
    donations
        .iter()
        .filter(|d| d.user_id == user_id)
        .map(|d| d.date)
        .max()
}

/// 下一次可献血的日期：上次献血日 + 休整期；从未献过则立即可献
pub fn next_eligible_date(last: Option<NaiveDateTime>, now: NaiveDateTime) -> NaiveDateTime {
    match last {
        Some(date) => date + Duration::days(ELIGIBILITY_WINDOW_DAYS),
        None => now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn donation(user_id: &str, date: NaiveDateTime) -> Donation {
        Donation {
            id: None,
            user_id: user_id.to_string(),
            blood_type: BloodGroup::APositive,
            units: 1,
            location: "City Blood Center".to_string(),
            verified_by: "Dr. Smith".to_string(),
            status: DonationStatus::Completed,
            date,
        }
    }

    #[test]
    fn test_latest_donation_ignores_other_users() {
        let donations = vec![
            donation("1", dt(2024, 1, 20)),
            donation("2", dt(2024, 6, 1)),
            donation("1", dt(2024, 3, 15)),
            donation("3", dt(2024, 7, 9)),
        ];
        assert_eq!(latest_donation_date(&donations, "1"), Some(dt(2024, 3, 15)));
        assert_eq!(latest_donation_date(&donations, "4"), None);
        assert_eq!(donations_for_user(&donations, "1").len(), 2);
    }

    #[test]
    fn test_next_eligible_is_ninety_days_after_last() {
        let next = next_eligible_date(Some(dt(2024, 3, 15)), dt(2024, 4, 1));
        assert_eq!(next, dt(2024, 6, 13));
    }

    #[test]
    fn test_next_eligible_without_history_is_now() {
        let now = dt(2024, 4, 1);
        assert_eq!(next_eligible_date(None, now), now);
    }

    #[test]
    fn test_donation_status_accepts_legacy_capitalization() {
        let lower: DonationStatus = serde_json::from_str("\"completed\"").unwrap();
        let upper: DonationStatus = serde_json::from_str("\"Completed\"").unwrap();
        assert_eq!(lower, DonationStatus::Completed);
        assert_eq!(upper, DonationStatus::Completed);
        assert_eq!(
            serde_json::to_string(&DonationStatus::Pending).unwrap(),
            "\"pending\""
        );
    }

    #[test]
    fn test_donation_wire_shape() {
        let raw = r#"{
            "_id": "66aa01",
            "user_id": "1",
            "blood_type": "A+",
            "units": 2,
            "location": "City Blood Center",
            "verified_by": "Dr. Smith",
            "status": "pending",
            "date": "2024-03-15T00:00:00"
        }"#;
        let parsed: Donation = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.id.as_deref(), Some("66aa01"));
        assert_eq!(parsed.blood_type, BloodGroup::APositive);
        assert_eq!(parsed.date, dt(2024, 3, 15));

        let new = NewDonation {
            user_id: "1".to_string(),
            blood_type: BloodGroup::ONegative,
            units: 1,
            location: "County Hospital".to_string(),
            verified_by: "Nurse Johnson".to_string(),
            status: DonationStatus::Pending,
            date: dt(2024, 5, 2),
        };
        let value = serde_json::to_value(&new).unwrap();
        assert_eq!(value["blood_type"], "O-");
        assert_eq!(value["status"], "pending");
        assert!(value.get("_id").is_none());
    }
}
