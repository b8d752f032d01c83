use super::*;
use crate::error::ApiError;
use crate::web::http::MockTransport;
use bloodlink_shared::{
    BloodGroup, DonationStatus, DonorExtension, NewDonation, NewReport, RegistrationRequest, Role,
    RoleExtension,
};
use serde_json::json;
use std::rc::Rc;

// =========================================================
// Shared Helpers
// =========================================================

const BASE: &str = "http://api.test";

fn client_with_mock() -> (ApiClient, Rc<MockTransport>) {
    let transport = Rc::new(MockTransport::new());
    let client = ApiClient::with_transport(BASE.to_string(), transport.clone());
    (client, transport)
}

fn profile_json(id: &str, username: &str, role: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "username": username,
        "email": format!("{username}@example.com"),
        "full_name": username,
        "role": role,
    })
}

// =========================================================
// Token Endpoint
// =========================================================

#[tokio::test]
async fn test_token_request_is_form_encoded() {
    let (client, transport) = client_with_mock();
    transport.mock_response(
        "http://api.test/token",
        200,
        json!({"access_token": "tok-1", "token_type": "bearer"}),
    );

    let token = client.request_token("alice", "s3cret").await.unwrap();
    assert_eq!(token.access_token, "tok-1");

    let requests = transport.requests.borrow();
    let (url, method, headers, body) = &requests[0];
    assert_eq!(url, "http://api.test/token");
    assert_eq!(method, "POST");
    assert_eq!(
        headers.get("Content-Type").map(String::as_str),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(body.as_deref(), Some("username=alice&password=s3cret"));
}

#[tokio::test]
async fn test_token_request_escapes_reserved_characters() {
    let (client, transport) = client_with_mock();
    transport.mock_response(
        "http://api.test/token",
        200,
        json!({"access_token": "tok-2", "token_type": "bearer"}),
    );

    client.request_token("a&b", "p w=50%").await.unwrap();

    let requests = transport.requests.borrow();
    let body = requests[0].3.as_deref().unwrap();
    assert_eq!(body, "username=a%26b&password=p%20w%3D50%25");
}

#[tokio::test]
async fn test_bad_credentials_surface_backend_detail() {
    let (client, transport) = client_with_mock();
    transport.mock_response(
        "http://api.test/token",
        401,
        json!({"detail": "Incorrect username or password"}),
    );

    let err = client.request_token("alice", "wrong").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Incorrect username or password");
}

// =========================================================
// Authenticated Requests
// =========================================================

#[tokio::test]
async fn test_bearer_header_present_when_token_set() {
    let (client, transport) = client_with_mock();
    transport.mock_response("http://api.test/users/me", 200, profile_json("1", "alice", "user"));

    let client = client.with_token("tok-9");
    let profile = client.fetch_me().await.unwrap();
    assert_eq!(profile.username, "alice");

    let requests = transport.requests.borrow();
    assert_eq!(
        requests[0].2.get("Authorization").map(String::as_str),
        Some("Bearer tok-9")
    );
}

#[tokio::test]
async fn test_request_without_token_omits_auth_header() {
    let (client, transport) = client_with_mock();
    transport.mock_response(
        "http://api.test/users/me",
        401,
        json!({"detail": "Not authenticated"}),
    );

    let err = client.fetch_me().await.unwrap_err();
    assert!(err.is_unauthorized());

    let requests = transport.requests.borrow();
    assert!(!requests[0].2.contains_key("Authorization"));
}

#[tokio::test]
async fn test_list_users_by_role_builds_query() {
    let (client, transport) = client_with_mock();
    transport.mock_response(
        "http://api.test/users/?role=blood_bank",
        200,
        json!([profile_json("b1", "central_bank", "blood_bank")]),
    );

    let client = client.with_token("tok-9");
    let banks = client.list_users_by_role(Role::BloodBank).await.unwrap();
    assert_eq!(banks.len(), 1);
    assert_eq!(banks[0].id.as_deref(), Some("b1"));
    assert_eq!(banks[0].role, Role::BloodBank);
}

// =========================================================
// Registration
// =========================================================

#[tokio::test]
async fn test_create_user_posts_json_without_auth() {
    let (client, transport) = client_with_mock();
    transport.mock_response(
        "http://api.test/users/",
        200,
        profile_json("9", "newbie", "user"),
    );

    let registration = RegistrationRequest::new(
        "newbie",
        "newbie@example.com",
        "pw",
        "New Bee",
        "555-0101",
        "1 Hive Rd",
        RoleExtension::Donor(DonorExtension::default()),
    );
    // 即便客户端带着令牌，注册也不应该发出认证头
    let created = client
        .with_token("leftover")
        .create_user(&registration)
        .await
        .unwrap();
    assert_eq!(created.username, "newbie");

    let requests = transport.requests.borrow();
    let (_, method, headers, body) = &requests[0];
    assert_eq!(method, "POST");
    assert!(!headers.contains_key("Authorization"));
    assert_eq!(
        headers.get("Content-Type").map(String::as_str),
        Some("application/json")
    );
    let sent: serde_json::Value = serde_json::from_str(body.as_deref().unwrap()).unwrap();
    assert_eq!(sent["username"], "newbie");
    assert_eq!(sent["role"], "user");
}

#[tokio::test]
async fn test_duplicate_registration_is_classified() {
    let (client, transport) = client_with_mock();
    transport.mock_response(
        "http://api.test/users/",
        400,
        json!({"detail": "Username or email already registered"}),
    );

    let registration = RegistrationRequest::new(
        "alice",
        "alice@example.com",
        "pw",
        "Alice",
        "555-0100",
        "12 Main St",
        RoleExtension::Donor(DonorExtension::default()),
    );
    let err = client.create_user(&registration).await.unwrap_err();
    assert!(err.is_duplicate_user());
}

// =========================================================
// Donations and Reports
// =========================================================

#[tokio::test]
async fn test_create_donation_sends_wire_shape() {
    let (client, transport) = client_with_mock();
    let date = chrono::NaiveDate::from_ymd_opt(2024, 5, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    transport.mock_response(
        "http://api.test/donations/",
        200,
        json!({
            "_id": "d1",
            "user_id": "1",
            "blood_type": "O-",
            "units": 1,
            "location": "County Hospital",
            "verified_by": "Nurse Johnson",
            "status": "pending",
            "date": "2024-05-02T00:00:00"
        }),
    );

    let new_donation = NewDonation {
        user_id: "1".to_string(),
        blood_type: BloodGroup::ONegative,
        units: 1,
        location: "County Hospital".to_string(),
        verified_by: "Nurse Johnson".to_string(),
        status: DonationStatus::Pending,
        date,
    };
    let created = client
        .with_token("tok-9")
        .create_donation(&new_donation)
        .await
        .unwrap();
    assert_eq!(created.id.as_deref(), Some("d1"));
    assert_eq!(created.status, DonationStatus::Pending);

    let requests = transport.requests.borrow();
    let sent: serde_json::Value =
        serde_json::from_str(requests[0].3.as_deref().unwrap()).unwrap();
    assert_eq!(sent["blood_type"], "O-");
    assert_eq!(sent["user_id"], "1");
    assert!(sent.get("_id").is_none());
}

#[tokio::test]
async fn test_create_report_posts_selection() {
    let (client, transport) = client_with_mock();
    transport.mock_response("http://api.test/reports/", 200, json!({"_id": "r1"}));

    let verified_at = chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    let report = NewReport::new(
        "John Doe",
        verified_at,
        vec!["b1".to_string(), "b2".to_string()],
        vec!["h1".to_string()],
    );
    client
        .with_token("tok-9")
        .create_report(&report)
        .await
        .unwrap();

    let requests = transport.requests.borrow();
    let sent: serde_json::Value =
        serde_json::from_str(requests[0].3.as_deref().unwrap()).unwrap();
    assert_eq!(sent["patient"], "John Doe");
    assert_eq!(sent["blood_bank_ids"], json!(["b1", "b2"]));
    assert_eq!(sent["hospital_ids"], json!(["h1"]));
    assert_eq!(sent["status"], "pending");
}

// =========================================================
// URL Handling
// =========================================================

#[tokio::test]
async fn test_trailing_slash_in_base_url_is_trimmed() {
    let transport = Rc::new(MockTransport::new());
    let client = ApiClient::with_transport("http://api.test/".to_string(), transport.clone());
    transport.mock_response(
        "http://api.test/donations/",
        200,
        json!([]),
    );

    let donations = client.list_donations().await.unwrap();
    assert!(donations.is_empty());

    let requests = transport.requests.borrow();
    assert_eq!(requests[0].0, "http://api.test/donations/");
}

#[tokio::test]
async fn test_unmocked_url_yields_api_error() {
    let (client, _transport) = client_with_mock();
    let err = client.list_donations().await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Api {
            status: 404,
            detail: "Not Found".to_string()
        }
    );
}
