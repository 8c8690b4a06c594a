//! Data models for the admin API and the public directory API.

use serde::{Deserialize, Serialize};

// --- Admin API ---

/// Institution metadata attached to the authenticated admin.
///
/// Every field is optional: the login endpoint returns a partial record for
/// accounts that have not completed onboarding.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InstituteDetails {
    pub id: Option<i64>,
    pub institute_id: Option<String>,
    pub institute_name: Option<String>,
    pub institute_address: Option<String>,
    pub institute_ein: Option<i64>,
    pub institute_email: Option<String>,
    pub institute_contact: Option<String>,
    pub institute_category: Option<String>,
    pub institute_type: Option<String>,
    pub institute_board: Option<String>,
    pub logo: Option<String>,
    pub institute_gateway: Option<String>,
    pub vendor_id: Option<i64>,
    pub is_gateway_fee: Option<bool>,
}

/// The authenticated admin's profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminUser {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub status: String,
    #[serde(rename = "institute_details", default)]
    pub institute: InstituteDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `POST /merchant/login` success envelope:
/// `{payload: {data: {admin, authorization: {access_token}}}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub payload: LoginPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginPayload {
    pub data: LoginData,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginData {
    pub admin: AdminUser,
    pub authorization: Authorization,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Authorization {
    pub access_token: String,
}

// --- Public directory API ---

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Address {
    pub street: Option<String>,
    pub suite: Option<String>,
    pub city: String,
    pub zipcode: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Company {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company: Company,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: i64,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatePostRequest {
    pub title: String,
    pub body: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_uses_camel_case_user_id_on_the_wire() {
        let post: Post =
            serde_json::from_str(r#"{"id":1,"userId":3,"title":"t","body":"b"}"#).unwrap();
        assert_eq!(post.user_id, 3);

        let out = serde_json::to_value(&CreatePostRequest {
            title: "t".into(),
            body: "b".into(),
            user_id: 3,
        })
        .unwrap();
        assert_eq!(out["userId"], 3);
    }

    #[test]
    fn admin_user_accepts_empty_institute_details() {
        let admin: AdminUser = serde_json::from_str(
            r#"{"name":"A","email":"a@x.com","mobile":"1","status":"active","institute_details":{}}"#,
        )
        .unwrap();
        assert_eq!(admin.institute, InstituteDetails::default());
    }
}
