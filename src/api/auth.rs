//! Login against the admin API.

use crate::api_client::ApiClient;
use crate::auth_session::Session;
use crate::endpoints::LOGIN_PATH;
use crate::error::ApiError;
use crate::models::{LoginRequest, LoginResponse};

/// `POST /merchant/login`. On success the response envelope is collapsed
/// into a [`Session`] ready for the store.
pub async fn login(client: &ApiClient, request: &LoginRequest) -> Result<Session, ApiError> {
    let response: LoginResponse = client.post_json(LOGIN_PATH, request).await?;
    Ok(session_from_response(response))
}

pub fn session_from_response(response: LoginResponse) -> Session {
    let data = response.payload.data;
    Session {
        user: data.admin,
        token: data.authorization.access_token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_envelope_collapses_into_a_session() {
        let body = r#"{
            "payload": {
                "data": {
                    "admin": {
                        "name": "A",
                        "email": "a@x.com",
                        "mobile": "1",
                        "status": "active",
                        "institute_details": {}
                    },
                    "authorization": {"access_token": "tok123"}
                }
            }
        }"#;
        let response: LoginResponse = serde_json::from_str(body).unwrap();
        let session = session_from_response(response);
        assert_eq!(session.token, "tok123");
        assert_eq!(session.user.name, "A");
    }
}
