use super::{parse_json, LibraryClient};
use crate::error::ApiResult;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{LoginCredentials, TokenResponse, UserFields};

const LOGIN_FAILED: &str = "Login Failed.";
const REGISTER_FAILED: &str = "Create user failed.";

impl LibraryClient {
    /// `POST /api/auth/login`. Unauthenticated.
    pub fn build_login(&self, credentials: &LoginCredentials) -> ApiResult<HttpRequest> {
        self.json_request(HttpMethod::Post, "/api/auth/login", credentials)
    }

    pub fn parse_login(&self, response: HttpResponse) -> ApiResult<TokenResponse> {
        parse_json(response, LOGIN_FAILED)
    }

    /// `POST /api/auth/user`. Unauthenticated; answers with a token like login.
    pub fn build_register(&self, user: &UserFields) -> ApiResult<HttpRequest> {
        self.json_request(HttpMethod::Post, "/api/auth/user", user)
    }

    pub fn parse_register(&self, response: HttpResponse) -> ApiResult<TokenResponse> {
        parse_json(response, REGISTER_FAILED)
    }
}

#[cfg(test)]
mod tests {
    use crate::client::tests::{client, response};
    use crate::error::ApiError;
    use crate::http::HttpMethod;
    use crate::types::LoginCredentials;

    fn alice() -> LoginCredentials {
        LoginCredentials {
            username: "alice".to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn build_login_posts_credentials_without_auth() {
        let req = client().build_login(&alice()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8000/api/auth/login");
        assert!(req.header("authorization").is_none());
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({ "username": "alice", "password": "secret" }));
    }

    #[test]
    fn parse_login_success() {
        let token = client()
            .parse_login(response(200, r#"{"access_token":"tok","token_type":"bearer"}"#))
            .unwrap();
        assert_eq!(token.access_token, "tok");
        assert_eq!(token.token_type, "bearer");
    }

    #[test]
    fn parse_login_invalid_credentials() {
        let err = client()
            .parse_login(response(401, r#"{"detail":"Invalid credentials"}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::Request { status: 401, .. }));
        assert_eq!(err.message(), "Invalid credentials");
    }

    #[test]
    fn parse_login_without_detail_uses_default() {
        let err = client().parse_login(response(500, "{}")).unwrap_err();
        assert_eq!(err.message(), "Login Failed.");
    }

    #[test]
    fn parse_register_default_message() {
        let err = client().parse_register(response(400, "nope")).unwrap_err();
        assert_eq!(err.message(), "Create user failed.");
    }
}
