use super::{parse_json, segment, LibraryClient};
use crate::error::ApiResult;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Message, User, UserPatch};

const LIST_FAILED: &str = "Fetch users failed.";
const GET_FAILED: &str = "Fetch user failed.";
const UPDATE_FAILED: &str = "Update user failed.";
const DELETE_FAILED: &str = "Delete user failed.";

impl LibraryClient {
    pub fn build_list_users(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/api/auth/users")
    }

    pub fn parse_list_users(&self, response: HttpResponse) -> ApiResult<Vec<User>> {
        parse_json(response, LIST_FAILED)
    }

    pub fn build_get_user(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/api/auth/users/{}", segment(id)))
    }

    pub fn parse_get_user(&self, response: HttpResponse) -> ApiResult<User> {
        parse_json(response, GET_FAILED)
    }

    pub fn build_update_user(&self, id: &str, patch: &UserPatch) -> ApiResult<HttpRequest> {
        self.json_request(
            HttpMethod::Put,
            &format!("/api/auth/users/{}", segment(id)),
            patch,
        )
    }

    pub fn parse_update_user(&self, response: HttpResponse) -> ApiResult<User> {
        parse_json(response, UPDATE_FAILED)
    }

    pub fn build_delete_user(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/api/auth/users/{}", segment(id)))
    }

    pub fn parse_delete_user(&self, response: HttpResponse) -> ApiResult<Message> {
        parse_json(response, DELETE_FAILED)
    }
}

#[cfg(test)]
mod tests {
    use crate::client::tests::{client, response};
    use crate::http::HttpMethod;
    use crate::types::UserPatch;

    #[test]
    fn build_list_users() {
        let req = client().build_list_users();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8000/api/auth/users");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_update_user_sends_only_changed_fields() {
        let patch = UserPatch {
            email: Some("new@example.com".to_string()),
            ..Default::default()
        };
        let req = client().build_update_user("u1", &patch).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:8000/api/auth/users/u1");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({ "email": "new@example.com" }));
    }

    #[test]
    fn parse_list_users_keeps_server_order() {
        let body = r#"[
            {"id":"2","username":"zed","name":"Z","surname":"Z","email":"z@x.io"},
            {"id":"1","username":"amy","name":"A","surname":"A","email":"a@x.io"}
        ]"#;
        let users = client().parse_list_users(response(200, body)).unwrap();
        let ids: Vec<_> = users.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, ["2", "1"]);
    }

    #[test]
    fn malformed_failure_body_uses_fetch_users_default() {
        let err = client().parse_list_users(response(503, "Service Unavailable")).unwrap_err();
        assert_eq!(err.message(), "Fetch users failed.");
    }

    #[test]
    fn parse_delete_user_returns_confirmation() {
        let msg = client()
            .parse_delete_user(response(200, r#"{"message":"User deleted"}"#))
            .unwrap();
        assert_eq!(msg.message, "User deleted");
    }

    #[test]
    fn parse_get_user_not_found() {
        let err = client()
            .parse_get_user(response(404, r#"{"detail":"User not found"}"#))
            .unwrap_err();
        assert_eq!(err.message(), "User not found");
    }
}
