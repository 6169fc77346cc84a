//! Async driver that runs `LibraryClient` operations over a `Transport`.
//!
//! # Design
//! `Library` composes the stateless client with an I/O seam and a
//! credential provider. Every operation except login and registration
//! attaches the bearer token read from the provider at call time. Each call
//! is a single request/response exchange: no retry, no session renewal.
//! Inputs are already-validated payload types, so nothing that failed
//! schema validation can reach the transport.

use std::sync::Arc;

use crate::client::LibraryClient;
use crate::config::ClientConfig;
use crate::credentials::{CredentialProvider, MemoryCredentials};
use crate::error::ApiResult;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{
    Availability, Book, BookFields, BookPatch, Created, LoginCredentials, Message, Rental,
    RentalFields, RentalPatch, TokenResponse, User, UserFields, UserPatch,
};

pub struct Library<T = ReqwestTransport> {
    client: LibraryClient,
    transport: T,
    credentials: Arc<dyn CredentialProvider>,
}

impl Library<ReqwestTransport> {
    /// reqwest transport and an empty in-memory token store.
    pub fn from_config(config: &ClientConfig) -> ApiResult<Self> {
        let transport = ReqwestTransport::with_timeout(config.timeout())?;
        Ok(Self::new(
            &config.api.base_url,
            transport,
            Arc::new(MemoryCredentials::new()),
        ))
    }
}

impl<T: Transport> Library<T> {
    pub fn new(base_url: &str, transport: T, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            client: LibraryClient::new(base_url),
            transport,
            credentials,
        }
    }

    pub fn client(&self) -> &LibraryClient {
        &self.client
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialProvider> {
        &self.credentials
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.token().is_some()
    }

    pub fn logout(&self) {
        self.credentials.clear();
        tracing::info!("logged out");
    }

    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        tracing::debug!(method = %request.method, path = %request.path, "sending request");
        let response = self.transport.execute(request).await?;
        tracing::debug!(status = response.status, "received response");
        Ok(response)
    }

    async fn send_authorized(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        let request = match self.credentials.token() {
            Some(token) => request.with_bearer(&token),
            None => {
                tracing::debug!(path = %request.path, "no bearer token available");
                request
            }
        };
        self.send(request).await
    }

    // -----------------------------------------------------------------------
    // Auth
    // -----------------------------------------------------------------------

    /// Exchange credentials for a token and store it for later calls.
    pub async fn login(&self, credentials: &LoginCredentials) -> ApiResult<TokenResponse> {
        let response = self.send(self.client.build_login(credentials)?).await?;
        let token = self.client.parse_login(response)?;
        self.credentials.set_token(token.access_token.clone());
        tracing::info!(username = %credentials.username, "logged in");
        Ok(token)
    }

    /// Register a new account. The returned token is stored like a login.
    pub async fn register(&self, user: &UserFields) -> ApiResult<TokenResponse> {
        let response = self.send(self.client.build_register(user)?).await?;
        let token = self.client.parse_register(response)?;
        self.credentials.set_token(token.access_token.clone());
        tracing::info!(username = %user.username, "registered");
        Ok(token)
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    pub async fn list_users(&self) -> ApiResult<Vec<User>> {
        let response = self.send_authorized(self.client.build_list_users()).await?;
        self.client.parse_list_users(response)
    }

    pub async fn get_user(&self, id: &str) -> ApiResult<User> {
        let response = self.send_authorized(self.client.build_get_user(id)).await?;
        self.client.parse_get_user(response)
    }

    pub async fn update_user(&self, id: &str, patch: &UserPatch) -> ApiResult<User> {
        let request = self.client.build_update_user(id, patch)?;
        let response = self.send_authorized(request).await?;
        self.client.parse_update_user(response)
    }

    pub async fn delete_user(&self, id: &str) -> ApiResult<Message> {
        let response = self.send_authorized(self.client.build_delete_user(id)).await?;
        self.client.parse_delete_user(response)
    }

    // -----------------------------------------------------------------------
    // Books
    // -----------------------------------------------------------------------

    pub async fn create_book(&self, book: &BookFields) -> ApiResult<Created<Book>> {
        let request = self.client.build_create_book(book)?;
        let response = self.send_authorized(request).await?;
        self.client.parse_create_book(response)
    }

    pub async fn list_books(&self) -> ApiResult<Vec<Book>> {
        let response = self.send_authorized(self.client.build_list_books()).await?;
        self.client.parse_list_books(response)
    }

    pub async fn get_book(&self, id: &str) -> ApiResult<Book> {
        let response = self.send_authorized(self.client.build_get_book(id)).await?;
        self.client.parse_get_book(response)
    }

    pub async fn update_book(&self, id: &str, patch: &BookPatch) -> ApiResult<Book> {
        let request = self.client.build_update_book(id, patch)?;
        let response = self.send_authorized(request).await?;
        self.client.parse_update_book(response)
    }

    pub async fn delete_book(&self, id: &str) -> ApiResult<Message> {
        let response = self.send_authorized(self.client.build_delete_book(id)).await?;
        self.client.parse_delete_book(response)
    }

    // -----------------------------------------------------------------------
    // Rentals
    // -----------------------------------------------------------------------

    pub async fn create_rental(&self, rental: &RentalFields) -> ApiResult<Created<Rental>> {
        let request = self.client.build_create_rental(rental)?;
        let response = self.send_authorized(request).await?;
        self.client.parse_create_rental(response)
    }

    pub async fn list_rentals(&self) -> ApiResult<Vec<Rental>> {
        let response = self.send_authorized(self.client.build_list_rentals()).await?;
        self.client.parse_list_rentals(response)
    }

    pub async fn get_rental(&self, id: &str) -> ApiResult<Rental> {
        let response = self.send_authorized(self.client.build_get_rental(id)).await?;
        self.client.parse_get_rental(response)
    }

    pub async fn list_rentals_by_user(&self, user: &str) -> ApiResult<Vec<Rental>> {
        let request = self.client.build_list_rentals_by_user(user);
        let response = self.send_authorized(request).await?;
        self.client.parse_list_rentals_by_user(response)
    }

    pub async fn list_rentals_by_book(&self, title: &str) -> ApiResult<Vec<Rental>> {
        let request = self.client.build_list_rentals_by_book(title);
        let response = self.send_authorized(request).await?;
        self.client.parse_list_rentals_by_book(response)
    }

    pub async fn check_availability(&self, title: &str) -> ApiResult<Availability> {
        let request = self.client.build_check_availability(title);
        let response = self.send_authorized(request).await?;
        self.client.parse_check_availability(response)
    }

    pub async fn update_rental(&self, id: &str, patch: &RentalPatch) -> ApiResult<Rental> {
        let request = self.client.build_update_rental(id, patch)?;
        let response = self.send_authorized(request).await?;
        self.client.parse_update_rental(response)
    }

    pub async fn delete_rental(&self, id: &str) -> ApiResult<Message> {
        let response = self.send_authorized(self.client.build_delete_rental(id)).await?;
        self.client.parse_delete_rental(response)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::ApiError;
    use crate::http::HttpMethod;
    use crate::schema::Schema;

    /// Records every request and answers from a script.
    #[derive(Default)]
    struct Scripted {
        requests: Mutex<Vec<HttpRequest>>,
        responses: Mutex<VecDeque<ApiResult<HttpResponse>>>,
    }

    impl Scripted {
        fn reply(self, status: u16, body: &str) -> Self {
            self.responses.lock().unwrap().push_back(Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            }));
            self
        }

        fn fail(self, message: &str) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push_back(Err(ApiError::Transport(message.to_string())));
            self
        }
    }

    #[async_trait]
    impl Transport for Scripted {
        async fn execute(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted response left")
        }
    }

    fn library(transport: Scripted, token: Option<&str>) -> Library<Scripted> {
        let credentials = match token {
            Some(token) => MemoryCredentials::with_token(token),
            None => MemoryCredentials::new(),
        };
        Library::new("http://api.test", transport, Arc::new(credentials))
    }

    fn sent(library: &Library<Scripted>) -> Vec<HttpRequest> {
        library.transport.requests.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn login_stores_token_and_skips_auth_header() {
        let lib = library(
            Scripted::default().reply(200, r#"{"access_token":"tok-1","token_type":"bearer"}"#),
            None,
        );
        let creds = LoginCredentials {
            username: "alice".to_string(),
            password: "secret".to_string(),
        };
        let token = lib.login(&creds).await.unwrap();
        assert_eq!(token.access_token, "tok-1");
        assert_eq!(token.token_type, "bearer");
        assert!(lib.is_authenticated());
        assert_eq!(lib.credentials().token().as_deref(), Some("tok-1"));

        let requests = sent(&lib);
        assert_eq!(requests[0].path, "http://api.test/api/auth/login");
        assert!(requests[0].header("authorization").is_none());
    }

    #[tokio::test]
    async fn failed_login_surfaces_detail_and_keeps_store_empty() {
        let lib = library(
            Scripted::default().reply(401, r#"{"detail":"Invalid credentials"}"#),
            None,
        );
        let creds = LoginCredentials {
            username: "alice".to_string(),
            password: "wrong".to_string(),
        };
        let err = lib.login(&creds).await.unwrap_err();
        assert_eq!(err.message(), "Invalid credentials");
        assert!(!lib.is_authenticated());
    }

    #[tokio::test]
    async fn authenticated_calls_read_the_token_at_call_time() {
        let lib = library(Scripted::default().reply(200, "[]").reply(200, "[]"), None);
        lib.list_books().await.unwrap();
        lib.credentials().set_token("late".to_string());
        lib.list_books().await.unwrap();

        let requests = sent(&lib);
        assert!(requests[0].header("authorization").is_none());
        assert_eq!(requests[1].header("authorization"), Some("Bearer late"));
    }

    #[tokio::test]
    async fn every_entity_operation_is_authorized() {
        let mut script = Scripted::default();
        for _ in 0..4 {
            script = script.reply(200, "[]");
        }
        let lib = library(script, Some("t"));
        lib.list_users().await.unwrap();
        lib.list_rentals().await.unwrap();
        lib.list_rentals_by_user("u1").await.unwrap();
        lib.list_rentals_by_book("the hobbit").await.unwrap();

        for request in sent(&lib) {
            assert_eq!(request.header("authorization"), Some("Bearer t"));
            assert_eq!(request.method, HttpMethod::Get);
        }
    }

    #[tokio::test]
    async fn transport_failure_is_a_single_message() {
        let lib = library(Scripted::default().fail("connection refused"), Some("t"));
        let err = lib.get_book("b1").await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(err.message(), "transport error: connection refused");
    }

    #[tokio::test]
    async fn register_stores_token() {
        let lib = library(
            Scripted::default().reply(201, r#"{"access_token":"new","token_type":"bearer"}"#),
            None,
        );
        let user = UserFields::validate(&serde_json::json!({
            "username": "bob", "password": "pw", "name": "Bob", "surname": "B",
            "email": "bob@example.com",
            "address": { "area": "a", "road": "r" },
            "phone": { "type": "home", "number": "1" }
        }))
        .unwrap();
        lib.register(&user).await.unwrap();
        assert_eq!(lib.credentials().token().as_deref(), Some("new"));
        assert!(sent(&lib)[0].header("authorization").is_none());

        lib.logout();
        assert!(!lib.is_authenticated());
    }

    #[tokio::test]
    async fn from_config_talks_to_configured_backend() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(mock_server::run(listener));

        let env = std::collections::HashMap::from([
            ("LIBRARY_API__BASE_URL".to_string(), format!("http://{addr}/")),
            ("LIBRARY_API__TIMEOUT_SECS".to_string(), "5".to_string()),
        ]);
        let config = ClientConfig::build("test", Some(env), None).unwrap();
        assert_eq!(config.timeout(), Some(std::time::Duration::from_secs(5)));

        let lib = Library::from_config(&config).unwrap();
        assert_eq!(lib.client().base_url(), format!("http://{addr}"));
        assert!(!lib.is_authenticated());

        let err = lib.list_books().await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.message(), "Not authenticated");
    }
}

