//! In-memory stand-in for the library backend.
//!
//! Serves the same routes and JSON shapes as the real API so the client core
//! can be exercised end-to-end. Records live in insertion-ordered vectors;
//! errors are `{"detail": "..."}` bodies; tokens are opaque UUID strings.

pub mod config;

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Path, State},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub area: String,
    pub road: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Phone {
    #[serde(rename = "type")]
    pub kind: String,
    pub number: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub address: Option<Address>,
    pub phone: Option<Phone>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_date: String,
    pub quantity: u32,
    pub availability: u32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    pub id: String,
    pub user: String,
    pub title: String,
    pub rental_from: String,
    pub rental_to: String,
    pub created_at: String,
    pub updated_at: String,
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub password: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub address: Option<Address>,
    pub phone: Option<Phone>,
}

#[derive(Deserialize)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub address: Option<Address>,
    pub phone: Option<Phone>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_date: String,
    pub quantity: u32,
    pub availability: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub published_date: Option<String>,
    pub quantity: Option<u32>,
    pub availability: Option<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRental {
    pub user: String,
    pub title: String,
    pub rental_from: String,
    pub rental_to: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRental {
    pub user: Option<String>,
    pub title: Option<String>,
    pub rental_from: Option<String>,
    pub rental_to: Option<String>,
}

#[derive(Serialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct Store {
    users: Vec<User>,
    books: Vec<Book>,
    rentals: Vec<Rental>,
    /// token -> user id
    tokens: Vec<(String, String)>,
}

impl Store {
    fn issue_token(&mut self, user_id: &str) -> Token {
        let token = Uuid::new_v4().to_string();
        self.tokens.push((token.clone(), user_id.to_string()));
        Token {
            access_token: token,
            token_type: "bearer".to_string(),
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn new(status: StatusCode, detail: &str) -> Self {
        Self {
            status,
            detail: detail.to_string(),
        }
    }

    fn not_found(what: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, &format!("{what} not found"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Extractor that rejects requests without a token issued by this server.
pub struct Authenticated {
    pub user_id: String,
}

impl FromRequestParts<Db> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, db: &Db) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, "Not authenticated"))?;
        let store = db.read().await;
        store
            .tokens
            .iter()
            .find(|(issued, _)| issued == token)
            .map(|(_, user_id)| Authenticated {
                user_id: user_id.clone(),
            })
            .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, "Could not validate credentials"))
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/user", post(register))
        .route("/api/auth/users", get(list_users))
        .route(
            "/api/auth/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/api/books", get(list_books).post(create_book))
        .route(
            "/api/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .route("/api/rentals", get(list_rentals).post(create_rental))
        .route(
            "/api/rentals/{id}",
            get(get_rental).put(update_rental).delete(delete_rental),
        )
        .route("/api/rentals/user/{user}", get(rentals_by_user))
        .route("/api/rentals/book/{title}", get(rentals_by_book))
        .route("/api/rentals/availability/{title}", get(availability))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

async fn login(State(db): State<Db>, Json(input): Json<LoginInput>) -> ApiResult<Json<Token>> {
    let mut store = db.write().await;
    let user_id = store
        .users
        .iter()
        .find(|u| u.username == input.username && u.password == input.password)
        .map(|u| u.id.clone())
        .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, "Invalid credentials"))?;
    Ok(Json(store.issue_token(&user_id)))
}

async fn register(
    State(db): State<Db>,
    Json(input): Json<CreateUser>,
) -> ApiResult<(StatusCode, Json<Token>)> {
    let mut store = db.write().await;
    if store.users.iter().any(|u| u.username == input.username) {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Username already registered"));
    }
    let stamp = now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        username: input.username,
        password: input.password,
        name: input.name,
        surname: input.surname,
        email: input.email,
        address: input.address,
        phone: input.phone,
        created_at: stamp.clone(),
        updated_at: stamp,
    };
    let token = store.issue_token(&user.id);
    tracing::info!(username = %user.username, "registered user");
    store.users.push(user);
    Ok((StatusCode::CREATED, Json(token)))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

async fn list_users(_auth: Authenticated, State(db): State<Db>) -> Json<Vec<User>> {
    Json(db.read().await.users.clone())
}

async fn get_user(
    _auth: Authenticated,
    State(db): State<Db>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    let store = db.read().await;
    store
        .users
        .iter()
        .find(|u| u.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User"))
}

async fn update_user(
    _auth: Authenticated,
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<UpdateUser>,
) -> ApiResult<Json<User>> {
    let mut store = db.write().await;
    let user = store
        .users
        .iter_mut()
        .find(|u| u.id == id)
        .ok_or_else(|| ApiError::not_found("User"))?;
    if let Some(username) = input.username {
        user.username = username;
    }
    if let Some(password) = input.password {
        user.password = password;
    }
    if let Some(name) = input.name {
        user.name = name;
    }
    if let Some(surname) = input.surname {
        user.surname = surname;
    }
    if let Some(email) = input.email {
        user.email = email;
    }
    if input.address.is_some() {
        user.address = input.address;
    }
    if input.phone.is_some() {
        user.phone = input.phone;
    }
    user.updated_at = now();
    Ok(Json(user.clone()))
}

async fn delete_user(
    _auth: Authenticated,
    State(db): State<Db>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let mut store = db.write().await;
    let before = store.users.len();
    store.users.retain(|u| u.id != id);
    if store.users.len() == before {
        return Err(ApiError::not_found("User"));
    }
    store.tokens.retain(|(_, user_id)| *user_id != id);
    Ok(Json(json!({ "message": "User deleted" })))
}

// ---------------------------------------------------------------------------
// Books
// ---------------------------------------------------------------------------

async fn list_books(_auth: Authenticated, State(db): State<Db>) -> Json<Vec<Book>> {
    Json(db.read().await.books.clone())
}

async fn create_book(
    _auth: Authenticated,
    State(db): State<Db>,
    Json(input): Json<CreateBook>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    if input.availability > input.quantity {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "Availability cannot exceed quantity",
        ));
    }
    let stamp = now();
    let book = Book {
        id: Uuid::new_v4().to_string(),
        title: input.title,
        author: input.author,
        isbn: input.isbn,
        published_date: input.published_date,
        quantity: input.quantity,
        availability: input.availability,
        created_at: stamp.clone(),
        updated_at: stamp,
    };
    db.write().await.books.push(book.clone());
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Book created", "data": book })),
    ))
}

async fn get_book(
    _auth: Authenticated,
    State(db): State<Db>,
    Path(id): Path<String>,
) -> ApiResult<Json<Book>> {
    let store = db.read().await;
    store
        .books
        .iter()
        .find(|b| b.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Book"))
}

async fn update_book(
    _auth: Authenticated,
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<UpdateBook>,
) -> ApiResult<Json<Book>> {
    let mut store = db.write().await;
    let book = store
        .books
        .iter_mut()
        .find(|b| b.id == id)
        .ok_or_else(|| ApiError::not_found("Book"))?;
    let quantity = input.quantity.unwrap_or(book.quantity);
    let availability = input.availability.unwrap_or(book.availability);
    if availability > quantity {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "Availability cannot exceed quantity",
        ));
    }
    if let Some(title) = input.title {
        book.title = title;
    }
    if let Some(author) = input.author {
        book.author = author;
    }
    if let Some(isbn) = input.isbn {
        book.isbn = isbn;
    }
    if let Some(published_date) = input.published_date {
        book.published_date = published_date;
    }
    book.quantity = quantity;
    book.availability = availability;
    book.updated_at = now();
    Ok(Json(book.clone()))
}

async fn delete_book(
    _auth: Authenticated,
    State(db): State<Db>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let mut store = db.write().await;
    let before = store.books.len();
    store.books.retain(|b| b.id != id);
    if store.books.len() == before {
        return Err(ApiError::not_found("Book"));
    }
    Ok(Json(json!({ "message": "Book deleted" })))
}

// ---------------------------------------------------------------------------
// Rentals
// ---------------------------------------------------------------------------

async fn list_rentals(_auth: Authenticated, State(db): State<Db>) -> Json<Vec<Rental>> {
    Json(db.read().await.rentals.clone())
}

/// Renting takes one copy off the shelf; the book must exist and have stock.
async fn create_rental(
    _auth: Authenticated,
    State(db): State<Db>,
    Json(input): Json<CreateRental>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let mut store = db.write().await;
    let book = store
        .books
        .iter_mut()
        .find(|b| b.title == input.title)
        .ok_or_else(|| ApiError::not_found("Book"))?;
    if book.availability == 0 {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Book is not available"));
    }
    book.availability -= 1;
    let stamp = now();
    let rental = Rental {
        id: Uuid::new_v4().to_string(),
        user: input.user,
        title: input.title,
        rental_from: input.rental_from,
        rental_to: input.rental_to,
        created_at: stamp.clone(),
        updated_at: stamp,
    };
    store.rentals.push(rental.clone());
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Rental created", "data": rental })),
    ))
}

async fn get_rental(
    _auth: Authenticated,
    State(db): State<Db>,
    Path(id): Path<String>,
) -> ApiResult<Json<Rental>> {
    let store = db.read().await;
    store
        .rentals
        .iter()
        .find(|r| r.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Rental"))
}

/// `user` may be a user id or the name recorded on the rental.
async fn rentals_by_user(
    _auth: Authenticated,
    State(db): State<Db>,
    Path(user): Path<String>,
) -> Json<Vec<Rental>> {
    let store = db.read().await;
    let username = store
        .users
        .iter()
        .find(|u| u.id == user)
        .map(|u| u.username.as_str());
    Json(
        store
            .rentals
            .iter()
            .filter(|r| r.user == user || Some(r.user.as_str()) == username)
            .cloned()
            .collect(),
    )
}

async fn rentals_by_book(
    _auth: Authenticated,
    State(db): State<Db>,
    Path(title): Path<String>,
) -> Json<Vec<Rental>> {
    let store = db.read().await;
    Json(
        store
            .rentals
            .iter()
            .filter(|r| r.title == title)
            .cloned()
            .collect(),
    )
}

async fn availability(
    _auth: Authenticated,
    State(db): State<Db>,
    Path(title): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let store = db.read().await;
    let book = store
        .books
        .iter()
        .find(|b| b.title == title)
        .ok_or_else(|| ApiError::not_found("Book"))?;
    let rentals: Vec<Rental> = store
        .rentals
        .iter()
        .filter(|r| r.title == title)
        .cloned()
        .collect();
    Ok(Json(json!({
        "available": book.availability > 0,
        "rentals": rentals,
    })))
}

async fn update_rental(
    _auth: Authenticated,
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<UpdateRental>,
) -> ApiResult<Json<Rental>> {
    let mut store = db.write().await;
    let rental = store
        .rentals
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| ApiError::not_found("Rental"))?;
    if let Some(user) = input.user {
        rental.user = user;
    }
    if let Some(title) = input.title {
        rental.title = title;
    }
    if let Some(rental_from) = input.rental_from {
        rental.rental_from = rental_from;
    }
    if let Some(rental_to) = input.rental_to {
        rental.rental_to = rental_to;
    }
    rental.updated_at = now();
    Ok(Json(rental.clone()))
}

/// Returning a rental puts the copy back on the shelf.
async fn delete_rental(
    _auth: Authenticated,
    State(db): State<Db>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let mut store = db.write().await;
    let index = store
        .rentals
        .iter()
        .position(|r| r.id == id)
        .ok_or_else(|| ApiError::not_found("Rental"))?;
    let rental = store.rentals.remove(index);
    if let Some(book) = store.books.iter_mut().find(|b| b.title == rental.title) {
        book.availability = (book.availability + 1).min(book.quantity);
    }
    Ok(Json(json!({ "message": "Rental deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_password_is_never_serialized() {
        let user = User {
            id: "u1".to_string(),
            username: "alice".to_string(),
            password: "secret".to_string(),
            name: "Alice".to_string(),
            surname: "Liddell".to_string(),
            email: "alice@example.com".to_string(),
            address: None,
            phone: None,
            created_at: now(),
            updated_at: now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "alice");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn book_serializes_camel_case() {
        let book = Book {
            id: "b1".to_string(),
            title: "the hobbit".to_string(),
            author: "j. tolkien".to_string(),
            isbn: "123".to_string(),
            published_date: "1937-09-21".to_string(),
            quantity: 5,
            availability: 5,
            created_at: now(),
            updated_at: now(),
        };
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["publishedDate"], "1937-09-21");
        assert!(json.get("published_date").is_none());
    }

    #[test]
    fn update_book_all_fields_optional() {
        let input: UpdateBook = serde_json::from_str("{}").unwrap();
        assert!(input.title.is_none());
        assert!(input.quantity.is_none());
    }

    #[test]
    fn create_rental_rejects_missing_dates() {
        let result: Result<CreateRental, _> =
            serde_json::from_str(r#"{"user":"alice","title":"the hobbit"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn issued_tokens_are_bearer() {
        let mut store = Store::default();
        let token = store.issue_token("u1");
        assert_eq!(token.token_type, "bearer");
        assert_eq!(store.tokens.len(), 1);
    }

    #[test]
    fn error_body_carries_detail() {
        let err = ApiError::not_found("Book");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.detail, "Book not found");
    }
}
