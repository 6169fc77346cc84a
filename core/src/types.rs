//! Domain DTOs for the library API.
//!
//! # Design
//! Two families of types live here. `*Fields` / `*Patch` / `LoginCredentials`
//! are validated payloads: the only way to obtain one from user input is
//! through [`crate::schema::Schema::validate`]. The remaining types mirror
//! records the backend returns. They are defined independently from the
//! mock-server crate; integration tests catch schema drift.
//!
//! Wire names are camelCase except the token response, which the backend
//! emits in snake_case.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Username/password pair for `POST /api/auth/login`. Transient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub area: String,
    pub road: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    #[serde(rename = "type")]
    pub kind: String,
    pub number: String,
}

/// Registration payload for `POST /api/auth/user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserFields {
    pub username: String,
    pub password: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub address: Address,
    pub phone: Phone,
}

/// Partial user update. Only the fields present are serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Phone>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_date: NaiveDate,
    pub quantity: u32,
    pub availability: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalFields {
    pub user: String,
    pub title: String,
    pub rental_from: NaiveDate,
    pub rental_to: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rental_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rental_to: Option<NaiveDate>,
}

/// Returned by login and registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// A user record as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub name: String,
    pub surname: String,
    pub email: String,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub phone: Option<Phone>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// A book record as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    pub author: String,
    pub isbn: String,
    #[serde(deserialize_with = "crate::dates::deserialize")]
    pub published_date: NaiveDate,
    pub quantity: u32,
    pub availability: u32,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Book {
    /// The user-supplied part of the record, without id and timestamps.
    pub fn fields(&self) -> BookFields {
        BookFields {
            title: self.title.clone(),
            author: self.author.clone(),
            isbn: self.isbn.clone(),
            published_date: self.published_date,
            quantity: self.quantity,
            availability: self.availability,
        }
    }
}

/// A rental record as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    #[serde(alias = "_id")]
    pub id: String,
    pub user: String,
    pub title: String,
    #[serde(deserialize_with = "crate::dates::deserialize")]
    pub rental_from: NaiveDate,
    #[serde(deserialize_with = "crate::dates::deserialize")]
    pub rental_to: NaiveDate,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Rental {
    pub fn fields(&self) -> RentalFields {
        RentalFields {
            user: self.user.clone(),
            title: self.title.clone(),
            rental_from: self.rental_from,
            rental_to: self.rental_to,
        }
    }
}

/// Create responses wrap the stored record with a confirmation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created<T> {
    pub message: Option<String>,
    pub data: Option<T>,
}

/// Confirmation body returned by delete operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

/// Result of `GET /api/rentals/availability/:title`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub available: bool,
    pub rentals: Vec<Rental>,
}
