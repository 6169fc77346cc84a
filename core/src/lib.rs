//! Client core for the library management API.
//!
//! # Overview
//! Validated submission to API call: a [`Schema`] turns raw form input into
//! a normalized payload, [`LibraryClient`] turns the payload into an
//! `HttpRequest` (host-does-IO), [`Library`] executes it over a
//! [`Transport`] with the bearer token from a [`CredentialProvider`], and
//! every failure surfaces as an [`ApiError`] with one user-facing message.
//!
//! # Design
//! - `LibraryClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit and the
//!   core can be driven by any HTTP stack.
//! - `Library` is the async driver over that boundary; `Form` adds the
//!   one-submission-at-a-time guard a form needs.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod credentials;
pub mod dates;
pub mod error;
pub mod form;
pub mod http;
pub mod library;
pub mod schema;
pub mod transport;
pub mod types;

pub use client::LibraryClient;
pub use config::ClientConfig;
pub use credentials::{CredentialProvider, MemoryCredentials};
pub use error::{ApiError, ApiResult};
pub use form::Form;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use library::Library;
pub use schema::{Schema, ValidationErrors};
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    Address, Availability, Book, BookFields, BookPatch, Created, LoginCredentials, Message, Phone,
    Rental, RentalFields, RentalPatch, TokenResponse, User, UserFields, UserPatch,
};
