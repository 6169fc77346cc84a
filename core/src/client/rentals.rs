use super::{parse_json, segment, LibraryClient};
use crate::error::ApiResult;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Availability, Created, Message, Rental, RentalFields, RentalPatch};

const CREATE_FAILED: &str = "Create rental failed.";
const LIST_FAILED: &str = "Fetch rentals failed.";
const GET_FAILED: &str = "Fetch rental failed.";
const BY_USER_FAILED: &str = "Fetch user rentals failed.";
const BY_BOOK_FAILED: &str = "Fetch book rentals failed.";
const AVAILABILITY_FAILED: &str = "Check availability failed.";
const UPDATE_FAILED: &str = "Update rental failed.";
const DELETE_FAILED: &str = "Delete rental failed.";

impl LibraryClient {
    pub fn build_create_rental(&self, rental: &RentalFields) -> ApiResult<HttpRequest> {
        self.json_request(HttpMethod::Post, "/api/rentals", rental)
    }

    pub fn parse_create_rental(&self, response: HttpResponse) -> ApiResult<Created<Rental>> {
        parse_json(response, CREATE_FAILED)
    }

    pub fn build_list_rentals(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/api/rentals")
    }

    pub fn parse_list_rentals(&self, response: HttpResponse) -> ApiResult<Vec<Rental>> {
        parse_json(response, LIST_FAILED)
    }

    pub fn build_get_rental(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/api/rentals/{}", segment(id)))
    }

    pub fn parse_get_rental(&self, response: HttpResponse) -> ApiResult<Rental> {
        parse_json(response, GET_FAILED)
    }

    /// `user` is either a user id or the name recorded on the rental.
    pub fn build_list_rentals_by_user(&self, user: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/api/rentals/user/{}", segment(user)))
    }

    pub fn parse_list_rentals_by_user(&self, response: HttpResponse) -> ApiResult<Vec<Rental>> {
        parse_json(response, BY_USER_FAILED)
    }

    pub fn build_list_rentals_by_book(&self, title: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/api/rentals/book/{}", segment(title)))
    }

    pub fn parse_list_rentals_by_book(&self, response: HttpResponse) -> ApiResult<Vec<Rental>> {
        parse_json(response, BY_BOOK_FAILED)
    }

    pub fn build_check_availability(&self, title: &str) -> HttpRequest {
        self.request(
            HttpMethod::Get,
            &format!("/api/rentals/availability/{}", segment(title)),
        )
    }

    pub fn parse_check_availability(&self, response: HttpResponse) -> ApiResult<Availability> {
        parse_json(response, AVAILABILITY_FAILED)
    }

    pub fn build_update_rental(&self, id: &str, patch: &RentalPatch) -> ApiResult<HttpRequest> {
        self.json_request(HttpMethod::Put, &format!("/api/rentals/{}", segment(id)), patch)
    }

    pub fn parse_update_rental(&self, response: HttpResponse) -> ApiResult<Rental> {
        parse_json(response, UPDATE_FAILED)
    }

    pub fn build_delete_rental(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/api/rentals/{}", segment(id)))
    }

    pub fn parse_delete_rental(&self, response: HttpResponse) -> ApiResult<Message> {
        parse_json(response, DELETE_FAILED)
    }
}
