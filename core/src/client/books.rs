use super::{parse_json, segment, LibraryClient};
use crate::error::ApiResult;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Book, BookFields, BookPatch, Created, Message};

const CREATE_FAILED: &str = "Create book failed.";
const LIST_FAILED: &str = "Fetch books failed.";
const GET_FAILED: &str = "Fetch book failed.";
const UPDATE_FAILED: &str = "Update book failed.";
const DELETE_FAILED: &str = "Delete book failed.";

impl LibraryClient {
    pub fn build_create_book(&self, book: &BookFields) -> ApiResult<HttpRequest> {
        self.json_request(HttpMethod::Post, "/api/books", book)
    }

    pub fn parse_create_book(&self, response: HttpResponse) -> ApiResult<Created<Book>> {
        parse_json(response, CREATE_FAILED)
    }

    pub fn build_list_books(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/api/books")
    }

    pub fn parse_list_books(&self, response: HttpResponse) -> ApiResult<Vec<Book>> {
        parse_json(response, LIST_FAILED)
    }

    pub fn build_get_book(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/api/books/{}", segment(id)))
    }

    pub fn parse_get_book(&self, response: HttpResponse) -> ApiResult<Book> {
        parse_json(response, GET_FAILED)
    }

    pub fn build_update_book(&self, id: &str, patch: &BookPatch) -> ApiResult<HttpRequest> {
        self.json_request(HttpMethod::Put, &format!("/api/books/{}", segment(id)), patch)
    }

    pub fn parse_update_book(&self, response: HttpResponse) -> ApiResult<Book> {
        parse_json(response, UPDATE_FAILED)
    }

    pub fn build_delete_book(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/api/books/{}", segment(id)))
    }

    pub fn parse_delete_book(&self, response: HttpResponse) -> ApiResult<Message> {
        parse_json(response, DELETE_FAILED)
    }
}
