use serde_json::Value;

use super::rules::{Count, Date, Text};
use super::{Schema, ValidationErrors, Validator};
use crate::types::{BookFields, BookPatch};

const TITLE: Text = Text::required("Title is required")
    .max(50, "Title must be less than 50 characters")
    .folded();
const AUTHOR: Text = Text::required("Author is required")
    .max(30, "Author must be less than 30 characters")
    .folded();
const ISBN: Text = Text::required("ISBN is required").max(20, "ISBN must be less than 20 characters");
const PUBLISHED_DATE: Date =
    Date::required("Published date is required").invalid("Published date must be a valid date");
const QUANTITY: Count = Count::required("Quantity is required")
    .number("Quantity must be a number")
    .non_negative("Quantity must be a positive number")
    .integer("Quantity must be an integer");
const AVAILABILITY: Count = Count::required("Availability is required")
    .number("Availability must be a number")
    .non_negative("Availability must be a positive number")
    .integer("Availability must be an integer");

const AVAILABILITY_EXCEEDS_QUANTITY: &str = "Availability cannot exceed quantity";

impl Schema for BookFields {
    fn validate(raw: &Value) -> Result<Self, ValidationErrors> {
        let mut v = Validator::new(raw);
        let title = v.field("title", &TITLE);
        let author = v.field("author", &AUTHOR);
        let isbn = v.field("isbn", &ISBN);
        let published_date = v.field("publishedDate", &PUBLISHED_DATE);
        let quantity = v.field("quantity", &QUANTITY);
        let availability = v.field("availability", &AVAILABILITY);

        if let (Some(quantity), Some(availability)) = (quantity, availability) {
            if availability > quantity {
                v.reject("availability", AVAILABILITY_EXCEEDS_QUANTITY);
            }
        }

        match (title, author, isbn, published_date, quantity, availability) {
            (
                Some(title),
                Some(author),
                Some(isbn),
                Some(published_date),
                Some(quantity),
                Some(availability),
            ) if v.is_clean() => Ok(BookFields {
                title,
                author,
                isbn,
                published_date,
                quantity,
                availability,
            }),
            _ => Err(v.into_errors()),
        }
    }
}

impl Schema for BookPatch {
    /// Validates only the fields present. The stock invariant is checked when
    /// both counts are part of the same patch; the backend owns the rest.
    fn validate(raw: &Value) -> Result<Self, ValidationErrors> {
        let mut v = Validator::new(raw);
        let patch = BookPatch {
            title: v.present("title", &TITLE),
            author: v.present("author", &AUTHOR),
            isbn: v.present("isbn", &ISBN),
            published_date: v.present("publishedDate", &PUBLISHED_DATE),
            quantity: v.present("quantity", &QUANTITY),
            availability: v.present("availability", &AVAILABILITY),
        };

        if let (Some(quantity), Some(availability)) = (patch.quantity, patch.availability) {
            if availability > quantity {
                v.reject("availability", AVAILABILITY_EXCEEDS_QUANTITY);
            }
        }

        if v.is_clean() {
            Ok(patch)
        } else {
            Err(v.into_errors())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn hobbit() -> Value {
        json!({
            "title": " The Hobbit ",
            "author": "J. Tolkien",
            "isbn": "123",
            "publishedDate": "1937-09-21",
            "quantity": 5,
            "availability": 5
        })
    }

    #[test]
    fn normalizes_title_and_author() {
        let book = BookFields::validate(&hobbit()).unwrap();
        assert_eq!(book.title, "the hobbit");
        assert_eq!(book.author, "j. tolkien");
        assert_eq!(book.isbn, "123");
        assert_eq!(book.published_date, NaiveDate::from_ymd_opt(1937, 9, 21).unwrap());
        assert_eq!(book.quantity, 5);
        assert_eq!(book.availability, 5);
    }

    #[test]
    fn coerces_numeric_strings_from_text_inputs() {
        let mut raw = hobbit();
        raw["quantity"] = json!("7");
        raw["availability"] = json!("2");
        let book = BookFields::validate(&raw).unwrap();
        assert_eq!(book.quantity, 7);
        assert_eq!(book.availability, 2);
    }

    #[test]
    fn empty_title_reports_only_title() {
        let mut raw = hobbit();
        raw["title"] = json!("");
        let errors = BookFields::validate(&raw).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("title"), Some("Title is required"));
    }

    #[test]
    fn length_bounds() {
        let mut raw = hobbit();
        raw["title"] = json!("x".repeat(51));
        raw["author"] = json!("y".repeat(31));
        raw["isbn"] = json!("1".repeat(21));
        let errors = BookFields::validate(&raw).unwrap_err();
        assert_eq!(errors.get("title"), Some("Title must be less than 50 characters"));
        assert_eq!(errors.get("author"), Some("Author must be less than 30 characters"));
        assert_eq!(errors.get("isbn"), Some("ISBN must be less than 20 characters"));
    }

    #[test]
    fn fifty_character_title_is_accepted() {
        let mut raw = hobbit();
        raw["title"] = json!("x".repeat(50));
        assert!(BookFields::validate(&raw).is_ok());
    }

    #[test]
    fn negative_and_fractional_counts() {
        let mut raw = hobbit();
        raw["quantity"] = json!(-1);
        raw["availability"] = json!(1.5);
        let errors = BookFields::validate(&raw).unwrap_err();
        assert_eq!(errors.get("quantity"), Some("Quantity must be a positive number"));
        assert_eq!(errors.get("availability"), Some("Availability must be an integer"));
    }

    #[test]
    fn availability_cannot_exceed_quantity() {
        let mut raw = hobbit();
        raw["availability"] = json!(6);
        let errors = BookFields::validate(&raw).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("availability"), Some(AVAILABILITY_EXCEEDS_QUANTITY));
    }

    #[test]
    fn unparseable_date() {
        let mut raw = hobbit();
        raw["publishedDate"] = json!("sometime in 1937");
        let errors = BookFields::validate(&raw).unwrap_err();
        assert_eq!(errors.get("publishedDate"), Some("Published date must be a valid date"));
    }

    #[test]
    fn every_missing_field_is_reported() {
        let errors = BookFields::validate(&json!({})).unwrap_err();
        assert_eq!(errors.len(), 6);
        assert_eq!(errors.get("quantity"), Some("Quantity is required"));
    }

    #[test]
    fn patch_only_checks_present_fields() {
        let patch = BookPatch::validate(&json!({ "title": "  Dune ", "quantity": "3" })).unwrap();
        assert_eq!(patch.title.as_deref(), Some("dune"));
        assert_eq!(patch.quantity, Some(3));
        assert!(patch.author.is_none());
        assert!(patch.availability.is_none());
    }

    #[test]
    fn patch_rejects_invalid_present_field() {
        let errors = BookPatch::validate(&json!({ "title": "" })).unwrap_err();
        assert_eq!(errors.get("title"), Some("Title is required"));
    }

    #[test]
    fn patch_checks_stock_invariant_when_both_counts_present() {
        let errors =
            BookPatch::validate(&json!({ "quantity": 1, "availability": 2 })).unwrap_err();
        assert!(errors.contains("availability"));
    }
}
