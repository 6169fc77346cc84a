use serde_json::Value;

use super::rules::{Date, Text};
use super::{Schema, ValidationErrors, Validator};
use crate::types::{RentalFields, RentalPatch};

const USER: Text = Text::required("User is required")
    .max(50, "User must be less than 50 characters")
    .folded();
const TITLE: Text = Text::required("Title is required")
    .max(30, "Title must be less than 30 characters")
    .folded();
const RENTAL_FROM: Date =
    Date::required("Rental from date is required").invalid("Rental from must be a valid date");
const RENTAL_TO: Date = Date::required("Rental to date is required")
    .max(20, "Rental to must be less than 20 characters")
    .invalid("Rental to must be a valid date");

const RENTAL_TO_NOT_AFTER_FROM: &str = "Rental to must be after rental from";

impl Schema for RentalFields {
    fn validate(raw: &Value) -> Result<Self, ValidationErrors> {
        let mut v = Validator::new(raw);
        let user = v.field("user", &USER);
        let title = v.field("title", &TITLE);
        let rental_from = v.field("rentalFrom", &RENTAL_FROM);
        let rental_to = v.field("rentalTo", &RENTAL_TO);

        if let (Some(from), Some(to)) = (rental_from, rental_to) {
            if to <= from {
                v.reject("rentalTo", RENTAL_TO_NOT_AFTER_FROM);
            }
        }

        match (user, title, rental_from, rental_to) {
            (Some(user), Some(title), Some(rental_from), Some(rental_to)) if v.is_clean() => {
                Ok(RentalFields {
                    user,
                    title,
                    rental_from,
                    rental_to,
                })
            }
            _ => Err(v.into_errors()),
        }
    }
}

impl Schema for RentalPatch {
    fn validate(raw: &Value) -> Result<Self, ValidationErrors> {
        let mut v = Validator::new(raw);
        let patch = RentalPatch {
            user: v.present("user", &USER),
            title: v.present("title", &TITLE),
            rental_from: v.present("rentalFrom", &RENTAL_FROM),
            rental_to: v.present("rentalTo", &RENTAL_TO),
        };

        if let (Some(from), Some(to)) = (patch.rental_from, patch.rental_to) {
            if to <= from {
                v.reject("rentalTo", RENTAL_TO_NOT_AFTER_FROM);
            }
        }

        if v.is_clean() {
            Ok(patch)
        } else {
            Err(v.into_errors())
        }
    }
}
