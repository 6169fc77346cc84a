use serde_json::Value;

use super::rules::Text;
use super::{Schema, ValidationErrors, Validator};
use crate::types::{Address, Phone, UserFields, UserPatch};

const USERNAME: Text = Text::required("Username is required");
const PASSWORD: Text = Text::required("Password is required").verbatim();
const NAME: Text = Text::required("Name is required");
const SURNAME: Text = Text::required("Surname is required");
const EMAIL: Text = Text::required("Email is required").email("Email must be a valid address");
const AREA: Text = Text::required("Area is required");
const ROAD: Text = Text::required("Road is required");
const PHONE_TYPE: Text = Text::required("Phone is required");
const PHONE_NUMBER: Text = Text::required("Number is required");

fn address(v: &mut Validator<'_>) -> Option<Address> {
    let area = v.field("address.area", &AREA);
    let road = v.field("address.road", &ROAD);
    Some(Address {
        area: area?,
        road: road?,
    })
}

fn phone(v: &mut Validator<'_>) -> Option<Phone> {
    let kind = v.field("phone.type", &PHONE_TYPE);
    let number = v.field("phone.number", &PHONE_NUMBER);
    Some(Phone {
        kind: kind?,
        number: number?,
    })
}

impl Schema for UserFields {
    fn validate(raw: &Value) -> Result<Self, ValidationErrors> {
        let mut v = Validator::new(raw);
        let username = v.field("username", &USERNAME);
        let password = v.field("password", &PASSWORD);
        let name = v.field("name", &NAME);
        let surname = v.field("surname", &SURNAME);
        let email = v.field("email", &EMAIL);
        let address = address(&mut v);
        let phone = phone(&mut v);

        match (username, password, name, surname, email, address, phone) {
            (
                Some(username),
                Some(password),
                Some(name),
                Some(surname),
                Some(email),
                Some(address),
                Some(phone),
            ) => Ok(UserFields {
                username,
                password,
                name,
                surname,
                email,
                address,
                phone,
            }),
            _ => Err(v.into_errors()),
        }
    }
}

impl Schema for UserPatch {
    /// A nested object that is present must be complete.
    fn validate(raw: &Value) -> Result<Self, ValidationErrors> {
        let mut v = Validator::new(raw);
        let mut patch = UserPatch {
            username: v.present("username", &USERNAME),
            password: v.present("password", &PASSWORD),
            name: v.present("name", &NAME),
            surname: v.present("surname", &SURNAME),
            email: v.present("email", &EMAIL),
            address: None,
            phone: None,
        };
        if v.has("address") {
            patch.address = address(&mut v);
        }
        if v.has("phone") {
            patch.phone = phone(&mut v);
        }

        if v.is_clean() {
            Ok(patch)
        } else {
            Err(v.into_errors())
        }
    }
}
