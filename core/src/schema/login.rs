use serde_json::Value;

use super::rules::Text;
use super::{Schema, ValidationErrors, Validator};
use crate::types::LoginCredentials;

const USERNAME: Text = Text::required("Username is required");
const PASSWORD: Text = Text::required("Password is required").verbatim();

impl Schema for LoginCredentials {
    fn validate(raw: &Value) -> Result<Self, ValidationErrors> {
        let mut v = Validator::new(raw);
        let username = v.field("username", &USERNAME);
        let password = v.field("password", &PASSWORD);

        match (username, password) {
            (Some(username), Some(password)) => Ok(LoginCredentials { username, password }),
            _ => Err(v.into_errors()),
        }
    }
}
