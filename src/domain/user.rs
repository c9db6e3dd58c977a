use serde::{Deserialize, Serialize};

use crate::domain::validation::{FieldErrors, is_valid_email};

const MIN_NAME_LEN: usize = 2;
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserRole {
    #[default]
    User,
    It,
    Admin,
    /// A role this client does not know about, kept verbatim.
    Other(String),
}

impl UserRole {
    pub fn as_str(&self) -> &str {
        match self {
            UserRole::User => "USER",
            UserRole::It => "IT",
            UserRole::Admin => "ADMIN",
            UserRole::Other(raw) => raw,
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "USER" => Some(UserRole::User),
            "IT" => Some(UserRole::It),
            "ADMIN" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

impl From<String> for UserRole {
    fn from(value: String) -> Self {
        UserRole::from_str(&value).unwrap_or(UserRole::Other(value))
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub department: Option<String>,
    pub phone_number: Option<String>,
    pub line_id: Option<String>,
}

impl User {
    /// Seeds an edit form with the stored values; the password stays empty.
    pub fn to_form(&self) -> UserForm {
        UserForm {
            name: self.name.clone(),
            email: self.email.clone(),
            password: None,
            role: self.role.clone(),
            department: self.department.clone(),
            phone_number: self.phone_number.clone(),
            line_id: self.line_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserForm {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_id: Option<String>,
}

impl UserForm {
    pub fn validate(&self, is_new: bool) -> FieldErrors {
        let mut errors = FieldErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.add("name", "Name is required");
        } else if name.chars().count() < MIN_NAME_LEN {
            errors.add("name", "Name must be at least 2 characters");
        }

        if self.email.trim().is_empty() {
            errors.add("email", "Email is required");
        } else if !is_valid_email(&self.email) {
            errors.add("email", "Invalid email format");
        }

        match self.password.as_deref() {
            None | Some("") if is_new => errors.add("password", "Password is required"),
            Some(password) if !password.is_empty() && password.chars().count() < MIN_PASSWORD_LEN => {
                errors.add("password", "Password must be at least 6 characters")
            }
            _ => {}
        }

        errors
    }

    /// Drops an empty password so an edit never overwrites the stored one.
    pub fn into_payload(mut self) -> Self {
        if self.password.as_deref().is_some_and(str::is_empty) {
            self.password = None;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn valid_form() -> UserForm {
        UserForm {
            name: "Somchai".to_string(),
            email: "somchai@example.com".to_string(),
            password: Some("secret1".to_string()),
            ..UserForm::default()
        }
    }

    #[test]
    fn accepts_valid_new_user() {
        assert!(valid_form().validate(true).is_empty());
    }

    #[test]
    fn requires_password_for_new_user_only() {
        let form = UserForm {
            password: None,
            ..valid_form()
        };
        assert_eq!(
            form.validate(true).get("password"),
            Some("Password is required")
        );
        assert!(form.validate(false).is_empty());
    }

    #[test]
    fn rejects_short_values() {
        let form = UserForm {
            name: " A ".to_string(),
            password: Some("123".to_string()),
            ..valid_form()
        };
        let errors = form.validate(false);
        assert_eq!(
            errors.get("name"),
            Some("Name must be at least 2 characters")
        );
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 6 characters")
        );
    }

    #[test]
    fn rejects_bad_email() {
        let form = UserForm {
            email: "not-an-email".to_string(),
            ..valid_form()
        };
        assert_eq!(form.validate(true).get("email"), Some("Invalid email format"));
    }

    #[test]
    fn unknown_role_does_not_break_user_list() {
        let users: Vec<User> = serde_json::from_value(json!([
            { "id": 1, "name": "Somchai", "email": "somchai@example.com", "role": "ADMIN" },
            { "id": 2, "name": "Nok", "email": "nok@example.com", "role": "SUPERVISOR" }
        ]))
        .unwrap();
        assert_eq!(users[0].role, UserRole::Admin);
        assert_eq!(users[1].role, UserRole::Other("SUPERVISOR".to_string()));
        assert_eq!(users[1].role.as_str(), "SUPERVISOR");
        assert_eq!(
            serde_json::to_value(users[1].to_form()).unwrap()["role"],
            json!("SUPERVISOR")
        );
    }

    #[test]
    fn edit_payload_omits_empty_password() {
        let form = UserForm {
            password: Some(String::new()),
            role: UserRole::It,
            ..valid_form()
        };
        assert_eq!(
            serde_json::to_value(form.into_payload()).unwrap(),
            json!({
                "name": "Somchai",
                "email": "somchai@example.com",
                "role": "IT"
            })
        );
    }
}
