//! Input forms and their validation rules.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

const REQUIRED: &str = "required";

/// Rejects values that are empty once trimmed.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(REQUIRED));
    }
    Ok(())
}

/// Field name -> human readable messages, ready for a template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    fn message(error: &ValidationError) -> String {
        match error.code.as_ref() {
            REQUIRED => "This field is required.".to_string(),
            "email" => "Enter a valid email address.".to_string(),
            "length" => match error.params.get("max") {
                Some(max) => format!("Ensure this value has at most {max} characters."),
                None => "Ensure this value has a valid length.".to_string(),
            },
            _ => error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid value ({}).", error.code)),
        }
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = BTreeMap::new();
        for (field, errors) in errors.field_errors() {
            // A missing value makes every other rule noise.
            let messages = match errors.iter().find(|e| e.code == REQUIRED) {
                Some(required) => vec![Self::message(required)],
                None => errors.iter().map(Self::message).collect(),
            };
            fields.insert(field.to_string(), messages);
        }
        Self(fields)
    }
}

/// Common behaviour: trim the raw input, then validate it.
pub trait Form: Validate {
    /// Strip surrounding whitespace from every text field.
    fn normalize(&mut self);

    fn clean(&mut self) -> Result<(), FormErrors> {
        self.normalize();
        self.validate().map_err(FormErrors::from)
    }
}

/// Recommend a post to someone by email.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct EmailPostForm {
    #[validate(custom(function = "not_blank"), length(max = 25))]
    pub name: String,
    #[validate(custom(function = "not_blank"), email)]
    pub email: String,
    #[validate(custom(function = "not_blank"), email)]
    pub to: String,
    pub comments: String,
}

impl Form for EmailPostForm {
    fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_string();
        self.to = self.to.trim().to_string();
        self.comments = self.comments.trim().to_string();
    }
}

/// A reader's comment. The target post comes from the URL, never from here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CommentForm {
    #[validate(custom(function = "not_blank"), length(max = 80))]
    pub name: String,
    #[validate(custom(function = "not_blank"), email, length(max = 254))]
    pub email: String,
    #[validate(custom(function = "not_blank"))]
    pub body: String,
}

impl Form for CommentForm {
    fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_string();
        self.body = self.body.trim().to_string();
    }
}

/// Full-text search box.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SearchForm {
    #[validate(custom(function = "not_blank"))]
    pub query: String,
}

impl Form for SearchForm {
    fn normalize(&mut self) {
        self.query = self.query.trim().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share_form() -> EmailPostForm {
        EmailPostForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            to: "bob@example.com".to_string(),
            comments: String::new(),
        }
    }

    #[test]
    fn test_valid_share_form_without_comments() {
        let mut form = share_form();
        assert!(form.clean().is_ok());
    }

    #[test]
    fn test_share_form_rejects_long_name_and_bad_addresses() {
        let mut form = share_form();
        form.name = "x".repeat(26);
        form.to = "not-an-address".to_string();

        let errors = form.clean().unwrap_err();

        assert_eq!(
            errors.get("name").unwrap(),
            ["Ensure this value has at most 25 characters."]
        );
        assert_eq!(errors.get("to").unwrap(), ["Enter a valid email address."]);
        assert!(!errors.contains("email"));
    }

    #[test]
    fn test_blank_fields_report_only_required() {
        let mut form = CommentForm {
            name: "   ".to_string(),
            email: String::new(),
            body: "Nice post".to_string(),
        };

        let errors = form.clean().unwrap_err();

        assert_eq!(errors.get("name").unwrap(), ["This field is required."]);
        assert_eq!(errors.get("email").unwrap(), ["This field is required."]);
        assert!(!errors.contains("body"));
    }

    #[test]
    fn test_clean_trims_input() {
        let mut form = SearchForm {
            query: "  django  ".to_string(),
        };
        assert!(form.clean().is_ok());
        assert_eq!(form.query, "django");
    }

    #[test]
    fn test_missing_fields_deserialize_as_blank() {
        let form: CommentForm = serde_json::from_str(r#"{"name": "Ada", "post": 42}"#).unwrap();
        assert_eq!(form.name, "Ada");
        assert!(form.body.is_empty());
    }

    #[test]
    fn test_errors_serialize_as_map() {
        let mut form = SearchForm::default();
        let errors = form.clean().unwrap_err();
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            serde_json::json!({ "query": ["This field is required."] })
        );
    }
}
