use crate::models::book::{Book, BookAttributes, ValidationErrors};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug)]
pub struct HealthResponse {
    pub service: String,
    pub status: String,
    pub backend: String,
    pub timestamp: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Wire form of a book. `errors` is only emitted for a failed save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookResponse {
    pub id: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "ValidationErrors::is_empty")]
    pub errors: ValidationErrors,
}

impl BookResponse {
    pub fn invalid(
        id: String,
        attributes: BookAttributes,
        errors: ValidationErrors,
    ) -> Self {
        Self {
            id,
            title: attributes.title,
            author: attributes.author,
            isbn: attributes.isbn,
            errors,
        }
    }
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: Some(book.title),
            author: Some(book.author),
            isbn: Some(book.isbn),
            errors: ValidationErrors::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::BookPatch;
    use serde_json::{json, Value};

    #[test]
    fn saved_book_has_no_errors_key() {
        let response = BookResponse::from(Book {
            id: "6f1c".to_string(),
            title: "Atomic Habits".to_string(),
            author: "James Clear".to_string(),
            isbn: "0735211299".to_string(),
        });

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "id": "6f1c",
                "title": "Atomic Habits",
                "author": "James Clear",
                "isbn": "0735211299"
            })
        );
    }

    #[test]
    fn failed_save_renders_nulls_and_errors() {
        let mut errors = ValidationErrors::new();
        errors.insert("title".to_string(), vec!["can't be blank".to_string()]);
        let attributes = BookAttributes {
            title: None,
            author: Some("James Clear".to_string()),
            isbn: Some("0735211299".to_string()),
        };

        let response = BookResponse::invalid("6f1c".to_string(), attributes, errors);
        let value = serde_json::to_value(response).unwrap();

        assert_eq!(value["id"], "6f1c");
        assert_eq!(value["title"], Value::Null);
        assert_eq!(value["errors"]["title"], json!(["can't be blank"]));
    }

    #[test]
    fn payload_survives_serialization() {
        let payload = json!({
            "title": "The Power Of Habit",
            "author": "Charles Duhigg",
            "isbn": "081298160X"
        });
        let Value::Object(params) = payload.clone() else {
            panic!("payload is an object");
        };

        let mut attributes = BookAttributes::default();
        BookPatch::from_params(&params).apply_to(&mut attributes).unwrap();
        let rendered = serde_json::to_value(BookResponse::invalid(
            "6f1c".to_string(),
            attributes,
            ValidationErrors::new(),
        ))
        .unwrap();

        for key in ["title", "author", "isbn"] {
            assert_eq!(rendered[key], payload[key]);
        }
    }
}
