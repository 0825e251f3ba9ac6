use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Field name -> human-readable messages, ordered by field name.
pub type ValidationErrors = BTreeMap<String, Vec<String>>;

pub const BLANK: &str = "can't be blank";
pub const TAKEN: &str = "is already taken";
pub const INVALID: &str = "is invalid";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Author,
    Isbn,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Title, Field::Author, Field::Isbn];

    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Author => "author",
            Field::Isbn => "isbn",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub isbn: String,
}

/// Identifier for a book that has not been stored yet. Assigned before
/// validation so a rejected create still renders one.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

impl Book {
    pub fn new(id: String, fields: NewBook) -> Self {
        Self {
            id,
            title: fields.title,
            author: fields.author,
            isbn: fields.isbn,
        }
    }

    pub fn attributes(&self) -> BookAttributes {
        BookAttributes {
            title: Some(self.title.clone()),
            author: Some(self.author.clone()),
            isbn: Some(self.isbn.clone()),
        }
    }
}

/// A validated attribute set, ready to be written to a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
}

/// Attributes of a book that may not (yet) satisfy validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookAttributes {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

impl BookAttributes {
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Title => self.title.as_deref(),
            Field::Author => self.author.as_deref(),
            Field::Isbn => self.isbn.as_deref(),
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Author => &mut self.author,
            Field::Isbn => &mut self.isbn,
        }
    }

    /// Presence check over every required field.
    pub fn validate(&self) -> Result<NewBook, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for field in Field::ALL {
            if is_blank(self.get(field)) {
                add_error(&mut errors, field, BLANK);
            }
        }

        match (&self.title, &self.author, &self.isbn) {
            (Some(title), Some(author), Some(isbn)) if errors.is_empty() => Ok(NewBook {
                title: title.clone(),
                author: author.clone(),
                isbn: isbn.clone(),
            }),
            _ => Err(errors),
        }
    }
}

/// Attribute changes parsed from a request body.
///
/// Only keys present in the body are recorded; `null` clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    changes: Vec<(Field, Option<String>)>,
    rejected: Vec<Field>,
}

impl BookPatch {
    pub fn from_params(params: &Map<String, Value>) -> Self {
        let mut patch = Self::default();

        for field in Field::ALL {
            let value = match params.get(field.name()) {
                Some(value) => value,
                None => continue,
            };

            match value {
                Value::Null => patch.changes.push((field, None)),
                Value::String(s) => patch.changes.push((field, Some(s.clone()))),
                Value::Number(n) => patch.changes.push((field, Some(n.to_string()))),
                Value::Bool(b) => patch.changes.push((field, Some(b.to_string()))),
                Value::Array(_) | Value::Object(_) => patch.rejected.push(field),
            }
        }

        patch
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.rejected.is_empty()
    }

    /// Writes the changes into `attributes` and validates the result.
    ///
    /// `attributes` keeps the attempted values even when validation fails, so
    /// the caller can echo them back alongside the errors.
    pub fn apply_to(&self, attributes: &mut BookAttributes) -> Result<NewBook, ValidationErrors> {
        for (field, value) in &self.changes {
            *attributes.slot_mut(*field) = value.clone();
        }

        let mut errors = ValidationErrors::new();
        for field in &self.rejected {
            add_error(&mut errors, *field, INVALID);
        }

        match attributes.validate() {
            Ok(book) if errors.is_empty() => Ok(book),
            Ok(_) => Err(errors),
            Err(missing) => {
                for (field, mut messages) in missing {
                    errors.entry(field).or_default().append(&mut messages);
                }
                Err(errors)
            }
        }
    }
}

pub fn duplicate_isbn() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    add_error(&mut errors, Field::Isbn, TAKEN);
    errors
}

fn add_error(errors: &mut ValidationErrors, field: Field, message: &str) {
    errors
        .entry(field.name().to_string())
        .or_default()
        .push(message.to_string());
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}
