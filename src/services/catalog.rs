use crate::models::book::{
    duplicate_isbn, generate_id, Book, BookAttributes, BookPatch, ValidationErrors,
};
use crate::models::filter::BookFilter;
use crate::models::responses::BookResponse;
use crate::models::storage::{Backend, StorageError};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Book {0} not found")]
    NotFound(String),
    #[error("Book failed validation")]
    Invalid(Box<BookResponse>),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn invalid(id: &str, attributes: BookAttributes, errors: ValidationErrors) -> CatalogError {
    CatalogError::Invalid(Box::new(BookResponse::invalid(id.to_string(), attributes, errors)))
}

pub async fn list_books(backend: &Backend, filter: &BookFilter) -> Result<Vec<Book>, CatalogError> {
    Ok(backend.find_books(filter).await?)
}

pub async fn find_book(backend: &Backend, id: &str) -> Result<Book, CatalogError> {
    backend
        .get_book(id)
        .await?
        .ok_or_else(|| CatalogError::NotFound(id.to_string()))
}

pub async fn create_book(backend: &Backend, patch: &BookPatch) -> Result<Book, CatalogError> {
    let id = generate_id();
    let mut attributes = BookAttributes::default();
    let new_book = match patch.apply_to(&mut attributes) {
        Ok(new_book) => new_book,
        Err(errors) => return Err(invalid(&id, attributes, errors)),
    };

    let book = Book::new(id, new_book);
    match backend.insert_book(&book).await {
        Ok(()) => {
            info!("Created book {} (isbn {})", book.id, book.isbn);
            Ok(book)
        }
        Err(StorageError::DuplicateIsbn(_)) => {
            Err(invalid(&book.id, attributes, duplicate_isbn()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Applies `patch` on top of the stored book and writes it back.
pub async fn update_book(
    backend: &Backend,
    id: &str,
    patch: &BookPatch,
) -> Result<Book, CatalogError> {
    let current = find_book(backend, id).await?;

    let mut attributes = current.attributes();
    let changes = match patch.apply_to(&mut attributes) {
        Ok(changes) => changes,
        Err(errors) => return Err(invalid(id, attributes, errors)),
    };

    let updated = Book::new(current.id, changes);
    match backend.update_book(&updated).await {
        Ok(true) => {
            info!("Updated book {}", updated.id);
            Ok(updated)
        }
        Ok(false) => Err(CatalogError::NotFound(id.to_string())),
        Err(StorageError::DuplicateIsbn(_)) => Err(invalid(id, attributes, duplicate_isbn())),
        Err(e) => Err(e.into()),
    }
}

/// Returns whether a book was removed. A missing book is not an error.
pub async fn delete_book(backend: &Backend, id: &str) -> Result<bool, CatalogError> {
    let removed = backend.delete_book(id).await?;
    if removed {
        info!("Deleted book {}", id);
    }
    Ok(removed)
}
