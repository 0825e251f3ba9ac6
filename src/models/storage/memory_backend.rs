use super::{StorageBackend, StorageError};
use crate::models::book::Book;
use crate::models::filter::BookFilter;
use async_trait::async_trait;
use std::sync::{PoisonError, RwLock};

/// Process-local store, used for tests and `BACKEND_TYPE=memory`.
#[derive(Default)]
pub struct InMemoryBackend {
    books: RwLock<Vec<Book>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: PoisonError<T>) -> StorageError {
    StorageError::Connection("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl StorageBackend for InMemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn insert_book(&self, book: &Book) -> Result<(), StorageError> {
        let mut books = self.books.write().map_err(poisoned)?;

        if books.iter().any(|existing| existing.isbn == book.isbn) {
            return Err(StorageError::DuplicateIsbn(book.isbn.clone()));
        }

        books.push(book.clone());
        Ok(())
    }

    async fn get_book(&self, id: &str) -> Result<Option<Book>, StorageError> {
        let books = self.books.read().map_err(poisoned)?;
        Ok(books.iter().find(|book| book.id == id).cloned())
    }

    async fn find_books(&self, filter: &BookFilter) -> Result<Vec<Book>, StorageError> {
        let books = self.books.read().map_err(poisoned)?;
        Ok(books
            .iter()
            .filter(|book| filter.matches(book))
            .cloned()
            .collect())
    }

    async fn update_book(&self, book: &Book) -> Result<bool, StorageError> {
        let mut books = self.books.write().map_err(poisoned)?;

        if books
            .iter()
            .any(|existing| existing.isbn == book.isbn && existing.id != book.id)
        {
            return Err(StorageError::DuplicateIsbn(book.isbn.clone()));
        }

        match books.iter_mut().find(|existing| existing.id == book.id) {
            Some(existing) => {
                *existing = book.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_book(&self, id: &str) -> Result<bool, StorageError> {
        let mut books = self.books.write().map_err(poisoned)?;
        let before = books.len();
        books.retain(|book| book.id != id);
        Ok(books.len() != before)
    }

    async fn ensure_indexes(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn test_connection(&self) -> Result<(), StorageError> {
        let _books = self.books.read().map_err(poisoned)?;
        Ok(())
    }
}
