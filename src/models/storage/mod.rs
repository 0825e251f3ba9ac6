use crate::models::book::Book;
use crate::models::filter::BookFilter;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

mod memory_backend;
mod postgres_backend;
mod redis_backend;

pub use memory_backend::InMemoryBackend;
pub use postgres_backend::PostgresBackend;
pub use redis_backend::RedisBackend;

pub type Backend = Arc<dyn StorageBackend + Send + Sync>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("ISBN {0} is already in use")]
    DuplicateIsbn(String),
    #[error("Malformed book id: {0}")]
    InvalidId(String),
}

/// Document store holding the book catalog.
///
/// Implementations enforce isbn uniqueness; a write that would duplicate an
/// isbn fails with [`StorageError::DuplicateIsbn`].
#[async_trait]
pub trait StorageBackend {
    fn name(&self) -> &'static str;
    async fn insert_book(&self, book: &Book) -> Result<(), StorageError>;
    async fn get_book(&self, id: &str) -> Result<Option<Book>, StorageError>;
    /// Books matching `filter`, in insertion order.
    async fn find_books(&self, filter: &BookFilter) -> Result<Vec<Book>, StorageError>;
    /// Returns false if no book with `book.id` exists.
    async fn update_book(&self, book: &Book) -> Result<bool, StorageError>;
    /// Returns false if no book with `id` exists.
    async fn delete_book(&self, id: &str) -> Result<bool, StorageError>;
    async fn ensure_indexes(&self) -> Result<(), StorageError>;
    async fn test_connection(&self) -> Result<(), StorageError>;
}
