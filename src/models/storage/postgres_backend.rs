use super::{StorageBackend, StorageError};
use crate::models::book::Book;
use crate::models::filter::{title_prefix_pattern, BookFilter, Criterion};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::debug;
use uuid::Uuid;

pub struct PostgresBackend {
    pool: PgPool,
}

impl PostgresBackend {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }
}

fn row_to_book(row: &PgRow) -> Result<Book, StorageError> {
    Ok(Book {
        id: row.try_get::<Uuid, _>("id")?.to_string(),
        title: row.try_get("title")?,
        author: row.try_get("author")?,
        isbn: row.try_get("isbn")?,
    })
}

fn write_error(err: sqlx::Error, isbn: &str) -> StorageError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StorageError::DuplicateIsbn(isbn.to_string())
        }
        _ => StorageError::Postgres(err),
    }
}

/// Builds the listing query. Title prefixes are sent as an escaped, anchored
/// regular expression.
fn select_books(filter: &BookFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("SELECT id, title, author, isbn FROM books");

    for (i, criterion) in filter.criteria().iter().enumerate() {
        query.push(if i == 0 { " WHERE " } else { " AND " });
        match criterion {
            Criterion::TitlePrefix(prefix) => {
                query.push("title ~ ").push_bind(title_prefix_pattern(prefix));
            }
            Criterion::AuthorEquals(author) => {
                query.push("author = ").push_bind(author.clone());
            }
            Criterion::IsbnEquals(isbn) => {
                query.push("isbn = ").push_bind(isbn.clone());
            }
        }
    }

    query.push(" ORDER BY seq");
    query
}

#[async_trait]
impl StorageBackend for PostgresBackend {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn insert_book(&self, book: &Book) -> Result<(), StorageError> {
        let id = Uuid::parse_str(&book.id).map_err(|_| StorageError::InvalidId(book.id.clone()))?;

        sqlx::query("INSERT INTO books (id, title, author, isbn) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(&book.title)
            .bind(&book.author)
            .bind(&book.isbn)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, &book.isbn))?;

        Ok(())
    }

    async fn get_book(&self, id: &str) -> Result<Option<Book>, StorageError> {
        let id = match Uuid::parse_str(id) {
            Ok(id) => id,
            Err(_) => return Ok(None),
        };

        let row = sqlx::query("SELECT id, title, author, isbn FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_book).transpose()
    }

    async fn find_books(&self, filter: &BookFilter) -> Result<Vec<Book>, StorageError> {
        let mut query = select_books(filter);
        debug!("Listing books: {}", query.sql());

        let rows = query.build().fetch_all(&self.pool).await?;

        rows.iter().map(row_to_book).collect()
    }

    async fn update_book(&self, book: &Book) -> Result<bool, StorageError> {
        let id = match Uuid::parse_str(&book.id) {
            Ok(id) => id,
            Err(_) => return Ok(false),
        };

        let result =
            sqlx::query("UPDATE books SET title = $2, author = $3, isbn = $4 WHERE id = $1")
                .bind(id)
                .bind(&book.title)
                .bind(&book.author)
                .bind(&book.isbn)
                .execute(&self.pool)
                .await
                .map_err(|e| write_error(e, &book.isbn))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_book(&self, id: &str) -> Result<bool, StorageError> {
        let id = match Uuid::parse_str(id) {
            Ok(id) => id,
            Err(_) => return Ok(false),
        };

        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ensure_indexes(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS books (
                seq BIGSERIAL,
                id UUID PRIMARY KEY,
                title TEXT NOT NULL,
                author TEXT NOT NULL,
                isbn TEXT NOT NULL,
                CONSTRAINT isbn_index UNIQUE (isbn)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_books_title ON books(title)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_books_author ON books(author)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn test_connection(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfiltered_listing_has_no_where_clause() {
        let query = select_books(&BookFilter::all());
        assert_eq!(query.sql(), "SELECT id, title, author, isbn FROM books ORDER BY seq");
    }

    #[test]
    fn criteria_become_bound_parameters() {
        let filter = BookFilter::all()
            .with(Criterion::TitlePrefix("Th".to_string()))
            .with(Criterion::AuthorEquals("Charles Duhigg".to_string()));

        let query = select_books(&filter);

        assert_eq!(
            query.sql(),
            "SELECT id, title, author, isbn FROM books WHERE title ~ $1 AND author = $2 ORDER BY seq"
        );
    }
}
