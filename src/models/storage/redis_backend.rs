use super::{StorageBackend, StorageError};
use crate::models::book::Book;
use crate::models::filter::BookFilter;
use async_trait::async_trait;
use redis::{AsyncCommands, Script};
use tracing::{debug, warn};

const ORDER_KEY: &str = "books:order";
const SEQUENCE_KEY: &str = "books:seq";
const ISBN_KEY_PREFIX: &str = "book:isbn:";

fn book_key(id: &str) -> String {
    format!("book:{}", id)
}

fn isbn_key(isbn: &str) -> String {
    format!("{}{}", ISBN_KEY_PREFIX, isbn)
}

// Each write runs as one script so the isbn claim, the document and the
// order entry never disagree, whatever else hits the same keys.

/// KEYS: isbn claim, document, sequence, order. ARGV: id, document json.
/// Returns 0 when the isbn is already claimed.
const INSERT_SCRIPT: &str = r#"
if redis.call('SETNX', KEYS[1], ARGV[1]) == 0 then
  return 0
end
redis.call('SET', KEYS[2], ARGV[2])
local seq = redis.call('INCR', KEYS[3])
redis.call('ZADD', KEYS[4], seq, ARGV[1])
return 1
"#;

/// KEYS: document, new isbn claim. ARGV: id, document json, isbn key prefix.
/// Returns 0 when the document is gone, -1 when the isbn belongs to another book.
const UPDATE_SCRIPT: &str = r#"
local current = redis.call('GET', KEYS[1])
if not current then
  return 0
end
local owner = redis.call('GET', KEYS[2])
if owner and owner ~= ARGV[1] then
  return -1
end
local previous = ARGV[3] .. cjson.decode(current)['isbn']
if previous ~= KEYS[2] then
  redis.call('DEL', previous)
end
redis.call('SET', KEYS[2], ARGV[1])
redis.call('SET', KEYS[1], ARGV[2])
return 1
"#;

/// KEYS: document, order. ARGV: id, isbn key prefix.
/// Returns 0 when there was nothing to delete.
const DELETE_SCRIPT: &str = r#"
local current = redis.call('GET', KEYS[1])
if not current then
  return 0
end
redis.call('DEL', KEYS[1], ARGV[2] .. cjson.decode(current)['isbn'])
redis.call('ZREM', KEYS[2], ARGV[1])
return 1
"#;

pub struct RedisBackend {
    client: redis::Client,
}

impl RedisBackend {
    pub fn new(redis_url: &str) -> Result<Self, StorageError> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self { client })
    }

    pub async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection, StorageError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

#[async_trait]
impl StorageBackend for RedisBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn insert_book(&self, book: &Book) -> Result<(), StorageError> {
        let mut conn = self.get_connection().await?;
        let value = serde_json::to_string(book)?;

        let inserted: i64 = Script::new(INSERT_SCRIPT)
            .key(isbn_key(&book.isbn))
            .key(book_key(&book.id))
            .key(SEQUENCE_KEY)
            .key(ORDER_KEY)
            .arg(&book.id)
            .arg(&value)
            .invoke_async(&mut conn)
            .await?;

        match inserted {
            0 => Err(StorageError::DuplicateIsbn(book.isbn.clone())),
            _ => Ok(()),
        }
    }

    async fn get_book(&self, id: &str) -> Result<Option<Book>, StorageError> {
        let mut conn = self.get_connection().await?;

        let value: Option<String> = conn.get(book_key(id)).await?;

        match value {
            Some(json_str) => Ok(Some(serde_json::from_str(&json_str)?)),
            None => Ok(None),
        }
    }

    async fn find_books(&self, filter: &BookFilter) -> Result<Vec<Book>, StorageError> {
        let mut conn = self.get_connection().await?;

        let ids: Vec<String> = conn.zrange(ORDER_KEY, 0, -1).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = ids.iter().map(|id| book_key(id)).collect();
        let documents: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await?;

        let mut books = Vec::new();
        for (id, document) in ids.iter().zip(documents) {
            match document {
                Some(json_str) => {
                    let book: Book = serde_json::from_str(&json_str)?;
                    if filter.matches(&book) {
                        books.push(book);
                    }
                }
                None => warn!("Book {} is listed in {} but has no document", id, ORDER_KEY),
            }
        }

        debug!("Redis filter matched {} of {} books", books.len(), ids.len());
        Ok(books)
    }

    async fn update_book(&self, book: &Book) -> Result<bool, StorageError> {
        let mut conn = self.get_connection().await?;
        let value = serde_json::to_string(book)?;

        let updated: i64 = Script::new(UPDATE_SCRIPT)
            .key(book_key(&book.id))
            .key(isbn_key(&book.isbn))
            .arg(&book.id)
            .arg(&value)
            .arg(ISBN_KEY_PREFIX)
            .invoke_async(&mut conn)
            .await?;

        match updated {
            0 => Ok(false),
            -1 => Err(StorageError::DuplicateIsbn(book.isbn.clone())),
            _ => Ok(true),
        }
    }

    async fn delete_book(&self, id: &str) -> Result<bool, StorageError> {
        let mut conn = self.get_connection().await?;

        let deleted: i64 = Script::new(DELETE_SCRIPT)
            .key(book_key(id))
            .key(ORDER_KEY)
            .arg(id)
            .arg(ISBN_KEY_PREFIX)
            .invoke_async(&mut conn)
            .await?;

        Ok(deleted == 1)
    }

    async fn ensure_indexes(&self) -> Result<(), StorageError> {
        // Uniqueness and ordering keys are created lazily on insert.
        Ok(())
    }

    async fn test_connection(&self) -> Result<(), StorageError> {
        let mut conn = self.get_connection().await?;
        let _: Option<String> = conn.get("__connection_test__").await?;
        Ok(())
    }
}
