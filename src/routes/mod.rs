pub mod books;
pub mod error;
pub mod health;
pub mod params;

pub async fn welcome() -> &'static str {
    "Welcome to BookList!"
}
