pub mod book;
pub mod filter;
pub mod responses;
pub mod storage;
