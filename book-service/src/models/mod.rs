pub mod book;
pub mod error;
pub mod responses;
pub mod storage;
