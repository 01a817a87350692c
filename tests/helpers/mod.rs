#![allow(dead_code, unused_imports)]

mod test_server;

pub use test_server::{FailingDocuments, TestServer};

pub const TEST_EMAIL: &str = "a@x.com";
pub const TEST_PASSWORD: &str = "secret123";
