pub mod annotate;
pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod insight;
pub mod locator;
pub mod matcher;
pub mod pdf;
pub mod segment;
pub mod summarize;
