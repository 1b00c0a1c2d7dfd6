pub mod catalog;
pub mod embeddings;
pub mod fetch;
pub mod pages;
