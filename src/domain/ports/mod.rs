pub mod asset_store;
pub mod content_page;
pub mod embedding_port;
pub mod http_fetcher;
