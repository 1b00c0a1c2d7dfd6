pub mod catalog;
pub mod match_products;
pub mod rank;
pub mod resolve;
