pub mod catalog;
pub mod catalog_item;
pub mod match_result;
