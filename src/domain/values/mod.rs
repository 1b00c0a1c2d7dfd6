pub mod canonical_image;
pub mod embedding;
pub mod item_id;
pub mod query_input;
