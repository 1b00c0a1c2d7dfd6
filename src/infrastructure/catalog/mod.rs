pub mod fs_assets;
pub mod json_snapshot;
