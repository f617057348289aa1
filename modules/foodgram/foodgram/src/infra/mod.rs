pub mod fixtures;
pub mod render;
pub mod storage;
