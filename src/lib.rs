pub mod cli;
pub mod render;
pub mod storage;
pub mod store;
pub mod utils;
pub mod workout;
