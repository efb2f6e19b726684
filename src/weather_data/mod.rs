pub mod cleanup;
pub mod data_loader;
pub mod error;
pub mod month_cache;
pub mod timestamp;
pub mod window_provider;
