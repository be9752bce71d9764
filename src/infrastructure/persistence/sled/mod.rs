//! Sled 存储

mod token_store;

pub use token_store::{SledTokenStore, SledTokenStoreConfig};
