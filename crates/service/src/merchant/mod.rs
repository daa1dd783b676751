//! Merchant aggregate persistence and business rules.
//!
//! - `repository`: how a merchant is stored and mutated in the key-value store
//! - `service`: checks the consuming layer owns (duplicate emails)

pub mod repository;
pub mod service;

pub use repository::{KvMerchantRepository, MerchantMutation, MerchantRepository};
pub use service::MerchantService;
