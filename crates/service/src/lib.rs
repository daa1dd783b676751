//! Service layer for merchants and their members.
//! - `storage`: the embedded transactional key-value store
//! - `merchant`: aggregate persistence (repository) and business rules (service)
//! - `pagination`: paging over a merchant's member list
//! - `seed`: generated demo data for a fresh store

pub mod errors;
pub mod storage;
pub mod merchant;
pub mod pagination;
pub mod seed;
#[cfg(test)]
pub mod test_support;
