pub mod errors;
pub mod merchant;

pub use merchant::{Member, Merchant};

#[cfg(test)]
mod tests;
