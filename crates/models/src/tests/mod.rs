/// Encoding of the merchant aggregate
pub mod codec_tests;

/// In-memory member operations on the aggregate
pub mod member_tests;
