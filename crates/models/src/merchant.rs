//! Merchant aggregate and its nested members.
//!
//! A merchant is persisted as one JSON document under its code; members have no
//! storage of their own and only change through a read-modify-write of the
//! owning merchant.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub email: String,
}

impl Member {
    pub fn new(email: impl Into<String>) -> Self {
        Self { email: email.into() }
    }
}

/// Aggregate root. `code` is the store key and never changes after creation.
///
/// Member order is the stored order: appends go to the end, and
/// [`Merchant::remove_member`] moves the last member into the freed slot, so
/// removal does not keep the relative order of the remaining members.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merchant {
    pub code: String,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl Merchant {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into(), members: Vec::new() }
    }

    /// Fresh random merchant code.
    pub fn generate_code() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn encode(&self) -> Result<Vec<u8>, ModelError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ModelError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn push_member(&mut self, member: Member) {
        self.members.push(member);
    }

    pub fn find_member(&self, email: &str) -> Option<usize> {
        self.members.iter().position(|m| m.email == email)
    }

    pub fn contains_member(&self, email: &str) -> bool {
        self.find_member(email).is_some()
    }

    /// Remove the first member with `email` by swapping in the last member.
    pub fn remove_member(&mut self, email: &str) -> Result<Member, ModelError> {
        let idx = self
            .find_member(email)
            .ok_or_else(|| ModelError::MemberNotFound(email.to_string()))?;
        Ok(self.members.swap_remove(idx))
    }
}

/// Codes are opaque key bytes; only a blank code is refused.
pub fn validate_code(code: &str) -> Result<(), ModelError> {
    if code.trim().is_empty() {
        return Err(ModelError::Validation("merchant code must not be blank".into()));
    }
    Ok(())
}
