use std::collections::HashSet;
use std::sync::Arc;

use models::{Member, Merchant};
use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::merchant::repository::MerchantRepository;
use crate::pagination::{Page, Pagination};

/// Application service encapsulating merchant business rules.
/// Owns the check the repository leaves to its caller: member email uniqueness.
/// Codes and emails are otherwise taken as given.
pub struct MerchantService<R: MerchantRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: MerchantRepository + ?Sized> MerchantService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Create a merchant, optionally with a caller-chosen code and initial members.
    #[instrument(skip(self, members), fields(members = members.len()))]
    pub async fn create(&self, code: Option<String>, members: Vec<Member>) -> Result<Merchant, ServiceError> {
        let code = code.filter(|c| !c.trim().is_empty());
        let merchant = if members.is_empty() {
            self.repo.create_merchant(code).await?
        } else {
            reject_duplicate_emails(&members)?;
            let merchant = Merchant { code: code.unwrap_or_else(Merchant::generate_code), members };
            self.repo.insert_merchant(merchant).await?
        };
        info!(code = %merchant.code, "merchant created");
        Ok(merchant)
    }

    pub async fn get(&self, code: &str) -> Result<Merchant, ServiceError> {
        self.repo.get_merchant(code).await
    }

    pub async fn list_codes(&self) -> Result<Vec<String>, ServiceError> {
        let merchants = self.repo.list_merchants().await?;
        Ok(merchants.into_iter().map(|m| m.code).collect())
    }

    /// Delete an existing merchant; `NotFound` when there is nothing to delete.
    #[instrument(skip(self))]
    pub async fn delete(&self, code: &str) -> Result<(), ServiceError> {
        self.repo.get_merchant(code).await?;
        self.repo.delete_merchant(code).await?;
        info!(%code, "merchant deleted");
        Ok(())
    }

    /// Add a member, rejecting an email the merchant already has. The check and the
    /// append happen in the same transaction.
    #[instrument(skip(self))]
    pub async fn add_member(&self, code: &str, email: &str) -> Result<(), ServiceError> {
        let member = Member::new(email);
        let merchant = self
            .repo
            .update_merchant(
                code,
                Box::new(move |merchant: &mut Merchant| -> Result<(), ServiceError> {
                    if merchant.contains_member(&member.email) {
                        return Err(ServiceError::Conflict(format!("member {} already exists", member.email)));
                    }
                    merchant.push_member(member);
                    Ok(())
                }),
            )
            .await?;
        info!(%code, %email, members = merchant.members.len(), "member added");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn remove_member(&self, code: &str, email: &str) -> Result<(), ServiceError> {
        self.repo.remove_member(code, email).await?;
        info!(%code, %email, "member removed");
        Ok(())
    }

    /// One page of a merchant's members. The merchant is resolved before the raw
    /// page value is parsed, so a missing merchant wins over a malformed page.
    pub async fn members_page(&self, code: &str, page: Option<&str>, per_page: u32) -> Result<Page<Member>, ServiceError> {
        let merchant = self.repo.get_merchant(code).await?;
        Pagination::parse(page, per_page)?.apply(&merchant.members)
    }
}

fn reject_duplicate_emails(members: &[Member]) -> Result<(), ServiceError> {
    let mut seen = HashSet::with_capacity(members.len());
    for m in members {
        if !seen.insert(m.email.as_str()) {
            return Err(ServiceError::InvalidInput(format!("duplicate member email {}", m.email)));
        }
    }
    Ok(())
}
