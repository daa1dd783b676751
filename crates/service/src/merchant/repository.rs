use std::sync::Arc;

use async_trait::async_trait;
use models::merchant::validate_code;
use models::{Member, Merchant};
use tracing::{debug, warn};

use crate::errors::ServiceError;
use crate::storage::{KvError, KvStore};

/// In-place change applied to a merchant inside one write transaction.
pub type MerchantMutation = Box<dyn FnOnce(&mut Merchant) -> Result<(), ServiceError> + Send>;

/// Persistence of merchant aggregates. One key per merchant, the whole member
/// list stored inside the merchant value.
#[async_trait]
pub trait MerchantRepository: Send + Sync {
    /// Store an empty merchant under `code`, or under a generated code when none is given.
    async fn create_merchant(&self, code: Option<String>) -> Result<Merchant, ServiceError>;
    /// Store a fully built merchant; fails with `Conflict` if its code is taken.
    async fn insert_merchant(&self, merchant: Merchant) -> Result<Merchant, ServiceError>;
    async fn get_merchant(&self, code: &str) -> Result<Merchant, ServiceError>;
    /// Every merchant in store key order. Any undecodable record fails the whole listing.
    async fn list_merchants(&self) -> Result<Vec<Merchant>, ServiceError>;
    /// Idempotent: deleting an absent code succeeds.
    async fn delete_merchant(&self, code: &str) -> Result<(), ServiceError>;
    async fn count_merchants(&self) -> Result<usize, ServiceError>;
    /// Read, mutate and write back one merchant atomically.
    async fn update_merchant(&self, code: &str, mutation: MerchantMutation) -> Result<Merchant, ServiceError>;

    /// Append a member. Duplicate emails are not checked here.
    async fn add_member(&self, code: &str, email: &str) -> Result<(), ServiceError> {
        let member = Member::new(email);
        self.update_merchant(
            code,
            Box::new(move |merchant: &mut Merchant| -> Result<(), ServiceError> {
                merchant.push_member(member);
                Ok(())
            }),
        )
        .await
        .map(|_| ())
    }

    /// Remove the first member with `email`; the last member takes its slot.
    async fn remove_member(&self, code: &str, email: &str) -> Result<(), ServiceError> {
        let email = email.to_string();
        self.update_merchant(
            code,
            Box::new(move |merchant: &mut Merchant| -> Result<(), ServiceError> {
                merchant.remove_member(&email)?;
                Ok(())
            }),
        )
        .await
        .map(|_| ())
    }
}

/// Repository over the redb-backed [`KvStore`]. Store calls block, so they run on
/// tokio's blocking pool.
#[derive(Clone)]
pub struct KvMerchantRepository {
    store: Arc<KvStore>,
}

impl KvMerchantRepository {
    pub fn new(store: Arc<KvStore>) -> Self { Self { store } }

    async fn blocking<T, F>(&self, f: F) -> Result<T, ServiceError>
    where
        T: Send + 'static,
        F: FnOnce(&KvStore) -> Result<T, ServiceError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| ServiceError::Storage(format!("store task failed: {e}")))?
    }
}

#[async_trait]
impl MerchantRepository for KvMerchantRepository {
    async fn create_merchant(&self, code: Option<String>) -> Result<Merchant, ServiceError> {
        let code = code
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(Merchant::generate_code);
        self.insert_merchant(Merchant::new(code)).await
    }

    async fn insert_merchant(&self, merchant: Merchant) -> Result<Merchant, ServiceError> {
        self.blocking(move |store| insert(store, merchant)).await
    }

    async fn get_merchant(&self, code: &str) -> Result<Merchant, ServiceError> {
        let code = code.to_string();
        self.blocking(move |store| get(store, &code)).await
    }

    async fn list_merchants(&self) -> Result<Vec<Merchant>, ServiceError> {
        self.blocking(list).await
    }

    async fn delete_merchant(&self, code: &str) -> Result<(), ServiceError> {
        let code = code.to_string();
        self.blocking(move |store| {
            store.delete(code.as_bytes())?;
            debug!(%code, "merchant deleted");
            Ok(())
        })
        .await
    }

    async fn count_merchants(&self) -> Result<usize, ServiceError> {
        self.blocking(|store| Ok(store.len()? as usize)).await
    }

    async fn update_merchant(&self, code: &str, mutation: MerchantMutation) -> Result<Merchant, ServiceError> {
        let code = code.to_string();
        self.blocking(move |store| update(store, &code, mutation)).await
    }
}

fn insert(store: &KvStore, merchant: Merchant) -> Result<Merchant, ServiceError> {
    validate_code(&merchant.code)?;
    let value = merchant.encode()?;
    match store.insert_new(merchant.code.as_bytes(), &value) {
        Ok(()) => {
            debug!(code = %merchant.code, members = merchant.members.len(), "merchant stored");
            Ok(merchant)
        }
        Err(KvError::Exists) => Err(ServiceError::Conflict(format!("merchant {} already exists", merchant.code))),
        Err(e) => Err(e.into()),
    }
}

fn get(store: &KvStore, code: &str) -> Result<Merchant, ServiceError> {
    let bytes = store.get(code.as_bytes()).map_err(|e| match e {
        KvError::NotFound => ServiceError::not_found("merchant"),
        other => other.into(),
    })?;
    decode_stored(code, &bytes)
}

fn list(store: &KvStore) -> Result<Vec<Merchant>, ServiceError> {
    let mut merchants = Vec::new();
    store.scan_all(|key, value| {
        let merchant = Merchant::decode(value).map_err(|e| {
            ServiceError::Storage(format!("undecodable record {}: {e}", String::from_utf8_lossy(key)))
        })?;
        merchants.push(merchant);
        Ok::<_, ServiceError>(())
    })?;
    Ok(merchants)
}

fn update(store: &KvStore, code: &str, mutation: MerchantMutation) -> Result<Merchant, ServiceError> {
    store.update(code.as_bytes(), |current: Option<&[u8]>| -> Result<(Vec<u8>, Merchant), ServiceError> {
        let bytes = current.ok_or_else(|| ServiceError::not_found("merchant"))?;
        let mut merchant = decode_stored(code, bytes)?;
        mutation(&mut merchant)?;
        let next = merchant.encode()?;
        Ok((next, merchant))
    })
}

/// A record that no longer decodes is reported as a missing merchant.
fn decode_stored(code: &str, bytes: &[u8]) -> Result<Merchant, ServiceError> {
    Merchant::decode(bytes).map_err(|e| {
        warn!(%code, error = %e, "stored merchant could not be decoded");
        ServiceError::not_found("merchant")
    })
}
