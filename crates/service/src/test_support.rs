#![cfg(test)]
use std::path::PathBuf;
use std::sync::Arc;

use uuid::Uuid;

use crate::merchant::repository::KvMerchantRepository;
use crate::storage::KvStore;

/// Unique, not yet existing store path under the system temp dir.
pub fn temp_path(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{}_{}.redb", prefix, Uuid::new_v4()))
}

/// A freshly created store plus a repository over it.
pub fn temp_repo(prefix: &str) -> Result<(Arc<KvStore>, KvMerchantRepository), anyhow::Error> {
    let store = Arc::new(KvStore::open(temp_path(prefix), true)?);
    let repo = KvMerchantRepository::new(Arc::clone(&store));
    Ok((store, repo))
}

/// Erase and close a store created by [`temp_repo`]; the repository must be dropped first.
pub fn cleanup(store: Arc<KvStore>) -> Result<(), anyhow::Error> {
    let store = Arc::try_unwrap(store).map_err(|_| anyhow::anyhow!("store still shared"))?;
    let path = store.path().to_path_buf();
    store.close(true)?;
    let _ = std::fs::remove_file(path);
    Ok(())
}
