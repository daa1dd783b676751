use std::path::{Path, PathBuf};

use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use tracing::{debug, info};

use super::KvError;

/// The single table holding every merchant record, keyed by the raw code bytes.
const MERCHANTS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("merchants");

/// Embedded, transactional, ordered key-value store backed by redb.
///
/// Every call runs in its own transaction. Write transactions are serialized by
/// redb and committed with immediate durability, so a successful return means the
/// data is on disk. [`KvStore::update`] and [`KvStore::insert_new`] run their read
/// and write inside one write transaction.
pub struct KvStore {
    db: Database,
    path: PathBuf,
    fresh: bool,
}

impl KvStore {
    /// Open the store at `path`. A missing file is created when `create_if_absent`
    /// is set, otherwise the call fails with [`KvError::Unavailable`].
    pub fn open<P: AsRef<Path>>(path: P, create_if_absent: bool) -> Result<Self, KvError> {
        let path = path.as_ref().to_path_buf();
        let fresh = !path.exists();
        let db = if fresh {
            if !create_if_absent {
                return Err(KvError::Unavailable(format!("{} does not exist", path.display())));
            }
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .map_err(|e| KvError::Unavailable(format!("cannot create {}: {e}", parent.display())))?;
            }
            Database::create(&path)?
        } else {
            Database::open(&path)?
        };

        // make sure the table exists so read transactions never see it missing
        let txn = db.begin_write()?;
        txn.open_table(MERCHANTS)?;
        txn.commit()?;

        info!(path = %path.display(), fresh, "kv store opened");
        Ok(Self { db, path, fresh })
    }

    /// Whether [`KvStore::open`] had to create the backing file.
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the store. With `drop_all` every stored entry is erased first.
    pub fn close(self, drop_all: bool) -> Result<(), KvError> {
        if drop_all {
            let txn = self.db.begin_write()?;
            txn.delete_table(MERCHANTS)?;
            txn.commit()?;
            info!(path = %self.path.display(), "kv store dropped all entries");
        }
        debug!(path = %self.path.display(), "kv store closed");
        Ok(())
    }

    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>, KvError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(MERCHANTS)?;
        let value = table.get(key)?.map(|v| v.value().to_vec());
        value.ok_or(KvError::NotFound)
    }

    /// Upsert `value` under `key`.
    pub fn set(&self, key: &[u8], value: &[u8]) -> Result<(), KvError> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(MERCHANTS)?;
            table.insert(key, value)?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Insert `value` only when `key` is absent; fails with [`KvError::Exists`] otherwise.
    pub fn insert_new(&self, key: &[u8], value: &[u8]) -> Result<(), KvError> {
        let txn = self.db.begin_write()?;
        let exists = {
            let mut table = txn.open_table(MERCHANTS)?;
            let exists = table.get(key)?.is_some();
            if !exists {
                table.insert(key, value)?;
            }
            exists
        };
        if exists {
            txn.abort()?;
            return Err(KvError::Exists);
        }
        txn.commit()?;
        Ok(())
    }

    /// Remove `key`. Removing an absent key is not an error.
    pub fn delete(&self, key: &[u8]) -> Result<(), KvError> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(MERCHANTS)?;
            table.remove(key)?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Read-modify-write of one key inside a single write transaction.
    ///
    /// `f` sees the current value (if any) and returns the replacement bytes plus
    /// an output passed back to the caller. When `f` fails nothing is written.
    pub fn update<T, E, F>(&self, key: &[u8], f: F) -> Result<T, E>
    where
        F: FnOnce(Option<&[u8]>) -> Result<(Vec<u8>, T), E>,
        E: From<KvError>,
    {
        let txn = self.db.begin_write().map_err(KvError::from)?;
        let outcome = {
            let mut table = txn.open_table(MERCHANTS).map_err(KvError::from)?;
            let current = table.get(key).map_err(KvError::from)?.map(|v| v.value().to_vec());
            match f(current.as_deref()) {
                Ok((next, out)) => {
                    table.insert(key, next.as_slice()).map_err(KvError::from)?;
                    Ok(out)
                }
                Err(e) => Err(e),
            }
        };
        match outcome {
            Ok(out) => {
                txn.commit().map_err(KvError::from)?;
                Ok(out)
            }
            Err(e) => {
                txn.abort().map_err(KvError::from)?;
                Err(e)
            }
        }
    }

    /// Visit every entry in ascending key order within one read transaction.
    /// Returning an error from `visit` stops the scan.
    pub fn scan_all<E, F>(&self, mut visit: F) -> Result<(), E>
    where
        F: FnMut(&[u8], &[u8]) -> Result<(), E>,
        E: From<KvError>,
    {
        let txn = self.db.begin_read().map_err(KvError::from)?;
        let table = txn.open_table(MERCHANTS).map_err(KvError::from)?;
        for entry in table.iter().map_err(KvError::from)? {
            let (key, value) = entry.map_err(KvError::from)?;
            visit(key.value(), value.value())?;
        }
        Ok(())
    }

    pub fn len(&self) -> Result<u64, KvError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(MERCHANTS)?;
        Ok(table.len()?)
    }

    pub fn is_empty(&self) -> Result<bool, KvError> {
        Ok(self.len()? == 0)
    }
}
