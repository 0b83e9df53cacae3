use super::{Record, RecordStore, next_id};
use crate::errors::{Error, Result};
use tracing::{error, warn};

/// In-memory mirror of a persisted collection.
///
/// The mirror only changes through [`Table::commit`], which writes the new
/// contents first and swaps them in afterwards. A failed write leaves both the
/// file and the mirror as they were.
#[derive(Debug, Clone)]
pub struct Table<R> {
    records: Vec<R>,
}

impl<R: Record> Table<R> {
    /// Loads the collection from the store.
    ///
    /// # Errors
    /// Fails if the collection file exists but cannot be parsed.
    pub fn load(store: &RecordStore) -> Result<Self> {
        Ok(Self {
            records: store.load()?,
        })
    }

    /// Current records, in stored order.
    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Identifier the next appended record should use.
    #[must_use]
    pub fn next_id(&self) -> i64 {
        next_id(&self.records)
    }

    /// Clone of the current records, to build the next version from.
    #[must_use]
    pub fn staged(&self) -> Vec<R> {
        self.records.clone()
    }

    /// Persists `records` and makes them the current contents.
    ///
    /// # Errors
    /// Fails if the file cannot be written; the mirror is left unchanged.
    pub fn commit(&mut self, store: &RecordStore, records: Vec<R>) -> Result<()> {
        store.save(&records)?;
        self.records = records;
        Ok(())
    }
}

/// Commits two collections that must change together.
///
/// `first` is written before `second`. If `second` cannot be written, the
/// previous contents of `first` are written back so the files stay consistent
/// with each other, and the original error is returned.
///
/// # Errors
/// Returns the error of the failed write. If restoring `first` fails as well,
/// `first` keeps its new contents on disk and in memory, and the returned
/// `Store` error names both failures.
pub fn commit_pair<A: Record, B: Record>(
    store: &RecordStore,
    first: &mut Table<A>,
    first_records: Vec<A>,
    second: &mut Table<B>,
    second_records: Vec<B>,
) -> Result<()> {
    let previous = first.staged();
    first.commit(store, first_records)?;

    if let Err(e) = second.commit(store, second_records) {
        warn!("Second write failed, restoring {:?}: {}", A::COLLECTION, e);
        if let Err(restore_err) = first.commit(store, previous) {
            error!(
                "Could not restore {:?} after failed write: {}",
                A::COLLECTION,
                restore_err
            );
            return Err(Error::Store {
                path: store.path_of(A::COLLECTION),
                message: format!(
                    "write of {:?} failed ({e}) and restoring this file also failed ({restore_err}); the two files are out of step",
                    B::COLLECTION
                ),
            });
        }
        return Err(e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Company, Item};
    use crate::store::Collection;
    use crate::test_utils::sample_item;
    use rust_decimal::Decimal;
    use serde::{Deserialize, Serialize, Serializer, ser::SerializeStruct};
    use std::fs;
    use tempfile::TempDir;

    /// Record that refuses to serialize while `locked` is set.
    #[derive(Debug, Clone, Deserialize)]
    struct Lockable {
        id: i64,
        locked: bool,
    }

    impl Serialize for Lockable {
        fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
            if self.locked {
                return Err(serde::ser::Error::custom("record is locked"));
            }
            let mut state = serializer.serialize_struct("Lockable", 2)?;
            state.serialize_field("id", &self.id)?;
            state.serialize_field("locked", &self.locked)?;
            state.end()
        }
    }

    impl Record for Lockable {
        const COLLECTION: Collection = Collection::Buyers;
        const HEADER: &'static [&'static str] = &["id", "locked"];

        fn id(&self) -> i64 {
            self.id
        }
    }

    #[test]
    fn test_commit_updates_file_and_mirror() -> Result<()> {
        let dir = TempDir::new()?;
        let store = RecordStore::open(dir.path())?;
        let mut items: Table<Item> = Table::load(&store)?;
        assert_eq!(items.next_id(), 1);

        let mut staged = items.staged();
        staged.push(sample_item(items.next_id(), "Widget", Decimal::TEN, 5));
        items.commit(&store, staged)?;

        assert_eq!(items.records().len(), 1);
        assert_eq!(items.next_id(), 2);
        assert_eq!(store.load::<Item>()?, items.records());
        Ok(())
    }

    #[test]
    fn test_failed_commit_leaves_mirror_untouched() -> Result<()> {
        let dir = TempDir::new()?;
        let store = RecordStore::open(dir.path())?;
        let mut items: Table<Item> = Table::load(&store)?;
        items.commit(&store, vec![sample_item(1, "Widget", Decimal::TEN, 5)])?;

        // A directory in place of the target file makes the rename fail
        fs::remove_file(store.path_of(Item::COLLECTION))?;
        fs::create_dir(store.path_of(Item::COLLECTION))?;

        let result = items.commit(&store, Vec::new());
        assert!(matches!(result, Err(Error::Io(_))));
        assert_eq!(items.records().len(), 1);
        Ok(())
    }

    #[test]
    fn test_commit_pair_restores_first_on_second_failure() -> Result<()> {
        let dir = TempDir::new()?;
        let store = RecordStore::open(dir.path())?;
        let mut items: Table<Item> = Table::load(&store)?;
        let mut companies: Table<Company> = Table::load(&store)?;
        items.commit(&store, vec![sample_item(1, "Widget", Decimal::TEN, 5)])?;

        fs::create_dir(store.path_of(Company::COLLECTION))?;

        let mut changed = items.staged();
        changed[0].stock = 2;
        let result = commit_pair(
            &store,
            &mut items,
            changed,
            &mut companies,
            vec![Company {
                id: 1,
                login: "acme".to_string(),
                password: "pw".to_string(),
            }],
        );

        assert!(result.is_err());
        assert_eq!(items.records()[0].stock, 5);
        assert_eq!(store.load::<Item>()?[0].stock, 5);
        assert!(companies.records().is_empty());
        Ok(())
    }

    #[test]
    fn test_commit_pair_reports_failed_restore() -> Result<()> {
        let dir = TempDir::new()?;
        let store = RecordStore::open(dir.path())?;
        // The current contents cannot be written back, so the restore fails
        let mut first = Table {
            records: vec![Lockable { id: 1, locked: true }],
        };
        let mut companies: Table<Company> = Table::load(&store)?;
        fs::create_dir(store.path_of(Company::COLLECTION))?;

        let result = commit_pair(
            &store,
            &mut first,
            vec![Lockable { id: 1, locked: false }],
            &mut companies,
            Vec::new(),
        );

        match result {
            Err(Error::Store { path, message }) => {
                assert_eq!(path, store.path_of(Collection::Buyers));
                assert!(message.contains("Companies"));
                assert!(message.contains("restoring"));
            }
            other => panic!("expected a Store error, got {other:?}"),
        }
        assert!(!first.records()[0].locked);
        assert!(companies.records().is_empty());
        Ok(())
    }
}
