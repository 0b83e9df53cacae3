//! Record Store - flat CSV persistence for typed record collections.
//!
//! Each collection lives in its own file under the data directory with a stable
//! header row. Loading parses rows straight into the strongly-typed entity
//! records, so nothing past this module ever handles raw string rows. Saving is
//! a whole-collection overwrite that goes through a temporary file in the same
//! directory and an atomic rename, so a crash mid-save never truncates the
//! previous contents.

/// In-memory mirror of one collection with construct-then-commit updates
pub mod table;

pub use table::{Table, commit_pair};

use crate::errors::{Error, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Serialize, de::DeserializeOwned};
use std::{
    fs::{self, File},
    io::{BufReader, ErrorKind},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// The five persisted tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Buyer accounts
    Buyers,
    /// Company accounts
    Companies,
    /// Catalog items
    Items,
    /// Active orders
    Orders,
    /// Collected orders
    OrderHistory,
}

impl Collection {
    /// File name of this collection inside the data directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Buyers => "buyers.csv",
            Self::Companies => "companies.csv",
            Self::Items => "items.csv",
            Self::Orders => "orders.csv",
            Self::OrderHistory => "order_history.csv",
        }
    }
}

/// A typed row of one collection.
///
/// `HEADER` must list the serialized field names in declaration order; it is
/// written as the header row and checked when loading.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Collection the record is stored in
    const COLLECTION: Collection;
    /// Column names, in field order
    const HEADER: &'static [&'static str];

    /// Unique identifier of the record within its collection
    fn id(&self) -> i64;
}

/// Returns `max(id) + 1`, or 1 for an empty collection.
#[must_use]
pub fn next_id<R: Record>(records: &[R]) -> i64 {
    records.iter().map(Record::id).max().map_or(1, |max| max + 1)
}

/// File-backed store for all collections under one data directory.
#[derive(Debug, Clone)]
pub struct RecordStore {
    data_dir: PathBuf,
}

impl RecordStore {
    /// Opens the store, creating the data directory if needed.
    pub fn open<P: Into<PathBuf>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        info!("Record store opened at {:?}", data_dir);
        Ok(Self { data_dir })
    }

    /// Directory holding the collection files.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Full path of a collection file.
    #[must_use]
    pub fn path_of(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }

    /// Loads every record of a collection.
    ///
    /// An absent (or completely empty) file is the first-run case and yields an
    /// empty collection. Extra columns are ignored; a missing required column or
    /// an unparseable value fails the load.
    pub fn load<R: Record>(&self) -> Result<Vec<R>> {
        let path = self.path_of(R::COLLECTION);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{:?} does not exist yet, starting empty", path);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut reader = ReaderBuilder::new().from_reader(BufReader::new(file));
        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Ok(Vec::new());
        }

        let missing: Vec<&str> = R::HEADER
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|h| h == *column))
            .collect();
        if !missing.is_empty() {
            return Err(Error::Store {
                path,
                message: format!("missing columns: {}", missing.join(", ")),
            });
        }

        let mut records = Vec::new();
        for (index, row) in reader.deserialize::<R>().enumerate() {
            // Header is line 1
            let record = row.map_err(|e| Error::Store {
                path: path.clone(),
                message: format!("line {}: {e}", index + 2),
            })?;
            records.push(record);
        }

        debug!("Loaded {} records from {:?}", records.len(), path);
        Ok(records)
    }

    /// Replaces the whole collection on disk with `records`.
    pub fn save<R: Record>(&self, records: &[R]) -> Result<()> {
        let path = self.path_of(R::COLLECTION);
        let tmp = NamedTempFile::new_in(&self.data_dir)?;

        {
            let mut writer = WriterBuilder::new()
                .has_headers(false)
                .from_writer(tmp.as_file());
            writer.write_record(R::HEADER)?;
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;

        tmp.persist(&path).map_err(|e| Error::Io(e.error))?;
        debug!("Saved {} records to {:?}", records.len(), path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{Company, Item};
    use crate::test_utils::sample_item;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_empty() -> Result<()> {
        let dir = TempDir::new()?;
        let store = RecordStore::open(dir.path())?;

        let items: Vec<Item> = store.load()?;
        assert!(items.is_empty());
        Ok(())
    }

    #[test]
    fn test_save_and_reload_round_trip() -> Result<()> {
        let dir = TempDir::new()?;
        let store = RecordStore::open(dir.path())?;

        let mut second = sample_item(2, "Gadget, large", Decimal::new(1999, 2), 0);
        second.description = "Says \"hello\"\nover two lines".to_string();
        second.delivery_eligible = false;
        let items = vec![sample_item(1, "Widget", Decimal::new(1000, 2), 5), second];

        store.save(&items)?;
        let reloaded: Vec<Item> = store.load()?;
        assert_eq!(reloaded, items);
        Ok(())
    }

    #[test]
    fn test_save_empty_writes_header() -> Result<()> {
        let dir = TempDir::new()?;
        let store = RecordStore::open(dir.path())?;

        store.save::<Company>(&[])?;
        let contents = fs::read_to_string(store.path_of(Collection::Companies))?;
        assert_eq!(contents.trim_end(), "id,login,password");

        let companies: Vec<Company> = store.load()?;
        assert!(companies.is_empty());
        Ok(())
    }

    #[test]
    fn test_save_overwrites_previous_contents() -> Result<()> {
        let dir = TempDir::new()?;
        let store = RecordStore::open(dir.path())?;

        store.save(&[
            sample_item(1, "A", Decimal::ONE, 1),
            sample_item(2, "B", Decimal::ONE, 1),
        ])?;
        store.save(&[sample_item(3, "C", Decimal::ONE, 1)])?;

        let items: Vec<Item> = store.load()?;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 3);
        Ok(())
    }

    #[test]
    fn test_extra_columns_are_tolerated() -> Result<()> {
        let dir = TempDir::new()?;
        let store = RecordStore::open(dir.path())?;
        fs::write(
            store.path_of(Collection::Companies),
            "id,login,password,notes\n4,acme,secret,whatever\n",
        )?;

        let companies: Vec<Company> = store.load()?;
        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].login, "acme");
        Ok(())
    }

    #[test]
    fn test_missing_column_fails_load() -> Result<()> {
        let dir = TempDir::new()?;
        let store = RecordStore::open(dir.path())?;
        fs::write(store.path_of(Collection::Companies), "id,login\n1,acme\n")?;

        let result = store.load::<Company>();
        assert!(matches!(result, Err(Error::Store { .. })));
        Ok(())
    }

    #[test]
    fn test_unparseable_value_reports_line() -> Result<()> {
        let dir = TempDir::new()?;
        let store = RecordStore::open(dir.path())?;
        fs::write(
            store.path_of(Collection::Companies),
            "id,login,password\n1,acme,pw\nnot-a-number,other,pw\n",
        )?;

        match store.load::<Company>() {
            Err(Error::Store { message, .. }) => assert!(message.starts_with("line 3")),
            other => panic!("expected store error, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_next_id() {
        assert_eq!(next_id::<Item>(&[]), 1);
        let items = vec![
            sample_item(3, "A", Decimal::ONE, 1),
            sample_item(7, "B", Decimal::ONE, 1),
            sample_item(5, "C", Decimal::ONE, 1),
        ];
        assert_eq!(next_id(&items), 8);
    }

    #[test]
    fn test_no_temp_files_left_behind() -> Result<()> {
        let dir = TempDir::new()?;
        let store = RecordStore::open(dir.path())?;
        store.save(&[sample_item(1, "A", Decimal::ONE, 1)])?;

        let names: Vec<String> = fs::read_dir(dir.path())?
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["items.csv".to_string()]);
        Ok(())
    }
}
