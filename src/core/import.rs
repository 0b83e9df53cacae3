//! Bulk item import from an external CSV file.
//!
//! The file must carry every column in [`REQUIRED_COLUMNS`]; otherwise nothing
//! is imported. Individual rows that fail to decode or validate are skipped
//! and reported while the rest go in. Pictures referenced by the `image` column are copied
//! into the images directory; a failed copy only leaves that item without a
//! picture.

use super::{
    Shop, ShopEvent,
    catalog::{NewItem, build_item},
};
use crate::errors::{Error, Result};
use csv::{ReaderBuilder, StringRecord};
use std::{
    fs,
    io::Read,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Columns an import file must provide.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "name",
    "price",
    "stock",
    "delivery_eligible",
    "description",
    "image",
];

/// One data row of an import file, by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportRow {
    /// 1-based line number in the source file
    pub line: usize,
    /// Item name
    pub name: String,
    /// Price text
    pub price: String,
    /// Stock text
    pub stock: String,
    /// Yes/no delivery flag text
    pub delivery_eligible: String,
    /// Free-form description
    pub description: String,
    /// Path of the picture to copy in, may be empty
    pub image: String,
}

/// A row that was skipped, and why.
#[derive(Debug)]
pub struct RowError {
    /// 1-based line number in the source file
    pub line: usize,
    /// Why the row was left out
    pub error: Error,
}

/// A decoded row, or the reason it could not be decoded.
pub type ParsedRow = std::result::Result<ImportRow, RowError>;

/// Outcome of an import.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Number of items added to the catalog
    pub imported: usize,
    /// Rows left out
    pub skipped: Vec<RowError>,
}

/// Parses the yes/no delivery flag of an import row.
///
/// # Errors
/// Returns `InvalidField("delivery_eligible")` for anything unrecognised.
pub fn parse_delivery_flag(input: &str) -> Result<bool> {
    match input.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "да" => Ok(true),
        "false" | "no" | "n" | "0" | "нет" => Ok(false),
        _ => Err(Error::InvalidField {
            field: "delivery_eligible",
        }),
    }
}

/// Reads and checks an import file, returning its rows.
///
/// Rows that cannot be decoded (bad UTF-8, broken quoting) come back as
/// [`RowError`]s so the remaining rows can still be imported.
///
/// # Errors
/// Returns `MissingColumns` naming every required column the header lacks, or
/// a CSV/IO error if the header cannot be read.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<ParsedRow>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| (*column).to_string())
        .collect();
    if !missing.is_empty() {
        missing.sort();
        return Err(Error::MissingColumns { columns: missing });
    }

    let column = |record: &StringRecord, name: &str| -> String {
        headers
            .iter()
            .position(|h| h == name)
            .and_then(|index| record.get(index))
            .unwrap_or_default()
            .to_string()
    };

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let line = index + 2;
        let row = match record {
            Ok(record) => Ok(ImportRow {
                line,
                name: column(&record, "name"),
                price: column(&record, "price"),
                stock: column(&record, "stock"),
                delivery_eligible: column(&record, "delivery_eligible"),
                description: column(&record, "description"),
                image: column(&record, "image"),
            }),
            Err(e) => {
                warn!("Import line {} could not be decoded: {}", line, e);
                Err(RowError {
                    line,
                    error: Error::Csv(e),
                })
            }
        };
        rows.push(row);
    }
    Ok(rows)
}

/// Copies an item picture into `images_dir`, returning the stored path.
///
/// A picture already inside `images_dir` is kept where it is. Returns an
/// empty string when there is no picture or the copy fails.
fn store_image(source: &str, images_dir: &Path) -> String {
    if source.is_empty() {
        return String::new();
    }
    let source = Path::new(source);
    let Some(file_name) = source.file_name() else {
        warn!("Image path {:?} has no file name, skipping", source);
        return String::new();
    };

    let target: PathBuf = images_dir.join(file_name);
    if is_same_file(source, &target) {
        debug!("Image {:?} is already in place", target);
        return target.to_string_lossy().into_owned();
    }
    match fs::create_dir_all(images_dir).and_then(|()| fs::copy(source, &target)) {
        Ok(_) => target.to_string_lossy().into_owned(),
        Err(e) => {
            warn!("Could not copy image {:?}: {}", source, e);
            String::new()
        }
    }
}

/// True when both paths resolve to the same existing file.
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Adds every valid row to the catalog under `owner_id`, in one write.
///
/// Each accepted row gets a fresh ID. Invalid rows are reported in the
/// returned [`ImportReport`] and do not stop the others.
///
/// # Errors
/// Only fails if the catalog cannot be written, in which case nothing is
/// imported.
pub fn import_batch(shop: &mut Shop, owner_id: i64, rows: Vec<ParsedRow>) -> Result<ImportReport> {
    let mut staged = shop.items.staged();
    let mut next_id = shop.items.next_id();
    let mut report = ImportReport::default();

    for row in rows {
        let row = match row {
            Ok(row) => row,
            Err(skipped) => {
                report.skipped.push(skipped);
                continue;
            }
        };
        let delivery_eligible = match parse_delivery_flag(&row.delivery_eligible) {
            Ok(flag) => flag,
            Err(error) => {
                report.skipped.push(RowError {
                    line: row.line,
                    error,
                });
                continue;
            }
        };

        let fields = NewItem {
            name: row.name,
            price: row.price,
            stock: row.stock,
            description: row.description,
            delivery_eligible,
            image_path: String::new(),
        };
        match build_item(next_id, owner_id, fields) {
            Ok(mut item) => {
                item.image_path = store_image(&row.image, &shop.settings.images_dir);
                staged.push(item);
                next_id += 1;
                report.imported += 1;
            }
            Err(error) => report.skipped.push(RowError {
                line: row.line,
                error,
            }),
        }
    }

    if report.imported > 0 {
        shop.items.commit(&shop.store, staged)?;
        shop.notify(ShopEvent::ItemsChanged);
    }

    info!(
        "Imported {} items for company {}, skipped {} rows",
        report.imported,
        owner_id,
        report.skipped.len()
    );
    Ok(report)
}

/// Reads an import file from disk and imports it.
///
/// # Errors
/// Returns `MissingColumns` if the header is incomplete, an IO/CSV error if
/// the file cannot be read, or a store error if the catalog cannot be written.
pub fn import_file<P: AsRef<Path>>(shop: &mut Shop, owner_id: i64, path: P) -> Result<ImportReport> {
    let file = fs::File::open(path.as_ref())?;
    let rows = read_rows(file)?;
    import_batch(shop, owner_id, rows)
}
