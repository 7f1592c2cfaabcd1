//! Loading the payments dataset once per process.
//!
//! A [`DataSource`] knows how to fetch and parse the dataset. [`DatasetCache`]
//! wraps a source fetch so that it runs at most once: the first successful
//! load is kept for the lifetime of the cache and every later call hands out
//! the same [`Arc`]. Failed loads are not cached, so the next call fetches
//! again. [`load_data`] goes through a process-wide cache instance.

use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use encoding_rs::Encoding;
use log::{debug, info};

use crate::{dataset::Dataset, error::DataLoadError, io_utils, location::DataLocation};

pub trait DataSource {
    /// Human readable origin, used in log lines.
    fn describe(&self) -> String;

    fn fetch(&self) -> Result<Dataset, DataLoadError>;
}

/// Delimited text at a [`DataLocation`].
#[derive(Debug, Clone)]
pub struct CsvSource {
    location: DataLocation,
    delimiter: u8,
    encoding: &'static Encoding,
}

impl CsvSource {
    pub fn new(location: DataLocation, delimiter: Option<u8>, encoding: &'static Encoding) -> Self {
        let delimiter = io_utils::resolve_input_delimiter(&location, delimiter);
        Self {
            location,
            delimiter,
            encoding,
        }
    }

    pub fn location(&self) -> &DataLocation {
        &self.location
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }
}

impl DataSource for CsvSource {
    fn describe(&self) -> String {
        self.location.to_string()
    }

    fn fetch(&self) -> Result<Dataset, DataLoadError> {
        debug!(
            "Reading {} with delimiter '{}' and encoding {}",
            self.location,
            crate::printable_delimiter(self.delimiter),
            self.encoding.name()
        );
        let input = self.location.open()?;
        let mut reader = io_utils::open_csv_reader(input, self.delimiter);
        Dataset::from_csv_reader(&mut reader, self.encoding)
    }
}

#[derive(Debug, Default)]
pub struct DatasetCache {
    dataset: OnceLock<Arc<Dataset>>,
    init: Mutex<()>,
}

impl DatasetCache {
    pub const fn new() -> Self {
        Self {
            dataset: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    /// The cached dataset, if a load has already succeeded.
    pub fn get(&self) -> Option<Arc<Dataset>> {
        self.dataset.get().cloned()
    }

    pub fn get_or_load<S>(&self, source: &S) -> Result<Arc<Dataset>, DataLoadError>
    where
        S: DataSource + ?Sized,
    {
        if let Some(dataset) = self.dataset.get() {
            debug!("Serving cached dataset ({} row(s))", dataset.len());
            return Ok(Arc::clone(dataset));
        }

        // Serialize first loads; a concurrent caller may have finished while
        // this one waited.
        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(dataset) = self.dataset.get() {
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(source.fetch()?);
        info!(
            "Loaded {} payment row(s) from {}",
            dataset.len(),
            source.describe()
        );
        Ok(Arc::clone(self.dataset.get_or_init(|| dataset)))
    }
}

static DATASET: DatasetCache = DatasetCache::new();

/// Loads the dataset through the process-wide cache. Only the first
/// successful source is ever fetched; later calls return that dataset
/// regardless of the source they pass.
pub fn load_data<S>(source: &S) -> Result<Arc<Dataset>, DataLoadError>
where
    S: DataSource + ?Sized,
{
    DATASET.get_or_load(source)
}
