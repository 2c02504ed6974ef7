//! Load-once access to the shared dataset.
//!
//! The server reads the CSV on first use and hands every request the same
//! `Arc<Dataset>`. Concurrent first callers block on a guard so the file is
//! read exactly once. A failed load is not cached; the next caller retries.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};

use crate::progress::ProgressCallback;
use crate::{Dataset, DatasetError, load_incidents};

type Loader = Box<dyn Fn() -> Result<Dataset, DatasetError> + Send + Sync>;

/// Lazily loaded, shared, immutable dataset.
pub struct DatasetHandle {
    cell: OnceLock<Arc<Dataset>>,
    guard: Mutex<()>,
    loader: Loader,
}

impl DatasetHandle {
    /// Creates a handle that loads the incident CSV at `path` on first use.
    #[must_use]
    pub fn new(path: PathBuf, progress: Arc<dyn ProgressCallback>) -> Self {
        Self::with_loader(move || load_incidents(&path, &progress))
    }

    /// Creates a handle around an arbitrary loader.
    #[must_use]
    pub fn with_loader<F>(loader: F) -> Self
    where
        F: Fn() -> Result<Dataset, DatasetError> + Send + Sync + 'static,
    {
        Self {
            cell: OnceLock::new(),
            guard: Mutex::new(()),
            loader: Box::new(loader),
        }
    }

    /// Returns the dataset, loading it if no caller has yet.
    ///
    /// # Errors
    ///
    /// Returns the loader's [`DatasetError`] when loading fails.
    pub fn get(&self) -> Result<Arc<Dataset>, DatasetError> {
        if let Some(dataset) = self.cell.get() {
            return Ok(Arc::clone(dataset));
        }

        let _lock = self
            .guard
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        if let Some(dataset) = self.cell.get() {
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new((self.loader)()?);
        let _ = self.cell.set(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Whether a load has completed.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl std::fmt::Debug for DatasetHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetHandle")
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::load_incidents_from_reader;
    use crate::progress::null_progress;

    const SAMPLE: &str = include_str!("../fixtures/incidents_sample.csv");

    #[test]
    fn concurrent_first_access_loads_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handle = Arc::new(DatasetHandle::with_loader(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            load_incidents_from_reader(SAMPLE.as_bytes(), &null_progress())
        }));

        let threads = (0..8)
            .map(|_| {
                let handle = Arc::clone(&handle);
                std::thread::spawn(move || handle.get().unwrap().len())
            })
            .collect::<Vec<_>>();

        for thread in threads {
            assert_eq!(thread.join().unwrap(), 15);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callers_share_one_instance() {
        let handle =
            DatasetHandle::with_loader(|| load_incidents_from_reader(SAMPLE.as_bytes(), &null_progress()));
        let first = handle.get().unwrap();
        let second = handle.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn failed_load_is_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handle = DatasetHandle::with_loader(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(DatasetError::Schema {
                    missing: vec!["Region".to_string()],
                })
            } else {
                load_incidents_from_reader(SAMPLE.as_bytes(), &null_progress())
            }
        });

        assert!(handle.get().is_err());
        assert!(!handle.is_loaded());
        assert_eq!(handle.get().unwrap().len(), 15);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let handle = DatasetHandle::new(PathBuf::from("/nonexistent/incidents.csv"), null_progress());
        assert!(matches!(handle.get(), Err(DatasetError::Io(_))));
    }
}
