//! Saving and loading envelopes to files
//!
//! `save`/`load` swallow failures after logging them; `try_save`/`try_load`
//! report them.

use std::fs;
use std::path::Path;

use crate::bitgrid::BitGrid;
use crate::error::Result;
use crate::{CompressionMethod, Compressor};

impl Compressor {
    /// Write `grid` to `path` as an envelope, reporting failures.
    pub fn try_save(
        &self,
        grid: &BitGrid,
        path: impl AsRef<Path>,
        method: CompressionMethod,
    ) -> Result<()> {
        let envelope = self.compress(grid, method)?;
        fs::write(path.as_ref(), &envelope)?;
        tracing::debug!(path = %path.as_ref().display(), bytes = envelope.len(), "saved grid");
        Ok(())
    }

    /// Read an envelope from `path` into a new grid, reporting failures.
    pub fn try_load(&self, path: impl AsRef<Path>) -> Result<BitGrid> {
        let envelope = fs::read(path.as_ref())?;
        self.decompress(&envelope)
    }

    /// Write `grid` to `path`. Failures are logged and otherwise ignored.
    pub fn save(&self, grid: &BitGrid, path: impl AsRef<Path>, method: CompressionMethod) {
        let path = path.as_ref();
        if let Err(err) = self.try_save(grid, path, method) {
            tracing::warn!(path = %path.display(), error = %err, "failed to save grid");
        }
    }

    /// Replace `grid` with the envelope stored at `path`. Failures are logged
    /// and leave `grid` as it was.
    pub fn load(&self, grid: &mut BitGrid, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match self.try_load(path) {
            Ok(loaded) => *grid = loaded,
            Err(err) => tracing::warn!(path = %path.display(), error = %err, "failed to load grid"),
        }
    }
}

impl BitGrid {
    pub fn save(&self, path: impl AsRef<Path>, method: CompressionMethod) {
        Compressor::default().save(self, path, method);
    }

    /// Save with the configured default method (run-length coding).
    pub fn save_default(&self, path: impl AsRef<Path>) {
        let compressor = Compressor::default();
        compressor.save(self, path, compressor.config().default_method);
    }

    pub fn load(&mut self, path: impl AsRef<Path>) {
        Compressor::default().load(self, path);
    }
}
