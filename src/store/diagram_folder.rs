// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Svcgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use log::warn;

use super::{DiagramStore, StoreError};
use crate::format::{record_from_json, record_to_json, DiagramRecordJson};
use crate::model::{DiagramId, SavedDiagram};

const DIAGRAMS_DIR: &str = "diagrams";
const RECORD_EXTENSION: &str = "json";

/// Folder-backed diagram store: `<root>/diagrams/<id>.json`, one record per file.
#[derive(Debug, Clone)]
pub struct DiagramFolder {
    root: PathBuf,
    durability: WriteDurability,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush written file contents and rename operations to stable storage where
    /// possible. Exact guarantees are platform/filesystem-dependent.
    Durable,
}

impl DiagramFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn diagrams_dir(&self) -> PathBuf {
        self.root.join(DIAGRAMS_DIR)
    }

    pub fn diagram_path(&self, diagram_id: &DiagramId) -> PathBuf {
        let file_stem = encode_persisted_id_segment(diagram_id.as_str());
        self.diagrams_dir()
            .join(format!("{file_stem}.{RECORD_EXTENSION}"))
    }

    pub fn put_blocking(&self, diagram: &SavedDiagram) -> Result<(), StoreError> {
        let path = self.diagram_path(&diagram.diagram_id);
        let mut contents = serde_json::to_vec_pretty(&record_to_json(diagram)).map_err(|source| {
            StoreError::Json {
                path: path.clone(),
                source,
            }
        })?;
        contents.push(b'\n');

        let dir = self.diagrams_dir();
        ensure_diagrams_dir(&self.root, &dir)?;
        write_record_atomic(&dir, &path, &contents, self.durability)
    }

    pub fn get_blocking(&self, diagram_id: &DiagramId) -> Result<Option<SavedDiagram>, StoreError> {
        let path = self.diagram_path(diagram_id);
        match fs::read_to_string(&path) {
            Ok(text) => self.read_record(&path, &text).map(Some),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    /// Reads every record in the diagrams folder. Files that fail to decode, or whose id does not
    /// match their file name, are logged and skipped so one bad file cannot hide the others.
    pub fn get_all_blocking(&self) -> Result<Vec<SavedDiagram>, StoreError> {
        let dir = self.diagrams_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StoreError::Io { path: dir, source }),
        };

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            let is_record = path
                .extension()
                .is_some_and(|extension| extension == RECORD_EXTENSION);
            let is_temp = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with('.'));
            if is_record && !is_temp {
                paths.push(path);
            }
        }
        paths.sort();

        let mut diagrams = Vec::with_capacity(paths.len());
        for path in paths {
            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(source) => return Err(StoreError::Io { path, source }),
            };
            match self.read_record(&path, &text) {
                Ok(diagram) => diagrams.push(diagram),
                Err(err) => warn!("skipping unreadable diagram record: {err}"),
            }
        }
        Ok(diagrams)
    }

    pub fn delete_blocking(&self, diagram_id: &DiagramId) -> Result<(), StoreError> {
        let path = self.diagram_path(diagram_id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn read_record(&self, path: &Path, text: &str) -> Result<SavedDiagram, StoreError> {
        let record: DiagramRecordJson =
            serde_json::from_str(text).map_err(|source| StoreError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        let diagram = record_from_json(record).map_err(|source| StoreError::InvalidRecord {
            path: path.to_path_buf(),
            source,
        })?;

        // A copied or renamed file would be listed under an id that get/delete cannot reach.
        if self.diagram_path(&diagram.diagram_id) != path {
            return Err(StoreError::MisplacedRecord {
                path: path.to_path_buf(),
                diagram_id: diagram.diagram_id,
            });
        }
        Ok(diagram)
    }

    async fn run_blocking<T, F>(&self, job: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(DiagramFolder) -> Result<T, StoreError> + Send + 'static,
    {
        let folder = self.clone();
        tokio::task::spawn_blocking(move || job(folder))
            .await
            .map_err(|source| StoreError::Background { source })?
    }
}

#[async_trait]
impl DiagramStore for DiagramFolder {
    async fn put(&self, diagram: &SavedDiagram) -> Result<(), StoreError> {
        let diagram = diagram.clone();
        self.run_blocking(move |folder| folder.put_blocking(&diagram))
            .await
    }

    async fn get(&self, diagram_id: &DiagramId) -> Result<Option<SavedDiagram>, StoreError> {
        let diagram_id = diagram_id.clone();
        self.run_blocking(move |folder| folder.get_blocking(&diagram_id))
            .await
    }

    async fn get_all(&self) -> Result<Vec<SavedDiagram>, StoreError> {
        self.run_blocking(|folder| folder.get_all_blocking()).await
    }

    async fn delete(&self, diagram_id: &DiagramId) -> Result<(), StoreError> {
        let diagram_id = diagram_id.clone();
        self.run_blocking(move |folder| folder.delete_blocking(&diagram_id))
            .await
    }
}

// File stem encoding and atomic write helpers.
include!("diagram_folder/helpers.rs");
