// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Svcgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Durable storage for saved diagrams.
//!
//! A store is a key-value map from diagram id to the full saved record. Two backends ship:
//! - [`MemoryStore`]: in-process, for tests and ephemeral sessions.
//! - [`DiagramFolder`]: one JSON file per diagram under `<root>/diagrams/`.
//!
//! A missing key is `Ok(None)`, never an error; `Err` always means the medium failed.

use std::fmt;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::format::FormatError;
use crate::model::{DiagramId, SavedDiagram};

pub mod diagram_folder;
pub mod memory;

pub use diagram_folder::{DiagramFolder, WriteDurability};
pub use memory::MemoryStore;

#[async_trait]
pub trait DiagramStore: Send + Sync {
    /// Inserts or fully overwrites the record keyed by `diagram.diagram_id`.
    async fn put(&self, diagram: &SavedDiagram) -> Result<(), StoreError>;

    async fn get(&self, diagram_id: &DiagramId) -> Result<Option<SavedDiagram>, StoreError>;

    /// Every stored record, in no particular order.
    async fn get_all(&self) -> Result<Vec<SavedDiagram>, StoreError>;

    /// Removes the record if present; deleting a missing id succeeds.
    async fn delete(&self, diagram_id: &DiagramId) -> Result<(), StoreError>;
}

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidRecord {
        path: PathBuf,
        source: FormatError,
    },
    /// The record decodes but belongs to another file name.
    MisplacedRecord {
        path: PathBuf,
        diagram_id: DiagramId,
    },
    Unavailable {
        reason: String,
    },
    SymlinkRefused {
        path: PathBuf,
    },
    Background {
        source: tokio::task::JoinError,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::InvalidRecord { path, source } => {
                write!(f, "invalid diagram record at {path:?}: {source}")
            }
            Self::MisplacedRecord { path, diagram_id } => {
                write!(f, "record for diagram {diagram_id} found at {path:?}")
            }
            Self::Unavailable { reason } => write!(f, "diagram store unavailable: {reason}"),
            Self::SymlinkRefused { path } => {
                write!(f, "refusing to write through symlink at {path:?}")
            }
            Self::Background { source } => write!(f, "store task failed: {source}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidRecord { source, .. } => Some(source),
            Self::Background { source } => Some(source),
            Self::MisplacedRecord { .. }
            | Self::Unavailable { .. }
            | Self::SymlinkRefused { .. } => None,
        }
    }
}
