// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Svcgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Binds the editing session to the durable diagram store.
//!
//! [`Workspace`] is the only place where session transitions and store reads/writes meet. Every
//! method takes `&mut self`, so one lifecycle operation finishes before the next one starts, and
//! a failing store call returns before any in-memory state is touched.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::format::{self, FormatError};
use crate::model::{
    sort_most_recent_first, DiagramId, DiagramSummary, EdgeOffsets, Graph, Id, NodePositions,
    Point, SavedDiagram,
};
use crate::ops::{ApplyError, ApplyResult, GraphOp};
use crate::session::{ActiveDiagram, EditorSession};
use crate::store::{DiagramStore, StoreError};

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Everything the canvas needs to show a loaded diagram, fetched in one store round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDiagram {
    pub diagram_id: DiagramId,
    pub name: String,
    pub graph: Graph,
    pub node_positions: NodePositions,
    pub edge_offsets: EdgeOffsets,
    pub rev: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedDiagram {
    /// Position of the element in the imported document.
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: Vec<DiagramSummary>,
    /// Names that already existed in the store or earlier in the same document.
    pub skipped: Vec<String>,
    pub rejected: Vec<RejectedDiagram>,
}

#[derive(Debug)]
pub enum SyncError {
    Store(StoreError),
    Apply(ApplyError),
    /// An import document that cannot be used at all.
    Validation(FormatError),
    /// Serializing an export failed.
    Format(FormatError),
    EmptyName,
    /// A canvas position or label offset that JSON cannot represent.
    InvalidLayout {
        field: &'static str,
        object_id: String,
    },
    /// The store failed partway through an import; `report` lists what was written before it.
    PartialImport {
        report: ImportReport,
        source: StoreError,
    },
    /// The stored record moved on since this session last saw it.
    Conflict {
        diagram_id: DiagramId,
        expected_rev: u64,
        found_rev: u64,
    },
}

impl SyncError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(err) => write!(f, "store error: {err}"),
            Self::Apply(err) => write!(f, "graph edit rejected: {err}"),
            Self::Validation(err) => write!(f, "invalid document: {err}"),
            Self::Format(err) => write!(f, "export failed: {err}"),
            Self::EmptyName => write!(f, "diagram name must not be empty"),
            Self::InvalidLayout { field, object_id } => {
                write!(f, "{field} for {object_id} must be finite numbers")
            }
            Self::PartialImport { report, source } => write!(
                f,
                "import stopped after {} diagrams: {source}",
                report.imported.len()
            ),
            Self::Conflict {
                diagram_id,
                expected_rev,
                found_rev,
            } => write!(
                f,
                "diagram {diagram_id} changed in the store (expected rev {expected_rev}, found {found_rev})"
            ),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) | Self::PartialImport { source: err, .. } => Some(err),
            Self::Apply(err) => Some(err),
            Self::Validation(err) | Self::Format(err) => Some(err),
            Self::EmptyName | Self::InvalidLayout { .. } | Self::Conflict { .. } => None,
        }
    }
}

impl From<StoreError> for SyncError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<ApplyError> for SyncError {
    fn from(err: ApplyError) -> Self {
        Self::Apply(err)
    }
}

pub struct Workspace {
    session: EditorSession,
    store: Arc<dyn DiagramStore>,
    clock: Clock,
}

impl fmt::Debug for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

fn normalized_name(name: &str) -> Result<String, SyncError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(SyncError::EmptyName);
    }
    Ok(name.to_owned())
}

fn check_finite<T>(
    field: &'static str,
    points: &BTreeMap<Id<T>, Point>,
) -> Result<(), SyncError> {
    match points.iter().find(|(_, point)| !point.is_finite()) {
        Some((id, _)) => Err(SyncError::InvalidLayout {
            field,
            object_id: id.to_string(),
        }),
        None => Ok(()),
    }
}

fn check_layout(
    node_positions: &NodePositions,
    edge_offsets: &EdgeOffsets,
) -> Result<(), SyncError> {
    check_finite("node position", node_positions)?;
    check_finite("edge offset", edge_offsets)
}

impl Workspace {
    pub fn new(store: Arc<dyn DiagramStore>) -> Self {
        Self::with_session(EditorSession::default(), store)
    }

    pub fn with_session(session: EditorSession, store: Arc<dyn DiagramStore>) -> Self {
        Self {
            session,
            store,
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Opens a workspace and primes the cached listing from the store.
    pub async fn open(store: Arc<dyn DiagramStore>) -> Result<Self, SyncError> {
        let mut workspace = Self::new(store);
        workspace.refresh_listing().await?;
        Ok(workspace)
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EditorSession {
        &mut self.session
    }

    pub fn store(&self) -> &Arc<dyn DiagramStore> {
        &self.store
    }

    pub fn listing(&self) -> &[DiagramSummary] {
        self.session.listing()
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Applies graph ops to the live graph; see [`EditorSession::apply`].
    pub fn apply(&mut self, ops: &[GraphOp]) -> Result<ApplyResult, SyncError> {
        Ok(self.session.apply(ops)?)
    }

    /// Re-reads the store into the cached listing, most recently updated first.
    pub async fn refresh_listing(&mut self) -> Result<&[DiagramSummary], SyncError> {
        let mut listing = self
            .store
            .get_all()
            .await?
            .iter()
            .map(SavedDiagram::summary)
            .collect::<Vec<_>>();
        sort_most_recent_first(&mut listing);
        self.session.set_listing(listing);
        Ok(self.session.listing())
    }

    /// Persists the live graph plus the canvas layout passed in by the caller.
    ///
    /// With an active diagram that still exists in the store the record is updated in place,
    /// otherwise a new record is created and becomes active.
    pub async fn save_diagram(
        &mut self,
        name: &str,
        node_positions: NodePositions,
        edge_offsets: EdgeOffsets,
    ) -> Result<DiagramSummary, SyncError> {
        let name = normalized_name(name)?;
        check_layout(&node_positions, &edge_offsets)?;
        let now = self.now();

        let stored = match self.session.active_diagram() {
            Some(active) => self
                .store
                .get(&active.diagram_id)
                .await?
                .map(|stored| (active.rev, stored)),
            None => None,
        };

        let record = match stored {
            Some((expected_rev, stored)) => {
                if stored.rev != expected_rev {
                    return Err(SyncError::Conflict {
                        diagram_id: stored.diagram_id,
                        expected_rev,
                        found_rev: stored.rev,
                    });
                }
                SavedDiagram {
                    diagram_id: stored.diagram_id,
                    name,
                    graph: self.session.graph().clone(),
                    node_positions,
                    edge_offsets,
                    created_at: stored.created_at,
                    updated_at: now,
                    rev: stored.rev + 1,
                }
            }
            None => SavedDiagram {
                diagram_id: DiagramId::generate(),
                name,
                graph: self.session.graph().clone(),
                node_positions,
                edge_offsets,
                created_at: now,
                updated_at: now,
                rev: 0,
            },
        };

        self.store.put(&record).await?;
        info!(
            "saved diagram {} ({:?}) at rev {}",
            record.diagram_id, record.name, record.rev
        );

        self.session.mark_saved(ActiveDiagram {
            diagram_id: record.diagram_id.clone(),
            rev: record.rev,
        });
        self.refresh_listing().await?;
        Ok(record.summary())
    }

    /// Replaces the live graph with a stored diagram. A missing id is `Ok(None)` and leaves the
    /// session untouched.
    pub async fn load_diagram(
        &mut self,
        diagram_id: &DiagramId,
    ) -> Result<Option<LoadedDiagram>, SyncError> {
        let Some(stored) = self.store.get(diagram_id).await? else {
            debug!("load skipped, diagram {diagram_id} is not in the store");
            return Ok(None);
        };

        self.session.install_loaded(
            stored.graph.clone(),
            ActiveDiagram {
                diagram_id: stored.diagram_id.clone(),
                rev: stored.rev,
            },
        );
        info!("loaded diagram {} ({:?})", stored.diagram_id, stored.name);

        Ok(Some(LoadedDiagram {
            diagram_id: stored.diagram_id,
            name: stored.name,
            graph: stored.graph,
            node_positions: stored.node_positions,
            edge_offsets: stored.edge_offsets,
            rev: stored.rev,
        }))
    }

    /// Deletes a stored diagram. Returns whether it was the active one; the live graph is kept
    /// either way.
    pub async fn delete_diagram(&mut self, diagram_id: &DiagramId) -> Result<bool, SyncError> {
        self.store.delete(diagram_id).await?;
        let was_active = self.session.active_diagram_id() == Some(diagram_id);
        if was_active {
            self.session.orphan_active_diagram();
        }
        info!("deleted diagram {diagram_id}");

        self.refresh_listing().await?;
        Ok(was_active)
    }

    /// Renames a stored diagram. Returns `Ok(false)` when there is no such diagram.
    pub async fn rename_diagram(
        &mut self,
        diagram_id: &DiagramId,
        name: &str,
    ) -> Result<bool, SyncError> {
        let name = normalized_name(name)?;
        let Some(mut stored) = self.store.get(diagram_id).await? else {
            return Ok(false);
        };

        stored.name = name;
        stored.updated_at = self.now();
        stored.rev += 1;
        self.store.put(&stored).await?;
        info!("renamed diagram {diagram_id} to {:?}", stored.name);

        if self.session.active_diagram_id() == Some(diagram_id) {
            self.session.set_active_rev(stored.rev);
        }
        self.refresh_listing().await?;
        Ok(true)
    }

    /// Swaps in the built-in starter topology as a new unsaved diagram. The store is untouched.
    pub fn reset_to_defaults(&mut self) {
        self.session.reset_to_default_topology();
        info!("reset live graph to the default topology");
    }

    /// Serializes every stored diagram, most recently updated first.
    pub async fn export_all(&self) -> Result<String, SyncError> {
        let mut diagrams = self.store.get_all().await?;
        diagrams.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        format::export_bundle(&diagrams, self.now()).map_err(SyncError::Format)
    }

    /// Merges diagrams from an export document into the store.
    ///
    /// Names act as the merge key: a diagram whose name is already taken, in the store or by an
    /// earlier element of the same document, is skipped. Imported ids are discarded and fresh
    /// ones minted. When the store fails partway, the listing is re-read and the error carries
    /// the report of what was already written.
    pub async fn import_bundle(&mut self, text: &str) -> Result<ImportReport, SyncError> {
        let candidates = format::parse_bundle(text).map_err(SyncError::Validation)?;

        self.refresh_listing().await?;
        let mut taken = self
            .session
            .listing()
            .iter()
            .map(|summary| summary.name.clone())
            .collect::<HashSet<_>>();

        let mut report = ImportReport::default();
        for (index, candidate) in candidates.into_iter().enumerate() {
            let candidate = match candidate {
                Ok(candidate) => candidate,
                Err(err) => {
                    report.rejected.push(RejectedDiagram {
                        index,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };
            let Ok(name) = normalized_name(&candidate.name) else {
                report.rejected.push(RejectedDiagram {
                    index,
                    reason: SyncError::EmptyName.to_string(),
                });
                continue;
            };
            if let Err(err) = check_layout(&candidate.node_positions, &candidate.edge_offsets) {
                report.rejected.push(RejectedDiagram {
                    index,
                    reason: err.to_string(),
                });
                continue;
            }
            if !taken.insert(name.clone()) {
                debug!("import skipped {name:?}, the name is taken");
                report.skipped.push(name);
                continue;
            }

            let now = self.now();
            let record = SavedDiagram {
                diagram_id: DiagramId::generate(),
                name,
                graph: candidate.graph,
                node_positions: candidate.node_positions,
                edge_offsets: candidate.edge_offsets,
                created_at: candidate.created_at.unwrap_or(now),
                updated_at: candidate.updated_at.unwrap_or(now),
                rev: 0,
            };
            if let Err(source) = self.store.put(&record).await {
                if let Err(err) = self.refresh_listing().await {
                    warn!("listing refresh after failed import skipped: {err}");
                }
                return Err(SyncError::PartialImport { report, source });
            }
            report.imported.push(record.summary());
        }

        info!(
            "import finished: {} imported, {} skipped, {} rejected",
            report.imported.len(),
            report.skipped.len(),
            report.rejected.len()
        );
        self.refresh_listing().await?;
        Ok(report)
    }

    /// The live graph as a legacy `{services, connections}` document.
    pub fn export_config(&self) -> Result<String, SyncError> {
        format::export_config(self.session.graph()).map_err(SyncError::Format)
    }

    /// Replaces the live graph with a legacy config document. Nothing changes unless the whole
    /// document validates.
    pub fn import_config(&mut self, text: &str) -> Result<(), SyncError> {
        let graph = format::parse_config(text).map_err(SyncError::Validation)?;
        info!(
            "imported config with {} services and {} connections",
            graph.services().len(),
            graph.connections().len()
        );
        self.session.import_snapshot(graph);
        Ok(())
    }
}
