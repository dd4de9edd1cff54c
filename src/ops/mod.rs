// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Svcgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations for the live graph.
//!
//! A batch of ops is applied to a copy of the graph and committed only when every op succeeds.
//! The result carries a minimal delta that the session uses to reconcile selection and pins.

use std::collections::HashSet;
use std::fmt;

use crate::model::{
    Connection, ConnectionId, Dashboard, DashboardId, Graph, ServiceId, ServiceKind, ServiceLink,
    ServiceNode,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphOp {
    AddService {
        service: ServiceNode,
    },
    UpdateService {
        service_id: ServiceId,
        patch: ServicePatch,
    },
    AddServiceLink {
        service_id: ServiceId,
        link: ServiceLink,
    },
    RemoveServiceLink {
        service_id: ServiceId,
        index: usize,
    },
    RemoveService {
        service_id: ServiceId,
    },
    AddConnection {
        connection: Connection,
    },
    UpdateConnection {
        connection_id: ConnectionId,
        patch: ConnectionPatch,
    },
    RemoveConnection {
        connection_id: ConnectionId,
    },
    AddDashboard {
        connection_id: ConnectionId,
        dashboard: Dashboard,
    },
    UpdateDashboard {
        connection_id: ConnectionId,
        dashboard_id: DashboardId,
        patch: DashboardPatch,
    },
    RemoveDashboard {
        connection_id: ConnectionId,
        dashboard_id: DashboardId,
    },
}

/// Partial update for a service; `None` leaves a field untouched.
///
/// `description` is doubly optional so a patch can clear it (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServicePatch {
    pub name: Option<String>,
    pub kind: Option<ServiceKind>,
    pub color: Option<String>,
    pub description: Option<Option<String>>,
    pub links: Option<Vec<ServiceLink>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionPatch {
    pub label: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardPatch {
    pub title: Option<String>,
    pub iframe_url: Option<String>,
}

/// Addresses one object of the graph in a [`Delta`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKey {
    Service(ServiceId),
    Connection(ConnectionId),
    Dashboard {
        connection_id: ConnectionId,
        dashboard_id: DashboardId,
    },
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service(service_id) => write!(f, "service/{service_id}"),
            Self::Connection(connection_id) => write!(f, "connection/{connection_id}"),
            Self::Dashboard {
                connection_id,
                dashboard_id,
            } => write!(f, "connection/{connection_id}/dashboard/{dashboard_id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub applied: usize,
    pub delta: Delta,
}

/// Minimal delta describing which objects changed as the result of applying ops.
///
/// Removing a connection reports only the connection; its dashboards go with it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<ObjectKey>,
    pub removed: Vec<ObjectKey>,
    pub updated: Vec<ObjectKey>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }

    pub fn removed_services(&self) -> impl Iterator<Item = &ServiceId> {
        self.removed.iter().filter_map(|key| match key {
            ObjectKey::Service(service_id) => Some(service_id),
            _ => None,
        })
    }

    pub fn removed_connections(&self) -> impl Iterator<Item = &ConnectionId> {
        self.removed.iter().filter_map(|key| match key {
            ObjectKey::Connection(connection_id) => Some(connection_id),
            _ => None,
        })
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: HashSet<ObjectKey>,
    removed: HashSet<ObjectKey>,
    updated: HashSet<ObjectKey>,
}

impl DeltaBuilder {
    fn record_added(&mut self, key: ObjectKey) {
        self.removed.remove(&key);
        self.updated.remove(&key);
        self.added.insert(key);
    }

    fn record_removed(&mut self, key: ObjectKey) {
        if let ObjectKey::Connection(connection_id) = &key {
            self.forget_dashboards_of(connection_id);
        }

        // Added and removed within one batch nets out to nothing.
        if self.added.remove(&key) {
            self.updated.remove(&key);
            return;
        }
        self.updated.remove(&key);
        self.removed.insert(key);
    }

    fn record_updated(&mut self, key: ObjectKey) {
        if self.added.contains(&key) || self.removed.contains(&key) {
            return;
        }
        self.updated.insert(key);
    }

    /// The connection key stands in for every dashboard it carried.
    fn forget_dashboards_of(&mut self, removed: &ConnectionId) {
        let keep = |key: &ObjectKey| {
            !matches!(key, ObjectKey::Dashboard { connection_id, .. } if connection_id == removed)
        };
        self.added.retain(keep);
        self.removed.retain(keep);
        self.updated.retain(keep);
    }

    fn finish(self) -> Delta {
        let mut added = self.added.into_iter().collect::<Vec<_>>();
        let mut removed = self.removed.into_iter().collect::<Vec<_>>();
        let mut updated = self.updated.into_iter().collect::<Vec<_>>();

        added.sort();
        removed.sort();
        updated.sort();

        Delta {
            added,
            removed,
            updated,
        }
    }
}

pub fn apply_ops(graph: &mut Graph, ops: &[GraphOp]) -> Result<ApplyResult, ApplyError> {
    if ops.is_empty() {
        return Ok(ApplyResult {
            applied: 0,
            delta: Delta::default(),
        });
    }

    let mut candidate = graph.clone();
    let mut delta = DeltaBuilder::default();

    for op in ops {
        apply_graph_op(&mut candidate, op, &mut delta)?;
    }

    *graph = candidate;

    Ok(ApplyResult {
        applied: ops.len(),
        delta: delta.finish(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Service,
    ServiceLink,
    Connection,
    Dashboard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    AlreadyExists { kind: ObjectKind, object_id: String },
    NotFound { kind: ObjectKind, object_id: String },
    MissingService { service_id: ServiceId },
    SelfLoop { connection_id: ConnectionId },
}

impl ApplyError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyExists { kind, object_id } => {
                write!(f, "object already exists ({kind:?}, id={object_id})")
            }
            Self::NotFound { kind, object_id } => {
                write!(f, "object not found ({kind:?}, id={object_id})")
            }
            Self::MissingService { service_id } => {
                write!(f, "connection endpoint not found (service id={service_id})")
            }
            Self::SelfLoop { connection_id } => write!(
                f,
                "connection {connection_id} would connect a service to itself"
            ),
        }
    }
}

impl std::error::Error for ApplyError {}

// Extracted op-application implementation for graph mutations.
include!("ops_impl.rs");
