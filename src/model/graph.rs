// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Svcgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::connection::Connection;
use super::ids::{ConnectionId, DashboardId, ServiceId};
use super::service::{ServiceKind, ServiceNode};

/// The live topology: services and the connections between them, both in insertion order.
///
/// Every connection endpoint names a service in `services`. The invariant is established by
/// [`Graph::from_snapshot`] and kept by the cascading removal in `crate::ops`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Graph {
    services: Vec<ServiceNode>,
    connections: Vec<Connection>,
}

/// A by-value copy of a graph, detached from live state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GraphSnapshot {
    pub services: Vec<ServiceNode>,
    pub connections: Vec<Connection>,
}

impl Graph {
    /// Builds a graph from an untrusted snapshot, rejecting duplicate ids, dangling or
    /// self-referencing connections and duplicate dashboard ids within a connection.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Self, GraphValidationError> {
        let mut service_ids = BTreeSet::<&ServiceId>::new();
        for service in &snapshot.services {
            if !service_ids.insert(service.service_id()) {
                return Err(GraphValidationError::DuplicateService {
                    service_id: service.service_id().clone(),
                });
            }
        }

        let mut connection_ids = BTreeSet::<&ConnectionId>::new();
        for connection in &snapshot.connections {
            let connection_id = connection.connection_id();
            if !connection_ids.insert(connection_id) {
                return Err(GraphValidationError::DuplicateConnection {
                    connection_id: connection_id.clone(),
                });
            }
            for endpoint in [connection.source(), connection.target()] {
                if !service_ids.contains(endpoint) {
                    return Err(GraphValidationError::DanglingEndpoint {
                        connection_id: connection_id.clone(),
                        service_id: endpoint.clone(),
                    });
                }
            }
            if connection.source() == connection.target() {
                return Err(GraphValidationError::SelfLoop {
                    connection_id: connection_id.clone(),
                });
            }

            let mut dashboard_ids = BTreeSet::<&DashboardId>::new();
            for dashboard in connection.dashboards() {
                if !dashboard_ids.insert(dashboard.dashboard_id()) {
                    return Err(GraphValidationError::DuplicateDashboard {
                        connection_id: connection_id.clone(),
                        dashboard_id: dashboard.dashboard_id().clone(),
                    });
                }
            }
        }

        Ok(Self {
            services: snapshot.services,
            connections: snapshot.connections,
        })
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            services: self.services.clone(),
            connections: self.connections.clone(),
        }
    }

    pub fn services(&self) -> &[ServiceNode] {
        &self.services
    }

    pub fn services_mut(&mut self) -> &mut Vec<ServiceNode> {
        &mut self.services
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connections_mut(&mut self) -> &mut Vec<Connection> {
        &mut self.connections
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty() && self.connections.is_empty()
    }

    pub fn service(&self, service_id: &ServiceId) -> Option<&ServiceNode> {
        self.services
            .iter()
            .find(|service| service.service_id() == service_id)
    }

    pub fn service_mut(&mut self, service_id: &ServiceId) -> Option<&mut ServiceNode> {
        self.services
            .iter_mut()
            .find(|service| service.service_id() == service_id)
    }

    pub fn contains_service(&self, service_id: &ServiceId) -> bool {
        self.service(service_id).is_some()
    }

    pub fn connection(&self, connection_id: &ConnectionId) -> Option<&Connection> {
        self.connections
            .iter()
            .find(|connection| connection.connection_id() == connection_id)
    }

    pub fn connection_mut(&mut self, connection_id: &ConnectionId) -> Option<&mut Connection> {
        self.connections
            .iter_mut()
            .find(|connection| connection.connection_id() == connection_id)
    }

    pub fn contains_connection(&self, connection_id: &ConnectionId) -> bool {
        self.connection(connection_id).is_some()
    }

    /// Connections with `service_id` as source or target, in graph order.
    pub fn connections_touching<'a>(
        &'a self,
        service_id: &'a ServiceId,
    ) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections
            .iter()
            .filter(move |connection| connection.touches(service_id))
    }

    /// Case-insensitive substring match on service names, in graph order.
    pub fn search_services(&self, query: &str) -> Vec<&ServiceNode> {
        let needle = query.to_lowercase();
        self.services
            .iter()
            .filter(|service| service.name().to_lowercase().contains(&needle))
            .collect()
    }

    /// Services grouped by kind; groups follow [`ServiceKind::DISPLAY_ORDER`] and empty groups
    /// are omitted.
    pub fn services_by_kind(&self) -> Vec<(ServiceKind, Vec<&ServiceNode>)> {
        let mut groups = BTreeMap::<ServiceKind, Vec<&ServiceNode>>::new();
        for service in &self.services {
            groups.entry(service.kind()).or_default().push(service);
        }

        ServiceKind::DISPLAY_ORDER
            .iter()
            .filter_map(|kind| groups.remove(kind).map(|group| (*kind, group)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphValidationError {
    DuplicateService {
        service_id: ServiceId,
    },
    DuplicateConnection {
        connection_id: ConnectionId,
    },
    DanglingEndpoint {
        connection_id: ConnectionId,
        service_id: ServiceId,
    },
    SelfLoop {
        connection_id: ConnectionId,
    },
    DuplicateDashboard {
        connection_id: ConnectionId,
        dashboard_id: DashboardId,
    },
}

impl fmt::Display for GraphValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateService { service_id } => {
                write!(f, "duplicate service id {service_id}")
            }
            Self::DuplicateConnection { connection_id } => {
                write!(f, "duplicate connection id {connection_id}")
            }
            Self::DanglingEndpoint {
                connection_id,
                service_id,
            } => write!(
                f,
                "connection {connection_id} references unknown service {service_id}"
            ),
            Self::SelfLoop { connection_id } => {
                write!(f, "connection {connection_id} connects a service to itself")
            }
            Self::DuplicateDashboard {
                connection_id,
                dashboard_id,
            } => write!(
                f,
                "connection {connection_id} has duplicate dashboard id {dashboard_id}"
            ),
        }
    }
}

impl std::error::Error for GraphValidationError {}
