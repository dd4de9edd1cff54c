// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Svcgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editing session state layered over the live graph.
//!
//! The session owns the graph plus everything the editor tracks about it that is not part of a
//! saved diagram: the selection, pinned edges, the animation toggle, the active diagram pointer
//! and the cached diagram listing. Every graph mutation goes through [`EditorSession::apply`],
//! which reconciles selection and pins against the resulting delta.

use std::collections::BTreeSet;

use log::debug;

use crate::model::fixtures::default_topology;
use crate::model::{
    Connection, ConnectionId, Dashboard, DashboardId, DiagramId, DiagramSummary, Graph,
    GraphSnapshot, ServiceId, ServiceKind, ServiceNode,
};
use crate::ops::{apply_ops, ApplyError, ApplyResult, GraphOp};

/// Color given to services created without an explicit one.
pub const DEFAULT_SERVICE_COLOR: &str = "#6366f1";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    NoneSelected,
    NodeSelected(ServiceId),
    EdgeSelected(ConnectionId),
}

impl Selection {
    pub fn service_id(&self) -> Option<&ServiceId> {
        match self {
            Self::NodeSelected(service_id) => Some(service_id),
            _ => None,
        }
    }

    pub fn connection_id(&self) -> Option<&ConnectionId> {
        match self {
            Self::EdgeSelected(connection_id) => Some(connection_id),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::NoneSelected)
    }
}

/// The stored diagram the live graph was last saved to or loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDiagram {
    pub diagram_id: DiagramId,
    /// Rev of the stored record as this session last saw it.
    pub rev: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSession {
    graph: Graph,
    selection: Selection,
    pinned_edge_ids: BTreeSet<ConnectionId>,
    animations_enabled: bool,
    active_diagram: Option<ActiveDiagram>,
    listing: Vec<DiagramSummary>,
    has_unsaved_changes: bool,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(default_topology())
    }
}

impl EditorSession {
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            selection: Selection::NoneSelected,
            pinned_edge_ids: BTreeSet::new(),
            animations_enabled: true,
            active_diagram: None,
            listing: Vec::new(),
            has_unsaved_changes: false,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_service(&self) -> Option<&ServiceNode> {
        self.selection
            .service_id()
            .and_then(|service_id| self.graph.service(service_id))
    }

    pub fn selected_connection(&self) -> Option<&Connection> {
        self.selection
            .connection_id()
            .and_then(|connection_id| self.graph.connection(connection_id))
    }

    pub fn pinned_edge_ids(&self) -> &BTreeSet<ConnectionId> {
        &self.pinned_edge_ids
    }

    pub fn is_edge_pinned(&self, connection_id: &ConnectionId) -> bool {
        self.pinned_edge_ids.contains(connection_id)
    }

    pub fn animations_enabled(&self) -> bool {
        self.animations_enabled
    }

    pub fn active_diagram(&self) -> Option<&ActiveDiagram> {
        self.active_diagram.as_ref()
    }

    pub fn active_diagram_id(&self) -> Option<&DiagramId> {
        self.active_diagram
            .as_ref()
            .map(|active| &active.diagram_id)
    }

    pub fn listing(&self) -> &[DiagramSummary] {
        &self.listing
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    pub fn select_node(&mut self, service_id: ServiceId) {
        self.selection = Selection::NodeSelected(service_id);
    }

    pub fn select_edge(&mut self, connection_id: ConnectionId) {
        self.selection = Selection::EdgeSelected(connection_id);
    }

    pub fn deselect(&mut self) {
        self.selection = Selection::NoneSelected;
    }

    /// Pins `connection_id` if it is not pinned, unpins it otherwise. Returns whether it is pinned
    /// afterwards. Any id is accepted.
    pub fn toggle_pin_edge(&mut self, connection_id: ConnectionId) -> bool {
        if self.pinned_edge_ids.remove(&connection_id) {
            return false;
        }
        self.pinned_edge_ids.insert(connection_id);
        true
    }

    pub fn unpin_all_edges(&mut self) {
        self.pinned_edge_ids.clear();
    }

    pub fn toggle_animations(&mut self) -> bool {
        self.animations_enabled = !self.animations_enabled;
        self.animations_enabled
    }

    pub fn set_animations_enabled(&mut self, enabled: bool) {
        self.animations_enabled = enabled;
    }

    /// Applies a batch of graph ops atomically and reconciles selection and pins with whatever
    /// the batch removed.
    pub fn apply(&mut self, ops: &[GraphOp]) -> Result<ApplyResult, ApplyError> {
        let result = apply_ops(&mut self.graph, ops)?;

        for service_id in result.delta.removed_services() {
            if self.selection.service_id() == Some(service_id) {
                self.selection = Selection::NoneSelected;
            }
        }
        for connection_id in result.delta.removed_connections() {
            if self.selection.connection_id() == Some(connection_id) {
                self.selection = Selection::NoneSelected;
            }
            if self.pinned_edge_ids.remove(connection_id) {
                debug!("dropped pin for removed connection {connection_id}");
            }
        }

        if result.applied > 0 {
            self.has_unsaved_changes = true;
        }
        Ok(result)
    }

    /// Adds a service with a freshly minted id and returns that id.
    pub fn add_service(
        &mut self,
        name: impl Into<String>,
        kind: ServiceKind,
        color: Option<String>,
        description: Option<String>,
    ) -> Result<ServiceId, ApplyError> {
        let service_id = ServiceId::generate();
        let mut service = ServiceNode::new(
            service_id.clone(),
            name,
            kind,
            color.unwrap_or_else(|| DEFAULT_SERVICE_COLOR.to_owned()),
        );
        service.set_description(description);
        self.apply(&[GraphOp::AddService { service }])?;
        Ok(service_id)
    }

    pub fn remove_service(&mut self, service_id: ServiceId) -> Result<ApplyResult, ApplyError> {
        self.apply(&[GraphOp::RemoveService { service_id }])
    }

    /// Connects two existing services with a freshly minted connection id.
    pub fn add_connection(
        &mut self,
        source: ServiceId,
        target: ServiceId,
        label: Option<String>,
    ) -> Result<ConnectionId, ApplyError> {
        let connection_id = ConnectionId::generate();
        let mut connection = Connection::new(connection_id.clone(), source, target);
        connection.set_label(label);
        self.apply(&[GraphOp::AddConnection { connection }])?;
        Ok(connection_id)
    }

    pub fn remove_connection(
        &mut self,
        connection_id: ConnectionId,
    ) -> Result<ApplyResult, ApplyError> {
        self.apply(&[GraphOp::RemoveConnection { connection_id }])
    }

    pub fn add_dashboard(
        &mut self,
        connection_id: ConnectionId,
        title: impl Into<String>,
        iframe_url: impl Into<String>,
    ) -> Result<DashboardId, ApplyError> {
        let dashboard_id = DashboardId::generate();
        let dashboard = Dashboard::new(dashboard_id.clone(), title, iframe_url);
        self.apply(&[GraphOp::AddDashboard {
            connection_id,
            dashboard,
        }])?;
        Ok(dashboard_id)
    }

    pub fn remove_dashboard(
        &mut self,
        connection_id: ConnectionId,
        dashboard_id: DashboardId,
    ) -> Result<ApplyResult, ApplyError> {
        self.apply(&[GraphOp::RemoveDashboard {
            connection_id,
            dashboard_id,
        }])
    }

    pub fn export_snapshot(&self) -> GraphSnapshot {
        self.graph.snapshot()
    }

    /// Replaces the live graph wholesale. Selection and pins refer to the old graph, so both are
    /// cleared; the active diagram pointer is left alone.
    pub fn import_snapshot(&mut self, graph: Graph) {
        self.graph = graph;
        self.selection = Selection::NoneSelected;
        self.pinned_edge_ids.clear();
        self.has_unsaved_changes = true;
    }

    /// Installs a graph that came out of the store as the active diagram.
    pub(crate) fn install_loaded(&mut self, graph: Graph, active: ActiveDiagram) {
        self.graph = graph;
        self.selection = Selection::NoneSelected;
        self.pinned_edge_ids.clear();
        self.active_diagram = Some(active);
        self.has_unsaved_changes = false;
    }

    /// Restores the built-in topology as a new unsaved diagram.
    pub(crate) fn reset_to_default_topology(&mut self) {
        self.graph = default_topology();
        self.selection = Selection::NoneSelected;
        self.pinned_edge_ids.clear();
        self.active_diagram = None;
        self.has_unsaved_changes = false;
    }

    pub(crate) fn mark_saved(&mut self, active: ActiveDiagram) {
        self.active_diagram = Some(active);
        self.has_unsaved_changes = false;
    }

    pub(crate) fn set_active_rev(&mut self, rev: u64) {
        if let Some(active) = self.active_diagram.as_mut() {
            active.rev = rev;
        }
    }

    /// The active record is gone; the live graph stays as an unsaved copy.
    pub(crate) fn orphan_active_diagram(&mut self) {
        self.active_diagram = None;
        self.has_unsaved_changes = true;
    }

    pub(crate) fn set_listing(&mut self, listing: Vec<DiagramSummary>) {
        self.listing = listing;
    }
}
