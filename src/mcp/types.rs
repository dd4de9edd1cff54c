// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Svcgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::format::{ConnectionJson, PointJson, ServiceJson, ServiceLinkJson};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ServiceKindGroup {
    pub kind: String,
    pub service_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GraphReadResponse {
    pub services: Vec<ServiceJson>,
    pub connections: Vec<ConnectionJson>,
    /// Services grouped for the sidebar, in display order; empty kinds are omitted.
    pub groups: Vec<ServiceKindGroup>,
    pub active_diagram_id: Option<String>,
    pub has_unsaved_changes: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct McpDelta {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub updated: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ApplyResponse {
    pub applied: u64,
    pub delta: McpDelta,
    pub has_unsaved_changes: bool,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ServiceAddParams {
    pub name: String,
    /// One of `microservice`, `database`, `cache`, `queue`, `cdn`, `gateway`.
    pub kind: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub links: Vec<ServiceLinkJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ServiceAddResponse {
    pub service: ServiceJson,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ServiceUpdateParams {
    pub service_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Drops the description; wins over `description`.
    #[serde(default)]
    pub clear_description: bool,
    /// Replaces the whole link list when present.
    #[serde(default)]
    pub links: Option<Vec<ServiceLinkJson>>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ServiceIdParams {
    pub service_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ServiceSearchParams {
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ServiceSearchResponse {
    pub services: Vec<ServiceJson>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ConnectionAddParams {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConnectionResponse {
    pub connection: ConnectionJson,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ConnectionUpdateParams {
    pub connection_id: String,
    /// New label; omit or pass null to clear it.
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ConnectionIdParams {
    pub connection_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DashboardAddParams {
    pub connection_id: String,
    pub title: String,
    pub iframe_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DashboardAddResponse {
    pub dashboard_id: String,
    pub connection: ConnectionJson,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DashboardUpdateParams {
    pub connection_id: String,
    pub dashboard_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub iframe_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DashboardRemoveParams {
    pub connection_id: String,
    pub dashboard_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ViewStateResponse {
    /// `none`, `node` or `edge`.
    pub selection: String,
    pub service_id: Option<String>,
    pub connection_id: Option<String>,
    pub pinned_edge_ids: Vec<String>,
    pub animations_enabled: bool,
}

/// Pass `service_id` to select a node, `connection_id` to select an edge, or neither to clear.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SelectionUpdateParams {
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub connection_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PinToggleResponse {
    pub pinned: bool,
    pub state: ViewStateResponse,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AnimationsSetParams {
    /// Omit to toggle.
    #[serde(default)]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpDiagramSummary {
    pub diagram_id: String,
    pub name: String,
    pub services: u64,
    pub connections: u64,
    pub created_at: String,
    pub updated_at: String,
    pub rev: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DiagramListResponse {
    pub diagrams: Vec<McpDiagramSummary>,
    pub active_diagram_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DiagramCurrentResponse {
    pub active_diagram_id: Option<String>,
    pub rev: Option<u64>,
    pub has_unsaved_changes: bool,
    pub services: u64,
    pub connections: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DiagramSaveParams {
    pub name: String,
    #[serde(default)]
    pub node_positions: BTreeMap<String, PointJson>,
    #[serde(default)]
    pub edge_offsets: BTreeMap<String, PointJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DiagramSaveResponse {
    pub diagram: McpDiagramSummary,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DiagramIdParams {
    pub diagram_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LoadedDiagramJson {
    pub diagram_id: String,
    pub name: String,
    pub rev: u64,
    pub services: Vec<ServiceJson>,
    pub connections: Vec<ConnectionJson>,
    pub node_positions: BTreeMap<String, PointJson>,
    pub edge_offsets: BTreeMap<String, PointJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DiagramLoadResponse {
    /// `None` when no such diagram is stored; the live graph is then left alone.
    pub loaded: Option<LoadedDiagramJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DiagramDeleteResponse {
    pub diagram_id: String,
    pub was_active: bool,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DiagramRenameParams {
    pub diagram_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DiagramRenameResponse {
    pub renamed: bool,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DocumentParams {
    pub document: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DocumentResponse {
    pub document: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpRejectedDiagram {
    pub index: u64,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DiagramsImportResponse {
    pub imported: Vec<McpDiagramSummary>,
    pub skipped: Vec<String>,
    pub rejected: Vec<McpRejectedDiagram>,
}
