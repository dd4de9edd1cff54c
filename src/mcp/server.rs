// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Svcgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt};
use tokio::sync::Mutex;

use crate::format::{
    connection_to_json, format_timestamp, graph_to_json, points_from_json, points_to_json,
    service_to_json, ConnectionJson, ServiceJson, ServiceLinkJson,
};
use crate::model::{
    ConnectionId, DashboardId, DiagramId, DiagramSummary, Id, ServiceId, ServiceKind, ServiceLink,
    ServiceNode,
};
use crate::ops::{
    ApplyError, ApplyResult, ConnectionPatch, DashboardPatch, Delta, GraphOp, ObjectKey,
    ServicePatch,
};
use crate::session::{EditorSession, Selection, DEFAULT_SERVICE_COLOR};
use crate::sync::{SyncError, Workspace};

use super::types::*;

/// MCP front end over one shared [`Workspace`].
#[derive(Clone)]
pub struct SvcgraphMcp {
    state: Arc<Mutex<Workspace>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl SvcgraphMcp {
    pub fn new(workspace: Workspace) -> Self {
        Self::with_shared_workspace(Arc::new(Mutex::new(workspace)))
    }

    pub fn with_shared_workspace(state: Arc<Mutex<Workspace>>) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
        service.waiting().await?;
        Ok(())
    }

    /// Read the live graph: services, connections with their dashboards, and the sidebar
    /// grouping by service kind.
    #[tool(name = "graph.read")]
    async fn graph_read(&self) -> Result<Json<GraphReadResponse>, ErrorData> {
        let workspace = self.state.lock().await;
        let session = workspace.session();
        let (services, connections) = graph_to_json(session.graph());
        let groups = session
            .graph()
            .services_by_kind()
            .into_iter()
            .map(|(kind, services)| ServiceKindGroup {
                kind: kind.as_str().to_owned(),
                service_ids: services
                    .iter()
                    .map(|service| service.service_id().as_str().to_owned())
                    .collect(),
            })
            .collect();

        Ok(Json(GraphReadResponse {
            services,
            connections,
            groups,
            active_diagram_id: session.active_diagram_id().map(|id| id.as_str().to_owned()),
            has_unsaved_changes: session.has_unsaved_changes(),
        }))
    }

    /// Add a service with a fresh id; `color` defaults to the editor's accent color.
    #[tool(name = "service.add")]
    async fn service_add(
        &self,
        params: Parameters<ServiceAddParams>,
    ) -> Result<Json<ServiceAddResponse>, ErrorData> {
        let ServiceAddParams {
            name,
            kind,
            color,
            description,
            links,
        } = params.0;
        let kind = parse_service_kind(&kind)?;

        let service_id = ServiceId::generate();
        let mut service = ServiceNode::new(
            service_id.clone(),
            name,
            kind,
            color.unwrap_or_else(|| DEFAULT_SERVICE_COLOR.to_owned()),
        );
        service.set_description(description);
        service.set_links(links_from_json(links));

        let mut workspace = self.state.lock().await;
        workspace
            .apply(&[GraphOp::AddService { service }])
            .map_err(sync_error_data)?;
        let service = service_json_of(workspace.session(), &service_id)?;
        Ok(Json(ServiceAddResponse { service }))
    }

    /// Merge the given fields into a service; omitted fields are left as they are.
    #[tool(name = "service.update")]
    async fn service_update(
        &self,
        params: Parameters<ServiceUpdateParams>,
    ) -> Result<Json<ApplyResponse>, ErrorData> {
        let ServiceUpdateParams {
            service_id,
            name,
            kind,
            color,
            description,
            clear_description,
            links,
        } = params.0;
        let service_id = parse_tool_id("service_id", &service_id)?;
        let kind = kind.as_deref().map(parse_service_kind).transpose()?;
        let description = if clear_description {
            Some(None)
        } else {
            description.map(Some)
        };

        let patch = ServicePatch {
            name,
            kind,
            color,
            description,
            links: links.map(links_from_json),
        };

        let mut workspace = self.state.lock().await;
        let result = workspace
            .apply(&[GraphOp::UpdateService { service_id, patch }])
            .map_err(sync_error_data)?;
        Ok(Json(apply_response(&result, workspace.session())))
    }

    /// Remove a service and every connection that touches it.
    #[tool(name = "service.remove")]
    async fn service_remove(
        &self,
        params: Parameters<ServiceIdParams>,
    ) -> Result<Json<ApplyResponse>, ErrorData> {
        let service_id = parse_tool_id("service_id", &params.0.service_id)?;

        let mut workspace = self.state.lock().await;
        let result = workspace
            .session_mut()
            .remove_service(service_id)
            .map_err(apply_error_data)?;
        Ok(Json(apply_response(&result, workspace.session())))
    }

    /// Case-insensitive substring search over service names.
    #[tool(name = "service.search")]
    async fn service_search(
        &self,
        params: Parameters<ServiceSearchParams>,
    ) -> Result<Json<ServiceSearchResponse>, ErrorData> {
        let workspace = self.state.lock().await;
        let services = workspace
            .session()
            .graph()
            .search_services(&params.0.query)
            .into_iter()
            .map(service_to_json)
            .collect();
        Ok(Json(ServiceSearchResponse { services }))
    }

    /// Connect two existing, distinct services.
    #[tool(name = "connection.add")]
    async fn connection_add(
        &self,
        params: Parameters<ConnectionAddParams>,
    ) -> Result<Json<ConnectionResponse>, ErrorData> {
        let ConnectionAddParams {
            source,
            target,
            label,
        } = params.0;
        let source: ServiceId = parse_tool_id("source", &source)?;
        let target: ServiceId = parse_tool_id("target", &target)?;

        let mut workspace = self.state.lock().await;
        let connection_id = workspace
            .session_mut()
            .add_connection(source, target, label)
            .map_err(apply_error_data)?;
        let connection = connection_json_of(workspace.session(), &connection_id)?;
        Ok(Json(ConnectionResponse { connection }))
    }

    /// Set or clear a connection label.
    #[tool(name = "connection.update")]
    async fn connection_update(
        &self,
        params: Parameters<ConnectionUpdateParams>,
    ) -> Result<Json<ApplyResponse>, ErrorData> {
        let ConnectionUpdateParams {
            connection_id,
            label,
        } = params.0;
        let connection_id = parse_tool_id("connection_id", &connection_id)?;
        let patch = ConnectionPatch { label: Some(label) };

        let mut workspace = self.state.lock().await;
        let result = workspace
            .apply(&[GraphOp::UpdateConnection {
                connection_id,
                patch,
            }])
            .map_err(sync_error_data)?;
        Ok(Json(apply_response(&result, workspace.session())))
    }

    #[tool(name = "connection.remove")]
    async fn connection_remove(
        &self,
        params: Parameters<ConnectionIdParams>,
    ) -> Result<Json<ApplyResponse>, ErrorData> {
        let connection_id = parse_tool_id("connection_id", &params.0.connection_id)?;

        let mut workspace = self.state.lock().await;
        let result = workspace
            .session_mut()
            .remove_connection(connection_id)
            .map_err(apply_error_data)?;
        Ok(Json(apply_response(&result, workspace.session())))
    }

    /// Attach an embedded dashboard to a connection.
    #[tool(name = "dashboard.add")]
    async fn dashboard_add(
        &self,
        params: Parameters<DashboardAddParams>,
    ) -> Result<Json<DashboardAddResponse>, ErrorData> {
        let DashboardAddParams {
            connection_id,
            title,
            iframe_url,
        } = params.0;
        let connection_id: ConnectionId = parse_tool_id("connection_id", &connection_id)?;

        let mut workspace = self.state.lock().await;
        let dashboard_id = workspace
            .session_mut()
            .add_dashboard(connection_id.clone(), title, iframe_url)
            .map_err(apply_error_data)?;
        let connection = connection_json_of(workspace.session(), &connection_id)?;
        Ok(Json(DashboardAddResponse {
            dashboard_id: dashboard_id.into_string(),
            connection,
        }))
    }

    #[tool(name = "dashboard.update")]
    async fn dashboard_update(
        &self,
        params: Parameters<DashboardUpdateParams>,
    ) -> Result<Json<ApplyResponse>, ErrorData> {
        let DashboardUpdateParams {
            connection_id,
            dashboard_id,
            title,
            iframe_url,
        } = params.0;
        let connection_id = parse_tool_id("connection_id", &connection_id)?;
        let dashboard_id = parse_tool_id("dashboard_id", &dashboard_id)?;
        let patch = DashboardPatch { title, iframe_url };

        let mut workspace = self.state.lock().await;
        let result = workspace
            .apply(&[GraphOp::UpdateDashboard {
                connection_id,
                dashboard_id,
                patch,
            }])
            .map_err(sync_error_data)?;
        Ok(Json(apply_response(&result, workspace.session())))
    }

    #[tool(name = "dashboard.remove")]
    async fn dashboard_remove(
        &self,
        params: Parameters<DashboardRemoveParams>,
    ) -> Result<Json<ApplyResponse>, ErrorData> {
        let connection_id: ConnectionId =
            parse_tool_id("connection_id", &params.0.connection_id)?;
        let dashboard_id: DashboardId = parse_tool_id("dashboard_id", &params.0.dashboard_id)?;

        let mut workspace = self.state.lock().await;
        let result = workspace
            .session_mut()
            .remove_dashboard(connection_id, dashboard_id)
            .map_err(apply_error_data)?;
        Ok(Json(apply_response(&result, workspace.session())))
    }

    /// Read the selection, pinned edges and the animation toggle.
    #[tool(name = "selection.read")]
    async fn selection_read(&self) -> Result<Json<ViewStateResponse>, ErrorData> {
        let workspace = self.state.lock().await;
        Ok(Json(view_state(workspace.session())))
    }

    /// Select one node or one edge; the other kind is cleared. Pass neither to deselect.
    #[tool(name = "selection.update")]
    async fn selection_update(
        &self,
        params: Parameters<SelectionUpdateParams>,
    ) -> Result<Json<ViewStateResponse>, ErrorData> {
        let SelectionUpdateParams {
            service_id,
            connection_id,
        } = params.0;

        let mut workspace = self.state.lock().await;
        match (service_id, connection_id) {
            (Some(_), Some(_)) => {
                return Err(ErrorData::invalid_params(
                    "pass either service_id or connection_id, not both",
                    None,
                ));
            }
            (Some(service_id), None) => {
                let service_id: ServiceId = parse_tool_id("service_id", &service_id)?;
                if !workspace.session().graph().contains_service(&service_id) {
                    return Err(ErrorData::resource_not_found(
                        "service not found",
                        Some(serde_json::json!({ "service_id": service_id.as_str() })),
                    ));
                }
                workspace.session_mut().select_node(service_id);
            }
            (None, Some(connection_id)) => {
                let connection_id: ConnectionId = parse_tool_id("connection_id", &connection_id)?;
                if !workspace.session().graph().contains_connection(&connection_id) {
                    return Err(ErrorData::resource_not_found(
                        "connection not found",
                        Some(serde_json::json!({ "connection_id": connection_id.as_str() })),
                    ));
                }
                workspace.session_mut().select_edge(connection_id);
            }
            (None, None) => workspace.session_mut().deselect(),
        }

        Ok(Json(view_state(workspace.session())))
    }

    /// Pin an edge's details open, or unpin it when it is already pinned.
    #[tool(name = "pin.toggle")]
    async fn pin_toggle(
        &self,
        params: Parameters<ConnectionIdParams>,
    ) -> Result<Json<PinToggleResponse>, ErrorData> {
        let connection_id = parse_tool_id("connection_id", &params.0.connection_id)?;

        let mut workspace = self.state.lock().await;
        let pinned = workspace.session_mut().toggle_pin_edge(connection_id);
        Ok(Json(PinToggleResponse {
            pinned,
            state: view_state(workspace.session()),
        }))
    }

    #[tool(name = "pin.clear")]
    async fn pin_clear(&self) -> Result<Json<ViewStateResponse>, ErrorData> {
        let mut workspace = self.state.lock().await;
        workspace.session_mut().unpin_all_edges();
        Ok(Json(view_state(workspace.session())))
    }

    /// Turn edge flow animations on or off; omit `enabled` to toggle.
    #[tool(name = "animations.set")]
    async fn animations_set(
        &self,
        params: Parameters<AnimationsSetParams>,
    ) -> Result<Json<ViewStateResponse>, ErrorData> {
        let mut workspace = self.state.lock().await;
        match params.0.enabled {
            Some(enabled) => workspace.session_mut().set_animations_enabled(enabled),
            None => {
                workspace.session_mut().toggle_animations();
            }
        }
        Ok(Json(view_state(workspace.session())))
    }

    /// List saved diagrams, most recently updated first; start here before `diagram.load`.
    #[tool(name = "diagram.list")]
    async fn diagram_list(&self) -> Result<Json<DiagramListResponse>, ErrorData> {
        let mut workspace = self.state.lock().await;
        let diagrams = workspace
            .refresh_listing()
            .await
            .map_err(sync_error_data)?
            .iter()
            .map(mcp_summary)
            .collect();
        let active_diagram_id =
            workspace.session().active_diagram_id().map(|id| id.as_str().to_owned());
        Ok(Json(DiagramListResponse {
            diagrams,
            active_diagram_id,
        }))
    }

    /// Which saved diagram the live graph belongs to, and whether it has unsaved edits.
    #[tool(name = "diagram.current")]
    async fn diagram_current(&self) -> Result<Json<DiagramCurrentResponse>, ErrorData> {
        let workspace = self.state.lock().await;
        Ok(Json(current_diagram(workspace.session())))
    }

    /// Save the live graph with the given canvas layout. Updates the active diagram in place, or
    /// creates a new one when nothing is active.
    #[tool(name = "diagram.save")]
    async fn diagram_save(
        &self,
        params: Parameters<DiagramSaveParams>,
    ) -> Result<Json<DiagramSaveResponse>, ErrorData> {
        let DiagramSaveParams {
            name,
            node_positions,
            edge_offsets,
        } = params.0;
        let node_positions = points_from_json("node_positions", node_positions)
            .map_err(|err| layout_error("node_positions", err))?;
        let edge_offsets = points_from_json("edge_offsets", edge_offsets)
            .map_err(|err| layout_error("edge_offsets", err))?;

        let mut workspace = self.state.lock().await;
        let summary = workspace
            .save_diagram(&name, node_positions, edge_offsets)
            .await
            .map_err(sync_error_data)?;
        Ok(Json(DiagramSaveResponse {
            diagram: mcp_summary(&summary),
        }))
    }

    /// Replace the live graph with a saved diagram and return its layout.
    #[tool(name = "diagram.load")]
    async fn diagram_load(
        &self,
        params: Parameters<DiagramIdParams>,
    ) -> Result<Json<DiagramLoadResponse>, ErrorData> {
        let diagram_id: DiagramId = parse_tool_id("diagram_id", &params.0.diagram_id)?;

        let mut workspace = self.state.lock().await;
        let loaded = workspace
            .load_diagram(&diagram_id)
            .await
            .map_err(sync_error_data)?
            .map(|loaded| {
                let (services, connections) = graph_to_json(&loaded.graph);
                LoadedDiagramJson {
                    diagram_id: loaded.diagram_id.into_string(),
                    name: loaded.name,
                    rev: loaded.rev,
                    services,
                    connections,
                    node_positions: points_to_json(&loaded.node_positions),
                    edge_offsets: points_to_json(&loaded.edge_offsets),
                }
            });
        Ok(Json(DiagramLoadResponse { loaded }))
    }

    /// Delete a saved diagram. The live graph is kept even when it was the active one.
    #[tool(name = "diagram.delete")]
    async fn diagram_delete(
        &self,
        params: Parameters<DiagramIdParams>,
    ) -> Result<Json<DiagramDeleteResponse>, ErrorData> {
        let diagram_id: DiagramId = parse_tool_id("diagram_id", &params.0.diagram_id)?;

        let mut workspace = self.state.lock().await;
        let was_active = workspace
            .delete_diagram(&diagram_id)
            .await
            .map_err(sync_error_data)?;
        Ok(Json(DiagramDeleteResponse {
            diagram_id: diagram_id.into_string(),
            was_active,
        }))
    }

    #[tool(name = "diagram.rename")]
    async fn diagram_rename(
        &self,
        params: Parameters<DiagramRenameParams>,
    ) -> Result<Json<DiagramRenameResponse>, ErrorData> {
        let DiagramRenameParams { diagram_id, name } = params.0;
        let diagram_id: DiagramId = parse_tool_id("diagram_id", &diagram_id)?;

        let mut workspace = self.state.lock().await;
        let renamed = workspace
            .rename_diagram(&diagram_id, &name)
            .await
            .map_err(sync_error_data)?;
        Ok(Json(DiagramRenameResponse { renamed }))
    }

    /// Replace the live graph with the starter topology as a new unsaved diagram.
    #[tool(name = "diagram.reset")]
    async fn diagram_reset(&self) -> Result<Json<DiagramCurrentResponse>, ErrorData> {
        let mut workspace = self.state.lock().await;
        workspace.reset_to_defaults();
        Ok(Json(current_diagram(workspace.session())))
    }

    /// Export every saved diagram as one bundle document.
    #[tool(name = "diagrams.export")]
    async fn diagrams_export(&self) -> Result<Json<DocumentResponse>, ErrorData> {
        let workspace = self.state.lock().await;
        let document = workspace.export_all().await.map_err(sync_error_data)?;
        Ok(Json(DocumentResponse { document }))
    }

    /// Merge a bundle document into the store; diagrams whose name is taken are skipped.
    #[tool(name = "diagrams.import")]
    async fn diagrams_import(
        &self,
        params: Parameters<DocumentParams>,
    ) -> Result<Json<DiagramsImportResponse>, ErrorData> {
        let mut workspace = self.state.lock().await;
        let report = workspace
            .import_bundle(&params.0.document)
            .await
            .map_err(sync_error_data)?;
        Ok(Json(DiagramsImportResponse {
            imported: report.imported.iter().map(mcp_summary).collect(),
            skipped: report.skipped,
            rejected: report
                .rejected
                .into_iter()
                .map(|rejected| McpRejectedDiagram {
                    index: rejected.index as u64,
                    reason: rejected.reason,
                })
                .collect(),
        }))
    }

    /// Export the live graph as a `{services, connections}` config document.
    #[tool(name = "config.export")]
    async fn config_export(&self) -> Result<Json<DocumentResponse>, ErrorData> {
        let workspace = self.state.lock().await;
        let document = workspace.export_config().map_err(sync_error_data)?;
        Ok(Json(DocumentResponse { document }))
    }

    /// Replace the live graph with a config document; nothing changes if it does not validate.
    #[tool(name = "config.import")]
    async fn config_import(
        &self,
        params: Parameters<DocumentParams>,
    ) -> Result<Json<DiagramCurrentResponse>, ErrorData> {
        let mut workspace = self.state.lock().await;
        workspace
            .import_config(&params.0.document)
            .map_err(sync_error_data)?;
        Ok(Json(current_diagram(workspace.session())))
    }
}

#[tool_handler]
impl ServerHandler for SvcgraphMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Svcgraph service topology editor (tools: graph.read, service.add, service.update, service.remove, service.search, connection.add, connection.update, connection.remove, dashboard.add, dashboard.update, dashboard.remove, selection.read, selection.update, pin.toggle, pin.clear, animations.set, diagram.list, diagram.current, diagram.save, diagram.load, diagram.delete, diagram.rename, diagram.reset, diagrams.export, diagrams.import, config.export, config.import)"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// Extracted mapping/parsing helpers for MCP tool handlers.
include!("server/helpers.rs");

#[cfg(test)]
mod tests;
