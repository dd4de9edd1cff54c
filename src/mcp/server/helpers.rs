// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Svcgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// MCP server helper functions:
/// id parsing, error mapping, and model-to-response conversions.
fn parse_tool_id<T>(field: &'static str, value: &str) -> Result<Id<T>, ErrorData> {
    Id::new(value).map_err(|err| {
        ErrorData::invalid_params(
            format!("invalid {field}: {err}"),
            Some(serde_json::json!({ field: value })),
        )
    })
}

fn parse_service_kind(value: &str) -> Result<ServiceKind, ErrorData> {
    value.parse::<ServiceKind>().map_err(|err| {
        ErrorData::invalid_params(err.to_string(), Some(serde_json::json!({ "kind": value })))
    })
}

fn links_from_json(links: Vec<ServiceLinkJson>) -> Vec<ServiceLink> {
    links.into_iter().map(|link| ServiceLink::new(link.label, link.url)).collect()
}

fn apply_error_data(err: ApplyError) -> ErrorData {
    let data = Some(serde_json::json!({ "error": err.to_string() }));
    if err.is_not_found() {
        ErrorData::resource_not_found(err.to_string(), data)
    } else {
        ErrorData::invalid_params(err.to_string(), data)
    }
}

fn sync_error_data(err: SyncError) -> ErrorData {
    match err {
        SyncError::Apply(err) => apply_error_data(err),
        SyncError::Conflict {
            ref diagram_id,
            expected_rev,
            found_rev,
        } => ErrorData::invalid_request(
            err.to_string(),
            Some(serde_json::json!({
                "diagram_id": diagram_id.as_str(),
                "expected_rev": expected_rev,
                "found_rev": found_rev,
            })),
        ),
        SyncError::InvalidLayout { field, ref object_id } => ErrorData::invalid_params(
            err.to_string(),
            Some(serde_json::json!({ "field": field, "object_id": object_id })),
        ),
        SyncError::PartialImport { ref report, .. } => {
            let imported = report.imported.iter().map(mcp_summary).collect::<Vec<_>>();
            ErrorData::internal_error(
                err.to_string(),
                Some(serde_json::json!({ "imported": imported })),
            )
        }
        SyncError::Validation(_) | SyncError::EmptyName => {
            ErrorData::invalid_params(err.to_string(), None)
        }
        SyncError::Store(_) | SyncError::Format(_) => {
            ErrorData::internal_error(err.to_string(), None)
        }
    }
}

fn layout_error(field: &'static str, err: crate::format::FormatError) -> ErrorData {
    ErrorData::invalid_params(
        format!("invalid {field}: {err}"),
        Some(serde_json::json!({ "field": field })),
    )
}

fn mcp_delta(delta: &Delta) -> McpDelta {
    let keys = |keys: &[ObjectKey]| keys.iter().map(ToString::to_string).collect::<Vec<_>>();
    McpDelta {
        added: keys(&delta.added),
        removed: keys(&delta.removed),
        updated: keys(&delta.updated),
    }
}

fn apply_response(result: &ApplyResult, session: &EditorSession) -> ApplyResponse {
    ApplyResponse {
        applied: result.applied as u64,
        delta: mcp_delta(&result.delta),
        has_unsaved_changes: session.has_unsaved_changes(),
    }
}

fn mcp_summary(summary: &DiagramSummary) -> McpDiagramSummary {
    McpDiagramSummary {
        diagram_id: summary.diagram_id.as_str().to_owned(),
        name: summary.name.clone(),
        services: summary.services as u64,
        connections: summary.connections as u64,
        created_at: format_timestamp(&summary.created_at),
        updated_at: format_timestamp(&summary.updated_at),
        rev: summary.rev,
    }
}

fn view_state(session: &EditorSession) -> ViewStateResponse {
    let selection = match session.selection() {
        Selection::NoneSelected => "none",
        Selection::NodeSelected(_) => "node",
        Selection::EdgeSelected(_) => "edge",
    };
    ViewStateResponse {
        selection: selection.to_owned(),
        service_id: session.selection().service_id().map(|id| id.as_str().to_owned()),
        connection_id: session.selection().connection_id().map(|id| id.as_str().to_owned()),
        pinned_edge_ids: session
            .pinned_edge_ids()
            .iter()
            .map(|id| id.as_str().to_owned())
            .collect(),
        animations_enabled: session.animations_enabled(),
    }
}

fn current_diagram(session: &EditorSession) -> DiagramCurrentResponse {
    DiagramCurrentResponse {
        active_diagram_id: session.active_diagram_id().map(|id| id.as_str().to_owned()),
        rev: session.active_diagram().map(|active| active.rev),
        has_unsaved_changes: session.has_unsaved_changes(),
        services: session.graph().services().len() as u64,
        connections: session.graph().connections().len() as u64,
    }
}

fn service_json_of(
    session: &EditorSession,
    service_id: &ServiceId,
) -> Result<ServiceJson, ErrorData> {
    session.graph().service(service_id).map(service_to_json).ok_or_else(|| {
        ErrorData::internal_error(
            "service vanished after it was written",
            Some(serde_json::json!({ "service_id": service_id.as_str() })),
        )
    })
}

fn connection_json_of(
    session: &EditorSession,
    connection_id: &ConnectionId,
) -> Result<ConnectionJson, ErrorData> {
    session.graph().connection(connection_id).map(connection_to_json).ok_or_else(|| {
        ErrorData::internal_error(
            "connection vanished after it was written",
            Some(serde_json::json!({ "connection_id": connection_id.as_str() })),
        )
    })
}
