// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Svcgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Graph mutation implementation helpers used by `apply_ops`.
/// Keeps `ops::mod` focused on public op types and orchestration.
fn apply_graph_op(
    graph: &mut Graph,
    op: &GraphOp,
    delta: &mut DeltaBuilder,
) -> Result<(), ApplyError> {
    match op {
        GraphOp::AddService { service } => {
            let service_id = service.service_id();
            if graph.contains_service(service_id) {
                return Err(ApplyError::AlreadyExists {
                    kind: ObjectKind::Service,
                    object_id: service_id.to_string(),
                });
            }
            graph.services_mut().push(service.clone());
            delta.record_added(ObjectKey::Service(service_id.clone()));
            Ok(())
        }
        GraphOp::UpdateService { service_id, patch } => {
            let existing = service_or_not_found(graph, service_id)?;

            if let Some(name) = &patch.name {
                existing.set_name(name.clone());
            }
            if let Some(kind) = patch.kind {
                existing.set_kind(kind);
            }
            if let Some(color) = &patch.color {
                existing.set_color(color.clone());
            }
            if let Some(description) = &patch.description {
                existing.set_description(description.clone());
            }
            if let Some(links) = &patch.links {
                existing.set_links(links.clone());
            }
            delta.record_updated(ObjectKey::Service(service_id.clone()));
            Ok(())
        }
        GraphOp::AddServiceLink { service_id, link } => {
            let existing = service_or_not_found(graph, service_id)?;
            existing.links_mut().push(link.clone());
            delta.record_updated(ObjectKey::Service(service_id.clone()));
            Ok(())
        }
        GraphOp::RemoveServiceLink { service_id, index } => {
            let existing = service_or_not_found(graph, service_id)?;
            if *index >= existing.links().len() {
                return Err(ApplyError::NotFound {
                    kind: ObjectKind::ServiceLink,
                    object_id: format!("{service_id}#{index}"),
                });
            }
            existing.links_mut().remove(*index);
            delta.record_updated(ObjectKey::Service(service_id.clone()));
            Ok(())
        }
        GraphOp::RemoveService { service_id } => {
            let before = graph.services().len();
            graph
                .services_mut()
                .retain(|service| service.service_id() != service_id);
            if graph.services().len() == before {
                return Err(ApplyError::NotFound {
                    kind: ObjectKind::Service,
                    object_id: service_id.to_string(),
                });
            }

            let removed_connection_ids = graph
                .connections_touching(service_id)
                .map(|connection| connection.connection_id().clone())
                .collect::<Vec<_>>();
            graph
                .connections_mut()
                .retain(|connection| !connection.touches(service_id));
            for connection_id in removed_connection_ids {
                delta.record_removed(ObjectKey::Connection(connection_id));
            }
            delta.record_removed(ObjectKey::Service(service_id.clone()));
            Ok(())
        }
        GraphOp::AddConnection { connection } => {
            let connection_id = connection.connection_id();
            if graph.contains_connection(connection_id) {
                return Err(ApplyError::AlreadyExists {
                    kind: ObjectKind::Connection,
                    object_id: connection_id.to_string(),
                });
            }
            for endpoint in [connection.source(), connection.target()] {
                if !graph.contains_service(endpoint) {
                    return Err(ApplyError::MissingService {
                        service_id: endpoint.clone(),
                    });
                }
            }
            if connection.source() == connection.target() {
                return Err(ApplyError::SelfLoop {
                    connection_id: connection_id.clone(),
                });
            }
            graph.connections_mut().push(connection.clone());
            delta.record_added(ObjectKey::Connection(connection_id.clone()));
            Ok(())
        }
        GraphOp::UpdateConnection {
            connection_id,
            patch,
        } => {
            let existing = connection_or_not_found(graph, connection_id)?;
            if let Some(label) = &patch.label {
                existing.set_label(label.clone());
            }
            delta.record_updated(ObjectKey::Connection(connection_id.clone()));
            Ok(())
        }
        GraphOp::RemoveConnection { connection_id } => {
            let before = graph.connections().len();
            graph
                .connections_mut()
                .retain(|connection| connection.connection_id() != connection_id);
            if graph.connections().len() == before {
                return Err(ApplyError::NotFound {
                    kind: ObjectKind::Connection,
                    object_id: connection_id.to_string(),
                });
            }
            delta.record_removed(ObjectKey::Connection(connection_id.clone()));
            Ok(())
        }
        GraphOp::AddDashboard {
            connection_id,
            dashboard,
        } => {
            let existing = connection_or_not_found(graph, connection_id)?;
            let dashboard_id = dashboard.dashboard_id();
            if existing.dashboard(dashboard_id).is_some() {
                return Err(ApplyError::AlreadyExists {
                    kind: ObjectKind::Dashboard,
                    object_id: dashboard_id.to_string(),
                });
            }
            existing.dashboards_mut().push(dashboard.clone());
            delta.record_added(ObjectKey::Dashboard {
                connection_id: connection_id.clone(),
                dashboard_id: dashboard_id.clone(),
            });
            Ok(())
        }
        GraphOp::UpdateDashboard {
            connection_id,
            dashboard_id,
            patch,
        } => {
            let existing = connection_or_not_found(graph, connection_id)?;
            let Some(dashboard) = existing.dashboard_mut(dashboard_id) else {
                return Err(ApplyError::NotFound {
                    kind: ObjectKind::Dashboard,
                    object_id: dashboard_id.to_string(),
                });
            };

            if let Some(title) = &patch.title {
                dashboard.set_title(title.clone());
            }
            if let Some(iframe_url) = &patch.iframe_url {
                dashboard.set_iframe_url(iframe_url.clone());
            }
            delta.record_updated(ObjectKey::Dashboard {
                connection_id: connection_id.clone(),
                dashboard_id: dashboard_id.clone(),
            });
            Ok(())
        }
        GraphOp::RemoveDashboard {
            connection_id,
            dashboard_id,
        } => {
            let existing = connection_or_not_found(graph, connection_id)?;
            let before = existing.dashboards().len();
            existing
                .dashboards_mut()
                .retain(|dashboard| dashboard.dashboard_id() != dashboard_id);
            if existing.dashboards().len() == before {
                return Err(ApplyError::NotFound {
                    kind: ObjectKind::Dashboard,
                    object_id: dashboard_id.to_string(),
                });
            }
            delta.record_removed(ObjectKey::Dashboard {
                connection_id: connection_id.clone(),
                dashboard_id: dashboard_id.clone(),
            });
            Ok(())
        }
    }
}

fn service_or_not_found<'a>(
    graph: &'a mut Graph,
    service_id: &ServiceId,
) -> Result<&'a mut ServiceNode, ApplyError> {
    graph
        .service_mut(service_id)
        .ok_or_else(|| ApplyError::NotFound {
            kind: ObjectKind::Service,
            object_id: service_id.to_string(),
        })
}

fn connection_or_not_found<'a>(
    graph: &'a mut Graph,
    connection_id: &ConnectionId,
) -> Result<&'a mut Connection, ApplyError> {
    graph
        .connection_mut(connection_id)
        .ok_or_else(|| ApplyError::NotFound {
            kind: ObjectKind::Connection,
            object_id: connection_id.to_string(),
        })
}
