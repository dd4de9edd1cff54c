// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Svcgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use super::*;
use crate::format::PointJson;
use crate::store::{DiagramStore, MemoryStore};
use rmcp::model::ErrorCode;

fn demo_server() -> (SvcgraphMcp, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let server = SvcgraphMcp::new(Workspace::new(store.clone()));
    (server, store)
}

fn expect_err<T>(result: Result<Json<T>, ErrorData>, what: &str) -> ErrorData {
    match result {
        Ok(_) => panic!("{what} should fail"),
        Err(err) => err,
    }
}

#[tokio::test]
async fn graph_read_reports_the_default_topology_grouped_by_kind() {
    let (server, _) = demo_server();
    let Json(graph) = server.graph_read().await.expect("graph.read");

    assert_eq!(graph.services.len(), 7);
    assert_eq!(graph.connections.len(), 7);
    assert_eq!(graph.active_diagram_id, None);
    assert!(!graph.has_unsaved_changes);

    let kinds = graph.groups.iter().map(|group| group.kind.as_str()).collect::<Vec<_>>();
    assert_eq!(kinds, vec!["gateway", "microservice", "database", "cache", "queue", "cdn"]);
    assert_eq!(graph.groups[1].service_ids, vec!["auth-service", "user-service"]);
}

#[tokio::test]
async fn service_add_update_and_search() {
    let (server, _) = demo_server();
    let Json(added) = server
        .service_add(Parameters(ServiceAddParams {
            name: "Billing Service".to_owned(),
            kind: "microservice".to_owned(),
            color: None,
            description: Some("Invoices".to_owned()),
            links: vec![ServiceLinkJson {
                label: "Repo".to_owned(),
                url: "https://example.com/billing".to_owned(),
            }],
        }))
        .await
        .expect("service.add");
    assert_eq!(added.service.color, DEFAULT_SERVICE_COLOR);
    assert_eq!(added.service.description.as_deref(), Some("Invoices"));
    assert_eq!(added.service.links.len(), 1);

    let Json(updated) = server
        .service_update(Parameters(ServiceUpdateParams {
            service_id: added.service.id.clone(),
            name: None,
            kind: Some("queue".to_owned()),
            color: None,
            description: None,
            clear_description: true,
            links: None,
        }))
        .await
        .expect("service.update");
    assert_eq!(updated.applied, 1);
    assert_eq!(updated.delta.updated, vec![format!("service/{}", added.service.id)]);
    assert!(updated.has_unsaved_changes);

    let Json(found) = server
        .service_search(Parameters(ServiceSearchParams {
            query: "billing".to_owned(),
        }))
        .await
        .expect("service.search");
    assert_eq!(found.services.len(), 1);
    assert_eq!(found.services[0].kind, "queue");
    assert_eq!(found.services[0].description, None);
    assert_eq!(found.services[0].name, "Billing Service");
}

#[tokio::test]
async fn service_add_rejects_unknown_kind() {
    let (server, _) = demo_server();
    let err = expect_err(
        server
            .service_add(Parameters(ServiceAddParams {
                name: "Mystery".to_owned(),
                kind: "mainframe".to_owned(),
                color: None,
                description: None,
                links: Vec::new(),
            }))
            .await,
        "service.add",
    );
    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
}

#[tokio::test]
async fn service_remove_cascades_and_clears_selection() {
    let (server, _) = demo_server();
    server
        .selection_update(Parameters(SelectionUpdateParams {
            service_id: None,
            connection_id: Some("conn-3".to_owned()),
        }))
        .await
        .expect("selection.update");

    let Json(removed) = server
        .service_remove(Parameters(ServiceIdParams {
            service_id: "auth-service".to_owned(),
        }))
        .await
        .expect("service.remove");
    assert_eq!(
        removed.delta.removed,
        vec![
            "service/auth-service".to_owned(),
            "connection/conn-1".to_owned(),
            "connection/conn-3".to_owned(),
            "connection/conn-4".to_owned(),
        ]
    );

    let Json(graph) = server.graph_read().await.expect("graph.read");
    assert_eq!(graph.connections.len(), 4);

    let Json(state) = server.selection_read().await.expect("selection.read");
    assert_eq!(state.selection, "none");
}

#[tokio::test]
async fn removing_a_missing_service_is_not_found() {
    let (server, _) = demo_server();
    let err = expect_err(
        server
            .service_remove(Parameters(ServiceIdParams {
                service_id: "ghost".to_owned(),
            }))
            .await,
        "service.remove",
    );
    assert_eq!(err.code, ErrorCode::RESOURCE_NOT_FOUND);
}

#[tokio::test]
async fn connection_add_validates_endpoints() {
    let (server, _) = demo_server();
    let Json(added) = server
        .connection_add(Parameters(ConnectionAddParams {
            source: "cdn".to_owned(),
            target: "redis-cache".to_owned(),
            label: Some("Purge".to_owned()),
        }))
        .await
        .expect("connection.add");
    assert_eq!(added.connection.label.as_deref(), Some("Purge"));
    assert!(added.connection.dashboards.is_empty());

    let err = expect_err(
        server
            .connection_add(Parameters(ConnectionAddParams {
                source: "cdn".to_owned(),
                target: "cdn".to_owned(),
                label: None,
            }))
            .await,
        "self loop",
    );
    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);

    let err = expect_err(
        server
            .connection_add(Parameters(ConnectionAddParams {
                source: "cdn".to_owned(),
                target: "ghost".to_owned(),
                label: None,
            }))
            .await,
        "missing target",
    );
    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    assert!(err.message.contains("ghost"));
}

#[tokio::test]
async fn connection_label_can_be_cleared() {
    let (server, _) = demo_server();
    server
        .connection_update(Parameters(ConnectionUpdateParams {
            connection_id: "conn-7".to_owned(),
            label: None,
        }))
        .await
        .expect("connection.update");

    let Json(graph) = server.graph_read().await.expect("graph.read");
    let conn = graph.connections.iter().find(|c| c.id == "conn-7").expect("conn-7");
    assert_eq!(conn.label, None);
}

#[tokio::test]
async fn dashboards_are_managed_per_connection() {
    let (server, _) = demo_server();
    let Json(added) = server
        .dashboard_add(Parameters(DashboardAddParams {
            connection_id: "conn-4".to_owned(),
            title: "Auth DB Latency".to_owned(),
            iframe_url: "https://grafana.example.com/d/auth-db".to_owned(),
        }))
        .await
        .expect("dashboard.add");
    assert_eq!(added.connection.dashboards.len(), 1);

    server
        .dashboard_update(Parameters(DashboardUpdateParams {
            connection_id: "conn-4".to_owned(),
            dashboard_id: added.dashboard_id.clone(),
            title: Some("Auth DB p99".to_owned()),
            iframe_url: None,
        }))
        .await
        .expect("dashboard.update");

    let err = expect_err(
        server
            .dashboard_remove(Parameters(DashboardRemoveParams {
                connection_id: "conn-1".to_owned(),
                dashboard_id: added.dashboard_id.clone(),
            }))
            .await,
        "dashboard.remove on the wrong connection",
    );
    assert_eq!(err.code, ErrorCode::RESOURCE_NOT_FOUND);

    let Json(removed) = server
        .dashboard_remove(Parameters(DashboardRemoveParams {
            connection_id: "conn-4".to_owned(),
            dashboard_id: added.dashboard_id,
        }))
        .await
        .expect("dashboard.remove");
    assert_eq!(removed.applied, 1);
}

#[tokio::test]
async fn selection_pins_and_animations() {
    let (server, _) = demo_server();
    let Json(state) = server
        .selection_update(Parameters(SelectionUpdateParams {
            service_id: Some("cdn".to_owned()),
            connection_id: None,
        }))
        .await
        .expect("select node");
    assert_eq!(state.selection, "node");
    assert_eq!(state.service_id.as_deref(), Some("cdn"));

    let Json(state) = server
        .selection_update(Parameters(SelectionUpdateParams {
            service_id: None,
            connection_id: Some("conn-2".to_owned()),
        }))
        .await
        .expect("select edge");
    assert_eq!(state.selection, "edge");
    assert_eq!(state.service_id, None);

    let err = expect_err(
        server
            .selection_update(Parameters(SelectionUpdateParams {
                service_id: Some("cdn".to_owned()),
                connection_id: Some("conn-2".to_owned()),
            }))
            .await,
        "select both",
    );
    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);

    let Json(pinned) = server
        .pin_toggle(Parameters(ConnectionIdParams {
            connection_id: "conn-5".to_owned(),
        }))
        .await
        .expect("pin.toggle");
    assert!(pinned.pinned);
    assert_eq!(pinned.state.pinned_edge_ids, vec!["conn-5".to_owned()]);

    let Json(cleared) = server.pin_clear().await.expect("pin.clear");
    assert!(cleared.pinned_edge_ids.is_empty());

    let Json(toggled) = server
        .animations_set(Parameters(AnimationsSetParams { enabled: None }))
        .await
        .expect("animations.set");
    assert!(!toggled.animations_enabled);
    let Json(set) = server
        .animations_set(Parameters(AnimationsSetParams {
            enabled: Some(true),
        }))
        .await
        .expect("animations.set");
    assert!(set.animations_enabled);
}

#[tokio::test]
async fn save_list_load_rename_and_delete() {
    let (server, store) = demo_server();
    let mut node_positions = BTreeMap::new();
    node_positions.insert("cdn".to_owned(), PointJson { x: 700.0, y: 200.0 });

    let Json(saved) = server
        .diagram_save(Parameters(DiagramSaveParams {
            name: "  Staging ".to_owned(),
            node_positions,
            edge_offsets: BTreeMap::new(),
        }))
        .await
        .expect("diagram.save");
    assert_eq!(saved.diagram.name, "Staging");
    assert_eq!(saved.diagram.rev, 0);
    assert_eq!(store.len().await, 1);

    let Json(current) = server.diagram_current().await.expect("diagram.current");
    assert_eq!(current.active_diagram_id.as_deref(), Some(saved.diagram.diagram_id.as_str()));
    assert!(!current.has_unsaved_changes);

    server
        .service_remove(Parameters(ServiceIdParams {
            service_id: "cdn".to_owned(),
        }))
        .await
        .expect("service.remove");

    let Json(renamed) = server
        .diagram_rename(Parameters(DiagramRenameParams {
            diagram_id: saved.diagram.diagram_id.clone(),
            name: "Staging-v2".to_owned(),
        }))
        .await
        .expect("diagram.rename");
    assert!(renamed.renamed);

    let Json(listed) = server.diagram_list().await.expect("diagram.list");
    assert_eq!(listed.diagrams.len(), 1);
    assert_eq!(listed.diagrams[0].name, "Staging-v2");
    assert_eq!(listed.diagrams[0].rev, 1);

    let Json(loaded) = server
        .diagram_load(Parameters(DiagramIdParams {
            diagram_id: saved.diagram.diagram_id.clone(),
        }))
        .await
        .expect("diagram.load");
    let loaded = loaded.loaded.expect("diagram is stored");
    assert_eq!(loaded.services.len(), 7);
    assert_eq!(loaded.node_positions["cdn"].x, 700.0);

    let Json(deleted) = server
        .diagram_delete(Parameters(DiagramIdParams {
            diagram_id: saved.diagram.diagram_id,
        }))
        .await
        .expect("diagram.delete");
    assert!(deleted.was_active);
    assert!(store.is_empty().await);

    let Json(current) = server.diagram_current().await.expect("diagram.current");
    assert_eq!(current.active_diagram_id, None);
    assert!(current.has_unsaved_changes);
}

#[tokio::test]
async fn missing_diagrams_are_benign() {
    let (server, _) = demo_server();
    let Json(loaded) = server
        .diagram_load(Parameters(DiagramIdParams {
            diagram_id: "nope".to_owned(),
        }))
        .await
        .expect("diagram.load");
    assert!(loaded.loaded.is_none());

    let Json(renamed) = server
        .diagram_rename(Parameters(DiagramRenameParams {
            diagram_id: "nope".to_owned(),
            name: "x".to_owned(),
        }))
        .await
        .expect("diagram.rename");
    assert!(!renamed.renamed);
}

#[tokio::test]
async fn save_rejects_blank_names_and_bad_layout_ids() {
    let (server, store) = demo_server();
    let err = expect_err(
        server
            .diagram_save(Parameters(DiagramSaveParams {
                name: "   ".to_owned(),
                node_positions: BTreeMap::new(),
                edge_offsets: BTreeMap::new(),
            }))
            .await,
        "blank name",
    );
    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);

    let mut node_positions = BTreeMap::new();
    node_positions.insert(String::new(), PointJson { x: 0.0, y: 0.0 });
    let err = expect_err(
        server
            .diagram_save(Parameters(DiagramSaveParams {
                name: "Prod".to_owned(),
                node_positions,
                edge_offsets: BTreeMap::new(),
            }))
            .await,
        "bad layout id",
    );
    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn stale_save_is_an_invalid_request() {
    let store = Arc::new(MemoryStore::new());
    let first = SvcgraphMcp::new(Workspace::new(store.clone()));
    let Json(saved) = first
        .diagram_save(Parameters(DiagramSaveParams {
            name: "Shared".to_owned(),
            node_positions: BTreeMap::new(),
            edge_offsets: BTreeMap::new(),
        }))
        .await
        .expect("diagram.save");

    let mut other = Workspace::new(store.clone());
    let diagram_id = DiagramId::new(saved.diagram.diagram_id.clone()).expect("diagram id");
    other.load_diagram(&diagram_id).await.expect("load");
    other
        .save_diagram("Shared", Default::default(), Default::default())
        .await
        .expect("save from the other workspace");

    let err = expect_err(
        first
            .diagram_save(Parameters(DiagramSaveParams {
                name: "Shared".to_owned(),
                node_positions: BTreeMap::new(),
                edge_offsets: BTreeMap::new(),
            }))
            .await,
        "stale save",
    );
    assert_eq!(err.code, ErrorCode::INVALID_REQUEST);
    assert_eq!(store.get(&diagram_id).await.expect("get").expect("stored").rev, 1);
}

#[tokio::test]
async fn store_failures_are_internal_errors() {
    let (server, store) = demo_server();
    store.set_unavailable(true);
    let err = expect_err(server.diagram_list().await, "diagram.list");
    assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
}

#[tokio::test]
async fn export_then_import_skips_existing_names() {
    let (server, store) = demo_server();
    server
        .diagram_save(Parameters(DiagramSaveParams {
            name: "Production".to_owned(),
            node_positions: BTreeMap::new(),
            edge_offsets: BTreeMap::new(),
        }))
        .await
        .expect("diagram.save");

    let Json(exported) = server.diagrams_export().await.expect("diagrams.export");
    let value: serde_json::Value = serde_json::from_str(&exported.document).expect("json");
    assert_eq!(value["version"], 1);

    let Json(report) = server
        .diagrams_import(Parameters(DocumentParams {
            document: exported.document,
        }))
        .await
        .expect("diagrams.import");
    assert!(report.imported.is_empty());
    assert_eq!(report.skipped, vec!["Production".to_owned()]);
    assert_eq!(store.len().await, 1);

    let err = expect_err(
        server
            .diagrams_import(Parameters(DocumentParams {
                document: "not json".to_owned(),
            }))
            .await,
        "diagrams.import",
    );
    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
}

#[tokio::test]
async fn config_round_trip_and_reset() {
    let (server, _) = demo_server();
    let Json(exported) = server.config_export().await.expect("config.export");

    server
        .service_remove(Parameters(ServiceIdParams {
            service_id: "api-gateway".to_owned(),
        }))
        .await
        .expect("service.remove");

    let Json(current) = server
        .config_import(Parameters(DocumentParams {
            document: exported.document,
        }))
        .await
        .expect("config.import");
    assert_eq!(current.services, 7);
    assert_eq!(current.connections, 7);

    let err = expect_err(
        server
            .config_import(Parameters(DocumentParams {
                document: r#"{"services": []}"#.to_owned(),
            }))
            .await,
        "config.import",
    );
    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);

    server
        .service_remove(Parameters(ServiceIdParams {
            service_id: "cdn".to_owned(),
        }))
        .await
        .expect("service.remove");
    let Json(reset) = server.diagram_reset().await.expect("diagram.reset");
    assert_eq!(reset.services, 7);
    assert_eq!(reset.active_diagram_id, None);
}
