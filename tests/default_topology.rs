// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Svcgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rstest::rstest;

use svcgraph::model::{ConnectionId, EdgeOffsets, NodePositions, Point, ServiceId};
use svcgraph::session::{EditorSession, Selection};
use svcgraph::store::{DiagramFolder, DiagramStore, MemoryStore};
use svcgraph::sync::{SyncError, Workspace};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: std::path::PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = std::env::temp_dir();
        path.push(format!("svcgraph-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

fn sid(value: &str) -> ServiceId {
    ServiceId::new(value).expect("service id")
}

fn cid(value: &str) -> ConnectionId {
    ConnectionId::new(value).expect("connection id")
}

#[test]
fn removing_auth_service_leaves_four_connections() {
    let mut session = EditorSession::default();
    session.select_edge(cid("conn-3"));
    session.toggle_pin_edge(cid("conn-1"));
    session.toggle_pin_edge(cid("conn-5"));

    let result = session.remove_service(sid("auth-service")).expect("remove auth-service");

    let remaining = session
        .graph()
        .connections()
        .iter()
        .map(|connection| connection.connection_id().as_str())
        .collect::<Vec<_>>();
    assert_eq!(remaining, vec!["conn-2", "conn-5", "conn-6", "conn-7"]);
    assert_eq!(
        result.delta.removed_connections().cloned().collect::<Vec<_>>(),
        vec![cid("conn-1"), cid("conn-3"), cid("conn-4")]
    );

    assert_eq!(session.selection(), &Selection::NoneSelected);
    assert!(!session.is_edge_pinned(&cid("conn-1")));
    assert!(session.is_edge_pinned(&cid("conn-5")));
    assert!(session.has_unsaved_changes());

    for connection in session.graph().connections() {
        assert!(session.graph().contains_service(connection.source()));
        assert!(session.graph().contains_service(connection.target()));
    }
}

async fn save_twice_updates_the_same_record(store: Arc<dyn DiagramStore>) {
    let mut workspace = Workspace::new(store.clone());
    let mut positions = NodePositions::new();
    positions.insert(sid("api-gateway"), Point::new(400.0, 50.0));

    let first = workspace
        .save_diagram("Staging", positions.clone(), EdgeOffsets::new())
        .await
        .expect("first save");
    assert_eq!(workspace.session().active_diagram_id(), Some(&first.diagram_id));
    assert!(!workspace.session().has_unsaved_changes());

    workspace.session_mut().remove_service(sid("cdn")).expect("remove cdn");
    let mut offsets = EdgeOffsets::new();
    offsets.insert(cid("conn-2"), Point::new(10.0, -4.0));

    let second = workspace
        .save_diagram("Staging-v2", positions, offsets)
        .await
        .expect("second save");
    assert_eq!(second.diagram_id, first.diagram_id);
    assert_eq!(second.name, "Staging-v2");
    assert_eq!(second.created_at, first.created_at);
    assert_eq!(second.rev, first.rev + 1);

    let all = store.get_all().await.expect("get_all");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Staging-v2");
    assert_eq!(all[0].graph.services().len(), 6);
    assert_eq!(all[0].edge_offsets[&cid("conn-2")], Point::new(10.0, -4.0));

    let mut reopened = Workspace::open(store).await.expect("open");
    assert_eq!(reopened.listing().len(), 1);
    let loaded = reopened
        .load_diagram(&first.diagram_id)
        .await
        .expect("load")
        .expect("stored diagram");
    assert_eq!(loaded.graph, workspace.session().graph().clone());
    assert_eq!(loaded.node_positions[&sid("api-gateway")], Point::new(400.0, 50.0));
}

fn store_for(tmp: &TempDir, on_disk: bool) -> Arc<dyn DiagramStore> {
    if on_disk {
        Arc::new(DiagramFolder::new(tmp.path.join("store")))
    } else {
        Arc::new(MemoryStore::new())
    }
}

#[rstest]
#[case::memory(false)]
#[case::folder(true)]
#[tokio::test]
async fn saving_twice_renames_the_active_record(#[case] on_disk: bool) {
    let tmp = TempDir::new("default-topology");
    save_twice_updates_the_same_record(store_for(&tmp, on_disk)).await;
}

#[rstest]
#[case::memory(false)]
#[case::folder(true)]
#[tokio::test]
async fn unrepresentable_layout_never_reaches_the_store(#[case] on_disk: bool) {
    let tmp = TempDir::new("non-finite-layout");
    let store = store_for(&tmp, on_disk);
    let mut workspace = Workspace::new(store.clone());

    let mut positions = NodePositions::new();
    positions.insert(sid("cdn"), Point::new(f64::NAN, 1.0));
    let err = workspace
        .save_diagram("Prod", positions, EdgeOffsets::new())
        .await
        .expect_err("NaN position must not save");
    assert!(matches!(err, SyncError::InvalidLayout { .. }), "{err}");

    assert!(store.get_all().await.expect("get_all").is_empty());
    assert!(workspace.session().active_diagram_id().is_none());

    let saved = workspace
        .save_diagram("Prod", NodePositions::new(), EdgeOffsets::new())
        .await
        .expect("finite save");
    assert_eq!(store.get_all().await.expect("get_all").len(), 1);
    assert_eq!(workspace.listing()[0].diagram_id, saved.diagram_id);
}
