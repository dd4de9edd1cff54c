// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Svcgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{DiagramStore, StoreError};
use crate::model::{DiagramId, SavedDiagram};

/// In-memory diagram store.
///
/// [`MemoryStore::set_unavailable`] makes every call fail with [`StoreError::Unavailable`], the
/// way a browser store fails when persistence is disabled or the quota is exhausted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    diagrams: RwLock<BTreeMap<DiagramId, SavedDiagram>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.diagrams.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.diagrams.read().await.is_empty()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                reason: "memory store switched off".to_owned(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DiagramStore for MemoryStore {
    async fn put(&self, diagram: &SavedDiagram) -> Result<(), StoreError> {
        self.check_available()?;
        self.diagrams
            .write()
            .await
            .insert(diagram.diagram_id.clone(), diagram.clone());
        Ok(())
    }

    async fn get(&self, diagram_id: &DiagramId) -> Result<Option<SavedDiagram>, StoreError> {
        self.check_available()?;
        Ok(self.diagrams.read().await.get(diagram_id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<SavedDiagram>, StoreError> {
        self.check_available()?;
        Ok(self.diagrams.read().await.values().cloned().collect())
    }

    async fn delete(&self, diagram_id: &DiagramId) -> Result<(), StoreError> {
        self.check_available()?;
        self.diagrams.write().await.remove(diagram_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::MemoryStore;
    use crate::model::{DiagramId, Graph, SavedDiagram};
    use crate::store::{DiagramStore, StoreError};

    fn diagram(id: &str, name: &str) -> SavedDiagram {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        SavedDiagram {
            diagram_id: DiagramId::new(id).unwrap(),
            name: name.to_owned(),
            graph: Graph::default(),
            node_positions: Default::default(),
            edge_offsets: Default::default(),
            created_at: at,
            updated_at: at,
            rev: 0,
        }
    }

    #[tokio::test]
    async fn put_overwrites_and_delete_is_idempotent() {
        let store = MemoryStore::new();
        store.put(&diagram("d1", "first")).await.unwrap();
        store.put(&diagram("d1", "second")).await.unwrap();
        assert_eq!(store.len().await, 1);

        let id = DiagramId::new("d1").unwrap();
        assert_eq!(store.get(&id).await.unwrap().unwrap().name, "second");

        store.delete(&id).await.unwrap();
        store.delete(&id).await.unwrap();
        assert!(store.get(&id).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = MemoryStore::new();
        store.put(&diagram("d1", "first")).await.unwrap();
        store.set_unavailable(true);

        let id = DiagramId::new("d1").unwrap();
        assert!(matches!(
            store.get(&id).await,
            Err(StoreError::Unavailable { .. })
        ));
        assert!(store.get_all().await.is_err());
        assert!(store.put(&diagram("d2", "x")).await.is_err());
        assert!(store.delete(&id).await.is_err());

        store.set_unavailable(false);
        assert_eq!(store.get_all().await.unwrap().len(), 1);
    }
}
