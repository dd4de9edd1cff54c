// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Svcgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::graph::Graph;
use super::ids::{ConnectionId, DiagramId, ServiceId};

/// A 2D canvas coordinate (node position) or displacement (edge label offset).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// JSON has no encoding for NaN or infinities, so only finite points can be persisted.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Canvas positions keyed by service id, as reported by the presentation layer.
pub type NodePositions = BTreeMap<ServiceId, Point>;

/// Edge label offsets from their default position, keyed by connection id.
pub type EdgeOffsets = BTreeMap<ConnectionId, Point>;

/// A named, durable snapshot of a diagram and its canvas layout.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedDiagram {
    pub diagram_id: DiagramId,
    pub name: String,
    pub graph: Graph,
    pub node_positions: NodePositions,
    pub edge_offsets: EdgeOffsets,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Bumped on every write; a save is rejected when the stored rev moved underneath it.
    pub rev: u64,
}

impl SavedDiagram {
    pub fn summary(&self) -> DiagramSummary {
        DiagramSummary {
            diagram_id: self.diagram_id.clone(),
            name: self.name.clone(),
            services: self.graph.services().len(),
            connections: self.graph.connections().len(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            rev: self.rev,
        }
    }
}

/// Listing entry for switching between saved diagrams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramSummary {
    pub diagram_id: DiagramId,
    pub name: String,
    pub services: usize,
    pub connections: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub rev: u64,
}

/// Sorts most recently updated first; ties fall back to name, then id, so the order is stable.
pub fn sort_most_recent_first(summaries: &mut [DiagramSummary]) {
    summaries.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.diagram_id.cmp(&b.diagram_id))
    });
}
