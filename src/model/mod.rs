// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Svcgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A graph holds services and the directed connections between them; connections own their
//! dashboards. Saved diagrams pair a graph with the canvas layout it was saved with.

pub mod connection;
pub mod fixtures;
pub mod graph;
pub mod ids;
pub mod saved;
pub mod service;

pub use connection::{Connection, Dashboard};
pub use graph::{Graph, GraphSnapshot, GraphValidationError};
pub use ids::{ConnectionId, DashboardId, DiagramId, Id, IdError, ServiceId};
pub use saved::{
    sort_most_recent_first, DiagramSummary, EdgeOffsets, NodePositions, Point, SavedDiagram,
};
pub use service::{ParseServiceKindError, ServiceKind, ServiceLink, ServiceNode};
