// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Svcgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Interchange formats.
//!
//! - The export bundle: `{"version": 1, "exportedAt": ..., "diagrams": [record, ...]}`. Import
//!   also accepts a bare array of records.
//! - The legacy single graph config: `{"services": [...], "connections": [...]}`.
//! - The diagram record, shared by bundles and the folder store.

use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{Graph, GraphValidationError, IdError, ParseServiceKindError, SavedDiagram};

pub mod records;

pub use records::{
    candidate_from_json, connection_from_json, connection_to_json, format_timestamp,
    graph_from_json, graph_to_json, points_from_json, points_to_json, record_from_json,
    record_to_json, service_from_json, service_to_json, ConfigJson, ConnectionJson,
    DashboardJson, DiagramRecordJson, ImportCandidate, PointJson, ServiceJson, ServiceLinkJson,
};

pub const BUNDLE_VERSION: u64 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BundleJson {
    pub version: u64,
    pub exported_at: String,
    pub diagrams: Vec<DiagramRecordJson>,
}

#[derive(Debug)]
pub enum FormatError {
    Json {
        source: serde_json::Error,
    },
    MissingField {
        field: &'static str,
    },
    InvalidId {
        field: &'static str,
        value: String,
        source: IdError,
    },
    InvalidServiceKind {
        source: ParseServiceKindError,
    },
    InvalidGraph {
        source: GraphValidationError,
    },
    InvalidTimestamp {
        field: &'static str,
        value: String,
        source: chrono::ParseError,
    },
    NotADiagramList,
    UnsupportedVersion {
        version: u64,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json { source } => write!(f, "invalid json: {source}"),
            Self::MissingField { field } => write!(f, "missing field {field}"),
            Self::InvalidId {
                field,
                value,
                source,
            } => write!(f, "invalid id for {field}: {value:?}: {source}"),
            Self::InvalidServiceKind { source } => write!(f, "{source}"),
            Self::InvalidGraph { source } => write!(f, "invalid graph: {source}"),
            Self::InvalidTimestamp {
                field,
                value,
                source,
            } => write!(f, "invalid timestamp for {field}: {value:?}: {source}"),
            Self::NotADiagramList => write!(
                f,
                "document is neither a diagram array nor an object with a diagrams array"
            ),
            Self::UnsupportedVersion { version } => {
                write!(f, "unsupported bundle version {version} (expected {BUNDLE_VERSION})")
            }
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json { source } => Some(source),
            Self::InvalidId { source, .. } => Some(source),
            Self::InvalidServiceKind { source } => Some(source),
            Self::InvalidGraph { source } => Some(source),
            Self::InvalidTimestamp { source, .. } => Some(source),
            Self::MissingField { .. } | Self::NotADiagramList | Self::UnsupportedVersion { .. } => {
                None
            }
        }
    }
}

/// Serializes `diagrams` into a pretty-printed export bundle.
pub fn export_bundle(
    diagrams: &[SavedDiagram],
    exported_at: DateTime<Utc>,
) -> Result<String, FormatError> {
    let bundle = BundleJson {
        version: BUNDLE_VERSION,
        exported_at: format_timestamp(&exported_at),
        diagrams: diagrams.iter().map(record_to_json).collect(),
    };
    serde_json::to_string_pretty(&bundle).map_err(|source| FormatError::Json { source })
}

/// Parses an import document into per-element results.
///
/// The outer `Err` means the document as a whole is unusable (not JSON, no diagram array, or a
/// newer bundle version). Inner errors reject single elements and leave the rest importable.
pub fn parse_bundle(text: &str) -> Result<Vec<Result<ImportCandidate, FormatError>>, FormatError> {
    let document: serde_json::Value =
        serde_json::from_str(text).map_err(|source| FormatError::Json { source })?;

    let elements = match document {
        serde_json::Value::Array(elements) => elements,
        serde_json::Value::Object(mut object) => {
            if let Some(version) = object.get("version").and_then(serde_json::Value::as_u64) {
                if version > BUNDLE_VERSION {
                    return Err(FormatError::UnsupportedVersion { version });
                }
            }
            match object.remove("diagrams") {
                Some(serde_json::Value::Array(elements)) => elements,
                _ => return Err(FormatError::NotADiagramList),
            }
        }
        _ => return Err(FormatError::NotADiagramList),
    };

    Ok(elements
        .into_iter()
        .map(|element| {
            let record: DiagramRecordJson =
                serde_json::from_value(element).map_err(|source| FormatError::Json { source })?;
            candidate_from_json(record)
        })
        .collect())
}

pub fn export_config(graph: &Graph) -> Result<String, FormatError> {
    let (services, connections) = graph_to_json(graph);
    let config = ConfigJson {
        services: Some(services),
        connections: Some(connections),
    };
    serde_json::to_string_pretty(&config).map_err(|source| FormatError::Json { source })
}

/// Parses a legacy config document; both `services` and `connections` must be present.
pub fn parse_config(text: &str) -> Result<Graph, FormatError> {
    let config: ConfigJson =
        serde_json::from_str(text).map_err(|source| FormatError::Json { source })?;
    config_to_graph(config)
}

pub fn config_to_graph(config: ConfigJson) -> Result<Graph, FormatError> {
    let services = config
        .services
        .ok_or(FormatError::MissingField { field: "services" })?;
    let connections = config.connections.ok_or(FormatError::MissingField {
        field: "connections",
    })?;
    graph_from_json(services, connections)
}

pub fn record_to_string(diagram: &SavedDiagram) -> Result<String, FormatError> {
    serde_json::to_string_pretty(&record_to_json(diagram))
        .map_err(|source| FormatError::Json { source })
}

pub fn record_from_str(text: &str) -> Result<SavedDiagram, FormatError> {
    let record: DiagramRecordJson =
        serde_json::from_str(text).map_err(|source| FormatError::Json { source })?;
    record_from_json(record)
}
