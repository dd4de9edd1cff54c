// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Svcgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! JSON shapes of services, connections and diagram records.
//!
//! These are kept apart from the model types: the model stays free of serde, and every
//! conversion from JSON is a validating step that can fail with a [`FormatError`].

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::FormatError;
use crate::model::{
    Connection, Dashboard, DashboardId, DiagramId, EdgeOffsets, Graph, GraphSnapshot, Id,
    NodePositions, Point, SavedDiagram, ServiceKind, ServiceLink, ServiceNode,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PointJson {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ServiceLinkJson {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ServiceJson {
    pub id: String,
    pub name: String,
    /// One of `microservice`, `database`, `cache`, `queue`, `cdn`, `gateway`.
    #[serde(rename = "type")]
    pub kind: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<ServiceLinkJson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardJson {
    pub id: String,
    pub title: String,
    pub iframe_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConnectionJson {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub dashboards: Vec<DashboardJson>,
}

/// One saved diagram, as stored on disk and inside export bundles.
///
/// Every field is optional on the way in so a missing field surfaces as
/// [`FormatError::MissingField`] instead of a generic decode failure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiagramRecordJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<ServiceJson>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<Vec<ConnectionJson>>,
    #[serde(default)]
    pub node_positions: BTreeMap<String, PointJson>,
    #[serde(default)]
    pub edge_offsets: BTreeMap<String, PointJson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub rev: u64,
}

/// The pre-multi-diagram single graph document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ConfigJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<ServiceJson>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<Vec<ConnectionJson>>,
}

/// A diagram parsed out of an import document. It carries no id: imported ids are never
/// trusted and a fresh one is minted on persist.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportCandidate {
    pub name: String,
    pub graph: Graph,
    pub node_positions: NodePositions,
    pub edge_offsets: EdgeOffsets,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, FormatError> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|source| FormatError::InvalidTimestamp {
            field,
            value: value.to_owned(),
            source,
        })
}

fn parse_id<T>(field: &'static str, value: String) -> Result<Id<T>, FormatError> {
    Id::new(value.clone()).map_err(|source| FormatError::InvalidId {
        field,
        value,
        source,
    })
}

pub fn service_to_json(service: &ServiceNode) -> ServiceJson {
    ServiceJson {
        id: service.service_id().to_string(),
        name: service.name().to_owned(),
        kind: service.kind().as_str().to_owned(),
        color: service.color().to_owned(),
        description: service.description().map(ToOwned::to_owned),
        links: service
            .links()
            .iter()
            .map(|link| ServiceLinkJson {
                label: link.label().to_owned(),
                url: link.url().to_owned(),
            })
            .collect(),
    }
}

pub fn service_from_json(service_json: ServiceJson) -> Result<ServiceNode, FormatError> {
    let service_id = parse_id("services[].id", service_json.id)?;
    let kind = service_json
        .kind
        .parse::<ServiceKind>()
        .map_err(|source| FormatError::InvalidServiceKind { source })?;

    let mut service = ServiceNode::new(service_id, service_json.name, kind, service_json.color);
    service.set_description(service_json.description);
    service.set_links(
        service_json
            .links
            .into_iter()
            .map(|link| ServiceLink::new(link.label, link.url))
            .collect(),
    );
    Ok(service)
}

pub fn connection_to_json(connection: &Connection) -> ConnectionJson {
    ConnectionJson {
        id: connection.connection_id().to_string(),
        source: connection.source().to_string(),
        target: connection.target().to_string(),
        label: connection.label().map(ToOwned::to_owned),
        dashboards: connection
            .dashboards()
            .iter()
            .map(|dashboard| DashboardJson {
                id: dashboard.dashboard_id().to_string(),
                title: dashboard.title().to_owned(),
                iframe_url: dashboard.iframe_url().to_owned(),
            })
            .collect(),
    }
}

pub fn connection_from_json(connection_json: ConnectionJson) -> Result<Connection, FormatError> {
    let mut connection = Connection::new(
        parse_id("connections[].id", connection_json.id)?,
        parse_id("connections[].source", connection_json.source)?,
        parse_id("connections[].target", connection_json.target)?,
    );
    connection.set_label(connection_json.label);
    for dashboard_json in connection_json.dashboards {
        let dashboard_id: DashboardId =
            parse_id("connections[].dashboards[].id", dashboard_json.id)?;
        connection.dashboards_mut().push(Dashboard::new(
            dashboard_id,
            dashboard_json.title,
            dashboard_json.iframe_url,
        ));
    }
    Ok(connection)
}

pub fn graph_to_json(graph: &Graph) -> (Vec<ServiceJson>, Vec<ConnectionJson>) {
    (
        graph.services().iter().map(service_to_json).collect(),
        graph.connections().iter().map(connection_to_json).collect(),
    )
}

pub fn graph_from_json(
    services: Vec<ServiceJson>,
    connections: Vec<ConnectionJson>,
) -> Result<Graph, FormatError> {
    let snapshot = GraphSnapshot {
        services: services
            .into_iter()
            .map(service_from_json)
            .collect::<Result<_, _>>()?,
        connections: connections
            .into_iter()
            .map(connection_from_json)
            .collect::<Result<_, _>>()?,
    };
    Graph::from_snapshot(snapshot).map_err(|source| FormatError::InvalidGraph { source })
}

pub fn points_to_json<T>(points: &BTreeMap<Id<T>, Point>) -> BTreeMap<String, PointJson> {
    points
        .iter()
        .map(|(id, point)| {
            (
                id.to_string(),
                PointJson {
                    x: point.x,
                    y: point.y,
                },
            )
        })
        .collect()
}

pub fn points_from_json<T>(
    field: &'static str,
    points: BTreeMap<String, PointJson>,
) -> Result<BTreeMap<Id<T>, Point>, FormatError>
where
    Id<T>: Ord,
{
    points
        .into_iter()
        .map(|(id, point)| Ok((parse_id(field, id)?, Point::new(point.x, point.y))))
        .collect()
}

pub fn record_to_json(diagram: &SavedDiagram) -> DiagramRecordJson {
    let (services, connections) = graph_to_json(&diagram.graph);
    DiagramRecordJson {
        id: Some(diagram.diagram_id.to_string()),
        name: Some(diagram.name.clone()),
        services: Some(services),
        connections: Some(connections),
        node_positions: points_to_json(&diagram.node_positions),
        edge_offsets: points_to_json(&diagram.edge_offsets),
        created_at: Some(format_timestamp(&diagram.created_at)),
        updated_at: Some(format_timestamp(&diagram.updated_at)),
        rev: diagram.rev,
    }
}

/// Validates everything but the id; shared by stored records and import candidates.
pub fn candidate_from_json(record: DiagramRecordJson) -> Result<ImportCandidate, FormatError> {
    let name = record
        .name
        .ok_or(FormatError::MissingField { field: "name" })?;
    let services = record
        .services
        .ok_or(FormatError::MissingField { field: "services" })?;
    let connections = record
        .connections
        .ok_or(FormatError::MissingField {
            field: "connections",
        })?;

    let graph = graph_from_json(services, connections)?;
    let node_positions = points_from_json("nodePositions", record.node_positions)?;
    let edge_offsets = points_from_json("edgeOffsets", record.edge_offsets)?;
    let created_at = record
        .created_at
        .as_deref()
        .map(|value| parse_timestamp("createdAt", value))
        .transpose()?;
    let updated_at = record
        .updated_at
        .as_deref()
        .map(|value| parse_timestamp("updatedAt", value))
        .transpose()?;

    Ok(ImportCandidate {
        name,
        graph,
        node_positions,
        edge_offsets,
        created_at,
        updated_at,
    })
}

/// Decodes a stored record; unlike import candidates it must carry its id and both timestamps.
pub fn record_from_json(mut record: DiagramRecordJson) -> Result<SavedDiagram, FormatError> {
    let id = record
        .id
        .take()
        .ok_or(FormatError::MissingField { field: "id" })?;
    let diagram_id: DiagramId = parse_id("id", id)?;
    let rev = record.rev;
    let candidate = candidate_from_json(record)?;

    Ok(SavedDiagram {
        diagram_id,
        name: candidate.name,
        graph: candidate.graph,
        node_positions: candidate.node_positions,
        edge_offsets: candidate.edge_offsets,
        created_at: candidate
            .created_at
            .ok_or(FormatError::MissingField { field: "createdAt" })?,
        updated_at: candidate
            .updated_at
            .ok_or(FormatError::MissingField { field: "updatedAt" })?,
        rev,
    })
}
