// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Svcgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The built-in starter topology used on first launch and by "reset to defaults".

use super::connection::{Connection, Dashboard};
use super::graph::{Graph, GraphSnapshot};
use super::ids::{ConnectionId, DashboardId, ServiceId};
use super::service::{ServiceKind, ServiceLink, ServiceNode};

const GRAFANA_PANEL: &str = "https://play.grafana.org/d-solo/000000012/grafana-play-home?orgId=1";

fn sid(value: &str) -> ServiceId {
    ServiceId::new(value).expect("hard-coded service id is valid")
}

fn cid(value: &str) -> ConnectionId {
    ConnectionId::new(value).expect("hard-coded connection id is valid")
}

fn dashboard(id: &str, title: &str, panel_id: u32) -> Dashboard {
    Dashboard::new(
        DashboardId::new(id).expect("hard-coded dashboard id is valid"),
        title,
        format!("{GRAFANA_PANEL}&panelId={panel_id}"),
    )
}

fn connection(id: &str, source: &str, target: &str, label: &str) -> Connection {
    Connection::new(cid(id), sid(source), sid(target)).with_label(label)
}

pub fn default_topology() -> Graph {
    let services = vec![
        ServiceNode::new(sid("api-gateway"), "API Gateway", ServiceKind::Gateway, "#6366f1")
            .with_description(
                "Main entry point for all client requests. Routes traffic to internal services.",
            )
            .with_link(ServiceLink::new("Runbook", "https://wiki.example.com/api-gateway"))
            .with_link(ServiceLink::new(
                "Repository",
                "https://github.com/example/api-gateway",
            )),
        ServiceNode::new(
            sid("auth-service"),
            "Auth Service",
            ServiceKind::Microservice,
            "#f43f5e",
        )
        .with_description("Handles authentication, authorization, and JWT token management.")
        .with_link(ServiceLink::new(
            "Repository",
            "https://github.com/example/auth-service",
        )),
        ServiceNode::new(
            sid("user-service"),
            "User Service",
            ServiceKind::Microservice,
            "#8b5cf6",
        )
        .with_description("User profile management, preferences, and account operations."),
        ServiceNode::new(
            sid("postgres-main"),
            "PostgreSQL DB",
            ServiceKind::Database,
            "#3b82f6",
        )
        .with_description("Relational database for users and authentication data."),
        ServiceNode::new(sid("redis-cache"), "Redis Cache", ServiceKind::Cache, "#ef4444")
            .with_description("In-memory cache for sessions and rate limiting."),
        ServiceNode::new(sid("rabbitmq"), "RabbitMQ", ServiceKind::Queue, "#f97316")
            .with_description("Message broker for async communication and event sourcing."),
        ServiceNode::new(sid("cdn"), "CloudFront CDN", ServiceKind::Cdn, "#a855f7")
            .with_description("Content delivery network for static frontend assets."),
    ];

    let connections = vec![
        connection("conn-1", "api-gateway", "auth-service", "Auth")
            .with_dashboard(dashboard("dash-1", "Auth Latency (p99)", 4))
            .with_dashboard(dashboard("dash-2", "Auth Error Rate", 3)),
        connection("conn-2", "api-gateway", "user-service", "Users")
            .with_dashboard(dashboard("dash-3", "User API Throughput", 2)),
        connection("conn-3", "auth-service", "redis-cache", "Sessions")
            .with_dashboard(dashboard("dash-4", "Redis Hit Rate", 2)),
        connection("conn-4", "auth-service", "postgres-main", "User Auth"),
        connection("conn-5", "user-service", "postgres-main", "User Data")
            .with_dashboard(dashboard("dash-5", "DB Query Time", 4)),
        connection("conn-6", "user-service", "rabbitmq", "User Events")
            .with_dashboard(dashboard("dash-6", "Queue Depth", 2)),
        connection("conn-7", "api-gateway", "cdn", "Static Assets"),
    ];

    Graph::from_snapshot(GraphSnapshot {
        services,
        connections,
    })
    .expect("built-in default topology is valid")
}

#[cfg(test)]
mod tests {
    use super::default_topology;

    #[test]
    fn default_topology_has_seven_services_and_seven_connections() {
        let graph = default_topology();
        assert_eq!(graph.services().len(), 7);
        assert_eq!(graph.connections().len(), 7);
        let dashboards = graph
            .connections()
            .iter()
            .map(|connection| connection.dashboards().len())
            .sum::<usize>();
        assert_eq!(dashboards, 6);
    }
}
