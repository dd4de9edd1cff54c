// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Svcgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use super::ids::ServiceId;

/// The fixed set of service categories a node can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceKind {
    Microservice,
    Database,
    Cache,
    Queue,
    Cdn,
    Gateway,
}

impl ServiceKind {
    /// Order used when listing services grouped by kind.
    pub const DISPLAY_ORDER: [ServiceKind; 6] = [
        ServiceKind::Gateway,
        ServiceKind::Microservice,
        ServiceKind::Database,
        ServiceKind::Cache,
        ServiceKind::Queue,
        ServiceKind::Cdn,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Microservice => "microservice",
            Self::Database => "database",
            Self::Cache => "cache",
            Self::Queue => "queue",
            Self::Cdn => "cdn",
            Self::Gateway => "gateway",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseServiceKindError {
    value: String,
}

impl fmt::Display for ParseServiceKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown service type {:?} (expected microservice, database, cache, queue, cdn or gateway)",
            self.value
        )
    }
}

impl std::error::Error for ParseServiceKindError {}

impl FromStr for ServiceKind {
    type Err = ParseServiceKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "microservice" => Ok(Self::Microservice),
            "database" => Ok(Self::Database),
            "cache" => Ok(Self::Cache),
            "queue" => Ok(Self::Queue),
            "cdn" => Ok(Self::Cdn),
            "gateway" => Ok(Self::Gateway),
            other => Err(ParseServiceKindError {
                value: other.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceLink {
    label: String,
    url: String,
}

impl ServiceLink {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// A vertex of the topology: one deployable service or piece of infrastructure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceNode {
    service_id: ServiceId,
    name: String,
    kind: ServiceKind,
    color: String,
    description: Option<String>,
    links: Vec<ServiceLink>,
}

impl ServiceNode {
    pub fn new(
        service_id: ServiceId,
        name: impl Into<String>,
        kind: ServiceKind,
        color: impl Into<String>,
    ) -> Self {
        Self {
            service_id,
            name: name.into(),
            kind,
            color: color.into(),
            description: None,
            links: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_link(mut self, link: ServiceLink) -> Self {
        self.links.push(link);
        self
    }

    pub fn service_id(&self) -> &ServiceId {
        &self.service_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn links(&self) -> &[ServiceLink] {
        &self.links
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_kind(&mut self, kind: ServiceKind) {
        self.kind = kind;
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }

    pub fn set_description<T: Into<String>>(&mut self, description: Option<T>) {
        self.description = description.map(Into::into);
    }

    pub fn set_links(&mut self, links: Vec<ServiceLink>) {
        self.links = links;
    }

    pub fn links_mut(&mut self) -> &mut Vec<ServiceLink> {
        &mut self.links
    }
}

#[cfg(test)]
mod tests {
    use super::{ServiceKind, ServiceLink, ServiceNode};
    use crate::model::ServiceId;

    #[test]
    fn service_kind_round_trips_through_its_wire_name() {
        for kind in ServiceKind::DISPLAY_ORDER {
            assert_eq!(kind.as_str().parse::<ServiceKind>(), Ok(kind));
        }
        assert!("lambda".parse::<ServiceKind>().is_err());
    }

    #[test]
    fn service_node_can_be_constructed_and_updated() {
        let id = ServiceId::new("svc-a").expect("service id");
        let mut node = ServiceNode::new(id.clone(), "A", ServiceKind::Microservice, "#6366f1");
        assert_eq!(node.service_id(), &id);
        assert_eq!(node.description(), None);
        assert!(node.links().is_empty());

        node.set_name("Alpha");
        node.set_kind(ServiceKind::Cache);
        node.set_description(Some("hot keys"));
        node.links_mut().push(ServiceLink::new("Runbook", "https://wiki.example.com/a"));

        assert_eq!(node.name(), "Alpha");
        assert_eq!(node.kind(), ServiceKind::Cache);
        assert_eq!(node.description(), Some("hot keys"));
        assert_eq!(node.links()[0].label(), "Runbook");

        node.set_description::<&str>(None);
        assert_eq!(node.description(), None);
    }
}
