// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Svcgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::{ConnectionId, DashboardId, ServiceId};

/// A monitoring panel embedded on a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    dashboard_id: DashboardId,
    title: String,
    iframe_url: String,
}

impl Dashboard {
    pub fn new(
        dashboard_id: DashboardId,
        title: impl Into<String>,
        iframe_url: impl Into<String>,
    ) -> Self {
        Self {
            dashboard_id,
            title: title.into(),
            iframe_url: iframe_url.into(),
        }
    }

    pub fn dashboard_id(&self) -> &DashboardId {
        &self.dashboard_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Opaque embed target; never parsed or validated as a URL.
    pub fn iframe_url(&self) -> &str {
        &self.iframe_url
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_iframe_url(&mut self, iframe_url: impl Into<String>) {
        self.iframe_url = iframe_url.into();
    }
}

/// A directed dependency edge between two services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    connection_id: ConnectionId,
    source: ServiceId,
    target: ServiceId,
    label: Option<String>,
    dashboards: Vec<Dashboard>,
}

impl Connection {
    pub fn new(connection_id: ConnectionId, source: ServiceId, target: ServiceId) -> Self {
        Self {
            connection_id,
            source,
            target,
            label: None,
            dashboards: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_dashboard(mut self, dashboard: Dashboard) -> Self {
        self.dashboards.push(dashboard);
        self
    }

    pub fn connection_id(&self) -> &ConnectionId {
        &self.connection_id
    }

    pub fn source(&self) -> &ServiceId {
        &self.source
    }

    pub fn target(&self) -> &ServiceId {
        &self.target
    }

    pub fn touches(&self, service_id: &ServiceId) -> bool {
        &self.source == service_id || &self.target == service_id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label<T: Into<String>>(&mut self, label: Option<T>) {
        self.label = label.map(Into::into);
    }

    pub fn dashboards(&self) -> &[Dashboard] {
        &self.dashboards
    }

    pub fn dashboards_mut(&mut self) -> &mut Vec<Dashboard> {
        &mut self.dashboards
    }

    pub fn dashboard(&self, dashboard_id: &DashboardId) -> Option<&Dashboard> {
        self.dashboards
            .iter()
            .find(|dashboard| dashboard.dashboard_id() == dashboard_id)
    }

    pub fn dashboard_mut(&mut self, dashboard_id: &DashboardId) -> Option<&mut Dashboard> {
        self.dashboards
            .iter_mut()
            .find(|dashboard| dashboard.dashboard_id() == dashboard_id)
    }
}
