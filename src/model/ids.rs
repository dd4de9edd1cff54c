// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Svcgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use uuid::Uuid;

/// A stable identifier for services, connections, dashboards and saved diagrams.
///
/// Ids are opaque, non-empty strings. The folder store escapes whatever a file stem cannot hold,
/// so no character is off limits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        validate_id_segment(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// Mints a fresh id of the form `<prefix>-<uuid>`.
    ///
    /// Minted ids are never reused, so callers can hand them to `add_*` operations without a
    /// uniqueness check of their own.
    pub fn mint(prefix: &str) -> Self {
        Self {
            value: format!("{prefix}-{}", Uuid::new_v4().simple()),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T> Borrow<str> for Id<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl<T> TryFrom<String> for Id<T> {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    Empty,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("id must not be empty"),
        }
    }
}

impl std::error::Error for IdError {}

fn validate_id_segment(value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        return Err(IdError::Empty);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceIdTag {}
pub type ServiceId = Id<ServiceIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConnectionIdTag {}
pub type ConnectionId = Id<ConnectionIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DashboardIdTag {}
pub type DashboardId = Id<DashboardIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagramIdTag {}
pub type DiagramId = Id<DiagramIdTag>;

pub(crate) const SERVICE_ID_PREFIX: &str = "svc";
pub(crate) const CONNECTION_ID_PREFIX: &str = "conn";
pub(crate) const DASHBOARD_ID_PREFIX: &str = "dash";
pub(crate) const DIAGRAM_ID_PREFIX: &str = "diagram";

impl ServiceId {
    pub fn generate() -> Self {
        Self::mint(SERVICE_ID_PREFIX)
    }
}

impl ConnectionId {
    pub fn generate() -> Self {
        Self::mint(CONNECTION_ID_PREFIX)
    }
}

impl DashboardId {
    pub fn generate() -> Self {
        Self::mint(DASHBOARD_ID_PREFIX)
    }
}

impl DiagramId {
    pub fn generate() -> Self {
        Self::mint(DIAGRAM_ID_PREFIX)
    }
}
