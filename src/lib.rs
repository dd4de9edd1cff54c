// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Svcgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Svcgraph — state core of a microservice topology diagram editor.
//!
//! The live graph and editor state live in [`session`], edits go through [`ops`], saved
//! diagrams persist through a [`store::DiagramStore`], and [`sync::Workspace`] ties the two
//! together. [`mcp`] exposes every action as an MCP tool.

pub mod format;
pub mod mcp;
pub mod model;
pub mod ops;
pub mod session;
pub mod store;
pub mod sync;
