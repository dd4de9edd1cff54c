// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Svcgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Model Context Protocol (MCP) server surface.
//!
//! Every editor action (graph edits, selection, pins, and the diagram lifecycle) is exposed as a
//! tool over one shared workspace.

mod server;
mod types;

pub use server::SvcgraphMcp;
