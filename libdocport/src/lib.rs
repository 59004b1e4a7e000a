/*
 * Created on Fri Oct 16 2026
 *
 * This file is a part of Docport
 * Docport is a free and open-source tool that bulk-loads JSON documents
 * into a document store and runs one-off queries and mutations against
 * them, written by Sayan Nandan ("the Author").
 *
 * Copyright (c) 2026, Sayan Nandan <ohsayan@outlook.com>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

//! Definitions shared across the Docport workspace
//!
//! This contains the environment variables we look at, the default store URL and the
//! classifier for store URLs

/// The store URL that is used when the operator leaves the URL prompt blank
pub const DEFAULT_URL: &str = "mongodb://localhost:27017";
/// The log filter that is used when `DOCPORT_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info";

pub mod env_vars {
    /// Store URL; overridden by `--url`
    pub const DOCPORT_URL: &str = "DOCPORT_URL";
    /// `env_logger` filter directives
    pub const DOCPORT_LOG: &str = "DOCPORT_LOG";
}

const SCHEME_MONGO: &str = "mongodb://";
const SCHEME_MONGO_SRV: &str = "mongodb+srv://";
const SCHEME_MEMORY: &str = "memory://";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The backend that a store URL points to
pub enum Scheme {
    /// A MongoDB deployment (`mongodb://` or `mongodb+srv://`)
    Mongo,
    /// The in-process store (`memory://`). Nothing survives the run
    Memory,
}

impl Scheme {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mongo => "mongodb",
            Self::Memory => "memory",
        }
    }
}

/// Returns the backend for `url` or `None` if the scheme is unknown
pub fn classify_url(url: &str) -> Option<Scheme> {
    if url.starts_with(SCHEME_MONGO) || url.starts_with(SCHEME_MONGO_SRV) {
        Some(Scheme::Mongo)
    } else if url.starts_with(SCHEME_MEMORY) {
        Some(Scheme::Memory)
    } else {
        None
    }
}

/// Turns what the operator typed into a full store URL. A bare `host:port` is taken to be
/// a MongoDB deployment; an unknown `scheme://` is rejected with `None`
pub fn normalize_url(url: &str) -> Option<String> {
    match classify_url(url) {
        Some(_) => Some(url.to_owned()),
        None if url.contains("://") => None,
        None => Some(format!("{SCHEME_MONGO}{url}")),
    }
}
