/*
 * Created on Mon Oct 12 2026
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

//! The store seam. Everything that talks to the store goes through [`DocumentCollection`]
//! so that the same import and dispatch logic runs against MongoDB and against the
//! in-process store

use {
    crate::error::CliResult,
    mongodb::bson::{Bson, Document},
};

mod memory;
mod mongo;

pub use {memory::MemoryCollection, mongo::MongoStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Acknowledgment for updates and replacements
pub struct UpdateAck {
    pub matched: u64,
    pub modified: u64,
}

impl UpdateAck {
    pub const fn new(matched: u64, modified: u64) -> Self {
        Self { matched, modified }
    }
}

#[allow(async_fn_in_trait)]
/// A handle to one collection. Every method is exactly one store primitive
pub trait DocumentCollection {
    /// Number of documents matching `filter`
    async fn count(&self, filter: Document) -> CliResult<u64>;
    /// All documents matching `filter`, in store order
    async fn find(&self, filter: Document) -> CliResult<Vec<Document>>;
    async fn find_one(&self, filter: Document) -> CliResult<Option<Document>>;
    /// Returns the `_id` of the new document
    async fn insert_one(&self, document: Document) -> CliResult<Bson>;
    /// Returns the `_id`s of the new documents, in input order
    async fn insert_many(&self, documents: Vec<Document>) -> CliResult<Vec<Bson>>;
    /// `update` is an operator document (`{ $set: { .. } }`)
    async fn update_one(&self, filter: Document, update: Document) -> CliResult<UpdateAck>;
    async fn update_many(&self, filter: Document, update: Document) -> CliResult<UpdateAck>;
    async fn replace_one(&self, filter: Document, replacement: Document) -> CliResult<UpdateAck>;
    async fn replace_many(&self, filter: Document, replacement: Document)
        -> CliResult<UpdateAck>;
    /// Returns the number of deleted documents
    async fn delete_one(&self, filter: Document) -> CliResult<u64>;
    async fn delete_many(&self, filter: Document) -> CliResult<u64>;
}
