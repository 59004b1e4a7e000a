/*
 * Created on Thu Oct 15 2026
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

//! Operation dispatch. An operation name is first checked against the allow-list of the
//! active [`Mode`], then resolved to an [`Operation`] and finally turned into exactly one
//! store call

use {
    crate::{
        error::{CliError, CliResult},
        query::QueryMapping,
        store::{DocumentCollection, UpdateAck},
    },
    mongodb::bson::{doc, Bson, Document},
};

/// Allow-list for the import-then-query modes
const WRITE_THEN_QUERY: &[&str] = &[
    "count",
    "find",
    "findOne",
    "insertOne",
    "deleteOne",
    "deleteMany",
];

/// Allow-list for the general mutation mode
const GENERAL_MUTATION: &[&str] = &[
    "find",
    "findOne",
    "insertOne",
    "insertMany",
    "update",
    "updateOne",
    "updateMany",
    "replaceOne",
    "replaceMany",
    "deleteOne",
    "deleteMany",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
/// Selects the allow-list and the operation that runs when the operator declines to
/// enter one
pub enum Mode {
    #[value(name = "count")]
    DefaultCount,
    #[value(name = "find")]
    DefaultFind,
    #[value(name = "general")]
    General,
}

impl Mode {
    pub fn allow_list(&self) -> &'static [&'static str] {
        match self {
            Self::DefaultCount | Self::DefaultFind => WRITE_THEN_QUERY,
            Self::General => GENERAL_MUTATION,
        }
    }
    pub fn allows(&self, operation: &str) -> bool {
        self.allow_list().contains(&operation)
    }
    pub fn default_operation(&self) -> Operation {
        match self {
            Self::DefaultCount => Operation::Count,
            Self::DefaultFind | Self::General => Operation::Find,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Count,
    Find,
    FindOne,
    InsertOne,
    InsertMany,
    Update,
    UpdateOne,
    UpdateMany,
    ReplaceOne,
    ReplaceMany,
    DeleteOne,
    DeleteMany,
}

impl Operation {
    const ALL: [Self; 12] = [
        Self::Count,
        Self::Find,
        Self::FindOne,
        Self::InsertOne,
        Self::InsertMany,
        Self::Update,
        Self::UpdateOne,
        Self::UpdateMany,
        Self::ReplaceOne,
        Self::ReplaceMany,
        Self::DeleteOne,
        Self::DeleteMany,
    ];
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Find => "find",
            Self::FindOne => "findOne",
            Self::InsertOne => "insertOne",
            Self::InsertMany => "insertMany",
            Self::Update => "update",
            Self::UpdateOne => "updateOne",
            Self::UpdateMany => "updateMany",
            Self::ReplaceOne => "replaceOne",
            Self::ReplaceMany => "replaceMany",
            Self::DeleteOne => "deleteOne",
            Self::DeleteMany => "deleteMany",
        }
    }
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// What the store answered
pub enum Outcome {
    /// `count`: the number of documents in the collection
    Count(u64),
    /// `find`: every matching document
    Documents(Vec<Document>),
    /// `findOne`
    Document(Option<Document>),
    InsertedOne(Bson),
    InsertedMany(Vec<Bson>),
    Updated(UpdateAck),
    Deleted(u64),
}

impl Outcome {
    /// The value that is shown to the operator
    pub fn into_bson(self) -> Bson {
        match self {
            Self::Count(count) => doc! { "countOfInsertedDocuments": count as i64 }.into(),
            Self::Documents(documents) => {
                Bson::Array(documents.into_iter().map(Bson::Document).collect())
            }
            Self::Document(Some(document)) => Bson::Document(document),
            Self::Document(None) => Bson::Null,
            Self::InsertedOne(id) => doc! { "acknowledged": true, "insertedId": id }.into(),
            Self::InsertedMany(ids) => {
                let count = ids.len() as i64;
                let ids: Document = ids
                    .into_iter()
                    .enumerate()
                    .map(|(idx, id)| (idx.to_string(), id))
                    .collect();
                doc! { "acknowledged": true, "insertedCount": count, "insertedIds": ids }.into()
            }
            Self::Updated(UpdateAck { matched, modified }) => doc! {
                "acknowledged": true,
                "matchedCount": matched as i64,
                "modifiedCount": modified as i64,
            }
            .into(),
            Self::Deleted(deleted) => {
                doc! { "acknowledged": true, "deletedCount": deleted as i64 }.into()
            }
        }
    }
}

/// Check `name` against the allow-list of `mode` and resolve it
pub fn resolve(name: &str, mode: Mode) -> CliResult<Operation> {
    if !mode.allows(name) {
        return Err(CliError::InvalidOperation(name.to_owned()));
    }
    Operation::from_name(name).ok_or_else(|| CliError::InvalidOperation(name.to_owned()))
}

/// Validate and run `name` with `query` against `collection`
pub async fn execute<C: DocumentCollection>(
    collection: &C,
    name: &str,
    query: QueryMapping,
    mode: Mode,
) -> CliResult<Outcome> {
    let operation = resolve(name, mode)?;
    dispatch(collection, operation, query).await
}

/// Run an already resolved operation. This is exactly one store call:
/// - `count` ignores the query and counts the whole collection
/// - `find`, `findOne` and `delete*` use the query as the filter
/// - `insert*` use the query as the document
/// - `update*` and `replace*` use the query as the new field values (or the new document)
///   and apply it to the first document (`*One`, `update`) or to every document (`*Many`)
pub async fn dispatch<C: DocumentCollection>(
    collection: &C,
    operation: Operation,
    query: QueryMapping,
) -> CliResult<Outcome> {
    if operation == Operation::Count && !query.is_empty() {
        debug!("Ignoring the query for `count`");
    }
    let query = query.into_document();
    let all = Document::new;
    let set = |fields: Document| doc! { "$set": fields };
    let outcome = match operation {
        Operation::Count => Outcome::Count(collection.count(all()).await?),
        Operation::Find => Outcome::Documents(collection.find(query).await?),
        Operation::FindOne => Outcome::Document(collection.find_one(query).await?),
        Operation::InsertOne => Outcome::InsertedOne(collection.insert_one(query).await?),
        Operation::InsertMany => {
            Outcome::InsertedMany(collection.insert_many(vec![query]).await?)
        }
        Operation::Update | Operation::UpdateOne => {
            Outcome::Updated(collection.update_one(all(), set(query)).await?)
        }
        Operation::UpdateMany => {
            Outcome::Updated(collection.update_many(all(), set(query)).await?)
        }
        Operation::ReplaceOne => Outcome::Updated(collection.replace_one(all(), query).await?),
        Operation::ReplaceMany => {
            Outcome::Updated(collection.replace_many(all(), query).await?)
        }
        Operation::DeleteOne => Outcome::Deleted(collection.delete_one(query).await?),
        Operation::DeleteMany => Outcome::Deleted(collection.delete_many(query).await?),
    };
    Ok(outcome)
}
