/*
 * Created on Tue Oct 13 2026
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

use {
    super::{DocumentCollection, UpdateAck},
    crate::error::{CliError, CliResult},
    futures::TryStreamExt,
    mongodb::{
        bson::{doc, Bson, Document},
        Client, Collection,
    },
};

const SANITY_DATABASE: &str = "admin";

/// An open MongoDB client. Close it with [`MongoStore::close`] exactly once
pub struct MongoStore {
    client: Client,
}

impl MongoStore {
    /// Connect to `url` and make sure that the deployment answers a ping. The driver
    /// connects lazily, so without the ping a bad URL would only surface on the first
    /// insert
    pub async fn connect(url: &str) -> CliResult<Self> {
        let client = Client::with_uri_str(url)
            .await
            .map_err(|e| CliError::StoreConnectionError(e.to_string()))?;
        client
            .database(SANITY_DATABASE)
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| CliError::StoreConnectionError(e.to_string()))?;
        Ok(Self { client })
    }
    pub fn collection(&self, database: &str, collection: &str) -> MongoCollection {
        MongoCollection {
            inner: self.client.database(database).collection(collection),
        }
    }
    pub async fn close(self) {
        self.client.shutdown().await
    }
}

/// An update pipeline that swaps every matched document for `replacement`. The value is
/// wrapped in `$literal` so that `$`-prefixed strings are not read as field paths
fn replace_pipeline(replacement: Document) -> Vec<Document> {
    vec![doc! {
        "$replaceWith": {
            "$mergeObjects": [{ "_id": "$_id" }, { "$literal": replacement }]
        }
    }]
}

pub struct MongoCollection {
    inner: Collection<Document>,
}

impl DocumentCollection for MongoCollection {
    async fn count(&self, filter: Document) -> CliResult<u64> {
        Ok(self.inner.count_documents(filter, None).await?)
    }
    async fn find(&self, filter: Document) -> CliResult<Vec<Document>> {
        let cursor = self.inner.find(filter, None).await?;
        Ok(cursor.try_collect().await?)
    }
    async fn find_one(&self, filter: Document) -> CliResult<Option<Document>> {
        Ok(self.inner.find_one(filter, None).await?)
    }
    async fn insert_one(&self, document: Document) -> CliResult<Bson> {
        Ok(self.inner.insert_one(document, None).await?.inserted_id)
    }
    async fn insert_many(&self, documents: Vec<Document>) -> CliResult<Vec<Bson>> {
        let mut ids: Vec<(usize, Bson)> = self
            .inner
            .insert_many(documents, None)
            .await?
            .inserted_ids
            .into_iter()
            .collect();
        ids.sort_unstable_by_key(|(idx, _)| *idx);
        Ok(ids.into_iter().map(|(_, id)| id).collect())
    }
    async fn update_one(&self, filter: Document, update: Document) -> CliResult<UpdateAck> {
        let ret = self.inner.update_one(filter, update, None).await?;
        Ok(UpdateAck::new(ret.matched_count, ret.modified_count))
    }
    async fn update_many(&self, filter: Document, update: Document) -> CliResult<UpdateAck> {
        let ret = self.inner.update_many(filter, update, None).await?;
        Ok(UpdateAck::new(ret.matched_count, ret.modified_count))
    }
    async fn replace_one(&self, filter: Document, replacement: Document) -> CliResult<UpdateAck> {
        let ret = self.inner.replace_one(filter, replacement, None).await?;
        Ok(UpdateAck::new(ret.matched_count, ret.modified_count))
    }
    async fn replace_many(
        &self,
        filter: Document,
        replacement: Document,
    ) -> CliResult<UpdateAck> {
        // one pipeline update; every document keeps its own `_id`
        let ret = self
            .inner
            .update_many(filter, replace_pipeline(replacement), None)
            .await?;
        Ok(UpdateAck::new(ret.matched_count, ret.modified_count))
    }
    async fn delete_one(&self, filter: Document) -> CliResult<u64> {
        Ok(self.inner.delete_one(filter, None).await?.deleted_count)
    }
    async fn delete_many(&self, filter: Document) -> CliResult<u64> {
        Ok(self.inner.delete_many(filter, None).await?.deleted_count)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::{replace_pipeline, MongoStore},
        crate::error::CliError,
        mongodb::bson::doc,
    };

    #[tokio::test]
    async fn bad_url_is_a_connection_error() {
        // fails while parsing the URL, no server needed
        let e = MongoStore::connect("mongodb://").await.err().unwrap();
        assert!(matches!(e, CliError::StoreConnectionError(_)));
        assert!(e.to_string().starts_with("failed to connect to store."));
    }

    #[test]
    fn replace_pipeline_keeps_id() {
        assert_eq!(
            replace_pipeline(doc! { "name": "kiwi", "note": "$price" }),
            vec![doc! {
                "$replaceWith": {
                    "$mergeObjects": [
                        { "_id": "$_id" },
                        { "$literal": { "name": "kiwi", "note": "$price" } }
                    ]
                }
            }]
        );
    }
}
