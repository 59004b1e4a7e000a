/*
 * Created on Wed Oct 14 2026
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

//! An in-process store for `memory://` URLs. It understands equality filters (with dotted
//! paths and array membership) and `$set` updates, which is everything the dispatcher
//! ever sends. Nothing is persisted

use {
    super::{DocumentCollection, UpdateAck},
    crate::error::{CliError, CliResult},
    mongodb::bson::{oid::ObjectId, Bson, Document},
    parking_lot::Mutex,
};

const ID: &str = "_id";
const OP_SET: &str = "$set";

pub struct MemoryCollection {
    name: String,
    documents: Mutex<Vec<Document>>,
}

impl MemoryCollection {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            documents: Mutex::new(Vec::new()),
        }
    }
    fn duplicate_key(&self, id: &Bson) -> CliError {
        CliError::StoreOperationError(format!(
            "E11000 duplicate key error collection: {} index: _id_ dup key: {{ _id: {id} }}",
            self.name
        ))
    }
    /// Gives the document an `_id` if it doesn't have one. The `_id` always comes first
    fn with_id(document: Document) -> (Bson, Document) {
        match document.get(ID) {
            Some(id) => (id.clone(), document),
            None => {
                let id = Bson::ObjectId(ObjectId::new());
                let mut ret = Document::new();
                ret.insert(ID, id.clone());
                for (key, value) in document {
                    ret.insert(key, value);
                }
                (id, ret)
            }
        }
    }
    fn insert(&self, documents: Vec<Document>) -> CliResult<Vec<Bson>> {
        let mut store = self.documents.lock();
        let mut ids = Vec::with_capacity(documents.len());
        let mut staged = Vec::with_capacity(documents.len());
        for document in documents {
            let (id, document) = Self::with_id(document);
            let taken = store.iter().chain(staged.iter()).any(|d| d.get(ID) == Some(&id));
            if taken {
                return Err(self.duplicate_key(&id));
            }
            ids.push(id);
            staged.push(document);
        }
        store.extend(staged);
        Ok(ids)
    }
    fn update(&self, filter: &Document, update: &Document, multi: bool) -> CliResult<UpdateAck> {
        check_filter(filter)?;
        let fields = set_fields(update)?;
        let mut store = self.documents.lock();
        let mut ack = UpdateAck::default();
        for document in store.iter_mut().filter(|d| matches(d, filter)) {
            ack.matched += 1;
            // a document is either fully updated or left alone
            let mut staged = document.clone();
            for (path, value) in fields {
                if path.split('.').next() == Some(ID) {
                    if lookup(&staged, path) != Some(value) {
                        return Err(immutable_id());
                    }
                    continue;
                }
                set_path(&mut staged, path, value.clone())?;
            }
            if staged != *document {
                *document = staged;
                ack.modified += 1;
            }
            if !multi {
                break;
            }
        }
        Ok(ack)
    }
    fn replace(
        &self,
        filter: &Document,
        replacement: &Document,
        multi: bool,
    ) -> CliResult<UpdateAck> {
        check_filter(filter)?;
        if let Some(key) = replacement.keys().find(|k| k.starts_with('$')) {
            return Err(CliError::StoreOperationError(format!(
                "replacement document must not contain update operators (found `{key}`)"
            )));
        }
        let mut store = self.documents.lock();
        let mut ack = UpdateAck::default();
        for document in store.iter_mut().filter(|d| matches(d, filter)) {
            ack.matched += 1;
            let mut new = Document::new();
            if let Some(id) = document.get(ID) {
                if replacement.get(ID).map_or(false, |rid| rid != id) {
                    return Err(immutable_id());
                }
                new.insert(ID, id.clone());
            }
            for (key, value) in replacement.iter().filter(|(k, _)| k.as_str() != ID) {
                new.insert(key.clone(), value.clone());
            }
            if *document != new {
                *document = new;
                ack.modified += 1;
            }
            if !multi {
                break;
            }
        }
        Ok(ack)
    }
    fn delete(&self, filter: &Document, multi: bool) -> CliResult<u64> {
        check_filter(filter)?;
        let mut store = self.documents.lock();
        if multi {
            let before = store.len();
            store.retain(|d| !matches(d, filter));
            Ok((before - store.len()) as u64)
        } else {
            match store.iter().position(|d| matches(d, filter)) {
                Some(idx) => {
                    store.remove(idx);
                    Ok(1)
                }
                None => Ok(0),
            }
        }
    }
}

impl DocumentCollection for MemoryCollection {
    async fn count(&self, filter: Document) -> CliResult<u64> {
        check_filter(&filter)?;
        let store = self.documents.lock();
        Ok(store.iter().filter(|d| matches(d, &filter)).count() as u64)
    }
    async fn find(&self, filter: Document) -> CliResult<Vec<Document>> {
        check_filter(&filter)?;
        let store = self.documents.lock();
        Ok(store
            .iter()
            .filter(|d| matches(d, &filter))
            .cloned()
            .collect())
    }
    async fn find_one(&self, filter: Document) -> CliResult<Option<Document>> {
        check_filter(&filter)?;
        let store = self.documents.lock();
        Ok(store.iter().find(|d| matches(d, &filter)).cloned())
    }
    async fn insert_one(&self, document: Document) -> CliResult<Bson> {
        let mut ids = self.insert(vec![document])?;
        Ok(ids.remove(0))
    }
    async fn insert_many(&self, documents: Vec<Document>) -> CliResult<Vec<Bson>> {
        if documents.is_empty() {
            return Err(CliError::StoreOperationError(
                "insert_many requires at least one document".into(),
            ));
        }
        self.insert(documents)
    }
    async fn update_one(&self, filter: Document, update: Document) -> CliResult<UpdateAck> {
        self.update(&filter, &update, false)
    }
    async fn update_many(&self, filter: Document, update: Document) -> CliResult<UpdateAck> {
        self.update(&filter, &update, true)
    }
    async fn replace_one(&self, filter: Document, replacement: Document) -> CliResult<UpdateAck> {
        self.replace(&filter, &replacement, false)
    }
    async fn replace_many(
        &self,
        filter: Document,
        replacement: Document,
    ) -> CliResult<UpdateAck> {
        self.replace(&filter, &replacement, true)
    }
    async fn delete_one(&self, filter: Document) -> CliResult<u64> {
        self.delete(&filter, false)
    }
    async fn delete_many(&self, filter: Document) -> CliResult<u64> {
        self.delete(&filter, true)
    }
}

fn immutable_id() -> CliError {
    CliError::StoreOperationError("the (immutable) field '_id' cannot be altered".into())
}

fn check_filter(filter: &Document) -> CliResult<()> {
    match filter.keys().find(|k| k.starts_with('$')) {
        Some(op) => Err(CliError::StoreOperationError(format!(
            "unsupported query operator `{op}`"
        ))),
        None => Ok(()),
    }
}

fn set_fields(update: &Document) -> CliResult<&Document> {
    if update.len() != 1 {
        return Err(CliError::StoreOperationError(
            "update document must contain exactly one `$set`".into(),
        ));
    }
    match update.get(OP_SET) {
        Some(Bson::Document(fields)) => Ok(fields),
        Some(_) => Err(CliError::StoreOperationError(
            "modifiers operate on fields but we found a non-document `$set`".into(),
        )),
        None => match update.keys().next() {
            Some(key) if !key.starts_with('$') => Err(CliError::StoreOperationError(
                "update document requires atomic operators".into(),
            )),
            key => Err(CliError::StoreOperationError(format!(
                "unsupported update operator `{}`",
                key.map(String::as_str).unwrap_or_default()
            ))),
        },
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(path, expected)| match lookup(document, path) {
            Some(Bson::Array(items)) if !matches!(expected, Bson::Array(_)) => {
                items.iter().any(|item| values_eq(item, expected))
            }
            Some(actual) => values_eq(actual, expected),
            // `null` matches a missing field
            None => matches!(expected, Bson::Null),
        })
}

fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut parts = path.split('.');
    let mut current = document.get(parts.next()?)?;
    for part in parts {
        current = match current {
            Bson::Document(nested) => nested.get(part)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Write `value` at a dotted `path`, creating the intermediate documents that are missing
fn set_path(document: &mut Document, path: &str, value: Bson) -> CliResult<()> {
    let (parents, leaf) = match path.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, path),
    };
    let mut current = document;
    for part in parents.into_iter().flat_map(|parents| parents.split('.')) {
        if !current.contains_key(part) {
            current.insert(part, Document::new());
        }
        current = match current.get_mut(part) {
            Some(Bson::Document(nested)) => nested,
            _ => {
                return Err(CliError::StoreOperationError(format!(
                    "cannot create field `{leaf}` under `{part}` in `{path}`: not a document"
                )))
            }
        };
    }
    current.insert(leaf, value);
    Ok(())
}

fn values_eq(actual: &Bson, expected: &Bson) -> bool {
    // integers compare exactly; doubles are only involved when one side is a double
    if let (Some(a), Some(b)) = (as_integer(actual), as_integer(expected)) {
        return a == b;
    }
    match (as_double(actual), as_double(expected)) {
        (Some(a), Some(b)) => a == b,
        _ => actual == expected,
    }
}

fn as_integer(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(int) => Some(*int as i64),
        Bson::Int64(int) => Some(*int),
        _ => None,
    }
}

fn as_double(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(int) => Some(*int as f64),
        Bson::Int64(int) => Some(*int as f64),
        Bson::Double(float) => Some(*float),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use {
        super::MemoryCollection,
        crate::store::{DocumentCollection, UpdateAck},
        mongodb::bson::{doc, Bson, Document},
    };

    async fn people() -> MemoryCollection {
        let collection = MemoryCollection::new("people");
        collection
            .insert_many(vec![
                doc! { "name": "Alice", "age": 30, "tags": ["admin", "ops"] },
                doc! { "name": "Bob", "age": 25_i64, "address": { "city": "Pune" } },
                doc! { "name": "Carol", "age": 30.0 },
            ])
            .await
            .unwrap();
        collection
    }

    #[tokio::test]
    async fn insert_assigns_leading_id() {
        let collection = MemoryCollection::new("c");
        let id = collection.insert_one(doc! { "x": 1 }).await.unwrap();
        assert!(matches!(id, Bson::ObjectId(_)));
        let stored = collection.find_one(Document::new()).await.unwrap().unwrap();
        assert_eq!(stored.keys().next().map(String::as_str), Some("_id"));
        assert_eq!(stored.get("_id"), Some(&id));
    }

    #[tokio::test]
    async fn insert_keeps_supplied_id_and_rejects_duplicates() {
        let collection = MemoryCollection::new("c");
        assert_eq!(
            collection.insert_one(doc! { "_id": 7, "x": 1 }).await.unwrap(),
            Bson::Int32(7)
        );
        let e = collection
            .insert_one(doc! { "_id": 7, "x": 2 })
            .await
            .unwrap_err();
        assert!(e.to_string().contains("duplicate key"));
        assert_eq!(collection.count(Document::new()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn insert_many_rejects_empty_batch() {
        let collection = MemoryCollection::new("c");
        assert!(collection.insert_many(vec![]).await.is_err());
    }

    #[tokio::test]
    async fn numeric_equality_across_types() {
        let collection = people().await;
        assert_eq!(collection.count(doc! { "age": 30 }).await.unwrap(), 2);
        assert_eq!(collection.count(doc! { "age": 25.0 }).await.unwrap(), 1);
        assert_eq!(collection.count(doc! { "age": "30" }).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn dotted_paths_and_arrays() {
        let collection = people().await;
        let bob = collection
            .find_one(doc! { "address.city": "Pune" })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(bob.get_str("name").unwrap(), "Bob");
        let admins = collection.find(doc! { "tags": "admin" }).await.unwrap();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].get_str("name").unwrap(), "Alice");
    }

    #[tokio::test]
    async fn null_matches_missing() {
        let collection = people().await;
        assert_eq!(collection.count(doc! { "tags": Bson::Null }).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn find_keeps_insertion_order() {
        let collection = people().await;
        let names: Vec<String> = collection
            .find(Document::new())
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.get_str("name").unwrap().to_owned())
            .collect();
        assert_eq!(names, ["Alice", "Bob", "Carol"]);
    }

    #[tokio::test]
    async fn update_one_and_many() {
        let collection = people().await;
        let ack = collection
            .update_one(doc! { "age": 30 }, doc! { "$set": { "senior": true } })
            .await
            .unwrap();
        assert_eq!(ack, UpdateAck::new(1, 1));
        let ack = collection
            .update_many(doc! { "age": 30 }, doc! { "$set": { "senior": true } })
            .await
            .unwrap();
        // Alice already has it
        assert_eq!(ack, UpdateAck::new(2, 1));
        assert_eq!(collection.count(doc! { "senior": true }).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn update_requires_set() {
        let collection = people().await;
        assert!(collection
            .update_one(Document::new(), doc! { "age": 1 })
            .await
            .is_err());
        assert!(collection
            .update_one(Document::new(), doc! { "$inc": { "age": 1 } })
            .await
            .is_err());
    }

    #[tokio::test]
    async fn failed_update_leaves_document_untouched() {
        let collection = MemoryCollection::new("c");
        collection
            .insert_one(doc! { "_id": 1, "a": 1 })
            .await
            .unwrap();
        // `Name` sorts before `_id`, so it would be written first
        let fields = crate::query::parse_query("Name=x, _id=2")
            .unwrap()
            .into_document();
        let e = collection
            .update_one(Document::new(), doc! { "$set": fields })
            .await
            .unwrap_err();
        assert!(e.to_string().contains("immutable"));
        assert_eq!(
            collection.find(Document::new()).await.unwrap(),
            vec![doc! { "_id": 1, "a": 1 }]
        );
        // the same `_id` is fine
        let ack = collection
            .update_one(Document::new(), doc! { "$set": { "_id": 1, "b": 2 } })
            .await
            .unwrap();
        assert_eq!(ack, UpdateAck::new(1, 1));
    }

    #[tokio::test]
    async fn update_follows_dotted_paths() {
        let collection = people().await;
        let ack = collection
            .update_one(
                doc! { "name": "Bob" },
                doc! { "$set": { "address.city": "Mumbai", "work.site.floor": 3 } },
            )
            .await
            .unwrap();
        assert_eq!(ack, UpdateAck::new(1, 1));
        assert_eq!(
            collection.count(doc! { "address.city": "Mumbai" }).await.unwrap(),
            1
        );
        let bob = collection
            .find_one(doc! { "name": "Bob" })
            .await
            .unwrap()
            .unwrap();
        assert!(!bob.contains_key("address.city"));
        assert_eq!(
            bob.get_document("work").unwrap(),
            &doc! { "site": { "floor": 3 } }
        );
        // `name` is a string, so nothing can be nested under it
        assert!(collection
            .update_one(doc! { "name": "Bob" }, doc! { "$set": { "name.first": "B" } })
            .await
            .is_err());
        assert_eq!(collection.count(doc! { "name": "Bob" }).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn large_integers_compare_exactly() {
        let collection = MemoryCollection::new("c");
        let big = 1_i64 << 53;
        collection
            .insert_many(vec![doc! { "n": big }, doc! { "n": big + 1 }])
            .await
            .unwrap();
        assert_eq!(collection.count(doc! { "n": big + 1 }).await.unwrap(), 1);
        assert_eq!(collection.count(doc! { "n": big }).await.unwrap(), 1);
        assert_eq!(collection.count(doc! { "n": 5 }).await.unwrap(), 0);
        collection.insert_one(doc! { "n": 5 }).await.unwrap();
        assert_eq!(collection.count(doc! { "n": 5_i64 }).await.unwrap(), 1);
        assert_eq!(collection.count(doc! { "n": 5.0 }).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn replace_keeps_id() {
        let collection = MemoryCollection::new("c");
        collection
            .insert_one(doc! { "_id": 1, "a": 1, "b": 2 })
            .await
            .unwrap();
        let ack = collection
            .replace_one(Document::new(), doc! { "c": 3 })
            .await
            .unwrap();
        assert_eq!(ack, UpdateAck::new(1, 1));
        let stored = collection.find_one(Document::new()).await.unwrap().unwrap();
        assert_eq!(stored, doc! { "_id": 1, "c": 3 });
        assert!(collection
            .replace_one(Document::new(), doc! { "_id": 2 })
            .await
            .is_err());
    }

    #[tokio::test]
    async fn replace_many_touches_every_match() {
        let collection = people().await;
        let ack = collection
            .replace_many(doc! { "age": 30 }, doc! { "name": "redacted" })
            .await
            .unwrap();
        assert_eq!(ack, UpdateAck::new(2, 2));
        assert_eq!(
            collection.count(doc! { "name": "redacted" }).await.unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn delete_one_and_many() {
        let collection = people().await;
        assert_eq!(collection.delete_one(doc! { "age": 30 }).await.unwrap(), 1);
        assert_eq!(collection.delete_many(Document::new()).await.unwrap(), 2);
        assert_eq!(collection.delete_one(Document::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn operators_in_filter_are_rejected() {
        let collection = people().await;
        assert!(collection
            .find(doc! { "$where": "true" })
            .await
            .is_err());
    }
}
