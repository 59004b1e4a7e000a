/*
 * Created on Sun Oct 04 2026
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

//! One run of the tool: connect, import the file, then run exactly one operation

use {
    crate::{
        args::Settings,
        dispatch::{self, Outcome},
        error::{CliError, CliResult},
        loader,
        prompt::Prompt,
        query::{self, QueryMapping},
        store::{DocumentCollection, MemoryCollection, MongoStore},
    },
    libdocport::Scheme,
    mongodb::bson::Document,
};

const TXT_FOLLOW_UP: &str = "File already imported, do you need some request? (y/N) ";
const TXT_OPERATION: &str = "Which operation? ";
const TXT_QUERY: &str = "Print query like: foo='bar', baz=42\n";

/// Open the store that `settings.url` points to, run the session and close the store
/// again (whether or not the session failed)
pub async fn run<P: Prompt>(settings: &Settings, prompt: &mut P) -> CliResult<Outcome> {
    match libdocport::classify_url(&settings.url) {
        Some(Scheme::Mongo) => {
            let store = MongoStore::connect(&settings.url).await?;
            info!("Connected to {}", Scheme::Mongo.name());
            let collection = store.collection(&settings.database, &settings.collection);
            let ret = session(&collection, settings, prompt).await;
            store.close().await;
            ret
        }
        Some(Scheme::Memory) => {
            warn!("Using the in-process store. Nothing will be persisted");
            let collection = MemoryCollection::new(&settings.collection);
            session(&collection, settings, prompt).await
        }
        None => Err(CliError::ArgsErr(format!(
            "unknown scheme in store url `{}`",
            settings.url
        ))),
    }
}

/// Import the file into `collection` and run one operation against it
pub async fn session<C: DocumentCollection, P: Prompt>(
    collection: &C,
    settings: &Settings,
    prompt: &mut P,
) -> CliResult<Outcome> {
    let documents = loader::load_documents(&settings.file).await?;
    import(collection, documents).await?;
    if let Some(request) = &settings.request {
        let query = query::parse_query(&request.query)?;
        info!("Running `{}`", request.operation);
        return dispatch::execute(collection, &request.operation, query, settings.mode).await;
    }
    let (operation, query) = if is_yes(&prompt.ask(TXT_FOLLOW_UP).await?) {
        // reject a bad name before asking for the query
        let operation = prompt.ask(TXT_OPERATION).await?;
        let operation = dispatch::resolve(operation.trim(), settings.mode)?;
        let query = query::parse_query(&prompt.ask(TXT_QUERY).await?)?;
        (operation, query)
    } else {
        (settings.mode.default_operation(), QueryMapping::empty())
    };
    info!("Running `{}` with {} field(s)", operation.name(), query.len());
    dispatch::dispatch(collection, operation, query).await
}

async fn import<C: DocumentCollection>(
    collection: &C,
    documents: Vec<Document>,
) -> CliResult<()> {
    if documents.is_empty() {
        warn!("The file has no documents. Nothing was imported");
        return Ok(());
    }
    let ids = collection.insert_many(documents).await?;
    info!("Imported {} documents", ids.len());
    Ok(())
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
