/*
 * Created on Thu Oct 08 2026
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

//! Loads the import file. The file must hold a JSON array of objects; MongoDB Extended JSON
//! (`{"$oid": ..}`, `{"$date": ..}`) is understood

use {
    crate::error::{CliError, CliResult},
    mongodb::bson::{Bson, Document},
    serde_json::Value,
    std::path::Path,
};

pub async fn load_documents(path: &Path) -> CliResult<Vec<Document>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CliError::FileLoadError(path.to_owned(), e.to_string()))?;
    parse_documents(&raw).map_err(|e| CliError::FileLoadError(path.to_owned(), e))
}

fn parse_documents(raw: &str) -> Result<Vec<Document>, String> {
    let items = match serde_json::from_str(raw) {
        Ok(Value::Array(items)) => items,
        Ok(_) => return Err("expected an array of documents".into()),
        Err(e) => return Err(format!("bad JSON. {e}")),
    };
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match Bson::try_from(item) {
            Ok(Bson::Document(document)) => Ok(document),
            Ok(_) => Err(format!("element {idx} is not a document")),
            Err(e) => Err(format!("element {idx} is not valid extended JSON. {e}")),
        })
        .collect()
}
