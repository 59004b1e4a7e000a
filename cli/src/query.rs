/*
 * Created on Sun Oct 11 2026
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

//! The query line parser. An operator types `foo='bar', baz=42` and we turn it into a
//! mapping from field name to a string or a number. Nothing else is understood: there are
//! no operators, no nesting and no quote handling

use {
    crate::error::{CliError, CliResult},
    mongodb::bson::{Bson, Document},
    std::collections::BTreeMap,
};

const CLAUSE_SEPARATOR: &str = ", ";
const KEY_VALUE_SEPARATOR: char = '=';

lazy_static::lazy_static! {
    // base-10 only; `inf`, `NaN` and hex literals stay strings
    static ref RE_NUMERIC: regex::Regex =
        regex::Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    SInt(i64),
    Float(f64),
    String(String),
}

impl Item {
    fn coerce(raw: &str) -> Self {
        if RE_NUMERIC.is_match(raw) {
            if let Ok(int) = raw.parse() {
                return Self::SInt(int);
            }
            if let Ok(float) = raw.parse() {
                return Self::Float(float);
            }
        }
        Self::String(raw.to_owned())
    }
}

impl From<Item> for Bson {
    fn from(item: Item) -> Self {
        match item {
            Item::SInt(int) => match i32::try_from(int) {
                Ok(int) => Bson::Int32(int),
                Err(_) => Bson::Int64(int),
            },
            Item::Float(float) => Bson::Double(float),
            Item::String(string) => Bson::String(string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
/// A parsed query line. Depending on the operation, this is either used as a filter or as
/// the document itself
pub struct QueryMapping {
    fields: BTreeMap<String, Item>,
}

impl QueryMapping {
    pub fn empty() -> Self {
        Self::default()
    }
    pub fn len(&self) -> usize {
        self.fields.len()
    }
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&Item> {
        self.fields.get(key)
    }
    pub fn into_document(self) -> Document {
        self.fields
            .into_iter()
            .map(|(key, item)| (key, Bson::from(item)))
            .collect()
    }
}

/// Parse a query line.
///
/// Clauses are separated by exactly `", "` and every clause is split on its first `=`. A
/// value that reads as a base-10 number is stored as a number; everything else is stored
/// verbatim (quotes included). A blank line is the empty mapping
pub fn parse_query(text: &str) -> CliResult<QueryMapping> {
    let mut fields = BTreeMap::new();
    if text.is_empty() {
        return Ok(QueryMapping { fields });
    }
    for clause in text.split(CLAUSE_SEPARATOR) {
        match clause.split_once(KEY_VALUE_SEPARATOR) {
            Some((key, raw)) => {
                // later clauses win
                fields.insert(key.to_owned(), Item::coerce(raw));
            }
            None => return Err(CliError::MalformedQuery(clause.to_owned())),
        }
    }
    Ok(QueryMapping { fields })
}
