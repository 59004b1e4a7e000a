/*
 * Created on Sat Oct 10 2026
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

use {core::fmt, mongodb::error::Error as MongoError, std::path::PathBuf};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub enum CliError {
    /// a required setting (database, collection or file name) was left blank
    RequiredFieldMissing(&'static str),
    /// the import file could not be read or is not a list of documents
    FileLoadError(PathBuf, String),
    /// a query clause is not of the form `key=value`
    MalformedQuery(String),
    /// the operation is not in the active allow-list
    InvalidOperation(String),
    StoreConnectionError(String),
    StoreOperationError(String),
    ArgsErr(String),
    PromptError(String),
    IoError(std::io::Error),
}

impl From<MongoError> for CliError {
    fn from(e: MongoError) -> Self {
        Self::StoreOperationError(e.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(e: rustyline::error::ReadlineError) -> Self {
        match e {
            rustyline::error::ReadlineError::Io(ioe) => Self::IoError(ioe),
            e => Self::PromptError(e.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(ioe: std::io::Error) -> Self {
        Self::IoError(ioe)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequiredFieldMissing(field) => write!(f, "{field} is required"),
            Self::FileLoadError(path, e) => {
                write!(f, "not a valid file `{}`. {e}", path.display())
            }
            Self::MalformedQuery(clause) => {
                write!(f, "malformed query. expected `key=value`, found `{clause}`")
            }
            Self::InvalidOperation(op) => write!(f, "not a valid operation: `{op}`"),
            Self::StoreConnectionError(e) => write!(f, "failed to connect to store. {e}"),
            Self::StoreOperationError(e) => write!(f, "store error. {e}"),
            Self::ArgsErr(e) => write!(f, "incorrect arguments. {e}"),
            Self::PromptError(e) => write!(f, "failed to read input. {e}"),
            Self::IoError(e) => write!(f, "i/o error. {e}"),
        }
    }
}

impl std::error::Error for CliError {}
