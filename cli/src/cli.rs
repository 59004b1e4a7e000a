/*
 * Created on Tue Oct 06 2026
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

use {crate::dispatch::Mode, clap::Parser, std::path::PathBuf};

const HELP_TEMPLATE: &str = r#"
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
"#;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, help_template = HELP_TEMPLATE)]
pub struct Cli {
    #[arg(
        short,
        long,
        help = "Sets the store URL (prompted for if absent; also read from DOCPORT_URL)",
        value_name = "URL"
    )]
    pub url: Option<String>,

    #[arg(
        short,
        long,
        help = "Sets the database to import into",
        value_name = "NAME"
    )]
    pub database: Option<String>,

    #[arg(
        short,
        long,
        help = "Sets the collection to import into",
        value_name = "NAME"
    )]
    pub collection: Option<String>,

    #[arg(
        short,
        long,
        help = "Sets the JSON file to import (an array of documents)",
        value_name = "PATH"
    )]
    pub file: Option<PathBuf>,

    #[arg(
        short,
        long,
        help = "Selects the allowed operations and the operation that runs by default",
        value_enum,
        default_value_t = Mode::DefaultCount
    )]
    pub mode: Mode,

    #[arg(
        short,
        long,
        help = "Runs this operation instead of asking for one",
        value_name = "OPERATION"
    )]
    pub operation: Option<String>,

    #[arg(
        short,
        long,
        help = "The query for --operation, like: foo='bar', baz=42",
        value_name = "QUERY",
        requires = "operation"
    )]
    pub query: Option<String>,
}
