/*
 * Created on Mon Oct 05 2026
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
    crate::{
        cli::Cli,
        dispatch::Mode,
        error::{CliError, CliResult},
        prompt::Prompt,
    },
    libdocport::env_vars,
    std::{env, path::PathBuf},
};

const TXT_URL: &str = "Custom store url (mongodb://localhost:27017 by default): ";
const TXT_DATABASE: &str = "Database name: ";
const TXT_COLLECTION: &str = "Collection name: ";
const TXT_FILE: &str = "File name: ";

#[derive(Debug, PartialEq)]
/// Everything that a run needs, after flags, the environment and the operator have had
/// their say
pub struct Settings {
    pub url: String,
    pub database: String,
    pub collection: String,
    pub file: PathBuf,
    pub mode: Mode,
    pub request: Option<Request>,
}

#[derive(Debug, PartialEq)]
/// An operation given on the command line
pub struct Request {
    pub operation: String,
    pub query: String,
}

/// Fill in the settings. Flags win over the environment, which wins over the prompt. A
/// blank URL means the default URL; any other blank field is an error
pub async fn resolve<P: Prompt>(cli: Cli, prompt: &mut P) -> CliResult<Settings> {
    let url = match cli.url.or_else(|| env::var(env_vars::DOCPORT_URL).ok()) {
        Some(url) => url,
        None => prompt.ask(TXT_URL).await?,
    };
    let url = match url.trim() {
        "" => libdocport::DEFAULT_URL.to_owned(),
        url => libdocport::normalize_url(url)
            .ok_or_else(|| CliError::ArgsErr(format!("unknown scheme in store url `{url}`")))?,
    };
    let database = required(cli.database, prompt, TXT_DATABASE, "database name").await?;
    let collection = required(cli.collection, prompt, TXT_COLLECTION, "collection name").await?;
    let file = match cli.file {
        Some(file) if file.as_os_str().is_empty() => {
            return Err(CliError::RequiredFieldMissing("file name"))
        }
        Some(file) => file,
        None => PathBuf::from(required(None, prompt, TXT_FILE, "file name").await?),
    };
    let request = cli.operation.map(|operation| Request {
        operation: operation.trim().to_owned(),
        query: cli.query.unwrap_or_default(),
    });
    Ok(Settings {
        url,
        database,
        collection,
        file,
        mode: cli.mode,
        request,
    })
}

async fn required<P: Prompt>(
    value: Option<String>,
    prompt: &mut P,
    message: &str,
    field: &'static str,
) -> CliResult<String> {
    let value = match value {
        Some(v) => v,
        None => prompt.ask(message).await?,
    };
    match value.trim() {
        "" => Err(CliError::RequiredFieldMissing(field)),
        value => Ok(value.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use {
        super::{resolve, Request, Settings, TXT_COLLECTION, TXT_DATABASE, TXT_FILE},
        crate::{cli::Cli, dispatch::Mode, error::CliError, prompt::ScriptedPrompt},
        clap::Parser,
        std::path::PathBuf,
    };

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(["docport"].iter().chain(args))
    }

    #[tokio::test]
    async fn flags_skip_the_prompt() {
        let mut prompt = ScriptedPrompt::new(&[]);
        let settings = resolve(
            cli(&[
                "-u", "memory://", "-d", "shop", "-c", "fruits", "-f", "f.json", "-m", "general",
                "-o", " find ", "-q", "qty=5",
            ]),
            &mut prompt,
        )
        .await
        .unwrap();
        assert_eq!(
            settings,
            Settings {
                url: "memory://".into(),
                database: "shop".into(),
                collection: "fruits".into(),
                file: PathBuf::from("f.json"),
                mode: Mode::General,
                request: Some(Request {
                    operation: "find".into(),
                    query: "qty=5".into()
                }),
            }
        );
        assert!(prompt.asked.is_empty());
    }

    #[tokio::test]
    async fn prompt_for_what_is_missing() {
        let mut prompt = ScriptedPrompt::new(&["shop", " fruits ", "data/fruits.json"]);
        let settings = resolve(cli(&["-u", "localhost:27018"]), &mut prompt)
            .await
            .unwrap();
        assert_eq!(settings.url, "mongodb://localhost:27018");
        assert_eq!(settings.database, "shop");
        assert_eq!(settings.collection, "fruits");
        assert_eq!(settings.file, PathBuf::from("data/fruits.json"));
        assert_eq!(settings.request, None);
        assert_eq!(prompt.asked, [TXT_DATABASE, TXT_COLLECTION, TXT_FILE]);
    }

    #[tokio::test]
    async fn operation_without_query_is_empty_query() {
        let mut prompt = ScriptedPrompt::new(&[]);
        let settings = resolve(
            cli(&["-u", "memory://", "-d", "a", "-c", "b", "-f", "c", "-o", "count"]),
            &mut prompt,
        )
        .await
        .unwrap();
        assert_eq!(
            settings.request,
            Some(Request {
                operation: "count".into(),
                query: String::new()
            })
        );
    }

    #[tokio::test]
    async fn blank_database_is_rejected() {
        let mut prompt = ScriptedPrompt::new(&["  "]);
        let e = resolve(cli(&["-u", "memory://"]), &mut prompt)
            .await
            .unwrap_err();
        assert!(matches!(e, CliError::RequiredFieldMissing("database name")));
        assert_eq!(e.to_string(), "database name is required");
        // nothing else was asked
        assert_eq!(prompt.remaining(), 0);
        assert_eq!(prompt.asked.len(), 1);
    }

    #[tokio::test]
    async fn blank_collection_and_file_are_rejected() {
        let mut prompt = ScriptedPrompt::new(&["shop", ""]);
        let e = resolve(cli(&["-u", "memory://"]), &mut prompt)
            .await
            .unwrap_err();
        assert!(matches!(e, CliError::RequiredFieldMissing("collection name")));
        let mut prompt = ScriptedPrompt::new(&[""]);
        let e = resolve(cli(&["-u", "memory://", "-d", "a", "-c", "b"]), &mut prompt)
            .await
            .unwrap_err();
        assert!(matches!(e, CliError::RequiredFieldMissing("file name")));
    }

    #[tokio::test]
    async fn unknown_url_scheme_is_rejected() {
        let mut prompt = ScriptedPrompt::new(&[]);
        let e = resolve(cli(&["-u", "redis://localhost"]), &mut prompt)
            .await
            .unwrap_err();
        assert!(matches!(e, CliError::ArgsErr(_)));
    }
}
