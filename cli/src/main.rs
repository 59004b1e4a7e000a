/*
 * Created on Sat Oct 03 2026
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

macro_rules! fatal {
    ($($arg:tt)*) => {{
        eprintln!($($arg)*);
        std::process::exit(0x01);
    }}
}

#[macro_use]
extern crate log;

mod args;
mod cli;
mod dispatch;
mod error;
mod loader;
mod pipeline;
mod prompt;
mod query;
mod resp;
mod store;

use {
    crate::{cli::Cli, error::CliResult, prompt::LinePrompt},
    clap::Parser,
    env_logger::Builder,
    libdocport::env_vars,
    std::env,
};

fn main() {
    Builder::new()
        .parse_filters(
            &env::var(env_vars::DOCPORT_LOG)
                .unwrap_or_else(|_| libdocport::DEFAULT_LOG_FILTER.to_owned()),
        )
        .init();
    let cli = Cli::parse();
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .thread_name("docport")
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => fatal!("docport error: failed to start runtime. {e}"),
    };
    match runtime.block_on(run(cli)) {
        Ok(()) => {}
        Err(e) => fatal!("docport error: {e}"),
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let mut prompt = LinePrompt::new()?;
    let settings = args::resolve(cli, &mut prompt).await?;
    let outcome = pipeline::run(&settings, &mut prompt).await?;
    resp::format_response(outcome)
}
