/*
 * Created on Wed Oct 07 2026
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
    crate::error::{CliError, CliResult},
    rustyline::{config::Configurer, error::ReadlineError, DefaultEditor},
};

#[allow(async_fn_in_trait)]
/// Something that can ask the operator a question and wait for the answer
pub trait Prompt {
    async fn ask(&mut self, message: &str) -> CliResult<String>;
}

/// Reads answers from the terminal
pub struct LinePrompt {
    editor: DefaultEditor,
}

impl LinePrompt {
    pub fn new() -> CliResult<Self> {
        let mut editor = DefaultEditor::new()?;
        editor.set_auto_add_history(true);
        Ok(Self { editor })
    }
}

impl Prompt for LinePrompt {
    async fn ask(&mut self, message: &str) -> CliResult<String> {
        let editor = &mut self.editor;
        // the editor blocks on the terminal; keep it off the executor
        match tokio::task::block_in_place(|| editor.readline(message)) {
            Ok(line) => Ok(line),
            Err(ReadlineError::Interrupted) => Err(CliError::PromptError("interrupted".into())),
            Err(ReadlineError::Eof) => Err(CliError::PromptError("end of input".into())),
            Err(e) => Err(e.into()),
        }
    }
}

/// Answers questions from a fixed script, in order, and remembers what was asked
#[cfg(test)]
pub struct ScriptedPrompt {
    answers: std::collections::VecDeque<String>,
    pub asked: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompt {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            asked: vec![],
        }
    }
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

#[cfg(test)]
impl Prompt for ScriptedPrompt {
    async fn ask(&mut self, message: &str) -> CliResult<String> {
        self.asked.push(message.to_owned());
        self.answers
            .pop_front()
            .ok_or_else(|| CliError::PromptError("end of input".into()))
    }
}
