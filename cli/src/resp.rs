/*
 * Created on Fri Oct 09 2026
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
    crate::{dispatch::Outcome, error::CliResult},
    crossterm::{
        style::{Color, ResetColor, SetForegroundColor},
        ExecutableCommand,
    },
    mongodb::bson::{Bson, Document},
    std::io::{self, Write},
};

/// Containers whose rendered children fit in this many columns are kept on one line
const INLINE_WIDTH: usize = 72;
const INDENT: &str = "  ";

pub fn format_response(outcome: Outcome) -> CliResult<()> {
    let summary = match &outcome {
        Outcome::Documents(documents) => Some(match documents.len() {
            1 => "(1 document)\n".to_owned(),
            n => format!("({n} documents)\n"),
        }),
        Outcome::Document(None) => Some("(no match)\n".to_owned()),
        _ => None,
    };
    println!("{}", render(&outcome.into_bson()));
    if let Some(summary) = summary {
        print_gray(&summary)?;
    }
    Ok(())
}

/// Render a value in shell notation. Nothing is ever elided, however deep the nesting
pub fn render(value: &Bson) -> String {
    let mut out = String::new();
    render_value(value, 0, &mut out);
    out
}

fn render_value(value: &Bson, depth: usize, out: &mut String) {
    match value {
        Bson::Document(document) => render_document(document, depth, out),
        Bson::Array(items) => {
            let items: Vec<String> = items.iter().map(|item| render_nested(item, depth)).collect();
            render_container(('[', ']'), items, depth, out)
        }
        scalar => out.push_str(&render_scalar(scalar)),
    }
}

fn render_nested(value: &Bson, depth: usize) -> String {
    let mut out = String::new();
    render_value(value, depth + 1, &mut out);
    out
}

fn render_document(document: &Document, depth: usize, out: &mut String) {
    let fields: Vec<String> = document
        .iter()
        .map(|(key, value)| format!("{}: {}", render_key(key), render_nested(value, depth)))
        .collect();
    render_container(('{', '}'), fields, depth, out)
}

fn render_container(
    (open, close): (char, char),
    items: Vec<String>,
    depth: usize,
    out: &mut String,
) {
    if items.is_empty() {
        out.push(open);
        out.push(close);
        return;
    }
    let width: usize = items.iter().map(|item| item.len() + 2).sum();
    if width <= INLINE_WIDTH && !items.iter().any(|item| item.contains('\n')) {
        out.push(open);
        out.push(' ');
        out.push_str(&items.join(", "));
        out.push(' ');
        out.push(close);
        return;
    }
    out.push(open);
    out.push('\n');
    let mut items = items.into_iter().peekable();
    while let Some(item) = items.next() {
        (0..=depth).for_each(|_| out.push_str(INDENT));
        out.push_str(&item);
        if items.peek().is_some() {
            out.push(',');
        }
        out.push('\n');
    }
    (0..depth).for_each(|_| out.push_str(INDENT));
    out.push(close);
}

fn render_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_ident = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    };
    if is_ident {
        key.to_owned()
    } else {
        render_string(key)
    }
}

fn render_scalar(value: &Bson) -> String {
    match value {
        Bson::Null | Bson::Undefined => "null".to_owned(),
        Bson::Boolean(b) => b.to_string(),
        Bson::Int32(i) => i.to_string(),
        Bson::Int64(i) => i.to_string(),
        Bson::Double(f) if f.is_nan() => "NaN".to_owned(),
        Bson::Double(f) if f.is_infinite() => {
            if f.is_sign_positive() {
                "Infinity".to_owned()
            } else {
                "-Infinity".to_owned()
            }
        }
        Bson::Double(f) => f.to_string(),
        Bson::String(s) => render_string(s),
        Bson::ObjectId(oid) => format!("ObjectId('{}')", oid.to_hex()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(iso) => format!("ISODate('{iso}')"),
            Err(_) => format!("ISODate({})", dt.timestamp_millis()),
        },
        other => other.to_string(),
    }
}

fn render_string(s: &str) -> String {
    let mut ret = String::with_capacity(s.len() + 2);
    ret.push('\'');
    for ch in s.chars() {
        match ch {
            '\'' | '\\' => {
                ret.push('\\');
                ret.push(ch);
            }
            '\n' => ret.push_str("\\n"),
            '\t' => ret.push_str("\\t"),
            ch => ret.push(ch),
        }
    }
    ret.push('\'');
    ret
}

fn print_gray(s: &str) -> std::io::Result<()> {
    print_colored_text(s, Color::DarkGrey)
}

fn print_colored_text(text: &str, color: Color) -> std::io::Result<()> {
    let mut stdout = io::stdout();
    stdout.execute(SetForegroundColor(color))?;
    print!("{text}");
    stdout.flush()?;
    stdout.execute(ResetColor)?;
    Ok(())
}
