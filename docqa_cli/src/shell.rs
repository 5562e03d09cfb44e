use std::io::{BufRead, Write};
use std::path::PathBuf;

use docqa_ai::huggingface::HfModel;
use docqa_ai::session::{Session, UploadOutcome};

use crate::{render_answer, render_documents, upload_path};

const HELP: &str = "\
Commands:
  :upload <path>   add a document
  :list            show uploaded documents
  :remove <n>      hide document n from the list (stays searchable)
  :model <name>    switch model
  :key <token>     set the Hugging Face API key
  :help            show this help
  :quit            leave
Anything else is asked as a question.
";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Upload(PathBuf),
    List,
    Remove(usize),
    Model(String),
    Key(String),
    Help,
    Quit,
    Ask(String),
    Empty,
    Invalid(String),
}

pub fn parse_line(line: &str) -> ShellCommand {
    let line = line.trim();
    if line.is_empty() {
        return ShellCommand::Empty;
    }
    let Some(rest) = line.strip_prefix(':') else {
        return ShellCommand::Ask(line.to_string());
    };

    let (cmd, arg) = match rest.split_once(char::is_whitespace) {
        Some((c, a)) => (c, a.trim()),
        None => (rest, ""),
    };
    match (cmd, arg) {
        ("quit" | "q" | "exit", _) => ShellCommand::Quit,
        ("help" | "h", _) => ShellCommand::Help,
        ("list" | "ls", _) => ShellCommand::List,
        ("upload", a) if !a.is_empty() => ShellCommand::Upload(PathBuf::from(a)),
        ("remove" | "rm", a) => match a.parse::<usize>() {
            Ok(n) if n >= 1 => ShellCommand::Remove(n),
            _ => ShellCommand::Invalid("usage: :remove <n> (1-based)".to_string()),
        },
        ("model", a) if !a.is_empty() => ShellCommand::Model(a.to_string()),
        ("key", a) if !a.is_empty() => ShellCommand::Key(a.to_string()),
        _ => ShellCommand::Invalid(format!("unknown command :{cmd}; try :help")),
    }
}

/// Line-oriented session loop. Errors are printed and the loop continues;
/// only I/O failures on `out` end it early.
pub fn run_shell<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    out: &mut W,
) -> std::io::Result<()> {
    writeln!(out, "docqa shell, model {}. Type :help for commands.", session.settings().model)?;

    for line in input.lines() {
        let line = line?;
        match parse_line(&line) {
            ShellCommand::Empty => {}
            ShellCommand::Quit => break,
            ShellCommand::Help => write!(out, "{HELP}")?,
            ShellCommand::Invalid(msg) => writeln!(out, "{msg}")?,
            ShellCommand::List => write!(out, "{}", render_documents(session.documents()))?,
            ShellCommand::Upload(path) => match upload_path(session, &path) {
                Ok(UploadOutcome::Added { chunk_count, .. }) => {
                    writeln!(out, "Added {} ({chunk_count} chunks).", path.display())?
                }
                Ok(UploadOutcome::AlreadyPresent) => {
                    writeln!(out, "{} is already uploaded.", path.display())?
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), code = %e.code, "shell upload failed");
                    writeln!(out, "Error processing file: {}", e.describe())?
                }
            },
            ShellCommand::Remove(n) => match session.remove_from_list(n - 1) {
                Ok(d) => writeln!(
                    out,
                    "Removed {} from the list. Its content remains searchable until the session ends.",
                    d.name
                )?,
                Err(e) => writeln!(out, "{}", e.describe())?,
            },
            ShellCommand::Model(name) => {
                let key = session.settings().api_key.clone();
                match name.parse::<HfModel>().and_then(|m| session.configure(key, m)) {
                    Ok(()) => writeln!(out, "Using {}.", session.settings().model)?,
                    Err(e) => {
                        tracing::warn!(model = %name, code = %e.code, "model switch rejected");
                        writeln!(out, "{}", e.describe())?
                    }
                }
            }
            ShellCommand::Key(key) => {
                let model = session.settings().model;
                match session.configure(Some(key), model) {
                    Ok(()) => writeln!(out, "API key updated.")?,
                    Err(e) => {
                        tracing::warn!(code = %e.code, "api key update rejected");
                        writeln!(out, "{}", e.describe())?
                    }
                }
            }
            ShellCommand::Ask(question) => {
                if session.documents().is_empty() {
                    writeln!(out, "Please upload at least one document to ask questions.")?;
                    continue;
                }
                if !session.can_ask() {
                    writeln!(out, "Please enter your Hugging Face API key to ask questions.")?;
                    continue;
                }
                let resp = session.ask(&question);
                let text = render_answer(&resp, false).unwrap_or_else(|_| resp.answer.clone());
                write!(out, "{text}")?;
            }
        }
    }
    Ok(())
}
