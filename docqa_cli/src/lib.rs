//! docqa command-line front-end.
//!
//! Thin glue over [`docqa_ai::session::Session`]: parse flags, load files,
//! print answers. Every operation writes to a caller-supplied writer so it can
//! be driven from tests.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use docqa_ai::answer::AnswerResponse;
use docqa_ai::config::{AiSettings, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS};
use docqa_ai::huggingface::HfModel;
use docqa_ai::index::DEFAULT_TOP_K;
use docqa_ai::retrieve::SimilarityResult;
use docqa_ai::session::{DocumentListEntry, Session, UploadOutcome};
use docqa_core::chunking::DEFAULT_CHUNK_SIZE;
use docqa_core::error::AppError;
use docqa_core::ingest::read_upload;
use serde::Serialize;

pub mod shell;

#[derive(Parser, Debug)]
#[command(name = "docqa")]
#[command(about = "Ask questions about local documents using a hosted LLaMA model", long_about = None)]
pub struct Cli {
    /// Hugging Face API token
    #[arg(long, env = "HUGGINGFACE_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Model to answer with (see `docqa models`)
    #[arg(long, env = "DOCQA_MODEL", default_value = "Meta-Llama-4", global = true)]
    pub model: HfModel,

    /// Override the model's inference URL
    #[arg(long, env = "DOCQA_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Sampling temperature, 0 to 1
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE, global = true)]
    pub temperature: f32,

    /// Maximum new tokens in the answer
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS, global = true)]
    pub max_tokens: u32,

    /// Number of excerpts passed to the model
    #[arg(long, default_value_t = DEFAULT_TOP_K, global = true)]
    pub top_k: usize,

    /// Chunk size in characters
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, global = true)]
    pub chunk_size: usize,

    /// Network timeout for inference calls
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout_secs: u64,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load documents and answer one question
    Ask {
        /// Document to load (repeatable)
        #[arg(short, long = "file")]
        files: Vec<PathBuf>,
        question: String,
    },
    /// Show the ranked excerpts for a query (no network)
    Search {
        #[arg(short, long = "file")]
        files: Vec<PathBuf>,
        query: String,
    },
    /// Show the context block that would be sent for a query (no network)
    Context {
        #[arg(short, long = "file")]
        files: Vec<PathBuf>,
        query: String,
    },
    /// Interactive session
    Shell {
        #[arg(short, long = "file")]
        files: Vec<PathBuf>,
    },
    /// List available models
    Models,
}

impl Cli {
    pub fn settings(&self) -> AiSettings {
        AiSettings {
            api_key: self.api_key.clone(),
            model: self.model,
            endpoint_override: self.endpoint.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_k: self.top_k,
            chunk_size: self.chunk_size,
            timeout_secs: self.timeout_secs,
        }
    }
}

#[derive(Debug, Serialize)]
struct SearchHitOutput<'a> {
    rank: usize,
    file_name: &'a str,
    chunk_index: u32,
    score: f32,
    preview: &'a str,
}

#[derive(Debug, Serialize)]
struct ContextOutput<'a> {
    context: &'a str,
}

/// Read a file from disk and add it to the session.
pub fn upload_path(session: &mut Session, path: &Path) -> Result<UploadOutcome, AppError> {
    let (name, bytes) = read_upload(path)?;
    session.upload(&name, &bytes)
}

fn load_files(session: &mut Session, files: &[PathBuf]) -> anyhow::Result<()> {
    for path in files {
        upload_path(session, path).with_context(|| format!("failed to load {}", path.display()))?;
    }
    Ok(())
}

/// Execute a parsed command. Returns whether it succeeded.
pub fn run<R: BufRead, W: Write>(cli: Cli, input: R, out: &mut W) -> anyhow::Result<bool> {
    if let Command::Models = cli.command {
        for m in HfModel::ALL {
            writeln!(out, "{}\t{}", m.name(), m.endpoint())?;
        }
        return Ok(true);
    }

    let mut session = Session::new(cli.settings()).context("invalid settings")?;

    match &cli.command {
        Command::Ask { files, question } => {
            load_files(&mut session, files)?;
            let resp = session.ask(question);
            write!(out, "{}", render_answer(&resp, cli.json)?)?;
            Ok(resp.success)
        }
        Command::Search { files, query } => {
            load_files(&mut session, files)?;
            let hits = session.search(query);
            write!(out, "{}", render_hits(&hits, cli.json)?)?;
            Ok(true)
        }
        Command::Context { files, query } => {
            load_files(&mut session, files)?;
            let context = session.context_for(query);
            if cli.json {
                let body = ContextOutput { context: &context };
                writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
            } else {
                writeln!(out, "{context}")?;
            }
            Ok(true)
        }
        Command::Shell { files } => {
            for path in files {
                if let Err(e) = upload_path(&mut session, path) {
                    tracing::warn!(path = %path.display(), code = %e.code, "preload failed");
                    writeln!(out, "Error processing file: {}", e.describe())?;
                }
            }
            shell::run_shell(&mut session, input, out)?;
            Ok(true)
        }
        Command::Models => Ok(true),
    }
}

pub fn render_answer(resp: &AnswerResponse, json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(resp)?));
    }
    let mut s = String::new();
    if resp.success {
        s.push_str(&resp.answer);
        s.push('\n');
        if !resp.sources.is_empty() {
            s.push_str("\nSources:\n");
            for src in &resp.sources {
                s.push_str(&format!("- {src}\n"));
            }
        }
    } else {
        s.push_str(&format!("{}\n", resp.answer));
    }
    Ok(s)
}

pub fn render_hits(hits: &[SimilarityResult], json: bool) -> anyhow::Result<String> {
    if json {
        let rows: Vec<SearchHitOutput<'_>> = hits
            .iter()
            .enumerate()
            .map(|(i, h)| SearchHitOutput {
                rank: i + 1,
                file_name: &h.chunk.file_name,
                chunk_index: h.chunk.chunk_index,
                score: h.score,
                preview: &h.chunk.preview,
            })
            .collect();
        return Ok(format!("{}\n", serde_json::to_string_pretty(&rows)?));
    }
    if hits.is_empty() {
        return Ok("No documents indexed.\n".to_string());
    }
    let mut s = String::new();
    for (i, h) in hits.iter().enumerate() {
        s.push_str(&format!(
            "{}. {} #{} score={:.4}\n   {}\n",
            i + 1,
            h.chunk.file_name,
            h.chunk.chunk_index,
            h.score,
            h.chunk.preview.replace('\n', " ")
        ));
    }
    Ok(s)
}

pub fn render_documents(entries: &[DocumentListEntry]) -> String {
    if entries.is_empty() {
        return "No documents uploaded yet.\n".to_string();
    }
    let mut s = String::new();
    for (i, d) in entries.iter().enumerate() {
        s.push_str(&format!(
            "{}. {} [{}] {} uploaded {} sha256={}\n",
            i + 1,
            d.name,
            d.metadata.file_type,
            d.metadata.size_label(),
            d.uploaded_at,
            &d.text_sha256[..d.text_sha256.len().min(12)]
        ));
    }
    s
}
