//! CLI argument parsing and command dispatch.

use crate::config::{self, Config};
use anyhow::Result;
use clap::{Parser, Subcommand};
use mcore::{FileStorage, SessionStore, session::AUTH_RESET};
use std::path::PathBuf;

pub use {
    backend::BackendCommand, chat::Ask, directory::DirectoryCommand, llm::LlmCommand, serve::Serve,
    session::{Login, Onboard},
};

pub mod backend;
pub mod chat;
pub mod directory;
pub mod llm;
pub mod serve;
pub mod session;

/// MAISYS Client Care.
#[derive(Parser, Debug)]
#[command(name = "maisys", about = "MAISYS Client Care")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file, instead of `~/.config/maisys/maisys.toml`.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the persisted session.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Discard any stored session before running.
    #[arg(long, global = true)]
    pub fresh: bool,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the proxy server.
    Serve(Serve),
    /// Create a client session for a customer segment.
    Onboard(Onboard),
    /// Sign in by name.
    Login(Login),
    /// Clear the stored session.
    Logout,
    /// Show the stored session.
    Whoami,
    /// Start an interactive chat.
    Chat,
    /// Ask a single question.
    Ask(Ask),
    /// Query the staff directory.
    Directory {
        #[command(subcommand)]
        action: DirectoryCommand,
    },
    /// Call the backend data service through the proxy.
    Backend {
        #[command(subcommand)]
        action: BackendCommand,
    },
    /// Inspect the LLM gateway's agents and models.
    Llm {
        #[command(subcommand)]
        action: LlmCommand,
    },
}

impl Cli {
    /// Resolve configuration and run the selected command.
    pub async fn run(self) -> Result<()> {
        let config = config::resolve_config(self.config.as_deref())?;
        let ctx = Context {
            data_dir: config::data_dir(self.data_dir.as_deref())?,
            fresh: self.fresh,
            config,
        };

        match self.command {
            Command::Serve(serve) => serve.run(&ctx.config).await,
            Command::Onboard(onboard) => onboard.run(&mut ctx.sessions()?),
            Command::Login(login) => login.run(&mut ctx.sessions()?),
            Command::Logout => session::logout(&mut ctx.sessions()?),
            Command::Whoami => session::whoami(&ctx.sessions()?),
            Command::Chat => chat::chat(&ctx).await,
            Command::Ask(ask) => ask.run(&ctx).await,
            Command::Directory { action } => action.run(&ctx.config.directory).await,
            Command::Backend { action } => action.run(&ctx.config.client).await,
            Command::Llm { action } => {
                action
                    .run(&ctx.config.gateway.upstream.llm_gateway_url)
                    .await
            }
        }
    }
}

/// Resolved state shared by the commands.
pub struct Context {
    pub config: Config,
    pub data_dir: PathBuf,
    pub fresh: bool,
}

impl Context {
    /// Open the persisted session, clearing it first under `--fresh`.
    pub fn sessions(&self) -> Result<SessionStore<FileStorage>> {
        let storage = FileStorage::open(&self.data_dir)?;
        SessionStore::open(storage, self.fresh.then_some(AUTH_RESET))
    }
}
