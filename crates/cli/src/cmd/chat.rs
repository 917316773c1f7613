//! Chat commands: the interactive REPL and one-shot questions.

use crate::{cmd::Context, repl::ChatRepl};
use anyhow::{Result, bail};
use clap::Args;
use client::QueryClient;
use mcore::{ChatController, FileStorage, Session, SystemClock};

/// Controller used by both chat commands.
pub type Chat = ChatController<QueryClient, FileStorage, SystemClock>;

/// Ask a single question.
#[derive(Args, Debug)]
pub struct Ask {
    /// Question text.
    pub question: String,
}

impl Ask {
    pub async fn run(self, ctx: &Context) -> Result<()> {
        let mut chat = open(ctx)?;
        match chat.send(&self.question).await {
            Some(reply) => println!("{}", reply.content),
            None => bail!("nothing to ask"),
        }
        Ok(())
    }
}

/// Enter the interactive REPL.
pub async fn chat(ctx: &Context) -> Result<()> {
    ChatRepl::new(open(ctx)?)?.run().await
}

/// Build a controller for the signed-in customer.
fn open(ctx: &Context) -> Result<Chat> {
    let sessions = ctx.sessions()?;
    let session = require_session(sessions.user())?;
    let responder = QueryClient::new(&ctx.config.client);
    Ok(ChatController::new(
        responder,
        sessions.storage().clone(),
        SystemClock,
        Some(session),
    ))
}

/// Chat is only available once onboarding or login stored a session.
pub fn require_session(session: Option<&Session>) -> Result<&Session> {
    match session {
        Some(session) => Ok(session),
        None => bail!("no session; run `maisys onboard --client-type <type>` first"),
    }
}
