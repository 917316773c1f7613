//! LLM gateway inspection commands.

use crate::cmd::backend::print_json;
use anyhow::Result;
use clap::Subcommand;
use client::LlmClient;

/// LLM gateway subcommands.
#[derive(Subcommand, Debug)]
pub enum LlmCommand {
    /// List the gateway's agents.
    Agents,
    /// Show one agent.
    Agent { name: String },
    /// Send a test question to an agent.
    Test {
        name: String,
        question: String,
        /// Extra instructions for this question only.
        #[arg(long)]
        instructions: Option<String>,
    },
    /// List available models.
    Models,
    /// Show model recommendations per task size.
    Recommendations,
}

impl LlmCommand {
    pub async fn run(self, llm_gateway_url: &str) -> Result<()> {
        let llm = LlmClient::new(llm_gateway_url);
        match self {
            Self::Agents => print_json(&llm.agents().await?)?,
            Self::Agent { name } => print_json(&llm.agent(&name).await?)?,
            Self::Test {
                name,
                question,
                instructions,
            } => {
                let reply = llm
                    .test_agent(&name, &question, instructions.as_deref())
                    .await?;
                println!("[{}] {}", reply.model_used, reply.answer);
            }
            Self::Models => {
                for model in llm.models().await? {
                    println!("{model}");
                }
            }
            Self::Recommendations => print_json(&llm.model_recommendations().await?)?,
        }
        Ok(())
    }
}
