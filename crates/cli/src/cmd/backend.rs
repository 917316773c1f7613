//! Backend data service commands.

use anyhow::Result;
use clap::Subcommand;
use client::{BackendClient, ClientConfig};
use serde::Serialize;

/// Backend subcommands.
#[derive(Subcommand, Debug)]
pub enum BackendCommand {
    /// Check that the backend answers.
    Health,
    /// List agents.
    Agents,
    /// Show one agent.
    Agent { id: String },
    /// Delete an agent.
    DeleteAgent { id: String },
    /// List integrations.
    Integrations,
    /// List workflows.
    Workflows,
    /// List recorded errors.
    Errors,
    /// Show recent activity.
    Activity,
    /// Show the agent sync state.
    Sync,
    /// Deploy an agent.
    Deploy { id: String },
    /// Undeploy an agent.
    Undeploy { id: String },
    /// Show an agent's deployment status.
    Status { id: String },
    /// Show the deployment overview.
    Overview,
}

impl BackendCommand {
    pub async fn run(self, config: &ClientConfig) -> Result<()> {
        let backend = BackendClient::new(config);
        match self {
            Self::Health => {
                let ok = backend.health_check().await;
                println!("{}", if ok { "healthy" } else { "unreachable" });
            }
            Self::Agents => {
                for agent in backend.agents().await? {
                    println!("{:<16} {:<24} {}", agent.id, agent.name, agent.role);
                }
            }
            Self::Agent { id } => print_json(&backend.agent(&id).await?)?,
            Self::DeleteAgent { id } => {
                backend.delete_agent(&id).await?;
                println!("Deleted {id}.");
            }
            Self::Integrations => {
                for integration in backend.integrations().await? {
                    println!(
                        "{:>4}  {:<24} {:<12} {}",
                        integration.id, integration.name, integration.kind, integration.description
                    );
                }
            }
            Self::Workflows => {
                for workflow in backend.workflows().await? {
                    println!("{:<16} {:<32} {}", workflow.id, workflow.name, workflow.status);
                }
            }
            Self::Errors => {
                for error in backend.errors().await? {
                    let state = if error.resolved { "resolved" } else { "open" };
                    println!("{:<10} {:<16} {}", state, error.time, error.kind);
                }
            }
            Self::Activity => {
                for item in backend.activity().await? {
                    println!("{:<10} {} {}", item.time, item.user, item.action);
                }
            }
            Self::Sync => print_json(&backend.sync_health().await?)?,
            Self::Deploy { id } => print_json(&backend.deploy_agent(&id).await?)?,
            Self::Undeploy { id } => print_json(&backend.undeploy_agent(&id).await?)?,
            Self::Status { id } => print_json(&backend.deployment_status(&id).await?)?,
            Self::Overview => print_json(&backend.deployment_overview().await?)?,
        }
        Ok(())
    }
}

pub(crate) fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
