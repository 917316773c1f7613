//! Staff directory commands.

use anyhow::{Context, Result};
use clap::Subcommand;
use directory::{
    DirectoryClient, DirectoryConfig, DirectoryEntry, EntryUpdate, NewEntry, SearchFilters,
    action,
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Directory subcommands.
#[derive(Subcommand, Debug)]
pub enum DirectoryCommand {
    /// List every entry.
    List,
    /// Search entries.
    Search {
        /// Free-text term.
        query: Option<String>,
        #[arg(long)]
        departement: Option<String>,
        #[arg(long)]
        poste: Option<String>,
        /// Match any word of the query client-side instead.
        #[arg(long)]
        natural: bool,
    },
    /// Show one entry.
    Get { id: u64 },
    /// Add an entry.
    Create {
        #[arg(long)]
        nom: String,
        #[arg(long, default_value = "")]
        ip: String,
        #[arg(long)]
        poste: String,
        #[arg(long)]
        departement: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        tel: String,
    },
    /// Change fields of an entry.
    Update {
        id: u64,
        #[arg(long)]
        nom: Option<String>,
        #[arg(long)]
        ip: Option<String>,
        #[arg(long)]
        poste: Option<String>,
        #[arg(long)]
        departement: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        tel: Option<String>,
    },
    /// Remove an entry.
    Delete { id: u64 },
    /// List departments.
    Departments,
    /// Show counts per department and position.
    Stats,
    /// List entries with missing contact fields.
    Incomplete,
    /// Find the entry using an IP address.
    ByIp { ip: String },
    /// Show recent changes.
    Recent {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// List the action catalog.
    Actions,
    /// Run a catalog action with JSON parameters.
    Exec {
        action: String,
        /// Parameters as a JSON object.
        #[arg(long)]
        params: Option<String>,
    },
    /// Check that the directory service answers.
    Test,
}

impl DirectoryCommand {
    pub async fn run(self, config: &DirectoryConfig) -> Result<()> {
        let client = DirectoryClient::new(config)?;
        match self {
            Self::List => print_entries(&client.all_entries().await?),
            Self::Search {
                query,
                departement,
                poste,
                natural,
            } => {
                let entries = if natural {
                    let query = query.unwrap_or_default();
                    client.search_natural_language(&query).await?
                } else {
                    let filters = SearchFilters {
                        search: query,
                        departement,
                        poste,
                    };
                    client.search_entries(&filters).await?
                };
                print_entries(&entries);
            }
            Self::Get { id } => print_json(&client.entry_by_id(id).await?)?,
            Self::Create {
                nom,
                ip,
                poste,
                departement,
                email,
                tel,
            } => {
                let entry = NewEntry {
                    nom,
                    ip,
                    poste,
                    departement,
                    email,
                    tel,
                };
                print_json(&client.create_entry(&entry).await?)?;
            }
            Self::Update {
                id,
                nom,
                ip,
                poste,
                departement,
                email,
                tel,
            } => {
                let update = EntryUpdate {
                    nom,
                    ip,
                    poste,
                    departement,
                    email,
                    tel,
                };
                print_json(&client.update_entry(id, &update).await?)?;
            }
            Self::Delete { id } => println!("{}", client.delete_entry(id).await?.message),
            Self::Departments => {
                for department in client.departments().await? {
                    println!("{department}");
                }
            }
            Self::Stats => print_json(&client.statistics().await?)?,
            Self::Incomplete => print_entries(&client.incomplete_entries().await?),
            Self::ByIp { ip } => match client.entry_by_ip(&ip).await? {
                Some(entry) => print_json(&entry)?,
                None => println!("No entry uses {ip}."),
            },
            Self::Recent { limit } => print_json(&client.recent_changes(limit).await?)?,
            Self::Actions => {
                for action in action::ACTIONS {
                    println!("{:<18} {:<6} {}", action.id, method(action), action.name);
                }
            }
            Self::Exec { action, params } => {
                let params = parse_params(params.as_deref())?;
                print_json(&client.execute_action(&action, &params).await?)?;
            }
            Self::Test => {
                let status = client.test_connection().await;
                println!("{}: {}", status.status, status.message);
            }
        }
        Ok(())
    }
}

/// Parse `--params` as a JSON object; absent means no parameters.
pub fn parse_params(raw: Option<&str>) -> Result<Map<String, Value>> {
    let Some(raw) = raw else {
        return Ok(Map::new());
    };
    serde_json::from_str(raw).context("--params must be a JSON object")
}

fn method(action: &action::Action) -> &'static str {
    match action.method {
        action::ActionMethod::Get => "GET",
        action::ActionMethod::Post => "POST",
        action::ActionMethod::Put => "PUT",
        action::ActionMethod::Delete => "DELETE",
    }
}

fn print_entries(entries: &[DirectoryEntry]) {
    if entries.is_empty() {
        println!("No entries.");
        return;
    }
    for entry in entries {
        println!(
            "{:>5}  {:<24} {:<20} {:<20} {}",
            entry.id, entry.nom, entry.poste, entry.departement, entry.email
        );
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
