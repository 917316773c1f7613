//! Session commands: onboard, login, logout, whoami.

use anyhow::Result;
use clap::Args;
use mcore::{Session, SessionStore, Storage, UserRole};

/// Create a client session.
#[derive(Args, Debug)]
pub struct Onboard {
    /// Customer segment, e.g. `discovery`.
    #[arg(long)]
    pub client_type: String,
    /// Display name.
    #[arg(long)]
    pub name: Option<String>,
}

impl Onboard {
    pub fn run<S: Storage>(self, store: &mut SessionStore<S>) -> Result<()> {
        store.set_role(UserRole::Client)?;
        let mut session = store.set_client_type(self.client_type)?.clone();
        if let Some(name) = self.name {
            session.name = Some(name);
            store.set_user(Some(session))?;
        }
        print_session(store.user());
        Ok(())
    }
}

/// Sign in by name.
#[derive(Args, Debug)]
pub struct Login {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub department: Option<String>,
}

impl Login {
    pub fn run<S: Storage>(self, store: &mut SessionStore<S>) -> Result<()> {
        let client_type = store.user().and_then(|s| s.client_type.clone());
        store.set_user(Some(Session {
            name: Some(self.name),
            role: Some(UserRole::Client),
            department: self.department,
            client_type,
        }))?;
        print_session(store.user());
        Ok(())
    }
}

pub fn logout<S: Storage>(store: &mut SessionStore<S>) -> Result<()> {
    store.logout()?;
    println!("Signed out.");
    Ok(())
}

pub fn whoami<S: Storage>(store: &SessionStore<S>) -> Result<()> {
    print_session(store.user());
    Ok(())
}

fn print_session(session: Option<&Session>) {
    let Some(session) = session else {
        println!("Not signed in.");
        return;
    };
    println!("name:        {}", session.name.as_deref().unwrap_or("-"));
    println!(
        "role:        {}",
        if session.role.is_some() { "client" } else { "-" }
    );
    println!("department:  {}", session.department.as_deref().unwrap_or("-"));
    println!("client type: {}", session.client_type.as_deref().unwrap_or("-"));
}
