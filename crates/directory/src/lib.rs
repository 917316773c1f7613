//! Client for the staff directory ("annuaire") service.
//!
//! Every call is a plain REST request against a fixed base URL, retried
//! with exponential backoff. Aggregate views (departments, statistics,
//! incomplete entries) are computed client-side from a full fetch.

pub use {
    action::{ACTIONS, Action, ActionMethod, Parameter, ParameterKind},
    client::DirectoryClient,
    config::DirectoryConfig,
    entry::{
        Change, ChangeType, ConnectionStatus, DeleteAck, DirectoryEntry, EntryUpdate, NewEntry,
        SearchFilters, Statistics,
    },
    error::{DirectoryError, RequestError},
};

pub mod action;
pub mod aggregate;
mod client;
mod config;
mod entry;
mod error;
