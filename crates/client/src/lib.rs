//! agenda_client - HTTP appointment source and CLI for the agenda week cache.

pub mod cli;
pub mod client;
pub mod error;
pub mod output;

pub use client::CrmClient;
pub use error::{ClientError, Result};
