//! LRCLIB API integration
//!
//! Community lyrics database with synced (LRC) and plain lyrics. The only
//! provider in the lyrics family; it covers the lyrics field and nothing
//! else.
//!
//! API docs: https://lrclib.net/docs

mod adapter;
mod client;
pub mod dto;

pub use client::LrclibClient;
