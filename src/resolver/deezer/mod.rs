//! Deezer API integration
//!
//! Free search endpoint, no API key required. Good artwork source (up to
//! 1000x1000), but the search payload carries no release date.
//!
//! API docs: https://developers.deezer.com/api/search

mod adapter;
mod client;
pub mod dto;

pub use client::DeezerClient;
