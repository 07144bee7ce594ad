//! iTunes Search API integration
//!
//! Free search endpoint, no API key required. Strongest source for album,
//! year, genre, and artwork, so it holds the top merge priority.
//!
//! API docs: https://developer.apple.com/library/archive/documentation/AudioVideo/Conceptual/iTuneSearchAPI/

mod adapter;
mod client;
pub mod dto;

pub use client::ItunesClient;
