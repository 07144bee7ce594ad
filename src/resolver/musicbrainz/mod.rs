//! MusicBrainz API integration
//!
//! Open encyclopedia of recordings; the only provider here that knows ISRCs.
//! Cover art references point at the Cover Art Archive by release MBID.
//!
//! API docs: https://musicbrainz.org/doc/MusicBrainz_API

mod adapter;
mod client;
pub mod dto;

pub use client::MusicBrainzClient;
