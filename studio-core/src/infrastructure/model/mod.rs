//! Model infrastructure module
//!
//! Upstream AI providers behind one trait, built by a factory from profiles.
//!
//! # Structure
//! - `types` - ProviderOutput, ProviderError and TextStream
//! - `traits` - ProviderClient trait
//! - `factory` - builds clients from profiles
//! - `clients` - Gemini, OpenAI-compatible and Pollinations implementations

pub mod clients;
pub mod factory;
pub mod traits;
pub mod types;

pub use factory::{ProviderFactory, resolve_api_key};
pub use traits::ProviderClient;
pub use types::{ProviderError, ProviderOutput, TextStream};
