// src/lib.rs

pub mod appearance;
pub mod core;
pub mod error;
pub mod persistence;
pub mod preferences;

pub use crate::core::converter::{classify, classify_with_rng};
pub use crate::core::engine::SoupEngine;
pub use crate::core::overrides::OverrideDictionary;
pub use crate::core::types::{Token, TokenClass};
