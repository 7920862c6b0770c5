// src/core/mod.rs

pub mod converter;
pub mod engine;
pub mod export;
pub mod overrides;
pub mod tables;
pub mod types;
