//! services/api/src/lib.rs
//!
//! The glucose tracker HTTP service: credential and session authority, store
//! adapters and the axum web layer.

pub mod adapters;
pub mod auth;
pub mod config;
pub mod error;
pub mod web;
