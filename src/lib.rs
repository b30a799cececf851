//! HTTP facade over the Kodik video API: title search and per-episode
//! playable sources, reshaped into a small JSON contract for a browser frontend.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
