//! Class Assistant
//!
//! Teachers file short announcements under keyword phrases for a school and
//! class section; students type a single word and get every matching entry,
//! newest first, regardless of accents or case.
//!
//! - **`search`**: text normalization, tag extraction, the per-partition
//!   search index and the recent / upcoming windows. Pure and synchronous.
//! - **`repository`**: the SQLite-backed record store.
//! - **`service`**: snapshot cache and the announcement workflows
//!   (search, submit, edit, delete) with ownership checks.
//! - **`auth`** and **`api`**: teacher sessions and the HTTP surface.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod repository;
pub mod search;
pub mod service;
