//! GED admin - document library client for the consultant staffing platform.
//!
//! Classifies documents into folders, projects filters onto the REST API and
//! keeps the document library view consistent across overlapping fetches.

pub mod api;
pub mod cli;
pub mod config;
pub mod filter;
pub mod folders;
pub mod models;
pub mod session;
pub mod view;
