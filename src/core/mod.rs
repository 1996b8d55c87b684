//! core
//!
//! Core domain types and configuration for ghexport.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Scope, Category, Item, Cutoff, PageCursor
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing

pub mod config;
pub mod types;
