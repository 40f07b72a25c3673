//! Stratus Core Types and Definitions
//!
//! This crate provides the foundational types for Stratus architecture
//! diagrams. It includes:
//!
//! - **Identifiers**: String-interned identifiers ([`identifier::Id`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Semantic**: The append-only diagram model of nodes, clusters and
//!   edges ([`semantic`] module)

pub mod color;
pub mod identifier;
pub mod semantic;
