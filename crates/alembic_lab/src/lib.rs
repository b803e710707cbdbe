//! # ALEMBIC Lab
//!
//! The accounting engine for the ALEMBIC collectible set: the supply
//! ledger, the purchase/brewing/decomposition engines, the collaborator
//! traits, and the single-writer [`lab::Laboratory`] that ties them
//! together. Identity encoding, the static catalog, and the error taxonomy
//! live in `alembic_core`.

pub mod brewing;
pub mod catalog;
pub mod collab;
pub mod config;
pub mod decomposition;
pub mod events;
pub mod lab;
pub mod ledger;
pub mod purchase;
