//! Threat Forager - belief-driven worker control under hidden threats
//!
//! The agent keeps a probabilistic map of where unseen threats may sit,
//! updates it from what happens to its workers, and plans one risk-aware
//! step per worker per tick. [`arena`] is a small seeded simulator to run
//! it against.

pub mod agent;
pub mod arena;
pub mod belief;
pub mod core;
pub mod planner;
pub mod spatial;
pub mod tracker;
pub mod world;
