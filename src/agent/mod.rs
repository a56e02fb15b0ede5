//! The decision core wired together

pub mod forager;

pub use forager::{AgentStats, ForagerAgent};
