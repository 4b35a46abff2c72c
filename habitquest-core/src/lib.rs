//! HabitQuest core — habit tracking with gamified progression.
//!
//! The engine turns daily check-ins into streaks, experience points, levels,
//! rank milestones and combo bonuses, with a short reversal window for the
//! most recent check-in. State lives in a single-writer SQLite key/value
//! store; everything user-facing (rendering, input, audio) is a collaborator
//! outside this crate.

pub mod commands;
pub mod config;
pub mod model;
pub mod services;
