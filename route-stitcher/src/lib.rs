//! Commuter route stitching server.
//!
//! Answers "which transit routes get me from here to there?" by matching
//! origin and destination against a corpus of route polylines, stitching
//! up to three routes with walking legs between them, and falling back to
//! a driving path when nothing fits.

pub mod cache;
pub mod corpus;
pub mod directions;
pub mod domain;
pub mod geometry;
pub mod planner;
pub mod walking;
pub mod web;
