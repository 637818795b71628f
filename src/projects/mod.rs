//! Project records live in their own tables and are written elsewhere; only
//! their read shapes are defined here.

#[allow(dead_code)]
pub mod repo_types;
