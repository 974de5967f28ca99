//! Unit tests for stepgraph-cli, organized by module.
//!
//! Each submodule documents the behaviour under test.
