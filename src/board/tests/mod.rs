//! Unit tests for the board reconciliation engine.

mod support;
