//! End-to-end integration tests for the nlq workspace.
//!
//! All tests live under `tests/`; this library target is intentionally empty.
