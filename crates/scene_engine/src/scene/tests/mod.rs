//! Whole-frame traversal tests against the recording backend

mod frame_integration;
