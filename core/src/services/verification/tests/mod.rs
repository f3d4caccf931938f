//! Unit tests for verification service
