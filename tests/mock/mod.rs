//! Mock-based tests for the synthetics test resource.
//!
//! These tests use wiremock to simulate API responses without hitting real APIs.
