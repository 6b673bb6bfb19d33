//! Integration test harness
//!
//! Each submodule exercises the crawler end-to-end against a local
//! wiremock server.

mod crawl_tests;
