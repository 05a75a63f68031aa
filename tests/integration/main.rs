//! Integration test harness

mod config_tests;
mod crawl_tests;
