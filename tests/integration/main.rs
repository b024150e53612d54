//! Integration tests

mod router_tests;
