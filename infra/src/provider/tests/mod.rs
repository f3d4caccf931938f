//! Tests for the provider adapters

mod vonage_tests;
