//! Integration tests against the mock [`support::TestBoard`], covering the testable
//! properties and concrete scenarios of the search core's design.

pub mod support;
