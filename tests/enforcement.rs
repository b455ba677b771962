// Integration test entry point for enforcement behavioral tests.
#[path = "common/mod.rs"]
mod common;

#[path = "enforcement/test_scenarios.rs"]
mod test_scenarios;
#[path = "enforcement/test_tracking.rs"]
mod test_tracking;
#[path = "enforcement/test_fixture_scan.rs"]
mod test_fixture_scan;
