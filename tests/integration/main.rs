// Single integration test harness; each module covers one area end to end
mod cli_tests;
mod content_tests;
mod engine_tests;
mod fallback_tests;
mod projection_tests;
mod worker_tests;
