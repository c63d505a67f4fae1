//! Unit test harness for the domain layer.

mod task_spec_tests;
