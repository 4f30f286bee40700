mod concurrency_test;
mod rhai_end_to_end_test;
