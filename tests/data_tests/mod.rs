mod merge_properties_test;
mod request_test;
