pub mod build_table;
pub mod header;
pub mod help;
pub mod pull_request_table;
pub mod release_table;
pub mod section;
pub mod status_bar;
