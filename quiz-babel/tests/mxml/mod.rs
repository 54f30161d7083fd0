//! Moodle XML format tests

mod export;
mod import;
