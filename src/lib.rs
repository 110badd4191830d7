//! Rusty Grades — absolute and relative grading of exam score tables.

pub mod app;
pub mod config;
pub mod data;
pub mod grading;
pub mod report;
