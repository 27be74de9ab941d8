#![allow(unused_assignments)] // thiserror/miette proc macros trigger false positives

pub mod backend;
pub mod batch;
pub mod cli;
pub mod config;
pub mod domain_xml;
pub mod error;
pub mod image;
pub mod input;
pub mod logging;
pub mod selector;
