//! `biowrap` is a catalog of declarative wrappers for bioinformatics command
//! line tools. Each wrapper describes a versioned, containerized tool: its
//! inputs and outputs, typed with data types that know their secondary files,
//! how its command line is assembled, and its resource requirements. Tools are
//! composed into workflows, and everything is collected into a
//! [`registry::Registry`] for a workflow framework to translate into CWL/WDL.
//!
//! This package is composed of both a library crate, as well as a binary
//! crate (`biowrap`) for browsing the catalog, previewing command lines and
//! running the transforms implemented here.
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]

pub mod commands;
pub mod registry;
pub mod tool;
pub mod tools;
pub mod transforms;
pub mod types;
pub mod utils;
pub mod workflow;
pub mod workflows;
