//! Small data transforms run between the steps of a pipeline. Each is exposed
//! both as a `biowrap` subcommand and as a code tool (see
//! [`crate::tools::biowrap`]).

pub mod fastqc;
pub mod intervals;
