//! The catalog of tool definitions, grouped by provider.
//!
//! # Overview
//!
//! Each submodule wraps the tools of one provider (samtools, GATK 4, ...) and
//! exposes a `definitions()` function that builds every tool at every version
//! the provider supports. Definitions are returned as results: a definition
//! that fails validation does not stop the others from being built, and the
//! registry decides what to do with the failure (see
//! [`crate::registry::ErrorPolicy`]).
//!
//! Adding a provider means adding its module here and to
//! [`get_all_providers`].

pub mod arriba;
pub mod bcftools;
pub mod biowrap;
pub mod bwa;
pub mod cellranger;
pub mod cutadapt;
pub mod fastqc;
pub mod gatk3;
pub mod gatk4;
pub mod htslib;
pub mod igvtools;
pub mod samtools;
pub mod trimmomatic;
pub mod vcftools;

use crate::tool::{CommandToolBuilder, Tool, VersionInfo};

/// Who maintains the definitions in this catalog.
pub const MAINTAINERS: &str = "biowrap developers";

/// A group of tool definitions.
pub struct Provider {
    /// The name of the provider, as matched by the registry's ignore list.
    pub name: &'static str,

    /// Builds every definition of the provider.
    pub definitions: fn() -> Vec<anyhow::Result<Tool>>,
}

/// Gets all of the providers in the catalog, in discovery order. When a new
/// provider is added, this needs to be updated.
pub fn get_all_providers() -> Vec<Provider> {
    vec![
        Provider {
            name: "samtools",
            definitions: samtools::definitions,
        },
        Provider {
            name: "bcftools",
            definitions: bcftools::definitions,
        },
        Provider {
            name: "htslib",
            definitions: htslib::definitions,
        },
        Provider {
            name: "vcftools",
            definitions: vcftools::definitions,
        },
        Provider {
            name: "bwa",
            definitions: bwa::definitions,
        },
        Provider {
            name: "cutadapt",
            definitions: cutadapt::definitions,
        },
        Provider {
            name: "fastqc",
            definitions: fastqc::definitions,
        },
        Provider {
            name: "trimmomatic",
            definitions: trimmomatic::definitions,
        },
        Provider {
            name: "gatk3",
            definitions: gatk3::definitions,
        },
        Provider {
            name: "gatk4",
            definitions: gatk4::definitions,
        },
        Provider {
            name: "arriba",
            definitions: arriba::definitions,
        },
        Provider {
            name: "igvtools",
            definitions: igvtools::definitions,
        },
        Provider {
            name: "cellranger",
            definitions: cellranger::definitions,
        },
        Provider {
            name: "biowrap",
            definitions: biowrap::definitions,
        },
    ]
}

/// Builds a command tool once per version.
pub fn versioned(builder: CommandToolBuilder, versions: &[VersionInfo]) -> Vec<anyhow::Result<Tool>> {
    versions
        .iter()
        .map(|version| {
            builder
                .clone()
                .version(version.clone())
                .build()
                .map(Tool::Command)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn it_builds_every_definition_in_the_catalog() {
        for provider in get_all_providers() {
            for definition in (provider.definitions)() {
                if let Err(err) = definition {
                    panic!("provider {} failed to build a definition: {:#}", provider.name, err);
                }
            }
        }
    }

    #[test]
    fn it_has_unique_provider_names() {
        let providers = get_all_providers();
        let names = providers.iter().map(|p| p.name).collect::<HashSet<_>>();
        assert_eq!(names.len(), providers.len());
    }

    #[test]
    fn it_builds_one_tool_per_version() {
        let builder = CommandToolBuilder::new("Echo").base_command(["echo"]);
        let tools = versioned(
            builder,
            &[VersionInfo::new("1", "echo:1"), VersionInfo::new("2", "echo:2")],
        );
        let versions = tools
            .iter()
            .map(|t| t.as_ref().unwrap().version().to_string())
            .collect::<Vec<_>>();
        assert_eq!(versions, vec!["1", "2"]);
    }
}
