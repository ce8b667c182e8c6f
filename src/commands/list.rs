//! Functionality related to the `biowrap list` command.

use anyhow::bail;
use clap::{builder::PossibleValuesParser, Args};
use itertools::Itertools;
use prettytable::{row, Table};

use crate::registry::Registry;
use crate::tool::{Tool, ToolKind};

//========================//
// Command-line arguments //
//========================//

/// Command line arguments for `biowrap list`.
#[derive(Args)]
pub struct ListArgs {
    /// The subject which you want to list values for.
    #[arg(value_parser = PossibleValuesParser::new(["tools", "types", "workflows"]))]
    subject: String,
}

//========//
// Tables //
//========//

fn tools_table(registry: &Registry) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Name", "Versions", "Provider", "Kind", "Container"]);

    for tool in registry
        .default_tools()
        .filter(|tool| tool.kind() != ToolKind::Workflow)
    {
        table.add_row(row![
            tool.id(),
            registry.versions(tool.id()).iter().join(", "),
            tool.tool_provider().unwrap_or(""),
            tool.kind(),
            tool.container().unwrap_or(""),
        ]);
    }

    table
}

fn types_table(registry: &Registry) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Name", "Extension", "Secondary files", "Description"]);

    for data_type in registry.data_types() {
        table.add_row(row![
            data_type.name(),
            data_type.extension().unwrap_or(""),
            data_type.secondary_files().iter().join(", "),
            data_type.doc(),
        ]);
    }

    table
}

fn workflows_table(registry: &Registry) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Name", "Versions", "Steps", "Description"]);

    for tool in registry
        .default_tools()
        .filter(|tool| tool.kind() == ToolKind::Workflow)
    {
        table.add_row(row![
            tool.id(),
            registry.versions(tool.id()).iter().join(", "),
            tool_steps(tool),
            tool.friendly_name(),
        ]);
    }

    table
}

fn tool_steps(tool: &Tool) -> String {
    match tool {
        Tool::Workflow(workflow) => {
            workflow.steps().iter().map(|step| step.tool.as_str()).join(" -> ")
        }
        _ => String::new(),
    }
}

//==============//
// Main command //
//==============//

/// Main method for the `biowrap list` subcommand.
pub fn list(args: ListArgs, registry: &Registry) -> anyhow::Result<()> {
    let table = match args.subject.as_str() {
        "tools" => tools_table(registry),
        "types" => types_table(registry),
        "workflows" => workflows_table(registry),
        s => bail!("Unsupported subject: {}", s),
    };

    table.printstd();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryConfig;
    use crate::types::get_all_data_types;
    use crate::workflows::get_all_workflows;

    #[test]
    pub fn it_lists_one_row_per_tool_type_and_workflow() {
        let registry = Registry::discover(&RegistryConfig::default()).unwrap();

        let tools = registry
            .default_tools()
            .filter(|tool| tool.kind() != ToolKind::Workflow)
            .count();

        // One extra row for the header.
        assert_eq!(tools_table(&registry).len(), tools + 1);
        assert_eq!(types_table(&registry).len(), get_all_data_types().len() + 1);
        assert_eq!(
            workflows_table(&registry).len(),
            get_all_workflows().len() + 1
        );
    }

    #[test]
    pub fn it_lists_the_steps_of_a_workflow() {
        let registry = Registry::discover(&RegistryConfig::default()).unwrap();
        let aligner = registry.tool("BwaAligner", None).unwrap();

        assert_eq!(
            tool_steps(aligner),
            "CutAdapt -> BwaMemLatest -> SamToolsView -> Gatk4SortSam"
        );
    }
}
