//! Utilities related to the parsing of arguments.

use anyhow::bail;
use clap::Args;
use serde_json::Value;
use tracing::debug;

use crate::registry::DuplicatePolicy;
use crate::registry::ErrorPolicy;
use crate::registry::RegistryConfig;
use crate::tool::InputValues;
use crate::tool::Tool;

//=======================//
// Registration Policies //
//=======================//

/// Command line arguments that control how the registry is populated. These
/// are accepted by every subcommand.
#[derive(Args, Clone, Debug, Default)]
pub struct RegistryArgs {
    /// What to do with a definition that cannot be built or registered.
    #[arg(long, value_enum, global = true, default_value_t = ErrorPolicy::Skip)]
    pub on_error: ErrorPolicy,

    /// What to do with a definition registered under a name that is taken.
    #[arg(long, value_enum, global = true, default_value_t = DuplicatePolicy::Reject)]
    pub on_duplicate: DuplicatePolicy,

    /// Leave a provider out of the registry. Can be repeated.
    #[arg(long = "ignore-provider", value_name = "NAME", global = true)]
    pub ignore_providers: Vec<String>,
}

impl From<RegistryArgs> for RegistryConfig {
    fn from(args: RegistryArgs) -> Self {
        debug!(
            "Registering with errors = {}, duplicates = {}.",
            args.on_error, args.on_duplicate
        );

        RegistryConfig {
            errors: args.on_error,
            duplicates: args.on_duplicate,
            ignore: args.ignore_providers,
        }
    }
}

//==============//
// Input values //
//==============//

/// Splits a `tag=value` input given on the command line.
pub fn parse_input_pair(s: &str) -> anyhow::Result<(String, String)> {
    match s.split_once('=') {
        Some((tag, value)) if !tag.is_empty() => Ok((tag.to_string(), value.to_string())),
        _ => bail!("inputs must be given as tag=value, got {}", s),
    }
}

/// Converts `tag=value` pairs into input values for `tool`, parsing each
/// value according to the type of the input. An array input given more than
/// once collects every value.
pub fn input_values(tool: &Tool, pairs: Vec<(String, String)>) -> anyhow::Result<InputValues> {
    let parameters = tool.input_parameters();
    let mut values = InputValues::new();

    for (tag, raw) in pairs {
        let parameter = match parameters.iter().find(|p| p.tag == tag) {
            Some(parameter) => parameter,
            None => bail!("{} has no input named {}", tool.id(), tag),
        };

        let value = parameter.parameter_type.parse_value(&raw)?;
        match values.get_mut(&tag) {
            Some(Value::Array(existing)) => match value {
                Value::Array(more) => existing.extend(more),
                _ => bail!("input {} was given more than once", tag),
            },
            Some(_) => bail!("input {} was given more than once", tag),
            None => {
                values.insert(tag, value);
            }
        }
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::tools::cutadapt;

    fn cutadapt() -> Tool {
        cutadapt::definitions().remove(0).unwrap()
    }

    #[test]
    pub fn it_splits_input_pairs() {
        assert_eq!(
            parse_input_pair("fastq=a.fastq.gz,b.fastq.gz").unwrap(),
            (String::from("fastq"), String::from("a.fastq.gz,b.fastq.gz"))
        );
        assert_eq!(
            parse_input_pair("front=").unwrap(),
            (String::from("front"), String::new())
        );
        assert!(parse_input_pair("fastq").is_err());
        assert!(parse_input_pair("=value").is_err());
    }

    #[test]
    pub fn it_parses_values_by_input_type() {
        let values = input_values(
            &cutadapt(),
            vec![
                (String::from("fastq"), String::from("a.fastq.gz,b.fastq.gz")),
                (String::from("qualityCutoff"), String::from("15")),
                (String::from("adapter"), String::from("AGATCGGAAGAGC")),
                (String::from("adapter"), String::from("CTGTCTCTTATA")),
            ],
        )
        .unwrap();

        assert_eq!(values["fastq"], json!(["a.fastq.gz", "b.fastq.gz"]));
        assert_eq!(values["qualityCutoff"], json!(15));
        assert_eq!(values["adapter"], json!(["AGATCGGAAGAGC", "CTGTCTCTTATA"]));
    }

    #[test]
    pub fn it_rejects_unknown_and_repeated_inputs() {
        let tool = cutadapt();

        let err = input_values(&tool, vec![(String::from("nope"), String::from("1"))]).unwrap_err();
        assert_eq!(err.to_string(), "CutAdapt has no input named nope");

        assert!(input_values(
            &tool,
            vec![
                (String::from("qualityCutoff"), String::from("15")),
                (String::from("qualityCutoff"), String::from("20")),
            ],
        )
        .is_err());

        assert!(input_values(&tool, vec![(String::from("qualityCutoff"), String::from("high"))]).is_err());
    }

    #[test]
    pub fn it_converts_into_a_registry_config() {
        let config = RegistryConfig::from(RegistryArgs {
            on_error: ErrorPolicy::Fail,
            on_duplicate: DuplicatePolicy::Replace,
            ignore_providers: vec![String::from("gatk3")],
        });

        assert_eq!(config.errors, ErrorPolicy::Fail);
        assert_eq!(config.duplicates, DuplicatePolicy::Replace);
        assert_eq!(config.ignore, vec![String::from("gatk3")]);
    }
}
