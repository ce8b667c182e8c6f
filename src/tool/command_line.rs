//! Rendering the command line a tool definition describes.
//!
//! This is a preview for definition authors (the equivalent of running a
//! definition by hand to eyeball the flags): it never executes anything.

use std::borrow::Cow;
use std::fmt;

use anyhow::bail;
use itertools::Itertools;
use serde_json::Value;

use crate::tool::{InputValues, ToolArgument, ToolInput};
use crate::types::Type;

/// The tokens of a rendered command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLine(Vec<String>);

impl CommandLine {
    /// The individual tokens, unquoted.
    pub fn tokens(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().map(|t| quote(t)).join(" "))
    }
}

/// Single-quotes a token if a shell would otherwise split or expand it.
fn quote(token: &str) -> Cow<'_, str> {
    let safe = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./=:,+@%".contains(c));

    if safe {
        Cow::Borrowed(token)
    } else {
        Cow::Owned(format!("'{}'", token.replace('\'', r"'\''")))
    }
}

/// Fills in defaults and generated filenames, and checks the supplied values
/// against the declared inputs. Optional inputs without a value are left out
/// of the result.
pub fn resolve_values(inputs: &[ToolInput], values: &InputValues) -> anyhow::Result<InputValues> {
    for tag in values.keys() {
        if !inputs.iter().any(|input| &input.tag == tag) {
            bail!("unknown input: {}", tag);
        }
    }

    let supplied = |tag: &str| -> Option<Value> {
        match values.get(tag) {
            Some(Value::Null) | None => None,
            Some(value) => Some(value.clone()),
        }
    };

    let mut resolved = InputValues::new();
    for input in inputs {
        let mut value = supplied(&input.tag).or_else(|| input.default.clone());

        if value.is_none() {
            if let Type::Filename(filename) = input.input_type.non_optional() {
                let prefix = filename.prefix.as_deref().and_then(|tag| {
                    supplied(tag).or_else(|| {
                        inputs
                            .iter()
                            .find(|i| i.tag == tag)
                            .and_then(|i| i.default.clone())
                    })
                });
                let prefix = prefix.as_ref().and_then(|v| v.as_str());
                value = Some(Value::from(filename.generate(prefix)));
            }
        }

        match value {
            Some(value) => {
                if !input.input_type.accepts(&value) {
                    bail!(
                        "input {} expects a value of type {}, got {}",
                        input.tag,
                        input.input_type,
                        value
                    );
                }

                resolved.insert(input.tag.clone(), value);
            }
            None if input.input_type.is_optional() => {}
            None => bail!("missing required input: {}", input.tag),
        }
    }

    Ok(resolved)
}

enum Item<'a> {
    Argument(&'a ToolArgument),
    Input(&'a ToolInput),
}

/// Renders the command line for the given base command, arguments, inputs and
/// values. Arguments and inputs are ordered by position (unset positions count
/// as zero), ties keeping declaration order with arguments first.
pub fn render(
    base_command: &[String],
    arguments: &[ToolArgument],
    inputs: &[ToolInput],
    values: &InputValues,
) -> anyhow::Result<CommandLine> {
    let resolved = resolve_values(inputs, values)?;

    let items = arguments
        .iter()
        .map(|a| (a.position.unwrap_or(0), Item::Argument(a)))
        .chain(
            inputs
                .iter()
                .filter(|i| i.is_bound())
                .map(|i| (i.position.unwrap_or(0), Item::Input(i))),
        )
        // `sorted_by_key` is stable, which keeps declaration order for ties.
        .sorted_by_key(|(position, _)| *position);

    let mut tokens = base_command.to_vec();
    for (_, item) in items {
        match item {
            Item::Argument(argument) => push_prefixed(
                &mut tokens,
                argument.prefix.as_deref(),
                argument.separate_value_from_prefix,
                argument.value.clone(),
            ),
            Item::Input(input) => {
                if let Some(value) = resolved.get(&input.tag) {
                    push_input(&mut tokens, input, value);
                }
            }
        }
    }

    Ok(CommandLine(tokens))
}

fn push_input(tokens: &mut Vec<String>, input: &ToolInput, value: &Value) {
    let prefix = input.prefix.as_deref();
    let separate = input.separate_value_from_prefix;

    match value {
        Value::Bool(true) => {
            if let Some(prefix) = prefix {
                tokens.push(prefix.to_string());
            }
        }
        Value::Bool(false) | Value::Null => {}
        Value::Array(elements) => {
            if elements.is_empty() {
                return;
            }

            let elements = elements.iter().map(scalar).collect::<Vec<_>>();
            if let Some(separator) = &input.separator {
                push_prefixed(tokens, prefix, separate, elements.join(separator));
            } else if input.prefix_applies_to_all_elements {
                for element in elements {
                    push_prefixed(tokens, prefix, separate, element);
                }
            } else {
                if let Some(prefix) = prefix {
                    tokens.push(prefix.to_string());
                }
                tokens.extend(elements);
            }
        }
        value => push_prefixed(tokens, prefix, separate, scalar(value)),
    }
}

fn push_prefixed(tokens: &mut Vec<String>, prefix: Option<&str>, separate: bool, value: String) {
    match prefix {
        Some(prefix) if separate => {
            tokens.push(prefix.to_string());
            tokens.push(value);
        }
        Some(prefix) => tokens.push(format!("{}{}", prefix, value)),
        None => tokens.push(value),
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::alignment::Bam;
    use crate::types::Filename;

    fn values(pairs: Value) -> InputValues {
        serde_json::from_value(pairs).unwrap()
    }

    fn inputs() -> Vec<ToolInput> {
        vec![
            ToolInput::new("bam", Type::file(Bam)).position(10),
            ToolInput::new(
                "outputFilename",
                Type::Filename(Filename::with_extension(".bam").suffix(".sorted").prefix("bam")),
            )
            .prefix("-o"),
            ToolInput::new("threads", Type::Int.optional()).prefix("-@"),
            ToolInput::new("compression", Type::Int.optional())
                .prefix("-l")
                .default(6),
            ToolInput::new("byName", Type::Boolean.optional()).prefix("-n"),
        ]
    }

    #[test]
    fn it_renders_in_position_order_with_defaults() {
        let command = render(
            &["samtools".to_string(), "sort".to_string()],
            &[],
            &inputs(),
            &values(json!({ "bam": "/data/sample.bam", "byName": true })),
        )
        .unwrap();

        assert_eq!(
            command.tokens(),
            &[
                "samtools",
                "sort",
                "-o",
                "sample.sorted.bam",
                "-l",
                "6",
                "-n",
                "/data/sample.bam"
            ]
        );
    }

    #[test]
    fn it_requires_non_optional_inputs() {
        let err = render(&["samtools".to_string()], &[], &inputs(), &InputValues::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "missing required input: bam");
    }

    #[test]
    fn it_refuses_unknown_and_mistyped_inputs() {
        let err = resolve_values(&inputs(), &values(json!({ "bam": "x.bam", "nope": 1 })))
            .unwrap_err();
        assert_eq!(err.to_string(), "unknown input: nope");

        let err = resolve_values(&inputs(), &values(json!({ "bam": "x.bam", "threads": "4" })))
            .unwrap_err();
        assert!(err.to_string().contains("expects a value of type Optional<Int>"));
    }

    #[test]
    fn it_places_arguments_before_inputs_at_the_same_position() {
        let arguments = vec![ToolArgument::new("-b").position(0)];
        let inputs = vec![
            ToolInput::new("region", Type::String.optional()).position(0),
            ToolInput::new("level", Type::Int).prefix("--level=").joined(),
        ];
        let command = render(
            &["tool".to_string()],
            &arguments,
            &inputs,
            &values(json!({ "region": "chr1", "level": 3 })),
        )
        .unwrap();

        assert_eq!(command.tokens(), &["tool", "-b", "chr1", "--level=3"]);
    }

    #[test]
    fn it_renders_arrays() {
        let inputs = vec![
            ToolInput::new("each", Type::String.array()).prefix("-I").prefix_each(),
            ToolInput::new("joined", Type::String.array())
                .prefix("--contigs")
                .separator(",")
                .position(1),
            ToolInput::new("spread", Type::Int.array()).prefix("-x").position(2),
            ToolInput::new("empty", Type::Int.array().optional())
                .prefix("-e")
                .position(3),
        ];
        let command = render(
            &["tool".to_string()],
            &[],
            &inputs,
            &values(json!({
                "each": ["a.bam", "b.bam"],
                "joined": ["chr1", "chr2"],
                "spread": [1, 2],
                "empty": []
            })),
        )
        .unwrap();

        assert_eq!(
            command.tokens(),
            &[
                "tool", "-I", "a.bam", "-I", "b.bam", "--contigs", "chr1,chr2", "-x", "1", "2"
            ]
        );
    }

    #[test]
    fn it_leaves_unbound_inputs_off_the_command_line() {
        let inputs = vec![ToolInput::new("reference", Type::String)];
        let command = render(
            &["tool".to_string()],
            &[],
            &inputs,
            &values(json!({ "reference": "ref.fasta" })),
        )
        .unwrap();
        assert_eq!(command.tokens(), &["tool"]);
    }

    #[test]
    fn it_quotes_tokens_with_shell_metacharacters() {
        let command = CommandLine(vec![
            "bcftools".to_string(),
            "-i".to_string(),
            "QUAL > 30".to_string(),
            "it's".to_string(),
        ]);
        assert_eq!(command.to_string(), r"bcftools -i 'QUAL > 30' 'it'\''s'");
    }
}
