//! Data types that tool inputs and outputs are declared with.
//!
//! # Overview
//!
//! There are two layers here:
//!
//! * A [`DataType`] describes a pre-existing bioinformatics file format (BAM,
//!   VCF, FASTQ, ...): its name, its extension(s), the secondary files that
//!   travel with it, the format it wraps (a gzipped VCF wraps a VCF) and the
//!   format it refines (an indexed BAM is still a BAM).
//! * A [`Type`] is the type of a single tool parameter: a primitive, a file of
//!   some [`DataType`], an array, an optional, and so on.
//!
//! All of the data types known to `biowrap` are returned by
//! [`get_all_data_types`]; these are what the discovery pass registers in the
//! type registry.

pub mod alignment;
pub mod annotation;
pub mod reports;
pub mod sequence;
pub mod variants;

use std::fmt;
use std::fmt::Debug;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;

use crate::utils::pathbuf::secondary_file_path;

//=================//
// Utility methods //
//=================//

/// Gets all of the data types defined in `biowrap`. When a new data type is
/// added, this needs to be updated.
pub fn get_all_data_types() -> Vec<Arc<dyn DataType>> {
    let mut types: Vec<Arc<dyn DataType>> = Vec::new();
    types.extend(alignment::data_types());
    types.extend(sequence::data_types());
    types.extend(variants::data_types());
    types.extend(annotation::data_types());
    types.extend(reports::data_types());
    types
}

/// Utility method to map a string (generally passed on the command line) to a
/// data type, ignoring case.
pub fn get_data_type(s: &str) -> Option<Arc<dyn DataType>> {
    get_all_data_types()
        .into_iter()
        .find(|t| s.eq_ignore_ascii_case(t.name()))
}

//============//
// Data types //
//============//

/// A struct is a [`DataType`] if it represents a file format that tool inputs
/// and outputs can be declared with.
pub trait DataType: Debug + Send + Sync {
    /// Name of the data type. Must be unique within the type registry.
    fn name(&self) -> &'static str;

    /// The conventional extension for files of this type, including the
    /// leading dot.
    fn extension(&self) -> Option<&'static str> {
        None
    }

    /// Other extensions that files of this type are commonly found with.
    fn alternate_extensions(&self) -> &'static [&'static str] {
        &[]
    }

    /// Secondary file patterns (see [`crate::utils::pathbuf`]) for the
    /// companion files that must accompany a file of this type.
    fn secondary_files(&self) -> &'static [&'static str] {
        &[]
    }

    /// If this type is a container around another format (compression,
    /// archive), the type being wrapped.
    fn inner(&self) -> Option<Arc<dyn DataType>> {
        None
    }

    /// If this type is a refinement of other types (usually by adding
    /// secondary files), the types it refines.
    fn parents(&self) -> Vec<Arc<dyn DataType>> {
        Vec::new()
    }

    /// A human-readable description of the type.
    fn doc(&self) -> &'static str;

    /// Whether this type is `other` or refines `other` (transitively).
    fn is_a(&self, other: &dyn DataType) -> bool {
        if self.name() == other.name() {
            return true;
        }

        self.parents().iter().any(|parent| parent.is_a(other))
    }

    /// Resolves the paths of all secondary files for the primary file at
    /// `path`.
    fn secondary_file_paths(&self, path: &Path) -> anyhow::Result<Vec<PathBuf>> {
        self.secondary_files()
            .iter()
            .map(|pattern| secondary_file_path(path, pattern))
            .collect()
    }
}

//=================//
// Parameter types //
//=================//

/// An output filename whose default is generated from another input.
#[derive(Clone, Debug, Default)]
pub struct Filename {
    /// The tag of the input whose file stem prefixes the generated name.
    pub prefix: Option<String>,

    /// A suffix placed between the prefix and the extension.
    pub suffix: Option<String>,

    /// The extension of the generated name, including the leading dot.
    pub extension: Option<String>,
}

impl Filename {
    /// Creates a new [`Filename`] with the given extension.
    pub fn with_extension(extension: impl Into<String>) -> Self {
        Self {
            extension: Some(extension.into()),
            ..Default::default()
        }
    }

    /// Sets the input the generated name is prefixed with.
    pub fn prefix(mut self, input: impl Into<String>) -> Self {
        self.prefix = Some(input.into());
        self
    }

    /// Sets the suffix of the generated name.
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Generates a filename from the (optional) value of the prefix input.
    pub fn generate(&self, prefix_value: Option<&str>) -> String {
        let stem = prefix_value
            .and_then(|value| {
                let name = Path::new(value).file_name()?.to_str()?;
                // Strip every extension so that `x.vcf.gz` yields `x`.
                Some(name.split('.').next().unwrap_or(name).to_string())
            })
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| String::from("generated"));

        format!(
            "{}{}{}",
            stem,
            self.suffix.as_deref().unwrap_or(""),
            self.extension.as_deref().unwrap_or("")
        )
    }
}

/// The type of a tool input, tool output or workflow input.
#[derive(Clone, Debug)]
pub enum Type {
    /// A string.
    String,

    /// An integer.
    Int,

    /// A floating point number.
    Float,

    /// A boolean flag.
    Boolean,

    /// A directory.
    Directory,

    /// A file of the given data type.
    File(Arc<dyn DataType>),

    /// An array of values of the inner type.
    Array(Box<Type>),

    /// An output filename with a generated default.
    Filename(Filename),

    /// An output captured from standard out, holding the given data type.
    Stdout(Arc<dyn DataType>),

    /// A value that may be omitted.
    Optional(Box<Type>),
}

impl Type {
    /// Creates a file type from the given data type.
    pub fn file<T>(data_type: T) -> Self
    where
        T: DataType + 'static,
    {
        Type::File(Arc::new(data_type))
    }

    /// Creates a standard out type from the given data type.
    pub fn stdout<T>(data_type: T) -> Self
    where
        T: DataType + 'static,
    {
        Type::Stdout(Arc::new(data_type))
    }

    /// Wraps the current type in an array.
    pub fn array(self) -> Self {
        Type::Array(Box::new(self))
    }

    /// Wraps the current type in an optional. Already optional types are
    /// returned as-is.
    pub fn optional(self) -> Self {
        match self {
            Type::Optional(_) => self,
            other => Type::Optional(Box::new(other)),
        }
    }

    /// Whether a value of this type may be omitted.
    pub fn is_optional(&self) -> bool {
        matches!(self, Type::Optional(_))
    }

    /// The type without any optional wrapper.
    pub fn non_optional(&self) -> &Type {
        match self {
            Type::Optional(inner) => inner.non_optional(),
            other => other,
        }
    }

    /// If this type (or its array element type) holds files, the data type.
    pub fn data_type(&self) -> Option<&Arc<dyn DataType>> {
        match self.non_optional() {
            Type::File(t) | Type::Stdout(t) => Some(t),
            Type::Array(inner) => inner.data_type(),
            _ => None,
        }
    }

    /// Whether a value of type `source` can be connected to a parameter of
    /// this type.
    pub fn receives(&self, source: &Type) -> bool {
        match (self, source) {
            (Type::Optional(target), Type::Optional(source)) => target.receives(source),
            (Type::Optional(target), source) => target.receives(source),
            (_, Type::Optional(_)) => false,
            (Type::File(target), Type::File(source) | Type::Stdout(source)) => {
                source.is_a(target.as_ref())
            }
            (Type::File(_), Type::Filename(_)) => true,
            (Type::String | Type::Filename(_), Type::String | Type::Filename(_)) => true,
            (Type::Float, Type::Float | Type::Int) => true,
            (Type::Int, Type::Int) => true,
            (Type::Boolean, Type::Boolean) => true,
            (Type::Directory, Type::Directory) => true,
            (Type::Array(target), Type::Array(source)) => target.receives(source),
            _ => false,
        }
    }

    /// Whether `value` is an acceptable JSON value for this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Type::Optional(_), Value::Null) => true,
            (Type::Optional(inner), value) => inner.accepts(value),
            (Type::Int, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (Type::Float, Value::Number(_)) => true,
            (Type::Boolean, Value::Bool(_)) => true,
            (
                Type::String
                | Type::Directory
                | Type::File(_)
                | Type::Filename(_)
                | Type::Stdout(_),
                Value::String(_),
            ) => true,
            (Type::Array(inner), Value::Array(values)) => values.iter().all(|v| inner.accepts(v)),
            _ => false,
        }
    }

    /// Parses a raw string (generally passed on the command line) into a JSON
    /// value for this type. Arrays are given as comma-separated values.
    pub fn parse_value(&self, raw: &str) -> anyhow::Result<Value> {
        let value = match self.non_optional() {
            Type::Int => Value::from(
                raw.parse::<i64>()
                    .map_err(|_| anyhow::anyhow!("{} isn't an integer", raw))?,
            ),
            Type::Float => Value::from(
                raw.parse::<f64>()
                    .map_err(|_| anyhow::anyhow!("{} isn't a float", raw))?,
            ),
            Type::Boolean => Value::from(
                raw.parse::<bool>()
                    .map_err(|_| anyhow::anyhow!("{} isn't a boolean", raw))?,
            ),
            Type::Array(inner) => Value::Array(
                raw.split(',')
                    .map(|element| inner.parse_value(element))
                    .collect::<anyhow::Result<Vec<_>>>()?,
            ),
            _ => Value::from(raw),
        };

        Ok(value)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "String"),
            Self::Int => write!(f, "Int"),
            Self::Float => write!(f, "Float"),
            Self::Boolean => write!(f, "Boolean"),
            Self::Directory => write!(f, "Directory"),
            Self::File(t) => write!(f, "{}", t.name()),
            Self::Array(inner) => write!(f, "Array<{}>", inner),
            Self::Filename(_) => write!(f, "Filename"),
            Self::Stdout(t) => write!(f, "Stdout<{}>", t.name()),
            Self::Optional(inner) => write!(f, "Optional<{}>", inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::alignment::{Bam, BamBai, Sam};
    use super::variants::{CompressedVcf, Vcf};
    use super::*;

    #[test]
    fn it_has_unique_data_type_names() {
        let mut names = get_all_data_types()
            .iter()
            .map(|t| t.name())
            .collect::<Vec<_>>();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn it_finds_data_types_case_insensitively() {
        assert_eq!(get_data_type("bambai").unwrap().name(), "BamBai");
        assert!(get_data_type("NotAType").is_none());
    }

    #[test]
    fn it_follows_the_parent_types() {
        assert!(BamBai.is_a(&Bam));
        assert!(!Bam.is_a(&BamBai));
        assert!(!Sam.is_a(&Bam));
    }

    #[test]
    fn it_wraps_the_inner_type() {
        assert_eq!(CompressedVcf.inner().unwrap().name(), Vcf.name());
    }

    #[test]
    fn it_resolves_secondary_file_paths() {
        let paths = BamBai
            .secondary_file_paths(Path::new("/data/sample.bam"))
            .unwrap();
        assert_eq!(paths, vec![PathBuf::from("/data/sample.bam.bai")]);
    }

    #[test]
    fn it_displays_nested_types() {
        let t = Type::file(Bam).array().optional();
        assert_eq!(t.to_string(), "Optional<Array<BAM>>");
        assert_eq!(t.optional().to_string(), "Optional<Array<BAM>>");
    }

    #[test]
    fn it_receives_refined_files_but_not_the_reverse() {
        assert!(Type::file(Bam).receives(&Type::file(BamBai)));
        assert!(!Type::file(BamBai).receives(&Type::file(Bam)));
        assert!(Type::file(Bam).optional().receives(&Type::file(BamBai)));
        assert!(!Type::file(Bam).receives(&Type::file(Bam).optional()));
        assert!(Type::Float.receives(&Type::Int));
        assert!(!Type::Int.receives(&Type::Float));
    }

    #[test]
    fn it_accepts_matching_json_values() {
        assert!(Type::Int.accepts(&json!(3)));
        assert!(!Type::Int.accepts(&json!(3.5)));
        assert!(Type::Int.optional().accepts(&Value::Null));
        assert!(!Type::Int.accepts(&Value::Null));
        assert!(Type::String.array().accepts(&json!(["a", "b"])));
        assert!(!Type::String.array().accepts(&json!(["a", 1])));
    }

    #[test]
    fn it_parses_raw_values() {
        assert_eq!(Type::Int.parse_value("12").unwrap(), json!(12));
        assert_eq!(
            Type::Int.array().parse_value("1,2").unwrap(),
            json!([1, 2])
        );
        assert_eq!(Type::Boolean.parse_value("true").unwrap(), json!(true));
        assert!(Type::Float.parse_value("abc").is_err());
    }

    #[test]
    fn it_generates_filenames_from_the_prefix_input() {
        let filename = Filename::with_extension(".bam")
            .prefix("reads")
            .suffix(".sorted");
        assert_eq!(
            filename.generate(Some("/data/sample.vcf.gz")),
            "sample.sorted.bam"
        );
        assert_eq!(filename.generate(None), "generated.sorted.bam");
    }
}
