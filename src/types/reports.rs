//! General-purpose files: plain text, tables and the reports tools write.

use std::sync::Arc;

use crate::types::DataType;

pub(super) fn data_types() -> Vec<Arc<dyn DataType>> {
    vec![
        Arc::new(TextFile),
        Arc::new(Tsv),
        Arc::new(Csv),
        Arc::new(HtmlFile),
        Arc::new(ZipFile),
        Arc::new(GenericFile),
    ]
}

/// A file of any format.
#[derive(Debug)]
pub struct GenericFile;

impl DataType for GenericFile {
    fn name(&self) -> &'static str {
        "File"
    }

    fn doc(&self) -> &'static str {
        "A local file of unspecified format"
    }
}

/// A plain text file.
#[derive(Debug)]
pub struct TextFile;

impl DataType for TextFile {
    fn name(&self) -> &'static str {
        "TextFile"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".txt")
    }

    fn parents(&self) -> Vec<Arc<dyn DataType>> {
        vec![Arc::new(GenericFile)]
    }

    fn doc(&self) -> &'static str {
        "A plain text file"
    }
}

/// A tab separated table.
#[derive(Debug)]
pub struct Tsv;

impl DataType for Tsv {
    fn name(&self) -> &'static str {
        "tsv"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".tsv")
    }

    fn parents(&self) -> Vec<Arc<dyn DataType>> {
        vec![Arc::new(TextFile)]
    }

    fn doc(&self) -> &'static str {
        "A tab separated file"
    }
}

/// A comma separated table.
#[derive(Debug)]
pub struct Csv;

impl DataType for Csv {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".csv")
    }

    fn parents(&self) -> Vec<Arc<dyn DataType>> {
        vec![Arc::new(TextFile)]
    }

    fn doc(&self) -> &'static str {
        "A comma separated file"
    }
}

/// An HTML report.
#[derive(Debug)]
pub struct HtmlFile;

impl DataType for HtmlFile {
    fn name(&self) -> &'static str {
        "HtmlFile"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".html")
    }

    fn parents(&self) -> Vec<Arc<dyn DataType>> {
        vec![Arc::new(GenericFile)]
    }

    fn doc(&self) -> &'static str {
        "An HTML report"
    }
}

/// A zip archive.
#[derive(Debug)]
pub struct ZipFile;

impl DataType for ZipFile {
    fn name(&self) -> &'static str {
        "Zip"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".zip")
    }

    fn parents(&self) -> Vec<Arc<dyn DataType>> {
        vec![Arc::new(GenericFile)]
    }

    fn doc(&self) -> &'static str {
        "A zip archive, ending with .zip"
    }
}
