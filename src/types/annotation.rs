//! Genomic interval and annotation formats.

use std::sync::Arc;

use crate::types::DataType;

pub(super) fn data_types() -> Vec<Arc<dyn DataType>> {
    vec![Arc::new(Bed), Arc::new(BedGz), Arc::new(BedTabix), Arc::new(Gtf)]
}

/// A Browser Extensible Data file of genomic intervals.
#[derive(Debug)]
pub struct Bed;

impl DataType for Bed {
    fn name(&self) -> &'static str {
        "bed"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".bed")
    }

    fn doc(&self) -> &'static str {
        "A local file containing genomic intervals (contig, start, end, name)"
    }
}

/// A bgzipped BED.
#[derive(Debug)]
pub struct BedGz;

impl DataType for BedGz {
    fn name(&self) -> &'static str {
        "BedGz"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".bed.gz")
    }

    fn inner(&self) -> Option<Arc<dyn DataType>> {
        Some(Arc::new(Bed))
    }

    fn doc(&self) -> &'static str {
        "A BED file compressed with bgzip"
    }
}

/// A bgzipped BED with its tabix index.
#[derive(Debug)]
pub struct BedTabix;

impl DataType for BedTabix {
    fn name(&self) -> &'static str {
        "BedTABIX"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".bed.gz")
    }

    fn secondary_files(&self) -> &'static [&'static str] {
        &[".tbi"]
    }

    fn inner(&self) -> Option<Arc<dyn DataType>> {
        Some(Arc::new(Bed))
    }

    fn parents(&self) -> Vec<Arc<dyn DataType>> {
        vec![Arc::new(BedGz)]
    }

    fn doc(&self) -> &'static str {
        "A bgzipped BED file with its tabix index (.tbi)"
    }
}

/// A Gene Transfer Format annotation.
#[derive(Debug)]
pub struct Gtf;

impl DataType for Gtf {
    fn name(&self) -> &'static str {
        "gtf"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".gtf")
    }

    fn doc(&self) -> &'static str {
        "Gene transfer format: https://www.ensembl.org/info/website/upload/gff.html"
    }
}
