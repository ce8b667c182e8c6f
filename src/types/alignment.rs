//! Sequence alignment formats: SAM, BAM and CRAM, with and without their
//! indices.

use std::sync::Arc;

use crate::types::DataType;

pub(super) fn data_types() -> Vec<Arc<dyn DataType>> {
    vec![
        Arc::new(Sam),
        Arc::new(Bam),
        Arc::new(BamBai),
        Arc::new(Cram),
        Arc::new(CramCrai),
    ]
}

/// A Sequence Alignment/Map file.
#[derive(Debug)]
pub struct Sam;

impl DataType for Sam {
    fn name(&self) -> &'static str {
        "SAM"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".sam")
    }

    fn doc(&self) -> &'static str {
        "Tab-delimited text file that contains sequence alignment data"
    }
}

/// A Binary Alignment Map file: the BGZF-compressed binary form of a SAM.
#[derive(Debug)]
pub struct Bam;

impl DataType for Bam {
    fn name(&self) -> &'static str {
        "BAM"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".bam")
    }

    fn doc(&self) -> &'static str {
        "A binary version of a SAM file, https://samtools.github.io/hts-specs/SAMv1.pdf"
    }
}

/// A coordinate sorted BAM with its `.bai` index alongside.
#[derive(Debug)]
pub struct BamBai;

impl DataType for BamBai {
    fn name(&self) -> &'static str {
        "BamBai"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".bam")
    }

    fn secondary_files(&self) -> &'static [&'static str] {
        &[".bai"]
    }

    fn parents(&self) -> Vec<Arc<dyn DataType>> {
        vec![Arc::new(Bam)]
    }

    fn doc(&self) -> &'static str {
        "A Binary Alignment Map (BAM) file and its appropriate index (.bai)"
    }
}

/// A reference-compressed alignment file. CRAM files are only readable in
/// combination with the reference they were compressed against.
#[derive(Debug)]
pub struct Cram;

impl DataType for Cram {
    fn name(&self) -> &'static str {
        "CRAM"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".cram")
    }

    fn doc(&self) -> &'static str {
        "A binary version of a SAM file, compressed against a reference (see FastaWithDict)"
    }
}

/// A CRAM with its `.crai` index alongside.
#[derive(Debug)]
pub struct CramCrai;

impl DataType for CramCrai {
    fn name(&self) -> &'static str {
        "CramCrai"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".cram")
    }

    fn secondary_files(&self) -> &'static [&'static str] {
        &[".crai"]
    }

    fn parents(&self) -> Vec<Arc<dyn DataType>> {
        vec![Arc::new(Cram)]
    }

    fn doc(&self) -> &'static str {
        "A CRAM file and its appropriate index (.crai)"
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::path::PathBuf;

    use super::*;
    use crate::types::sequence::FastaWithDict;

    #[test]
    pub fn it_resolves_the_crai_next_to_the_cram() {
        let paths = CramCrai
            .secondary_file_paths(Path::new("sample.cram"))
            .unwrap();
        assert_eq!(paths, vec![PathBuf::from("sample.cram.crai")]);
    }

    #[test]
    pub fn it_does_not_treat_a_cram_as_a_fasta() {
        assert!(!CramCrai.is_a(&FastaWithDict));
        assert!(CramCrai.is_a(&Cram));
    }
}
