//! Sequence formats: reference FASTA files (with their many indices) and raw
//! reads in FASTQ.

use std::sync::Arc;

use crate::types::DataType;

pub(super) fn data_types() -> Vec<Arc<dyn DataType>> {
    vec![
        Arc::new(Fasta),
        Arc::new(FastaFai),
        Arc::new(FastaWithDict),
        Arc::new(FastaBwa),
        Arc::new(FastaWithIndexes),
        Arc::new(SequenceDictionary),
        Arc::new(Fastq),
        Arc::new(FastqGz),
    ]
}

/// The extensions BWA writes when indexing a reference.
const BWA_INDEX_EXTENSIONS: &[&str] = &[".amb", ".ann", ".bwt", ".pac", ".sa"];

//=======//
// FASTA //
//=======//

/// A plain FASTA file.
#[derive(Debug)]
pub struct Fasta;

impl DataType for Fasta {
    fn name(&self) -> &'static str {
        "Fasta"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".fasta")
    }

    fn alternate_extensions(&self) -> &'static [&'static str] {
        &[".fa", ".fna", ".fas"]
    }

    fn doc(&self) -> &'static str {
        "Text-based format for representing nucleotide or peptide sequences"
    }
}

/// A FASTA with its samtools `.fai` index.
#[derive(Debug)]
pub struct FastaFai;

impl DataType for FastaFai {
    fn name(&self) -> &'static str {
        "FastaFai"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".fasta")
    }

    fn secondary_files(&self) -> &'static [&'static str] {
        &[".fai"]
    }

    fn parents(&self) -> Vec<Arc<dyn DataType>> {
        vec![Arc::new(Fasta)]
    }

    fn doc(&self) -> &'static str {
        "A FASTA file with its samtools faidx index (.fai)"
    }
}

/// A FASTA with its `.fai` index and `.dict` sequence dictionary, as GATK
/// requires of references.
#[derive(Debug)]
pub struct FastaWithDict;

impl DataType for FastaWithDict {
    fn name(&self) -> &'static str {
        "FastaWithDict"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".fasta")
    }

    fn secondary_files(&self) -> &'static [&'static str] {
        &[".fai", "^.dict"]
    }

    fn parents(&self) -> Vec<Arc<dyn DataType>> {
        vec![Arc::new(FastaFai)]
    }

    fn doc(&self) -> &'static str {
        "A FASTA file with its .fai index and .dict sequence dictionary"
    }
}

/// A FASTA indexed by `bwa index`.
#[derive(Debug)]
pub struct FastaBwa;

impl DataType for FastaBwa {
    fn name(&self) -> &'static str {
        "FastaBwa"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".fasta")
    }

    fn secondary_files(&self) -> &'static [&'static str] {
        BWA_INDEX_EXTENSIONS
    }

    fn parents(&self) -> Vec<Arc<dyn DataType>> {
        vec![Arc::new(Fasta)]
    }

    fn doc(&self) -> &'static str {
        "A FASTA file with the index files produced by bwa index"
    }
}

/// A FASTA carrying every index any tool in the catalog asks for.
#[derive(Debug)]
pub struct FastaWithIndexes;

impl DataType for FastaWithIndexes {
    fn name(&self) -> &'static str {
        "FastaWithIndexes"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".fasta")
    }

    fn secondary_files(&self) -> &'static [&'static str] {
        &[
            ".fai", "^.dict", ".amb", ".ann", ".bwt", ".pac", ".sa",
        ]
    }

    fn parents(&self) -> Vec<Arc<dyn DataType>> {
        vec![Arc::new(FastaWithDict), Arc::new(FastaBwa)]
    }

    fn doc(&self) -> &'static str {
        "A FASTA file with the .fai, .dict and bwa index files"
    }
}

/// A sequence dictionary as produced by `CreateSequenceDictionary`: a SAM
/// header holding one `@SQ` line per contig.
#[derive(Debug)]
pub struct SequenceDictionary;

impl DataType for SequenceDictionary {
    fn name(&self) -> &'static str {
        "SequenceDictionary"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".dict")
    }

    fn doc(&self) -> &'static str {
        "A SAM header listing the name and length of each contig of a reference"
    }
}

//=======//
// FASTQ //
//=======//

/// Raw reads in FASTQ.
#[derive(Debug)]
pub struct Fastq;

impl DataType for Fastq {
    fn name(&self) -> &'static str {
        "Fastq"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".fastq")
    }

    fn alternate_extensions(&self) -> &'static [&'static str] {
        &[".fq"]
    }

    fn doc(&self) -> &'static str {
        "FASTQ files are text files containing sequence data with quality score, \
        there are different types with no standard: \
        https://www.drive5.com/usearch/manual/fastq_files.html"
    }
}

/// Gzip-compressed FASTQ.
#[derive(Debug)]
pub struct FastqGz;

impl DataType for FastqGz {
    fn name(&self) -> &'static str {
        "FastqGz"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".fastq.gz")
    }

    fn alternate_extensions(&self) -> &'static [&'static str] {
        &[".fq.gz"]
    }

    fn inner(&self) -> Option<Arc<dyn DataType>> {
        Some(Arc::new(Fastq))
    }

    fn doc(&self) -> &'static str {
        "A gzipped FASTQ file"
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::path::PathBuf;

    use super::*;

    #[test]
    pub fn it_resolves_the_dict_by_replacing_the_extension() {
        let paths = FastaWithDict
            .secondary_file_paths(Path::new("/ref/hg38.fasta"))
            .unwrap();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/ref/hg38.fasta.fai"),
                PathBuf::from("/ref/hg38.dict")
            ]
        );
    }

    #[test]
    pub fn it_treats_the_fully_indexed_reference_as_every_other_reference() {
        assert!(FastaWithIndexes.is_a(&FastaBwa));
        assert!(FastaWithIndexes.is_a(&FastaWithDict));
        assert!(FastaWithIndexes.is_a(&Fasta));
        assert!(!FastaBwa.is_a(&FastaFai));
    }

    #[test]
    pub fn it_lists_every_bwa_index() {
        assert_eq!(FastaBwa.secondary_files().len(), 5);
        assert_eq!(FastaWithIndexes.secondary_files().len(), 7);
    }
}
