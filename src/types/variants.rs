//! Variant call formats.

use std::sync::Arc;

use crate::types::DataType;

pub(super) fn data_types() -> Vec<Arc<dyn DataType>> {
    vec![
        Arc::new(Vcf),
        Arc::new(IndexedVcf),
        Arc::new(CompressedVcf),
        Arc::new(VcfTabix),
        Arc::new(Bcf),
    ]
}

/// An uncompressed Variant Call Format file.
#[derive(Debug)]
pub struct Vcf;

impl DataType for Vcf {
    fn name(&self) -> &'static str {
        "VCF"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".vcf")
    }

    fn doc(&self) -> &'static str {
        "Variant Call Format: https://samtools.github.io/hts-specs/VCFv4.3.pdf"
    }
}

/// A VCF with its GATK/igvtools `.idx` index.
#[derive(Debug)]
pub struct IndexedVcf;

impl DataType for IndexedVcf {
    fn name(&self) -> &'static str {
        "IndexedVCF"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".vcf")
    }

    fn secondary_files(&self) -> &'static [&'static str] {
        &[".idx"]
    }

    fn parents(&self) -> Vec<Arc<dyn DataType>> {
        vec![Arc::new(Vcf)]
    }

    fn doc(&self) -> &'static str {
        "An uncompressed VCF with its .idx index"
    }
}

/// A bgzipped VCF.
#[derive(Debug)]
pub struct CompressedVcf;

impl DataType for CompressedVcf {
    fn name(&self) -> &'static str {
        "CompressedVCF"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".vcf.gz")
    }

    fn inner(&self) -> Option<Arc<dyn DataType>> {
        Some(Arc::new(Vcf))
    }

    fn doc(&self) -> &'static str {
        "A VCF compressed with bgzip"
    }
}

/// A bgzipped VCF with its tabix `.tbi` index.
#[derive(Debug)]
pub struct VcfTabix;

impl DataType for VcfTabix {
    fn name(&self) -> &'static str {
        "CompressedIndexedVCF"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".vcf.gz")
    }

    fn secondary_files(&self) -> &'static [&'static str] {
        &[".tbi"]
    }

    fn inner(&self) -> Option<Arc<dyn DataType>> {
        Some(Arc::new(Vcf))
    }

    fn parents(&self) -> Vec<Arc<dyn DataType>> {
        vec![Arc::new(CompressedVcf)]
    }

    fn doc(&self) -> &'static str {
        "A bgzipped VCF with its tabix index (.tbi)"
    }
}

/// The binary counterpart of VCF.
#[derive(Debug)]
pub struct Bcf;

impl DataType for Bcf {
    fn name(&self) -> &'static str {
        "BCF"
    }

    fn extension(&self) -> Option<&'static str> {
        Some(".bcf")
    }

    fn doc(&self) -> &'static str {
        "Binary variant call format"
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::path::PathBuf;

    use super::*;

    #[test]
    pub fn it_finds_the_tabix_index() {
        let paths = VcfTabix
            .secondary_file_paths(Path::new("calls.vcf.gz"))
            .unwrap();
        assert_eq!(paths, vec![PathBuf::from("calls.vcf.gz.tbi")]);
    }

    #[test]
    pub fn it_treats_an_indexed_compressed_vcf_as_compressed_but_not_plain() {
        assert!(VcfTabix.is_a(&CompressedVcf));
        assert!(!VcfTabix.is_a(&Vcf));
        assert_eq!(VcfTabix.inner().unwrap().name(), "VCF");
    }
}
