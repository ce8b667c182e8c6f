//! Picking adapter sequences to trim out of FastQC's overrepresented
//! sequences.
//!
//! FastQC attributes each overrepresented sequence to a "possible source",
//! usually the name of a known adapter or primer. Given a lookup of adapter
//! names to sequences (the contaminant list format: a name, one or more tabs,
//! a sequence), the adapters to hand to cutadapt are those whose names FastQC
//! reported.

use std::fs;
use std::path::Path;

use anyhow::Context;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use tracing::debug;
use tracing::info;

lazy_static! {
    /// The alignment summary FastQC appends to each source, e.g.
    /// `(100% over 50bp)`.
    static ref MATCH_SUMMARY: Regex = Regex::new(r"\s*\(\d+(\.\d+)?% over \d+bp\)\s*$").unwrap();
}

const OVERREPRESENTED_MODULE: &str = ">>Overrepresented sequences";
const END_MODULE: &str = ">>END_MODULE";
const NO_HIT: &str = "No Hit";

/// A row of FastQC's overrepresented sequences table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OverrepresentedSequence {
    /// The overrepresented sequence.
    pub sequence: String,

    /// How many reads held the sequence.
    pub count: u64,

    /// The percentage of all reads holding the sequence.
    pub percentage: f64,

    /// The possible source, with FastQC's match summary stripped.
    pub source: String,
}

/// Parses the overrepresented sequences table out of the contents of a
/// `fastqc_data.txt`. A module that passed (and so holds no table) or a
/// missing module yields no rows.
pub fn parse_overrepresented_sequences(contents: &str) -> Vec<OverrepresentedSequence> {
    let mut rows = Vec::new();
    let mut in_module = false;

    for line in contents.lines() {
        if line.starts_with(OVERREPRESENTED_MODULE) {
            in_module = true;
            continue;
        }

        if !in_module {
            continue;
        }

        if line.starts_with(END_MODULE) {
            break;
        }

        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }

        let fields = line.split('\t').collect::<Vec<_>>();
        if fields.len() < 4 {
            debug!("skipping malformed overrepresented sequence row: {}", line);
            continue;
        }

        let (count, percentage) = match (
            fields[1].trim().parse::<u64>(),
            fields[2].trim().parse::<f64>(),
        ) {
            (Ok(count), Ok(percentage)) => (count, percentage),
            _ => {
                debug!("skipping overrepresented sequence row with a bad count: {}", line);
                continue;
            }
        };

        rows.push(OverrepresentedSequence {
            sequence: fields[0].to_string(),
            count,
            percentage,
            source: MATCH_SUMMARY.replace(fields[3], "").trim().to_string(),
        });
    }

    rows
}

/// Parses an adapter lookup: `name<TAB(s)>sequence` per line, ignoring blank
/// lines and `#` comments. Later entries for the same name win.
pub fn parse_adapter_lookup(contents: &str) -> IndexMap<String, String> {
    let mut lookup = IndexMap::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields = line
            .split('\t')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect::<Vec<_>>();

        match fields.as_slice() {
            [name, .., sequence] => {
                lookup.insert(name.to_string(), sequence.to_string());
            }
            _ => debug!("skipping malformed adapter lookup line: {}", line),
        }
    }

    lookup
}

/// The looked-up sequences of every adapter FastQC reported as a source, in
/// the order FastQC reported them, without duplicates.
pub fn find_adapters(
    overrepresented: &[OverrepresentedSequence],
    lookup: &IndexMap<String, String>,
) -> Vec<String> {
    let mut adapters: Vec<String> = Vec::new();

    for row in overrepresented {
        if row.source == NO_HIT {
            continue;
        }

        if let Some(sequence) = lookup.get(&row.source) {
            if !adapters.contains(sequence) {
                adapters.push(sequence.clone());
            }
        }
    }

    adapters
}

/// Reads a `fastqc_data.txt` and an optional adapter lookup file, and returns
/// the adapter sequences to trim. Without a lookup, there is nothing to match
/// against and no adapters are returned.
pub fn parse_fastqc_adapters(
    fastqc_data: &Path,
    lookup: Option<&Path>,
) -> anyhow::Result<Vec<String>> {
    let lookup = match lookup {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading adapter lookup {}", path.display()))?,
        None => {
            info!("No adapter lookup was provided, so no adapters will be reported.");
            return Ok(Vec::new());
        }
    };

    let contents = fs::read_to_string(fastqc_data)
        .with_context(|| format!("reading FastQC data {}", fastqc_data.display()))?;

    let overrepresented = parse_overrepresented_sequences(&contents);
    let lookup = parse_adapter_lookup(&lookup);
    let adapters = find_adapters(&overrepresented, &lookup);

    info!(
        "Found {} adapter(s) among {} overrepresented sequence(s).",
        adapters.len(),
        overrepresented.len()
    );

    Ok(adapters)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FASTQC_DATA: &str = "##FastQC\t0.11.8\n\
        >>Basic Statistics\tpass\n\
        #Measure\tValue\n\
        Filename\tsample_R1.fastq.gz\n\
        >>END_MODULE\n\
        >>Overrepresented sequences\twarn\n\
        #Sequence\tCount\tPercentage\tPossible Source\n\
        AGATCGGAAGAGCACACGTCTGAACTCCAGTCACATCACGATCTCGTATG\t5062\t0.5062\tTruSeq Adapter, Index 1 (100% over 50bp)\n\
        GATCGGAAGAGCACACGTCTGAACTCCAGTCACATCACGATCTCGTATGC\t3120\t0.312\tTruSeq Adapter, Index 1 (98% over 50bp)\n\
        CCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCC\t1500\t0.15\tNo Hit\n\
        AATGATACGGCGACCACCGAGATCTACACTCTTTCCCTACACGACGCTCT\t1100\t0.11\tIllumina Single End PCR Primer 1 (100% over 50bp)\n\
        ACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTAC\t1000\t0.10\tSome Unlisted Primer (96% over 25bp)\n\
        >>END_MODULE\n\
        >>Adapter Content\tpass\n\
        #Position\tIllumina Universal Adapter\n\
        1\t0.0\n\
        >>END_MODULE\n";

    const LOOKUP: &str = "# This file contains a list of potential contaminants\n\
        \n\
        Illumina Single End Adapter 1\t\t\t\tGATCGGAAGAGCTCGTATGCCGTCTTCTGCTTG\n\
        Illumina Single End PCR Primer 1\t\t\tAATGATACGGCGACCACCGAGATCTACACTCTTTCCCTACACGACGCTCTTCCGATCT\n\
        TruSeq Adapter, Index 1\t\t\t\tGATCGGAAGAGCACACGTCTGAACTCCAGTCACATCACGATCTCGTATGCCGTCTTCTGCTTG\n\
        ABI Dynabead EcoP Oligo\t\t\t\tCTGATCTAGAGGTACCGGATCCCAGCAGT\n";

    #[test]
    fn it_parses_the_overrepresented_sequences_table() {
        let rows = parse_overrepresented_sequences(FASTQC_DATA);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].count, 5062);
        assert_eq!(rows[0].source, "TruSeq Adapter, Index 1");
        assert_eq!(rows[2].source, "No Hit");
        assert_eq!(rows[4].source, "Some Unlisted Primer");
    }

    #[test]
    fn it_skips_rows_with_an_unparsable_count_or_percentage() {
        let contents = ">>Overrepresented sequences\twarn\n\
            #Sequence\tCount\tPercentage\tPossible Source\n\
            AGATCGGAAGAGCACACGTC\tmany\t0.5\tTruSeq Adapter, Index 1 (100% over 20bp)\n\
            GATCGGAAGAGCACACGTCT\t3120\tlots\tTruSeq Adapter, Index 1 (98% over 20bp)\n\
            AATGATACGGCGACCACCGA\t1100\t0.11\tIllumina Single End PCR Primer 1 (100% over 20bp)\n\
            >>END_MODULE\n";

        let rows = parse_overrepresented_sequences(contents);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].count, 1100);
        assert_eq!(rows[0].source, "Illumina Single End PCR Primer 1");
    }

    #[test]
    fn it_ignores_comments_in_the_lookup() {
        let lookup = parse_adapter_lookup(LOOKUP);
        assert_eq!(lookup.len(), 4);
        assert_eq!(
            lookup["ABI Dynabead EcoP Oligo"],
            "CTGATCTAGAGGTACCGGATCCCAGCAGT"
        );
    }

    #[test]
    fn it_returns_exactly_the_adapters_present_in_both_sources() {
        let rows = parse_overrepresented_sequences(FASTQC_DATA);
        let lookup = parse_adapter_lookup(LOOKUP);
        assert_eq!(
            find_adapters(&rows, &lookup),
            vec![
                "GATCGGAAGAGCACACGTCTGAACTCCAGTCACATCACGATCTCGTATGCCGTCTTCTGCTTG".to_string(),
                "AATGATACGGCGACCACCGAGATCTACACTCTTTCCCTACACGACGCTCTTCCGATCT".to_string(),
            ]
        );
    }

    #[test]
    fn it_returns_nothing_for_a_passing_module() {
        let contents = ">>Overrepresented sequences\tpass\n>>END_MODULE\n";
        assert!(parse_overrepresented_sequences(contents).is_empty());
    }

    #[test]
    fn it_returns_nothing_without_a_lookup() {
        let directory = tempfile::tempdir().unwrap();
        let data = directory.path().join("fastqc_data.txt");
        fs::write(&data, FASTQC_DATA).unwrap();

        assert!(parse_fastqc_adapters(&data, None).unwrap().is_empty());
    }

    #[test]
    fn it_reads_both_files_from_disk() {
        let directory = tempfile::tempdir().unwrap();
        let data = directory.path().join("fastqc_data.txt");
        let lookup = directory.path().join("contaminant_list.txt");
        fs::write(&data, FASTQC_DATA).unwrap();
        fs::write(&lookup, LOOKUP).unwrap();

        let adapters = parse_fastqc_adapters(&data, Some(&lookup)).unwrap();
        assert_eq!(adapters.len(), 2);
        assert!(parse_fastqc_adapters(&directory.path().join("missing.txt"), Some(&lookup))
            .is_err());
    }
}
