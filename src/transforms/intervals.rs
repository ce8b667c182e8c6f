//! Generating per-contig BED intervals from a reference sequence dictionary.
//!
//! # Overview
//!
//! Scatter-gather pipelines run a tool once per region of the genome. This
//! module produces those regions from a sequence dictionary (the `.dict` that
//! `CreateSequenceDictionary` writes next to a reference): one BED file per
//! contig, optionally restricted to an allow-list of contigs, and optionally
//! with long contigs split into overlapping chunks.
//!
//! Intervals cover `[1, length]` of each contig. When a contig is longer than
//! the maximum interval size, chunk `n` (counting from zero) starts at
//! `1 + n * (max_size - overlap)` and is `max_size` bases long (the last chunk
//! is cut short at the end of the contig), so consecutive chunks share exactly
//! `overlap` bases.

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use anyhow::bail;
use anyhow::Context;
use num_format::Locale;
use num_format::ToFormattedString;
use tracing::debug;
use tracing::info;

use crate::types::sequence::FastaWithDict;
use crate::types::DataType;

/// A contig listed in a sequence dictionary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contig {
    /// The name of the contig (`SN`).
    pub name: String,

    /// The length of the contig (`LN`).
    pub length: u64,
}

/// A single BED interval. Coordinates are 1-based and inclusive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interval {
    /// The contig the interval lies on.
    pub contig: String,

    /// The first base of the interval.
    pub start: u64,

    /// The last base of the interval.
    pub end: u64,

    /// The label of the interval: the contig name, or `{contig}_{n}` for
    /// chunks of a split contig.
    pub label: String,
}

impl Interval {
    /// Formats the interval as a BED line (without the newline).
    pub fn to_bed_line(&self) -> String {
        format!("{}\t{}\t{}\t{}", self.contig, self.start, self.end, self.label)
    }
}

/// Options for [`generate_intervals`].
#[derive(Clone, Debug, Default)]
pub struct IntervalOptions {
    /// The contigs to produce intervals for. All contigs when empty.
    pub allowed_contigs: Vec<String>,

    /// The maximum size of an interval. Contigs are not split when unset.
    pub max_size: Option<u64>,

    /// How many bases consecutive chunks of a split contig share.
    pub overlap: u64,
}

impl IntervalOptions {
    /// Checks that the overlap is strictly less than the maximum size.
    pub fn validate(&self) -> anyhow::Result<()> {
        match self.max_size {
            Some(0) => bail!("the maximum interval size must be greater than zero"),
            Some(max_size) if self.overlap >= max_size => bail!(
                "the overlap ({}) must be less than the maximum interval size ({})",
                self.overlap,
                max_size
            ),
            None if self.overlap > 0 => bail!(
                "an overlap ({}) requires a maximum interval size",
                self.overlap
            ),
            _ => Ok(()),
        }
    }

    fn allows(&self, contig: &str) -> bool {
        self.allowed_contigs.is_empty() || self.allowed_contigs.iter().any(|c| c == contig)
    }
}

/// Parses a single line of a sequence dictionary. Lines that are not `@SQ`
/// lines, or that lack a name or a valid (positive) length, yield `None`.
pub fn parse_dict_line(line: &str) -> Option<Contig> {
    let mut fields = line.trim_end_matches(['\r', '\n']).split('\t');
    if fields.next()? != "@SQ" {
        return None;
    }

    let mut name = None;
    let mut length = None;
    for field in fields {
        if let Some(sn) = field.strip_prefix("SN:") {
            name = Some(sn.to_string());
        } else if let Some(ln) = field.strip_prefix("LN:") {
            length = ln.parse::<u64>().ok();
        }
    }

    match (name, length) {
        (Some(name), Some(length)) if !name.is_empty() && length > 0 => {
            Some(Contig { name, length })
        }
        _ => {
            debug!("skipping sequence dictionary line: {}", line.trim_end());
            None
        }
    }
}

/// Reads every well-formed contig from a sequence dictionary.
pub fn read_dict<R>(reader: R) -> anyhow::Result<Vec<Contig>>
where
    R: BufRead,
{
    let mut contigs = Vec::new();
    for line in reader.lines() {
        let line = line.with_context(|| "reading sequence dictionary")?;
        if let Some(contig) = parse_dict_line(&line) {
            contigs.push(contig);
        }
    }

    Ok(contigs)
}

/// Splits a contig into intervals according to `options`.
pub fn contig_intervals(contig: &Contig, options: &IntervalOptions) -> Vec<Interval> {
    let whole = || Interval {
        contig: contig.name.clone(),
        start: 1,
        end: contig.length,
        label: contig.name.clone(),
    };

    let max_size = match options.max_size {
        Some(max_size) if contig.length > max_size => max_size,
        _ => return vec![whole()],
    };

    let step = max_size - options.overlap;
    let mut intervals = Vec::new();
    let mut start = 1;
    loop {
        let end = (start + max_size - 1).min(contig.length);
        intervals.push(Interval {
            contig: contig.name.clone(),
            start,
            end,
            label: format!("{}_{}", contig.name, intervals.len()),
        });

        if end == contig.length {
            break;
        }

        start += step;
    }

    intervals
}

/// Produces the intervals for every allowed contig, in dictionary order.
pub fn generate_intervals(
    contigs: &[Contig],
    options: &IntervalOptions,
) -> anyhow::Result<Vec<Vec<Interval>>> {
    options.validate()?;

    Ok(contigs
        .iter()
        .filter(|contig| options.allows(&contig.name))
        .map(|contig| contig_intervals(contig, options))
        .collect())
}

/// Finds the sequence dictionary for `reference`: the file itself when it is a
/// `.dict`, otherwise the reference's `^.dict` secondary file.
pub fn dictionary_path(reference: &Path) -> anyhow::Result<PathBuf> {
    if reference.extension().map_or(false, |ext| ext == "dict") {
        return Ok(reference.to_path_buf());
    }

    let dict = FastaWithDict
        .secondary_file_paths(reference)?
        .into_iter()
        .find(|path| path.extension().map_or(false, |ext| ext == "dict"));

    match dict {
        Some(dict) => Ok(dict),
        None => bail!(
            "could not determine the sequence dictionary for {}",
            reference.display()
        ),
    }
}

/// Reads the dictionary for `reference` and writes the intervals to BED files
/// in `directory`: `{prefix}{contig}.bed` per contig, or `{prefix}intervals.bed`
/// when `single_file` is set. Returns the paths written, in order.
pub fn write_intervals(
    reference: &Path,
    directory: &Path,
    prefix: &str,
    options: &IntervalOptions,
    single_file: bool,
) -> anyhow::Result<Vec<PathBuf>> {
    options.validate()?;

    let dict = dictionary_path(reference)?;
    debug!("reading sequence dictionary from {}", dict.display());
    let file = File::open(&dict)
        .with_context(|| format!("opening sequence dictionary {}", dict.display()))?;
    let contigs = read_dict(BufReader::new(file))?;

    let intervals = generate_intervals(&contigs, options)?;
    let total: usize = intervals.iter().map(Vec::len).sum();

    let mut written = Vec::new();
    if single_file {
        let path = directory.join(format!("{}intervals.bed", prefix));
        write_bed(&path, intervals.iter().flatten())?;
        written.push(path);
    } else {
        for contig_intervals in &intervals {
            let contig = match contig_intervals.first() {
                Some(interval) => &interval.contig,
                None => continue,
            };

            let path = directory.join(format!("{}{}.bed", prefix, contig));
            write_bed(&path, contig_intervals.iter())?;
            written.push(path);
        }
    }

    info!(
        "Wrote {} intervals for {} contigs to {} file(s).",
        total.to_formatted_string(&Locale::en),
        intervals.len().to_formatted_string(&Locale::en),
        written.len()
    );

    Ok(written)
}

fn write_bed<'a, I>(path: &Path, intervals: I) -> anyhow::Result<()>
where
    I: Iterator<Item = &'a Interval>,
{
    let file =
        File::create(path).with_context(|| format!("creating BED file {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    for interval in intervals {
        writeln!(writer, "{}", interval.to_bed_line())?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const DICT: &str = "@HD\tVN:1.5\n\
        @SQ\tSN:chr1\tLN:1000\tM5:abc\tUR:file:/ref.fasta\n\
        @SQ\tSN:chr2\tLN:250\n\
        @SQ\tLN:300\n\
        @SQ\tSN:chr3\n\
        @SQ\tSN:chr4\tLN:notanumber\n\
        @SQ\tSN:chrM\tLN:16569\n";

    fn contigs() -> Vec<Contig> {
        read_dict(DICT.as_bytes()).unwrap()
    }

    #[test]
    fn it_skips_lines_without_a_name_or_length() {
        let names = contigs().into_iter().map(|c| c.name).collect::<Vec<_>>();
        assert_eq!(names, vec!["chr1", "chr2", "chrM"]);

        assert!(parse_dict_line("@SQ\tSN:chrZ\tLN:0").is_none());
        let empty = read_dict("@SQ\tSN:chrZ\tLN:0\n".as_bytes()).unwrap();
        assert!(generate_intervals(&empty, &IntervalOptions::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn it_produces_one_interval_per_contig_without_a_max_size() {
        let intervals = generate_intervals(&contigs(), &IntervalOptions::default()).unwrap();
        assert_eq!(intervals.len(), 3);
        assert!(intervals.iter().all(|i| i.len() == 1));
        assert_eq!(intervals[0][0].to_bed_line(), "chr1\t1\t1000\tchr1");
    }

    #[test]
    fn it_keeps_only_allowed_contigs() {
        let options = IntervalOptions {
            allowed_contigs: vec!["chr2".to_string(), "chrY".to_string()],
            ..Default::default()
        };
        let intervals = generate_intervals(&contigs(), &options).unwrap();
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0][0].contig, "chr2");
    }

    #[test]
    fn it_does_not_split_contigs_at_or_below_the_max_size() {
        let options = IntervalOptions {
            max_size: Some(250),
            overlap: 10,
            ..Default::default()
        };
        let intervals = contig_intervals(
            &Contig {
                name: "chr2".to_string(),
                length: 250,
            },
            &options,
        );
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].label, "chr2");
    }

    #[test]
    fn it_splits_long_contigs_into_overlapping_chunks() {
        let options = IntervalOptions {
            max_size: Some(400),
            overlap: 50,
            ..Default::default()
        };
        let intervals = contig_intervals(
            &Contig {
                name: "chr1".to_string(),
                length: 1000,
            },
            &options,
        );

        let coordinates = intervals
            .iter()
            .map(|i| (i.start, i.end, i.label.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            coordinates,
            vec![
                (1, 400, "chr1_0"),
                (351, 750, "chr1_1"),
                (701, 1000, "chr1_2")
            ]
        );
    }

    #[test]
    fn it_covers_every_contig_with_exact_overlaps() {
        for length in [1u64, 2, 99, 100, 101, 999, 1000, 1001, 16569] {
            for (max_size, overlap) in [(100u64, 0u64), (100, 1), (100, 99), (7, 3), (1, 0)] {
                let options = IntervalOptions {
                    max_size: Some(max_size),
                    overlap,
                    ..Default::default()
                };
                let contig = Contig {
                    name: "chrT".to_string(),
                    length,
                };
                let intervals = contig_intervals(&contig, &options);

                assert_eq!(intervals.first().unwrap().start, 1);
                assert_eq!(intervals.last().unwrap().end, length);
                for interval in &intervals {
                    assert!(interval.start <= interval.end);
                    assert!(interval.end - interval.start + 1 <= max_size);
                }
                for pair in intervals.windows(2) {
                    assert_eq!(pair[0].end + 1 - pair[1].start, overlap);
                }
            }
        }
    }

    #[test]
    fn it_refuses_an_overlap_not_below_the_max_size() {
        for (max_size, overlap) in [(100, 100), (100, 150), (0, 0)] {
            let options = IntervalOptions {
                max_size: Some(max_size),
                overlap,
                ..Default::default()
            };
            assert!(generate_intervals(&contigs(), &options).is_err());
        }

        let options = IntervalOptions {
            overlap: 5,
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn it_finds_the_dictionary_next_to_the_fasta() {
        assert_eq!(
            dictionary_path(Path::new("/ref/hg38.fasta")).unwrap(),
            PathBuf::from("/ref/hg38.dict")
        );
        assert_eq!(
            dictionary_path(Path::new("/ref/hg38.dict")).unwrap(),
            PathBuf::from("/ref/hg38.dict")
        );
    }

    #[test]
    fn it_writes_one_bed_per_contig() {
        let directory = tempfile::tempdir().unwrap();
        let dict = directory.path().join("ref.dict");
        fs::write(&dict, DICT).unwrap();

        let options = IntervalOptions {
            allowed_contigs: vec!["chr1".to_string(), "chr2".to_string()],
            max_size: Some(600),
            overlap: 100,
        };
        let written = write_intervals(&dict, directory.path(), "chromosome_", &options, false)
            .unwrap();

        assert_eq!(
            written,
            vec![
                directory.path().join("chromosome_chr1.bed"),
                directory.path().join("chromosome_chr2.bed")
            ]
        );
        assert_eq!(
            fs::read_to_string(&written[0]).unwrap(),
            "chr1\t1\t600\tchr1_0\nchr1\t501\t1000\tchr1_1\n"
        );
        assert_eq!(
            fs::read_to_string(&written[1]).unwrap(),
            "chr2\t1\t250\tchr2\n"
        );
    }

    #[test]
    fn it_writes_a_single_bed_when_asked() {
        let directory = tempfile::tempdir().unwrap();
        let dict = directory.path().join("ref.dict");
        fs::write(&dict, DICT).unwrap();

        let written = write_intervals(
            &dict,
            directory.path(),
            "",
            &IntervalOptions::default(),
            true,
        )
        .unwrap();

        assert_eq!(written, vec![directory.path().join("intervals.bed")]);
        let contents = fs::read_to_string(&written[0]).unwrap();
        assert_eq!(contents.lines().count(), 3);
    }
}
