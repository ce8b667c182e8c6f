//! Extensions to and utilities concerning [`PathBuf`]s.
//!
//! # Overview
//!
//! Most genomic file formats travel with one or more companion files: a BAM
//! with its `.bai` index, a FASTA with its `.fai` index and `.dict` sequence
//! dictionary, a bgzipped VCF with its `.tbi`. By convention, these companion
//! (or "secondary") files are named after the primary file in one of two ways:
//!
//! 1. The index extension is appended to the full filename
//!    (`sample.bam` → `sample.bam.bai`).
//! 2. One or more extensions are first stripped from the filename and the
//!    index extension is appended to what remains
//!    (`reference.fasta` → `reference.dict`).
//!
//! Secondary file patterns express the second case with a leading `^` for
//! every extension to strip, so the two examples above are written `.bai` and
//! `^.dict` respectively.
//!
//! # Examples
//!
//! ```
//! use std::path::PathBuf;
//! // Trait must be in scope to use it.
//! use biowrap::utils::pathbuf::AppendExtension;
//!
//! assert_eq!(
//!     PathBuf::from("hello.txt")
//!         .append_extension("world")
//!         .unwrap(),
//!     PathBuf::from("hello.txt.world"))
//! ```

use std::ffi::OsStr;
use std::path::Path;
use std::path::PathBuf;

use anyhow::bail;

/// A trait that is intended to add a
/// [`append_extension`][AppendExtension::append_extension] method to
/// [`PathBuf`]. This makes it significantly more ergonomic to work with things
/// like index files where the filename is simply the target file name with some
/// extra extension.
pub trait AppendExtension {
    /// Appends an extension with the specified futher extension.
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use biowrap::utils::pathbuf::AppendExtension;
    ///
    /// let bam = PathBuf::from("~/test.bam");
    /// let bai = bam.append_extension("bai").unwrap();
    /// assert_eq!(bai.file_name().unwrap(), "test.bam.bai");
    /// ```
    fn append_extension<P>(self, ext: P) -> anyhow::Result<Self>
    where
        Self: Sized,
        P: AsRef<OsStr>;
}

impl AppendExtension for PathBuf {
    fn append_extension<P>(mut self, ext: P) -> anyhow::Result<Self>
    where
        P: AsRef<OsStr>,
    {
        let mut new_ext = match self.extension() {
            Some(ext) => ext.to_os_string(),
            None => bail!("path did not have an extension: {}", self.display()),
        };

        new_ext.push(".");
        new_ext.push(ext);

        self.set_extension(new_ext);
        Ok(self)
    }
}

/// Resolves a secondary file pattern (such as `.bai` or `^.dict`) against the
/// path of the primary file.
///
/// ```
/// use std::path::PathBuf;
/// use biowrap::utils::pathbuf::secondary_file_path;
///
/// let dict = secondary_file_path("ref/hg38.fasta", "^.dict").unwrap();
/// assert_eq!(dict, PathBuf::from("ref/hg38.dict"));
/// ```
pub fn secondary_file_path<P>(primary: P, pattern: &str) -> anyhow::Result<PathBuf>
where
    P: AsRef<Path>,
{
    let mut path = primary.as_ref().to_path_buf();
    let carets = pattern.chars().take_while(|c| *c == '^').count();
    let suffix = &pattern[carets..];

    for _ in 0..carets {
        if path.extension().is_none() {
            bail!(
                "cannot strip {} extension(s) from {} for secondary file pattern {}",
                carets,
                primary.as_ref().display(),
                pattern
            );
        }

        path.set_extension("");
    }

    match suffix.strip_prefix('.') {
        // An extension-less stem (e.g. after stripping every extension) can't
        // go through `append_extension`, so the suffix is pushed onto the
        // filename directly.
        Some(ext) if path.extension().is_some() && carets == 0 => path.append_extension(ext),
        _ => {
            let mut filename = match path.file_name() {
                Some(name) => name.to_os_string(),
                None => bail!("path did not have a filename: {}", path.display()),
            };

            filename.push(suffix);
            path.set_file_name(filename);
            Ok(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_appends_an_index_extension() {
        let path = secondary_file_path("sample.bam", ".bai").unwrap();
        assert_eq!(path, PathBuf::from("sample.bam.bai"));
    }

    #[test]
    fn it_replaces_the_last_extension_with_a_caret() {
        let path = secondary_file_path("/data/sample.bam", "^.bai").unwrap();
        assert_eq!(path, PathBuf::from("/data/sample.bai"));
    }

    #[test]
    fn it_strips_one_extension_per_caret() {
        let path = secondary_file_path("calls.vcf.gz", "^^.idx").unwrap();
        assert_eq!(path, PathBuf::from("calls.idx"));
    }

    #[test]
    fn it_refuses_to_strip_missing_extensions() {
        assert!(secondary_file_path("README", "^.dict").is_err());
        assert!(secondary_file_path("reads.fastq", "^^.md5").is_err());
    }

    #[test]
    fn it_appends_to_a_filename_without_extension() {
        let path = secondary_file_path("genome", ".fai").unwrap();
        assert_eq!(path, PathBuf::from("genome.fai"));
    }
}
