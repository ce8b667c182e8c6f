//! Authorship and documentation attached to tools and workflows.

use chrono::NaiveDate;
use serde::Serialize;

/// Metadata describing who wrote a definition, when, and where to read more
/// about the underlying tool.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ToolMetadata {
    /// The people or groups who contributed to the definition.
    pub contributors: Vec<String>,

    /// When the definition was first written.
    pub date_created: Option<NaiveDate>,

    /// When the definition was last updated.
    pub date_updated: Option<NaiveDate>,

    /// The institution that develops the underlying tool.
    pub institution: Option<String>,

    /// Keywords to find the tool by.
    pub keywords: Vec<String>,

    /// Documentation for the tool, generally copied from its help text.
    pub documentation: Option<String>,

    /// Where the tool's own documentation lives.
    pub documentation_url: Option<String>,

    /// The DOI of the tool's publication.
    pub doi: Option<String>,

    /// How to cite the tool.
    pub citation: Option<String>,
}

impl ToolMetadata {
    /// Creates a new, empty [`ToolMetadata`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a contributor.
    pub fn contributor(mut self, name: impl Into<String>) -> Self {
        self.contributors.push(name.into());
        self
    }

    /// Sets the creation and last-updated dates. Dates that do not exist in
    /// the calendar are dropped.
    pub fn dates(mut self, created: (i32, u32, u32), updated: (i32, u32, u32)) -> Self {
        self.date_created = NaiveDate::from_ymd_opt(created.0, created.1, created.2);
        self.date_updated = NaiveDate::from_ymd_opt(updated.0, updated.1, updated.2);
        self
    }

    /// Sets the institution.
    pub fn institution(mut self, institution: impl Into<String>) -> Self {
        self.institution = Some(institution.into());
        self
    }

    /// Adds keywords.
    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    /// Sets the documentation text. Surrounding whitespace (common with
    /// multi-line string literals) is trimmed.
    pub fn documentation(mut self, documentation: &str) -> Self {
        self.documentation = Some(documentation.trim().to_string());
        self
    }

    /// Sets the documentation URL.
    pub fn documentation_url(mut self, url: impl Into<String>) -> Self {
        self.documentation_url = Some(url.into());
        self
    }

    /// Sets the DOI.
    pub fn doi(mut self, doi: impl Into<String>) -> Self {
        self.doi = Some(doi.into());
        self
    }

    /// Sets the citation.
    pub fn citation(mut self, citation: impl Into<String>) -> Self {
        self.citation = Some(citation.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_drops_impossible_dates() {
        let metadata = ToolMetadata::new().dates((2019, 2, 30), (2019, 3, 1));
        assert!(metadata.date_created.is_none());
        assert_eq!(
            metadata.date_updated,
            NaiveDate::from_ymd_opt(2019, 3, 1)
        );
    }

    #[test]
    fn it_trims_documentation() {
        let metadata = ToolMetadata::new().documentation("\n    Sorts a BAM.\n");
        assert_eq!(metadata.documentation.as_deref(), Some("Sorts a BAM."));
    }
}
