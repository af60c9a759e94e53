use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Name of the section that collects changes listed outside any sub-heading
pub const GENERAL_SECTION: &str = "General";

/// Changes recorded for one version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Changes {
    /// Changes listed directly under the version heading
    Flat(Vec<String>),
    /// Changes grouped under sub-headings such as "Added" or "Fixed"
    Sectioned(IndexMap<String, Vec<String>>),
}

impl Default for Changes {
    fn default() -> Self {
        Changes::Flat(Vec::new())
    }
}

impl Changes {
    /// Combine unsectioned and sectioned changes
    ///
    /// Unsectioned changes alongside sections go into a leading `General`
    /// section, renamed `General_`, `General__`, ... if a section by that name
    /// already exists.
    pub fn combine(general: Vec<String>, sections: IndexMap<String, Vec<String>>) -> Self {
        if sections.is_empty() {
            return Changes::Flat(general);
        }
        if general.is_empty() {
            return Changes::Sectioned(sections);
        }

        let mut name = GENERAL_SECTION.to_string();
        while sections.contains_key(&name) {
            name.push('_');
        }

        let mut combined = IndexMap::with_capacity(sections.len() + 1);
        combined.insert(name, general);
        combined.extend(sections);
        Changes::Sectioned(combined)
    }

    /// Total number of change entries across all sections
    pub fn len(&self) -> usize {
        match self {
            Changes::Flat(items) => items.len(),
            Changes::Sectioned(sections) => sections.values().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_sectioned(&self) -> bool {
        matches!(self, Changes::Sectioned(_))
    }

    /// Entries of a named section (`None` for flat changes)
    pub fn section(&self, name: &str) -> Option<&[String]> {
        match self {
            Changes::Flat(_) => None,
            Changes::Sectioned(sections) => sections.get(name).map(Vec::as_slice),
        }
    }

    /// Every change entry in document order, regardless of section
    pub fn iter_all(&self) -> Box<dyn Iterator<Item = &String> + '_> {
        match self {
            Changes::Flat(items) => Box::new(items.iter()),
            Changes::Sectioned(sections) => Box::new(sections.values().flatten()),
        }
    }
}

/// One version entry of a changelog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Version name as written (e.g. "1.2.0", "Unreleased")
    pub name: Option<String>,

    /// Release or comparison link found in the heading
    pub url: Option<String>,

    /// Release date, when the heading carries a recognizable one
    pub date: Option<NaiveDate>,

    pub changes: Changes,
}

impl VersionInfo {
    /// Interpret the name as a semantic version, ignoring a leading `v`
    pub fn semver(&self) -> Option<semver::Version> {
        let name = self.name.as_deref()?;
        let name = name.strip_prefix('v').unwrap_or(name);
        semver::Version::parse(name).ok()
    }

    pub fn is_unreleased(&self) -> bool {
        self.name
            .as_deref()
            .is_some_and(|name| name.eq_ignore_ascii_case("unreleased"))
    }
}

/// A parsed changelog document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changelog {
    /// Text of the first heading
    pub title: Option<String>,

    /// First paragraph directly under the title
    pub intro: Option<String>,

    /// Versions in document order
    pub versions: Vec<VersionInfo>,
}

impl Changelog {
    /// Look up a version by name
    ///
    /// Exact matches win; otherwise names are compared as semantic versions so
    /// that `v1.0.0` finds `1.0.0`.
    pub fn find_version(&self, name: &str) -> Option<&VersionInfo> {
        if let Some(version) = self
            .versions
            .iter()
            .find(|v| v.name.as_deref() == Some(name))
        {
            return Some(version);
        }

        let wanted = semver::Version::parse(name.strip_prefix('v').unwrap_or(name)).ok()?;
        self.versions
            .iter()
            .find(|v| v.semver().as_ref() == Some(&wanted))
    }

    /// First version that carries a release date
    pub fn latest_release(&self) -> Option<&VersionInfo> {
        self.versions.iter().find(|v| v.date.is_some())
    }

    /// The "Unreleased" entry, if any
    pub fn unreleased(&self) -> Option<&VersionInfo> {
        self.versions.iter().find(|v| v.is_unreleased())
    }
}
