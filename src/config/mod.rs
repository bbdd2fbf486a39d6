//! In-memory model of a `configobj`-style configuration file, plus loading,
//! searching, merging, and saving.
//!
//! A [`ConfigObj`] is an ordered tree of [`Section`]s. Each section holds
//! its scalar entries first and its sub-sections after them, which is the
//! only layout the file format can express. Comment lines and blank lines
//! travel with the entry they precede so a load/save cycle keeps the file
//! readable.
pub mod merge;
pub mod parser;
pub mod save;
pub mod writer;

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub use merge::update_and_merge;
pub use parser::ParseError;
pub use save::save;

/// File name searched for when no configuration path is given.
pub const CONFIG_FILE_NAME: &str = "weewx.conf";

/// Environment variable that overrides [`DEFAULT_SEARCH_PATH`].
pub const SEARCH_PATH_ENV: &str = "WEECFG_SEARCH_PATH";

/// Directories searched, in order, for [`CONFIG_FILE_NAME`].
pub const DEFAULT_SEARCH_PATH: &[&str] = &[".", "/etc/weewx", "/home/weewx"];

/// A configuration value: a single string or a comma-separated list.
///
/// # Examples
///
/// ```
/// use weecfg::config::Value;
///
/// let altitude = Value::from(vec!["700", "foot"]);
/// assert_eq!(altitude.to_joined(), "700, foot");
/// assert_eq!(Value::from("Boston").as_scalar(), Some("Boston"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A single string.
    Scalar(String),
    /// A list of strings (written as `a, b, c`).
    List(Vec<String>),
}

impl Value {
    /// Return the string if this is a scalar.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::List(_) => None,
        }
    }

    /// Render the value as one string, joining list items with `", "`.
    #[must_use]
    pub fn to_joined(&self) -> String {
        match self {
            Self::Scalar(s) => s.clone(),
            Self::List(items) => items.join(", "),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Scalar(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Scalar(s)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(String::from).collect())
    }
}

/// A `key = value` line together with its surrounding comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    /// Key name.
    pub key: String,
    /// Parsed value.
    pub value: Value,
    /// Comment and blank lines immediately above the entry.
    pub comments: Vec<String>,
    /// Trailing `# comment` on the same line, if any.
    pub inline_comment: Option<String>,
}

/// A named sub-section together with its surrounding comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subsection {
    /// Section name as written between the brackets.
    pub name: String,
    /// Section body.
    pub section: Section,
    /// Comment and blank lines immediately above the header.
    pub comments: Vec<String>,
    /// Trailing `# comment` on the header line, if any.
    pub inline_comment: Option<String>,
}

/// An ordered section: scalar entries followed by sub-sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    scalars: Vec<KeyValue>,
    subsections: Vec<Subsection>,
}

impl Section {
    /// Create an empty section.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scalar entries in file order.
    #[must_use]
    pub fn scalars(&self) -> &[KeyValue] {
        &self.scalars
    }

    /// Sub-sections in file order.
    #[must_use]
    pub fn subsections(&self) -> &[Subsection] {
        &self.subsections
    }

    /// Names of the sub-sections, in file order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.subsections.iter().map(|s| s.name.as_str())
    }

    /// Return `true` if `key` names either a scalar or a sub-section.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.value(key).is_some() || self.section(key).is_some()
    }

    /// Look up a scalar or list entry.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.scalars.iter().find(|kv| kv.key == key).map(|kv| &kv.value)
    }

    /// Look up an entry and return it only if it is a single string.
    #[must_use]
    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.value(key).and_then(Value::as_scalar)
    }

    /// Look up a sub-section.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.subsections
            .iter()
            .find(|s| s.name == name)
            .map(|s| &s.section)
    }

    /// Look up a sub-section for modification.
    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.subsections
            .iter_mut()
            .find(|s| s.name == name)
            .map(|s| &mut s.section)
    }

    /// Follow a path of section names from this section.
    ///
    /// ```
    /// use weecfg::config::ConfigObj;
    ///
    /// let config = ConfigObj::parse("[StdRESTful]\n    [[StationRegistry]]\n        register_this_station = true\n").unwrap();
    /// let registry = config.root.lookup(&["StdRESTful", "StationRegistry"]).unwrap();
    /// assert_eq!(registry.scalar("register_this_station"), Some("true"));
    /// ```
    #[must_use]
    pub fn lookup(&self, path: &[&str]) -> Option<&Section> {
        path.iter()
            .try_fold(self, |section, name| section.section(name))
    }

    /// Set a scalar or list entry.
    ///
    /// An existing entry keeps its position and comments. A new entry is
    /// appended after the existing scalars. A sub-section of the same name
    /// is replaced.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        let value = value.into();
        if let Some(kv) = self.scalars.iter_mut().find(|kv| kv.key == key) {
            kv.value = value;
            return;
        }
        self.subsections.retain(|s| s.name != key);
        self.scalars.push(KeyValue {
            key: key.to_string(),
            value,
            comments: Vec::new(),
            inline_comment: None,
        });
    }

    /// Return the named sub-section, creating an empty one if absent.
    ///
    /// A scalar of the same name is removed.
    #[allow(clippy::indexing_slicing)]
    pub fn ensure_section(&mut self, name: &str) -> &mut Section {
        self.scalars.retain(|kv| kv.key != name);
        let existing = self.subsections.iter().position(|s| s.name == name);
        let pos = existing.unwrap_or_else(|| {
            self.subsections.push(Subsection {
                name: name.to_string(),
                section: Self::new(),
                comments: Vec::new(),
                inline_comment: None,
            });
            self.subsections.len() - 1
        });
        &mut self.subsections[pos].section
    }

    pub(crate) fn push_scalar(&mut self, entry: KeyValue) {
        self.scalars.push(entry);
    }

    pub(crate) fn push_subsection(&mut self, entry: Subsection) {
        self.subsections.push(entry);
    }

    pub(crate) fn scalars_mut(&mut self) -> &mut Vec<KeyValue> {
        &mut self.scalars
    }

    pub(crate) fn subsections_mut(&mut self) -> &mut Vec<Subsection> {
        &mut self.subsections
    }
}

/// A whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigObj {
    /// The top-level section.
    pub root: Section,
    /// Comment and blank lines after the last entry.
    pub final_comment: Vec<String>,
}

impl ConfigObj {
    /// Parse configuration text.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] carrying the offending line number.
    pub fn parse(content: &str) -> Result<Self, ParseError> {
        parser::parse(content)
    }

    /// Render the configuration back to text.
    #[must_use]
    pub fn render(&self) -> String {
        writer::render(self)
    }
}

/// Load and parse the configuration file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Syntax`] if it does not parse.
pub fn load(path: &Path) -> Result<ConfigObj, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ConfigObj::parse(&content).map_err(|e| ConfigError::Syntax {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Locate and load an existing configuration file.
///
/// Uses `explicit` when given, otherwise the first [`CONFIG_FILE_NAME`]
/// found on the [`search_path`]. Returns the canonical path alongside the
/// parsed file.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] when the search finds nothing, or any
/// error from [`load`].
pub fn read_config(explicit: Option<&Path>) -> Result<(PathBuf, ConfigObj), ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => find_config(&search_path())?,
    };
    let config = load(&path)?;
    let resolved = dunce::canonicalize(&path).unwrap_or(path);
    Ok((resolved, config))
}

/// Directories searched for [`CONFIG_FILE_NAME`].
///
/// [`SEARCH_PATH_ENV`] (platform path-list syntax) replaces the defaults when set.
#[must_use]
pub fn search_path() -> Vec<PathBuf> {
    std::env::var_os(SEARCH_PATH_ENV).map_or_else(
        || DEFAULT_SEARCH_PATH.iter().map(PathBuf::from).collect(),
        |value| std::env::split_paths(&value).collect(),
    )
}

/// Return the first `dir/weewx.conf` that exists.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] listing every directory searched.
pub fn find_config(dirs: &[PathBuf]) -> Result<PathBuf, ConfigError> {
    dirs.iter()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| ConfigError::NotFound {
            file_name: CONFIG_FILE_NAME.to_string(),
            searched: dirs.to_vec(),
        })
}
