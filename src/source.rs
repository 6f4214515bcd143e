//! Defines the [`Post`] type and the logic for loading posts from the file
//! system into memory.
//!
//! Ordering is deliberate: posts are sorted by file modification time, most
//! recent first, and numbered `total - index` so the newest file gets the
//! highest number and the oldest gets 1. Numbering is a pure function of
//! filesystem state at run time; nothing is persisted, so touching, adding,
//! or removing a source file may renumber every post on the next run.

use std::{
    fmt,
    fs::{create_dir_all, read_dir},
    path::{Path, PathBuf},
    time::SystemTime,
};

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

use crate::markdown;

const MARKDOWN_EXTENSION: &str = ".md";

/// A single post, ready to be rendered into a page and listed.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// Sequence number: dense over `1..=N`, newest post holds `N`.
    pub number: usize,

    /// Title from front-matter, or the source file stem.
    pub title: String,

    /// Date in `YYYY-MM-DD` form.
    pub date: String,

    /// The body, rendered to HTML.
    pub body: String,
}

impl Post {
    /// The name of the generated page file, e.g. `7.html`.
    pub fn file_name(&self) -> String {
        format!("{}.html", self.number)
    }
}

/// The optional `title`/`date` front-matter block. Posts without front-matter
/// fall back to the file stem and the current date.
#[derive(Deserialize, Default)]
struct Frontmatter {
    #[serde(default)]
    title: Option<String>,

    #[serde(default)]
    date: Option<String>,
}

/// Splits a post source into its front-matter YAML and body. Both fences
/// must open a line; a `---` in the middle of a line is body text. Returns
/// `None` when the leading fence is absent or unclosed, in which case the
/// whole input is the body.
fn split_frontmatter(input: &str) -> Option<(&str, &str)> {
    const FENCE: &str = "---";
    const CLOSE: &str = "\n---";
    let rest = input.strip_prefix(FENCE)?;
    if !rest.starts_with('\n') && !rest.starts_with("\r\n") {
        return None;
    }
    let yaml_stop = rest.find(CLOSE)?;
    Some((&rest[..yaml_stop], &rest[yaml_stop + CLOSE.len()..]))
}

/// Deserializes a fenced front-matter block. A block that is not a YAML
/// mapping (say, body text sitting between two thematic breaks) carries no
/// `title`/`date` and so degrades to the defaults; only YAML that fails to
/// parse at all is an error.
fn parse_frontmatter(yaml: &str) -> Result<Frontmatter> {
    if yaml.trim().is_empty() {
        return Ok(Frontmatter::default());
    }
    match serde_yaml::from_str::<serde_yaml::Value>(yaml)? {
        value @ serde_yaml::Value::Mapping(_) => Ok(serde_yaml::from_value(value)?),
        _ => Ok(Frontmatter::default()),
    }
}

/// Normalizes a front-matter date to `YYYY-MM-DD`. A string already in that
/// form is returned unchanged; any other parseable datetime is reduced to
/// its UTC calendar date; anything else falls back to today.
pub fn format_date(raw: Option<&str>) -> String {
    static ISO_DATE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

    let today = || Local::now().format("%Y-%m-%d").to_string();
    let raw = match raw {
        Some(raw) => raw.trim(),
        None => return today(),
    };
    if ISO_DATE.is_match(raw) {
        return raw.to_owned();
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Utc).date_naive().format("%Y-%m-%d").to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return parsed.date().format("%Y-%m-%d").to_string();
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return parsed.with_timezone(&Utc).date_naive().format("%Y-%m-%d").to_string();
    }
    today()
}

/// Loads [`Post`] objects from a source directory.
pub struct Source<'a> {
    /// The directory of Markdown post sources.
    posts_dir: &'a Path,
}

impl<'a> Source<'a> {
    pub fn new(posts_dir: &'a Path) -> Source<'a> {
        Source { posts_dir }
    }

    /// Loads all posts, numbered and sorted newest-first. A missing source
    /// directory is created and yields an empty collection.
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        if !self.posts_dir.exists() {
            create_dir_all(self.posts_dir)?;
            return Ok(Vec::new());
        }

        // (modification time, file stem, full path) per source file
        let mut files: Vec<(SystemTime, String, PathBuf)> = Vec::new();
        for result in read_dir(self.posts_dir)? {
            let entry = result?;
            let os_file_name = entry.file_name();
            let file_name = os_file_name.to_string_lossy();
            if file_name.ends_with(MARKDOWN_EXTENSION) && entry.file_type()?.is_file() {
                files.push((
                    entry.metadata()?.modified()?,
                    file_name.trim_end_matches(MARKDOWN_EXTENSION).to_owned(),
                    entry.path(),
                ));
            }
        }
        files.sort_by(|a, b| b.0.cmp(&a.0));

        let total = files.len();
        files
            .into_iter()
            .enumerate()
            .map(|(index, (_, stem, path))| {
                self.load_post(&stem, &path, total - index)
                    .map_err(|e| Error::Annotated(format!("loading post `{}`", path.display()), Box::new(e)))
            })
            .collect()
    }

    fn load_post(&self, stem: &str, path: &Path, number: usize) -> Result<Post> {
        let contents = std::fs::read_to_string(path)?;
        let (frontmatter, body) = match split_frontmatter(&contents) {
            Some((yaml, body)) => (parse_frontmatter(yaml)?, body),
            None => (Frontmatter::default(), contents.as_str()),
        };
        Ok(Post {
            number,
            title: frontmatter.title.unwrap_or_else(|| stem.to_owned()),
            date: format_date(frontmatter.date.as_deref()),
            body: markdown::to_html(body),
        })
    }
}

/// Represents the result of a post-loading operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading a [`Post`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned when front-matter between valid fences is not valid YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned for I/O errors.
    Io(std::io::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::DeserializeYaml(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
