//! Splices freshly generated post lists into the site's existing files: the
//! landing page's visible list, the listing page's full list, and the client
//! script's `moreEntries` table. Each target file carries a marker region
//! that is located with a non-greedy regex and replaced wholesale; every
//! byte outside the region is preserved.
//!
//! The original generator silently left a file unchanged when its marker had
//! been edited away. Here that is a hard error ([`Error::MarkerNotFound`]):
//! the file is still untouched, but the run fails visibly.

use crate::source::Post;
use regex::{NoExpand, Regex};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static INDEX_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)<ul class="blog-list">.*?</ul>"#).unwrap());

static ALL_POSTS_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<ul class="blog-list" id="all-posts-list">.*?</ul>"#).unwrap()
});

static MORE_ENTRIES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)const moreEntries = \[.*?\];").unwrap());

/// One row of the `moreEntries` table in the client script.
#[derive(Serialize)]
struct MoreEntry<'a> {
    num: usize,
    title: &'a str,
}

/// Renders the `<li>` lines for a list of posts, matching the indentation of
/// the starter pages.
fn list_items(posts: &[Post]) -> String {
    posts
        .iter()
        .map(|post| {
            format!(
                "                <li><a href=\"blog/{}\">{}. {}</a></li>",
                post.file_name(),
                post.number,
                post.title
            )
        })
        .collect::<Vec<String>>()
        .join("\n")
}

/// Rewrites the landing page's visible post list in place.
pub fn update_index(path: &Path, visible: &[Post]) -> Result<()> {
    let replacement = format!(
        "<ul class=\"blog-list\">\n{}\n            </ul>",
        list_items(visible)
    );
    splice_file(path, &INDEX_LIST, "<ul class=\"blog-list\">", &replacement)
}

/// Rewrites the listing page's full post list in place. The caller is
/// expected to skip this when the listing page doesn't exist.
pub fn update_listing(path: &Path, posts: &[Post]) -> Result<()> {
    let replacement = format!(
        "<ul class=\"blog-list\" id=\"all-posts-list\">\n{}\n            </ul>",
        list_items(posts)
    );
    splice_file(
        path,
        &ALL_POSTS_LIST,
        "<ul class=\"blog-list\" id=\"all-posts-list\">",
        &replacement,
    )
}

/// Rewrites the client script's `moreEntries` declaration with the hidden
/// posts.
pub fn update_script(path: &Path, hidden: &[Post]) -> Result<()> {
    let entries: Vec<MoreEntry> = hidden
        .iter()
        .map(|post| MoreEntry {
            num: post.number,
            title: &post.title,
        })
        .collect();
    let replacement = format!(
        "const moreEntries = {};",
        serde_json::to_string_pretty(&entries)?
    );
    splice_file(path, &MORE_ENTRIES, "const moreEntries = [...];", &replacement)
}

/// Reads `path`, replaces the region matched by `pattern` with
/// `replacement`, and writes the file back. The replacement is inserted
/// verbatim (no capture-group expansion). Fails without touching the file
/// when the marker is absent.
fn splice_file(
    path: &Path,
    pattern: &Regex,
    marker: &'static str,
    replacement: &str,
) -> Result<()> {
    let contents = fs::read_to_string(path)?;
    if !pattern.is_match(&contents) {
        return Err(Error::MarkerNotFound {
            path: path.to_owned(),
            marker,
        });
    }
    let spliced = pattern.replace(&contents, NoExpand(replacement));
    fs::write(path, spliced.as_bytes())?;
    Ok(())
}

/// The result of a fallible splice operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error splicing generated content into a target file.
#[derive(Debug)]
pub enum Error {
    /// Returned when a target file no longer contains its marker region.
    /// The file is left unchanged.
    MarkerNotFound {
        path: PathBuf,
        marker: &'static str,
    },

    /// Returned for errors serializing the `moreEntries` table.
    Json(serde_json::Error),

    /// Returned for I/O errors reading or writing a target file.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MarkerNotFound { path, marker } => write!(
                f,
                "`{}` has no `{}` marker region; file left unchanged",
                path.display(),
                marker
            ),
            Error::Json(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MarkerNotFound { .. } => None,
            Error::Json(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for Error {
    /// Converts a [`serde_json::Error`] into an [`Error`]. This allows us to
    /// use the `?` operator for serialization.
    fn from(err: serde_json::Error) -> Error {
        Error::Json(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. This allows us to
    /// use the `?` operator for fallible I/O operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
