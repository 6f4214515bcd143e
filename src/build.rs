//! Exports the [`build_site`] function which stitches together the
//! high-level steps of a generation run: loading posts ([`crate::source`]),
//! rendering each one into an HTML page ([`crate::page`]), and splicing the
//! post lists into the landing page, listing page, and client script
//! ([`crate::splice`]).

use crate::config::Config;
use crate::logger;
use crate::page::{self, Error as PageError};
use crate::source::{Error as SourceError, Source};
use crate::splice::{self, Error as SpliceError};
use std::fmt;
use std::fs;

/// Runs a full generation pass against `config`. The run is linear and
/// aborts on the first error; there is no partial-failure isolation between
/// posts. An empty source directory is not an error: the run warns and
/// leaves every target file alone.
pub fn build_site(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.output_dir)?;

    let posts = Source::new(&config.posts_dir).load_posts()?;
    if posts.is_empty() {
        logger::warn(&format!(
            "no posts found; create Markdown files in `{}`",
            config.posts_dir.display()
        ));
        return Ok(());
    }

    let template = page::load_template(config)?;
    for post in &posts {
        let rendered = page::render_post(&template, post, &config.author)?;
        fs::write(config.output_dir.join(post.file_name()), rendered)?;
        logger::success(&format!("generated {} - {}", post.file_name(), post.title));
    }

    let (visible, hidden) = posts.split_at(posts.len().min(config.visible_posts));

    splice::update_index(&config.index_page, visible)?;
    logger::success(&format!("updated {}", config.index_page.display()));

    splice::update_script(&config.script_file, hidden)?;
    logger::success(&format!("updated {}", config.script_file.display()));

    if config.listing_page.exists() {
        splice::update_listing(&config.listing_page, &posts)?;
        logger::success(&format!("updated {}", config.listing_page.display()));
    }

    logger::info(&format!("{} posts processed", posts.len()));
    Ok(())
}

/// The result of a site build.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can occur while loading
/// posts, rendering pages, splicing target files, or doing other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors loading posts.
    Source(SourceError),

    /// Returned for errors rendering post pages.
    Page(PageError),

    /// Returned for errors splicing target files.
    Splice(SpliceError),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Source(err) => err.fmt(f),
            Error::Page(err) => err.fmt(f),
            Error::Splice(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Source(err) => Some(err),
            Error::Page(err) => Some(err),
            Error::Splice(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<SourceError> for Error {
    /// Converts [`SourceError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: SourceError) -> Error {
        Error::Source(err)
    }
}

impl From<PageError> for Error {
    /// Converts [`PageError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: PageError) -> Error {
        Error::Page(err)
    }
}

impl From<SpliceError> for Error {
    /// Converts [`SpliceError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: SpliceError) -> Error {
        Error::Splice(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::init;
    use std::fs::OpenOptions;
    use std::path::Path;
    use std::time::{Duration, SystemTime};

    fn scaffold(root: &Path, post_count: usize) -> Config {
        init::new_site(root).unwrap();
        for i in 1..=post_count {
            let path = root.join("posts").join(format!("post{}.md", i));
            fs::write(
                &path,
                format!("---\ntitle: Post {}\ndate: 2024-01-01\n---\nbody {}\n", i, i),
            )
            .unwrap();
            // spread mtimes one minute apart so ordering is deterministic
            let file = OpenOptions::new().write(true).open(&path).unwrap();
            file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(i as u64 * 60))
                .unwrap();
        }
        Config::from_directory(root).unwrap()
    }

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_full_build() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = scaffold(dir.path(), 13);
        build_site(&config)?;

        // every post page exists, numbered 1..=13
        for number in 1..=13 {
            assert!(config.output_dir.join(format!("{}.html", number)).is_file());
        }

        // the 11 highest numbers are visible on the landing page
        let index = read(&config.index_page);
        for number in 3..=13 {
            assert!(index.contains(&format!(
                "<li><a href=\"blog/{0}.html\">{0}. Post {0}</a></li>",
                number
            )));
        }
        assert!(!index.contains("blog/2.html"));
        assert!(!index.contains("blog/1.html"));

        // the rest land in moreEntries
        let script = read(&config.script_file);
        assert!(script.contains("\"num\": 2"));
        assert!(script.contains("\"num\": 1"));
        assert!(!script.contains("\"num\": 3"));

        // the listing page carries everything
        let listing = read(&config.listing_page);
        for number in 1..=13 {
            assert!(listing.contains(&format!("blog/{}.html", number)));
        }
        Ok(())
    }

    #[test]
    fn test_rebuild_is_idempotent() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = scaffold(dir.path(), 3);
        build_site(&config)?;

        let index = read(&config.index_page);
        let script = read(&config.script_file);
        let listing = read(&config.listing_page);
        let page = read(&config.output_dir.join("2.html"));

        build_site(&config)?;
        assert_eq!(index, read(&config.index_page));
        assert_eq!(script, read(&config.script_file));
        assert_eq!(listing, read(&config.listing_page));
        assert_eq!(page, read(&config.output_dir.join("2.html")));
        Ok(())
    }

    #[test]
    fn test_empty_site_leaves_targets_alone() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = scaffold(dir.path(), 0);
        let index = read(&config.index_page);

        build_site(&config)?;
        assert_eq!(index, read(&config.index_page));
        // the output directory is still created, ready for the first post
        assert!(config.output_dir.is_dir());
        assert_eq!(fs::read_dir(&config.output_dir)?.count(), 0);
        Ok(())
    }

    #[test]
    fn test_missing_listing_page_skipped() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = scaffold(dir.path(), 2);
        fs::remove_file(&config.listing_page)?;

        build_site(&config)?;
        assert!(config.output_dir.join("1.html").is_file());
        assert!(!config.listing_page.exists());
        Ok(())
    }

    #[test]
    fn test_edited_away_marker_fails_visibly() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = scaffold(dir.path(), 1);
        fs::write(&config.index_page, "<body>rebuilt by hand</body>")?;

        match build_site(&config) {
            Err(Error::Splice(SpliceError::MarkerNotFound { .. })) => {}
            other => panic!("expected MarkerNotFound, got {:?}", other),
        }
        assert_eq!(read(&config.index_page), "<body>rebuilt by hand</body>");
        Ok(())
    }
}
