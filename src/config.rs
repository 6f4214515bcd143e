//! Project configuration. The original generator kept its knobs as global
//! constants at the top of a script; here they live in an `estampa.yaml`
//! project file so every operation receives an explicit [`Config`] value and
//! can be tested without shared process state.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Name of the project file that marks a site root.
pub const PROJECT_FILE: &str = "estampa.yaml";

#[derive(Deserialize)]
struct VisibleCount(usize);
impl Default for VisibleCount {
    fn default() -> Self {
        VisibleCount(11)
    }
}

fn default_posts_dir() -> PathBuf {
    PathBuf::from("posts")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("blog")
}

fn default_index_page() -> PathBuf {
    PathBuf::from("index.html")
}

fn default_listing_page() -> PathBuf {
    PathBuf::from("posts.html")
}

fn default_script_file() -> PathBuf {
    PathBuf::from("script.js")
}

fn default_author() -> String {
    String::from("Nacho")
}

/// The raw project file. All paths are relative to the directory containing
/// `estampa.yaml`; defaults mirror the original script's constants.
#[derive(Deserialize)]
struct Project {
    #[serde(default = "default_posts_dir")]
    posts_dir: PathBuf,

    #[serde(default = "default_output_dir")]
    output_dir: PathBuf,

    #[serde(default = "default_index_page")]
    index_page: PathBuf,

    #[serde(default = "default_listing_page")]
    listing_page: PathBuf,

    #[serde(default = "default_script_file")]
    script_file: PathBuf,

    #[serde(default)]
    visible_posts: VisibleCount,

    #[serde(default = "default_author")]
    author: String,

    #[serde(default)]
    post_template: Option<PathBuf>,
}

/// Resolved configuration for a build. Every path is absolute (joined onto
/// the site root) so callers never depend on the process working directory.
pub struct Config {
    /// The site root, i.e. the directory containing `estampa.yaml`.
    pub site_root: PathBuf,

    /// Directory of Markdown post sources.
    pub posts_dir: PathBuf,

    /// Directory receiving the generated `<number>.html` pages.
    pub output_dir: PathBuf,

    /// The landing page whose visible post list is spliced in place.
    pub index_page: PathBuf,

    /// The full listing page. Optional: if the file does not exist the
    /// build skips it.
    pub listing_page: PathBuf,

    /// The client script whose `moreEntries` table is spliced in place.
    pub script_file: PathBuf,

    /// How many posts appear on the landing page; the remainder only show
    /// up on the listing page and in `moreEntries`.
    pub visible_posts: usize,

    /// Display name used in page titles.
    pub author: String,

    /// Optional override for the embedded post-page template.
    pub post_template: Option<PathBuf>,
}

impl Config {
    /// Finds `estampa.yaml` in `dir` or the nearest ancestor directory and
    /// loads it. This lets the command run from anywhere inside a site.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let dir = dir
            .canonicalize()
            .with_context(|| format!("Resolving directory `{}`", dir.display()))?;
        let mut current: &Path = &dir;
        loop {
            let path = current.join(PROJECT_FILE);
            if path.exists() {
                return Config::from_project_file(&path)
                    .with_context(|| format!("Loading `{}`", path.display()));
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => {
                    return Err(anyhow!(
                        "Could not find `{}` in `{}` or any parent directory",
                        PROJECT_FILE,
                        dir.display()
                    ))
                }
            }
        }
    }

    /// Loads a specific project file. Relative paths in the file resolve
    /// against its parent directory.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let project: Project = serde_yaml::from_reader(open(path, "project")?)?;
        let site_root = path
            .parent()
            .ok_or_else(|| {
                anyhow!("Can't get parent directory of project file `{}`", path.display())
            })?
            .to_owned();
        Ok(Config {
            posts_dir: site_root.join(&project.posts_dir),
            output_dir: site_root.join(&project.output_dir),
            index_page: site_root.join(&project.index_page),
            listing_page: site_root.join(&project.listing_page),
            script_file: site_root.join(&project.script_file),
            visible_posts: project.visible_posts.0,
            author: project.author,
            post_template: project.post_template.map(|p| site_root.join(p)),
            site_root,
        })
    }
}

/// Opens a file, annotating errors with what the file was for.
pub fn open(path: &Path, kind: &str) -> Result<File> {
    match File::open(path) {
        Err(e) => Err(anyhow!("Opening {} file `{}`: {}", kind, path.display(), e)),
        Ok(file) => Ok(file),
    }
}
