//! Scaffolds a fresh site: the target files with their marker regions, the
//! client script and stylesheet, a default project file, and an empty posts
//! directory. The build splices into these files on every run.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use crate::config::PROJECT_FILE;
use crate::logger;

/// Starter files written by `estampa init`, embedded in the binary.
const STARTER_FILES: &[(&str, &str)] = &[
    ("index.html", include_str!("../assets/index.html")),
    ("posts.html", include_str!("../assets/posts.html")),
    ("script.js", include_str!("../assets/script.js")),
    ("style.css", include_str!("../assets/style.css")),
    (PROJECT_FILE, include_str!("../assets/estampa.yaml")),
];

/// Creates a new site under `root`. Refuses to overwrite: every starter
/// file must be absent.
pub fn new_site(root: &Path) -> Result<()> {
    fs::create_dir_all(root)
        .with_context(|| format!("Creating site directory `{}`", root.display()))?;

    for (name, _) in STARTER_FILES {
        let path = root.join(name);
        if path.exists() {
            bail!(
                "`{}` already exists; refusing to overwrite it",
                path.display()
            );
        }
    }

    for (name, contents) in STARTER_FILES {
        fs::write(root.join(name), contents)?;
        logger::success(&format!("wrote {}", name));
    }
    fs::create_dir_all(root.join("posts"))?;
    logger::success("wrote posts/");

    logger::info("site ready; add Markdown files to `posts/` and run `estampa build`");
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_new_site_scaffolds_target_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        new_site(dir.path())?;

        for name in ["index.html", "posts.html", "script.js", "style.css", PROJECT_FILE] {
            assert!(dir.path().join(name).is_file(), "missing {}", name);
        }
        assert!(dir.path().join("posts").is_dir());

        // the scaffold must parse as a project file
        let config = Config::from_directory(dir.path())?;
        assert_eq!(config.visible_posts, 11);
        Ok(())
    }

    #[test]
    fn test_new_site_refuses_to_overwrite() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("index.html"), "hand-made")?;
        assert!(new_site(dir.path()).is_err());
        // nothing else was written either
        assert!(!dir.path().join("script.js").exists());
        Ok(())
    }

    #[test]
    fn test_starter_files_carry_marker_regions() {
        let index = STARTER_FILES[0].1;
        let posts = STARTER_FILES[1].1;
        let script = STARTER_FILES[2].1;
        assert!(index.contains("<ul class=\"blog-list\">"));
        assert!(posts.contains("<ul class=\"blog-list\" id=\"all-posts-list\">"));
        assert!(script.contains("const moreEntries = [];"));
    }
}
