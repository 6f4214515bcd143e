//! The library code for the `estampa` static-blog generator. A build is a
//! single synchronous pass that can be broken down into three steps:
//!
//! 1. Loading posts from Markdown source files on disk ([`crate::source`]):
//!    front-matter is split off, Obsidian image embeds are rewritten, the
//!    Markdown body is rendered to HTML ([`crate::markdown`]), and each post
//!    is assigned a number by recency.
//! 2. Writing one self-contained HTML page per post ([`crate::page`]) into
//!    the output directory as `<number>.html`.
//! 3. Splicing the current post list into the site's landing page, full
//!    listing page, and client script ([`crate::splice`]): each target file
//!    has a marker region that is located and replaced wholesale, leaving
//!    the rest of the file untouched.
//!
//! [`crate::build`] stitches the steps together, and [`crate::init`]
//! scaffolds a fresh site (the target files with their marker regions, the
//! client script, and a default configuration) for the build to splice into.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod cli;
pub mod config;
pub mod init;
pub mod logger;
pub mod markdown;
pub mod page;
pub mod source;
pub mod splice;
