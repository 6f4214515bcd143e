//! Renders a [`Post`] into a self-contained HTML page. The page chrome
//! (head metadata, theme bootstrap, toggle buttons, stamps footer) lives in
//! a gtmpl template; the default template is embedded in the binary and a
//! site can override it through the `post_template` configuration key.

use crate::config::Config;
use crate::source::Post;
use gtmpl::{Context, Template, Value};
use std::collections::HashMap;
use std::fmt;

/// The default post-page template, matching the original site chrome.
pub const DEFAULT_TEMPLATE: &str = include_str!("../assets/post-template.html");

/// Loads the post-page template: the configured override if any, otherwise
/// the embedded default.
pub fn load_template(config: &Config) -> Result<Template> {
    let contents = match &config.post_template {
        Some(path) => std::fs::read_to_string(path)?,
        None => DEFAULT_TEMPLATE.to_owned(),
    };
    let mut template = Template::default();
    template.parse(&contents).map_err(Error::ParseTemplate)?;
    Ok(template)
}

/// Renders a post page. Pure function of the post fields and the author
/// display name; the caller decides where the result is written.
pub fn render_post(template: &Template, post: &Post, author: &str) -> Result<String> {
    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("number".to_owned(), (post.number as u64).into());
    m.insert("title".to_owned(), Value::String(post.title.clone()));
    m.insert("date".to_owned(), Value::String(post.date.clone()));
    m.insert("content".to_owned(), Value::String(post.body.clone()));
    m.insert("author".to_owned(), Value::String(author.to_owned()));

    let context = Context::from(Value::Object(m)).map_err(|e| Error::Render(e.to_string()))?;
    let mut out: Vec<u8> = Vec::new();
    template.execute(&mut out, &context).map_err(Error::Render)?;
    Ok(String::from_utf8(out)?)
}

/// The result of a fallible page-rendering operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error rendering a post page.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors parsing the template.
    ParseTemplate(String),

    /// Returned for errors executing the template.
    Render(String),

    /// Returned when template output is not valid UTF-8.
    Utf8(std::string::FromUtf8Error),

    /// Returned for I/O errors reading a template override.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ParseTemplate(err) => write!(f, "Parsing post template: {}", err),
            Error::Render(err) => write!(f, "Rendering post page: {}", err),
            Error::Utf8(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ParseTemplate(_) => None,
            Error::Render(_) => None,
            Error::Utf8(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts an [`std::io::Error`] into an [`Error`]. This allows us to
    /// use the `?` operator for fallible I/O operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<std::string::FromUtf8Error> for Error {
    /// Converts a [`std::string::FromUtf8Error`] into an [`Error`].
    fn from(err: std::string::FromUtf8Error) -> Error {
        Error::Utf8(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn template(body: &str) -> Template {
        let mut t = Template::default();
        t.parse(body).unwrap();
        t
    }

    fn post() -> Post {
        Post {
            number: 7,
            title: String::from("A day out"),
            date: String::from("2024-05-01"),
            body: String::from("<p>hello</p>"),
        }
    }

    #[test]
    fn test_render_fields() -> Result<()> {
        let t = template("{{.number}}. {{.title}} - {{.author}}\n{{.content}}\n{{.date}}");
        assert_eq!(
            render_post(&t, &post(), "Nacho")?,
            "7. A day out - Nacho\n<p>hello</p>\n2024-05-01",
        );
        Ok(())
    }

    #[test]
    fn test_default_template_renders() -> Result<()> {
        let mut t = Template::default();
        t.parse(DEFAULT_TEMPLATE).map_err(Error::ParseTemplate)?;
        let rendered = render_post(&t, &post(), "Nacho")?;
        assert!(rendered.starts_with("<!DOCTYPE html>"));
        assert!(rendered.contains("<title>7. A day out - Nacho</title>"));
        assert!(rendered.contains("<p>hello</p>"));
        assert!(rendered.contains(r#"<p class="date">2024-05-01</p>"#));
        assert!(rendered.contains("blog/7.html"));
        Ok(())
    }

    #[test]
    fn test_render_is_deterministic() -> Result<()> {
        let t = template("{{.title}}");
        assert_eq!(render_post(&t, &post(), "a")?, render_post(&t, &post(), "a")?);
        Ok(())
    }
}
