//! Markdown-to-HTML conversion for post bodies: rewrites Obsidian image
//! embeds into standard Markdown, renders with [`pulldown_cmark`], and wraps
//! every rendered `<img>` in a centering container.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use pulldown_cmark::{html, Options, Parser};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// The characters `encodeURIComponent` leaves alone, besides alphanumerics.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Converts a Markdown post body to HTML.
pub fn to_html(markdown: &str) -> String {
    let markdown = convert_obsidian_embeds(markdown);

    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut body = String::new();
    html::push_html(&mut body, Parser::new_ext(&markdown, options));
    wrap_images(&body)
}

/// Rewrites Obsidian image embeds (`![[photo.png]]`) into standard Markdown
/// images pointing at the posts directory, percent-encoding the file name.
/// The replacement is padded with blank lines so the image always renders as
/// its own block.
pub fn convert_obsidian_embeds(markdown: &str) -> String {
    static EMBED: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"!\[\[([^\]]+)\]\]").unwrap());

    EMBED
        .replace_all(markdown, |caps: &Captures| {
            let name = caps[1].trim();
            format!(
                "\n\n![{}](../posts/{})\n\n",
                name,
                utf8_percent_encode(name, COMPONENT)
            )
        })
        .into_owned()
}

/// Wraps every `<img>` tag in a centering container. The `title` attribute
/// is always emitted, as an empty string when the source image had none.
pub fn wrap_images(body: &str) -> String {
    static IMG: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"<img src="([^"]*)" alt="([^"]*)"(?: title="([^"]*)")?\s*/?>"#).unwrap()
    });

    IMG.replace_all(
        body,
        r#"<div class="image-container"><img src="${1}" alt="${2}" title="${3}"></div>"#,
    )
    .into_owned()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_convert_embed() {
        assert_eq!(
            convert_obsidian_embeds("before ![[photo.png]] after"),
            "before \n\n![photo.png](../posts/photo.png)\n\n after",
        );
    }

    #[test]
    fn test_convert_embed_percent_encodes() {
        assert_eq!(
            convert_obsidian_embeds("![[my photo.png]]"),
            "\n\n![my photo.png](../posts/my%20photo.png)\n\n",
        );
    }

    #[test]
    fn test_convert_embed_trims_name() {
        assert_eq!(
            convert_obsidian_embeds("![[ photo.png ]]"),
            "\n\n![photo.png](../posts/photo.png)\n\n",
        );
    }

    #[test]
    fn test_wrap_image_without_title() {
        assert_eq!(
            wrap_images(r#"<p><img src="a.png" alt="a" /></p>"#),
            r#"<p><div class="image-container"><img src="a.png" alt="a" title=""></div></p>"#,
        );
    }

    #[test]
    fn test_wrap_image_with_title() {
        assert_eq!(
            wrap_images(r#"<img src="a.png" alt="a" title="hello">"#),
            r#"<div class="image-container"><img src="a.png" alt="a" title="hello"></div>"#,
        );
    }

    #[test]
    fn test_rendered_embed_never_has_undefined_title() {
        let html = to_html("![[photo.png]]");
        assert!(html.contains(
            r#"<div class="image-container"><img src="../posts/photo.png" alt="photo.png" title=""></div>"#
        ));
        assert!(!html.contains("undefined"));
    }

    #[test]
    fn test_plain_markdown() {
        assert_eq!(to_html("# Hi\n\nthere"), "<h1>Hi</h1>\n<p>there</p>\n");
    }
}
