//! # Post Formatter
//!
//! Renders a relayed post as the markdown body of a Matrix message.
//! Everything taken from the post (text, names, alt texts, link titles) is escaped so
//! a monitored account cannot inject markup or ping the room.

use regex::Regex;
use std::sync::LazyLock;

use crate::domain::types::Post;

static ROOM_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)@(room)\b").expect("static mention regex"));

/// Characters with inline meaning in CommonMark or HTML.
const INLINE_SPECIAL: &[char] = &['\\', '`', '*', '_', '[', ']', '<', '>', '#', '~', '|', '&', '!'];

/// Characters that only start a block (list, heading underline) at the head of a line.
const LINE_START_SPECIAL: &[char] = &['-', '+', '='];

/// Escapes untrusted text for a markdown body. `@room` gets a word joiner after the `@`
/// so it no longer matches the room notification rule.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let body = line.trim_start();
        out.push_str(&line[..line.len() - body.len()]);
        for (j, c) in body.chars().enumerate() {
            if INLINE_SPECIAL.contains(&c) || (j == 0 && LINE_START_SPECIAL.contains(&c)) {
                out.push('\\');
            }
            out.push(c);
        }
    }
    ROOM_MENTION.replace_all(&out, "@\u{2060}$1").into_owned()
}

/// Percent-encodes the characters that would end a markdown link destination early.
fn escape_url(url: &str) -> String {
    url.replace(' ', "%20")
        .replace('(', "%28")
        .replace(')', "%29")
        .replace('<', "%3C")
        .replace('>', "%3E")
}

pub struct PostFormatter;

impl PostFormatter {
    /// Renders a relayed post as a markdown notification.
    pub fn format(post: &Post) -> String {
        let author = match &post.author_display_name {
            Some(name) if !name.trim().is_empty() => {
                format!(
                    "**{}** (@{})",
                    escape_markdown(name.trim()),
                    escape_markdown(&post.author_handle)
                )
            }
            _ => format!("**@{}**", escape_markdown(&post.author_handle)),
        };

        let mut content = if post.is_repost {
            format!("🔁 {} reposted\n\n", author)
        } else {
            format!("🦋 New post from {}\n\n", author)
        };

        let text = post.text.trim();
        if text.is_empty() {
            content.push_str("> _(no text)_\n");
        } else {
            for line in text.lines() {
                content.push_str(&format!("> {}\n", escape_markdown(line)));
            }
        }

        if let Some(media) = &post.media {
            if !media.images.is_empty() {
                content.push_str(&format!("\n🖼️ {} image(s)", media.images.len()));
                let alts: Vec<String> = media
                    .images
                    .iter()
                    .map(|i| i.alt.trim())
                    .filter(|a| !a.is_empty())
                    .map(escape_markdown)
                    .collect();
                if !alts.is_empty() {
                    content.push_str(&format!(": {}", alts.join(" · ")));
                }
                content.push('\n');
            }
            if let Some(link) = &media.external {
                let title = if link.title.trim().is_empty() {
                    link.uri.as_str()
                } else {
                    link.title.trim()
                };
                content.push_str(&format!(
                    "\n🔗 [{}]({})\n",
                    escape_markdown(title),
                    escape_url(&link.uri)
                ));
            }
        }

        content.push_str(&format!(
            "\n{} · [View on Bluesky]({})",
            post.created_at.format("%Y-%m-%d %H:%M UTC"),
            escape_url(&post.url)
        ));
        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::poller::tests::post;
    use crate::domain::types::{ExternalLink, ImageRef, PostMedia};

    #[test]
    fn test_plain_post() {
        let p = post("alice.example", "p1", "hello\nworld");
        let out = PostFormatter::format(&p);
        assert!(out.starts_with("🦋 New post from **@alice.example**"));
        assert!(out.contains("> hello\n> world\n"));
        assert!(out.contains("2024-05-01 12:00 UTC"));
        assert!(out.contains("[View on Bluesky](https://bsky.app/profile/alice.example/post/p1)"));
    }

    #[test]
    fn test_display_name_and_repost() {
        let mut p = post("alice.example", "p1", "hi");
        p.author_display_name = Some("Alice".to_string());
        p.is_repost = true;
        let out = PostFormatter::format(&p);
        assert!(out.starts_with("🔁 **Alice** (@alice.example) reposted"));
    }

    #[test]
    fn test_empty_text() {
        let p = post("alice.example", "p1", "   ");
        assert!(PostFormatter::format(&p).contains("_(no text)_"));
    }

    #[test]
    fn test_media() {
        let mut p = post("alice.example", "p1", "look");
        p.media = Some(PostMedia {
            images: vec![
                ImageRef {
                    url: "https://cdn.example/1.jpg".into(),
                    alt: "a cat".into(),
                },
                ImageRef {
                    url: "https://cdn.example/2.jpg".into(),
                    alt: String::new(),
                },
            ],
            external: Some(ExternalLink {
                uri: "https://example.com/article".into(),
                title: "An article".into(),
                description: String::new(),
            }),
        });
        let out = PostFormatter::format(&p);
        assert!(out.contains("🖼️ 2 image(s): a cat"));
        assert!(out.contains("🔗 [An article](https://example.com/article)"));
    }

    #[test]
    fn test_post_text_cannot_inject_markup() {
        let p = post(
            "alice.example",
            "p1",
            "@room **urgent** [login](https://evil.example) <img src=x>",
        );
        let out = PostFormatter::format(&p);
        assert!(!out.contains("@room"));
        assert!(out.contains("@\u{2060}room"));
        assert!(out.contains(r"\*\*urgent\*\*"));
        assert!(out.contains(r"\[login\](https://evil.example)"));
        assert!(out.contains(r"\<img src=x\>"));
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("well-known, 3.5 stars"), "well-known, 3.5 stars");
        assert_eq!(escape_markdown("# heading"), r"\# heading");
        assert_eq!(escape_markdown("  - item"), r"  \- item");
        assert_eq!(escape_markdown("a_b & c"), r"a\_b \& c");
        assert_eq!(escape_markdown("hi @ROOM!"), "hi @\u{2060}ROOM\\!");
        assert_eq!(escape_markdown("mail @roomba"), "mail @roomba");
    }

    #[test]
    fn test_alt_text_and_link_title_escaped() {
        let mut p = post("alice.example", "p1", "look");
        p.author_display_name = Some("*Admin*".to_string());
        p.media = Some(PostMedia {
            images: vec![ImageRef {
                url: "https://cdn.example/1.jpg".into(),
                alt: "<b>bold</b>".into(),
            }],
            external: Some(ExternalLink {
                uri: "https://example.com/a b)".into(),
                title: "[click](https://evil.example)".into(),
                description: String::new(),
            }),
        });
        let out = PostFormatter::format(&p);
        assert!(out.contains(r"**\*Admin\*** (@alice.example)"));
        assert!(out.contains(r"\<b\>bold\</b\>"));
        assert!(out.contains(r"🔗 [\[click\](https://evil.example)](https://example.com/a%20b%29)"));
    }
}
