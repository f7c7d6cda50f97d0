//! Markdown to HTML rendering with heading anchors
//!
//! Every h1-h4 heading gets an `id` derived with [`slugify`] from its plain
//! text, the same derivation the section registry uses. h5 and h6 headings
//! are rendered without an id.
//!
//! Fenced code blocks tagged with a language syntect knows are highlighted
//! into `hl-` prefixed classes styled by [`highlight_css`]. Untagged blocks and
//! unknown languages are left as plain `<pre><code>`.

use crate::html::escape_html;
use crate::slug::slugify;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::sync::OnceLock;
use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// Deepest heading level that receives an anchor id
const MAX_ANCHORED_LEVEL: usize = 4;

/// Result of rendering one Markdown document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedPage {
    /// HTML body fragment
    pub html: String,

    /// Anchor ids assigned to headings, in document order
    pub anchors: Vec<String>,

    /// Plain text of the first h1, if any
    pub title: Option<String>,
}

impl RenderedPage {
    /// Whether an element with this id was rendered
    pub fn has_anchor(&self, id: &str) -> bool {
        self.anchors.iter().any(|a| a == id)
    }
}

/// Theme the highlight stylesheet is generated from
const HIGHLIGHT_THEME: &str = "base16-ocean.dark";

const HIGHLIGHT_CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAXES: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAXES.get_or_init(SyntaxSet::load_defaults_newlines)
}

/// Stylesheet for highlighted code blocks
///
/// Empty if the bundled theme cannot be turned into CSS.
pub fn highlight_css() -> &'static str {
    static CSS: OnceLock<String> = OnceLock::new();
    CSS.get_or_init(|| {
        let themes = ThemeSet::load_defaults();
        let Some(theme) = themes.themes.get(HIGHLIGHT_THEME) else {
            log::warn!("Highlight theme {} is not bundled", HIGHLIGHT_THEME);
            return String::new();
        };
        css_for_theme_with_class_style(theme, HIGHLIGHT_CLASS_STYLE).unwrap_or_else(|e| {
            log::warn!("Failed to generate highlight CSS: {}", e);
            String::new()
        })
    })
}

/// Highlight `code` as `language`; `None` when the language is unknown
///
/// # Parameters
/// * `language` - Info-string token such as `rust`, `py` or `bash`
/// * `code` - Raw contents of the code block
///
/// # Returns
/// * `Some(String)` - HTML spans for the code, without the `<pre>` wrapper
/// * `None` - No syntax matches the language, or highlighting failed
pub fn highlight_code(language: &str, code: &str) -> Option<String> {
    let syntaxes = syntax_set();
    let syntax = syntaxes.find_syntax_by_token(language)?;
    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, syntaxes, HIGHLIGHT_CLASS_STYLE);
    for line in LinesWithEndings::from(code) {
        if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
            log::debug!("Highlighting {} failed: {}", language, e);
            return None;
        }
    }
    Some(generator.finalize())
}

/// Language token of a fenced block's info string (`rust,ignore` -> `rust`)
fn fence_language(info: &str) -> Option<&str> {
    info.split(|c: char| c.is_whitespace() || c == ',')
        .next()
        .filter(|lang| !lang.is_empty())
}

/// Fenced code block being collected until its end tag
struct PendingCode<'a> {
    language: String,
    code: String,
    events: Vec<Event<'a>>,
}

/// Heading being collected until its end tag
struct PendingHeading<'a> {
    level: usize,
    text: String,
    events: Vec<Event<'a>>,
}

fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Render Markdown to HTML, assigning anchor ids to h1-h4
pub fn render_markdown(content: &str) -> RenderedPage {
    let parser = Parser::new_ext(content, markdown_options());

    let mut events: Vec<Event<'_>> = Vec::new();
    let mut anchors = Vec::new();
    let mut title = None;
    let mut pending: Option<PendingHeading<'_>> = None;
    let mut pending_code: Option<PendingCode<'_>> = None;

    for event in parser {
        if pending_code.is_some() {
            if let Event::End(TagEnd::CodeBlock) = event {
                let Some(block) = pending_code.take() else {
                    continue;
                };
                match highlight_code(&block.language, &block.code) {
                    Some(highlighted) => events.push(Event::Html(CowStr::from(format!(
                        "<pre class=\"highlight\"><code class=\"language-{}\">{}</code></pre>\n",
                        escape_html(&block.language),
                        highlighted
                    )))),
                    None => {
                        events.extend(block.events);
                        events.push(Event::End(TagEnd::CodeBlock));
                    }
                }
            } else if let Some(block) = pending_code.as_mut() {
                if let Event::Text(text) = &event {
                    block.code.push_str(text);
                }
                block.events.push(event);
            }
            continue;
        }

        let fenced_language = match &event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                fence_language(info).map(str::to_string)
            }
            _ => None,
        };
        if let Some(language) = fenced_language {
            pending_code = Some(PendingCode {
                language,
                code: String::new(),
                events: vec![event],
            });
            continue;
        }

        match event {
            Event::Start(Tag::Heading { level, .. }) if (level as usize) <= MAX_ANCHORED_LEVEL => {
                pending = Some(PendingHeading {
                    level: level as usize,
                    text: String::new(),
                    events: Vec::new(),
                });
            }
            Event::End(TagEnd::Heading(_)) if pending.is_some() => {
                let Some(heading) = pending.take() else {
                    continue;
                };
                let id = slugify(&heading.text);

                if heading.level == 1 && title.is_none() {
                    title = Some(heading.text.trim().to_string());
                }

                events.push(Event::Html(CowStr::from(format!(
                    "<h{} id=\"{}\">",
                    heading.level, id
                ))));
                events.extend(heading.events);
                events.push(Event::Html(CowStr::from(format!(
                    "</h{}>\n",
                    heading.level
                ))));
                anchors.push(id);
            }
            other => match pending.as_mut() {
                Some(heading) => {
                    if let Event::Text(text) | Event::Code(text) = &other {
                        heading.text.push_str(text);
                    }
                    heading.events.push(other);
                }
                None => events.push(other),
            },
        }
    }

    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, events.into_iter());

    RenderedPage {
        html,
        anchors,
        title,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SectionRegistry;

    #[test]
    fn test_headings_get_slug_ids() {
        let page = render_markdown("# Quickstart\n\n## 1. Create an Account\n\nSign up.\n");
        assert!(page.html.contains("<h1 id=\"quickstart\">Quickstart</h1>"));
        assert!(page
            .html
            .contains("<h2 id=\"1-create-an-account\">1. Create an Account</h2>"));
        assert_eq!(page.anchors, vec!["quickstart", "1-create-an-account"]);
        assert_eq!(page.title.as_deref(), Some("Quickstart"));
    }

    #[test]
    fn test_inline_formatting_kept_in_heading() {
        let page = render_markdown("## Rules of **Engagement** (RoE)\n");
        assert!(page.html.contains(
            "<h2 id=\"rules-of-engagement-roe\">Rules of <strong>Engagement</strong> (RoE)</h2>"
        ));
    }

    #[test]
    fn test_deep_headings_have_no_id() {
        let page = render_markdown("#### Four\n\n##### Five\n\n###### Six\n");
        assert!(page.html.contains("<h4 id=\"four\">Four</h4>"));
        assert!(page.html.contains("<h5>Five</h5>"));
        assert!(page.html.contains("<h6>Six</h6>"));
        assert_eq!(page.anchors, vec!["four"]);
    }

    #[test]
    fn test_registry_ids_match_rendered_anchors() {
        let content = "# Scans\n\n## Configuration\n\n### Rules of Engagement (RoE)\n\n### Max Iterations\n\n## Scan Lifecycle\n";
        let page = render_markdown(content);
        let registry = SectionRegistry::from_document(content);

        for heading in &registry {
            assert!(page.has_anchor(&heading.id), "missing anchor {}", heading.id);
        }
    }

    #[test]
    fn test_fenced_code_is_highlighted() {
        let page = render_markdown("```rust\nfn main() {}\n```\n");
        assert!(page
            .html
            .contains("<pre class=\"highlight\"><code class=\"language-rust\">"));
        assert!(page.html.contains("<span class=\"hl-source hl-rust\">"));
        assert!(page.html.contains("hl-storage"));
        assert!(!page.html.contains("<pre><code"));
    }

    #[test]
    fn test_highlighted_code_is_escaped() {
        let page = render_markdown("```python\nif a < b and c > d:\n    pass\n```\n");
        assert!(page.html.contains("hl-python"));
        assert!(page.html.contains("&lt;"));
        assert!(!page.html.contains("a < b"));
    }

    #[test]
    fn test_unknown_or_missing_language_is_plain() {
        let page = render_markdown("```nosuchlang\nx = 1\n```\n\n```\nplain\n```\n");
        assert!(page
            .html
            .contains("<pre><code class=\"language-nosuchlang\">x = 1\n</code></pre>"));
        assert!(page.html.contains("<pre><code>plain\n</code></pre>"));
        assert!(!page.html.contains("hl-"));
    }

    #[test]
    fn test_fence_language() {
        assert_eq!(fence_language("rust"), Some("rust"));
        assert_eq!(fence_language("rust,ignore"), Some("rust"));
        assert_eq!(fence_language("sh title=run"), Some("sh"));
        assert_eq!(fence_language(""), None);
    }

    #[test]
    fn test_highlight_css_uses_prefixed_classes() {
        let css = highlight_css();
        assert!(!css.is_empty());
        assert!(css.contains(".hl-"));
    }

    #[test]
    fn test_code_blocks_and_tables() {
        let content = "```rust\nfn main() {}\n```\n\n| a | b |\n|---|---|\n| 1 | 2 |\n";
        let page = render_markdown(content);
        assert!(page.html.contains("<code class=\"language-rust\">"));
        assert!(page.html.contains("<table>"));
        assert!(page.anchors.is_empty());
        assert!(page.title.is_none());
    }
}
