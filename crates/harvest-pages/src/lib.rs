//! Page assembly.
//!
//! Every page is a static HTML file with a `<!-- MESSAGE -->` marker where a
//! status notice may appear. Files are read once at startup and compiled into
//! a Tera instance: the static text is wrapped in `raw` blocks so it passes
//! through untouched, and each marker becomes an autoescaped notice snippet.

use std::collections::HashSet;
use std::path::Path;

use tera::{Context, Tera};
use tracing::{info, warn};

/// Marker substituted with the rendered notice.
pub const MESSAGE_MARKER: &str = "<!-- MESSAGE -->";

const NOTICE_SNIPPET: &str =
    r#"{% if message %}<p class="message {{ kind }}">{{ message }}</p>{% endif %}"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Index,
    Login,
    Register,
    Dashboard,
    Marketplace,
    DroneScan,
    AiChatbot,
}

impl Page {
    pub const ALL: [Page; 7] = [
        Page::Index,
        Page::Login,
        Page::Register,
        Page::Dashboard,
        Page::Marketplace,
        Page::DroneScan,
        Page::AiChatbot,
    ];

    /// File name inside the template directory. Doubles as the Tera template
    /// name, and the `.html` suffix is what turns autoescaping on.
    pub fn file_name(self) -> &'static str {
        match self {
            Page::Index => "index.html",
            Page::Login => "login.html",
            Page::Register => "register.html",
            Page::Dashboard => "dashboard.html",
            Page::Marketplace => "marketplace.html",
            Page::DroneScan => "droneScan.html",
            Page::AiChatbot => "aiChatbot.html",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
        }
    }
}

/// Status message shown at the marker position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Error,
        }
    }
}

pub struct PageAssembler {
    tera: Tera,
    loaded: HashSet<Page>,
}

impl PageAssembler {
    /// Reads every page from `dir`. Pages that can't be read or compiled are
    /// logged and later rendered as a placeholder.
    pub fn load(dir: &Path) -> Self {
        let sources = Page::ALL.into_iter().filter_map(|page| {
            let path = dir.join(page.file_name());
            match std::fs::read_to_string(&path) {
                Ok(source) => Some((page, source)),
                Err(e) => {
                    warn!("Failed to load template {}: {}", path.display(), e);
                    None
                }
            }
        });

        let assembler = Self::from_sources(sources);
        info!(
            "Loaded {}/{} page templates from {}",
            assembler.loaded.len(),
            Page::ALL.len(),
            dir.display()
        );
        assembler
    }

    pub fn from_sources<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = (Page, S)>,
        S: AsRef<str>,
    {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);
        let mut loaded = HashSet::new();

        for (page, source) in sources {
            match tera.add_raw_template(page.file_name(), &compile(source.as_ref())) {
                Ok(()) => {
                    loaded.insert(page);
                }
                Err(e) => warn!("Failed to compile template {}: {}", page.file_name(), e),
            }
        }

        Self { tera, loaded }
    }

    pub fn is_loaded(&self, page: Page) -> bool {
        self.loaded.contains(&page)
    }

    /// Renders `page` with an optional notice. Never fails: an unavailable
    /// page yields a placeholder document.
    pub fn render(&self, page: Page, notice: Option<&Notice>) -> String {
        if !self.is_loaded(page) {
            return placeholder(page);
        }

        let mut context = Context::new();
        match notice {
            Some(notice) => {
                context.insert("message", &notice.text);
                context.insert("kind", notice.kind.as_str());
            }
            None => {
                context.insert("message", "");
                context.insert("kind", "");
            }
        }

        self.tera
            .render(page.file_name(), &context)
            .unwrap_or_else(|e| {
                warn!("Failed to render {}: {}", page.file_name(), e);
                placeholder(page)
            })
    }
}

/// Turns a marker template into Tera source. Literal text goes into `raw`
/// blocks so braces in the HTML never reach the Tera parser.
fn compile(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + 64);
    for (i, literal) in source.split(MESSAGE_MARKER).enumerate() {
        if i > 0 {
            out.push_str(NOTICE_SNIPPET);
        }
        if !literal.is_empty() {
            out.push_str("{% raw %}");
            out.push_str(literal);
            out.push_str("{% endraw %}");
        }
    }
    out
}

fn placeholder(page: Page) -> String {
    format!(
        "<h1>Page unavailable</h1><p>Template {} could not be loaded.</p>",
        page.file_name()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assembler(source: &str) -> PageAssembler {
        PageAssembler::from_sources([(Page::Index, source)])
    }

    #[test]
    fn test_render_with_message() {
        let pages = assembler("<p><!-- MESSAGE --></p>");
        let html = pages.render(Page::Index, Some(&Notice::success("Hi")));
        assert_eq!(html, "<p><p class=\"message success\">Hi</p></p>");
    }

    #[test]
    fn test_render_without_message() {
        let pages = assembler("<p><!-- MESSAGE --></p>");
        assert_eq!(pages.render(Page::Index, None), "<p></p>");
        assert_eq!(pages.render(Page::Index, Some(&Notice::error(""))), "<p></p>");
    }

    #[test]
    fn test_message_is_escaped() {
        let pages = assembler("<div><!-- MESSAGE --></div>");
        let html = pages.render(Page::Index, Some(&Notice::error("<b>x</b> & \"y\"")));
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;b&gt;x"));
        assert!(html.contains("&amp;"));
        assert!(html.contains("&quot;y&quot;"));
        assert!(html.starts_with("<div><p class=\"message error\">"));
    }

    #[test]
    fn test_static_text_passes_through() {
        let source = "<style>a { color: red; }</style>{{ not_a_var }}{% if x %}<!-- MESSAGE -->{# c #}";
        let pages = assembler(source);
        assert_eq!(
            pages.render(Page::Index, None),
            "<style>a { color: red; }</style>{{ not_a_var }}{% if x %}{# c #}"
        );
    }

    #[test]
    fn test_every_marker_is_replaced() {
        let pages = assembler("<!-- MESSAGE -->|<!-- MESSAGE -->");
        let html = pages.render(Page::Index, Some(&Notice::success("ok")));
        assert_eq!(
            html,
            "<p class=\"message success\">ok</p>|<p class=\"message success\">ok</p>"
        );
    }

    #[test]
    fn test_template_without_marker() {
        let pages = assembler("<h1>Farm</h1>");
        assert_eq!(
            pages.render(Page::Index, Some(&Notice::success("ignored"))),
            "<h1>Farm</h1>"
        );
    }

    #[test]
    fn test_missing_page_renders_placeholder() {
        let pages = assembler("<h1>Farm</h1>");
        assert!(!pages.is_loaded(Page::DroneScan));
        let html = pages.render(Page::DroneScan, None);
        assert!(html.contains("Page unavailable"));
        assert!(html.contains("droneScan.html"));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("login.html"),
            "<form><!-- MESSAGE --></form>",
        )
        .unwrap();

        let pages = PageAssembler::load(dir.path());
        assert!(pages.is_loaded(Page::Login));
        assert!(!pages.is_loaded(Page::Register));
        assert_eq!(
            pages.render(Page::Login, Some(&Notice::error("Invalid username or password."))),
            "<form><p class=\"message error\">Invalid username or password.</p></form>"
        );
        assert!(pages.render(Page::Register, None).contains("Page unavailable"));
    }
}
