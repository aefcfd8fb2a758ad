//! Content rewriting subsystem.
//!
//! # Data Flow
//! ```text
//! HTML body bytes
//!     → lossy UTF-8 decode
//!     → links.rs (href/src passes, relative hrefs via resolver.rs)
//!     → banner.rs (status bar after <body ...>)
//!     → UTF-8 encode
//! ```
//!
//! # Design Decisions
//! - Only bodies declared as `text/html` are rewritten; everything else passes through
//! - Invalid UTF-8 is substituted, never fatal
//! - The context is derived once per request and never mutated

pub mod banner;
pub mod links;
pub mod resolver;

use url::Url;

use crate::config::RewriteConfig;

pub use links::{LinkRewriter, PatternRewriter};

/// Per-request rewriting inputs.
#[derive(Debug, Clone)]
pub struct RewriteContext {
    /// Origin of the fetched page (`scheme://host[:port]/`).
    base: Url,
    /// Target exactly as the client supplied it.
    original_target: String,
}

impl RewriteContext {
    /// Build a context for a page fetched from `target`.
    pub fn new(target: &Url, original_target: impl Into<String>) -> Self {
        let mut base = target.clone();
        base.set_path("/");
        base.set_query(None);
        base.set_fragment(None);
        Self {
            base,
            original_target: original_target.into(),
        }
    }

    /// Parse `target` and build a context from it.
    pub fn parse(target: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(target)?;
        Ok(Self::new(&url, target))
    }

    /// Base URL relative references resolve against.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Target URL as requested by the client.
    pub fn original_target(&self) -> &str {
        &self.original_target
    }
}

/// Whether a declared content type selects the rewriting path.
pub fn is_html(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("text/html")
}

/// Link rewriting plus banner injection for HTML documents.
#[derive(Debug)]
pub struct RewritePipeline {
    links: Box<dyn LinkRewriter>,
    banner_enabled: bool,
    escape_banner_url: bool,
}

impl RewritePipeline {
    /// Build the default pipeline for a configuration.
    pub fn new(config: &RewriteConfig) -> Self {
        Self::with_rewriter(Box::new(PatternRewriter::new(config.proxy_path.clone())), config)
    }

    /// Build a pipeline around a custom link rewriter.
    pub fn with_rewriter(links: Box<dyn LinkRewriter>, config: &RewriteConfig) -> Self {
        Self {
            links,
            banner_enabled: config.banner_enabled,
            escape_banner_url: config.escape_banner_url,
        }
    }

    /// Rewrite a decoded document.
    pub fn rewrite_document(&self, html: &str, ctx: &RewriteContext) -> String {
        let rewritten = self.links.rewrite(html, ctx);
        if !self.banner_enabled {
            return rewritten;
        }

        if self.escape_banner_url {
            let escaped = html_escape::encode_text(ctx.original_target());
            banner::inject(&rewritten, &escaped)
        } else {
            banner::inject(&rewritten, ctx.original_target())
        }
    }

    /// Decode, rewrite and re-encode an HTML body.
    pub fn process(&self, body: &[u8], ctx: &RewriteContext) -> Vec<u8> {
        let html = String::from_utf8_lossy(body);
        self.rewrite_document(&html, ctx).into_bytes()
    }
}

impl Default for RewritePipeline {
    fn default() -> Self {
        Self::new(&RewriteConfig::default())
    }
}
