//! Link rewriting over raw HTML text.
//!
//! # Responsibilities
//! - Redirect `href`/`src` attribute values through the proxy endpoint
//! - Leave proxy links and fragment links alone
//!
//! # Design Decisions
//! - Five independent passes over the full text, in a fixed order
//! - Absolute links keep their scheme; protocol-relative links become https
//! - Relative resolution applies to `href` only, never `src`
//! - Values containing their own delimiter are not handled; the passes sit
//!   behind [`LinkRewriter`] so a tokenizer-based rewriter can replace them

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::rewrite::resolver::resolve;
use crate::rewrite::RewriteContext;

static HREF_ABSOLUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href=['"](https?)://([^'"]+)['"]"#).unwrap());

static HREF_PROTOCOL_RELATIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href=['"]//([^'"]+)['"]"#).unwrap());

static SRC_ABSOLUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"src=['"](https?)://([^'"]+)['"]"#).unwrap());

static SRC_PROTOCOL_RELATIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"src=['"]//([^'"]+)['"]"#).unwrap());

static HREF_ANY: Lazy<Regex> = Lazy::new(|| Regex::new(r#"href=['"]([^'"]+)['"]"#).unwrap());

/// Rewrites the links of an HTML document so they re-enter the proxy.
pub trait LinkRewriter: Send + Sync + std::fmt::Debug {
    /// Returns the rewritten document.
    fn rewrite(&self, html: &str, ctx: &RewriteContext) -> String;
}

/// Attribute rewriter built on literal pattern passes.
#[derive(Debug, Clone)]
pub struct PatternRewriter {
    proxy_path: String,
}

impl PatternRewriter {
    /// Create a rewriter emitting links to `proxy_path` (e.g. "/proxy").
    pub fn new(proxy_path: impl Into<String>) -> Self {
        Self {
            proxy_path: proxy_path.into(),
        }
    }

    fn proxy_link(&self, target: &str) -> String {
        format!("{}?url={}", self.proxy_path, target)
    }

    /// References pass 5 must not touch.
    fn is_exempt(&self, reference: &str) -> bool {
        reference.starts_with(self.proxy_path.as_str())
            || reference.starts_with("http://")
            || reference.starts_with("https://")
            || reference.starts_with('#')
    }

    fn rewrite_absolute(&self, text: &str, pattern: &Regex, attr: &str) -> String {
        pattern
            .replace_all(text, |caps: &Captures| {
                let target = format!("{}://{}", &caps[1], &caps[2]);
                format!(r#"{}="{}""#, attr, self.proxy_link(&target))
            })
            .into_owned()
    }

    fn rewrite_protocol_relative(&self, text: &str, pattern: &Regex, attr: &str) -> String {
        pattern
            .replace_all(text, |caps: &Captures| {
                let target = format!("https://{}", &caps[1]);
                format!(r#"{}="{}""#, attr, self.proxy_link(&target))
            })
            .into_owned()
    }

    fn rewrite_relative_hrefs(&self, text: &str, ctx: &RewriteContext) -> String {
        HREF_ANY
            .replace_all(text, |caps: &Captures| {
                let reference = &caps[1];
                if self.is_exempt(reference) {
                    return caps[0].to_string();
                }
                let resolved = resolve(ctx.base(), reference);
                format!(r#"href="{}""#, self.proxy_link(&resolved))
            })
            .into_owned()
    }
}

impl Default for PatternRewriter {
    fn default() -> Self {
        Self::new("/proxy")
    }
}

impl LinkRewriter for PatternRewriter {
    fn rewrite(&self, html: &str, ctx: &RewriteContext) -> String {
        let out = self.rewrite_absolute(html, &HREF_ABSOLUTE, "href");
        let out = self.rewrite_protocol_relative(&out, &HREF_PROTOCOL_RELATIVE, "href");
        let out = self.rewrite_absolute(&out, &SRC_ABSOLUTE, "src");
        let out = self.rewrite_protocol_relative(&out, &SRC_PROTOCOL_RELATIVE, "src");
        self.rewrite_relative_hrefs(&out, ctx)
    }
}
