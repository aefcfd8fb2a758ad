//! Status banner injection.

/// Renders the banner fragment for `displayed_url`.
///
/// The URL is embedded as given; callers that want escaping do it first.
pub fn banner_fragment(displayed_url: &str) -> String {
    format!(
        r#"
            <div id="internet3-banner" style="position: fixed; top: 0; left: 0; right: 0; 
                                          background-color: rgba(0,0,0,0.8); color: white; 
                                          padding: 10px; font-family: Arial; z-index: 9999; 
                                          display: flex; justify-content: space-between;">
                <span>Internet 3.0 - Navegando em: <strong>{url}</strong></span>
                <a href="/" style="color: white; text-decoration: underline;">Voltar ao Internet 3.0</a>
            </div>
            <style>
                body {{ padding-top: 40px; }}
            </style>
            "#,
        url = displayed_url
    )
}

/// Insert the banner right after the opening `<body ...>` tag, or at the
/// start of the document when there is none.
pub fn inject(html: &str, displayed_url: &str) -> String {
    insert_fragment(html, &banner_fragment(displayed_url))
}

/// Insert `fragment` at the banner position of `html`.
///
/// A `<body` with no closing `>` puts the fragment at offset 0.
pub fn insert_fragment(html: &str, fragment: &str) -> String {
    let offset = html
        .find("<body")
        .and_then(|start| html[start..].find('>').map(|end| start + end + 1))
        .unwrap_or(0);

    let mut out = String::with_capacity(html.len() + fragment.len());
    out.push_str(&html[..offset]);
    out.push_str(fragment);
    out.push_str(&html[offset..]);
    out
}
