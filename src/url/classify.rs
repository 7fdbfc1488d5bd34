use crate::url::{LinkKind, LinkTarget};

/// Removes a single trailing character from `href` if it is not alphanumeric
///
/// Only one character is ever removed: `"page//"` becomes `"page/"`.
///
/// # Examples
///
/// ```
/// use crawldex::url::normalize_href;
///
/// assert_eq!(normalize_href("https://ex.com/x/"), "https://ex.com/x");
/// assert_eq!(normalize_href("page2"), "page2");
/// ```
pub fn normalize_href(href: &str) -> &str {
    match href.chars().next_back() {
        Some(last) if !last.is_ascii_alphanumeric() => &href[..href.len() - last.len_utf8()],
        _ => href,
    }
}

/// Classifies an anchor href relative to the crawled domain and current document
///
/// # Classification Rules
///
/// | Normalized href | Case | Next document |
/// |-----------------|------|---------------|
/// | empty | - | skip |
/// | `https://<domain>...` | absolute-same-domain | href without `https://` |
/// | `/...` | root-relative | `domain + href` |
/// | anything not starting with `http`/`mailto` | relative | `current/href` |
/// | otherwise | - | skip |
///
/// # Arguments
///
/// * `href` - The raw `href` attribute value
/// * `domain` - The domain under crawl (e.g. `example.com`)
/// * `current_doc` - The document the href was found on (scheme-less)
///
/// # Examples
///
/// ```
/// use crawldex::url::{classify_link, LinkTarget};
///
/// let target = classify_link("/about", "ex.com", "ex.com");
/// assert_eq!(target.into_doc(), Some("ex.com/about".to_string()));
///
/// assert_eq!(classify_link("mailto:a@b.com", "ex.com", "ex.com"), LinkTarget::Skip);
/// ```
pub fn classify_link(href: &str, domain: &str, current_doc: &str) -> LinkTarget {
    if href.is_empty() {
        return LinkTarget::Skip;
    }

    let link = normalize_href(href);
    let lowered = link.to_ascii_lowercase();

    if link.starts_with(&format!("https://{}", domain)) {
        LinkTarget::Follow {
            kind: LinkKind::AbsoluteSameDomain,
            doc: link["https://".len()..].to_string(),
        }
    } else if link.starts_with('/') {
        LinkTarget::Follow {
            kind: LinkKind::RootRelative,
            doc: format!("{}{}", domain, link),
        }
    } else if !link.is_empty() && !lowered.starts_with("http") && !lowered.starts_with("mailto")
    {
        LinkTarget::Follow {
            kind: LinkKind::Relative,
            doc: format!("{}/{}", current_doc, link),
        }
    } else {
        LinkTarget::Skip
    }
}
