//! HTML parser for extracting anchor hrefs
//!
//! Hrefs are returned raw, in document order; deciding which of them to follow
//! is the link classifier's job.

use scraper::{Html, Selector};

/// Extracts the `href` attribute of every `<a>` element in the document
///
/// Anchors without an `href` attribute are ignored. Empty attributes are
/// returned as empty strings. Content that is not HTML (PDF bytes decoded
/// lossily, plain text) simply yields no anchors.
///
/// # Arguments
///
/// * `html` - The document content
///
/// # Returns
///
/// * `Ok(Vec<String>)` - The hrefs in document order
/// * `Err(String)` - The anchor selector could not be built
///
/// # Example
///
/// ```
/// use crawldex::crawler::extract_hrefs;
///
/// let html = r#"<html><body><a href="/page">Link</a><a>none</a></body></html>"#;
/// assert_eq!(extract_hrefs(html).unwrap(), vec!["/page".to_string()]);
/// ```
pub fn extract_hrefs(html: &str) -> Result<Vec<String>, String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").map_err(|e| format!("invalid selector: {:?}", e))?;

    Ok(document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect())
}
