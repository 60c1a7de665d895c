//! Field extraction from loosely-formed markup.
//!
//! Uses the `scraper` crate (html5ever) so unclosed tags, stray closing tags
//! and odd nesting are repaired by the parser instead of aborting the page.

use indexmap::IndexMap;
use scraper::{Html, Selector};
use std::collections::HashMap;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::types::field::{FieldId, FieldValue};
use crate::types::target::DEFAULT_TAG;

/// Reads field values out of elements of one tag kind, keyed by `id`.
#[derive(Debug, Clone)]
pub struct Extractor {
    tag: String,
    selector: Selector,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            tag: DEFAULT_TAG.to_string(),
            selector: Selector::parse(DEFAULT_TAG).expect("default tag is a valid selector"),
        }
    }
}

impl Extractor {
    /// Create an extractor scoped to `tag` elements.
    pub fn new(tag: &str) -> ConfigResult<Self> {
        let selector = Selector::parse(tag).map_err(|_| ConfigError::InvalidTag(tag.to_string()))?;
        Ok(Self {
            tag: tag.to_string(),
            selector,
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Extract one value per requested field, in the order given.
    ///
    /// The first element whose `id` matches wins. A field with no matching
    /// element is `Missing`; other fields are unaffected.
    pub fn extract<'a>(
        &self,
        content: &str,
        fields: impl IntoIterator<Item = &'a FieldId>,
    ) -> IndexMap<FieldId, FieldValue> {
        let document = Html::parse_document(content);

        let mut by_id: HashMap<&str, String> = HashMap::new();
        for element in document.select(&self.selector) {
            if let Some(id) = element.value().id() {
                by_id
                    .entry(id)
                    .or_insert_with(|| element.text().collect::<String>().trim().to_string());
            }
        }

        let values: IndexMap<FieldId, FieldValue> = fields
            .into_iter()
            .map(|field| {
                let value = match by_id.get(field.as_str()) {
                    Some(text) => FieldValue::Present(text.clone()),
                    None => FieldValue::Missing(*field),
                };
                (*field, value)
            })
            .collect();

        debug!(
            tag = %self.tag,
            candidates = by_id.len(),
            requested = values.len(),
            missing = values.values().filter(|v| v.is_missing()).count(),
            "Extracted fields"
        );

        values
    }
}
