//! Collection envelope returned by list endpoints

use serde::Deserialize;
use std::collections::HashMap;

/// Documents list returned by list endpoints
///
/// `documents` is keyed by each resource's self link; `links` carries the
/// order the service sorted them in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentsList<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default = "HashMap::new")]
    pub documents: HashMap<String, T>,
}

impl<T> DocumentsList<T> {
    /// Consume the envelope, keeping the service's order
    ///
    /// Documents missing from `links` are appended sorted by link.
    pub fn into_ordered(mut self) -> Vec<T> {
        let mut ordered = Vec::with_capacity(self.documents.len());
        for link in &self.links {
            if let Some(document) = self.documents.remove(link) {
                ordered.push(document);
            }
        }

        let mut rest: Vec<(String, T)> = self.documents.into_iter().collect();
        rest.sort_by(|a, b| a.0.cmp(&b.0));
        ordered.extend(rest.into_iter().map(|(_, document)| document));
        ordered
    }
}
