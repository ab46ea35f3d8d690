//! Metadata record and its multi-locale wrapper.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Cast member name to avatar URL (empty when no avatar was found).
pub type ActorPhotos = BTreeMap<String, String>;

/// Metadata for one title, keyed the way the downstream consumer expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// `FC2-` followed by the normalized identifier.
    pub number: String,
    pub title: String,
    pub originaltitle: String,
    pub outline: String,
    /// Comma-separated cast names.
    pub actor: String,
    pub originalplot: String,
    pub tag: String,
    pub release: String,
    pub year: String,
    pub runtime: String,
    pub score: String,
    pub series: String,
    pub director: String,
    pub studio: String,
    pub publisher: String,
    pub source: String,
    /// URL the record was scraped from.
    pub website: String,
    pub actor_photo: ActorPhotos,
    pub thumb: String,
    pub poster: String,
    pub extrafanart: Vec<String>,
    pub trailer: String,
    pub image_download: bool,
    pub image_cut: String,
    pub mosaic: String,
    pub wanted: String,
}

/// The record every failure collapses to.
pub fn empty_record() -> Value {
    serde_json::json!({
        "title": "",
        "thumb": "",
        "website": "",
    })
}

/// One record per locale. This source is not localized, so all three are the same.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocaleRecords {
    pub zh_cn: Value,
    pub zh_tw: Value,
    pub jp: Value,
}

impl LocaleRecords {
    pub fn uniform(record: Value) -> Self {
        Self {
            zh_cn: record.clone(),
            zh_tw: record.clone(),
            jp: record,
        }
    }
}

/// `{ site: { zh_cn, zh_tw, jp } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedResult(BTreeMap<String, LocaleRecords>);

impl LocalizedResult {
    pub fn new(site: &str, record: Value) -> Self {
        let mut sites = BTreeMap::new();
        sites.insert(site.to_string(), LocaleRecords::uniform(record));
        Self(sites)
    }

    pub fn site(&self, site: &str) -> Option<&LocaleRecords> {
        self.0.get(site)
    }

    /// True when the site's record is the failure placeholder.
    pub fn is_empty_for(&self, site: &str) -> bool {
        self.site(site)
            .map(|records| records.zh_cn == empty_record())
            .unwrap_or(true)
    }
}
