//! Data models for scraped metadata.

mod record;

pub use record::{empty_record, ActorPhotos, LocaleRecords, LocalizedResult, MovieRecord};
