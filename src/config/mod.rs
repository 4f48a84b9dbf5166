//! Configuration management for Trall.

mod settings;

pub use settings::{
    CatalogSettings, GeneralSettings, PlaybackSettings, SessionSettings, Settings, UploadSettings,
};
