// src/config/mod.rs
pub mod tracker;

pub use crate::config::tracker::{
    load_config_default, load_config_from, AssetGroup, ClassifierConfig, ClassifierKind,
    HttpConfig, TrackerConfig,
};
