//! The engine's configuration tree: one struct per controller plus the
//! shared scroll targeting, every selector the page contract consists of in
//! one place. `Default` matches the documented markup conventions.

use pagewire_controllers::{
    A11yConfig, FormConfig, ModalConfig, NavConfig, ObserveConfig, ScrollConfig,
};

/// Everything the engine needs to know about a page, validated by each
/// controller at bind time.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "config-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    pub nav: NavConfig,
    pub observe: ObserveConfig,
    pub modal: ModalConfig,
    pub form: FormConfig,
    pub a11y: A11yConfig,
    pub scroll: ScrollConfig,
}
