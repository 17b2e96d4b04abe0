//! Feature flags derived from the configuration.
//!
//! A flag's value comes from the resolved [`VisualizationConfig`] unless a
//! runtime override was set. Overrides never touch the configuration itself.

use crate::config::VisualizationConfig;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    Heatmap,
    Treemap,
    GithubIntegration,
    ExternalApis,
    AdvancedTooltips,
    ZoomFunctionality,
    TagHierarchy,
}

impl Feature {
    pub const ALL: [Feature; 7] = [
        Feature::Heatmap,
        Feature::Treemap,
        Feature::GithubIntegration,
        Feature::ExternalApis,
        Feature::AdvancedTooltips,
        Feature::ZoomFunctionality,
        Feature::TagHierarchy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Feature::Heatmap => "heatmap",
            Feature::Treemap => "treemap",
            Feature::GithubIntegration => "github_integration",
            Feature::ExternalApis => "external_apis",
            Feature::AdvancedTooltips => "advanced_tooltips",
            Feature::ZoomFunctionality => "zoom_functionality",
            Feature::TagHierarchy => "tag_hierarchy",
        }
    }

    /// Value implied by the configuration alone.
    pub fn configured(self, config: &VisualizationConfig) -> bool {
        match self {
            Feature::Heatmap => config.heatmap.enabled,
            Feature::Treemap => config.treemap.enabled,
            Feature::GithubIntegration => {
                config.external.github.as_ref().is_some_and(|g| g.enabled)
            }
            Feature::ExternalApis => config.external.any_enabled(),
            Feature::AdvancedTooltips => config.heatmap.show_tooltips,
            Feature::ZoomFunctionality => config.treemap.enable_zoom,
            Feature::TagHierarchy => config.treemap.hierarchical,
        }
    }

    /// Whether code for this feature belongs in the build at all.
    ///
    /// A configured-but-disabled GitHub block is still included so it can be
    /// switched on at runtime.
    pub fn include_in_build(self, config: &VisualizationConfig) -> bool {
        match self {
            Feature::Heatmap => config.heatmap.enabled,
            Feature::Treemap => config.treemap.enabled,
            Feature::GithubIntegration => config.external.github.is_some(),
            _ => true,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| format!("unknown feature '{s}'"))
    }
}

/// Configuration-backed flags with runtime overrides.
#[derive(Debug, Clone)]
pub struct FeatureFlags {
    config: VisualizationConfig,
    overrides: BTreeMap<Feature, bool>,
}

impl FeatureFlags {
    pub fn new(config: VisualizationConfig) -> Self {
        Self {
            config,
            overrides: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &VisualizationConfig {
        &self.config
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.overrides
            .get(&feature)
            .copied()
            .unwrap_or_else(|| feature.configured(&self.config))
    }

    pub fn set_override(&mut self, feature: Feature, enabled: bool) {
        self.overrides.insert(feature, enabled);
    }

    pub fn remove_override(&mut self, feature: Feature) {
        self.overrides.remove(&feature);
    }

    pub fn clear_overrides(&mut self) {
        self.overrides.clear();
    }

    pub fn overrides(&self) -> &BTreeMap<Feature, bool> {
        &self.overrides
    }

    pub fn set_all(&mut self, enabled: bool) {
        for feature in Feature::ALL {
            self.overrides.insert(feature, enabled);
        }
    }

    pub fn enabled_features(&self) -> Vec<Feature> {
        Feature::ALL
            .into_iter()
            .filter(|f| self.is_enabled(*f))
            .collect()
    }

    /// Every feature with its effective value, in declaration order.
    pub fn status(&self) -> Vec<(Feature, bool)> {
        Feature::ALL
            .into_iter()
            .map(|f| (f, self.is_enabled(f)))
            .collect()
    }

    pub fn should_include_in_build(&self, feature: Feature) -> bool {
        feature.include_in_build(&self.config)
    }
}
