use std::sync::Arc;

/// Scenario identity stamped onto every sample a VU emits.
#[derive(Debug, Clone)]
pub struct MetricsContext {
    scenario: Arc<str>,
    scenario_tags: Arc<[(String, String)]>,
}

impl Default for MetricsContext {
    fn default() -> Self {
        Self::new(Arc::from("default"), Arc::from(Vec::new()))
    }
}

impl MetricsContext {
    #[must_use]
    pub fn new(scenario: Arc<str>, scenario_tags: Arc<[(String, String)]>) -> Self {
        Self {
            scenario,
            scenario_tags,
        }
    }

    #[must_use]
    pub fn scenario(&self) -> &str {
        self.scenario.as_ref()
    }

    #[must_use]
    pub fn scenario_tags(&self) -> &[(String, String)] {
        self.scenario_tags.as_ref()
    }

    /// Adds `scenario` and the scenario-level tags.
    ///
    /// - Never overrides a key already in `tags`.
    /// - Scenario-level tags named in `reserved_keys` are skipped; `scenario` itself is always
    ///   added when missing.
    pub fn merge_base_tags_if_missing(
        &self,
        tags: &mut Vec<(String, String)>,
        reserved_keys: &[&str],
    ) {
        if !tags.iter().any(|(k, _)| k == "scenario") {
            tags.push(("scenario".to_string(), self.scenario.to_string()));
        }

        for (k, v) in self.scenario_tags.iter() {
            if reserved_keys.contains(&k.as_str()) || tags.iter().any(|(ek, _)| ek == k) {
                continue;
            }
            tags.push((k.clone(), v.clone()));
        }
    }
}
