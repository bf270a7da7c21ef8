use std::sync::Arc;

use crate::status::StatusMatcher;

/// A response-callback setting, either per request or VU-wide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResponseCallback {
    /// Defer to the next level: the VU override for a request, the engine default for a VU.
    #[default]
    UseResolvedDefault,
    Matcher(Arc<StatusMatcher>),
    /// Do not classify at all.
    Disabled,
}

impl ResponseCallback {
    /// Maps the script-side nullable form: a matcher installs it, nothing disables.
    #[must_use]
    pub fn from_optional(matcher: Option<Arc<StatusMatcher>>) -> Self {
        match matcher {
            Some(m) => Self::Matcher(m),
            None => Self::Disabled,
        }
    }
}

/// How one request is classified once every override has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationMode {
    Matcher(Arc<StatusMatcher>),
    Disabled,
}

/// The VU-wide override slot. Owned by exactly one VU.
#[derive(Debug, Clone, Default)]
pub struct VuCallbackState {
    active: ResponseCallback,
}

impl VuCallbackState {
    pub fn set(&mut self, callback: ResponseCallback) {
        self.active = callback;
    }

    /// Back to the engine default.
    pub fn reset(&mut self) {
        self.active = ResponseCallback::UseResolvedDefault;
    }

    #[must_use]
    pub fn current(&self) -> &ResponseCallback {
        &self.active
    }
}

/// Precedence: per-request setting, then the VU override, then `default`.
#[must_use]
pub fn resolve(
    default: &Arc<StatusMatcher>,
    vu: &VuCallbackState,
    per_request: &ResponseCallback,
) -> ClassificationMode {
    match per_request {
        ResponseCallback::Disabled => ClassificationMode::Disabled,
        ResponseCallback::Matcher(m) => ClassificationMode::Matcher(m.clone()),
        ResponseCallback::UseResolvedDefault => match vu.current() {
            ResponseCallback::Disabled => ClassificationMode::Disabled,
            ResponseCallback::Matcher(m) => ClassificationMode::Matcher(m.clone()),
            ResponseCallback::UseResolvedDefault => ClassificationMode::Matcher(default.clone()),
        },
    }
}
