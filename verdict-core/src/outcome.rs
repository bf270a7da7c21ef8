use crate::callback::ClassificationMode;

/// Per-request classification. Derived fresh for every hop, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Classified { passed: bool },
    Unclassified,
}

impl Outcome {
    #[must_use]
    pub fn classify(mode: &ClassificationMode, status: u16) -> Self {
        match mode {
            ClassificationMode::Disabled => Self::Unclassified,
            ClassificationMode::Matcher(m) => Self::Classified {
                passed: m.matches(i64::from(status)),
            },
        }
    }

    #[must_use]
    pub fn passed(self) -> Option<bool> {
        match self {
            Self::Classified { passed } => Some(passed),
            Self::Unclassified => None,
        }
    }

    /// Value of the `passed` tag, absent when unclassified.
    #[must_use]
    pub fn passed_tag(self) -> Option<&'static str> {
        self.passed().map(|p| if p { "true" } else { "false" })
    }

    /// Value for `http_req_failed`, absent when unclassified.
    #[must_use]
    pub fn failed(self) -> Option<bool> {
        self.passed().map(|p| !p)
    }
}
