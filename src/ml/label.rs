//! Binary classification labels.

use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

/// Raw class code the classifier emits for spam.
pub const SPAM_CODE: i64 = 1;

/// Raw class code the classifier emits for legitimate messages.
pub const HAM_CODE: i64 = 0;

/// Outcome of classifying one message.
///
/// Serialized as `"spam"` / `"ham"`, the vocabulary of labeled SMS corpora.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// The message looks like spam or a scam.
    #[serde(rename = "spam", alias = "scam")]
    Scam,
    /// The message looks legitimate.
    #[serde(rename = "ham", alias = "not_spam")]
    LikelyNotScam,
}

impl Label {
    /// Decode a raw prediction code.
    ///
    /// Only [`SPAM_CODE`] maps to [`Label::Scam`]; every other code is treated
    /// as not spam. Codes other than 0 and 1 are logged since they point at a
    /// model trained with a different label encoding.
    pub fn from_prediction(code: i64) -> Self {
        match code {
            SPAM_CODE => Label::Scam,
            HAM_CODE => Label::LikelyNotScam,
            other => {
                warn!("Unexpected prediction code {other}; treating it as not spam");
                Label::LikelyNotScam
            }
        }
    }

    /// Raw class code used when training a classifier.
    pub fn code(&self) -> i64 {
        match self {
            Label::Scam => SPAM_CODE,
            Label::LikelyNotScam => HAM_CODE,
        }
    }

    /// Whether this label flags the message as a scam.
    pub fn is_scam(&self) -> bool {
        matches!(self, Label::Scam)
    }

    /// Text shown to the user.
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Scam => "Scam",
            Label::LikelyNotScam => "Likely Not a Scam",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
