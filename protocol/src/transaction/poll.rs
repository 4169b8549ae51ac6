//! Poll operations: creating polls, voting, and vote delegation.
//!
//! Delegation lets a citizen hand their vote on a set of topics to someone
//! else for a period of time. The delegatee can accept or reject each
//! request (or accept all pending ones at once), and the delegator can
//! withdraw it.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{
    Boolean, ByteReader, ChainArray, ChainDecode, ChainMap, ChainString, ChainTime, ChainValue,
    ObjectId, UInt32, ValidationError,
};

use super::operation::ChainObject;

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Languages the chain stores localized text in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Russian,
    Romanian,
    English,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Russian, Language::Romanian, Language::English];

    pub fn code(self) -> u8 {
        match self {
            Self::Russian => 0,
            Self::Romanian => 1,
            Self::English => 2,
        }
    }

    pub fn from_code(code: u8) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|language| language.code() == code)
            .ok_or(ValidationError::UnknownCode {
                type_name: "Language",
                code: u64::from(code),
            })
    }

    /// ISO 639-1 code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Russian => "ru",
            Self::Romanian => "ro",
            Self::English => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encoded as a `UInt8` map key.
impl ChainValue for Language {
    fn value(&self) -> Value {
        Value::from(self.code())
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.push(self.code());
    }
}

impl ChainDecode for Language {
    fn read(reader: &mut ByteReader<'_>) -> Result<Self, ValidationError> {
        Self::from_code(reader.read_u8("Language")?)
    }
}

/// Text in several languages, one entry per language.
pub type LocalizedText = ChainMap<Language, ChainString>;

/// Builds a [`LocalizedText`] from `(language, text)` pairs.
pub fn localized<S: Into<String>>(
    entries: impl IntoIterator<Item = (Language, S)>,
) -> Result<LocalizedText, ValidationError> {
    ChainMap::new(
        entries
            .into_iter()
            .map(|(language, text)| (language, ChainString::new(text)))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// PollCreate
// ---------------------------------------------------------------------------

/// One answer option of a poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollVariant {
    content: LocalizedText,
    weight: UInt32,
}

impl PollVariant {
    /// `weight` orders the options for display, lower first. The content
    /// needs at least one language.
    pub fn new(content: LocalizedText, weight: u32) -> Result<Self, ValidationError> {
        if content.is_empty() {
            return Err(ValidationError::EmptyCollection("poll variant content"));
        }
        Ok(Self {
            content,
            weight: weight.into(),
        })
    }

    pub fn content(&self) -> &LocalizedText {
        &self.content
    }

    pub fn weight(&self) -> u32 {
        self.weight.get()
    }
}

impl ChainObject for PollVariant {
    fn visit_fields(&self, visit: &mut dyn FnMut(&'static str, &dyn ChainValue)) {
        visit("content", &self.content);
        visit("weight", &self.weight);
    }
}

impl ChainValue for PollVariant {
    fn value(&self) -> Value {
        Value::Object(self.field_values())
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        self.write_fields(out)
    }
}

/// Opens a new poll. Signed with the owner key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollCreate {
    pub account: ObjectId,
    pub title: LocalizedText,
    pub topic: ObjectId,
    pub start_date: ChainTime,
    pub end_date: ChainTime,
    pub content: LocalizedText,
    pub variants: ChainArray<PollVariant>,
    pub delegation_allowed: Boolean,
    /// Whether voting requires a mobile signature.
    pub sign_required: Boolean,
}

impl ChainObject for PollCreate {
    fn visit_fields(&self, visit: &mut dyn FnMut(&'static str, &dyn ChainValue)) {
        visit("account", &self.account);
        visit("title", &self.title);
        visit("topic", &self.topic);
        visit("start_date", &self.start_date);
        visit("end_date", &self.end_date);
        visit("content", &self.content);
        visit("variants", &self.variants);
        visit("delegation_allowed", &self.delegation_allowed);
        visit("sign_required", &self.sign_required);
    }
}

// ---------------------------------------------------------------------------
// Voting
// ---------------------------------------------------------------------------

/// Votes for `variant`. Signed with the active key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollVote {
    pub account: ObjectId,
    pub variant: ObjectId,
}

impl ChainObject for PollVote {
    fn visit_fields(&self, visit: &mut dyn FnMut(&'static str, &dyn ChainValue)) {
        visit("account", &self.account);
        visit("variant", &self.variant);
    }
}

/// Asks `delegatee` to vote on `topics` for `delegator` between the two
/// dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollVoteDelegationCreate {
    pub topics: ChainArray<ObjectId>,
    pub delegator: ObjectId,
    pub delegatee: ObjectId,
    pub start_date: ChainTime,
    pub end_date: ChainTime,
}

impl ChainObject for PollVoteDelegationCreate {
    fn visit_fields(&self, visit: &mut dyn FnMut(&'static str, &dyn ChainValue)) {
        visit("topics", &self.topics);
        visit("delegator", &self.delegator);
        visit("delegatee", &self.delegatee);
        visit("start_date", &self.start_date);
        visit("end_date", &self.end_date);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollVoteDelegationWithdraw {
    pub delegation: ObjectId,
    pub delegator: ObjectId,
}

impl ChainObject for PollVoteDelegationWithdraw {
    fn visit_fields(&self, visit: &mut dyn FnMut(&'static str, &dyn ChainValue)) {
        visit("delegation", &self.delegation);
        visit("delegator", &self.delegator);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollVoteDelegationAccept {
    pub delegation: ObjectId,
    pub delegatee: ObjectId,
}

impl ChainObject for PollVoteDelegationAccept {
    fn visit_fields(&self, visit: &mut dyn FnMut(&'static str, &dyn ChainValue)) {
        visit("delegation", &self.delegation);
        visit("delegatee", &self.delegatee);
    }
}

/// Accepts every pending delegation addressed to `delegatee`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollVoteDelegationAcceptAll {
    pub delegatee: ObjectId,
}

impl ChainObject for PollVoteDelegationAcceptAll {
    fn visit_fields(&self, visit: &mut dyn FnMut(&'static str, &dyn ChainValue)) {
        visit("delegatee", &self.delegatee);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollVoteDelegationReject {
    pub delegation: ObjectId,
    pub delegatee: ObjectId,
}

impl ChainObject for PollVoteDelegationReject {
    fn visit_fields(&self, visit: &mut dyn FnMut(&'static str, &dyn ChainValue)) {
        visit("delegation", &self.delegation);
        visit("delegatee", &self.delegatee);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Operation;
    use serde_json::json;

    fn id(text: &str) -> ObjectId {
        text.parse().unwrap()
    }

    fn time(text: &str) -> ChainTime {
        text.parse().unwrap()
    }

    #[test]
    fn language_codes_and_names() {
        assert_eq!(Language::from_code(2).unwrap(), Language::English);
        assert!(Language::from_code(3).is_err());
        assert_eq!(Language::Romanian.to_string(), "ro");
        assert_eq!(Language::Russian.bytes(), "00");
    }

    #[test]
    fn localized_text_rejects_duplicate_languages() {
        let err = localized([(Language::English, "a"), (Language::English, "b")]).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateKey(_)));
    }

    #[test]
    fn variant_requires_content() {
        let err = PollVariant::new(LocalizedText::default(), 1).unwrap_err();
        assert_eq!(err, ValidationError::EmptyCollection("poll variant content"));
    }

    #[test]
    fn variant_layout() {
        let variant = PollVariant::new(localized([(Language::English, "Yes")]).unwrap(), 1).unwrap();
        assert_eq!(variant.bytes(), "01020359657301000000");
        assert_eq!(variant.value(), json!({"content": [[2, "Yes"]], "weight": 1}));
    }

    #[test]
    fn poll_create_value() {
        let yes = PollVariant::new(localized([(Language::English, "Yes")]).unwrap(), 0).unwrap();
        let no = PollVariant::new(localized([(Language::English, "No")]).unwrap(), 1).unwrap();
        let op = Operation::from(PollCreate {
            account: id("1.2.17"),
            title: localized([(Language::English, "Park"), (Language::Romanian, "Parc")]).unwrap(),
            topic: id("1.14.2"),
            start_date: time("2026-01-01T00:00:00"),
            end_date: time("2026-02-01T00:00:00"),
            content: localized([(Language::English, "Build a park?")]).unwrap(),
            variants: vec![yes, no].into(),
            delegation_allowed: true.into(),
            sign_required: false.into(),
        });
        let value = op.value();
        assert_eq!(value[0], json!(15));
        assert_eq!(value[1]["title"], json!([[2, "Park"], [1, "Parc"]]));
        assert_eq!(value[1]["start_date"], json!("2026-01-01T00:00:00"));
        assert_eq!(value[1]["variants"][1]["weight"], json!(1));
        assert_eq!(value[1]["delegation_allowed"], json!(true));
        assert!(op.bytes().ends_with("0100"));
    }

    #[test]
    fn delegation_create_layout() {
        let op = Operation::from(PollVoteDelegationCreate {
            topics: vec![id("1.14.1"), id("1.14.2")].into(),
            delegator: id("1.2.3"),
            delegatee: id("1.2.4"),
            start_date: ChainTime::from_unix_seconds(0),
            end_date: ChainTime::from_unix_seconds(1),
        });
        assert_eq!(
            op.bytes(),
            format!("11{}020102030400000000{}", "00".repeat(9), "01000000")
        );
    }
}
