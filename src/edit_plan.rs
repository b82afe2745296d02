//! The edit plan a caller submits: a batch of structured intents addressed by SID.
//!
//! This module defines the wire shape of edit requests and responses. Intents are tagged by
//! `type`, and each variant carries only the target fields its operation understands.

use crate::error::{EditError, ErrorKind};
use crate::text::LineRange;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Serialisable batch of intents against one document.
pub struct EditRequest {
    /// Path of the document, resolved by the storage collaborator.
    pub target_file: String,
    /// Intents applied in order.
    pub intents: Vec<EditIntent>,
}

impl EditRequest {
    /// Parse a request from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a valid request.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
/// Caller-assigned importance; recorded in logs, never used to reorder a batch.
pub enum Priority {
    /// Nice to have.
    Low,
    /// Default.
    #[default]
    Medium,
    /// Must land.
    High,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
/// Side of a section a section-level insert lands on.
pub enum InsertionPosition {
    /// Immediately above the section heading.
    Before,
    /// After the section and its subsections, at the next sibling or ancestor heading.
    After,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Target of operations that address a whole section.
pub struct SectionTarget {
    /// Section identifier.
    pub sid: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Target of `replace_section_content_only`: body lines or a text span.
pub struct ReplaceTarget {
    /// Section identifier.
    pub sid: String,
    /// Body lines to replace; line 1 is the first line after the heading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_range: Option<LineRange>,
    /// Literal text to replace, matched case-insensitively.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_content: Option<String>,
    /// Text on or shortly before the target that pins down which occurrence is meant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_anchor: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Target of `insert_section_content_only`: a section side or a line inside the section.
pub struct InsertTarget {
    /// Section identifier.
    pub sid: String,
    /// Insert above the heading or after the whole section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insertion_position: Option<InsertionPosition>,
    /// Insert after the first line matching this text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_content: Option<String>,
    /// Insert before the first line matching this text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_content: Option<String>,
    /// Restricts the line search to a window after the anchor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_anchor: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Target of `delete_section_content_only`: the own body or a text span.
pub struct DeleteTarget {
    /// Section identifier.
    pub sid: String,
    /// Literal text to remove; without it the section's own body is removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_to_remove: Option<String>,
    /// Restricts the text search to a window after the anchor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_anchor: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Fields shared by every intent, generic over the operation's target.
pub struct Intent<T> {
    /// Where the edit applies.
    pub target: T,
    /// Text to write; ignored by deletions.
    #[serde(default)]
    pub content: String,
    /// Why the caller wants the edit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Informational importance.
    #[serde(default)]
    pub priority: Priority,
}

impl<T> Intent<T> {
    fn new(target: T, content: impl Into<String>) -> Self {
        Self {
            target,
            content: content.into(),
            reason: None,
            priority: Priority::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
/// One structured edit addressed by SID.
pub enum EditIntent {
    /// Replace body lines or a span of text, leaving the heading alone.
    ReplaceSectionContentOnly(Intent<ReplaceTarget>),
    /// Insert new lines next to a section or next to a line inside it.
    InsertSectionContentOnly(Intent<InsertTarget>),
    /// Remove the own body or a span of text, leaving the heading alone.
    DeleteSectionContentOnly(Intent<DeleteTarget>),
    /// Add lines after the last content line of the section's own body.
    AppendToSection(Intent<SectionTarget>),
    /// Add lines directly after the heading.
    PrependToSection(Intent<SectionTarget>),
}

impl EditIntent {
    #[must_use]
    /// Replace body lines `range` (1 = first line after the heading) of `sid`.
    pub fn replace_lines(
        sid: impl Into<String>,
        range: LineRange,
        content: impl Into<String>,
    ) -> Self {
        Self::ReplaceSectionContentOnly(Intent::new(
            ReplaceTarget {
                sid: sid.into(),
                line_range: Some(range),
                target_content: None,
                context_anchor: None,
            },
            content,
        ))
    }

    #[must_use]
    /// Replace the first occurrence of `target` inside `sid`.
    pub fn replace_content(
        sid: impl Into<String>,
        target: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::ReplaceSectionContentOnly(Intent::new(
            ReplaceTarget {
                sid: sid.into(),
                line_range: None,
                target_content: Some(target.into()),
                context_anchor: None,
            },
            content,
        ))
    }

    #[must_use]
    /// Insert `content` before or after the section `sid`.
    pub fn insert(
        sid: impl Into<String>,
        position: InsertionPosition,
        content: impl Into<String>,
    ) -> Self {
        Self::InsertSectionContentOnly(Intent::new(
            InsertTarget {
                sid: sid.into(),
                insertion_position: Some(position),
                after_content: None,
                before_content: None,
                context_anchor: None,
            },
            content,
        ))
    }

    #[must_use]
    /// Insert `content` after the line of `sid` matching `line`.
    pub fn insert_after_content(
        sid: impl Into<String>,
        line: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::InsertSectionContentOnly(Intent::new(
            InsertTarget {
                sid: sid.into(),
                insertion_position: None,
                after_content: Some(line.into()),
                before_content: None,
                context_anchor: None,
            },
            content,
        ))
    }

    #[must_use]
    /// Insert `content` before the line of `sid` matching `line`.
    pub fn insert_before_content(
        sid: impl Into<String>,
        line: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::InsertSectionContentOnly(Intent::new(
            InsertTarget {
                sid: sid.into(),
                insertion_position: None,
                after_content: None,
                before_content: Some(line.into()),
                context_anchor: None,
            },
            content,
        ))
    }

    #[must_use]
    /// Remove the own body of `sid`.
    pub fn delete_body(sid: impl Into<String>) -> Self {
        Self::DeleteSectionContentOnly(Intent::new(
            DeleteTarget {
                sid: sid.into(),
                content_to_remove: None,
                context_anchor: None,
            },
            "",
        ))
    }

    #[must_use]
    /// Remove the first occurrence of `text` inside `sid`.
    pub fn delete_content(sid: impl Into<String>, text: impl Into<String>) -> Self {
        Self::DeleteSectionContentOnly(Intent::new(
            DeleteTarget {
                sid: sid.into(),
                content_to_remove: Some(text.into()),
                context_anchor: None,
            },
            "",
        ))
    }

    #[must_use]
    /// Add `content` at the end of the own body of `sid`.
    pub fn append(sid: impl Into<String>, content: impl Into<String>) -> Self {
        Self::AppendToSection(Intent::new(SectionTarget { sid: sid.into() }, content))
    }

    #[must_use]
    /// Add `content` directly under the heading of `sid`.
    pub fn prepend(sid: impl Into<String>, content: impl Into<String>) -> Self {
        Self::PrependToSection(Intent::new(SectionTarget { sid: sid.into() }, content))
    }

    #[must_use]
    /// Set the context anchor on intents that search for text; others are returned unchanged.
    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        let anchor = Some(anchor.into());
        match &mut self {
            Self::ReplaceSectionContentOnly(intent) => intent.target.context_anchor = anchor,
            Self::InsertSectionContentOnly(intent) => intent.target.context_anchor = anchor,
            Self::DeleteSectionContentOnly(intent) => intent.target.context_anchor = anchor,
            Self::AppendToSection(_) | Self::PrependToSection(_) => {}
        }
        self
    }

    #[must_use]
    /// Attach a reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        let reason = Some(reason.into());
        match &mut self {
            Self::ReplaceSectionContentOnly(intent) => intent.reason = reason,
            Self::InsertSectionContentOnly(intent) => intent.reason = reason,
            Self::DeleteSectionContentOnly(intent) => intent.reason = reason,
            Self::AppendToSection(intent) | Self::PrependToSection(intent) => {
                intent.reason = reason;
            }
        }
        self
    }

    #[must_use]
    /// Section identifier the intent addresses.
    pub fn sid(&self) -> &str {
        match self {
            Self::ReplaceSectionContentOnly(intent) => &intent.target.sid,
            Self::InsertSectionContentOnly(intent) => &intent.target.sid,
            Self::DeleteSectionContentOnly(intent) => &intent.target.sid,
            Self::AppendToSection(intent) | Self::PrependToSection(intent) => &intent.target.sid,
        }
    }

    #[must_use]
    /// Wire name of the operation.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::ReplaceSectionContentOnly(_) => "replace_section_content_only",
            Self::InsertSectionContentOnly(_) => "insert_section_content_only",
            Self::DeleteSectionContentOnly(_) => "delete_section_content_only",
            Self::AppendToSection(_) => "append_to_section",
            Self::PrependToSection(_) => "prepend_to_section",
        }
    }

    #[must_use]
    /// Caller-assigned priority.
    pub fn priority(&self) -> Priority {
        match self {
            Self::ReplaceSectionContentOnly(intent) => intent.priority,
            Self::InsertSectionContentOnly(intent) => intent.priority,
            Self::DeleteSectionContentOnly(intent) => intent.priority,
            Self::AppendToSection(intent) | Self::PrependToSection(intent) => intent.priority,
        }
    }

    #[must_use]
    /// Caller-supplied reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::ReplaceSectionContentOnly(intent) => intent.reason.as_deref(),
            Self::InsertSectionContentOnly(intent) => intent.reason.as_deref(),
            Self::DeleteSectionContentOnly(intent) => intent.reason.as_deref(),
            Self::AppendToSection(intent) | Self::PrependToSection(intent) => {
                intent.reason.as_deref()
            }
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Serialisable form of an [`EditError`].
pub struct FailureDetail {
    /// Error classification.
    pub kind: ErrorKind,
    /// Human-readable explanation.
    pub message: String,
}

impl From<&EditError> for FailureDetail {
    fn from(error: &EditError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// An intent that could not be applied.
pub struct IntentFailure {
    /// Position of the intent in the submitted batch.
    pub index: usize,
    /// The intent as submitted.
    pub intent: EditIntent,
    /// Why it failed.
    pub error: FailureDetail,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Aggregate outcome of a batch.
pub struct EditResponse {
    /// True only when every intent was applied.
    pub success: bool,
    /// Number of intents applied.
    pub successful_intents: usize,
    /// Intents that failed, in batch order.
    pub failed_intents: Vec<IntentFailure>,
}

impl EditResponse {
    /// Serialise the response as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
#[path = "tests/edit_plan.rs"]
mod tests;
