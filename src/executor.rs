//! Applies batches of edit intents to document text.
//!
//! Each intent is resolved against the text as left by the intents before it: the document is
//! parsed afresh, the target located, and the change spliced into a line buffer. A failing
//! intent leaves the text exactly as it found it and the batch carries on.

use crate::config::Config;
use crate::document::Document;
use crate::edit_plan::{
    DeleteTarget, EditIntent, EditResponse, FailureDetail, InsertTarget, InsertionPosition,
    Intent, IntentFailure, ReplaceTarget, SectionTarget,
};
use crate::error::EditError;
use crate::locator::{check_sid, Location, Locator, LocatorOptions, SectionOperation};
use crate::text::{content_lines, LineBuffer, LineRange, TextSpan};
use serde::Serialize;

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Result of one intent within a batch.
pub struct IntentOutcome {
    /// Position of the intent in the batch.
    pub index: usize,
    /// Wire name of the operation.
    pub operation: &'static str,
    /// SID the intent addressed.
    pub sid: String,
    /// Whether the intent was applied.
    pub success: bool,
    /// Why it was not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FailureDetail>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Final text of a batch together with its aggregate and per-intent outcomes.
pub struct BatchResult {
    /// Document text after every successful intent; the caller writes it back.
    pub content: String,
    /// Aggregate response for the caller.
    pub response: EditResponse,
    /// One entry per submitted intent, in order.
    pub outcomes: Vec<IntentOutcome>,
}

#[derive(Clone, Copy, Debug, Default)]
/// Stateless intent executor.
pub struct Executor {
    options: LocatorOptions,
}

impl Executor {
    #[must_use]
    /// Executor with default matching options.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    /// Executor using the matching options from `cfg`.
    pub fn with_config(cfg: &Config) -> Self {
        Self::with_options(LocatorOptions::from(cfg))
    }

    #[must_use]
    /// Executor with explicit matching options.
    pub fn with_options(options: LocatorOptions) -> Self {
        Self { options }
    }

    #[must_use]
    /// Apply `intents` in order to `text`.
    pub fn execute(&self, text: &str, intents: &[EditIntent]) -> BatchResult {
        let mut content = text.to_string();
        let mut outcomes = Vec::with_capacity(intents.len());
        let mut failed_intents = Vec::new();

        for (index, intent) in intents.iter().enumerate() {
            tracing::debug!(
                index,
                sid = intent.sid(),
                operation = intent.operation(),
                priority = ?intent.priority(),
                reason = intent.reason().unwrap_or_default(),
                "applying intent"
            );
            let error = match self.apply_intent(&content, intent) {
                Ok(updated) => {
                    content = updated;
                    None
                }
                Err(err) => {
                    tracing::warn!(index, sid = intent.sid(), "intent failed: {err}");
                    let detail = FailureDetail::from(&err);
                    failed_intents.push(IntentFailure {
                        index,
                        intent: intent.clone(),
                        error: detail.clone(),
                    });
                    Some(detail)
                }
            };
            outcomes.push(IntentOutcome {
                index,
                operation: intent.operation(),
                sid: intent.sid().to_string(),
                success: error.is_none(),
                error,
            });
        }

        let successful_intents = intents.len() - failed_intents.len();
        tracing::info!(
            total = intents.len(),
            succeeded = successful_intents,
            failed = failed_intents.len(),
            "edit batch finished"
        );
        BatchResult {
            content,
            response: EditResponse {
                success: failed_intents.is_empty(),
                successful_intents,
                failed_intents,
            },
            outcomes,
        }
    }

    /// Apply a single intent, returning the new text.
    ///
    /// # Errors
    ///
    /// Returns the reason the intent could not be applied; `text` is never partially edited.
    pub fn apply_intent(&self, text: &str, intent: &EditIntent) -> Result<String, EditError> {
        check_sid(intent.sid())?;
        let document = Document::parse(text)?;
        let locator = Locator::with_options(&document, self.options);
        let mut buffer = LineBuffer::from_text(text);

        match intent {
            EditIntent::ReplaceSectionContentOnly(intent) => {
                replace(&locator, &mut buffer, intent)?;
            }
            EditIntent::InsertSectionContentOnly(intent) => {
                insert(&locator, &mut buffer, intent)?;
            }
            EditIntent::DeleteSectionContentOnly(intent) => {
                delete(&locator, &mut buffer, intent)?;
            }
            EditIntent::AppendToSection(intent) => {
                add_lines(&locator, &mut buffer, intent, SectionOperation::Append)?;
            }
            EditIntent::PrependToSection(intent) => {
                add_lines(&locator, &mut buffer, intent, SectionOperation::Prepend)?;
            }
        }
        Ok(buffer.to_text())
    }
}

fn replace(
    locator: &Locator<'_>,
    buffer: &mut LineBuffer,
    intent: &Intent<ReplaceTarget>,
) -> Result<(), EditError> {
    let target = &intent.target;
    match (&target.line_range, &target.target_content) {
        (Some(range), None) => {
            let lines = body_lines(locator, &target.sid, *range)?;
            buffer.splice(lines, content_lines(&intent.content));
        }
        (None, Some(text)) => {
            let anchor = target.context_anchor.as_deref();
            let located = locator.locate_content(&target.sid, text, anchor)?;
            let span = expect_span(located.location)?;
            buffer.replace_span(span, &intent.content.replace("\r\n", "\n"));
        }
        (Some(_), Some(_)) => {
            return Err(EditError::malformed(
                "replace takes either lineRange or targetContent, not both",
            ));
        }
        (None, None) => {
            return Err(EditError::malformed(
                "replace requires lineRange or targetContent",
            ));
        }
    }
    Ok(())
}

/// Absolute lines for a range given relative to the section's own body.
fn body_lines(
    locator: &Locator<'_>,
    sid: &str,
    range: LineRange,
) -> Result<LineRange, EditError> {
    if range.start == 0 || range.start > range.end {
        return Err(EditError::malformed(format!(
            "lineRange {}-{} is not a 1-based ascending range",
            range.start, range.end
        )));
    }
    let (_, body) = locator.own_body(sid)?;
    let body_len = body.map_or(0, |body| body.line_count());
    let Some(body) = body.filter(|_| range.end <= body_len) else {
        return Err(EditError::malformed(format!(
            "lineRange {}-{} is outside the {body_len}-line body of '{sid}'",
            range.start, range.end
        )));
    };
    Ok(LineRange::new(
        body.start + range.start - 1,
        body.start + range.end - 1,
    ))
}

fn insert(
    locator: &Locator<'_>,
    buffer: &mut LineBuffer,
    intent: &Intent<InsertTarget>,
) -> Result<(), EditError> {
    let target = &intent.target;
    require_content(&intent.content)?;
    let anchor = target.context_anchor.as_deref();
    let located = match (
        target.insertion_position,
        &target.after_content,
        &target.before_content,
    ) {
        (Some(InsertionPosition::Before), None, None) => {
            locator.locate_section(&target.sid, SectionOperation::Before)?
        }
        (Some(InsertionPosition::After), None, None) => {
            locator.locate_section(&target.sid, SectionOperation::After)?
        }
        (None, Some(line), None) => {
            locator.locate_relative(&target.sid, line, InsertionPosition::After, anchor)?
        }
        (None, None, Some(line)) => {
            locator.locate_relative(&target.sid, line, InsertionPosition::Before, anchor)?
        }
        _ => {
            return Err(EditError::malformed(
                "insert requires exactly one of insertionPosition, afterContent or beforeContent",
            ));
        }
    };
    buffer.insert(expect_insertion(located.location)?, content_lines(&intent.content));
    Ok(())
}

fn delete(
    locator: &Locator<'_>,
    buffer: &mut LineBuffer,
    intent: &Intent<DeleteTarget>,
) -> Result<(), EditError> {
    let target = &intent.target;
    if let Some(text) = &target.content_to_remove {
        let anchor = target.context_anchor.as_deref();
        let located = locator.locate_content(&target.sid, text, anchor)?;
        let span = expect_span(located.location)?;
        buffer.replace_span(span, "");
        return Ok(());
    }

    let (_, Some(body)) = locator.own_body(&target.sid)? else {
        return Ok(());
    };
    // Keep one blank line between the heading and whatever follows the removed body.
    let replacement = if body.end < buffer.len() {
        vec![String::new()]
    } else {
        Vec::new()
    };
    buffer.splice(body, replacement);
    Ok(())
}

fn add_lines(
    locator: &Locator<'_>,
    buffer: &mut LineBuffer,
    intent: &Intent<SectionTarget>,
    operation: SectionOperation,
) -> Result<(), EditError> {
    require_content(&intent.content)?;
    let located = locator.locate_section(&intent.target.sid, operation)?;
    buffer.insert(expect_insertion(located.location)?, content_lines(&intent.content));
    Ok(())
}

fn require_content(content: &str) -> Result<(), EditError> {
    if content.is_empty() {
        Err(EditError::malformed("content must not be empty"))
    } else {
        Ok(())
    }
}

fn expect_span(location: Location) -> Result<TextSpan, EditError> {
    match location {
        Location::Span(span) => Ok(span),
        other => Err(EditError::malformed(format!(
            "expected a text span, resolved {other:?}"
        ))),
    }
}

fn expect_insertion(location: Location) -> Result<usize, EditError> {
    match location {
        Location::Insertion(line) => Ok(line),
        other => Err(EditError::malformed(format!(
            "expected an insertion point, resolved {other:?}"
        ))),
    }
}

#[cfg(test)]
#[path = "tests/executor.rs"]
mod tests;
