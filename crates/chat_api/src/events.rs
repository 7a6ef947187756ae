use serde_json::Value;

/// Content event produced by classifying one protocol line.
///
/// The wire format conflates three payload shapes (plain delta, wrapped
/// final string, rich object) inside one `content` field; classification
/// isolates that ambiguity here so downstream logic only handles this
/// four-case union.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentEvent {
    /// Partial response text, queued for paced display.
    Text { fragment: String },
    /// Complete response text. Authoritative: supersedes any partial text
    /// accumulated for the same message.
    FinalOutput { text: String },
    /// Card or carousel payload, rendered as one unit.
    Structured { payload: Value },
    /// Protocol metadata, comments, blanks, and unrecognized shapes.
    Ignored,
}

/// Classify one raw line. Never fails: malformed payloads degrade to
/// literal text or are dropped, they do not abort the stream.
pub fn classify(line: &str) -> ContentEvent {
    let raw = line.trim();
    if raw.is_empty() {
        return ContentEvent::Ignored;
    }
    if raw.starts_with("event:") || raw.starts_with(':') {
        return ContentEvent::Ignored;
    }

    let payload = match raw.strip_prefix("data:") {
        Some(rest) => {
            let rest = rest.trim();
            if rest.is_empty() {
                return ContentEvent::Ignored;
            }
            rest
        }
        None => raw,
    };

    if !payload.starts_with('{') {
        // Bare lines are item deltas in their own right.
        return ContentEvent::Text {
            fragment: payload.to_owned(),
        };
    }

    let item: Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(error) => {
            tracing::debug!(%error, "line is not valid JSON, degrading to literal text");
            return ContentEvent::Text {
                fragment: payload.to_owned(),
            };
        }
    };

    // Only `{type:"item", content:...}` carries payload.
    let is_item = item.get("type").and_then(Value::as_str) == Some("item");
    let Some(content) = item.get("content").filter(|_| is_item) else {
        return ContentEvent::Ignored;
    };

    classify_content(content)
}

fn classify_content(content: &Value) -> ContentEvent {
    match content {
        Value::String(text) if text.trim_start().starts_with('{') => {
            match serde_json::from_str::<Value>(text) {
                Ok(inner) => classify_inner(inner),
                Err(error) => {
                    tracing::debug!(%error, "inner content is not valid JSON, treating as text");
                    ContentEvent::Text {
                        fragment: text.clone(),
                    }
                }
            }
        }
        Value::String(text) => ContentEvent::Text {
            fragment: text.clone(),
        },
        // Some producers skip the string-encoding round trip and send the
        // rich object inline; classify it by the same marker rules.
        Value::Object(_) => classify_inner(content.clone()),
        _ => ContentEvent::Ignored,
    }
}

fn classify_inner(inner: Value) -> ContentEvent {
    if let Some(output) = inner.get("output") {
        let text = output
            .as_str()
            .map(str::to_owned)
            .unwrap_or_else(|| output.to_string());
        return ContentEvent::FinalOutput { text };
    }

    let kind = inner.get("type").and_then(Value::as_str);
    if matches!(kind, Some("card" | "carousel")) || inner.get("title").is_some() {
        return ContentEvent::Structured { payload: inner };
    }

    // Parsed object with no recognized markers: wire noise, dropped.
    ContentEvent::Ignored
}
