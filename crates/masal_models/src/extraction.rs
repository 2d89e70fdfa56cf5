//! Pulling JSON out of model responses.

use masal_error::{MasalResult, PipelineError, PipelineErrorKind};

/// Extract a JSON object from a response that may carry markdown or chatter.
///
/// Strategies, in order:
/// 1. A fenced code block (```json ... ``` or a bare fence)
/// 2. The first balanced `{ ... }`
///
/// # Errors
///
/// Returns an error if no JSON object is found.
///
/// # Examples
///
/// ```
/// use masal_models::extract_json;
///
/// let response = "Here you go:\n```json\n{\"title\": \"Ay\"}\n```";
/// assert_eq!(extract_json(response).unwrap(), "{\"title\": \"Ay\"}");
/// ```
pub fn extract_json(response: &str) -> MasalResult<String> {
    if let Some(json) = extract_from_code_block(response) {
        return Ok(json);
    }

    if let Some(json) = extract_balanced(response, '{', '}') {
        return Ok(json);
    }

    tracing::error!(
        response_length = response.len(),
        "No JSON found in story response"
    );

    Err(PipelineError::new(PipelineErrorKind::GenerationFailed(format!(
        "no JSON found in response (length: {})",
        response.len()
    )))
    .into())
}

/// Content of the first fenced code block, if any.
fn extract_from_code_block(response: &str) -> Option<String> {
    let start = response.find("```")?;
    let content_start = start + 3;
    // Skip the language tag line.
    let skip_to = response[content_start..]
        .find('\n')
        .map(|n| content_start + n + 1)
        .unwrap_or(content_start);

    let content = match response[skip_to..].find("```") {
        Some(end) => &response[skip_to..skip_to + end],
        // Truncated response
        None => &response[skip_to..],
    };

    let content = content.trim();
    if content.is_empty() {
        None
    } else {
        Some(content.to_string())
    }
}

/// The first `open ... close` span with balanced nesting, ignoring delimiters in strings.
fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(response[start..start + i + ch.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }

    None
}
