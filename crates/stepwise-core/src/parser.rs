//! Extraction of a tool call from raw model output.
//!
//! The expected shape is
//!
//! ```text
//! <tool>TOOL_NAME</tool> <args>{"param": value}</args>
//! ```
//!
//! Tag names are configurable. Argument text is parsed strictly as a JSON
//! object; it is never evaluated.

use serde_json::Value;

use stepwise_contracts::{
    config::{AgentConfig, NONE_SENTINEL},
    error::ToolFailure,
};

use crate::traits::Arguments;

/// A tool call found in a model response.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub name: String,
    pub args: Arguments,
}

/// What a response asks the runtime to do.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResponse {
    /// Invoke a registered tool.
    Call(ToolCall),
    /// The model named the `None` sentinel: it cannot or should not call a
    /// tool. Carries the text following the args region, trimmed.
    Decline { explanation: String },
}

/// Tag-based response parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseParser {
    tool_tag: String,
    args_tag: String,
    stop_word: Option<String>,
}

impl ResponseParser {
    pub fn new(tool_tag: impl Into<String>, args_tag: impl Into<String>) -> Self {
        Self {
            tool_tag: tool_tag.into(),
            args_tag: args_tag.into(),
            stop_word: None,
        }
    }

    pub fn with_stop_word(mut self, stop_word: Option<String>) -> Self {
        self.stop_word = stop_word.filter(|s| !s.is_empty());
        self
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(config.tool_tag.clone(), config.args_tag.clone())
            .with_stop_word(config.stop_word.clone())
    }

    /// The response up to (not including) the first stop word, if any.
    pub fn truncate<'a>(&self, response: &'a str) -> &'a str {
        match &self.stop_word {
            Some(stop) => response.find(stop.as_str()).map_or(response, |i| &response[..i]),
            None => response,
        }
    }

    /// One-line example of the format, used in corrective messages.
    pub fn expected_format(&self) -> String {
        format!(
            "<{t}>TOOL_NAME</{t}> <{a}>{{\"param\": value}}</{a}>",
            t = self.tool_tag,
            a = self.args_tag
        )
    }

    /// Parse `response` into a call or a decline.
    ///
    /// The first occurrence of each region wins. The args region is looked
    /// up after the tool region. When the tool name is the `None` sentinel
    /// the args content is not inspected.
    pub fn parse(&self, response: &str) -> Result<ParsedResponse, ToolFailure> {
        let text = self.truncate(response);

        let (name, after_tool) = extract_region(text, &self.tool_tag).ok_or_else(|| {
            self.failure(response, format!("no <{0}>...</{0}> region found", self.tool_tag))
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(self.failure(response, "the tool name is empty".to_string()));
        }

        let (raw_args, after_args) = extract_region(after_tool, &self.args_tag).ok_or_else(|| {
            self.failure(
                response,
                format!("no <{0}>...</{0}> region found after the tool name", self.args_tag),
            )
        })?;

        if name == NONE_SENTINEL {
            return Ok(ParsedResponse::Decline {
                explanation: after_args.trim().to_string(),
            });
        }

        let args = parse_arguments(raw_args).map_err(|reason| self.failure(response, reason))?;
        Ok(ParsedResponse::Call(ToolCall {
            name: name.to_string(),
            args,
        }))
    }

    fn failure(&self, response: &str, reason: String) -> ToolFailure {
        ToolFailure::ParsingTool {
            response: response.to_string(),
            reason,
            expected: self.expected_format(),
        }
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::from_config(&AgentConfig::default())
    }
}

/// Inner text of the first `<tag>...</tag>` region and the text after it.
fn extract_region<'a>(text: &'a str, tag: &str) -> Option<(&'a str, &'a str)> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = text.find(&open)? + open.len();
    let len = text[start..].find(&close)?;
    let end = start + len;
    Some((&text[start..end], &text[end + close.len()..]))
}

/// Parse the args region as a JSON object.
///
/// Empty content means "no arguments". A surrounding markdown code fence
/// is tolerated.
fn parse_arguments(raw: &str) -> Result<Arguments, String> {
    let body = strip_code_fence(raw.trim());
    if body.is_empty() {
        return Ok(Arguments::new());
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!(
            "the arguments must be a JSON object, got {}",
            json_kind(&other)
        )),
        Err(e) => Err(format!("the arguments are not valid JSON ({e})")),
    }
}

fn strip_code_fence(text: &str) -> &str {
    if !text.starts_with("```") {
        return text;
    }
    let body = text
        .trim_start_matches("```json")
        .trim_start_matches("```JSON")
        .trim_start_matches("```");
    body.rfind("```").map_or(body, |end| &body[..end]).trim()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn call(response: &str) -> ToolCall {
        match ResponseParser::default().parse(response).unwrap() {
            ParsedResponse::Call(call) => call,
            other => panic!("Expected a call, got {other:?}"),
        }
    }

    fn reason(response: &str) -> String {
        match ResponseParser::default().parse(response).unwrap_err() {
            ToolFailure::ParsingTool { reason, .. } => reason,
            other => panic!("Expected ParsingTool, got {other:?}"),
        }
    }

    #[test]
    fn parses_name_and_object() {
        let c = call(r#"<tool>multiply</tool> <args>{"a": 3, "b": 4}</args>"#);
        assert_eq!(c.name, "multiply");
        assert_eq!(c.args.get("a"), Some(&json!(3)));
        assert_eq!(c.args.get("b"), Some(&json!(4)));
    }

    #[test]
    fn trims_name_and_ignores_surrounding_text() {
        let c = call("Sure.\n<tool>  get_weather </tool>\n<args>{\"city\": \"Madrid\"}</args> done");
        assert_eq!(c.name, "get_weather");
        assert_eq!(c.args.get("city"), Some(&json!("Madrid")));
    }

    #[test]
    fn empty_args_mean_no_arguments() {
        let c = call("<tool>ping</tool><args>  </args>");
        assert!(c.args.is_empty());
    }

    #[test]
    fn first_region_wins() {
        let c = call(r#"<tool>a</tool><args>{"x": 1}</args><tool>b</tool><args>{"x": 2}</args>"#);
        assert_eq!(c.name, "a");
        assert_eq!(c.args.get("x"), Some(&json!(1)));
    }

    #[test]
    fn code_fence_is_tolerated() {
        let c = call("<tool>add</tool><args>```json\n{\"a\": 1, \"b\": 2}\n```</args>");
        assert_eq!(c.args.len(), 2);
    }

    #[test]
    fn missing_tool_region() {
        assert!(reason("I think the answer is 12.").contains("<tool>"));
    }

    #[test]
    fn missing_args_region() {
        assert!(reason("<tool>multiply</tool> a=3 b=4").contains("<args>"));
    }

    #[test]
    fn unclosed_region_is_missing() {
        assert!(reason("<tool>multiply <args>{}</args>").contains("<tool>"));
    }

    #[test]
    fn non_object_args_rejected() {
        assert!(reason("<tool>multiply</tool><args>[3, 4]</args>").contains("an array"));
        assert!(reason("<tool>multiply</tool><args>12</args>").contains("a number"));
    }

    #[test]
    fn expressions_are_not_evaluated() {
        let r = reason("<tool>multiply</tool><args>{'a': 3*4}</args>");
        assert!(r.contains("not valid JSON"));
    }

    #[test]
    fn sentinel_declines_with_trailing_text() {
        let parsed = ResponseParser::default()
            .parse("<tool>None</tool><args>{}</args>  I cannot access live prices.  ")
            .unwrap();
        assert_eq!(
            parsed,
            ParsedResponse::Decline {
                explanation: "I cannot access live prices.".to_string()
            }
        );
    }

    #[test]
    fn sentinel_ignores_args_content() {
        let parsed = ResponseParser::default()
            .parse("<tool>None</tool><args>not json</args>sorry")
            .unwrap();
        assert!(matches!(parsed, ParsedResponse::Decline { explanation } if explanation == "sorry"));
    }

    #[test]
    fn stop_word_truncates_before_parsing() {
        let parser = ResponseParser::default().with_stop_word(Some("<stop>".to_string()));
        let parsed = parser
            .parse(r#"<tool>add</tool><args>{"a": 1}</args><stop><tool>evil</tool>"#)
            .unwrap();
        assert!(matches!(parsed, ParsedResponse::Call(c) if c.name == "add"));

        let err = parser
            .parse("<stop><tool>add</tool><args>{}</args>")
            .unwrap_err();
        assert_eq!(err.kind(), "parsing_tool");
    }

    #[test]
    fn custom_tags() {
        let parser = ResponseParser::new("fn", "params");
        let parsed = parser.parse(r#"<fn>add</fn><params>{"a": 1}</params>"#).unwrap();
        assert!(matches!(parsed, ParsedResponse::Call(c) if c.name == "add"));
        assert_eq!(
            parser.expected_format(),
            r#"<fn>TOOL_NAME</fn> <params>{"param": value}</params>"#
        );
    }

    #[test]
    fn failure_message_quotes_response() {
        let err = ResponseParser::default().parse("just text").unwrap_err();
        let text = err.to_string();
        assert!(text.contains("Your answer was: just text"));
        assert!(text.contains("<tool>TOOL_NAME</tool>"));
    }
}
