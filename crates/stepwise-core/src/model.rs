//! A deterministic model stub.

use std::sync::Mutex;

use stepwise_contracts::{
    error::{AgentError, AgentResult},
    memory::MemoryEntry,
};

use crate::traits::{GenerateRequest, Generation, Model, Usage};

/// Owned copy of one request seen by [`ScriptedModel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub system: Option<String>,
    pub messages: Vec<MemoryEntry>,
    pub max_tokens: u32,
    pub stop: Option<String>,
}

/// Replays a fixed list of responses.
///
/// Responses are returned in order; once exhausted the last one repeats.
/// Output is cut at the request's stop word, as a real backend would.
/// Usage counts whitespace-separated words: system prompt plus transcript
/// in, returned text out.
#[derive(Debug)]
pub struct ScriptedModel {
    responses: Vec<String>,
    cursor: Mutex<usize>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedModel {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            cursor: Mutex::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A model that always answers `response`.
    pub fn always(response: impl Into<String>) -> Self {
        Self::new([response.into()])
    }

    /// Number of `generate` calls so far.
    pub fn calls(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Restart the script from its first response.
    pub fn rewind(&self) {
        if let Ok(mut cursor) = self.cursor.lock() {
            *cursor = 0;
        }
    }
}

impl Model for ScriptedModel {
    fn generate(&self, request: &GenerateRequest<'_>) -> AgentResult<Generation> {
        let last = self.responses.len().checked_sub(1).ok_or_else(|| AgentError::Model {
            reason: "scripted model has no responses".to_string(),
        })?;

        let index = {
            let mut cursor = self.cursor.lock().map_err(|_| poisoned())?;
            let index = (*cursor).min(last);
            *cursor += 1;
            index
        };

        self.requests
            .lock()
            .map_err(|_| poisoned())?
            .push(RecordedRequest {
                system: request.system.map(str::to_string),
                messages: request.messages.to_vec(),
                max_tokens: request.max_tokens,
                stop: request.stop.map(str::to_string),
            });

        let response = &self.responses[index];
        let response = match request.stop {
            Some(stop) if !stop.is_empty() => response
                .find(stop)
                .map_or(response.as_str(), |i| &response[..i]),
            _ => response.as_str(),
        };
        let input = request.system.map_or(0, word_count)
            + request
                .messages
                .iter()
                .map(|m| word_count(&m.content))
                .sum::<u32>();
        Ok(Generation::new(response).with_usage(Usage {
            input_tokens: input,
            output_tokens: word_count(response),
        }))
    }
}

fn word_count(text: &str) -> u32 {
    u32::try_from(text.split_whitespace().count()).unwrap_or(u32::MAX)
}

fn poisoned() -> AgentError {
    AgentError::Model {
        reason: "scripted model lock poisoned".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request<'a>(messages: &'a [MemoryEntry], stop: Option<&'a str>) -> GenerateRequest<'a> {
        GenerateRequest {
            system: Some("system"),
            messages,
            max_tokens: 64,
            stop,
        }
    }

    #[test]
    fn replays_in_order_then_repeats_last() {
        let model = ScriptedModel::new(["one", "two"]);
        let messages = [MemoryEntry::user("q")];
        let outputs: Vec<String> = (0..4)
            .map(|_| model.generate(&request(&messages, None)).unwrap().text)
            .collect();
        assert_eq!(outputs, vec!["one", "two", "two", "two"]);
        assert_eq!(model.calls(), 4);
    }

    #[test]
    fn truncates_at_stop_word() {
        let model = ScriptedModel::always("Think: ok PAUSE trailing");
        let out = model.generate(&request(&[], Some("PAUSE"))).unwrap();
        assert_eq!(out.text, "Think: ok ");
    }

    #[test]
    fn records_requests() {
        let model = ScriptedModel::always("x");
        let messages = [MemoryEntry::user("hello")];
        model.generate(&request(&messages, Some("STOP"))).unwrap();
        let recorded = model.requests();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].system.as_deref(), Some("system"));
        assert_eq!(recorded[0].messages, messages.to_vec());
        assert_eq!(recorded[0].max_tokens, 64);
        assert_eq!(recorded[0].stop.as_deref(), Some("STOP"));
    }

    #[test]
    fn empty_script_is_a_model_error() {
        let model = ScriptedModel::new(Vec::<String>::new());
        let err = model.generate(&request(&[], None)).unwrap_err();
        assert!(matches!(err, AgentError::Model { .. }));
    }

    #[test]
    fn rewind_restarts_script() {
        let model = ScriptedModel::new(["a", "b"]);
        model.generate(&request(&[], None)).unwrap();
        model.rewind();
        assert_eq!(model.generate(&request(&[], None)).unwrap().text, "a");
    }

    #[test]
    fn reports_word_usage() {
        let model = ScriptedModel::always("Think: two words PAUSE and more");
        let messages = [MemoryEntry::user("what is the weather")];
        let out = model.generate(&request(&messages, Some("PAUSE"))).unwrap();
        // "system" + four query words in, three words before the stop word out.
        assert_eq!(
            out.usage,
            Some(Usage {
                input_tokens: 5,
                output_tokens: 3,
            })
        );
    }
}
