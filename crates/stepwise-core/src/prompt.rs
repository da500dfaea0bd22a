//! System prompt rendering.
//!
//! A template is plain text with placeholders substituted at render time:
//! `{tools}`, `{tool_tag}`, `{args_tag}` and `{none}`.

use stepwise_contracts::config::{AgentConfig, NONE_SENTINEL};

use crate::registry::ToolRegistry;

/// Rendered in place of `{tools}` when the registry is empty.
pub const NO_TOOLS: &str = "[NO TOOLS AVAILABLE]";

pub const TOOL_CALLING_TEMPLATE: &str = r#"You are an agent that answers the user's query by calling one of a set of tools.

These are the tools available to you:

{tools}

Example. User's query: "What is the capital of France?"
Your answer:
<{tool_tag}>get_capital</{tool_tag}> <{args_tag}>{"country": "France"}</{args_tag}>

Rules you must follow:
* Your answer is always exactly one tool followed by its arguments, in the format <{tool_tag}>tool_name</{tool_tag}> <{args_tag}>{"arg1": "value1", "arg2": "value2"}</{args_tag}>
* The arguments are a JSON object: keys and strings in double quotes, lists in square brackets.
* You can only use one tool at a time.
* If an earlier answer produced an error, fix your answer according to the error message.
* If none of the tools can solve the task, answer <{tool_tag}>{none}</{tool_tag}> <{args_tag}>{}</{args_tag}> and then explain to the user why the task cannot be solved with the tools you have.
"#;

pub const REACT_TEMPLATE: &str = r#"You solve tasks with the tools below by cycling through think, act and observe steps.

These are the tools available to you:

{tools}

Start every answer with exactly one of these prefixes:
* "Think:" followed by your reasoning about the query and what to do next.
* "Act:" followed by exactly one tool call, in the format <{tool_tag}>tool_name</{tool_tag}> <{args_tag}>{"arg1": "value1"}</{args_tag}>
* "End:" followed by the final answer for the user.

After an Act step you will see "Observe:" followed by the tool's result.
If an answer produced an error, read the error message and correct your next answer.

Example. User's query: "Which city is larger, Guangzhou or Paris?"
Think: I need the population of both cities.
Act: <{tool_tag}>get_population</{tool_tag}> <{args_tag}>{"city": "Guangzhou"}</{args_tag}>
Observe: 15000000
Act: <{tool_tag}>get_population</{tool_tag}> <{args_tag}>{"city": "Paris"}</{args_tag}>
Observe: 2100000
End: Guangzhou has the larger population.
"#;

/// Renders a system prompt from a template and the registered tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptBuilder {
    template: String,
}

impl PromptBuilder {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn tool_calling() -> Self {
        Self::new(TOOL_CALLING_TEMPLATE)
    }

    pub fn react() -> Self {
        Self::new(REACT_TEMPLATE)
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Tool descriptions go in last so their text is never re-substituted.
    pub fn render(&self, tools: &ToolRegistry, config: &AgentConfig) -> String {
        self.template
            .replace("{tool_tag}", &config.tool_tag)
            .replace("{args_tag}", &config.args_tag)
            .replace("{none}", NONE_SENTINEL)
            .replace("{tools}", &describe_tools(tools))
    }
}

/// One block per tool: signature line, then description.
pub fn describe_tools(tools: &ToolRegistry) -> String {
    if tools.is_empty() {
        return NO_TOOLS.to_string();
    }
    tools
        .specs()
        .map(|spec| {
            if spec.description.is_empty() {
                spec.signature()
            } else {
                format!("{}\n{}", spec.signature(), spec.description)
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
