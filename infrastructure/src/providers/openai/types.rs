//! Conversions between the Chat Completions wire format and port types
//!
//! Everything here is pure so it can be tested without a network.

use finadvisor_application::ports::text_generator::{
    Generation, GenerationError, GenerationRequest,
};
use finadvisor_domain::{Capability, CapabilityCall, PromptTemplate};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

// ─── Request ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolSpec>,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<WireToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    fn text(role: &'static str, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            name: None,
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ToolSpec {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: FunctionSpec,
}

#[derive(Debug, Serialize)]
pub struct FunctionSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WireToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_kind")]
    pub kind: String,
    pub function: WireFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WireFunctionCall {
    pub name: String,
    /// JSON-encoded arguments object
    #[serde(default)]
    pub arguments: String,
}

fn function_kind() -> String {
    "function".to_string()
}

// ─── Response ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<WireToolCall>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

// ─── Port → wire ─────────────────────────────────────────────────

/// Function tool with a single required string argument
pub fn tool_spec(capability: &Capability) -> ToolSpec {
    ToolSpec {
        kind: "function",
        function: FunctionSpec {
            name: capability.name.clone(),
            description: capability.description.clone(),
            parameters: json!({
                "type": "object",
                "properties": {
                    capability.argument.clone(): {
                        "type": "string",
                        "description": capability.argument_description,
                    }
                },
                "required": [capability.argument],
            }),
        },
    }
}

/// Build the chat request for one agent turn.
///
/// The speaker's own past messages become `assistant` turns; everybody
/// else's become `user` turns prefixed with the sender. Capability calls
/// made so far this turn are replayed as one assistant tool-call message
/// followed by their `tool` results.
pub fn build_chat_request(
    request: &GenerationRequest,
    model: &str,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
) -> ChatRequest {
    let mut messages = vec![ChatMessage::text("system", request.system_prompt.clone())];

    for message in &request.history {
        if *message.sender() == request.speaker {
            messages.push(ChatMessage::text("assistant", message.text()));
        } else {
            let mut turn = ChatMessage::text("user", PromptTemplate::history_line(message));
            turn.name = Some(message.sender().to_string());
            messages.push(turn);
        }
    }

    if !request.exchanges.is_empty() {
        messages.push(ChatMessage {
            role: "assistant",
            content: None,
            name: None,
            tool_calls: request
                .exchanges
                .iter()
                .map(|exchange| WireToolCall {
                    id: exchange.call.id.clone(),
                    kind: function_kind(),
                    function: WireFunctionCall {
                        name: exchange.call.name.clone(),
                        arguments: encode_argument(&request.capabilities, &exchange.call),
                    },
                })
                .collect(),
            tool_call_id: None,
        });
        for exchange in &request.exchanges {
            let mut result = ChatMessage::text("tool", exchange.output.clone());
            result.tool_call_id = Some(exchange.call.id.clone());
            messages.push(result);
        }
    }

    ChatRequest {
        model: model.to_string(),
        messages,
        temperature,
        max_tokens,
        tools: request.capabilities.iter().map(tool_spec).collect(),
    }
}

/// Single-shot request without history or tools
pub fn build_completion_request(
    system_prompt: &str,
    prompt: &str,
    model: &str,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::text("system", system_prompt),
            ChatMessage::text("user", prompt),
        ],
        temperature,
        max_tokens,
        tools: Vec::new(),
    }
}

fn encode_argument(capabilities: &[Capability], call: &CapabilityCall) -> String {
    let key = capabilities
        .iter()
        .find(|c| c.name == call.name)
        .map(|c| c.argument.as_str())
        .unwrap_or("argument");
    json!({ key: call.argument }).to_string()
}

// ─── Wire → port ─────────────────────────────────────────────────

/// First string value of the arguments object, or the raw text when it is
/// not JSON.
fn decode_argument(arguments: &str) -> String {
    match serde_json::from_str::<Value>(arguments) {
        Ok(Value::Object(map)) => map
            .values()
            .find_map(|v| v.as_str().map(str::to_string))
            .unwrap_or_default(),
        Ok(Value::String(s)) => s,
        _ => arguments.trim().to_string(),
    }
}

/// Turn the first choice into a [`Generation`]
pub fn parse_chat_response(response: ChatResponse) -> Result<Generation, GenerationError> {
    let message = response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| GenerationError::InvalidResponse("no choices in response".to_string()))?;

    Ok(Generation {
        text: message.content.unwrap_or_default(),
        calls: message
            .tool_calls
            .into_iter()
            .map(|call| {
                CapabilityCall::new(
                    call.id,
                    call.function.name,
                    decode_argument(&call.function.arguments),
                )
            })
            .collect(),
    })
}

/// Map a non-success HTTP status and body to a [`GenerationError`]
pub fn map_http_error(status: u16, body: &str) -> GenerationError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    match status {
        401 | 403 => GenerationError::Authentication(message),
        429 => GenerationError::RateLimited(message),
        _ => GenerationError::Server { status, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finadvisor_domain::{
        CapabilityExchange, Conversation, Participant, ParticipantRegistry, Role,
    };

    fn conversation() -> (Participant, Conversation) {
        let advisor = Participant::new("FinancialAdvisor", Role::Advisor, "Ask questions.")
            .with_capability(Capability::customer_profile());
        let registry =
            ParticipantRegistry::new(vec![Participant::human("user"), advisor.clone()]).unwrap();
        let mut conversation = Conversation::start(registry, 10, "I want advice").unwrap();
        conversation
            .append(&advisor.id, "What is your goal?")
            .unwrap();
        conversation
            .append(&"user".into(), "Retire early")
            .unwrap();
        (advisor, conversation)
    }

    #[test]
    fn test_history_roles() {
        let (advisor, conversation) = conversation();
        let request = GenerationRequest::for_turn(&advisor, &conversation);
        let chat = build_chat_request(&request, "gpt-4o-mini", None, None);

        let roles: Vec<&str> = chat.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
        assert_eq!(chat.messages[1].name.as_deref(), Some("user"));
        assert_eq!(
            chat.messages[3].content.as_deref(),
            Some("user: Retire early")
        );
        assert_eq!(chat.tools.len(), 1);
        assert_eq!(chat.tools[0].function.name, "get_customer_profile");
    }

    #[test]
    fn test_exchanges_replayed_as_tool_messages() {
        let (advisor, conversation) = conversation();
        let mut request = GenerationRequest::for_turn(&advisor, &conversation);
        request.exchanges.push(CapabilityExchange::completed(
            CapabilityCall::new("call_1", Capability::CUSTOMER_PROFILE, ""),
            "{\"monthly_income\":\"50000HKD\"}",
        ));
        let chat = build_chat_request(&request, "gpt-4o-mini", Some(0.2), None);

        let json = serde_json::to_value(&chat).unwrap();
        let messages = json["messages"].as_array().unwrap();
        let call_message = &messages[messages.len() - 2];
        assert_eq!(call_message["role"], "assistant");
        assert_eq!(call_message["tool_calls"][0]["id"], "call_1");
        assert_eq!(
            call_message["tool_calls"][0]["function"]["arguments"],
            "{\"name\":\"\"}"
        );
        let result = &messages[messages.len() - 1];
        assert_eq!(result["role"], "tool");
        assert_eq!(result["tool_call_id"], "call_1");
        assert!((json["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_tool_spec_schema() {
        let spec = serde_json::to_value(tool_spec(&Capability::market_data())).unwrap();
        assert_eq!(spec["type"], "function");
        assert_eq!(spec["function"]["parameters"]["required"][0], "query");
        assert_eq!(
            spec["function"]["parameters"]["properties"]["query"]["type"],
            "string"
        );
    }

    #[test]
    fn test_completion_request_has_no_tools() {
        let chat = build_completion_request("sys", "Who next?", "gpt-4o-mini", None, Some(20));
        let json = serde_json::to_string(&chat).unwrap();
        assert!(!json.contains("tools"));
        assert!(json.contains("\"max_tokens\":20"));
    }

    #[test]
    fn test_parse_text_response() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Hello"}}]}"#,
        )
        .unwrap();
        let generation = parse_chat_response(response).unwrap();
        assert_eq!(generation.text, "Hello");
        assert!(generation.is_final());
    }

    #[test]
    fn test_parse_tool_call_response() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":null,
                "tool_calls":[{"id":"call_9","type":"function",
                "function":{"name":"query_market_data","arguments":"{\"query\":\"gold outlook\"}"}}]}}]}"#,
        )
        .unwrap();
        let generation = parse_chat_response(response).unwrap();
        assert!(generation.text.is_empty());
        assert_eq!(
            generation.calls,
            vec![CapabilityCall::new("call_9", "query_market_data", "gold outlook")]
        );
    }

    #[test]
    fn test_parse_empty_choices() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            parse_chat_response(response),
            Err(GenerationError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_map_http_error() {
        let body = r#"{"error":{"message":"Incorrect API key","type":"invalid_request_error"}}"#;
        assert_eq!(
            map_http_error(401, body),
            GenerationError::Authentication("Incorrect API key".to_string())
        );
        assert!(map_http_error(429, "slow down").is_retryable());
        assert!(map_http_error(503, "").is_retryable());
        assert!(!map_http_error(400, "bad").is_retryable());
    }
}
