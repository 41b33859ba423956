//! Interactive tools exposed via Model Context Protocol
//!
//! Provides `search_providers` and `get_provider_by_npi` by delegating to the
//! `ProviderDirectory` held in application state.

use chrono::{SecondsFormat, Utc};
use rust_mcp_sdk::{
    macros,
    schema::{CallToolRequestParams, CallToolResult, ContentBlock, TextContent, Tool},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::warn;

use crate::domain::utils::{build_search_query, normalize_npi};
use crate::mcp::rpc::{
    app_error_to_json_rpc, json_rpc_error, json_rpc_error_with_data, json_rpc_result,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchProvidersParams {
    pub query: String,
    pub state: Option<String>,
    pub taxonomy: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GetProviderParams {
    pub npi: String,
}

#[macros::mcp_tool(
    name = "search_providers",
    description = "Search for healthcare providers in the NPI Registry by name, organization, state, or taxonomy."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct SearchProvidersTool {
    /// Name of the provider (first/last) or organization, or a generic search term.
    pub query: String,
    /// 2-letter state code (e.g. 'CA', 'NY').
    pub state: Option<String>,
    /// Taxonomy description or code (e.g. 'Cardiology', '207RC0000X').
    pub taxonomy: Option<String>,
}

#[macros::mcp_tool(
    name = "get_provider_by_npi",
    description = "Retrieve detailed information about a specific provider using their NPI number."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetProviderByNpiTool {
    /// The 10-digit NPI number.
    pub npi: String,
}

pub fn build_tools_list() -> Vec<Tool> {
    vec![SearchProvidersTool::tool(), GetProviderByNpiTool::tool()]
}

fn tool_result(
    id: Option<Value>,
    text: String,
    is_error: Option<bool>,
    structured_content: Option<Map<String, Value>>,
) -> Value {
    json_rpc_result(
        id,
        serde_json::to_value(CallToolResult {
            content: vec![ContentBlock::from(TextContent::new(text, None, None))],
            is_error,
            meta: None,
            structured_content,
        })
        .expect("tool result serialization"),
    )
}

pub async fn handle_tools_call(
    state: &AppState,
    id: Option<Value>,
    params: Option<Value>,
) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let tool_call: CallToolRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    match tool_call.name.as_str() {
        "search_providers" => {
            let params: SearchProvidersParams =
                match serde_json::from_value(json!(tool_call.arguments.unwrap_or_default())) {
                    Ok(value) => value,
                    Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
                };

            let query = match build_search_query(params.query, params.state, params.taxonomy) {
                Ok(query) => query,
                Err(err) => return app_error_to_json_rpc(id, err),
            };

            match state.directory.search_providers(&query).await {
                Ok(providers) => {
                    let returned = providers.len();
                    let generated_at_utc = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
                    let text = serde_json::to_string_pretty(&providers)
                        .expect("provider list serialization");

                    tool_result(
                        id,
                        text,
                        None,
                        Some(Map::from_iter([
                            ("providers".to_string(), json!(providers)),
                            ("returned".to_string(), json!(returned)),
                            ("generated_at_utc".to_string(), json!(generated_at_utc)),
                        ])),
                    )
                }
                Err(err) => {
                    warn!(error = %err, "provider search failed");
                    tool_result(id, err.to_string(), Some(true), None)
                }
            }
        }
        "get_provider_by_npi" => {
            let params: GetProviderParams =
                match serde_json::from_value(json!(tool_call.arguments.unwrap_or_default())) {
                    Ok(value) => value,
                    Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
                };

            let npi = match normalize_npi(&params.npi) {
                Ok(npi) => npi,
                Err(err) => return app_error_to_json_rpc(id, err),
            };

            match state.directory.get_provider(&npi).await {
                Ok(Some(provider)) => {
                    let text = serde_json::to_string_pretty(&provider)
                        .expect("provider detail serialization");

                    tool_result(
                        id,
                        text,
                        None,
                        Some(Map::from_iter([
                            ("found".to_string(), json!(true)),
                            ("provider".to_string(), json!(provider)),
                        ])),
                    )
                }
                Ok(None) => tool_result(
                    id,
                    format!("Provider with NPI {npi} not found."),
                    None,
                    Some(Map::from_iter([
                        ("found".to_string(), json!(false)),
                        ("npi".to_string(), json!(npi)),
                    ])),
                ),
                Err(err) => {
                    warn!(npi = %npi, error = %err, "provider lookup failed");
                    tool_result(id, err.to_string(), Some(true), None)
                }
            }
        }
        _ => json_rpc_error_with_data(
            id,
            -32601,
            "Method not found",
            Some(json!({
                "code": "tool_not_found",
                "message": "unknown tool name",
                "details": {
                    "name": tool_call.name,
                },
            })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::build_tools_list;

    #[test]
    fn lists_both_tools_in_order() {
        let names = build_tools_list()
            .into_iter()
            .map(|tool| tool.name)
            .collect::<Vec<_>>();

        assert_eq!(names, vec!["search_providers", "get_provider_by_npi"]);
    }

    #[test]
    fn required_arguments_are_declared() {
        let tools = serde_json::to_value(build_tools_list()).expect("tools serialize");

        let search_required = tools[0]["inputSchema"]["required"].to_string();
        assert!(search_required.contains("query"));
        assert!(!search_required.contains("state"));

        let lookup_required = tools[1]["inputSchema"]["required"].to_string();
        assert!(lookup_required.contains("npi"));
    }
}
