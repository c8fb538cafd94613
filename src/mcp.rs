use std::{sync::Arc, time::Instant};

use rmcp::{
    ServerHandler,
    ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult,
        Content,
        Implementation,
        ServerCapabilities,
        ServerInfo,
    },
    tool,
    tool_handler,
    tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::{
    error,
    filter::CardFilter,
    set_search::SetFilter,
    store::Store,
    view::{
        CardDetail,
        CardSummary,
        KeywordView,
        LegalityReport,
        SetDetail,
        SetSummary,
    },
};

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 50;

#[derive(Clone)]
pub struct RatheMcpServer {
    store: Arc<Store>,
    tool_router: ToolRouter<Self>,
}

impl RatheMcpServer {
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router(router = tool_router)]
impl RatheMcpServer {
    #[tool(
        name = "search_cards",
        description = "Search for Flesh and Blood cards by name, type, class, set, pitch, keyword, ability text or format legality"
    )]
    pub async fn search_cards(
        &self,
        params: Parameters<SearchCardsParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let start = Instant::now();
        let params = params.0;

        let mut filter = CardFilter {
            name: params.name,
            type_name: params.type_name,
            class: params.class,
            set: params.set,
            pitch: params.pitch,
            keyword: params.keyword,
            text: params.text,
            ..Default::default()
        }
        .paged(0, params.offset.unwrap_or(0));
        if let Some(format) = params.format.as_deref() {
            filter = filter.legal_in_token(format);
        }
        filter.limit = page_limit(params.limit);

        let page = self.store.search_cards(&filter);
        let results: Vec<CardSummary> =
            page.cards.iter().map(|&c| c.into()).collect();

        let summary = summarize_cards(&results, page.total);
        let response = CardListResponse {
            query: None,
            count: results.len(),
            total: page.total,
            results,
        };
        respond("search_cards", start, response.count, summary, &response)
    }

    #[tool(
        name = "get_card",
        description = "Get full details of a specific Flesh and Blood card by unique ID or exact name"
    )]
    pub async fn get_card(
        &self,
        params: Parameters<CardRefParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let start = Instant::now();
        let id = params.0.id;
        if id.trim().is_empty() {
            return Ok(tool_error("get_card", start, "id is required"));
        }

        let Some(card) = self.store.resolve_card(&id) else {
            return Ok(tool_error(
                "get_card",
                start,
                &format!("card not found: {id}"),
            ));
        };

        let detail = CardDetail::from(card);
        respond("get_card", start, 1, detail.render(), &detail)
    }

    #[tool(name = "list_sets", description = "List all Flesh and Blood card sets")]
    pub async fn list_sets(&self) -> Result<CallToolResult, rmcp::ErrorData> {
        let start = Instant::now();
        let sets: Vec<SetSummary> =
            self.store.sets().iter().map(SetSummary::from).collect();
        let summary = summarize_sets(&sets);
        let response = SetListResponse {
            count: sets.len(),
            sets,
        };
        respond("list_sets", start, response.count, summary, &response)
    }

    #[tool(
        name = "search_sets",
        description = "Search for Flesh and Blood card sets by name or code"
    )]
    pub async fn search_sets(
        &self,
        params: Parameters<SearchSetsParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let start = Instant::now();
        let params = params.0;
        let filter = SetFilter {
            name: params.name,
            code: params.id,
            query: params.q,
        };

        let sets: Vec<SetSummary> = self
            .store
            .search_sets(&filter)
            .into_iter()
            .map(SetSummary::from)
            .collect();
        let summary = summarize_sets(&sets);
        let response = SetListResponse {
            count: sets.len(),
            sets,
        };
        respond("search_sets", start, response.count, summary, &response)
    }

    #[tool(
        name = "get_set",
        description = "Get details of a specific set, optionally including its cards"
    )]
    pub async fn get_set(
        &self,
        params: Parameters<GetSetParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let start = Instant::now();
        let params = params.0;
        if params.id.trim().is_empty() {
            return Ok(tool_error("get_set", start, "id is required"));
        }

        let Some(set) = self.store.set_by_id(&params.id) else {
            return Ok(tool_error(
                "get_set",
                start,
                &format!("set not found: {}", params.id),
            ));
        };

        let cards = params
            .include_cards
            .unwrap_or(false)
            .then(|| self.store.cards_in_set(&set.id));
        let detail = SetDetail::new(set, cards.as_deref());

        let mut summary = format!("{} ({})", detail.name, detail.id);
        if let Some(count) = detail.card_count {
            summary.push_str(&format!(": {count} cards"));
        }
        let count = detail.card_count.unwrap_or(1);
        respond("get_set", start, count, summary, &detail)
    }

    #[tool(
        name = "search_card_text",
        description = "Search for cards by text in their abilities or effects"
    )]
    pub async fn search_card_text(
        &self,
        params: Parameters<TextSearchParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let start = Instant::now();
        let params = params.0;
        if params.query.trim().is_empty() {
            return Ok(tool_error(
                "search_card_text",
                start,
                "query is required",
            ));
        }

        let filter = CardFilter {
            text: Some(params.query.clone()),
            limit: page_limit(params.limit),
            ..Default::default()
        };
        let page = self.store.search_cards(&filter);
        let results: Vec<CardSummary> =
            page.cards.iter().map(|&c| c.into()).collect();

        let summary = summarize_cards(&results, page.total);
        let response = CardListResponse {
            query: Some(params.query),
            count: results.len(),
            total: page.total,
            results,
        };
        respond("search_card_text", start, response.count, summary, &response)
    }

    #[tool(
        name = "get_format_legality",
        description = "Check a card's legality status across all formats"
    )]
    pub async fn get_format_legality(
        &self,
        params: Parameters<CardRefParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let start = Instant::now();
        let id = params.0.id;
        if id.trim().is_empty() {
            return Ok(tool_error("get_format_legality", start, "id is required"));
        }

        let Some(card) = self.store.resolve_card(&id) else {
            return Ok(tool_error(
                "get_format_legality",
                start,
                &format!("card not found: {id}"),
            ));
        };

        let report = LegalityReport::from(card);
        respond(
            "get_format_legality",
            start,
            report.legalities.len(),
            report.render(),
            &report,
        )
    }

    #[tool(
        name = "list_keywords",
        description = "List all game keywords with their explanations"
    )]
    pub async fn list_keywords(
        &self,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let start = Instant::now();
        let keywords: Vec<KeywordView> =
            self.store.keywords().iter().map(KeywordView::from).collect();
        let summary = keywords
            .iter()
            .map(|k| k.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let response = json!({
            "count": keywords.len(),
            "keywords": keywords,
        });
        respond("list_keywords", start, keywords.len(), summary, &response)
    }

    #[tool(
        name = "get_keyword",
        description = "Get the description of a specific keyword"
    )]
    pub async fn get_keyword(
        &self,
        params: Parameters<KeywordParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let start = Instant::now();
        let name = params.0.name;
        if name.trim().is_empty() {
            return Ok(tool_error("get_keyword", start, "name is required"));
        }

        let Some(keyword) = self.store.keyword_by_name(&name) else {
            return Ok(tool_error(
                "get_keyword",
                start,
                &format!("keyword not found: {name}"),
            ));
        };

        let view = KeywordView::from(keyword);
        let summary = format!("{}: {}", view.name, view.description);
        respond("get_keyword", start, 1, summary, &view)
    }

    #[tool(
        name = "list_abilities",
        description = "List the ability kinds cards can carry"
    )]
    pub async fn list_abilities(
        &self,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let start = Instant::now();
        let names: Vec<&str> = self
            .store
            .abilities()
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        let response = json!({
            "count": names.len(),
            "abilities": names,
        });
        respond("list_abilities", start, names.len(), names.join(", "), &response)
    }

    #[tool(
        name = "catalog_stats",
        description = "Entity and index counts of the loaded card catalog"
    )]
    pub async fn catalog_stats(
        &self,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let start = Instant::now();
        let stats = self.store.stats();
        let summary = format!(
            "{} cards, {} sets, {} keywords, {} abilities, {} types",
            stats.data.cards,
            stats.data.sets,
            stats.data.keywords,
            stats.data.abilities,
            stats.data.types,
        );
        respond("catalog_stats", start, 1, summary, &stats)
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for RatheMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_server_info(
                Implementation::new("rathe", env!("CARGO_PKG_VERSION"))
                    .with_title("rathe card catalog"),
            )
            .with_instructions(
                "Use search_cards to find Flesh and Blood cards, get_card for full details and get_format_legality before recommending a card for a format.",
            )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchCardsParams {
    /// Filter by card name (partial match).
    pub name: Option<String>,
    /// Filter by card type (e.g. 'Action', 'Attack', 'Equipment').
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    /// Filter by class (e.g. 'Warrior', 'Ninja', 'Wizard').
    pub class: Option<String>,
    /// Filter by set code (e.g. 'WTR', 'ARC', 'MON').
    pub set: Option<String>,
    /// Filter by pitch value ('1', '2' or '3').
    pub pitch: Option<String>,
    /// Filter by keyword (e.g. 'Go again', 'Dominate').
    pub keyword: Option<String>,
    /// Filter by text in the card's abilities.
    pub text: Option<String>,
    /// Only cards legal in this format (blitz, cc, commoner, ll,
    /// silver_age, upf).
    pub format: Option<String>,
    /// Maximum number of results (default 20, max 50).
    pub limit: Option<i64>,
    /// Number of results to skip.
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CardRefParams {
    /// The unique_id or exact name of the card.
    pub id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SearchSetsParams {
    /// Filter by set name (partial match, case-insensitive).
    pub name: Option<String>,
    /// Filter by set code (partial match, case-insensitive).
    pub id: Option<String>,
    /// Search both name and code.
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetSetParams {
    /// The set code (e.g. 'WTR', 'ARC').
    pub id: String,
    /// Include the cards printed in this set (default: false).
    #[serde(alias = "include_cards")]
    pub include_cards: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TextSearchParams {
    /// Text to search for in card abilities and effects.
    pub query: String,
    /// Maximum number of results (default 20, max 50).
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KeywordParams {
    /// The keyword name (e.g. 'Go again', 'Dominate').
    pub name: String,
}

#[derive(Debug, Serialize)]
struct CardListResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<String>,
    count: usize,
    total: usize,
    results: Vec<CardSummary>,
}

#[derive(Debug, Serialize)]
struct SetListResponse {
    count: usize,
    sets: Vec<SetSummary>,
}

/// Missing or non-positive limits fall back to the default; large ones are
/// capped.
fn page_limit(limit: Option<i64>) -> usize {
    match limit {
        Some(n) if n > 0 => usize::try_from(n).unwrap_or(MAX_LIMIT).min(MAX_LIMIT),
        _ => DEFAULT_LIMIT,
    }
}

fn summarize_cards(results: &[CardSummary], total: usize) -> String {
    if results.is_empty() {
        return format!("No cards found ({total} total)");
    }

    let mut lines = Vec::with_capacity(results.len() + 1);
    lines.push(format!("Showing {} of {total} cards:", results.len()));
    for card in results {
        lines.push(format!("{} {}", card.unique_id, card.line()));
    }
    lines.join("\n")
}

fn summarize_sets(sets: &[SetSummary]) -> String {
    if sets.is_empty() {
        return "No sets found".to_string();
    }
    sets.iter()
        .map(|s| format!("{} {}", s.id, s.name))
        .collect::<Vec<_>>()
        .join("\n")
}

fn respond(
    tool: &'static str,
    start: Instant,
    count: usize,
    summary: String,
    value: &impl Serialize,
) -> Result<CallToolResult, rmcp::ErrorData> {
    let structured = serde_json::to_value(value)
        .map_err(|e| mcp_error("failed to serialize tool result", e))?;
    info!(
        tool,
        count,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "tool call"
    );
    let mut result = CallToolResult::success(vec![Content::text(summary)]);
    result.structured_content = Some(structured);
    Ok(result)
}

fn tool_error(tool: &'static str, start: Instant, message: &str) -> CallToolResult {
    info!(
        tool,
        count = 0,
        elapsed_ms = start.elapsed().as_millis() as u64,
        error = message,
        "tool call"
    );
    CallToolResult::error(vec![Content::text(message.to_string())])
}

fn mcp_error(message: &str, error: impl std::fmt::Display) -> rmcp::ErrorData {
    rmcp::ErrorData::internal_error(
        message.to_string(),
        Some(json!({ "error": error.to_string() })),
    )
}

pub fn run_mcp(store: Store) -> error::Result<()> {
    let server = RatheMcpServer::new(Arc::new(store));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| {
            error::Error::Server(format!("failed to start tokio runtime: {e}"))
        })?;

    runtime.block_on(async move {
        let transport = rmcp::transport::stdio();
        let running = server.serve(transport).await.map_err(|e| {
            error::Error::Server(format!(
                "MCP server initialization failed: {e}"
            ))
        })?;
        running.waiting().await.map_err(|e| {
            error::Error::Server(format!("MCP server error: {e}"))
        })?;
        Ok(())
    })
}
