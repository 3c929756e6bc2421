use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::catalog::{Catalog, Game};
use crate::errors::ApiError;
use crate::models::{ChatReply, ChatRequest, ServiceInfo};
use crate::ollama::OllamaClient;

/// Shared state behind the HTTP handlers.
#[derive(Clone)]
pub struct ShopService {
    catalog: Arc<Catalog>,
    ollama: OllamaClient,
    model: String,
}

impl ShopService {
    pub fn new(catalog: Catalog, ollama: OllamaClient, model: &str) -> Self {
        Self {
            catalog: Arc::new(catalog),
            ollama,
            model: model.to_string(),
        }
    }

    /// Answer one question. Questions mentioning "genre" or "game" are
    /// answered from the catalog alone; the leftover words after deleting
    /// those two substrings are taken verbatim as the genre to look up, so
    /// a chatty phrasing can turn into a lookup that matches nothing.
    /// Everything else goes to the language model with the catalog and the
    /// conversation history in the prompt.
    pub async fn answer(&self, question: &str, context: &str) -> Result<String, ApiError> {
        let lowered = question.to_lowercase();
        if lowered.contains("genre") || lowered.contains("game") {
            let genre = lowered.replace("genre", "").replace("game", "");
            let genre = genre.trim();
            let matching = self.catalog.games_in_genre(genre);
            if !matching.is_empty() {
                Ok(genre_listing(genre, &matching))
            } else {
                Ok(format!(
                    "Sorry, we don't have any games in the {genre} genre."
                ))
            }
        } else {
            let prompt = build_prompt(&self.catalog, context, question);
            self.ollama
                .query(&self.model, &prompt)
                .await
                .map_err(|err| ApiError::from_ollama(err, self.ollama.base_url()))
        }
    }
}

/// First letter uppercased, the rest lowered.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}

fn genre_listing(genre: &str, games: &[&Game]) -> String {
    let mut response = format!(
        "Here are the games available in the {} genre:\n",
        capitalize(genre)
    );
    for game in games {
        response.push_str(&format!("- {}\n", game.name));
    }
    response.push_str("Would you like to know the price and other details of these games? (yes/no)");
    response
}

fn build_prompt(catalog: &Catalog, context: &str, question: &str) -> String {
    let mut listing = String::new();
    for game in catalog.games() {
        listing.push_str(&format!(
            "- {} (genre: {}, account level: {}, price: ${}, price debatable: {})\n",
            game.name,
            game.genre,
            game.account_level,
            game.price,
            if game.price_debatable { "yes" } else { "no" }
        ));
    }

    format!(
        "You are a chatbot for an ecommerce website that sells games. \
You must answer questions based on the catalog data provided below only. \
Provide detailed information about games, their genres, account levels, \
prices, and whether the price is debatable.\n\n\
Catalog:\n{listing}\n\
Here is the conversation history: {context}\n\n\
Question: {question}\n\n\
Answer:"
    )
}

async fn chat_handler(
    State(service): State<ShopService>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    let response = service.answer(&request.question, &request.context).await?;
    Ok(Json(ChatReply { response }))
}

async fn info_handler(State(service): State<ShopService>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: service.model.clone(),
        games: service.catalog.len(),
    })
}

pub fn router(service: ShopService) -> Router {
    Router::new()
        .route("/", get(info_handler))
        .route("/chat", post(chat_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

pub async fn serve(service: ShopService, addr: &str) -> Result<()> {
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{addr}/");
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
