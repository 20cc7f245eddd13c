//! PokeAPI client with an on-disk response cache.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;

use crate::pager::PageWindow;
use crate::state::{
    PokemonAbility, PokemonDetail, PokemonStat, PokemonSummary, SpeciesInfo, SpriteUrls,
};

pub const API_BASE: &str = "https://pokeapi.co/api/v2";
const ENGLISH: &str = "en";

// ============================================================================
// Errors
// ============================================================================

/// Fetch-layer failure. Payloads are strings so errors can ride inside actions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum ApiError {
    Request(String),
    Status(u16),
    NotFound(String),
    Decode(String),
    MissingEnglish(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Request(e) => write!(f, "Request failed: {}", e),
            ApiError::Status(code) => write!(f, "Server returned HTTP {}", code),
            ApiError::NotFound(what) => write!(f, "Not found: {}", what),
            ApiError::Decode(e) => write!(f, "Unexpected response: {}", e),
            ApiError::MissingEnglish(name) => {
                write!(f, "No English Pokedex entry found for {}", name)
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

// ============================================================================
// Client configuration
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct ApiConfig {
    pub base: String,
    /// `None` disables the response cache.
    pub cache_dir: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base: API_BASE.to_string(),
            cache_dir: Some(default_cache_root()),
        }
    }
}

static CONFIG: OnceLock<ApiConfig> = OnceLock::new();

/// Installs the client configuration. Only the first call takes effect.
pub fn configure(config: ApiConfig) -> bool {
    CONFIG.set(config).is_ok()
}

fn config() -> &'static ApiConfig {
    CONFIG.get_or_init(ApiConfig::default)
}

pub fn default_cache_root() -> PathBuf {
    let base = dirs_next::cache_dir().unwrap_or_else(|| {
        std::env::var("HOME")
            .map(|home| PathBuf::from(home).join(".cache"))
            .unwrap_or_else(|_| PathBuf::from("."))
    });
    base.join("pokesearch")
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u16,
    name: String,
    base_experience: Option<u16>,
    height: u16,
    weight: u16,
    sprites: serde_json::Value,
    abilities: Vec<AbilitySlot>,
    types: Vec<TypeSlot>,
    stats: Vec<StatSlot>,
    moves: Vec<MoveSlot>,
    species: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct AbilitySlot {
    ability: NamedResource,
    #[serde(default)]
    is_hidden: bool,
}

#[derive(Clone, Debug, Deserialize)]
struct TypeSlot {
    slot: u8,
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct StatSlot {
    base_stat: u16,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct MoveSlot {
    #[serde(rename = "move")]
    move_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct SpeciesResponse {
    name: String,
    flavor_text_entries: Vec<FlavorTextEntry>,
    genera: Vec<GenusEntry>,
    color: Option<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct FlavorTextEntry {
    flavor_text: String,
    language: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct GenusEntry {
    genus: String,
    language: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
}

// ============================================================================
// Endpoints
// ============================================================================

pub async fn fetch_pokemon(slug: &str) -> Result<PokemonDetail, ApiError> {
    let url = format!("{}/pokemon/{slug}", config().base);
    let response: PokemonResponse = fetch_json_cached(&url).await.map_err(|err| match err {
        ApiError::NotFound(_) => ApiError::NotFound(slug.to_string()),
        other => other,
    })?;
    Ok(pokemon_from_response(response))
}

pub async fn fetch_species(url: &str) -> Result<SpeciesInfo, ApiError> {
    let response: SpeciesResponse = fetch_json_cached(url).await?;
    species_from_response(response)
}

pub async fn fetch_page(window: PageWindow) -> Result<Vec<PokemonSummary>, ApiError> {
    let url = format!(
        "{}/pokemon?limit={}&offset={}",
        config().base,
        window.limit,
        window.offset
    );
    let response: ListResponse = fetch_json_cached(&url).await?;
    Ok(summaries_from_list(response))
}

pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, ApiError> {
    fetch_bytes_cached(url).await
}

// ============================================================================
// Response mapping
// ============================================================================

fn pokemon_from_response(response: PokemonResponse) -> PokemonDetail {
    let mut type_slots = response.types;
    type_slots.sort_by_key(|slot| slot.slot);

    PokemonDetail {
        id: response.id,
        name: response.name,
        base_experience: response.base_experience,
        height: response.height,
        weight: response.weight,
        types: type_slots
            .into_iter()
            .map(|slot| slot.type_info.name)
            .collect(),
        abilities: response
            .abilities
            .into_iter()
            .map(|slot| PokemonAbility {
                name: slot.ability.name,
                hidden: slot.is_hidden,
            })
            .collect(),
        stats: response
            .stats
            .into_iter()
            .map(|slot| PokemonStat {
                name: slot.stat.name,
                value: slot.base_stat,
            })
            .collect(),
        moves: response
            .moves
            .into_iter()
            .map(|slot| slot.move_info.name)
            .collect(),
        sprites: SpriteUrls {
            front_default: pointer_string(&response.sprites, "/front_default"),
            official_artwork: pointer_string(
                &response.sprites,
                "/other/official-artwork/front_default",
            ),
            showdown: pointer_string(&response.sprites, "/other/showdown/front_default"),
        },
        species_url: Some(response.species.url).filter(|url| !url.is_empty()),
    }
}

fn species_from_response(response: SpeciesResponse) -> Result<SpeciesInfo, ApiError> {
    let flavor_text = response
        .flavor_text_entries
        .iter()
        .find(|entry| entry.language.name == ENGLISH)
        .map(|entry| sanitize_text(&entry.flavor_text))
        .ok_or_else(|| ApiError::MissingEnglish(response.name.clone()))?;
    let genus = response
        .genera
        .iter()
        .find(|entry| entry.language.name == ENGLISH)
        .map(|entry| entry.genus.clone());
    Ok(SpeciesInfo {
        name: response.name,
        flavor_text,
        genus,
        color: response.color.map(|color| color.name),
    })
}

fn summaries_from_list(response: ListResponse) -> Vec<PokemonSummary> {
    response
        .results
        .into_iter()
        .filter_map(|entry| {
            let id = id_from_url(&entry.url)?;
            Some(PokemonSummary {
                id,
                name: entry.name,
            })
        })
        .collect()
}

/// Numeric id from the trailing path segment, e.g. `.../pokemon/25/` -> 25.
pub fn id_from_url(url: &str) -> Option<u16> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
}

/// Flavor text carries hard line breaks and form feeds from the game data.
fn sanitize_text(text: &str) -> String {
    text.replace('\n', " ")
        .replace('\u{000C}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

// ============================================================================
// Transport + cache
// ============================================================================

async fn fetch_json_cached<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, ApiError> {
    let bytes = fetch_bytes_cached(url).await?;
    match serde_json::from_slice(&bytes) {
        Ok(value) => Ok(value),
        Err(err) => {
            if let Some(path) = cache_path(url) {
                let _ = fs::remove_file(&path).await;
            }
            Err(ApiError::Decode(err.to_string()))
        }
    }
}

async fn fetch_bytes_cached(url: &str) -> Result<Vec<u8>, ApiError> {
    let cache_path = cache_path(url);
    if let Some(path) = cache_path.as_deref() {
        if let Some(bytes) = read_cache(path).await {
            return Ok(bytes);
        }
    }

    let response = http_client()
        .get(url)
        .send()
        .await
        .map_err(|err| ApiError::Request(err.to_string()))?;
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(url.to_string()));
    }
    if !status.is_success() {
        return Err(ApiError::Status(status.as_u16()));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|err| ApiError::Request(err.to_string()))?
        .to_vec();
    if let Some(path) = cache_path.as_deref() {
        write_cache(path, &bytes).await;
    }
    Ok(bytes)
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}

fn cache_path(url: &str) -> Option<PathBuf> {
    let root = config().cache_dir.as_ref()?;
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    let digest = hex::encode(hasher.finalize());
    Some(root.join("http").join(digest))
}

async fn read_cache(path: &Path) -> Option<Vec<u8>> {
    fs::read(path).await.ok()
}

async fn write_cache(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent).await;
    }
    let _ = fs::write(path, bytes).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIKACHU: &str = r#"{
        "id": 25,
        "name": "pikachu",
        "base_experience": 112,
        "height": 4,
        "weight": 60,
        "sprites": {
            "front_default": "https://example.test/front/25.png",
            "other": {
                "official-artwork": { "front_default": "https://example.test/art/25.png" },
                "showdown": { "front_default": null }
            }
        },
        "abilities": [
            { "ability": { "name": "static", "url": "" }, "is_hidden": false, "slot": 1 },
            { "ability": { "name": "lightning-rod", "url": "" }, "is_hidden": true, "slot": 3 }
        ],
        "types": [
            { "slot": 1, "type": { "name": "electric", "url": "" } }
        ],
        "stats": [
            { "base_stat": 35, "effort": 0, "stat": { "name": "hp", "url": "" } },
            { "base_stat": 90, "effort": 2, "stat": { "name": "speed", "url": "" } }
        ],
        "moves": [
            { "move": { "name": "thunder-shock", "url": "" }, "version_group_details": [] },
            { "move": { "name": "quick-attack", "url": "" }, "version_group_details": [] }
        ],
        "species": { "name": "pikachu", "url": "https://pokeapi.co/api/v2/pokemon-species/25/" }
    }"#;

    #[test]
    fn test_pokemon_mapping() {
        let response: PokemonResponse = serde_json::from_str(PIKACHU).unwrap();
        let detail = pokemon_from_response(response);

        assert_eq!(detail.id, 25);
        assert_eq!(detail.name, "pikachu");
        assert_eq!(detail.base_experience, Some(112));
        assert_eq!((detail.height, detail.weight), (4, 60));
        assert_eq!(detail.types, vec!["electric".to_string()]);
        assert_eq!(detail.abilities.len(), 2);
        assert!(detail.abilities[1].hidden);
        assert_eq!(detail.stats[1].name, "speed");
        assert_eq!(detail.stats[1].value, 90);
        assert_eq!(detail.moves, vec!["thunder-shock", "quick-attack"]);
        assert_eq!(
            detail.sprites.official_artwork.as_deref(),
            Some("https://example.test/art/25.png")
        );
        assert_eq!(detail.sprites.showdown, None);
        assert_eq!(
            detail.species_url.as_deref(),
            Some("https://pokeapi.co/api/v2/pokemon-species/25/")
        );
    }

    #[test]
    fn test_types_sorted_by_slot() {
        let mut value: serde_json::Value = serde_json::from_str(PIKACHU).unwrap();
        value["types"] = serde_json::json!([
            { "slot": 2, "type": { "name": "flying", "url": "" } },
            { "slot": 1, "type": { "name": "normal", "url": "" } }
        ]);
        let response: PokemonResponse = serde_json::from_value(value).unwrap();
        let detail = pokemon_from_response(response);
        assert_eq!(detail.types, vec!["normal", "flying"]);
    }

    #[test]
    fn test_species_picks_english_and_sanitizes() {
        let json = r#"{
            "name": "pikachu",
            "flavor_text_entries": [
                { "flavor_text": "Quand plusieurs...", "language": { "name": "fr", "url": "" } },
                { "flavor_text": "When several of\nthese POKéMON\fgather, their", "language": { "name": "en", "url": "" } }
            ],
            "genera": [
                { "genus": "Souris", "language": { "name": "fr", "url": "" } },
                { "genus": "Mouse Pokémon", "language": { "name": "en", "url": "" } }
            ],
            "color": { "name": "yellow", "url": "" }
        }"#;
        let response: SpeciesResponse = serde_json::from_str(json).unwrap();
        let species = species_from_response(response).unwrap();

        assert_eq!(
            species.flavor_text,
            "When several of these POKéMON gather, their"
        );
        assert_eq!(species.genus.as_deref(), Some("Mouse Pokémon"));
        assert_eq!(species.color.as_deref(), Some("yellow"));
    }

    #[test]
    fn test_species_without_english_entry_fails() {
        let json = r#"{
            "name": "pikachu",
            "flavor_text_entries": [
                { "flavor_text": "ピカチュウ", "language": { "name": "ja", "url": "" } }
            ],
            "genera": [],
            "color": null
        }"#;
        let response: SpeciesResponse = serde_json::from_str(json).unwrap();
        let error = species_from_response(response).unwrap_err();
        assert_eq!(error, ApiError::MissingEnglish("pikachu".into()));
    }

    #[test]
    fn test_list_mapping_extracts_ids() {
        let json = r#"{
            "count": 1302,
            "next": null,
            "previous": null,
            "results": [
                { "name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/" },
                { "name": "broken", "url": "https://pokeapi.co/api/v2/pokemon/" },
                { "name": "pikachu", "url": "https://pokeapi.co/api/v2/pokemon/25" }
            ]
        }"#;
        let response: ListResponse = serde_json::from_str(json).unwrap();
        let entries = summaries_from_list(response);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, 1);
        assert_eq!(entries[1].name, "pikachu");
        assert_eq!(entries[1].id, 25);
    }

    #[test]
    fn test_id_from_url() {
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/25/"), Some(25));
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/10034"), Some(10034));
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/"), None);
        assert_eq!(id_from_url(""), None);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ApiError::NotFound("raichu-alola".into()).to_string(),
            "Not found: raichu-alola"
        );
        assert_eq!(ApiError::Status(503).to_string(), "Server returned HTTP 503");
        assert!(ApiError::NotFound("x".into()).is_not_found());
        assert!(!ApiError::Status(500).is_not_found());
    }
}
