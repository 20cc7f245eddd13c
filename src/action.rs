//! Actions, grouped by category prefix

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::sprite::SpriteData;
use crate::state::{PokemonDetail, PokemonSummary, Section, SpeciesInfo};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    /// Startup: run the initial query or open the browse page
    Init,

    // ===== Search category =====
    SearchOpen,
    SearchClose,
    SearchQueryChange(String),
    /// Resolve the query to a slug and fetch it
    SearchQuerySubmit(String),

    // ===== Pokemon category =====
    /// `slug` is the lookup that produced the record
    PokemonDidLoad { slug: String, detail: PokemonDetail },
    PokemonDidError { slug: String, error: ApiError },

    // ===== Sprite category =====
    SpriteDidLoad { name: String, sprite: SpriteData },
    SpriteDidError { name: String, error: String },

    // ===== Species category =====
    /// Open the Pokedex entry modal for the current creature
    SpeciesOpen,
    SpeciesClose,
    SpeciesDidLoad { name: String, species: SpeciesInfo },
    SpeciesDidError { name: String, error: String },

    // ===== Browse category =====
    BrowseOpen,
    BrowseNextPage,
    BrowsePrevPage,
    BrowseNextGeneration,
    BrowsePrevGeneration,
    BrowseSelect(usize),
    /// Look up the selected entry
    BrowseConfirm,
    BrowseDidLoad {
        generation: usize,
        page: usize,
        entries: Vec<PokemonSummary>,
    },
    BrowseDidError {
        generation: usize,
        page: usize,
        error: String,
    },

    // ===== UI category =====
    /// Switch between the card and the browse list
    UiToggleView,
    UiToggleUnits,
    UiToggleSection(Section),
    /// Force a re-render (cursor movement)
    Render,

    // ===== Uncategorized (global) =====
    Tick,
    Quit,
}
