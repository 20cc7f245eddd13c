//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::pager::{self, PageWindow};
use crate::sprite::SpriteData;
use crate::units::UnitSystem;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonStat {
    pub name: String,
    pub value: u16,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonAbility {
    pub name: String,
    pub hidden: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpriteUrls {
    pub front_default: Option<String>,
    pub official_artwork: Option<String>,
    /// Animated GIF.
    pub showdown: Option<String>,
}

impl SpriteUrls {
    /// Animated sprite first, then the artwork, then the small front sprite.
    pub fn preferred(&self) -> Option<&str> {
        self.showdown
            .as_deref()
            .or(self.official_artwork.as_deref())
            .or(self.front_default.as_deref())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonDetail {
    pub id: u16,
    pub name: String,
    pub base_experience: Option<u16>,
    /// Decimetres.
    pub height: u16,
    /// Hectograms.
    pub weight: u16,
    pub types: Vec<String>,
    pub abilities: Vec<PokemonAbility>,
    pub stats: Vec<PokemonStat>,
    pub moves: Vec<String>,
    pub sprites: SpriteUrls,
    pub species_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpeciesInfo {
    pub name: String,
    pub flavor_text: String,
    pub genus: Option<String>,
    pub color: Option<String>,
}

/// One row of a browse page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonSummary {
    pub id: u16,
    pub name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub enum ViewMode {
    #[default]
    Search,
    Browse,
}

/// Collapsible parts of the card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Section {
    Stats,
    Abilities,
    Moves,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Stats, Section::Abilities, Section::Moves];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Stats => "Base Stats",
            Section::Abilities => "Abilities",
            Section::Moves => "Moves",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Sections {
    pub stats: bool,
    pub abilities: bool,
    pub moves: bool,
}

impl Default for Sections {
    fn default() -> Self {
        Self {
            stats: true,
            abilities: false,
            moves: false,
        }
    }
}

impl Sections {
    pub fn is_open(&self, section: Section) -> bool {
        match section {
            Section::Stats => self.stats,
            Section::Abilities => self.abilities,
            Section::Moves => self.moves,
        }
    }

    pub fn toggle(&mut self, section: Section) {
        let flag = match section {
            Section::Stats => &mut self.stats,
            Section::Abilities => &mut self.abilities,
            Section::Moves => &mut self.moves,
        };
        *flag = !*flag;
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BrowseState {
    /// Index into the generation table.
    pub generation: usize,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
    pub selected: usize,
    pub entries: DataResource<Vec<PokemonSummary>>,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self {
            generation: 0,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            selected: 0,
            entries: DataResource::Empty,
        }
    }
}

impl BrowseState {
    pub fn window(&self) -> PageWindow {
        pager::page(self.generation, self.page, self.page_size)
    }

    pub fn total_pages(&self) -> usize {
        pager::total_pages(self.generation, self.page_size)
    }

    pub fn generation_label(&self) -> &'static str {
        pager::generation(self.generation)
            .map(|generation| generation.label)
            .unwrap_or("Unknown generation")
    }

    pub fn selected_entry(&self) -> Option<&PokemonSummary> {
        self.entries
            .data()
            .and_then(|entries| entries.get(self.selected))
    }

    pub fn entry_count(&self) -> usize {
        self.entries.data().map(Vec::len).unwrap_or(0)
    }
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    #[debug(section = "View", label = "Mode", debug_fmt)]
    pub view: ViewMode,

    #[debug(section = "View", label = "Units", debug_fmt)]
    pub units: UnitSystem,

    #[debug(section = "View", label = "Sections", debug_fmt)]
    pub sections: Sections,

    #[debug(section = "View", label = "Message", debug_fmt)]
    pub message: Option<String>,

    #[debug(section = "Search", label = "Active")]
    pub search_active: bool,

    #[debug(section = "Search", label = "Query")]
    pub search_query: String,

    /// Last submitted query, as typed.
    #[debug(section = "Search", label = "Last query", debug_fmt)]
    pub last_query: Option<String>,

    #[debug(section = "Search", label = "Last slug", debug_fmt)]
    pub last_slug: Option<String>,

    #[debug(section = "Pokemon", label = "Data", debug_fmt)]
    pub pokemon: DataResource<PokemonDetail>,

    #[debug(section = "Species", label = "Modal open")]
    pub species_modal_open: bool,

    /// Creature name the species resource belongs to.
    #[debug(section = "Species", label = "For", debug_fmt)]
    pub species_for: Option<String>,

    #[debug(section = "Species", label = "Data", debug_fmt)]
    pub species: DataResource<SpeciesInfo>,

    #[debug(section = "Browse", label = "Page", debug_fmt)]
    pub browse: BrowseState,

    #[debug(skip)]
    pub sprite: Option<SpriteData>,

    #[debug(skip)]
    pub sprite_for: Option<String>,

    #[debug(skip)]
    pub sprite_loading: bool,

    #[debug(skip)]
    pub sprite_frame_index: usize,

    /// Banner animation counter.
    #[debug(skip)]
    pub tick_count: u32,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            view: ViewMode::default(),
            units: UnitSystem::default(),
            sections: Sections::default(),
            message: None,
            search_active: false,
            search_query: String::new(),
            last_query: None,
            last_slug: None,
            pokemon: DataResource::Empty,
            species_modal_open: false,
            species_for: None,
            species: DataResource::Empty,
            browse: BrowseState::default(),
            sprite: None,
            sprite_for: None,
            sprite_loading: false,
            sprite_frame_index: 0,
            tick_count: 0,
        }
    }
}

impl AppState {
    pub fn current_name(&self) -> Option<&str> {
        self.pokemon.data().map(|detail| detail.name.as_str())
    }

    /// Sprite for the creature on screen, if it has arrived.
    pub fn current_sprite(&self) -> Option<&SpriteData> {
        let name = self.current_name()?;
        if self.sprite_for.as_deref() == Some(name) {
            self.sprite.as_ref()
        } else {
            None
        }
    }

    pub fn species_pending_or_loaded(&self, name: &str) -> bool {
        self.species_for.as_deref() == Some(name)
            && (self.species.is_loading() || self.species.is_loaded())
    }

    pub fn animating(&self) -> bool {
        self.pokemon.is_loading()
            || self.browse.entries.is_loading()
            || (self.view == ViewMode::Search && self.pokemon.is_loaded())
    }

    pub(crate) fn reset_sprite(&mut self) {
        self.sprite = None;
        self.sprite_for = None;
        self.sprite_loading = false;
        self.sprite_frame_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferred_sprite_order() {
        let mut urls = SpriteUrls {
            front_default: Some("front".into()),
            official_artwork: Some("art".into()),
            showdown: Some("anim".into()),
        };
        assert_eq!(urls.preferred(), Some("anim"));
        urls.showdown = None;
        assert_eq!(urls.preferred(), Some("art"));
        urls.official_artwork = None;
        assert_eq!(urls.preferred(), Some("front"));
        assert_eq!(SpriteUrls::default().preferred(), None);
    }

    #[test]
    fn test_sections_default_and_toggle() {
        let mut sections = Sections::default();
        assert!(sections.is_open(Section::Stats));
        assert!(!sections.is_open(Section::Moves));
        sections.toggle(Section::Moves);
        sections.toggle(Section::Stats);
        assert!(sections.is_open(Section::Moves));
        assert!(!sections.is_open(Section::Stats));
    }

    #[test]
    fn test_browse_defaults() {
        let browse = BrowseState::default();
        assert_eq!(browse.window(), PageWindow { offset: 0, limit: 20 });
        assert_eq!(browse.total_pages(), 8);
        assert_eq!(browse.generation_label(), "Generation I");
        assert!(browse.selected_entry().is_none());
    }
}
