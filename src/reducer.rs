//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::naming;
use crate::pager;
use crate::state::{AppState, ViewMode};

pub const NOT_FOUND_MESSAGE: &str = "Pokemon not found. Please try again.";

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => match state.view {
            ViewMode::Browse => load_page(state),
            ViewMode::Search => {
                let query = state.search_query.trim().to_string();
                if query.is_empty() {
                    state.search_active = true;
                    DispatchResult::changed()
                } else {
                    submit_query(state, query)
                }
            }
        },

        // ===== Search actions =====
        Action::SearchOpen => {
            state.search_active = true;
            state.search_query.clear();
            DispatchResult::changed()
        }

        Action::SearchClose => {
            if !state.search_active {
                return DispatchResult::unchanged();
            }
            state.search_active = false;
            state.search_query.clear();
            DispatchResult::changed()
        }

        Action::SearchQueryChange(query) => {
            state.search_query = query;
            DispatchResult::changed()
        }

        Action::SearchQuerySubmit(query) => {
            let query = query.trim().to_string();
            if query.is_empty() {
                return DispatchResult::unchanged();
            }
            submit_query(state, query)
        }

        // ===== Pokemon actions =====
        Action::PokemonDidLoad { slug, detail } => {
            if state.last_slug.as_deref() != Some(slug.as_str()) {
                return DispatchResult::unchanged();
            }
            if state.species_for.as_deref() != Some(detail.name.as_str()) {
                state.species = DataResource::Empty;
                state.species_for = None;
            }
            state.reset_sprite();
            state.message = None;

            let fetch_sprite = detail.sprites.preferred().map(|url| Effect::FetchSprite {
                name: detail.name.clone(),
                url: url.to_string(),
            });
            state.sprite_loading = fetch_sprite.is_some();
            state.pokemon = DataResource::Loaded(detail);

            match fetch_sprite {
                Some(effect) => DispatchResult::changed_with(effect),
                None => DispatchResult::changed(),
            }
        }

        Action::PokemonDidError { slug, error } => {
            if state.last_slug.as_deref() != Some(slug.as_str()) {
                return DispatchResult::unchanged();
            }
            let message = if error.is_not_found() {
                NOT_FOUND_MESSAGE.to_string()
            } else {
                error.to_string()
            };
            state.pokemon = DataResource::Failed(message.clone());
            state.message = Some(message);
            state.species = DataResource::Empty;
            state.species_for = None;
            state.species_modal_open = false;
            state.reset_sprite();
            DispatchResult::changed()
        }

        // ===== Sprite actions =====
        Action::SpriteDidLoad { name, sprite } => {
            if state.current_name() != Some(name.as_str()) {
                return DispatchResult::unchanged();
            }
            state.sprite = Some(sprite);
            state.sprite_for = Some(name);
            state.sprite_loading = false;
            state.sprite_frame_index = 0;
            DispatchResult::changed()
        }

        Action::SpriteDidError { name, error } => {
            if state.current_name() != Some(name.as_str()) {
                return DispatchResult::unchanged();
            }
            state.sprite_loading = false;
            state.message = Some(format!("Sprite unavailable: {error}"));
            DispatchResult::changed()
        }

        // ===== Species actions =====
        Action::SpeciesOpen => {
            let Some(detail) = state.pokemon.data() else {
                return DispatchResult::unchanged();
            };
            let name = detail.name.clone();
            let species_url = detail.species_url.clone();
            state.species_modal_open = true;

            if state.species_pending_or_loaded(&name) {
                return DispatchResult::changed();
            }
            state.species_for = Some(name.clone());
            match species_url {
                Some(url) => {
                    state.species = DataResource::Loading;
                    DispatchResult::changed_with(Effect::FetchSpecies { name, url })
                }
                None => {
                    state.species =
                        DataResource::Failed(format!("No species record for {name}"));
                    DispatchResult::changed()
                }
            }
        }

        Action::SpeciesClose => {
            if !state.species_modal_open {
                return DispatchResult::unchanged();
            }
            state.species_modal_open = false;
            DispatchResult::changed()
        }

        Action::SpeciesDidLoad { name, species } => {
            if state.current_name() != Some(name.as_str()) {
                return DispatchResult::unchanged();
            }
            state.species = DataResource::Loaded(species);
            state.species_for = Some(name);
            DispatchResult::changed()
        }

        Action::SpeciesDidError { name, error } => {
            if state.current_name() != Some(name.as_str()) {
                return DispatchResult::unchanged();
            }
            state.species = DataResource::Failed(error);
            state.species_for = Some(name);
            DispatchResult::changed()
        }

        // ===== Browse actions =====
        Action::BrowseOpen => open_browse(state),

        Action::BrowseNextPage => {
            if state.browse.page >= state.browse.total_pages() {
                return DispatchResult::unchanged();
            }
            state.browse.page += 1;
            load_page(state)
        }

        Action::BrowsePrevPage => {
            if state.browse.page <= 1 {
                return DispatchResult::unchanged();
            }
            state.browse.page -= 1;
            load_page(state)
        }

        Action::BrowseNextGeneration => {
            let count = pager::generation_count();
            state.browse.generation = (state.browse.generation + 1) % count;
            state.browse.page = 1;
            load_page(state)
        }

        Action::BrowsePrevGeneration => {
            let count = pager::generation_count();
            state.browse.generation = (state.browse.generation + count - 1) % count;
            state.browse.page = 1;
            load_page(state)
        }

        Action::BrowseSelect(index) => {
            if index < state.browse.entry_count() && index != state.browse.selected {
                state.browse.selected = index;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::BrowseConfirm => {
            let Some(entry) = state.browse.selected_entry() else {
                return DispatchResult::unchanged();
            };
            let name = entry.name.clone();
            submit_query(state, name)
        }

        Action::BrowseDidLoad {
            generation,
            page,
            entries,
        } => {
            if generation != state.browse.generation || page != state.browse.page {
                return DispatchResult::unchanged();
            }
            state.browse.entries = DataResource::Loaded(entries);
            state.browse.selected = 0;
            DispatchResult::changed()
        }

        Action::BrowseDidError {
            generation,
            page,
            error,
        } => {
            if generation != state.browse.generation || page != state.browse.page {
                return DispatchResult::unchanged();
            }
            state.browse.entries = DataResource::Failed(error);
            state.browse.selected = 0;
            DispatchResult::changed()
        }

        // ===== UI actions =====
        Action::UiToggleView => match state.view {
            ViewMode::Search => open_browse(state),
            ViewMode::Browse => {
                state.view = ViewMode::Search;
                DispatchResult::changed()
            }
        },

        Action::UiToggleUnits => {
            state.units = state.units.toggle();
            DispatchResult::changed()
        }

        Action::UiToggleSection(section) => {
            state.sections.toggle(section);
            DispatchResult::changed()
        }

        Action::Render => DispatchResult::changed(),

        // ===== Global actions =====
        Action::Tick => {
            let mut changed = false;
            if state.animating() {
                state.tick_count = state.tick_count.wrapping_add(1);
                changed = true;
            }
            if state.view == ViewMode::Search {
                let frames = state
                    .current_sprite()
                    .filter(|sprite| sprite.is_animated())
                    .map(|sprite| sprite.frames.len());
                if let Some(frames) = frames {
                    state.sprite_frame_index = (state.sprite_frame_index + 1) % frames;
                    changed = true;
                }
            }
            if changed {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn submit_query(state: &mut AppState, query: String) -> DispatchResult<Effect> {
    let slug = naming::resolve(&query);
    if slug.is_empty() {
        return DispatchResult::unchanged();
    }
    state.search_active = false;
    state.search_query.clear();
    state.view = ViewMode::Search;
    state.species_modal_open = false;
    state.message = None;
    state.last_query = Some(query);
    state.last_slug = Some(slug.clone());
    state.pokemon = DataResource::Loading;
    state.tick_count = 0;
    state.reset_sprite();
    DispatchResult::changed_with(Effect::FetchPokemon { slug })
}

fn open_browse(state: &mut AppState) -> DispatchResult<Effect> {
    state.view = ViewMode::Browse;
    state.search_active = false;
    state.species_modal_open = false;
    if state.browse.entries.is_empty() {
        load_page(state)
    } else {
        DispatchResult::changed()
    }
}

/// Requests the current browse page. A window past the end of the
/// generation loads as an empty page without touching the network.
fn load_page(state: &mut AppState) -> DispatchResult<Effect> {
    state.browse.selected = 0;
    let window = state.browse.window();
    if window.is_empty() {
        state.browse.entries = DataResource::Loaded(Vec::new());
        return DispatchResult::changed();
    }
    state.browse.entries = DataResource::Loading;
    DispatchResult::changed_with(Effect::FetchPage {
        generation: state.browse.generation,
        page: state.browse.page,
        window,
    })
}
