//! EffectStoreTestHarness flows: keys through the root view, then the store

use tui_dispatch::testing::*;
use tui_dispatch::{DataResource, NumericComponentId};
use pokesearch::{
    action::Action,
    components::{Component, PokedexView, PokedexViewProps},
    effect::Effect,
    reducer::reducer,
    state::{AppState, PokemonDetail, PokemonSummary, SpeciesInfo, SpriteUrls, ViewMode},
    units::UnitSystem,
};

fn eevee() -> PokemonDetail {
    PokemonDetail {
        id: 133,
        name: "eevee".into(),
        base_experience: Some(65),
        height: 3,
        weight: 65,
        types: vec!["normal".into()],
        abilities: Vec::new(),
        stats: Vec::new(),
        moves: Vec::new(),
        sprites: SpriteUrls::default(),
        species_url: Some("https://pokeapi.co/api/v2/pokemon-species/133/".into()),
    }
}

fn summaries(names: &[&str]) -> Vec<PokemonSummary> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| PokemonSummary {
            id: i as u16 + 1,
            name: name.to_string(),
        })
        .collect()
}

/// Routes key strings through the root view with the harness state.
macro_rules! press_keys {
    ($harness:expr, $view:expr, $keys:expr) => {
        $harness.send_keys::<NumericComponentId, _, _>($keys, |state, event| {
            $view
                .handle_event(
                    &event.kind,
                    PokedexViewProps {
                        state,
                        is_focused: true,
                    },
                )
                .into_iter()
                .collect::<Vec<_>>()
        })
    };
}

#[test]
fn test_search_flow_with_harness() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::SearchOpen);
    harness.assert_state(|s| s.search_active);

    harness.dispatch_collect(Action::SearchQuerySubmit("Eevee".into()));
    harness.assert_state(|s| !s.search_active && s.pokemon.is_loading());

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::FetchPokemon { slug } if slug == "eevee"));

    harness.complete_action(Action::PokemonDidLoad {
        slug: "eevee".into(),
        detail: eevee(),
    });
    let (changed, total) = harness.process_emitted();
    assert_eq!(total, 1);
    assert_eq!(changed, 1);

    harness.assert_state(|s| s.current_name() == Some("eevee"));
    // No sprite URLs, so nothing else to fetch.
    harness.drain_effects().effects_empty();
}

#[test]
fn test_species_flow_with_harness() {
    let state = AppState {
        pokemon: DataResource::Loaded(eevee()),
        ..Default::default()
    };
    let mut harness = EffectStoreTestHarness::new(state, reducer);
    let mut view = PokedexView::new();

    let actions = press_keys!(harness, view, "i");
    actions.assert_first(Action::SpeciesOpen);
    for action in actions {
        harness.dispatch_collect(action);
    }
    harness.assert_state(|s| s.species_modal_open && s.species.is_loading());
    harness
        .drain_effects()
        .effects_first_matches(|e| matches!(e, Effect::FetchSpecies { name, .. } if name == "eevee"));

    harness.complete_action(Action::SpeciesDidLoad {
        name: "eevee".into(),
        species: SpeciesInfo {
            name: "eevee".into(),
            flavor_text: "Its genetic code is irregular.".into(),
            genus: Some("Evolution Pokémon".into()),
            color: Some("brown".into()),
        },
    });
    harness.process_emitted();
    harness.assert_state(|s| s.species.is_loaded());
}

#[test]
fn test_late_species_for_previous_creature_is_dropped() {
    let state = AppState {
        pokemon: DataResource::Loaded(eevee()),
        ..Default::default()
    };
    let mut harness = EffectStoreTestHarness::new(state, reducer);
    harness.dispatch_collect(Action::SpeciesOpen);
    harness.dispatch_collect(Action::SearchQuerySubmit("pikachu".into()));

    harness.complete_action(Action::SpeciesDidError {
        name: "eevee".into(),
        error: "timeout".into(),
    });
    let (changed, total) = harness.process_emitted();
    assert_eq!(total, 1);
    assert_eq!(changed, 0);
    harness.assert_state(|s| !s.species_modal_open);
}

#[test]
fn test_browse_then_confirm() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    let mut view = PokedexView::new();

    harness.dispatch_collect(Action::UiToggleView);
    harness.assert_state(|s| s.view == ViewMode::Browse);
    harness
        .drain_effects()
        .effects_first_matches(|e| matches!(e, Effect::FetchPage { page: 1, .. }));

    harness.complete_action(Action::BrowseDidLoad {
        generation: 0,
        page: 1,
        entries: summaries(&["bulbasaur", "ivysaur", "venusaur"]),
    });
    harness.process_emitted();

    let actions = press_keys!(harness, view, "j");
    actions.assert_first(Action::BrowseSelect(1));
    for action in actions {
        harness.dispatch_collect(action);
    }
    harness.assert_state(|s| s.browse.selected == 1);

    harness.dispatch_collect(Action::BrowseConfirm);
    harness.assert_state(|s| s.view == ViewMode::Search && s.pokemon.is_loading());
    harness
        .drain_effects()
        .effects_first_matches(|e| matches!(e, Effect::FetchPokemon { slug } if slug == "ivysaur"));
}

#[test]
fn test_returning_to_browse_keeps_page() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::BrowseOpen);
    harness.complete_action(Action::BrowseDidLoad {
        generation: 0,
        page: 1,
        entries: summaries(&["bulbasaur"]),
    });
    harness.process_emitted();
    harness.drain_effects();

    harness.dispatch_collect(Action::UiToggleView);
    harness.dispatch_collect(Action::UiToggleView);
    harness.assert_state(|s| s.view == ViewMode::Browse && s.browse.entries.is_loaded());
    harness.drain_effects().effects_empty();
}

#[test]
fn test_keyboard_toggle_units() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    let mut view = PokedexView::new();

    let actions = press_keys!(harness, view, "u");
    for action in actions {
        harness.dispatch_collect(action);
    }
    harness.assert_state(|s| s.units == UnitSystem::Imperial);
}

#[test]
fn test_tick_only_changes_while_animating() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    let results = harness.dispatch_all([Action::Tick, Action::Tick]);
    assert_eq!(results, vec![false, false]);

    harness.dispatch_collect(Action::SearchQuerySubmit("eevee".into()));
    let results = harness.dispatch_all([Action::Tick, Action::Tick]);
    assert_eq!(results, vec![true, true]);
    harness.assert_state(|s| s.tick_count == 2);
}

#[test]
fn test_render_browse_page() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    let mut view = PokedexView::new();
    harness.dispatch_collect(Action::BrowseOpen);
    harness.complete_action(Action::BrowseDidLoad {
        generation: 0,
        page: 1,
        entries: summaries(&["bulbasaur", "ivysaur"]),
    });
    harness.process_emitted();

    let output = harness.render_plain(90, 24, |frame, area, state| {
        view.render(
            frame,
            area,
            PokedexViewProps {
                state,
                is_focused: true,
            },
        );
    });

    assert!(
        output.contains("Generation I · Page 1/8"),
        "Browse header should be visible:\n{}",
        output
    );
    assert!(output.contains("#002 ivysaur"));
}
