//! Pokesearch TUI

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{layout::Rect, Frame, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokesearch::action::Action;
use pokesearch::api;
use pokesearch::components::{
    search_area, species_area, Component, PokedexView, PokedexViewProps, SearchBar,
    SearchBarProps, SpeciesModal, SpeciesModalProps,
};
use pokesearch::config::Config;
use pokesearch::effect::Effect;
use pokesearch::naming;
use pokesearch::reducer::reducer;
use pokesearch::sprite;
use pokesearch::sprite_backend::{self, SpriteBackend};
use pokesearch::state::{AppState, ViewMode};
use pokesearch::units::UnitSystem;

const TICK_MS: u64 = 90;

/// Pokemon lookup and generation browser for the terminal
#[derive(Parser, Debug)]
#[command(name = "pokesearch")]
#[command(about = "Search the PokeAPI by spoken name or browse by generation")]
struct Args {
    /// Name to look up on start, e.g. "Alolan Raichu"
    #[arg(long)]
    query: Option<String>,

    /// Start in the generation browser
    #[arg(long)]
    browse: bool,

    /// Generation to browse (1-9)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=9))]
    generation: Option<u8>,

    /// Entries per browse page
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    page_size: Option<u16>,

    /// Show heights and weights in feet and pounds
    #[arg(long)]
    imperial: bool,

    /// Config file (defaults to <config dir>/pokesearch/config.ron)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip the on-disk response cache
    #[arg(long)]
    no_cache: bool,

    /// Print the API slug for NAME and exit
    #[arg(long, value_name = "NAME")]
    resolve: Option<String>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum PokeComponentId {
    Main,
    Search,
    Species,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum PokeContext {
    Main,
    Search,
    Species,
}

impl EventRoutingState<PokeComponentId, PokeContext> for AppState {
    fn focused(&self) -> Option<PokeComponentId> {
        self.modal().or(Some(PokeComponentId::Main))
    }

    fn modal(&self) -> Option<PokeComponentId> {
        if self.search_active {
            Some(PokeComponentId::Search)
        } else if self.species_modal_open {
            Some(PokeComponentId::Species)
        } else {
            None
        }
    }

    fn binding_context(&self, id: PokeComponentId) -> PokeContext {
        match id {
            PokeComponentId::Main => PokeContext::Main,
            PokeComponentId::Search => PokeContext::Search,
            PokeComponentId::Species => PokeContext::Species,
        }
    }

    fn default_context(&self) -> PokeContext {
        PokeContext::Main
    }
}

fn initial_state(args: &Args, config: &Config) -> AppState {
    let mut state = AppState {
        units: if config.imperial {
            UnitSystem::Imperial
        } else {
            UnitSystem::Metric
        },
        ..Default::default()
    };
    state.browse.page_size = config.page_size;
    if let Some(generation) = args.generation {
        state.browse.generation = usize::from(generation.saturating_sub(1));
    }
    if args.browse || (args.generation.is_some() && args.query.is_none()) {
        state.view = ViewMode::Browse;
    } else if let Some(query) = &args.query {
        state.search_query = query.clone();
    }
    state
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())
        .await
        .map_err(io::Error::other)?;
    if args.no_cache {
        config.cache = false;
    }
    if args.imperial {
        config.imperial = true;
    }
    if let Some(page_size) = args.page_size {
        config.page_size = usize::from(page_size);
    }
    naming::install(config.resolver());
    api::configure(config.api_config());

    if let Some(name) = &args.resolve {
        println!("{}", naming::resolve(name));
        return Ok(());
    }

    let initial = initial_state(&args, &config);
    let debug = DebugSession::new(args.debug);

    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(move || async move { Ok::<AppState, io::Error>(initial) })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = SpriteBackend::new(stdout, sprite_backend::sprite_slot());
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    // ===== Cleanup =====
    sprite_backend::clear_sprite();
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    Ok(())
}

struct PokedexUi {
    view: PokedexView,
    search: SearchBar,
    species: SpeciesModal,
}

impl PokedexUi {
    fn new() -> Self {
        Self {
            view: PokedexView::new(),
            search: SearchBar::new(),
            species: SpeciesModal::new(),
        }
    }

    fn species_props(state: &AppState, is_focused: bool) -> SpeciesModalProps<'_> {
        SpeciesModalProps {
            name: state.current_name().unwrap_or_default(),
            species: &state.species,
            sprite: state.current_sprite(),
            sprite_frame: state.sprite_frame_index,
            is_focused,
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<PokeComponentId>,
    ) {
        // Components re-place the sprite on every frame they want it.
        sprite_backend::clear_sprite();

        event_ctx.set_component_area(PokeComponentId::Main, area);
        let props = PokedexViewProps {
            state,
            is_focused: render_ctx.is_focused() && state.modal().is_none(),
        };
        self.view.render(frame, area, props);

        if state.species_modal_open && !state.search_active {
            event_ctx.set_component_area(PokeComponentId::Species, species_area(area));
            let props = Self::species_props(state, render_ctx.is_focused());
            self.species.render(frame, area, props);
        } else {
            event_ctx
                .component_areas
                .remove(&PokeComponentId::Species);
        }

        self.search.set_open(state.search_active);
        if state.search_active {
            event_ctx.set_component_area(PokeComponentId::Search, search_area(area));
            let props = SearchBarProps {
                query: &state.search_query,
                is_focused: render_ctx.is_focused(),
                on_query_change: Action::SearchQueryChange,
                on_query_submit: Action::SearchQuerySubmit,
            };
            self.search.render(frame, area, props);
        } else {
            event_ctx.component_areas.remove(&PokeComponentId::Search);
        }
    }

    fn handle_main_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = PokedexViewProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.view.handle_event(event, props).into_iter().collect();
        handler_response(actions)
    }

    fn handle_species_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = Self::species_props(state, true);
        let actions: Vec<_> = self.species.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }

    fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        self.search.set_open(state.search_active);
        let props = SearchBarProps {
            query: &state.search_query,
            is_focused: true,
            on_query_change: Action::SearchQueryChange,
            on_query_submit: Action::SearchQuerySubmit,
        };
        let actions: Vec<_> = self.search.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(PokedexUi::new()));
    let mut bus: EventBus<AppState, Action, PokeComponentId, PokeContext> = EventBus::new();
    let keybindings: Keybindings<PokeContext> = Keybindings::new();

    let ui_main = Rc::clone(&ui);
    bus.register(PokeComponentId::Main, move |event, state| {
        ui_main.borrow_mut().handle_main_event(&event.kind, state)
    });

    let ui_species = Rc::clone(&ui);
    bus.register(PokeComponentId::Species, move |event, state| {
        ui_species
            .borrow_mut()
            .handle_species_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(PokeComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

/// One task key per lookup kind; a new request replaces the one in flight.
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::FetchPokemon { slug } => {
            ctx.tasks().spawn("pokemon", async move {
                match api::fetch_pokemon(&slug).await {
                    Ok(detail) => Action::PokemonDidLoad { slug, detail },
                    Err(error) => Action::PokemonDidError { slug, error },
                }
            });
        }
        Effect::FetchSprite { name, url } => {
            ctx.tasks().spawn("sprite", async move {
                match api::fetch_bytes(&url).await {
                    Ok(bytes) => match sprite::decode_sprite(&bytes, &url) {
                        Ok(sprite) => Action::SpriteDidLoad { name, sprite },
                        Err(error) => Action::SpriteDidError { name, error },
                    },
                    Err(error) => Action::SpriteDidError {
                        name,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::FetchSpecies { name, url } => {
            ctx.tasks().spawn("species", async move {
                match api::fetch_species(&url).await {
                    Ok(species) => Action::SpeciesDidLoad { name, species },
                    Err(error) => Action::SpeciesDidError {
                        name,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::FetchPage {
            generation,
            page,
            window,
        } => {
            ctx.tasks().spawn("page", async move {
                match api::fetch_page(window).await {
                    Ok(entries) => Action::BrowseDidLoad {
                        generation,
                        page,
                        entries,
                    },
                    Err(error) => Action::BrowseDidError {
                        generation,
                        page,
                        error: error.to_string(),
                    },
                }
            });
        }
    }
}
