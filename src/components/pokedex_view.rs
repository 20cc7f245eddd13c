use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps,
    StatusBarSection, StatusBarStyle,
};

use super::{Component, ListView, ListViewProps, PokemonCard, PokemonCardProps};
use crate::action::Action;
use crate::state::{AppState, Section, ViewMode};
use crate::theme::{ACCENT_GOLD, ACCENT_TEAL, BG_BASE, BG_PANEL, TEXT_DIM, TEXT_MAIN};

const FOOTER_HEIGHT: u16 = 3;

pub struct PokedexView {
    card: PokemonCard,
    list: ListView,
    status_bar: StatusBar,
}

pub struct PokedexViewProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

impl Default for PokedexView {
    fn default() -> Self {
        Self {
            card: PokemonCard,
            list: ListView::new(),
            status_bar: StatusBar::new(),
        }
    }
}

impl PokedexView {
    pub fn new() -> Self {
        Self::default()
    }
}

fn status_text(state: &AppState) -> String {
    if let Some(message) = &state.message {
        return message.clone();
    }
    if state.pokemon.is_loading() {
        "Loading pokemon...".to_string()
    } else if state.browse.entries.is_loading() {
        "Loading page...".to_string()
    } else if state.sprite_loading {
        "Loading sprite...".to_string()
    } else if state.species.is_loading() {
        "Loading Pokedex entry...".to_string()
    } else {
        state.units.label().to_string()
    }
}

fn status_hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
    if state.search_active {
        return vec![
            StatusBarHint::new("Enter", "Search"),
            StatusBarHint::new("Esc", "Cancel"),
        ];
    }
    if state.species_modal_open {
        return vec![StatusBarHint::new("Esc", "Close")];
    }
    match state.view {
        ViewMode::Search => vec![
            StatusBarHint::new("/", "Search"),
            StatusBarHint::new("Tab", "Browse"),
            StatusBarHint::new("i", "Pokedex"),
            StatusBarHint::new("s/a/m", "Sections"),
            StatusBarHint::new("u", "Units"),
            StatusBarHint::new("q", "Quit"),
        ],
        ViewMode::Browse => vec![
            StatusBarHint::new("j/k", "Move"),
            StatusBarHint::new("h/l", "Page"),
            StatusBarHint::new("[ ]", "Generation"),
            StatusBarHint::new("Enter", "Open"),
            StatusBarHint::new("Tab", "Card"),
            StatusBarHint::new("q", "Quit"),
        ],
    }
}

fn status_style() -> StatusBarStyle {
    StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(ACCENT_TEAL)),
            }),
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    }
}

impl Component<Action> for PokedexView {
    type Props<'a> = PokedexViewProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        let state = props.state;

        if state.view == ViewMode::Browse {
            let actions: Vec<_> = self
                .list
                .handle_event(
                    event,
                    ListViewProps {
                        browse: &state.browse,
                        is_focused: true,
                        on_select: Action::BrowseSelect,
                    },
                )
                .into_iter()
                .collect();
            if !actions.is_empty() {
                return actions;
            }
        }

        let action = match (state.view, key.code) {
            (_, KeyCode::Char('/')) => Action::SearchOpen,
            (_, KeyCode::Tab) | (_, KeyCode::Char('b')) => Action::UiToggleView,
            (_, KeyCode::Char('u')) => Action::UiToggleUnits,
            (_, KeyCode::Char('q')) => Action::Quit,
            (ViewMode::Browse, KeyCode::Esc) => Action::UiToggleView,
            (ViewMode::Search, KeyCode::Esc) => Action::Quit,
            (ViewMode::Search, KeyCode::Char('i')) => Action::SpeciesOpen,
            (ViewMode::Search, KeyCode::Char('s')) => Action::UiToggleSection(Section::Stats),
            (ViewMode::Search, KeyCode::Char('a')) => Action::UiToggleSection(Section::Abilities),
            (ViewMode::Search, KeyCode::Char('m')) => Action::UiToggleSection(Section::Moves),
            _ => return Vec::new(),
        };
        vec![action]
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);

        let chunks = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(area);

        match state.view {
            ViewMode::Search => self.card.render(
                frame,
                chunks[0],
                PokemonCardProps {
                    state,
                    show_sprite: !state.search_active && !state.species_modal_open,
                },
            ),
            ViewMode::Browse => self.list.render(
                frame,
                chunks[0],
                ListViewProps {
                    browse: &state.browse,
                    is_focused: props.is_focused,
                    on_select: Action::BrowseSelect,
                },
            ),
        }

        let hints = status_hints(state);
        let status = status_text(state);
        let status_span = Span::styled(status.as_str(), Style::default().fg(ACCENT_GOLD));
        let status_items = [StatusBarItem::span(status_span)];
        let status_props = StatusBarProps {
            left: StatusBarSection::hints(&hints).with_separator("  "),
            center: StatusBarSection::empty(),
            right: StatusBarSection::items(&status_items).with_separator("  "),
            style: status_style(),
            is_focused: false,
        };
        <StatusBar as Component<Action>>::render(
            &mut self.status_bar,
            frame,
            chunks[1],
            status_props,
        );
    }
}
