use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::{DataResource, EventKind};
use tui_dispatch_components::{
    BaseStyle, Padding, SelectList, SelectListBehavior, SelectListProps, SelectListStyle,
    SelectionStyle,
};

use super::{format_name, Component};
use crate::action::Action;
use crate::state::{BrowseState, PokemonSummary};
use crate::theme::{ACCENT_GOLD, ACCENT_TEAL, BG_HIGHLIGHT, ERROR_RED, TEXT_DIM, TEXT_MAIN};

pub struct ListView {
    list: SelectList,
}

pub struct ListViewProps<'a> {
    pub browse: &'a BrowseState,
    pub is_focused: bool,
    pub on_select: fn(usize) -> Action,
}

impl Default for ListView {
    fn default() -> Self {
        Self {
            list: SelectList::new(),
        }
    }
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn entry_label(entry: &PokemonSummary) -> String {
    format!("#{:03} {}", entry.id, entry.name)
}

pub fn header_text(browse: &BrowseState) -> String {
    format!(
        "{} · Page {}/{}",
        browse.generation_label(),
        browse.page,
        browse.total_pages()
    )
}

fn entry_items(entries: &[PokemonSummary]) -> Vec<Line<'static>> {
    entries
        .iter()
        .map(|entry| {
            Line::from(vec![
                Span::styled(format!("#{:03} ", entry.id), Style::default().fg(TEXT_DIM)),
                Span::styled(entry.name.clone(), Style::default().fg(TEXT_MAIN)),
                Span::styled(
                    format!("  {}", format_name(&entry.name)),
                    Style::default().fg(TEXT_DIM),
                ),
            ])
        })
        .collect()
}

fn list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: None,
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .fg(TEXT_MAIN)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: None,
            disabled: false,
        },
        ..SelectListStyle::default()
    }
}

fn list_behavior() -> SelectListBehavior {
    SelectListBehavior {
        show_scrollbar: true,
        wrap_navigation: false,
    }
}

impl Component<Action> for ListView {
    type Props<'a> = ListViewProps<'a>;

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

        let count = props.browse.entry_count();
        let selected = props.browse.selected;
        match key.code {
            KeyCode::Enter => vec![Action::BrowseConfirm],
            KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => {
                vec![Action::BrowseNextPage]
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => vec![Action::BrowsePrevPage],
            KeyCode::Char(']') => vec![Action::BrowseNextGeneration],
            KeyCode::Char('[') => vec![Action::BrowsePrevGeneration],
            KeyCode::Char('j') if selected + 1 < count => vec![(props.on_select)(selected + 1)],
            KeyCode::Char('k') if selected > 0 && count > 0 => {
                vec![(props.on_select)(selected - 1)]
            }
            KeyCode::Up | KeyCode::Down if count > 0 => {
                let Some(entries) = props.browse.entries.data() else {
                    return Vec::new();
                };
                let items = entry_items(entries);
                let list_props = SelectListProps {
                    items: &items,
                    count: items.len(),
                    selected,
                    is_focused: true,
                    style: list_style(),
                    behavior: list_behavior(),
                    on_select: props.on_select,
                    render_item: &|item| item.clone(),
                };
                self.list
                    .handle_event(event, list_props)
                    .into_iter()
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::vertical([
            Constraint::Length(1), // Generation / page
            Constraint::Length(1), // Spacer
            Constraint::Min(1),    // Entries
        ])
        .split(area);

        let header = Line::from(vec![
            Span::styled(
                props.browse.generation_label(),
                Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" · Page {}/{}", props.browse.page, props.browse.total_pages()),
                Style::default().fg(ACCENT_TEAL),
            ),
        ])
        .centered();
        frame.render_widget(Paragraph::new(header), chunks[0]);

        let message = |text: String, style: Style| {
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .style(style)
        };
        match &props.browse.entries {
            DataResource::Loaded(entries) if !entries.is_empty() => {
                let items = entry_items(entries);
                let list_props = SelectListProps {
                    items: &items,
                    count: items.len(),
                    selected: props.browse.selected,
                    is_focused: props.is_focused,
                    style: list_style(),
                    behavior: list_behavior(),
                    on_select: props.on_select,
                    render_item: &|item| item.clone(),
                };
                self.list.render(frame, chunks[2], list_props);
            }
            DataResource::Loaded(_) => frame.render_widget(
                message(
                    "No entries on this page.".into(),
                    Style::default().fg(TEXT_DIM),
                ),
                chunks[2],
            ),
            DataResource::Loading => frame.render_widget(
                message("Loading page...".into(), Style::default().fg(TEXT_DIM)),
                chunks[2],
            ),
            DataResource::Failed(error) => frame.render_widget(
                message(error.clone(), Style::default().fg(ERROR_RED)),
                chunks[2],
            ),
            DataResource::Empty => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use tui_dispatch::testing::*;

    fn press(code: KeyCode) -> EventKind {
        EventKind::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn browse(names: &[&str]) -> BrowseState {
        BrowseState {
            entries: DataResource::Loaded(
                names
                    .iter()
                    .enumerate()
                    .map(|(i, name)| PokemonSummary {
                        id: i as u16 + 1,
                        name: name.to_string(),
                    })
                    .collect(),
            ),
            ..Default::default()
        }
    }

    fn actions(view: &mut ListView, browse: &BrowseState, event: EventKind) -> Vec<Action> {
        view.handle_event(
            &event,
            ListViewProps {
                browse,
                is_focused: true,
                on_select: Action::BrowseSelect,
            },
        )
        .into_iter()
        .collect()
    }

    #[test]
    fn test_labels() {
        let state = browse(&["bulbasaur"]);
        let entries = state.entries.data().unwrap();
        assert_eq!(entry_label(&entries[0]), "#001 bulbasaur");
        assert_eq!(header_text(&state), "Generation I · Page 1/8");
    }

    #[test]
    fn test_paging_keys() {
        let mut view = ListView::new();
        let state = browse(&["bulbasaur"]);
        actions(&mut view, &state, press(KeyCode::Right)).assert_first(Action::BrowseNextPage);
        actions(&mut view, &state, press(KeyCode::Left)).assert_first(Action::BrowsePrevPage);
        actions(&mut view, &state, press(KeyCode::Char(']')))
            .assert_first(Action::BrowseNextGeneration);
        actions(&mut view, &state, press(KeyCode::Enter)).assert_first(Action::BrowseConfirm);
    }

    #[test]
    fn test_jk_selects() {
        let mut view = ListView::new();
        let state = browse(&["bulbasaur", "ivysaur"]);
        actions(&mut view, &state, EventKind::Key(key("j"))).assert_first(Action::BrowseSelect(1));
        actions(&mut view, &state, EventKind::Key(key("k"))).assert_empty();
    }

    #[test]
    fn test_render_entries() {
        let mut render = RenderHarness::new(60, 12);
        let mut view = ListView::new();
        let state = browse(&["bulbasaur", "ivysaur"]);
        let output = render.render_to_string_plain(|frame| {
            view.render(
                frame,
                frame.area(),
                ListViewProps {
                    browse: &state,
                    is_focused: true,
                    on_select: Action::BrowseSelect,
                },
            );
        });
        assert!(output.contains("Generation I · Page 1/8"));
        assert!(output.contains("#001 bulbasaur"));
        assert!(output.contains("#002 ivysaur"));
    }

    #[test]
    fn test_render_empty_page() {
        let mut render = RenderHarness::new(60, 12);
        let mut view = ListView::new();
        let state = browse(&[]);
        let output = render.render_to_string_plain(|frame| {
            view.render(
                frame,
                frame.area(),
                ListViewProps {
                    browse: &state,
                    is_focused: true,
                    on_select: Action::BrowseSelect,
                },
            );
        });
        assert!(output.contains("No entries on this page."));
    }
}
