use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    centered_rect, BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding, TextInput,
    TextInputProps, TextInputStyle,
};

use super::Component;
use crate::action::Action;
use crate::naming;
use crate::theme::{ACCENT_GOLD, ACCENT_TEAL, BG_PANEL, BG_PANEL_ALT, TEXT_DIM, TEXT_MAIN};

const PLACEHOLDER: &str = "Search for a Pokemon, e.g. Alolan Raichu";

pub fn search_area(area: Rect) -> Rect {
    centered_rect(56, 9, area)
}

pub struct SearchBar {
    input: TextInput,
    modal: Modal,
    was_open: bool,
}

pub struct SearchBarProps<'a> {
    pub query: &'a str,
    pub is_focused: bool,
    pub on_query_change: fn(String) -> Action,
    pub on_query_submit: fn(String) -> Action,
}

impl Default for SearchBar {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
            modal: Modal::new(),
            was_open: false,
        }
    }
}

impl SearchBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh input each time the bar opens.
    pub fn set_open(&mut self, is_open: bool) {
        if is_open && !self.was_open {
            self.input = TextInput::new();
        }
        self.was_open = is_open;
    }
}

fn input_style() -> TextInputStyle {
    TextInputStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 1),
            bg: Some(BG_PANEL_ALT),
            fg: Some(TEXT_MAIN),
        },
        placeholder_style: Some(Style::default().fg(TEXT_DIM)),
        cursor_style: None,
    }
}

/// Slug the query will be looked up as.
fn preview_line(query: &str) -> Line<'static> {
    let slug = naming::resolve(query);
    if slug.is_empty() {
        return Line::from(Span::styled(
            "Enter to search, Esc to cancel",
            Style::default().fg(TEXT_DIM),
        ));
    }
    Line::from(vec![
        Span::styled("looks up ", Style::default().fg(TEXT_DIM)),
        Span::styled(
            slug,
            Style::default()
                .fg(ACCENT_GOLD)
                .add_modifier(Modifier::BOLD),
        ),
    ])
}

impl Component<Action> for SearchBar {
    type Props<'a> = SearchBarProps<'a>;

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
        if key.code == KeyCode::Esc {
            return vec![Action::SearchClose];
        }

        let input_props = TextInputProps {
            value: props.query,
            placeholder: PLACEHOLDER,
            is_focused: true,
            style: input_style(),
            on_change: props.on_query_change,
            on_submit: props.on_query_submit,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input
            .handle_event(event, input_props)
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.width < 20 || area.height < 7 {
            return;
        }

        let SearchBar { input, modal, .. } = self;
        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let chunks = Layout::vertical([
                Constraint::Length(3), // Input
                Constraint::Length(1), // Spacer
                Constraint::Length(1), // Slug preview
            ])
            .split(content_area);

            let input_props = TextInputProps {
                value: props.query,
                placeholder: PLACEHOLDER,
                is_focused: props.is_focused,
                style: input_style(),
                on_change: props.on_query_change,
                on_submit: props.on_query_submit,
                on_cursor_move: Some(|_| Action::Render),
            };
            input.render(frame, chunks[0], input_props);
            frame.render_widget(Paragraph::new(preview_line(props.query)), chunks[2]);
        };

        modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: search_area(area),
                style: ModalStyle {
                    dim_factor: 0.5,
                    base: BaseStyle {
                        border: Some(BorderStyle {
                            borders: Borders::ALL,
                            style: Style::default().fg(TEXT_DIM),
                            focused_style: Some(Style::default().fg(ACCENT_TEAL)),
                        }),
                        padding: Padding::xy(1, 0),
                        bg: Some(BG_PANEL),
                        fg: None,
                    },
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::SearchClose,
                render_content: &mut render_content,
            },
        );
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

    fn props(query: &str, is_focused: bool) -> SearchBarProps<'_> {
        SearchBarProps {
            query,
            is_focused,
            on_query_change: Action::SearchQueryChange,
            on_query_submit: Action::SearchQuerySubmit,
        }
    }

    #[test]
    fn test_escape_closes() {
        let mut bar = SearchBar::new();
        let actions: Vec<_> = bar
            .handle_event(&press(KeyCode::Esc), props("pika", true))
            .into_iter()
            .collect();
        actions.assert_first(Action::SearchClose);
    }

    #[test]
    fn test_typing_changes_query() {
        let mut bar = SearchBar::new();
        let actions: Vec<_> = bar
            .handle_event(&EventKind::Key(key("a")), props("", true))
            .into_iter()
            .collect();
        actions.assert_first(Action::SearchQueryChange("a".into()));
    }

    #[test]
    fn test_enter_submits() {
        let mut bar = SearchBar::new();
        let actions: Vec<_> = bar
            .handle_event(&press(KeyCode::Enter), props("pikachu", true))
            .into_iter()
            .collect();
        actions.assert_first(Action::SearchQuerySubmit("pikachu".into()));
    }

    #[test]
    fn test_unfocused_ignores() {
        let mut bar = SearchBar::new();
        let actions: Vec<_> = bar
            .handle_event(&EventKind::Key(key("a")), props("", false))
            .into_iter()
            .collect();
        actions.assert_empty();
    }

    #[test]
    fn test_render_shows_slug_preview() {
        let mut render = RenderHarness::new(80, 24);
        let mut bar = SearchBar::new();
        let output = render.render_to_string_plain(|frame| {
            bar.render(frame, frame.area(), props("Galarian Meowth", true));
        });
        assert!(output.contains("meowth-galar"));
    }
}
