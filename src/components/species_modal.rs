use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Borders, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::{DataResource, EventKind};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    centered_rect, BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding,
};

use super::{format_name, place_sprite, Component};
use crate::action::Action;
use crate::sprite::SpriteData;
use crate::state::SpeciesInfo;
use crate::theme::{ACCENT_GOLD, ACCENT_TEAL, BG_PANEL, ERROR_RED, TEXT_DIM, TEXT_MAIN};

const SPRITE_COLUMNS: u16 = 20;

pub fn species_area(area: Rect) -> Rect {
    centered_rect(72, 16, area)
}

pub struct SpeciesModal {
    modal: Modal,
}

pub struct SpeciesModalProps<'a> {
    pub name: &'a str,
    pub species: &'a DataResource<SpeciesInfo>,
    pub sprite: Option<&'a SpriteData>,
    pub sprite_frame: usize,
    pub is_focused: bool,
}

impl Default for SpeciesModal {
    fn default() -> Self {
        Self {
            modal: Modal::new(),
        }
    }
}

impl SpeciesModal {
    pub fn new() -> Self {
        Self::default()
    }
}

fn modal_style() -> ModalStyle {
    ModalStyle {
        dim_factor: 0.6,
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(ACCENT_GOLD)),
            }),
            padding: Padding::xy(2, 1),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
    }
}

fn species_close() -> Action {
    Action::SpeciesClose
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn entry_text(name: &str, species: &DataResource<SpeciesInfo>) -> Text<'static> {
    let label = Style::default().fg(TEXT_DIM);
    let mut lines = vec![
        Line::styled(
            format!("Pokedex Entry for {}", format_name(name)),
            Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD),
        ),
        Line::default(),
    ];
    match species {
        DataResource::Loaded(info) => {
            lines.push(Line::styled(
                info.flavor_text.clone(),
                Style::default().fg(TEXT_MAIN),
            ));
            lines.push(Line::default());
            if let Some(genus) = &info.genus {
                lines.push(Line::from(vec![
                    Span::styled("Category: ", label),
                    Span::styled(genus.clone(), Style::default().fg(ACCENT_TEAL)),
                ]));
            }
            if let Some(color) = &info.color {
                lines.push(Line::from(vec![
                    Span::styled("Color: ", label),
                    Span::styled(capitalize(color), Style::default().fg(ACCENT_TEAL)),
                ]));
            }
        }
        DataResource::Failed(error) => {
            lines.push(Line::styled(error.clone(), Style::default().fg(ERROR_RED)));
        }
        DataResource::Loading | DataResource::Empty => {
            lines.push(Line::styled("Loading Pokedex details...", label));
        }
    }
    Text::from(lines)
}

impl Component<Action> for SpeciesModal {
    type Props<'a> = SpeciesModalProps<'a>;

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
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('i') | KeyCode::Char('q') => {
                vec![Action::SpeciesClose]
            }
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.width < 30 || area.height < 10 {
            return;
        }

        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let text_area = match props.sprite {
                Some(sprite) if content_area.width > SPRITE_COLUMNS * 2 => {
                    let columns = Layout::horizontal([
                        Constraint::Length(SPRITE_COLUMNS),
                        Constraint::Length(2),
                        Constraint::Min(1),
                    ])
                    .split(content_area);
                    place_sprite(sprite, props.sprite_frame, columns[0]);
                    columns[2]
                }
                _ => content_area,
            };
            frame.render_widget(
                Paragraph::new(entry_text(props.name, props.species)).wrap(Wrap { trim: true }),
                text_area,
            );
        };

        self.modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: species_area(area),
                style: modal_style(),
                behavior: ModalBehavior {
                    close_on_esc: true,
                    close_on_backdrop: false,
                },
                on_close: species_close,
                render_content: &mut render_content,
            },
        );
    }
}
