use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::DataResource;

use super::{format_name, place_sprite, Component, TypeBanner, TypeBannerProps};
use crate::action::Action;
use crate::state::{AppState, PokemonDetail, PokemonStat, Section};
use crate::theme::{
    ACCENT_GOLD, ACCENT_TEAL, BG_PANEL, ERROR_RED, TEXT_DIM, TEXT_MAIN,
};

const BANNER_HEIGHT: u16 = 8;
const SPRITE_COLUMNS: u16 = 30;
const MAX_STAT: u16 = 255;
const STAT_BAR_WIDTH: usize = 24;

pub struct PokemonCard;

pub struct PokemonCardProps<'a> {
    pub state: &'a AppState,
    /// Sprites draw over everything, so the caller hides them under overlays.
    pub show_sprite: bool,
}

fn section_key(section: Section) -> char {
    match section {
        Section::Stats => 's',
        Section::Abilities => 'a',
        Section::Moves => 'm',
    }
}

fn shorten_stat(name: &str) -> String {
    match name {
        "hp" => "HP".to_string(),
        "attack" => "ATK".to_string(),
        "defense" => "DEF".to_string(),
        "special-attack" => "SpA".to_string(),
        "special-defense" => "SpD".to_string(),
        "speed" => "SPD".to_string(),
        _ => name.to_ascii_uppercase(),
    }
}

fn stat_color(value: u16) -> Color {
    match value {
        0..=49 => ERROR_RED,
        50..=89 => ACCENT_GOLD,
        _ => ACCENT_TEAL,
    }
}

pub fn stat_line(stat: &PokemonStat) -> Line<'static> {
    let filled = (stat.value.min(MAX_STAT) as usize * STAT_BAR_WIDTH).div_ceil(MAX_STAT as usize);
    let filled = filled.max(1);
    Line::from(vec![
        Span::styled(
            format!("{:>4} ", shorten_stat(&stat.name)),
            Style::default().fg(TEXT_DIM),
        ),
        Span::styled(
            format!("{:>3} ", stat.value),
            Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
        ),
        Span::styled("█".repeat(filled), Style::default().fg(stat_color(stat.value))),
        Span::styled(
            "░".repeat(STAT_BAR_WIDTH - filled),
            Style::default().fg(BG_PANEL),
        ),
    ])
}

fn section_header(section: Section, open: bool) -> Line<'static> {
    let marker = if open { "▾" } else { "▸" };
    Line::from(vec![
        Span::styled(
            format!("{marker} {}", section.title()),
            Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  [{}]", section_key(section)),
            Style::default().fg(TEXT_DIM),
        ),
    ])
}

fn section_body(section: Section, detail: &PokemonDetail) -> Vec<Line<'static>> {
    let dim = Style::default().fg(TEXT_DIM);
    match section {
        Section::Stats if detail.stats.is_empty() => vec![Line::styled("  No stats.", dim)],
        Section::Stats => {
            let total: u32 = detail.stats.iter().map(|stat| stat.value as u32).sum();
            let mut lines: Vec<_> = detail.stats.iter().map(stat_line).collect();
            lines.push(Line::from(vec![
                Span::styled(" TOT ", dim),
                Span::styled(
                    format!("{total:>3}"),
                    Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
                ),
            ]));
            lines
        }
        Section::Abilities if detail.abilities.is_empty() => {
            vec![Line::styled("  No abilities.", dim)]
        }
        Section::Abilities => detail
            .abilities
            .iter()
            .map(|ability| {
                let mut spans = vec![Span::styled(
                    format!("  {}", format_name(&ability.name)),
                    Style::default().fg(TEXT_MAIN),
                )];
                if ability.hidden {
                    spans.push(Span::styled(" (hidden)", dim));
                }
                Line::from(spans)
            })
            .collect(),
        Section::Moves if detail.moves.is_empty() => vec![Line::styled("  No moves.", dim)],
        Section::Moves => {
            let names = detail
                .moves
                .iter()
                .map(|name| format_name(name))
                .collect::<Vec<_>>()
                .join(", ");
            vec![
                Line::styled(format!("  {} moves", detail.moves.len()), dim),
                Line::styled(format!("  {names}"), Style::default().fg(TEXT_MAIN)),
            ]
        }
    }
}

fn detail_text(state: &AppState, detail: &PokemonDetail) -> Text<'static> {
    let label = Style::default().fg(TEXT_DIM);
    let value = Style::default().fg(TEXT_MAIN);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Height   ", label),
            Span::styled(state.units.format_height(detail.height), value),
        ]),
        Line::from(vec![
            Span::styled("Weight   ", label),
            Span::styled(state.units.format_weight(detail.weight), value),
        ]),
    ];
    if let Some(experience) = detail.base_experience {
        lines.push(Line::from(vec![
            Span::styled("Base XP  ", label),
            Span::styled(experience.to_string(), value),
        ]));
    }

    for section in Section::ALL {
        let open = state.sections.is_open(section);
        lines.push(Line::default());
        lines.push(section_header(section, open));
        if open {
            lines.extend(section_body(section, detail));
        }
    }
    Text::from(lines)
}

fn render_sprite(frame: &mut Frame, area: Rect, props: &PokemonCardProps<'_>) {
    let state = props.state;
    if props.show_sprite {
        if let Some(sprite) = state.current_sprite() {
            if place_sprite(sprite, state.sprite_frame_index, area) {
                return;
            }
        }
    }
    let content = if state.sprite_loading {
        "[loading sprite]"
    } else if state.current_sprite().is_some() {
        ""
    } else {
        "[no sprite]"
    };
    let paragraph = Paragraph::new(content)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_DIM));
    let inner = Rect {
        y: area.y + area.height / 2,
        height: area.height.min(1),
        ..area
    };
    frame.render_widget(paragraph, inner);
}

fn render_placeholder(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    let top = area.height.saturating_sub(lines.len() as u16) / 2;
    let inner = Rect {
        y: area.y + top,
        height: area.height - top,
        ..area
    };
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );
}

impl Component<Action> for PokemonCard {
    type Props<'a> = PokemonCardProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        match &state.pokemon {
            DataResource::Loaded(detail) => {
                let chunks = Layout::vertical([
                    Constraint::Length(BANNER_HEIGHT),
                    Constraint::Min(1),
                ])
                .split(area);

                TypeBanner.render(
                    frame,
                    chunks[0],
                    TypeBannerProps {
                        name: &detail.name,
                        id: Some(detail.id),
                        types: &detail.types,
                        is_animating: true,
                        tick_count: state.tick_count,
                    },
                );

                let (sprite_area, info_area) = if chunks[1].width >= SPRITE_COLUMNS * 2 {
                    let columns = Layout::horizontal([
                        Constraint::Length(SPRITE_COLUMNS),
                        Constraint::Min(1),
                    ])
                    .split(chunks[1]);
                    (Some(columns[0]), columns[1])
                } else {
                    (None, chunks[1])
                };

                if let Some(sprite_area) = sprite_area {
                    let block = Block::default()
                        .borders(Borders::RIGHT)
                        .border_style(Style::default().fg(BG_PANEL));
                    let inner = block.inner(sprite_area);
                    frame.render_widget(block, sprite_area);
                    render_sprite(frame, inner, &props);
                }

                let info = Paragraph::new(detail_text(state, detail))
                    .block(Block::default().padding(ratatui::widgets::Padding::horizontal(2)))
                    .wrap(Wrap { trim: false });
                frame.render_widget(info, info_area);
            }
            DataResource::Loading => {
                let name = state.last_query.as_deref().unwrap_or_default();
                let chunks = Layout::vertical([
                    Constraint::Length(BANNER_HEIGHT),
                    Constraint::Min(1),
                ])
                .split(area);
                TypeBanner.render(
                    frame,
                    chunks[0],
                    TypeBannerProps {
                        name,
                        id: None,
                        types: &[],
                        is_animating: true,
                        tick_count: state.tick_count,
                    },
                );
                let slug = state.last_slug.as_deref().unwrap_or_default();
                render_placeholder(
                    frame,
                    chunks[1],
                    vec![Line::styled(
                        format!("Looking up {slug}..."),
                        Style::default().fg(TEXT_DIM),
                    )],
                );
            }
            DataResource::Failed(error) => {
                render_placeholder(
                    frame,
                    area,
                    vec![
                        Line::styled(
                            error.clone(),
                            Style::default().fg(ERROR_RED).add_modifier(Modifier::BOLD),
                        ),
                        Line::default(),
                        Line::styled("Press / to search again", Style::default().fg(TEXT_DIM)),
                    ],
                );
            }
            DataResource::Empty => {
                render_placeholder(
                    frame,
                    area,
                    vec![
                        Line::styled(
                            "Pokedex",
                            Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD),
                        ),
                        Line::default(),
                        Line::styled(
                            "Press / to search by name or b to browse by generation",
                            Style::default().fg(TEXT_DIM),
                        ),
                    ],
                );
            }
        }
    }
}
