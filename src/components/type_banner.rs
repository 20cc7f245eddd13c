use artbox::{
    fonts, integrations::ratatui::ArtBox, Alignment as ArtAlignment, Color as ArtColor, Fill,
    LinearGradient, Renderer,
};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::cmp::Ordering;

use super::{format_name, Component};
use crate::action::Action;
use crate::theme::{self, Rgb, TEXT_DIM};

/// Ticks per full sweep of the gradient.
pub const BANNER_CYCLE_TICKS: u32 = 48;

pub struct TypeBanner;

pub struct TypeBannerProps<'a> {
    pub name: &'a str,
    pub id: Option<u16>,
    pub types: &'a [String],
    pub is_animating: bool,
    pub tick_count: u32,
}

fn art_color((r, g, b): Rgb) -> ArtColor {
    ArtColor::rgb(r, g, b)
}

fn make_gradient(colors: (ArtColor, ArtColor), angle: f32, phase: f32) -> Fill {
    let phase = phase.rem_euclid(1.0);
    let mid = colors.0.interpolate(colors.1, 0.5);
    let base_stops = [
        (0.0, colors.0),
        (0.4, mid),
        (0.6, colors.1),
        (1.0, colors.0),
    ];

    // Rotate the stops by `phase`, pinning both ends to the color that lands there.
    let edge_color = sample_color(&base_stops, (1.0 - phase).rem_euclid(1.0));
    let mut shifted = Vec::with_capacity(base_stops.len() + 2);
    shifted.push((0.0, edge_color));
    shifted.push((1.0, edge_color));
    for (pos, color) in base_stops {
        shifted.push(((pos + phase) % 1.0, color));
    }
    shifted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    let stops = shifted
        .into_iter()
        .map(|(pos, color)| artbox::ColorStop::new(pos, color))
        .collect();

    Fill::Linear(LinearGradient::new(angle, stops))
}

fn sample_color(stops: &[(f32, ArtColor)], position: f32) -> ArtColor {
    let pos = position.clamp(0.0, 1.0);
    let Some(&first) = stops.first() else {
        return ArtColor::rgb(0, 0, 0);
    };
    let mut prev = first;
    for &stop in stops {
        if stop.0 >= pos {
            if (stop.0 - prev.0).abs() < f32::EPSILON {
                return stop.1;
            }
            let t = (pos - prev.0) / (stop.0 - prev.0);
            return prev.1.interpolate(stop.1, t);
        }
        prev = stop;
    }
    prev.1
}

pub fn banner_phase(tick_count: u32) -> f32 {
    let steps = BANNER_CYCLE_TICKS.max(1);
    (tick_count % steps) as f32 / steps as f32
}

fn subtitle(id: Option<u16>, types: &[String]) -> Line<'static> {
    let mut spans = Vec::new();
    if let Some(id) = id {
        spans.push(Span::styled(
            format!("#{id:03}"),
            Style::default().fg(TEXT_DIM),
        ));
    }
    for name in types {
        if !spans.is_empty() {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            format!(" {} ", name.to_uppercase()),
            Style::default()
                .bg(theme::type_color(name))
                .fg(theme::BG_BASE)
                .add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans).centered()
}

impl Component<Action> for TypeBanner {
    type Props<'a> = TypeBannerProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::vertical([
            Constraint::Fill(1),   // FIGlet name
            Constraint::Length(1), // Number + type badges
        ])
        .split(area);

        let (start, end) = theme::type_gradient(props.types);
        let phase = if props.is_animating {
            banner_phase(props.tick_count)
        } else {
            0.0
        };
        let fill = make_gradient((art_color(start), art_color(end)), 5.0, phase);

        let renderer = Renderer::new(fonts::stack(&["terminus", "miniwi"]))
            .with_plain_fallback()
            .with_alignment(ArtAlignment::Center)
            .with_fill(fill);

        let title = format_name(props.name);
        frame.render_widget(ArtBox::new(&renderer, &title), chunks[0]);
        frame.render_widget(Paragraph::new(subtitle(props.id, props.types)), chunks[1]);
    }
}
