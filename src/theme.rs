//! Palette and per-type colors.

use ratatui::style::Color;

pub const BG_BASE: Color = Color::Rgb(12, 18, 28);
pub const BG_PANEL: Color = Color::Rgb(20, 32, 46);
pub const BG_PANEL_ALT: Color = Color::Rgb(26, 40, 58);
pub const BG_HIGHLIGHT: Color = Color::Rgb(28, 92, 110);
pub const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
pub const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
pub const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
pub const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);
pub const ERROR_RED: Color = Color::Rgb(220, 110, 110);

pub type Rgb = (u8, u8, u8);

const NEUTRAL: Rgb = (168, 168, 168);

const TYPE_COLORS: [(&str, Rgb); 18] = [
    ("normal", (168, 167, 122)),
    ("fire", (238, 129, 48)),
    ("water", (99, 144, 240)),
    ("electric", (247, 208, 44)),
    ("grass", (122, 199, 76)),
    ("ice", (150, 217, 214)),
    ("fighting", (194, 46, 40)),
    ("poison", (163, 62, 161)),
    ("ground", (226, 191, 101)),
    ("flying", (169, 143, 243)),
    ("psychic", (249, 85, 135)),
    ("bug", (166, 185, 26)),
    ("rock", (182, 161, 54)),
    ("ghost", (115, 87, 151)),
    ("dragon", (111, 53, 252)),
    ("dark", (112, 87, 70)),
    ("steel", (183, 183, 206)),
    ("fairy", (214, 133, 173)),
];

pub fn type_rgb(name: &str) -> Option<Rgb> {
    TYPE_COLORS
        .iter()
        .find(|(type_name, _)| *type_name == name)
        .map(|(_, rgb)| *rgb)
}

pub fn type_color(name: &str) -> Color {
    let (r, g, b) = type_rgb(name).unwrap_or(NEUTRAL);
    Color::Rgb(r, g, b)
}

/// Two gradient stops for a creature's types.
///
/// Dual types blend their two colors; a single type fades into a lighter shade
/// of itself. Missing or unknown types fall back to grey.
pub fn type_gradient(types: &[String]) -> (Rgb, Rgb) {
    let first = types.first().and_then(|name| type_rgb(name));
    let second = types.get(1).and_then(|name| type_rgb(name));
    match (first, second) {
        (Some(a), Some(b)) => (a, b),
        (Some(a), None) => (a, lighten(a, 0.45)),
        (None, Some(b)) => (b, lighten(b, 0.45)),
        (None, None) => (NEUTRAL, lighten(NEUTRAL, 0.3)),
    }
}

pub fn lighten((r, g, b): Rgb, amount: f32) -> Rgb {
    let amount = amount.clamp(0.0, 1.0);
    let mix = |channel: u8| -> u8 {
        let c = channel as f32;
        (c + (255.0 - c) * amount).round() as u8
    };
    (mix(r), mix(g), mix(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_known_types_have_colors() {
        for (name, _) in TYPE_COLORS {
            assert!(type_rgb(name).is_some(), "{name}");
        }
        assert_eq!(type_color("fire"), Color::Rgb(238, 129, 48));
        assert_eq!(type_color("shadow"), Color::Rgb(168, 168, 168));
    }

    #[test]
    fn test_dual_type_gradient() {
        let (a, b) = type_gradient(&types(&["grass", "poison"]));
        assert_eq!(a, (122, 199, 76));
        assert_eq!(b, (163, 62, 161));
    }

    #[test]
    fn test_single_type_gradient_lightens() {
        let (a, b) = type_gradient(&types(&["water"]));
        assert_eq!(a, (99, 144, 240));
        assert!(b.0 > a.0 && b.1 > a.1 && b.2 >= a.2);
    }

    #[test]
    fn test_missing_types_are_neutral() {
        let (a, _) = type_gradient(&[]);
        assert_eq!(a, NEUTRAL);
        let (a, _) = type_gradient(&types(&["unknown"]));
        assert_eq!(a, NEUTRAL);
    }

    #[test]
    fn test_lighten_bounds() {
        assert_eq!(lighten((10, 20, 30), 0.0), (10, 20, 30));
        assert_eq!(lighten((10, 20, 30), 1.0), (255, 255, 255));
        assert_eq!(lighten((0, 0, 0), 2.0), (255, 255, 255));
    }
}
