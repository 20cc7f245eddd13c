pub mod list_view;
pub mod pokedex_view;
pub mod pokemon_card;
pub mod search_bar;
pub mod species_modal;
pub mod type_banner;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use list_view::{ListView, ListViewProps};
pub use pokedex_view::{PokedexView, PokedexViewProps};
pub use pokemon_card::{PokemonCard, PokemonCardProps};
pub use search_bar::{search_area, SearchBar, SearchBarProps};
pub use species_modal::{species_area, SpeciesModal, SpeciesModalProps};
pub use type_banner::{TypeBanner, TypeBannerProps};

use ratatui::layout::Rect;

use crate::sprite::SpriteData;
use crate::sprite_backend;

/// `mr-mime` -> `Mr Mime`.
pub fn format_name(name: &str) -> String {
    name.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => format!("{}{}", first.to_ascii_uppercase(), chars.as_str()),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Queues the sprite frame for the backend, centered in `area`.
/// Returns false when nothing could be placed.
pub(crate) fn place_sprite(sprite: &SpriteData, frame_index: usize, area: Rect) -> bool {
    let Some(frame) = sprite.frame(frame_index) else {
        return false;
    };
    let (cols, rows) = sprite.fit(area.width, area.height);
    match crate::sprite::kitty_sequence(frame, cols, rows) {
        Ok(sequence) => {
            let x = area.x.saturating_add(area.width.saturating_sub(cols) / 2);
            let y = area.y.saturating_add(area.height.saturating_sub(rows) / 2);
            sprite_backend::place_sprite(x, y, sequence);
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_name() {
        assert_eq!(format_name("mr-mime"), "Mr Mime");
        assert_eq!(format_name("pikachu"), "Pikachu");
        assert_eq!(format_name("charizard-mega-x"), "Charizard Mega X");
        assert_eq!(format_name(""), "");
    }
}
