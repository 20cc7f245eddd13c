//! Effects - side effects declared by the reducer

use crate::pager::PageWindow;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchPokemon { slug: String },
    FetchSprite { name: String, url: String },
    FetchSpecies { name: String, url: String },
    /// One browse page; `generation`/`page` tag the result so stale pages can be dropped
    FetchPage {
        generation: usize,
        page: usize,
        window: PageWindow,
    },
}
