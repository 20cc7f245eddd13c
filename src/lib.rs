//! Pokesearch - a PokeAPI terminal client
//!
//! Search by spoken name ("Alolan Raichu", "Mega Charizard X") or browse
//! generation pages. Name resolution and paging are pure and live in
//! [`naming`] and [`pager`]; the rest is a tui-dispatch store plus views.

pub mod action;
pub mod api;
pub mod components;
pub mod config;
pub mod effect;
pub mod naming;
pub mod pager;
pub mod reducer;
pub mod sprite;
pub mod sprite_backend;
pub mod state;
pub mod theme;
pub mod units;
