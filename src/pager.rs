//! Generation-windowed pagination over the global `/pokemon` index.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Generation {
    pub label: &'static str,
    /// Number of species introduced in this generation.
    pub count: usize,
    /// Offset of the generation's first species in the global index.
    pub start: usize,
}

pub const GENERATIONS: [Generation; 9] = [
    Generation { label: "Generation I", count: 151, start: 0 },
    Generation { label: "Generation II", count: 100, start: 151 },
    Generation { label: "Generation III", count: 135, start: 251 },
    Generation { label: "Generation IV", count: 107, start: 386 },
    Generation { label: "Generation V", count: 156, start: 493 },
    Generation { label: "Generation VI", count: 72, start: 649 },
    Generation { label: "Generation VII", count: 88, start: 721 },
    Generation { label: "Generation VIII", count: 96, start: 809 },
    Generation { label: "Generation IX", count: 120, start: 905 },
];

/// One `/pokemon?limit=&offset=` request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PageWindow {
    pub offset: usize,
    pub limit: usize,
}

impl PageWindow {
    /// A zero limit means the page lies past the generation's end; callers
    /// render it empty instead of fetching.
    pub fn is_empty(&self) -> bool {
        self.limit == 0
    }
}

pub fn generation(index: usize) -> Option<&'static Generation> {
    GENERATIONS.get(index)
}

pub fn generation_count() -> usize {
    GENERATIONS.len()
}

/// Fetch window for a 1-based `page_number` within a generation.
///
/// Out-of-range pages yield `limit == 0`; unknown generations yield the empty
/// window at offset 0. Page 0 is read as page 1 and a zero page size as 1.
pub fn page(generation_index: usize, page_number: usize, page_size: usize) -> PageWindow {
    let Some(generation) = generation(generation_index) else {
        return PageWindow::default();
    };
    let page_size = page_size.max(1);
    let within = page_number.saturating_sub(1).saturating_mul(page_size);
    let remaining = generation.count.saturating_sub(within);
    PageWindow {
        offset: generation.start.saturating_add(within),
        limit: page_size.min(remaining),
    }
}

pub fn total_pages(generation_index: usize, page_size: usize) -> usize {
    let Some(generation) = generation(generation_index) else {
        return 0;
    };
    generation.count.div_ceil(page_size.max(1))
}
