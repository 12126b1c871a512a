use crate::config::PAGE_SIZE;

/// Move selection cursor one item up, wrapping to the last item.
pub fn select_prev(selected: usize, item_count: usize) -> usize {
    if item_count == 0 {
        return 0;
    }
    (selected + item_count - 1) % item_count
}

/// Move selection cursor one item down, wrapping to the first item.
pub fn select_next(selected: usize, item_count: usize) -> usize {
    if item_count == 0 {
        return 0;
    }
    (selected + 1) % item_count
}

/// Jump one page back. Clamps at the first item, never wraps.
pub fn page_back(selected: usize) -> usize {
    selected.saturating_sub(PAGE_SIZE)
}

/// Jump one page forward. Clamps at the last item, never wraps.
pub fn page_forward(selected: usize, item_count: usize) -> usize {
    if item_count == 0 {
        return 0;
    }
    (selected + PAGE_SIZE).min(item_count - 1)
}

/// Page the given selection sits on.
pub fn page_of(selected: usize) -> usize {
    selected / PAGE_SIZE
}
