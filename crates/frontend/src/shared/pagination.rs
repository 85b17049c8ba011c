//! Paged and infinite-scroll navigation state of an overview.

use super::observable::Observable;

const DEFAULT_CURRENT_PAGE: usize = 1;

/// Rows of `row_height` that fit below `used_height` of page chrome, at least one
pub fn estimate_displayable_rows(window_height: f64, row_height: f64, used_height: f64) -> usize {
    if row_height <= 0.0 {
        return 1;
    }
    let rows = ((window_height - used_height) / row_height).floor();
    if rows >= 1.0 {
        rows as usize
    } else {
        1
    }
}

/// Choice of the items-per-page selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemsPerPage {
    Infinite,
    Count(usize),
}

#[derive(Debug)]
pub struct PaginationModel {
    // Fallback used when no items per page has been chosen
    default_items_per_page: Option<usize>,
    items_per_page: Option<usize>,
    fallback_items_per_page: usize,
    infinite_chunk_size: usize,
    custom_items_per_page: String,
    current_page: usize,
    items_count: usize,
    server_pages_count: Option<usize>,
    infinite_scroll_enabled: bool,
    amount_dropdown_visible: bool,

    observable: Observable,
    items_per_page_selector: Observable,
}

impl PaginationModel {
    pub fn new(fallback_items_per_page: usize, infinite_chunk_size: usize) -> Self {
        Self {
            default_items_per_page: None,
            items_per_page: None,
            fallback_items_per_page: fallback_items_per_page.max(1),
            infinite_chunk_size: infinite_chunk_size.max(1),
            custom_items_per_page: String::new(),
            current_page: DEFAULT_CURRENT_PAGE,
            items_count: 0,
            server_pages_count: None,
            infinite_scroll_enabled: false,
            amount_dropdown_visible: false,
            observable: Observable::new(),
            items_per_page_selector: Observable::new(),
        }
    }

    /// Restore defaults, without notifying
    pub fn reset(&mut self) {
        self.items_per_page = None;
        self.default_items_per_page = None;
        self.custom_items_per_page.clear();
        self.current_page = DEFAULT_CURRENT_PAGE;
        self.infinite_scroll_enabled = false;
    }

    /// Items per page to use if the user has not chosen one (e.g. fitted to the screen height)
    pub fn provide_default_items_per_page(&mut self, default_items_per_page: usize) {
        if Some(default_items_per_page) != self.default_items_per_page {
            self.default_items_per_page = Some(default_items_per_page.max(1));
            self.observable.notify();
        }
    }

    pub fn set_infinite_chunk_size(&mut self, chunk_size: usize) {
        self.infinite_chunk_size = chunk_size.max(1);
    }

    /// Returns true if the page actually changed
    pub fn silently_set_current_page(&mut self, page: usize) -> bool {
        let page = page.max(DEFAULT_CURRENT_PAGE);
        if self.current_page != page {
            self.current_page = page;
            true
        } else {
            false
        }
    }

    /// Returns true (and notifies) if the page actually changed
    pub fn set_current_page(&mut self, page: usize) -> bool {
        let changed = self.silently_set_current_page(page);
        if changed {
            self.observable.notify();
        }
        changed
    }

    /// Move to the next page unless the current one is the last
    pub fn go_to_next_page(&mut self) -> bool {
        if self.current_page < self.pages_count() {
            self.set_current_page(self.current_page + 1)
        } else {
            false
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        if self.infinite_scroll_enabled {
            self.infinite_chunk_size
        } else {
            self.items_per_page
                .or(self.default_items_per_page)
                .unwrap_or(self.fallback_items_per_page)
        }
    }

    pub fn selected_items_per_page(&self) -> ItemsPerPage {
        if self.infinite_scroll_enabled {
            ItemsPerPage::Infinite
        } else {
            ItemsPerPage::Count(self.items_per_page())
        }
    }

    /// Switch to a finite page size, back to the first page if it changed
    pub fn set_items_per_page(&mut self, amount: usize) {
        let amount = amount.max(1);
        if self.infinite_scroll_enabled || self.items_per_page != Some(amount) {
            self.items_per_page = Some(amount);
            self.current_page = DEFAULT_CURRENT_PAGE;
        }
        self.amount_dropdown_visible = false;
        self.infinite_scroll_enabled = false;
        self.observable.notify();
    }

    pub fn enable_infinite_mode(&mut self) {
        self.infinite_scroll_enabled = true;
        self.amount_dropdown_visible = false;
        self.current_page = DEFAULT_CURRENT_PAGE;
        self.observable.notify();
    }

    pub fn is_infinite_scroll_enabled(&self) -> bool {
        self.infinite_scroll_enabled
    }

    /// Offset of the first item of the current page
    pub fn first_item_offset(&self) -> usize {
        (self.current_page - 1) * self.items_per_page()
    }

    pub fn custom_items_per_page(&self) -> &str {
        &self.custom_items_per_page
    }

    pub fn set_custom_items_per_page(&mut self, custom_items_per_page: &str) {
        self.custom_items_per_page = custom_items_per_page.to_string();
        self.items_per_page_selector.notify();
    }

    /// Parsed custom amount, if it is a positive integer
    pub fn parsed_custom_items_per_page(&self) -> Option<usize> {
        self.custom_items_per_page
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|amount| *amount > 0)
    }

    /// Pages count as reported by the server, computed from the items count otherwise
    pub fn pages_count(&self) -> usize {
        self.server_pages_count
            .unwrap_or_else(|| self.items_count.div_ceil(self.items_per_page()))
    }

    pub fn items_count(&self) -> usize {
        self.items_count
    }

    pub fn set_items_count(&mut self, items_count: usize, pages_count: Option<usize>) {
        self.items_count = items_count;
        self.server_pages_count = pages_count;
    }

    pub fn toggle_amount_dropdown_visibility(&mut self) {
        self.amount_dropdown_visible = !self.amount_dropdown_visible;
        self.items_per_page_selector.notify();
    }

    pub fn is_amount_dropdown_visible(&self) -> bool {
        self.amount_dropdown_visible
    }

    pub fn observable(&self) -> &Observable {
        &self.observable
    }

    /// Notified when the custom amount is typed or the selector visibility changes
    pub fn items_per_page_selector(&self) -> &Observable {
        &self.items_per_page_selector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pagination() -> PaginationModel {
        PaginationModel::new(10, 19)
    }

    #[test]
    fn test_offset_of_paged_mode() {
        let mut pagination = pagination();
        pagination.set_items_count(95, None);
        pagination.set_current_page(3);

        assert_eq!(pagination.first_item_offset(), 20);
        assert_eq!(pagination.pages_count(), 10);
    }

    #[test]
    fn test_server_pages_count_wins() {
        let mut pagination = pagination();
        pagination.set_items_count(30, Some(2));

        assert_eq!(pagination.pages_count(), 2);
    }

    #[test]
    fn test_infinite_mode_uses_chunk_size() {
        let mut pagination = pagination();
        pagination.set_items_per_page(50);
        pagination.set_current_page(2);
        pagination.enable_infinite_mode();

        assert_eq!(pagination.items_per_page(), 19);
        assert_eq!(pagination.current_page(), 1);
        assert_eq!(pagination.selected_items_per_page(), ItemsPerPage::Infinite);

        pagination.set_items_per_page(50);
        assert!(!pagination.is_infinite_scroll_enabled());
        assert_eq!(pagination.items_per_page(), 50);
    }

    #[test]
    fn test_changing_page_size_goes_back_to_first_page() {
        let mut pagination = pagination();
        pagination.set_items_count(100, None);
        pagination.set_current_page(4);
        pagination.set_items_per_page(25);

        assert_eq!(pagination.current_page(), 1);
    }

    #[test]
    fn test_go_to_next_page_stops_at_last() {
        let mut pagination = pagination();
        pagination.set_items_count(15, None);

        assert!(pagination.go_to_next_page());
        assert!(!pagination.go_to_next_page());
        assert_eq!(pagination.current_page(), 2);
    }

    #[test]
    fn test_default_items_per_page_precedence() {
        let mut pagination = pagination();
        assert_eq!(pagination.items_per_page(), 10);

        pagination.provide_default_items_per_page(14);
        assert_eq!(pagination.items_per_page(), 14);

        pagination.set_items_per_page(5);
        assert_eq!(pagination.items_per_page(), 5);

        pagination.reset();
        assert_eq!(pagination.items_per_page(), 10);
    }

    #[test]
    fn test_estimate_displayable_rows() {
        assert_eq!(estimate_displayable_rows(1000.0, 46.0, 215.0), 17);
        assert_eq!(estimate_displayable_rows(200.0, 46.0, 215.0), 1);
        assert_eq!(estimate_displayable_rows(800.0, 0.0, 215.0), 1);
    }

    #[test]
    fn test_amount_dropdown_closes_on_choice() {
        let mut pagination = pagination();
        let notified = std::rc::Rc::new(std::cell::Cell::new(0));
        let counter = notified.clone();
        pagination
            .items_per_page_selector()
            .observe(move || counter.set(counter.get() + 1));

        pagination.toggle_amount_dropdown_visibility();
        assert!(pagination.is_amount_dropdown_visible());
        assert_eq!(notified.get(), 1);

        pagination.enable_infinite_mode();
        assert!(!pagination.is_amount_dropdown_visible());
    }

    #[test]
    fn test_custom_items_per_page() {
        let mut pagination = pagination();
        pagination.set_custom_items_per_page(" 42 ");
        assert_eq!(pagination.parsed_custom_items_per_page(), Some(42));

        pagination.set_custom_items_per_page("0");
        assert_eq!(pagination.parsed_custom_items_per_page(), None);
    }
}
