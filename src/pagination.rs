//! Pagination engine and page cursor.

/// Rows shown per table page.
pub const ROWS_PER_PAGE: usize = 10;

/// Returns the 1-indexed page `page_number` of `rows`.
///
/// Out-of-range pages (including page 0) come back empty rather than failing.
pub fn page<T>(rows: &[T], page_number: usize, page_size: usize) -> &[T] {
    if page_number == 0 || page_size == 0 {
        return &[];
    }
    let start = (page_number - 1).saturating_mul(page_size);
    if start >= rows.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(rows.len());
    &rows[start..end]
}

/// Number of pages needed for `total_rows`.
pub fn page_count(total_rows: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        total_rows.div_ceil(page_size)
    }
}

/// Current table page. Reset to page 1 whenever the filters change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    current: usize,
    rows_per_page: usize,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            current: 1,
            rows_per_page: ROWS_PER_PAGE,
        }
    }
}

impl PageCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    pub fn reset(&mut self) {
        self.current = 1;
    }

    /// Jumps to `page` as a page-number click does. Not clamped; an
    /// out-of-range page shows an empty slice.
    pub fn go_to(&mut self, page: usize) {
        self.current = page.max(1);
    }

    /// Moves back one page. From beyond the last page it lands on the last
    /// valid page so the table is never stuck empty.
    pub fn previous(&mut self, total_rows: usize) {
        let last = page_count(total_rows, self.rows_per_page);
        if self.current > last && last > 0 {
            self.current = last;
        } else if self.current > 1 {
            self.current -= 1;
        }
    }

    pub fn next(&mut self, total_rows: usize) {
        if self.current < page_count(total_rows, self.rows_per_page) {
            self.current += 1;
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self, total_rows: usize) -> bool {
        self.current < page_count(total_rows, self.rows_per_page)
    }

    /// Page numbers the selector offers.
    pub fn page_numbers(&self, total_rows: usize) -> std::ops::RangeInclusive<usize> {
        1..=page_count(total_rows, self.rows_per_page)
    }

    /// The slice of `rows` under the cursor.
    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        page(rows, self.current, self.rows_per_page)
    }
}
