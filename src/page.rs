//! Grid pagination of composed labels.

use image::{imageops, RgbImage};
use tracing::debug;

use crate::layout::{LayoutConfig, Size, BACKGROUND};

/// Number of pages needed for `labels` labels at `capacity` per page.
pub fn page_count(labels: usize, capacity: usize) -> usize {
    labels.div_ceil(capacity)
}

/// Grid cell `(row, col)` of the `index`-th label on a page, row-major.
pub fn cell_of(index: usize, cols: usize) -> (usize, usize) {
    (index / cols, index % cols)
}

/// Page manager for placing labels on grid pages
#[derive(Debug, Clone)]
pub struct Paginator {
    layout: LayoutConfig,
}

impl Paginator {
    pub fn new(layout: &LayoutConfig) -> Self {
        Self {
            layout: layout.clone(),
        }
    }

    pub fn labels_per_page(&self) -> usize {
        self.layout.labels_per_page()
    }

    pub fn page_size(&self) -> Size {
        self.layout.page_size()
    }

    /// Pixel offset of the top-left corner of the `index`-th cell on a page
    pub fn cell_origin(&self, index: usize) -> (u32, u32) {
        let (row, col) = cell_of(index, self.layout.cols as usize);
        let label = self.layout.label;
        (col as u32 * label.width, row as u32 * label.height)
    }

    /// Render one page. `labels` must not exceed the page capacity; any
    /// cells left over stay blank.
    pub fn render_page(&self, labels: &[RgbImage]) -> RgbImage {
        debug_assert!(labels.len() <= self.labels_per_page());
        let size = self.page_size();
        let mut page = RgbImage::from_pixel(size.width, size.height, BACKGROUND);

        for (idx, label) in labels.iter().enumerate() {
            let (x, y) = self.cell_origin(idx);
            imageops::replace(&mut page, label, x as i64, y as i64);
        }

        page
    }
}

/// Split `labels` into pages of at most `layout.labels_per_page()`,
/// preserving order. No labels, no pages.
pub fn paginate(labels: &[RgbImage], layout: &LayoutConfig) -> Vec<RgbImage> {
    let paginator = Paginator::new(layout);
    labels
        .chunks(paginator.labels_per_page())
        .enumerate()
        .map(|(page_idx, chunk)| {
            debug!(page = page_idx + 1, labels = chunk.len(), "Rendering page");
            paginator.render_page(chunk)
        })
        .collect()
}

/// Incremental paginator: feed labels one at a time and collect each page
/// as soon as it fills, so at most one page of labels is held in memory.
#[derive(Debug)]
pub struct PageBuilder {
    paginator: Paginator,
    pending: Vec<RgbImage>,
    pages: Vec<RgbImage>,
    labels_seen: usize,
}

impl PageBuilder {
    pub fn new(layout: &LayoutConfig) -> Self {
        let paginator = Paginator::new(layout);
        let pending = Vec::with_capacity(paginator.labels_per_page());
        Self {
            paginator,
            pending,
            pages: Vec::new(),
            labels_seen: 0,
        }
    }

    pub fn push(&mut self, label: RgbImage) {
        self.pending.push(label);
        self.labels_seen += 1;
        if self.pending.len() == self.paginator.labels_per_page() {
            self.flush();
        }
    }

    pub fn labels_seen(&self) -> usize {
        self.labels_seen
    }

    /// Emit the partial last page, if any, and return every page.
    pub fn finish(mut self) -> Vec<RgbImage> {
        if !self.pending.is_empty() {
            self.flush();
        }
        self.pages
    }

    fn flush(&mut self) {
        debug!(
            page = self.pages.len() + 1,
            labels = self.pending.len(),
            "Rendering page"
        );
        let page = self.paginator.render_page(&self.pending);
        self.pages.push(page);
        self.pending.clear();
    }
}
