//! Printable page output for generated cards.

mod font;
mod page;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::core::card::Card;

pub use page::{CARDS_PER_PAGE, Caption, MAX_DPI, MIN_DPI, PageStyle, RenderOptions, render_pages};

/// Render `cards` and write one PNG per page into `dir`, creating it if needed.
///
/// Returns the written paths in page order.
pub fn write_document(
    dir: &Path,
    cards: &[Card],
    caption: &Caption,
    options: &RenderOptions,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let pages = render_pages(cards, caption, options);
    let mut written = Vec::with_capacity(pages.len());
    for (idx, page) in pages.iter().enumerate() {
        let path = dir.join(format!("page_{:03}.png", idx + 1));
        page.save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }
    info!(pages = written.len(), dir = %dir.display(), "document written");
    Ok(written)
}
