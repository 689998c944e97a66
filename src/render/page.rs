use chrono::NaiveDateTime;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::core::card::{Card, Column, GRID_SIZE};
use crate::render::font::{draw_text, draw_text_centered, fit_scale, text_height};

const PAGE_WIDTH_IN: f32 = 8.5;
const PAGE_HEIGHT_IN: f32 = 11.0;
const MARGIN_IN: f32 = 0.1;
const CARD_SPACING_IN: f32 = 0.05;
const TITLE_BAND_IN: f32 = 0.3;
const CARDS_ACROSS: usize = 2;
const CARDS_DOWN: usize = 2;
pub const CARDS_PER_PAGE: usize = CARDS_ACROSS * CARDS_DOWN;
pub const MIN_DPI: u32 = 72;
pub const MAX_DPI: u32 = 600;

/// Colour schemes for printed pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageStyle {
    /// Black on white, shaded free square.
    #[default]
    Plain,
    /// Tinted title band and letter row.
    Color,
}

/// Options controlling page rasterisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub dpi: u32,
    pub style: PageStyle,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dpi: 150,
            style: PageStyle::Plain,
        }
    }
}

/// Footer printed on the last page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    pub generated_at: NaiveDateTime,
    pub rounds: usize,
    pub winners: usize,
    pub total_cards: usize,
}

impl Caption {
    pub fn text(&self) -> String {
        format!(
            "Generated: {} | Rounds: {} | Expected Winners: {} | Total Cards: {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S"),
            self.rounds,
            self.winners,
            self.total_cards
        )
    }
}

struct Palette {
    page_bg: Rgba<u8>,
    border: Rgba<u8>,
    grid: Rgba<u8>,
    free: Rgba<u8>,
    text: Rgba<u8>,
    title_band: Option<Rgba<u8>>,
    letter_row: Option<Rgba<u8>>,
}

/// Pixel geometry derived from the DPI.
struct Layout {
    page_width: u32,
    page_height: u32,
    margin: u32,
    spacing: u32,
    card_width: u32,
    card_height: u32,
    title_band: u32,
}

impl Layout {
    fn new(dpi: u32) -> Self {
        let page_width = inches_to_px(PAGE_WIDTH_IN, dpi);
        let page_height = inches_to_px(PAGE_HEIGHT_IN, dpi);
        let margin = inches_to_px(MARGIN_IN, dpi).max(1);
        let spacing = inches_to_px(CARD_SPACING_IN, dpi).max(1);
        let card_width = (page_width - 3 * margin - spacing) / CARDS_ACROSS as u32;
        let card_height = (page_height - 3 * margin - spacing) / CARDS_DOWN as u32;
        Self {
            page_width,
            page_height,
            margin,
            spacing,
            card_width,
            card_height,
            title_band: inches_to_px(TITLE_BAND_IN, dpi),
        }
    }

    /// Top-left corner of slot `slot` (0..4, row-major).
    fn card_origin(&self, slot: usize) -> (i32, i32) {
        let col = (slot % CARDS_ACROSS) as u32;
        let row = (slot / CARDS_ACROSS) as u32;
        let x = self.margin + col * (self.card_width + self.spacing);
        let y = self.margin + row * (self.card_height + self.spacing);
        (x as i32, y as i32)
    }
}

/// Rasterise cards four to a page. The caption goes on the last page.
///
/// An empty card list still yields one page carrying the caption.
pub fn render_pages(cards: &[Card], caption: &Caption, options: &RenderOptions) -> Vec<RgbaImage> {
    let dpi = options.dpi.clamp(MIN_DPI, MAX_DPI);
    let layout = Layout::new(dpi);
    let palette = palette(options.style);

    let mut pages: Vec<RgbaImage> = cards
        .chunks(CARDS_PER_PAGE)
        .map(|chunk| {
            let mut page = blank_page(&layout, &palette);
            for (slot, card) in chunk.iter().enumerate() {
                let (x, y) = layout.card_origin(slot);
                draw_card(&mut page, card, x, y, &layout, &palette);
            }
            page
        })
        .collect();
    if pages.is_empty() {
        pages.push(blank_page(&layout, &palette));
    }

    if let Some(last) = pages.last_mut() {
        draw_caption(last, &caption.text(), &layout, &palette);
    }
    pages
}

fn blank_page(layout: &Layout, palette: &Palette) -> RgbaImage {
    RgbaImage::from_pixel(layout.page_width, layout.page_height, palette.page_bg)
}

fn draw_card(
    page: &mut RgbaImage,
    card: &Card,
    x: i32,
    y: i32,
    layout: &Layout,
    palette: &Palette,
) {
    let width = layout.card_width;
    let height = layout.card_height;
    let cell_width = width / GRID_SIZE as u32;
    let cell_height = (height - layout.title_band) / (GRID_SIZE as u32 + 1);
    let grid_top = y + layout.title_band as i32;

    if let Some(band) = palette.title_band {
        draw_filled_rect_mut(page, rect(x, y, width, layout.title_band), band);
    }
    let label = card.label();
    let title_width = width.saturating_sub(cell_width / 2);
    let title_scale = fit_scale(&label, title_width, layout.title_band / 2);
    let title_y = y + (layout.title_band.saturating_sub(text_height(title_scale)) / 2) as i32;
    draw_text(page, x + (cell_width / 8) as i32, title_y, &label, palette.text, title_scale);

    let letter_scale = fit_scale("B", cell_width / 2, cell_height / 2);
    for column in Column::ALL {
        let cell_x = x + (column.index() as u32 * cell_width) as i32;
        if let Some(fill) = palette.letter_row {
            draw_filled_rect_mut(page, rect(cell_x, grid_top, cell_width, cell_height), fill);
        }
        draw_hollow_rect_mut(page, rect(cell_x, grid_top, cell_width, cell_height), palette.border);
        draw_text_centered(
            page,
            cell_x + (cell_width / 2) as i32,
            grid_top + (cell_height / 2) as i32,
            &column.letter().to_string(),
            palette.text,
            letter_scale,
        );
    }

    let number_scale = fit_scale("FREE", cell_width * 3 / 4, cell_height * 2 / 5);
    for (row_idx, row) in card.grid().iter().enumerate() {
        let cell_y = grid_top + ((row_idx as u32 + 1) * cell_height) as i32;
        for (col_idx, cell) in row.iter().enumerate() {
            let cell_x = x + (col_idx as u32 * cell_width) as i32;
            let area = rect(cell_x, cell_y, cell_width, cell_height);
            if cell.is_free() {
                draw_filled_rect_mut(page, area, palette.free);
            }
            draw_hollow_rect_mut(page, area, palette.grid);
            draw_text_centered(
                page,
                cell_x + (cell_width / 2) as i32,
                cell_y + (cell_height / 2) as i32,
                &cell.to_string(),
                palette.text,
                number_scale,
            );
        }
    }

    // Two-pixel outer border.
    draw_hollow_rect_mut(page, rect(x, y, width, height), palette.border);
    if width > 2 && height > 2 {
        draw_hollow_rect_mut(page, rect(x + 1, y + 1, width - 2, height - 2), palette.border);
    }
}

fn draw_caption(page: &mut RgbaImage, text: &str, layout: &Layout, palette: &Palette) {
    let scale = fit_scale(text, layout.page_width - 2 * layout.margin, layout.margin);
    let slack = layout.margin.saturating_sub(text_height(scale)) / 2;
    let y = (layout.page_height - layout.margin + slack) as i32;
    draw_text(page, layout.margin as i32, y, text, palette.text, scale);
}

fn rect(x: i32, y: i32, width: u32, height: u32) -> Rect {
    Rect::at(x, y).of_size(width.max(1), height.max(1))
}

fn inches_to_px(inches: f32, dpi: u32) -> u32 {
    (inches * dpi as f32).round() as u32
}

fn palette(style: PageStyle) -> Palette {
    match style {
        PageStyle::Plain => Palette {
            page_bg: rgba(0xff, 0xff, 0xff),
            border: rgba(0x00, 0x00, 0x00),
            grid: rgba(0xb3, 0xb3, 0xb3),
            free: rgba(0xe6, 0xe6, 0xe6),
            text: rgba(0x00, 0x00, 0x00),
            title_band: None,
            letter_row: None,
        },
        PageStyle::Color => Palette {
            page_bg: rgba(0xff, 0xff, 0xff),
            border: rgba(0x1d, 0x2b, 0x53),
            grid: rgba(0x9a, 0xa7, 0xc7),
            free: rgba(0xf4, 0xd0, 0x6f),
            text: rgba(0x11, 0x11, 0x22),
            title_band: Some(rgba(0xdc, 0xe6, 0xf8)),
            letter_row: Some(rgba(0xb8, 0xcc, 0xf0)),
        },
    }
}

fn rgba(r: u8, g: u8, b: u8) -> Rgba<u8> {
    Rgba([r, g, b, 0xff])
}
