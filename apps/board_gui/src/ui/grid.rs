//! Paged weekday grid. Cells whose text is taller than the row scroll once and hold.

use std::{sync::Arc, time::Duration};

use board_core::{
    layout::{grid_cells, GRID_COLUMNS},
    paginate, AnimatedRegion, AnimationTuning, Axis, OverflowPolicy, SlidePage,
};
use eframe::egui;
use egui::{Galley, Sense};
use shared::domain::GridRow;

const ROW_HEIGHT: f32 = 52.0;
const HEADER_HEIGHT: f32 = 32.0;
const CELL_PADDING: f32 = 8.0;
const CELL_FONT_SIZE: f32 = 18.0;
const COLUMN_SHARES: [f32; 5] = [0.08, 0.30, 0.20, 0.27, 0.15];

type CellRegion = AnimatedRegion<Arc<Galley>>;

#[derive(Default)]
pub struct GridBoard {
    pages: Vec<SlidePage<GridRow>>,
    current: usize,
    shown_at: Option<f64>,
    layout_width: f32,
    cells: Vec<[CellRegion; 5]>,
}

fn column_widths(total: f32) -> [f32; 5] {
    COLUMN_SHARES.map(|share| (total * share).max(24.0))
}

impl GridBoard {
    pub fn load(&mut self, rows: Vec<GridRow>, rows_per_page: usize) {
        self.pages = paginate(rows, rows_per_page);
        self.current = 0;
        self.invalidate();
    }

    /// Ignores indices past the last page.
    pub fn show_page(&mut self, index: usize) {
        if index < self.pages.len() && index != self.current {
            self.current = index;
            self.invalidate();
        }
    }

    fn invalidate(&mut self) {
        self.cells.clear();
        self.shown_at = None;
    }

    fn build_cells(
        &mut self,
        ui: &egui::Ui,
        widths: [f32; 5],
        policy: OverflowPolicy,
        tuning: &AnimationTuning,
    ) {
        let Some(page) = self.pages.get(self.current) else {
            self.cells.clear();
            return;
        };
        let font = egui::FontId::proportional(CELL_FONT_SIZE);
        let color = ui.visuals().text_color();
        let viewport = ROW_HEIGHT - CELL_PADDING;

        self.cells = page
            .rows
            .iter()
            .map(|row| {
                let texts = grid_cells(row);
                std::array::from_fn(|column| {
                    let wrap_width = (widths[column] - 2.0 * CELL_PADDING).max(8.0);
                    let galley = ui.painter().layout(
                        texts[column].clone(),
                        font.clone(),
                        color,
                        wrap_width,
                    );
                    let height = galley.size().y;
                    let mut region = AnimatedRegion::new(Axis::Vertical, height, viewport, vec![galley]);
                    region.animate(policy, tuning);
                    region
                })
            })
            .collect();
    }

    /// Paints the current page. Returns whether any cell is still moving.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        policy: OverflowPolicy,
        tuning: &AnimationTuning,
        now: f64,
    ) -> bool {
        if self.pages.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(egui::RichText::new("No shipments this week").weak().size(22.0));
            });
            return false;
        }

        let total_width = ui.available_width();
        let widths = column_widths(total_width);
        if self.cells.is_empty() || (self.layout_width - total_width).abs() > 0.5 {
            self.layout_width = total_width;
            self.build_cells(ui, widths, policy, tuning);
            self.shown_at = Some(now);
        }
        let elapsed = Duration::from_secs_f64((now - self.shown_at.unwrap_or(now)).max(0.0));

        let (header_rect, _) =
            ui.allocate_exact_size(egui::vec2(total_width, HEADER_HEIGHT), Sense::hover());
        let painter = ui.painter();
        painter.rect_filled(header_rect, egui::CornerRadius::same(4), ui.visuals().faint_bg_color);
        let mut x = header_rect.left();
        for (title, width) in GRID_COLUMNS.iter().zip(widths) {
            painter.text(
                egui::pos2(x + CELL_PADDING, header_rect.center().y),
                egui::Align2::LEFT_CENTER,
                *title,
                egui::FontId::proportional(CELL_FONT_SIZE),
                ui.visuals().strong_text_color(),
            );
            x += width;
        }

        let mut moving = false;
        let fallback = ui.visuals().text_color();
        for (row_index, row) in self.cells.iter().enumerate() {
            let (row_rect, _) =
                ui.allocate_exact_size(egui::vec2(total_width, ROW_HEIGHT), Sense::hover());
            if row_index % 2 == 1 {
                ui.painter().rect_filled(
                    row_rect,
                    egui::CornerRadius::ZERO,
                    ui.visuals().faint_bg_color.gamma_multiply(0.5),
                );
            }

            let mut x = row_rect.left();
            for (region, width) in row.iter().zip(widths) {
                let cell_rect = egui::Rect::from_min_size(
                    egui::pos2(x, row_rect.top()),
                    egui::vec2(width, ROW_HEIGHT),
                )
                .shrink(CELL_PADDING / 2.0);
                let offset = match region.animation() {
                    Some(animation) => {
                        moving |= !animation.is_finished(elapsed);
                        animation.offset_at(elapsed)
                    }
                    None => 0.0,
                };

                let painter = ui.painter().with_clip_rect(cell_rect);
                for galley in &region.items {
                    let top = if region.overflows() {
                        cell_rect.top()
                    } else {
                        cell_rect.center().y - galley.size().y / 2.0
                    };
                    painter.galley(
                        egui::pos2(cell_rect.left() + CELL_PADDING / 2.0, top + offset),
                        galley.clone(),
                        fallback,
                    );
                }
                x += width;
            }
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(format!("Page {} / {}", self.current + 1, self.pages.len()))
                    .weak(),
            );
        });

        moving
    }
}
