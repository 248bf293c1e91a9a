//! Bucket rows that loop horizontally once their items overflow.

use std::{sync::Arc, time::Duration};

use board_core::{
    classifier::{Bucket, BucketKind, Classification},
    layout::record_label,
    AnimatedRegion, AnimationTuning, Axis, OverflowPolicy,
};
use eframe::egui;
use egui::{Galley, Sense};

const TITLE_WIDTH: f32 = 210.0;
const LANE_HEIGHT: f32 = 44.0;
const ITEM_GAP: f32 = 56.0;
const ITEM_FONT_SIZE: f32 = 20.0;
const TITLE_FONT_SIZE: f32 = 18.0;

struct MarqueeLane {
    viewport_width: f32,
    region: AnimatedRegion<Arc<Galley>>,
    started_at: f64,
}

/// Per-bucket lanes, rebuilt after every snapshot and whenever a lane's width changes.
#[derive(Default)]
pub struct MarqueeBoard {
    lanes: Vec<Option<MarqueeLane>>,
}

fn title_color(kind: BucketKind) -> egui::Color32 {
    match kind {
        BucketKind::Overdue => egui::Color32::from_rgb(0xe0, 0x5a, 0x4f),
        BucketKind::Today => egui::Color32::from_rgb(0xf2, 0xc1, 0x4e),
        BucketKind::DaysAhead(_) => egui::Color32::from_rgb(0x8a, 0xc4, 0xff),
        BucketKind::Future => egui::Color32::from_rgb(0x9a, 0x9a, 0xa6),
    }
}

impl MarqueeBoard {
    pub fn reset(&mut self) {
        self.lanes.clear();
    }

    fn build_lane(
        ui: &egui::Ui,
        bucket: &Bucket,
        viewport_width: f32,
        policy: OverflowPolicy,
        tuning: &AnimationTuning,
        now: f64,
    ) -> MarqueeLane {
        let font = egui::FontId::proportional(ITEM_FONT_SIZE);
        let color = ui.visuals().strong_text_color();
        let items: Vec<Arc<Galley>> = bucket
            .members
            .iter()
            .map(|record| {
                ui.painter()
                    .layout_no_wrap(record_label(record), font.clone(), color)
            })
            .collect();
        let content_extent: f32 = items.iter().map(|g| g.size().x + ITEM_GAP).sum();

        let mut region = AnimatedRegion::new(Axis::Horizontal, content_extent, viewport_width, items);
        region.animate(policy, tuning);

        MarqueeLane {
            viewport_width,
            region,
            started_at: now,
        }
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        classification: &Classification,
        policy: OverflowPolicy,
        tuning: &AnimationTuning,
        now: f64,
    ) -> bool {
        self.lanes.resize_with(classification.buckets.len(), || None);
        let mut animating = false;

        for (bucket, slot) in classification.buckets.iter().zip(self.lanes.iter_mut()) {
            ui.horizontal(|ui| {
                let (title_rect, _) =
                    ui.allocate_exact_size(egui::vec2(TITLE_WIDTH, LANE_HEIGHT), Sense::hover());
                let painter = ui.painter();
                painter.rect_filled(
                    title_rect.shrink(2.0),
                    egui::CornerRadius::same(4),
                    ui.visuals().faint_bg_color,
                );
                painter.text(
                    title_rect.left_center() + egui::vec2(10.0, 0.0),
                    egui::Align2::LEFT_CENTER,
                    format!("{}  ({})", bucket.title, bucket.members.len()),
                    egui::FontId::proportional(TITLE_FONT_SIZE),
                    title_color(bucket.kind),
                );

                let (lane_rect, _) = ui.allocate_exact_size(
                    egui::vec2(ui.available_width(), LANE_HEIGHT),
                    Sense::hover(),
                );

                if bucket.members.is_empty() {
                    ui.painter().text(
                        lane_rect.left_center() + egui::vec2(8.0, 0.0),
                        egui::Align2::LEFT_CENTER,
                        "-",
                        egui::FontId::proportional(ITEM_FONT_SIZE),
                        ui.visuals().weak_text_color(),
                    );
                    *slot = None;
                    return;
                }

                let stale = slot
                    .as_ref()
                    .is_none_or(|lane| (lane.viewport_width - lane_rect.width()).abs() > 0.5);
                if stale {
                    *slot = Some(Self::build_lane(
                        ui,
                        bucket,
                        lane_rect.width(),
                        policy,
                        tuning,
                        now,
                    ));
                }
                let Some(lane) = slot.as_ref() else {
                    return;
                };

                let elapsed = Duration::from_secs_f64((now - lane.started_at).max(0.0));
                let offset = lane
                    .region
                    .animation()
                    .map(|animation| animation.offset_at(elapsed))
                    .unwrap_or(0.0);
                if lane.region.animation().is_some() {
                    animating = true;
                }

                let painter = ui.painter().with_clip_rect(lane_rect);
                let color = ui.visuals().strong_text_color();
                let mut x = lane_rect.left() + offset;
                for galley in &lane.region.items {
                    let y = lane_rect.center().y - galley.size().y / 2.0;
                    let width = galley.size().x;
                    if x + width >= lane_rect.left() && x <= lane_rect.right() {
                        painter.galley(egui::pos2(x, y), galley.clone(), color);
                    }
                    x += width + ITEM_GAP;
                }
            });
            ui.add_space(2.0);
        }

        animating
    }
}
