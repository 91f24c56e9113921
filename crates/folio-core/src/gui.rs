use egui;

use crate::config::StyleConfig;
use crate::pages::PageLayout;
use crate::turn::Direction;

/// What the user asked for this frame. The host decides how to honor
/// it; a requested turn may still be rejected at the gesture boundary.
#[derive(Default)]
pub struct PanelRequest {
    pub turn: Option<Direction>,
    pub save_config: bool,
    pub load_config: bool,
}

pub fn book_control_panel(
    ctx: &egui::Context,
    settle_duration: &mut f32,
    style: &mut StyleConfig,
    layout: PageLayout,
    page_count: u32,
) -> PanelRequest {
    let mut request = PanelRequest::default();

    egui::SidePanel::right("book_controls")
        .default_width(260.0)
        .show(ctx, |ui| {
            ui.heading("Book Controls");
            ui.separator();

            match layout {
                PageLayout::Resting { left, right } => {
                    ui.label(format!(
                        "Resting: pages {left} / {right} of {page_count}"
                    ));
                }
                PageLayout::Turning {
                    left_static,
                    right_static,
                    ..
                } => {
                    ui.label(format!(
                        "Turning: {left_static}..{right_static} of {page_count}"
                    ));
                }
            }

            ui.horizontal(|ui| {
                if ui.button("Turn left").clicked() {
                    request.turn = Some(Direction::Left);
                }
                if ui.button("Turn right").clicked() {
                    request.turn = Some(Direction::Right);
                }
            });

            ui.separator();

            ui.add(
                egui::Slider::new(settle_duration, 0.1..=2.0)
                    .text("Settle Duration (s)"),
            );

            egui::CollapsingHeader::new("Appearance")
                .default_open(false)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label("Paper");
                        color_edit_rgb(ui, &mut style.paper_color);
                    });
                    ui.horizontal(|ui| {
                        ui.label("Cover");
                        color_edit_rgb(ui, &mut style.cover_color);
                    });
                    ui.horizontal(|ui| {
                        ui.label("Ink");
                        color_edit_rgb(ui, &mut style.ink_color);
                    });
                    ui.add(
                        egui::Slider::new(&mut style.shadow_strength, 0.0..=1.0)
                            .text("Fold Shadow"),
                    );
                });

            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Save config…").clicked() {
                    request.save_config = true;
                }
                if ui.button("Load config…").clicked() {
                    request.load_config = true;
                }
            });

            if ui.button("Reset style").clicked() {
                *style = StyleConfig::default();
            }
        });

    request
}

fn color_edit_rgb(ui: &mut egui::Ui, color: &mut [f32; 3]) {
    let mut rgba = egui::Color32::from_rgb(
        (color[0] * 255.0) as u8,
        (color[1] * 255.0) as u8,
        (color[2] * 255.0) as u8,
    );
    if ui.color_edit_button_srgba(&mut rgba).changed() {
        color[0] = rgba.r() as f32 / 255.0;
        color[1] = rgba.g() as f32 / 255.0;
        color[2] = rgba.b() as f32 / 255.0;
    }
}
