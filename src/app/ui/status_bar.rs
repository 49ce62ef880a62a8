use eframe::egui;
use crate::app::app_core::DashboardApp;
use crate::service::PoseService;

pub fn render_status_bar<S: PoseService>(app: &mut DashboardApp<S>, ctx: &egui::Context) {
    egui::TopBottomPanel::top("status_bar")
        .min_height(40.0)
        .show(ctx, |ui| {
            ui.add_space(5.0);
            ui.horizontal(|ui| {
                let controls = app.controller.controls();

                if ui.add_enabled(controls.camera_enabled, egui::Button::new(controls.camera_label)).clicked() {
                    app.controller.toggle_camera();
                }
                if ui.add_enabled(controls.record_enabled, egui::Button::new("⏺ Record")).clicked() {
                    app.controller.start_recording();
                }
                if ui.add_enabled(controls.stop_enabled, egui::Button::new("⏹ Stop")).clicked() {
                    app.controller.stop_recording();
                }

                ui.separator();

                // state label
                let state = app.controller.state();
                let (state_text, state_color) = if state.recording {
                    ("Recording", egui::Color32::from_rgb(200, 0, 0))
                } else if state.camera_active {
                    ("Live", egui::Color32::from_rgb(0, 150, 0))
                } else {
                    ("Camera off", egui::Color32::from_rgb(150, 0, 0))
                };
                ui.colored_label(state_color, state_text);

                ui.separator();
                render_status_message(app, ui);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let stats = app.controller.stats();
                    if !app.controller.is_polling() {
                        ui.weak("idle");
                    }
                    ui.label(format!(
                        "Poses: {} ok / {} failed / {} rendered",
                        stats.succeeded,
                        stats.failed,
                        app.controller.render_count()
                    ));
                    ui.separator();
                    ui.label(format!(
                        "Window: {}/{}",
                        app.controller.buffer().len(),
                        app.controller.buffer().capacity()
                    ));
                });
            });
            ui.add_space(5.0);
        });
}

fn render_status_message<S: PoseService>(app: &DashboardApp<S>, ui: &mut egui::Ui) {
    if let Some(message) = app.controller.status().visible() {
        let [r, g, b] = message.kind.color();
        ui.colored_label(egui::Color32::from_rgb(r, g, b), &message.text);
    }
}
