use eframe::egui;
use crate::app::app_core::DashboardApp;
use crate::plotter::{plot_angle_chart, plot_skeleton_view};
use crate::service::PoseService;

pub fn render_main_panel<S: PoseService>(app: &mut DashboardApp<S>, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let config = app.config.get_config();
        let geometry = app.controller.geometry();

        ui.horizontal(|ui| {
            ui.label("Video:");
            match app.controller.video_feed_url() {
                Some(url) => ui.hyperlink(url),
                None => ui.weak("camera off"),
            };
        });
        ui.add_space(5.0);

        ui.columns(2, |columns| {
            columns[0].heading("View 1");
            plot_skeleton_view(&mut columns[0], "skeleton_view_1", geometry, &config.scene.primary_view, &config.scene);
            columns[1].heading("View 2");
            plot_skeleton_view(&mut columns[1], "skeleton_view_2", geometry, &config.scene.secondary_view, &config.scene);
        });

        ui.separator();
        ui.heading("Joint angles");
        plot_angle_chart(ui, app.controller.buffer(), &config.chart);
    });
}
