use std::time::Duration;
use eframe::{egui, Frame};
use log::info;

use crate::config::ConfigManager;
use crate::service::PoseService;
use super::controller::SessionController;

pub struct DashboardApp<S: PoseService> {
    pub controller: SessionController<S>,
    pub config: ConfigManager,
}

impl<S: PoseService> DashboardApp<S> {
    pub fn new(controller: SessionController<S>, config: ConfigManager) -> Self {
        info!("Dashboard ready, camera is off");
        Self { controller, config }
    }
}

impl<S: PoseService> eframe::App for DashboardApp<S> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        ctx.set_visuals(egui::Visuals::light());

        // apply responses before drawing so this frame shows them
        self.controller.process_events();

        crate::app::ui::render_status_bar(self, ctx);
        crate::app::ui::render_main_panel(self, ctx);

        ctx.request_repaint_after(Duration::from_millis(self.config.get_config().polling.interval_ms.min(100)));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.controller.shutdown();
    }
}
