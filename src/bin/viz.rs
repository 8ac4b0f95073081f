use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints, Points};

use drone_agent::config::SimulationConfig;
use drone_agent::control::WaypointPolicy;
use drone_agent::io::RunSummary;
use drone_agent::sim::{RunReport, Simulation, TickRecord};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => drone_agent::load_config(path)?,
        None => SimulationConfig::default(),
    };
    let mut sim = Simulation::new(&config)?;
    let mut policy = WaypointPolicy::new(config.sim.dt);
    let report = sim.run_episodes(&mut policy, 8)?;
    let summary = RunSummary::from_report("waypoint", &config, &report);

    let app = AgentViz { report, summary, config };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Drone Agent Viewer", options, Box::new(|_| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}

struct AgentViz {
    report: RunReport,
    summary: RunSummary,
    config: SimulationConfig,
}

impl eframe::App for AgentViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let step = (self.report.ticks.len() / 2000).max(1);
        let sampled: Vec<&TickRecord> = self.report.ticks.iter().step_by(step).collect();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading(format!("Policy: {}", self.summary.policy));
            ui.label(format!(
                "Episodes: {}  |  Wins: {} ({:.0}%)  |  Mean reward: {:.2}  |  Ticks: {}",
                self.summary.episodes,
                self.summary.wins,
                self.summary.win_rate * 100.0,
                self.summary.mean_reward,
                self.summary.ticks,
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y / 2.0 - 8.0;

            ui.horizontal(|ui| {
                // Altitude vs Time
                ui.vertical(|ui| {
                    ui.label("Altitude (m)");
                    let points: PlotPoints = sampled.iter()
                        .map(|t| [t.time, t.pos.z])
                        .collect();
                    Plot::new("altitude")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Altitude", points));
                        });
                });

                // Distance to target vs Time
                ui.vertical(|ui| {
                    ui.label("Distance to target (m)");
                    let points: PlotPoints = sampled.iter()
                        .map(|t| [t.time, t.distance])
                        .collect();
                    Plot::new("distance")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Distance", points));
                        });
                });
            });

            ui.horizontal(|ui| {
                // Cumulative reward vs Time
                ui.vertical(|ui| {
                    ui.label("Episode reward");
                    let points: PlotPoints = sampled.iter()
                        .map(|t| [t.time, t.cumulative_reward])
                        .collect();
                    Plot::new("reward")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Reward", points));
                        });
                });

                // Ground track with targets
                ui.vertical(|ui| {
                    ui.label("Ground track (m)");
                    let track: PlotPoints = sampled.iter()
                        .map(|t| [t.pos.x, t.pos.y])
                        .collect();
                    let targets: PlotPoints = self.config.targets.iter()
                        .map(|t| [t.position[0], t.position[1]])
                        .collect();
                    Plot::new("track")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("East (m)")
                        .data_aspect(1.0)
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Track", track));
                            plot_ui.points(Points::new("Targets", targets).radius(5.0));
                        });
                });
            });
        });
    }
}
