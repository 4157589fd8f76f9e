use std::time::Duration;

use eframe::{egui, Frame};
use egui::Context;

use reqwest::blocking::Client;
use reqwest::Result;

use cutup_core::pipeline::formatter::FlickerPoem;
use cutup_core::Preset;

const SERVER: &str = "http://127.0.0.1:5000";

/// REST context holding a reusable blocking HTTP client.
struct RESTContext {
    client: Client,
}

impl RESTContext {
    /// Creates a new REST context with a timeout.
    fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::new(5, 0))
            .build()?;
        Ok(Self { client })
    }

    /// Sends a POST request to `/v1/cutup` with the source text as body.
    /// Always asks for flicker output (JSON).
    fn post_cutup(&self, text: &str, params: &[(String, String)]) -> Result<String> {
        let response = self.client
            .post(format!("{SERVER}/v1/cutup"))
            .query(&[("mode", "flicker")])
            .query(params)
            .body(text.to_owned())
            .send()?
            .error_for_status()?;

        response.text()
    }

    /// Sends a GET request to `/v1/presets`.
    fn get_presets(&self) -> Result<String> {
        let response = self.client
            .get(format!("{SERVER}/v1/presets"))
            .send()?
            .error_for_status()?;

        response.text()
    }

    /// Sends a GET request to `/v1/preset`.
    fn get_preset(&self) -> Result<String> {
        let response = self.client
            .get(format!("{SERVER}/v1/preset"))
            .send()?
            .error_for_status()?;

        response.text()
    }

    /// Sends a PUT request to `/v1/preset` to change the server default.
    fn put_preset(&self, name: &str) -> Result<String> {
        let response = self.client
            .put(format!("{SERVER}/v1/preset"))
            .query(&[("name", name)])
            .send()?
            .error_for_status()?;

        response.text()
    }
}

/// Global UI state (MUST persist between frames in egui).
struct CutupUI {
    rest: RESTContext,
    status: Option<String>,

    source: String,
    presets: Vec<String>,
    preset: String,

    use_keep: bool,
    keep: f64,

    use_seed: bool,
    seed: u64,

    poem: Option<FlickerPoem>,
    started_at: f64,
}

impl CutupUI {
    /// Initializes the UI with sane defaults.
    fn new() -> Result<Self> {
        let mut ui = Self {
            rest: RESTContext::new()?,
            status: None,

            source: String::new(),
            presets: Preset::ALL.iter().map(|p| p.name().to_owned()).collect(),
            preset: Preset::default().name().to_owned(),

            use_keep: false,
            keep: 0.3,

            use_seed: false,
            seed: 0,

            poem: None,
            started_at: 0.0,
        };
        ui.get_presets();
        Ok(ui)
    }

    /// Builds the query parameters for the API.
    /// Unchecked options are not sent, so the server uses the preset's values.
    fn build_query(&self) -> Vec<(String, String)> {
        let mut params = vec![("preset".to_owned(), self.preset.clone())];
        if self.use_keep {
            params.push(("keep".into(), self.keep.to_string()));
        }
        if self.use_seed {
            params.push(("seed".into(), self.seed.to_string()));
        }
        params
    }

    /// Performs the cut-up request and restarts the animation at `now`.
    fn cut_up(&mut self, now: f64) {
        let params = self.build_query();
        let body = match self.rest.post_cutup(&self.source, &params) {
            Ok(body) => body,
            Err(e) => {
                self.status = Some(format!("Error: {e}"));
                return;
            }
        };

        match serde_json::from_str::<FlickerPoem>(&body) {
            Ok(poem) => {
                self.status = None;
                self.poem = Some(poem);
                self.started_at = now;
            }
            Err(e) => self.status = Some(format!("Error: invalid response: {e}")),
        }
    }

    /// Fetches the preset list and the server's current default.
    fn get_presets(&mut self) {
        match self.rest.get_presets() {
            Ok(names) => self.presets = names.lines().map(|s| s.trim().to_owned()).filter(|s| !s.is_empty()).collect(),
            Err(e) => self.status = Some(format!("Error: {e}")),
        }
        if let Ok(name) = self.rest.get_preset() {
            self.preset = name.trim().to_owned();
        }
    }

    /// Makes the selected preset the server default.
    fn put_preset(&mut self) {
        match self.rest.put_preset(&self.preset) {
            Ok(message) => self.status = Some(message),
            Err(e) => self.status = Some(format!("Error: {e}")),
        }
    }
}

impl eframe::App for CutupUI {
    /// UI update loop (called every frame).
    fn update(&mut self, ctx: &Context, _: &mut Frame) {
        let now = ctx.input(|i| i.time);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label("Source text");
            ui.add(
                egui::TextEdit::multiline(&mut self.source)
                    .desired_rows(6)
                    .desired_width(f32::INFINITY),
            );
            ui.separator();

            let mut preset_changed = false;
            egui::Grid::new("cutup_grid")
                .num_columns(2)
                .spacing([20.0, 6.0])
                .striped(true)
                .show(ui, |ui| {
                    ui.label("Preset");
                    ui.horizontal(|ui| {
                        for name in &self.presets {
                            if ui.radio_value(&mut self.preset, name.clone(), name.as_str()).changed() {
                                preset_changed = true;
                            }
                        }
                    });
                    ui.end_row();

                    ui.checkbox(&mut self.use_keep, "Fixed retention");
                    if self.use_keep {
                        ui.add(
                            egui::DragValue::new(&mut self.keep)
                                .range(0.01..=1.0)
                                .speed(0.01),
                        );
                    } else {
                        ui.label("Drawn from the preset's range");
                    }
                    ui.end_row();

                    ui.checkbox(&mut self.use_seed, "Fixed seed");
                    if self.use_seed {
                        ui.add(egui::DragValue::new(&mut self.seed).speed(1));
                    } else {
                        ui.label("Random");
                    }
                    ui.end_row();

                    if ui
                        .add_sized([200.0, 40.0], egui::Button::new("Cut up"))
                        .clicked()
                    {
                        self.cut_up(now);
                    }
                    match &self.status {
                        Some(status) => ui.label(status),
                        None => ui.label(""),
                    };
                    ui.end_row();
                });

            if preset_changed {
                self.put_preset();
            }

            ui.separator();

            match &self.poem {
                Some(poem) => {
                    let elapsed = now - self.started_at;
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        for line in &poem.lines {
                            ui.horizontal_wrapped(|ui| {
                                for word in &line.words {
                                    ui.monospace(word.shown_at(elapsed));
                                }
                            });
                            ui.add_space((poem.line_spacing * 10.0) as f32);
                        }
                    });
                    ctx.request_repaint_after(Duration::from_millis(100));
                }
                None => {
                    ui.label("Paste some text and click Cut up");
                }
            }
        });
    }
}

/// Application entry point.
fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 560.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "cutup",
        options,
        Box::new(|_| Ok(Box::new(CutupUI::new()?))),
    )
}
