use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, post, put, web};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cutup_core::{CutUp, CutupError, Output, OutputMode, Preset};

/// Largest accepted source text. Long texts are what the long-text retention
/// range is tuned for, so this sits well above actix's 256 KiB default.
const MAX_SOURCE_BYTES: usize = 16 * 1024 * 1024;

/// Query parameters for the `/v1/cutup` endpoint
#[derive(Deserialize)]
struct CutupParams {
	preset: Option<String>,
	keep: Option<f64>,
	seed: Option<u64>,
	mode: Option<String>,
}

#[derive(Deserialize)]
struct PresetQuery {
	name: Option<String>,
}

struct SharedData {
	preset: Preset,
}

impl CutupParams {
	/// Builds the transformer for one request, starting from `default_preset`.
	fn cutup(&self, default_preset: Preset) -> Result<CutUp, String> {
		let preset = match &self.preset {
			Some(name) => name.parse::<Preset>()?,
			None => default_preset,
		};

		let mut config = preset.config();
		if let Some(keep) = self.keep {
			config.fixed_retention = Some(keep);
		}
		if let Some(mode) = &self.mode {
			config.output = mode.parse::<OutputMode>()?;
		}
		CutUp::new(config).map_err(|e| e.to_string())
	}

	fn rng(&self) -> StdRng {
		match self.seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_os_rng(),
		}
	}
}

fn error_response(err: CutupError) -> HttpResponse {
	match err {
		CutupError::EmptyInput => HttpResponse::UnprocessableEntity().body(err.to_string()),
		CutupError::InvalidConfiguration(_) => HttpResponse::BadRequest().body(err.to_string()),
		other => HttpResponse::InternalServerError().body(other.to_string()),
	}
}

/// HTTP POST endpoint `/v1/cutup`
///
/// Turns the request body (raw text) into a cut-up poem.
/// Plain output is returned as text, flicker output as JSON.
#[post("/v1/cutup")]
async fn post_cutup(data: web::Data<Mutex<SharedData>>, query: web::Query<CutupParams>, body: String) -> impl Responder {
	let default_preset = match data.lock() {
		Ok(shared) => shared.preset,
		Err(_) => return HttpResponse::InternalServerError().body("Preset lock failed"),
	};

	let cutup = match query.cutup(default_preset) {
		Ok(c) => c,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	match cutup.transform(&body, &mut query.rng()) {
		Ok(Output::Plain(text)) => HttpResponse::Ok().content_type("text/plain; charset=utf-8").body(text),
		Ok(Output::Flicker(poem)) => HttpResponse::Ok().json(poem),
		Err(e) => {
			warn!(length = body.len(), "Cut-up request failed: {e}");
			error_response(e)
		}
	}
}

#[get("/v1/presets")]
async fn get_presets() -> impl Responder {
	let names: Vec<&str> = Preset::ALL.iter().map(Preset::name).collect();
	HttpResponse::Ok().body(names.join("\n"))
}

#[get("/v1/preset")]
async fn get_preset(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	match data.lock() {
		Ok(shared) => HttpResponse::Ok().body(shared.preset.name()),
		Err(_) => HttpResponse::InternalServerError().body("Preset lock failed"),
	}
}

#[put("/v1/preset")]
async fn put_preset(data: web::Data<Mutex<SharedData>>, query: web::Query<PresetQuery>) -> impl Responder {
	let name = match &query.name {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty preset name"),
	};

	let preset = match name.parse::<Preset>() {
		Ok(p) => p,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	let mut shared = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Preset lock failed"),
	};
	shared.preset = preset;
	info!(%preset, "Default preset changed");

	HttpResponse::Ok().body(format!("Preset set to {preset}"))
}

fn routes(cfg: &mut web::ServiceConfig) {
	cfg.app_data(web::PayloadConfig::new(MAX_SOURCE_BYTES))
		.service(post_cutup)
		.service(get_presets)
		.service(get_preset)
		.service(put_preset);
}

fn init_tracing() {
	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::registry()
		.with(fmt::layer().with_target(true).with_filter(env_filter))
		.init();
}

/// Main entry point for the server.
///
/// Keeps the default preset in a `Mutex` shared by all workers and starts an
/// Actix-web HTTP server on 127.0.0.1:5000.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	init_tracing();

	let shared_data = web::Data::new(Mutex::new(SharedData { preset: Preset::default() }));
	info!("Listening on 127.0.0.1:5000");

	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.configure(routes)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}

#[cfg(test)]
mod tests {
	use super::*;
	use actix_web::http::StatusCode;
	use actix_web::test;
	use cutup_core::pipeline::formatter::FlickerPoem;

	fn shared(preset: Preset) -> web::Data<Mutex<SharedData>> {
		web::Data::new(Mutex::new(SharedData { preset }))
	}

	#[actix_web::test]
	async fn plain_cutup_returns_text() {
		let app = test::init_service(App::new().app_data(shared(Preset::Gentle)).configure(routes)).await;
		let req = test::TestRequest::post()
			.uri("/v1/cutup?keep=1.0&seed=3")
			.set_payload("The quick brown fox jumps over the lazy dog.")
			.to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::OK);

		let body = test::read_body(resp).await;
		let text = std::str::from_utf8(&body).unwrap();
		let mut words: Vec<&str> = text.split_whitespace().collect();
		words.sort();
		assert_eq!(words, ["brown", "dog", "fox", "jumps", "lazy", "over", "quick", "the", "the"]);
	}

	#[actix_web::test]
	async fn flicker_mode_returns_json() {
		let app = test::init_service(App::new().app_data(shared(Preset::Gentle)).configure(routes)).await;
		let req = test::TestRequest::post()
			.uri("/v1/cutup?mode=flicker&keep=1.0&seed=1")
			.set_payload("lamp and harbor")
			.to_request();
		let poem: FlickerPoem = test::call_and_read_body_json(&app, req).await;
		let mut words: Vec<String> = poem.plain_text().split_whitespace().map(str::to_owned).collect();
		words.sort();
		assert_eq!(words, ["and", "harbor", "lamp"]);
	}

	#[actix_web::test]
	async fn novel_length_source_is_accepted() {
		let app = test::init_service(App::new().app_data(shared(Preset::Gentle)).configure(routes)).await;
		let source = "the harbor lantern remembers every tide ".repeat(10_000);
		assert!(source.len() > 256 * 1024);

		let req = test::TestRequest::post()
			.uri("/v1/cutup?keep=0.5&seed=2")
			.set_payload(source)
			.to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::OK);

		let body = test::read_body(resp).await;
		let words = std::str::from_utf8(&body).unwrap().split_whitespace().count();
		assert_eq!(words, 30_000);
	}

	#[actix_web::test]
	async fn errors_map_to_status_codes() {
		let app = test::init_service(App::new().app_data(shared(Preset::Gentle)).configure(routes)).await;

		let empty = test::TestRequest::post().uri("/v1/cutup").set_payload("?!").to_request();
		assert_eq!(test::call_service(&app, empty).await.status(), StatusCode::UNPROCESSABLE_ENTITY);

		let bad_keep = test::TestRequest::post().uri("/v1/cutup?keep=2").set_payload("words").to_request();
		assert_eq!(test::call_service(&app, bad_keep).await.status(), StatusCode::BAD_REQUEST);

		let bad_preset = test::TestRequest::post().uri("/v1/cutup?preset=loud").set_payload("words").to_request();
		assert_eq!(test::call_service(&app, bad_preset).await.status(), StatusCode::BAD_REQUEST);
	}

	#[actix_web::test]
	async fn default_preset_can_be_changed() {
		let app = test::init_service(App::new().app_data(shared(Preset::Gentle)).configure(routes)).await;

		let req = test::TestRequest::get().uri("/v1/preset").to_request();
		assert_eq!(test::call_and_read_body(&app, req).await, "gentle");

		let req = test::TestRequest::put().uri("/v1/preset?name=Aggressive").to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

		let req = test::TestRequest::get().uri("/v1/preset").to_request();
		assert_eq!(test::call_and_read_body(&app, req).await, "aggressive");

		let req = test::TestRequest::put().uri("/v1/preset?name=").to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

		let req = test::TestRequest::get().uri("/v1/presets").to_request();
		assert_eq!(test::call_and_read_body(&app, req).await, "gentle\nsparse\naggressive");
	}
}
