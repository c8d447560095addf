//! Browser bindings
//!
//! `WebGame` wraps the engine for the host page. Rejections collapse into a
//! `bool` plus `last_message()`; events drain as JSON.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::globe::{CatalogLookup, Viewport};
use crate::renderer::RenderState;
use crate::settings::Settings;
use crate::sim::{CountdownBar, EffectKind, GameEngine, ScoreBand};
use crate::tuning::Tuning;

struct Inner {
    engine: GameEngine,
    render_state: Option<RenderState>,
}

#[wasm_bindgen]
pub struct WebGame {
    inner: Rc<RefCell<Inner>>,
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
impl WebGame {
    /// `tuning_json` may be empty or a partial override
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: Option<String>) -> WebGame {
        let tuning = match tuning_json.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(json) => Tuning::from_json(json).unwrap_or_else(|e| {
                log::warn!("Ignoring tuning override: {}", e);
                Tuning::default()
            }),
            None => Tuning::default(),
        };
        let seed = js_sys::Date::now() as u64;
        log::info!("Globe Hunt initialized with seed: {}", seed);
        WebGame {
            inner: Rc::new(RefCell::new(Inner {
                engine: GameEngine::with_config(seed, tuning, Settings::load()),
                render_state: None,
            })),
        }
    }

    /// Create the wgpu surface on `canvas_id`, sized from the window height
    pub fn attach_canvas(&self, canvas_id: String) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        wasm_bindgen_futures::future_to_promise(async move {
            let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
            let document = window.document().ok_or_else(|| js_err("no document"))?;
            let canvas: HtmlCanvasElement = document
                .get_element_by_id(&canvas_id)
                .ok_or_else(|| js_err(format!("no element #{canvas_id}")))?
                .dyn_into()
                .map_err(|_| js_err(format!("#{canvas_id} is not a canvas")))?;

            let height = window
                .inner_height()?
                .as_f64()
                .unwrap_or(0.0);
            let viewport = Viewport::from_window_height(height as f32);
            canvas.set_width(viewport.size);
            canvas.set_height(viewport.size);

            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
                ..Default::default()
            });
            let surface = instance
                .create_surface(wgpu::SurfaceTarget::Canvas(canvas))
                .map_err(js_err)?;
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::default(),
                    compatible_surface: Some(&surface),
                    force_fallback_adapter: false,
                })
                .await
                .map_err(js_err)?;
            log::info!("Using adapter: {:?}", adapter.get_info().name);

            let render_state = RenderState::new(surface, &adapter, viewport.size, viewport.size)
                .await
                .map_err(js_err)?;

            let mut inner = inner.borrow_mut();
            inner.engine.globe_mut().resize(height as f32);
            inner.render_state = Some(render_state);
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Draw the current frame; false until a canvas is attached
    pub fn render(&self) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Inner {
            engine,
            render_state,
        } = &mut *inner;
        let Some(rs) = render_state.as_mut() else {
            return false;
        };
        match rs.render(engine.globe().frame()) {
            Ok(()) => true,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (w, h) = rs.size;
                rs.resize(w, h);
                false
            }
            Err(e) => {
                log::warn!("Render failed: {:?}", e);
                false
            }
        }
    }

    /// Re-fit the canvas to a new window height
    pub fn resize(&self, window_height: f32) {
        let mut inner = self.inner.borrow_mut();
        inner.engine.globe_mut().resize(window_height);
        let size = inner.engine.globe().viewport().size;
        if let Some(rs) = inner.render_state.as_mut() {
            rs.resize(size, size);
        }
    }

    pub fn start(&self) -> bool {
        self.inner.borrow_mut().engine.start()
    }

    pub fn end(&self) -> bool {
        self.inner.borrow_mut().engine.end()
    }

    pub fn apply_operator(&self, op: char) -> bool {
        self.inner.borrow_mut().engine.apply_operator_char(op).is_ok()
    }

    /// `name` is "break" or "magnify"
    pub fn apply_effect(&self, name: &str) -> bool {
        let mut inner = self.inner.borrow_mut();
        match EffectKind::from_name(name) {
            Some(kind) => inner.engine.apply_effect(kind).is_ok(),
            None => {
                log::warn!("Unknown effect '{}'", name);
                false
            }
        }
    }

    pub fn answer_bonus_quiz(&self, index: usize) -> bool {
        self.inner.borrow_mut().engine.answer_bonus_quiz(index).unwrap_or(false)
    }

    /// Returns the new mode, "LAT" or "LON"
    pub fn toggle_mode(&self) -> String {
        self.inner.borrow_mut().engine.toggle_mode().as_str().to_owned()
    }

    pub fn drag(&self, dx: f32, dy: f32) {
        self.inner.borrow_mut().engine.globe_mut().drag(dx, dy);
    }

    pub fn set_rotation(&self, spin_deg: f32, tilt_deg: f32) {
        self.inner.borrow_mut().engine.set_rotation(spin_deg, tilt_deg);
    }

    /// Advance the game clock by `ms`
    pub fn tick(&self, ms: u32) {
        self.inner.borrow_mut().engine.advance_time(ms as u64);
    }

    /// Ask the built-in catalog for the city nearest the current lines
    pub fn lookup_nearest(&self) {
        self.inner
            .borrow_mut()
            .engine
            .lookup_nearest(&CatalogLookup::default());
    }

    /// Load GeoJSON country outlines once; later calls are ignored
    pub fn load_outlines(&self, geojson: &str) -> Result<bool, JsValue> {
        self.inner
            .borrow_mut()
            .engine
            .globe_mut()
            .load_outlines(geojson)
            .map_err(js_err)
    }

    pub fn set_settings(&self, json: &str) {
        let settings = Settings::from_json_or_default(json);
        settings.save();
        self.inner.borrow_mut().engine.globe_mut().set_settings(settings);
    }

    pub fn active_value(&self) -> f64 {
        self.inner.borrow().engine.active_accumulator_value()
    }

    pub fn accumulator_text(&self) -> String {
        self.inner.borrow().engine.accumulator_text()
    }

    pub fn is_session_active(&self) -> bool {
        self.inner.borrow().engine.is_session_active()
    }

    pub fn last_message(&self) -> String {
        self.inner.borrow().engine.last_message().to_owned()
    }

    pub fn status_text(&self) -> String {
        self.inner.borrow().engine.globe().status_text().to_owned()
    }

    pub fn session_clock(&self) -> String {
        self.inner.borrow().engine.session_clock_text()
    }

    pub fn round_label(&self) -> String {
        self.inner.borrow().engine.round_label()
    }

    pub fn target_text(&self) -> String {
        self.inner
            .borrow()
            .engine
            .current_city()
            .map(|c| c.coordinate_text())
            .unwrap_or_default()
    }

    pub fn total_score(&self) -> u32 {
        self.inner.borrow().engine.session().total_score
    }

    /// Platform numbers, bars, usage and quiz as one JSON snapshot
    pub fn hud_json(&self) -> String {
        let inner = self.inner.borrow();
        let engine = &inner.engine;
        let platform = engine.platform();
        let session = engine.session();
        let bar = |bar: CountdownBar| {
            let (from, to) = bar.band.css_colors();
            serde_json::json!({
                "percent": bar.percent,
                "band": bar.band,
                "opacity": bar.opacity,
                "colors": [from, to],
            })
        };
        let scores: Vec<_> = session
            .score_log
            .iter()
            .map(|entry| {
                serde_json::json!({
                    "city": entry.city,
                    "points": entry.points,
                    "band": ScoreBand::for_points(entry.points),
                })
            })
            .collect();
        let (facing_lat, facing_lon) = engine.globe().facing_coordinate();
        let hud = serde_json::json!({
            "current": platform.current(),
            "next": platform.next(),
            "break": platform.usage(EffectKind::Break),
            "magnify": platform.usage(EffectKind::Magnify),
            "break_cooldown_ms": engine.cooldown_remaining_ms(EffectKind::Break),
            "magnify_cooldown_ms": engine.cooldown_remaining_ms(EffectKind::Magnify),
            "countdown": bar(engine.countdown_bar()),
            "round": bar(engine.round_bar()),
            "mode": engine.mode(),
            "lat": session.lat,
            "lon": session.lon,
            "facing": [facing_lat, facing_lon],
            "live_score": session.live_score,
            "live_band": ScoreBand::for_points(session.live_score),
            "scores": scores,
            "quiz": session.quiz,
        });
        hud.to_string()
    }

    /// Events since the last call, as a JSON array
    pub fn drain_events_json(&self) -> String {
        let events = self.inner.borrow_mut().engine.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::warn!("Failed to serialize events: {}", e);
            "[]".to_owned()
        })
    }
}

/// Install the panic hook and console logger
#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Globe Hunt starting...");
}
