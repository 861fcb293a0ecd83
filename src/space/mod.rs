//! Browser host for the shooter.
//!
//! `start_space_game()` mounts a canvas, builds a [`World`] and drives it from a
//! single `requestAnimationFrame` callback: every frame steps the simulation and
//! paints it. When the ship runs out of energy the last frame is painted with
//! the game-over overlay and the callback stops rescheduling itself; a click on
//! the "play again" button restarts the round and the loop.
//!
//! Pointer input (mouse or touch) drags the ship. Listener closures are owned
//! by the mounted state and detached when it is dropped.

pub mod entities;
pub mod render;
pub mod weapons;
pub mod world;

use std::cell::{Cell, RefCell};

use tracing::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, EventTarget, HtmlCanvasElement, MouseEvent, window};

use crate::config::ShooterConfig;
use crate::error::GameError;
use world::{FrameEvents, World};

pub const DEFAULT_CANVAS_ID: &str = "space-game";
const FALLBACK_WIDTH: u32 = 800;
const FALLBACK_HEIGHT: u32 = 600;

/// Listener attached to a DOM target; detaches itself on drop.
struct EventBinding {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl Drop for EventBinding {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

/// Runtime state of the mounted game.
struct SpaceState {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    world: World,
    /// Timestamp of the last painted frame (ms).
    last_frame_ms: f64,
    _bindings: Vec<EventBinding>,
}

thread_local! {
    static SPACE_STATE: RefCell<Option<SpaceState>> = const { RefCell::new(None) };
    static FRAME_CALLBACK: RefCell<Option<Closure<dyn FnMut(f64)>>> = const { RefCell::new(None) };
    static FRAME_PENDING: Cell<bool> = const { Cell::new(false) };
}

/// Mount the shooter on the canvas with id `canvas_id` (created when absent).
/// `config_json` may override any tuning value; see `ShooterConfig`.
#[wasm_bindgen]
pub fn start_space_game(canvas_id: Option<String>, config_json: Option<String>) -> Result<(), JsValue> {
    let id = canvas_id.as_deref().unwrap_or(DEFAULT_CANVAS_ID);
    mount(id, config_json.as_deref()).map_err(|err| {
        warn!(%err, "could not start space game");
        JsValue::from(err)
    })
}

/// Stop the loop and detach all listeners. The canvas stays in the page.
#[wasm_bindgen]
pub fn stop_space_game() {
    let dropped = SPACE_STATE.with(|cell| cell.borrow_mut().take());
    if dropped.is_some() {
        info!("space game stopped");
    }
}

/// Run `f` against the mounted world, if a game is mounted.
pub fn with_space_world<R>(f: impl FnOnce(&mut World) -> R) -> Option<R> {
    with_world(|st| f(&mut st.world))
}

fn mount(canvas_id: &str, config_json: Option<&str>) -> Result<(), GameError> {
    let config = match config_json {
        Some(json) => ShooterConfig::from_json(json)?,
        None => ShooterConfig::default(),
    };

    let win = window().ok_or(GameError::NoWindow)?;
    let doc = win.document().ok_or(GameError::NoDocument)?;

    let canvas: HtmlCanvasElement = match doc.get_element_by_id(canvas_id) {
        Some(el) => el
            .dyn_into()
            .map_err(|_| GameError::NotACanvas(canvas_id.to_string()))?,
        None => {
            let c: HtmlCanvasElement = doc
                .create_element("canvas")?
                .dyn_into()
                .map_err(|_| GameError::NotACanvas(canvas_id.to_string()))?;
            c.set_id(canvas_id);
            // Fill the viewport and keep touch drags from scrolling the page.
            c.set_attribute("style", "display:block; width:100vw; height:100vh; touch-action:none;")?;
            doc.body().ok_or(GameError::NoBody)?.append_child(&c)?;
            c
        }
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or(GameError::NoContext)?
        .dyn_into()
        .map_err(|_| GameError::NoContext)?;

    let (w, h) = fit_canvas(&canvas);
    let world = World::new(config, w, h, rand::random());
    info!(width = w, height = h, "space game started");

    // Drop any previous mount first so its listeners detach before new ones attach.
    SPACE_STATE.with(|cell| cell.borrow_mut().take());
    let bindings = bind_listeners(win.as_ref(), &canvas)?;
    SPACE_STATE.with(|cell| {
        cell.replace(Some(SpaceState {
            canvas,
            ctx,
            world,
            last_frame_ms: 0.0,
            _bindings: bindings,
        }))
    });
    start_loop();
    Ok(())
}

/// Match the drawing buffer to the element's layout size.
fn fit_canvas(canvas: &HtmlCanvasElement) -> (f64, f64) {
    let cw = canvas.client_width();
    let ch = canvas.client_height();
    let (w, h) = if cw > 0 && ch > 0 {
        (cw as u32, ch as u32)
    } else {
        (FALLBACK_WIDTH, FALLBACK_HEIGHT)
    };
    canvas.set_width(w);
    canvas.set_height(h);
    (w as f64, h as f64)
}

/// Pointer position relative to the canvas' top-left corner.
fn canvas_point(canvas: &HtmlCanvasElement, evt: &web_sys::Event) -> Option<(f64, f64)> {
    let mouse = evt.dyn_ref::<MouseEvent>()?;
    let rect = canvas.get_bounding_client_rect();
    Some((
        mouse.client_x() as f64 - rect.left(),
        mouse.client_y() as f64 - rect.top(),
    ))
}

fn with_world<R>(f: impl FnOnce(&mut SpaceState) -> R) -> Option<R> {
    SPACE_STATE.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn bind(
    target: &EventTarget,
    kind: &'static str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<EventBinding, GameError> {
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    Ok(EventBinding { target: target.clone(), kind, closure })
}

fn bind_listeners(win: &EventTarget, canvas: &HtmlCanvasElement) -> Result<Vec<EventBinding>, GameError> {
    let target: &EventTarget = canvas.as_ref();
    let mut bindings = Vec::with_capacity(6);

    bindings.push(bind(win, "resize", |_evt| {
        with_world(|st| {
            let (w, h) = fit_canvas(&st.canvas);
            st.world.resize(w, h);
            debug!(width = w, height = h, "canvas resized");
            // Resizing clears the canvas; a stopped loop will not repaint it.
            if st.world.is_game_over() {
                repaint(st);
            }
        });
    })?);

    let c = canvas.clone();
    bindings.push(bind(target, "pointerdown", move |evt| {
        if let Some((x, y)) = canvas_point(&c, &evt) {
            with_world(|st| st.world.pointer_down(x, y));
        }
    })?);

    let c = canvas.clone();
    bindings.push(bind(target, "pointermove", move |evt| {
        if let Some((x, y)) = canvas_point(&c, &evt) {
            with_world(|st| st.world.pointer_move(x, y));
        }
    })?);

    for kind in ["pointerup", "pointercancel"] {
        bindings.push(bind(target, kind, |_evt| {
            with_world(|st| st.world.pointer_up());
        })?);
    }

    let c = canvas.clone();
    bindings.push(bind(target, "click", move |evt| {
        let Some((x, y)) = canvas_point(&c, &evt) else {
            return;
        };
        let restarted = with_world(|st| {
            if st.world.is_game_over() && st.world.hits_restart_button(x, y) {
                st.world.restart();
                true
            } else {
                false
            }
        })
        .unwrap_or(false);
        if restarted {
            info!("space game restarted");
            start_loop();
        }
    })?);

    Ok(bindings)
}

fn start_loop() {
    if FRAME_PENDING.with(Cell::get) {
        return;
    }
    FRAME_CALLBACK.with(|cb| {
        if cb.borrow().is_none() {
            *cb.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(on_frame));
        }
    });
    request_frame();
}

fn request_frame() {
    let Some(w) = window() else {
        return;
    };
    FRAME_CALLBACK.with(|cb| {
        if let Some(closure) = cb.borrow().as_ref() {
            match w.request_animation_frame(closure.as_ref().unchecked_ref()) {
                Ok(_) => FRAME_PENDING.with(|p| p.set(true)),
                Err(err) => warn!(?err, "requestAnimationFrame failed"),
            }
        }
    });
}

fn on_frame(ts: f64) {
    FRAME_PENDING.with(|p| p.set(false));
    let keep_running = with_world(|st| space_tick(st, ts)).unwrap_or(false);
    if keep_running {
        request_frame();
    }
}

// --- Tick -------------------------------------------------------------------

/// One frame: simulate, paint, report whether the loop should continue.
fn space_tick(state: &mut SpaceState, now: f64) -> bool {
    state.last_frame_ms = now;
    let events = state.world.step(now);

    if let Some(level) = events.power_level_changed {
        debug!(level, "power level changed");
    }
    if events.hits_taken > 0 {
        debug!(energy = state.world.energy, "ship damaged");
    }
    if events.game_over {
        info!(score = state.world.score, "game over");
    }

    if let Err(err) = render::draw_frame(&state.ctx, &state.world, &events, now) {
        warn!(?err, "frame render failed");
    }

    !state.world.is_game_over()
}

/// Paint the current world without stepping it.
fn repaint(state: &SpaceState) {
    let events = FrameEvents::default();
    if let Err(err) = render::draw_frame(&state.ctx, &state.world, &events, state.last_frame_ms) {
        warn!(?err, "repaint failed");
    }
}
