// Browser tests; run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use navinha::space::entities::{Laser, Shooter};
use navinha::space::with_space_world;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{JsFuture, js_sys};
use wasm_bindgen_test::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, MouseEventInit};

wasm_bindgen_test_configure!(run_in_browser);

const QUIET: &str = r#"{ "enemy_spawn_chance": 0, "power_up_spawn_chance": 0, "energy_cell_spawn_chance": 0 }"#;

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

fn canvas(id: &str) -> HtmlCanvasElement {
    let doc = web_sys::window().unwrap().document().unwrap();
    doc.get_element_by_id(id).expect("canvas created").dyn_into().unwrap()
}

/// Mount a quiet game and let one enemy shot drain the ship.
async fn mount_lost_round(id: &str) -> HtmlCanvasElement {
    navinha::start_space_game(Some(id.into()), Some(QUIET.into())).unwrap();
    with_space_world(|w| {
        w.energy = w.config.damage_per_hit;
        let (x, y) = (w.ship.x, w.ship.y);
        w.lasers.push(Laser { x, y, width: 12.0, height: 24.0, vx: 0.0, vy: 0.0, owner: Shooter::Enemy });
    })
    .unwrap();
    sleep(200).await;
    assert_eq!(with_space_world(|w| w.is_game_over()), Some(true));
    canvas(id)
}

#[wasm_bindgen_test]
fn mounts_canvas_and_stops_cleanly() {
    navinha::start_space_game(Some("test-canvas".into()), None).unwrap();

    let canvas = canvas("test-canvas");
    assert!(canvas.width() > 0 && canvas.height() > 0);

    navinha::stop_space_game();
    assert!(with_space_world(|_| ()).is_none());
}

#[wasm_bindgen_test]
fn rejects_bad_config() {
    let err = navinha::start_space_game(
        Some("test-canvas-bad".into()),
        Some(r#"{ "enemy_spawn_chance": 2.0 }"#.into()),
    )
    .unwrap_err();
    let msg = err.as_string().unwrap();
    assert!(msg.contains("enemy_spawn_chance"), "{msg}");
}

#[wasm_bindgen_test]
fn refuses_non_canvas_element() {
    let doc = web_sys::window().unwrap().document().unwrap();
    let div = doc.create_element("div").unwrap();
    div.set_id("not-a-canvas");
    doc.body().unwrap().append_child(&div).unwrap();

    let err = navinha::start_space_game(Some("not-a-canvas".into()), None).unwrap_err();
    assert!(err.as_string().unwrap().contains("not a canvas"));
}

#[wasm_bindgen_test]
async fn play_again_click_restarts_the_loop() {
    let canvas = mount_lost_round("test-canvas-restart").await;

    let b = with_space_world(|w| w.restart_button()).unwrap();
    let rect = canvas.get_bounding_client_rect();
    let init = MouseEventInit::new();
    init.set_bubbles(true);
    init.set_client_x((rect.left() + b.x + b.w / 2.0) as i32);
    init.set_client_y((rect.top() + b.y + b.h / 2.0) as i32);
    let click = MouseEvent::new_with_mouse_event_init_dict("click", &init).unwrap();
    canvas.dispatch_event(&click).unwrap();

    let (over, energy) = with_space_world(|w| (w.is_game_over(), w.energy)).unwrap();
    assert!(!over);
    assert_eq!(energy, 100);

    // restart cleared every laser; new ones mean the loop is stepping again
    sleep(500).await;
    assert_eq!(with_space_world(|w| w.lasers.is_empty()), Some(false));

    navinha::stop_space_game();
}

#[wasm_bindgen_test]
async fn resize_after_game_over_keeps_overlay_painted() {
    let canvas = mount_lost_round("test-canvas-resize").await;

    let resize = web_sys::Event::new("resize").unwrap();
    web_sys::window().unwrap().dispatch_event(&resize).unwrap();

    let ctx: CanvasRenderingContext2d = canvas.get_context("2d").unwrap().unwrap().dyn_into().unwrap();
    let pixel = ctx.get_image_data(1.0, 1.0, 1.0, 1.0).unwrap().data();
    assert_eq!(pixel.0[3], 255, "canvas left blank after resize");

    navinha::stop_space_game();
}
