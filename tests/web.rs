// Browser tests; run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn start_game_builds_canvas_and_hud() {
    typing_maniac::start_game().unwrap();
    let doc = web_sys::window().unwrap().document().unwrap();
    for id in ["tm-canvas", "tm-score", "tm-level", "tm-meters", "tm-powers", "tm-input"] {
        assert!(doc.get_element_by_id(id).is_some(), "missing #{id}");
    }
    // banners are drawn on the canvas only
    assert!(doc.get_element_by_id("tm-banner").is_none());
    let snapshot: serde_json::Value = serde_json::from_str(&typing_maniac::game_snapshot()).unwrap();
    assert_eq!(snapshot["level"], 1);
}

#[wasm_bindgen_test]
fn bad_config_is_rejected() {
    assert!(typing_maniac::start_game_with_config("{ nope").is_err());
}
