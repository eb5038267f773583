//! WebAssembly bindings for the layout engine.
//!
//! Everything crosses the boundary as JSON strings using the same camelCase
//! shapes as page files. Each export wraps a plain function returning
//! `Result<String, String>` so the logic can be tested natively.

use brickwork_layout::{
    adjust_mobile_layout, audit_layout, can_drop_on_layout, constraints_for_name,
    detect_collisions, find_free_position, pixel_to_grid, Breakpoint, Brick, Candidate,
    DropTarget, GridConfig, PixelPoint, ReflowConfig,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Grid cell nearest to a pixel position
#[wasm_bindgen(js_name = pixelToGrid)]
pub fn pixel_to_grid_js(x: f64, y: f64, grid_json: &str) -> Result<String, JsValue> {
    pixel_to_grid_json(x, y, grid_json).map_err(to_js)
}

/// Resolved constraints for a brick type at a breakpoint
#[wasm_bindgen(js_name = constraintsFor)]
pub fn constraints_for_js(brick_type: &str, breakpoint: &str) -> Result<String, JsValue> {
    constraints_for_json(brick_type, breakpoint).map_err(to_js)
}

/// Placement JSON, or `null` when the drop is rejected
#[wasm_bindgen(js_name = canDropOnLayout)]
pub fn can_drop_on_layout_js(
    bricks_json: &str,
    brick_type: &str,
    breakpoint: &str,
    target_json: &str,
    strict: bool,
) -> Result<String, JsValue> {
    can_drop_json(bricks_json, brick_type, breakpoint, target_json, strict).map_err(to_js)
}

#[wasm_bindgen(js_name = findFreePosition)]
pub fn find_free_position_js(
    bricks_json: &str,
    brick_type: &str,
    breakpoint: &str,
    target_json: &str,
) -> Result<String, JsValue> {
    find_free_json(bricks_json, brick_type, breakpoint, target_json).map_err(to_js)
}

/// Ids of the bricks a candidate rectangle collides with
#[wasm_bindgen(js_name = detectCollisions)]
pub fn detect_collisions_js(
    bricks_json: &str,
    breakpoint: &str,
    candidate_json: &str,
) -> Result<String, JsValue> {
    collisions_json(bricks_json, breakpoint, candidate_json).map_err(to_js)
}

#[wasm_bindgen(js_name = adjustMobileLayout)]
pub fn adjust_mobile_layout_js(bricks_json: &str, reflow_json: &str) -> Result<String, JsValue> {
    reflow_json_bricks(bricks_json, reflow_json).map_err(to_js)
}

#[wasm_bindgen(js_name = auditLayout)]
pub fn audit_layout_js(bricks_json: &str) -> Result<String, JsValue> {
    audit_json(bricks_json).map_err(to_js)
}

fn to_js(message: String) -> JsValue {
    JsValue::from_str(&message)
}

fn from_json<T: DeserializeOwned>(what: &str, json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {what}: {e}"))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {e}"))
}

fn breakpoint(name: &str) -> Result<Breakpoint, String> {
    name.parse().map_err(|e| format!("{e}"))
}

pub fn pixel_to_grid_json(x: f64, y: f64, grid_json: &str) -> Result<String, String> {
    let grid: GridConfig = from_json("grid", grid_json)?;
    to_json(&pixel_to_grid(PixelPoint::new(x, y), PixelPoint::ORIGIN, &grid))
}

pub fn constraints_for_json(brick_type: &str, breakpoint_name: &str) -> Result<String, String> {
    let constraints =
        constraints_for_name(brick_type, breakpoint(breakpoint_name)?).map_err(|e| format!("{e}"))?;
    to_json(&constraints)
}

pub fn can_drop_json(
    bricks_json: &str,
    brick_type: &str,
    breakpoint_name: &str,
    target_json: &str,
    strict: bool,
) -> Result<String, String> {
    let bricks: Vec<Brick> = from_json("bricks", bricks_json)?;
    let target: DropTarget = from_json("drop target", target_json)?;
    let breakpoint = breakpoint(breakpoint_name)?;
    let constraints = constraints_for_name(brick_type, breakpoint).map_err(|e| format!("{e}"))?;

    to_json(&can_drop_on_layout(&bricks, breakpoint, &target, &constraints, strict))
}

pub fn find_free_json(
    bricks_json: &str,
    brick_type: &str,
    breakpoint_name: &str,
    target_json: &str,
) -> Result<String, String> {
    let bricks: Vec<Brick> = from_json("bricks", bricks_json)?;
    let target: DropTarget = from_json("drop target", target_json)?;
    let breakpoint = breakpoint(breakpoint_name)?;
    let constraints = constraints_for_name(brick_type, breakpoint).map_err(|e| format!("{e}"))?;

    to_json(&find_free_position(&bricks, breakpoint, &target, &constraints))
}

pub fn collisions_json(
    bricks_json: &str,
    breakpoint_name: &str,
    candidate_json: &str,
) -> Result<String, String> {
    let bricks: Vec<Brick> = from_json("bricks", bricks_json)?;
    let candidate: Candidate = from_json("candidate", candidate_json)?;

    let ids: Vec<_> = detect_collisions(&candidate, &bricks, breakpoint(breakpoint_name)?)
        .into_iter()
        .map(|b| &b.id)
        .collect();
    to_json(&ids)
}

pub fn reflow_json_bricks(bricks_json: &str, reflow_json: &str) -> Result<String, String> {
    let bricks: Vec<Brick> = from_json("bricks", bricks_json)?;
    let config: ReflowConfig = from_json("reflow config", reflow_json)?;
    to_json(&adjust_mobile_layout(&bricks, &config))
}

pub fn audit_json(bricks_json: &str) -> Result<String, String> {
    let bricks: Vec<Brick> = from_json("bricks", bricks_json)?;
    to_json(&audit_layout(&bricks))
}
