use wasm_bindgen::prelude::wasm_bindgen;

use crate::puzzle::solve_document;

/// Solve a JSON puzzle document and return the JSON [`Report`](crate::puzzle::Report).
#[wasm_bindgen(js_name = solvePuzzle)]
pub fn solve_puzzle(document: &str) -> Result<String, js_sys::Error> {
    let report = solve_document(document).map_err(|err| js_sys::Error::new(&err.to_string()))?;
    serde_json::to_string(&report).map_err(|err| js_sys::Error::new(&err.to_string()))
}
