//! WASM bindings for mosaic-core
//!
//! Provides a JavaScript-friendly API around [`Match`].

use wasm_bindgen::prelude::*;

use crate::{Match, MatchRecord, Move, Side, Variant};

fn to_js(err: crate::Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// WASM-friendly wrapper around Match
#[wasm_bindgen]
pub struct WasmMatch {
    inner: Match,
}

#[wasm_bindgen]
impl WasmMatch {
    /// Create a new match. `teams` selects the four-player variant.
    #[wasm_bindgen(constructor)]
    pub fn new(size: usize, teams: bool) -> Result<WasmMatch, JsValue> {
        let variant = if teams { Variant::Teams } else { Variant::HeadToHead };
        let inner = Match::new(variant, size).map_err(to_js)?;
        Ok(WasmMatch { inner })
    }

    /// Rebuild a match from `record()` output
    #[wasm_bindgen(js_name = fromRecord)]
    pub fn from_record(json: &str) -> Result<WasmMatch, JsValue> {
        let record: MatchRecord =
            serde_json::from_str(json).map_err(|e| to_js(crate::Error::Config(e)))?;
        let inner = Match::replay(&record).map_err(to_js)?;
        Ok(WasmMatch { inner })
    }

    pub fn size(&self) -> usize {
        self.inner.size()
    }

    #[wasm_bindgen(js_name = piecesPerPlayer)]
    pub fn pieces_per_player(&self) -> usize {
        self.inner.pieces_per_player()
    }

    /// Seat to move (0-based)
    #[wasm_bindgen(js_name = currentParticipant)]
    pub fn current_participant(&self) -> usize {
        self.inner.current_participant()
    }

    /// Board of one seat as MSB-first text, empty string for unknown seats
    pub fn board(&self, seat: usize) -> String {
        self.inner.board(seat).map(|b| b.to_text()).unwrap_or_default()
    }

    /// All seat boards as an array of texts
    pub fn boards(&self) -> Result<JsValue, JsValue> {
        let texts: Vec<String> = self.inner.boards().iter().map(|b| b.to_text()).collect();
        Ok(serde_wasm_bindgen::to_value(&texts)?)
    }

    #[wasm_bindgen(js_name = neutralBoard)]
    pub fn neutral_board(&self) -> String {
        self.inner.neutral_board().to_text()
    }

    /// Legal offsets, ascending
    #[wasm_bindgen(js_name = legalMoves)]
    pub fn legal_moves(&self) -> Vec<u16> {
        self.inner.legal_moves().into_iter().map(|m| m.0).collect()
    }

    /// Apply a move. Returns true if successful.
    #[wasm_bindgen(js_name = applyMove)]
    pub fn apply_move(&mut self, offset: u16) -> bool {
        self.inner.apply_move(Move(offset)).is_ok()
    }

    /// Returns false when there is nothing to undo
    pub fn undo(&mut self) -> bool {
        self.inner.undo().is_ok()
    }

    /// Returns false when there is nothing to redo
    pub fn redo(&mut self) -> bool {
        self.inner.redo().is_ok()
    }

    #[wasm_bindgen(js_name = isOver)]
    pub fn is_over(&self) -> bool {
        self.inner.is_over()
    }

    /// Returns 0 (none), 1 (first side) or 2 (second side)
    pub fn winner(&self) -> u8 {
        match self.inner.winner() {
            None => 0,
            Some(Side::First) => 1,
            Some(Side::Second) => 2,
        }
    }

    /// Move list as JSON: {"variant", "size", "moves"}
    pub fn record(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.record()).map_err(|e| to_js(crate::Error::Config(e)))
    }
}
