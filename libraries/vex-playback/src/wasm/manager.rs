//! WASM-compatible PlaybackSession wrapper

use super::types::HtmlAudioMedia;
use crate::{
    MediaEvent, PlayError, PlayTicket, PlaybackError, PlaybackSession, SessionConfig, Timer,
};
use js_sys::Function;
use vex_core::{Catalog, PublicUrlResolver};
use wasm_bindgen::prelude::*;
use web_sys::HtmlAudioElement;

/// WASM-compatible playback session
///
/// JavaScript glue contract, after every call into the session:
/// - `takeTimers()` and `setTimeout(() => session.fireTimer(t.timer), t.delayMs)`
/// - `takePendingPlays()` and settle each promise with `playSettled`
/// - element listeners call `handleMediaEvent(session.currentGeneration, e.type)`
#[wasm_bindgen]
pub struct WasmPlaybackSession {
    inner: PlaybackSession<HtmlAudioMedia>,

    // Event callbacks
    on_change: Option<Function>,
    on_event: Option<Function>,
}

#[wasm_bindgen]
impl WasmPlaybackSession {
    /// Create a session over the built-in catalog
    ///
    /// `config` may be `undefined` for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        element: HtmlAudioElement,
        storage_url: String,
        bucket: String,
        config: JsValue,
    ) -> Result<WasmPlaybackSession, JsValue> {
        // Enable panic hooks for better error messages in console
        console_error_panic_hook::set_once();

        let config: SessionConfig = if config.is_undefined() || config.is_null() {
            SessionConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };

        let inner = PlaybackSession::new(
            Catalog::builtin(),
            PublicUrlResolver::new(storage_url, bucket),
            HtmlAudioMedia::new(element),
            config,
        )
        .map_err(to_js_error)?;

        Ok(Self {
            inner,
            on_change: None,
            on_event: None,
        })
    }

    // ===== Lifecycle & Playback Control =====

    pub fn start(&mut self) {
        self.inner.start();
        self.notify();
    }

    #[wasm_bindgen(js_name = togglePlay)]
    pub fn toggle_play(&mut self) {
        self.inner.toggle_play();
        self.notify();
    }

    #[wasm_bindgen(js_name = nextTrack)]
    pub fn next_track(&mut self) {
        self.inner.next_track();
        self.notify();
    }

    #[wasm_bindgen(js_name = prevTrack)]
    pub fn prev_track(&mut self) {
        self.inner.prev_track();
        self.notify();
    }

    #[wasm_bindgen(js_name = selectTrack)]
    pub fn select_track(&mut self, index: usize) -> Result<(), JsValue> {
        self.inner.select_track(index).map_err(to_js_error)?;
        self.notify();
        Ok(())
    }

    // ===== Host Input =====

    /// Generation to tag element events with
    #[wasm_bindgen(getter, js_name = currentGeneration)]
    pub fn current_generation(&self) -> f64 {
        self.inner.media().generation().value() as f64
    }

    /// Forward a DOM media event by name; unknown names are ignored
    #[wasm_bindgen(js_name = handleMediaEvent)]
    pub fn handle_media_event(&mut self, generation: f64, name: &str) {
        let Some(event) = MediaEvent::from_name(name) else {
            return;
        };
        self.inner
            .handle_media_event(crate::Generation::new(generation as u64), event);
        self.notify();
    }

    /// Play promises issued since the last call, as `{ generation, seq, promise }`
    #[wasm_bindgen(js_name = takePendingPlays)]
    pub fn take_pending_plays(&mut self) -> Result<js_sys::Array, JsValue> {
        self.inner.media_mut().take_pending()
    }

    /// Report a settled play promise; pass the DOMException name on rejection
    #[wasm_bindgen(js_name = playSettled)]
    pub fn play_settled(
        &mut self,
        generation: f64,
        seq: f64,
        error_name: Option<String>,
        error_message: Option<String>,
    ) {
        let ticket = PlayTicket::from_parts(generation as u64, seq as u64);
        let result = match error_name {
            None => Ok(()),
            Some(name) => Err(PlayError::from_dom_exception(
                &name,
                error_message.as_deref().unwrap_or_default(),
            )),
        };
        self.inner.play_settled(ticket, result);
        self.notify();
    }

    /// Timer requests as `[{ timer, delayMs }]`
    #[wasm_bindgen(js_name = takeTimers)]
    pub fn take_timers(&mut self) -> Result<JsValue, JsValue> {
        let timers = self.inner.drain_timers();
        Ok(serde_wasm_bindgen::to_value(&timers)?)
    }

    /// Fire a timer previously returned by `takeTimers`
    #[wasm_bindgen(js_name = fireTimer)]
    pub fn fire_timer(&mut self, timer: JsValue) -> Result<(), JsValue> {
        let timer: Timer = serde_wasm_bindgen::from_value(timer)?;
        self.inner.fire_timer(timer);
        self.notify();
        Ok(())
    }

    // ===== Settings & UI =====

    #[wasm_bindgen(js_name = setAutoplay)]
    pub fn set_autoplay(&mut self, enabled: bool) {
        self.inner.set_autoplay(enabled);
        self.notify();
    }

    #[wasm_bindgen(js_name = togglePicker)]
    pub fn toggle_picker(&mut self) {
        self.inner.toggle_picker();
        self.notify();
    }

    pub fn show(&mut self) {
        self.inner.show();
        self.notify();
    }

    pub fn hide(&mut self) {
        self.inner.hide();
        self.notify();
    }

    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&mut self, level: u8) {
        self.inner.set_volume(level);
        self.notify();
    }

    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&mut self) {
        self.inner.toggle_mute();
        self.notify();
    }

    // ===== State Queries =====

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.snapshot())?)
    }

    /// Catalog tracks for the picker
    pub fn tracks(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(self.inner.catalog().tracks())?)
    }

    #[wasm_bindgen(getter, js_name = statusLabel)]
    pub fn status_label(&self) -> String {
        self.inner.snapshot().status_label().to_string()
    }

    #[wasm_bindgen(getter, js_name = positionLabel)]
    pub fn position_label(&self) -> String {
        self.inner.snapshot().position_label()
    }

    // ===== Event Callbacks =====

    /// Called with a fresh snapshot after every state change
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&mut self, callback: Function) {
        self.on_change = Some(callback);
    }

    /// Called once per session event
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&mut self, callback: Function) {
        self.on_event = Some(callback);
    }
}

impl WasmPlaybackSession {
    fn notify(&mut self) {
        let events = self.inner.drain_events();
        if events.is_empty() {
            return;
        }

        if let Some(callback) = &self.on_event {
            for event in &events {
                if let Ok(value) = serde_wasm_bindgen::to_value(event) {
                    let _ = callback.call1(&JsValue::NULL, &value);
                }
            }
        }

        if let Some(callback) = &self.on_change {
            if let Ok(snapshot) = serde_wasm_bindgen::to_value(&self.inner.snapshot()) {
                let _ = callback.call1(&JsValue::NULL, &snapshot);
            }
        }
    }
}

fn to_js_error(err: PlaybackError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
