//! `HTMLAudioElement` implementation of [`MediaElement`]

use crate::{Generation, MediaElement, PlayTicket, ReadyState};
use js_sys::{Object, Promise, Reflect};
use std::time::Duration;
use wasm_bindgen::prelude::*;
use web_sys::HtmlAudioElement;

/// A `play()` call whose promise has not been handed to JavaScript yet
struct PendingPlay {
    ticket: PlayTicket,
    promise: Promise,
}

/// Media element backed by the page's `<audio>` tag
///
/// `play()` promises are parked here until the JS glue collects them with
/// `takePendingPlays` and reports the outcome through `playSettled`.
pub struct HtmlAudioMedia {
    element: HtmlAudioElement,
    generation: Generation,
    pending: Vec<PendingPlay>,
}

impl HtmlAudioMedia {
    pub fn new(element: HtmlAudioElement) -> Self {
        element.set_preload("auto");
        Self {
            element,
            generation: Generation::INITIAL,
            pending: Vec::new(),
        }
    }

    pub fn element(&self) -> &HtmlAudioElement {
        &self.element
    }

    /// Generation of the source currently assigned
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Hand parked play promises to JS as `{ generation, seq, promise }`
    pub fn take_pending(&mut self) -> Result<js_sys::Array, JsValue> {
        let out = js_sys::Array::new();
        for play in self.pending.drain(..) {
            let entry = Object::new();
            Reflect::set(
                &entry,
                &"generation".into(),
                &JsValue::from_f64(play.ticket.generation.value() as f64),
            )?;
            Reflect::set(
                &entry,
                &"seq".into(),
                &JsValue::from_f64(play.ticket.seq as f64),
            )?;
            Reflect::set(&entry, &"promise".into(), &play.promise)?;
            out.push(&entry);
        }
        Ok(out)
    }
}

impl MediaElement for HtmlAudioMedia {
    fn load_source(&mut self, url: &str, generation: Generation) {
        self.generation = generation;
        self.element.set_src(url);
        self.element.load();
    }

    fn play(&mut self, ticket: PlayTicket) {
        // A synchronous throw is reported like a rejected promise
        let promise = self
            .element
            .play()
            .unwrap_or_else(|err| Promise::reject(&err));
        self.pending.push(PendingPlay { ticket, promise });
    }

    fn pause(&mut self) {
        if let Err(err) = self.element.pause() {
            web_sys::console::warn_2(&"audio pause failed".into(), &err);
        }
    }

    fn current_time(&self) -> Duration {
        let secs = self.element.current_time();
        if secs.is_finite() && secs > 0.0 {
            Duration::from_secs_f64(secs)
        } else {
            Duration::ZERO
        }
    }

    fn set_current_time(&mut self, position: Duration) {
        self.element.set_current_time(position.as_secs_f64());
    }

    fn set_volume(&mut self, volume: f32) {
        self.element.set_volume(f64::from(volume.clamp(0.0, 1.0)));
    }

    fn ready_state(&self) -> ReadyState {
        ReadyState::from_dom(self.element.ready_state())
    }

    fn current_source(&self) -> Option<String> {
        let src = self.element.src();
        (!src.is_empty()).then_some(src)
    }
}
