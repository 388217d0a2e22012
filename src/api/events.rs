//! Live Event Stream
//!
//! Subscription to the server-sent item events. The browser's `EventSource`
//! reconnects on its own after transport errors; dropping the subscription
//! closes the stream.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{EventSource, MessageEvent};

use crate::cache::{decode_events, ItemEvent};
use crate::error::{ClientError, ClientResult};

pub struct EventSubscription {
    source: EventSource,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_error: Closure<dyn FnMut(web_sys::Event)>,
}

impl EventSubscription {
    /// Opens the stream at `url`, handing each decoded event to `on_event`
    pub fn open(url: &str, mut on_event: impl FnMut(ItemEvent) + 'static) -> ClientResult<Self> {
        let source = EventSource::new(url)
            .map_err(|err| ClientError::Subscription(format!("{:?}", err)))?;

        let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |message: MessageEvent| {
            let Some(data) = message.data().as_string() else {
                log::debug!("[EVENTS] ignored non-text message");
                return;
            };
            for event in decode_events(&data) {
                on_event(event);
            }
        });
        source.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

        let on_error = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
            log::warn!("[EVENTS] stream interrupted, waiting for reconnect");
        });
        source.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        log::info!("[EVENTS] subscribed to {}", url);
        Ok(Self {
            source,
            _on_message: on_message,
            _on_error: on_error,
        })
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.source.set_onmessage(None);
        self.source.set_onerror(None);
        self.source.close();
        log::info!("[EVENTS] subscription closed");
    }
}
