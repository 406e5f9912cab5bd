//! Platform geolocation behind [`Geolocator`].
//!
//! The browser API is callback based; both callbacks share a one-shot sender
//! and whichever fires first resolves the request.

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use crate::net::location::{GeoError, GeolocationOptions, Geolocator};
use crate::state::location::Coords;

type Reply = Rc<RefCell<Option<oneshot::Sender<Result<Coords, GeoError>>>>>;

fn resolve(reply: &Reply, result: Result<Coords, GeoError>) {
    if let Some(tx) = reply.borrow_mut().take() {
        let _ = tx.send(result);
    }
}

pub struct BrowserGeolocator;

#[async_trait::async_trait(?Send)]
impl Geolocator for BrowserGeolocator {
    async fn current_position(&self, options: &GeolocationOptions) -> Result<Coords, GeoError> {
        let geolocation = web_sys::window()
            .and_then(|w| w.navigator().geolocation().ok())
            .ok_or(GeoError::Unsupported)?;

        let (tx, rx) = oneshot::channel();
        let reply: Reply = Rc::new(RefCell::new(Some(tx)));

        let on_success = {
            let reply = Rc::clone(&reply);
            Closure::once_into_js(move |position: web_sys::Position| {
                let coords = position.coords();
                resolve(&reply, Ok(Coords { lat: coords.latitude(), lng: coords.longitude() }));
            })
        };
        let on_error = {
            let reply = Rc::clone(&reply);
            Closure::once_into_js(move |error: web_sys::PositionError| {
                resolve(&reply, Err(GeoError::from_code(error.code())));
            })
        };

        let position_options = web_sys::PositionOptions::new();
        position_options.set_enable_high_accuracy(options.high_accuracy);
        position_options.set_timeout(options.timeout_ms);
        position_options.set_maximum_age(options.maximum_age_ms);

        geolocation
            .get_current_position_with_error_callback_and_options(
                on_success.unchecked_ref(),
                Some(on_error.unchecked_ref()),
                &position_options,
            )
            .map_err(|_| GeoError::Unsupported)?;

        // A dropped sender means neither callback will ever run.
        rx.await.unwrap_or(Err(GeoError::Unavailable))
    }
}
