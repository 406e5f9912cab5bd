//! `order-history` behaviour: the signed-in user's orders, a details modal,
//! and star rating for delivered orders.
//!
//! DESIGN
//! ======
//! Loaded orders and the rating selection live in [`HistoryState`], shared by
//! the click handlers bound during `init`. A successful rating updates the
//! cached order and re-renders the list, so the card shows "Rated" without a
//! refetch.

#[cfg(test)]
#[path = "order_history_test.rs"]
mod order_history_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::json;

use super::{PageBehavior, PageContext, PageError};
use crate::host::Host;
use crate::net::store::{Direction, Query, collections};
use crate::net::types::{Order, OrderItem, format_amount};
use crate::router::Router;
use crate::util::html::escape;

const LIST_ID: &str = "order-history-list";
const LOADER_ID: &str = "order-history-loader";
const EMPTY_ID: &str = "no-orders-message";

const MODAL_ID: &str = "order-details-modal";
const CLOSE_ID: &str = "modal-close-btn";
const BACKDROP_ID: &str = "modal-backdrop";
const MODAL_ORDER_ID: &str = "modal-order-id";
const MODAL_TOTAL_ID: &str = "modal-order-total";
const MODAL_STATUS_ID: &str = "modal-order-status";
const MODAL_DATE_ID: &str = "modal-order-delivery";
const MODAL_ITEMS_ID: &str = "modal-order-items";
const RATING_BOX_ID: &str = "modal-rating-box";
const STARS_ID: &str = "star-rating-input";
const SUBMIT_RATING_ID: &str = "submit-rating-btn";

const SUBMIT_RATING_LABEL: &str = "Submit Rating";

pub const SIGNED_OUT_TEXT: &str = "Please log in to see your orders.";
pub const NO_ORDERS_TEXT: &str = "You haven't placed any final orders yet.";
pub const DETAILS_UNAVAILABLE_TEXT: &str = "Error: Could not load order details view.";
pub const SELECT_RATING_TEXT: &str = "Please select a star rating (1-5).";
pub const RATING_THANKS_TEXT: &str = "Thank you for your rating!";
pub const RATING_FAILED_TEXT: &str = "Failed to submit rating. Please try again.";

pub const MAX_RATING: u8 = 5;

/// Text colour class for an order status.
pub fn status_class(status: Option<&str>) -> &'static str {
    match status {
        Some("DELIVERED" | "READY") => "text-green-600",
        Some("CANCELLED") => "text-red-600",
        Some("PICKUP_DONE") => "text-blue-600",
        Some("PROCESSING") => "text-purple-600",
        _ => "text-yellow-600",
    }
}

fn rated_badge(rating: u8) -> String {
    format!(r#"<p class="text-xs text-slate-500 mt-2">Rated <i class="fas fa-star text-yellow-400"></i> {rating}</p>"#)
}

fn rating_html(order: &Order) -> String {
    if order.can_rate() {
        r#"<button class="text-xs font-semibold text-white bg-primary-blue px-2 py-1 rounded-md mt-2">Rate Now</button>"#
            .to_owned()
    } else if order.rating_given {
        rated_badge(order.rating.unwrap_or_default())
    } else {
        String::new()
    }
}

/// Clickable order card; the order id travels in `data-key`.
pub fn order_card(order: &Order) -> String {
    let date = order
        .created_at
        .as_ref()
        .and_then(|t| t.date_label())
        .unwrap_or_else(|| "Pending Date".to_owned());
    format!(
        r#"<div class="bg-white p-4 rounded-xl shadow-sm cursor-pointer hover:shadow-md transition" data-key="{id}">
  <div class="flex justify-between items-center mb-1">
    <span class="font-semibold text-slate-800">Order ID: #{short_id}</span>
    <span class="font-bold text-sm {class}">{status}</span>
  </div>
  <p class="text-sm text-slate-600 mb-2">Total: <span class="font-semibold">₹{total}</span></p>
  <p class="text-xs text-slate-400">Placed on: {date}</p>
  <div class="mt-2">{rating}</div>
</div>"#,
        id = escape(&order.id),
        short_id = escape(order.short_id()),
        class = status_class(order.status.as_deref()),
        status = escape(order.status_label()),
        total = format_amount(order.total.unwrap_or_default()),
        rating = rating_html(order),
    )
}

fn item_row(item: &OrderItem) -> String {
    format!(
        r#"<li class="flex justify-between items-center border-b border-slate-100 pb-2"><span><span class="font-semibold text-slate-700">{}</span><span class="text-slate-500"> (Qty: {})</span></span><span class="font-medium text-slate-800">₹{:.2}</span></li>"#,
        escape(&item.name),
        item.quantity,
        item.line_total()
    )
}

/// Five stars, the first `selected` highlighted; each carries its value.
pub fn star_markup(selected: u8) -> String {
    (1..=MAX_RATING)
        .map(|value| {
            let colour = if value <= selected { "text-yellow-400" } else { "text-slate-300" };
            format!(r#"<i class="fas fa-star cursor-pointer {colour}" data-key="{value}"></i>"#)
        })
        .collect()
}

/// Parse a clicked star's value; anything outside 1..=5 is ignored.
pub fn parse_rating(key: &str) -> Option<u8> {
    key.parse().ok().filter(|r| (1..=MAX_RATING).contains(r))
}

#[derive(Default)]
struct HistoryState {
    orders: RefCell<Vec<Order>>,
    rating_target: RefCell<Option<String>>,
    selected_rating: Cell<u8>,
}

impl HistoryState {
    fn render_list(&self, host: &dyn Host) {
        let cards: Vec<String> = self.orders.borrow().iter().map(order_card).collect();
        host.set_html(LIST_ID, &cards.join("\n"));
    }

    fn select_rating(&self, host: &dyn Host, rating: u8) {
        self.selected_rating.set(rating);
        host.set_html(STARS_ID, &star_markup(rating));
        host.set_disabled(SUBMIT_RATING_ID, rating == 0);
    }

    fn show_details(&self, host: &dyn Host, order_id: &str) {
        let Some(order) = self.orders.borrow().iter().find(|o| o.id == order_id).cloned() else {
            log::warn!("clicked order {order_id} is not loaded");
            return;
        };
        let items = if order.items.is_empty() {
            r#"<li class="text-slate-500">No items found for this order.</li>"#.to_owned()
        } else {
            order.items.iter().map(item_row).collect::<Vec<_>>().join("\n")
        };
        let rateable = order.can_rate();
        let filled = host.set_text(MODAL_ORDER_ID, &format!("#{}", order.id))
            && host.set_text(MODAL_TOTAL_ID, &format!("₹{}", format_amount(order.total.unwrap_or_default())))
            && host.set_text(MODAL_STATUS_ID, order.status_label())
            && host.set_html(MODAL_ITEMS_ID, &items)
            && host.set_hidden(RATING_BOX_ID, !rateable);
        if !filled {
            log::error!("order details modal elements missing");
            host.notify(DETAILS_UNAVAILABLE_TEXT);
            return;
        }
        host.set_attribute(
            MODAL_STATUS_ID,
            "class",
            &format!("font-semibold {}", status_class(order.status.as_deref())),
        );
        if let Some(date) = order.created_at.as_ref().and_then(|t| t.date_label()) {
            host.set_text(MODAL_DATE_ID, &date);
        }

        if rateable {
            *self.rating_target.borrow_mut() = Some(order.id.clone());
            self.select_rating(host, 0);
            host.set_text(SUBMIT_RATING_ID, SUBMIT_RATING_LABEL);
        } else {
            *self.rating_target.borrow_mut() = None;
        }
        if !host.set_hidden(MODAL_ID, false) {
            log::error!("order details modal #{MODAL_ID} missing");
            host.notify(DETAILS_UNAVAILABLE_TEXT);
        }
    }

    fn mark_rated(&self, order_id: &str, rating: u8) {
        if let Some(order) = self.orders.borrow_mut().iter_mut().find(|o| o.id == order_id) {
            order.rating = Some(rating);
            order.rating_given = true;
        }
    }
}

async fn submit_rating(router: Router, state: Rc<HistoryState>) {
    let host = router.host().clone();
    let rating = state.selected_rating.get();
    let target = state.rating_target.borrow().clone();
    let Some(order_id) = target.filter(|_| rating > 0) else {
        host.notify(SELECT_RATING_TEXT);
        return;
    };
    host.set_text(SUBMIT_RATING_ID, "Submitting...");
    host.set_disabled(SUBMIT_RATING_ID, true);

    let patch = json!({ "rating": rating, "ratingGiven": true });
    match router.services().store.update(collections::ORDERS, &order_id, patch).await {
        Ok(()) => {
            log::info!("rated order {order_id}: {rating}");
            host.notify(RATING_THANKS_TEXT);
            state.mark_rated(&order_id, rating);
            *state.rating_target.borrow_mut() = None;
            state.render_list(host.as_ref());
            host.set_hidden(MODAL_ID, true);
        }
        Err(e) => {
            log::error!("rating order {order_id} failed: {e}");
            host.notify(RATING_FAILED_TEXT);
            host.set_text(SUBMIT_RATING_ID, SUBMIT_RATING_LABEL);
            host.set_disabled(SUBMIT_RATING_ID, false);
        }
    }
}

#[derive(Default)]
pub struct OrderHistoryPage {
    state: Rc<HistoryState>,
}

impl OrderHistoryPage {
    fn bind_modal(&self, router: &Router) {
        let host = router.host();
        for id in [CLOSE_ID, BACKDROP_ID] {
            let close_host = host.clone();
            host.on_click(id, Rc::new(move |_: Option<String>| {
                close_host.set_hidden(MODAL_ID, true);
            }));
        }

        let (stars_host, state) = (host.clone(), self.state.clone());
        host.on_click(
            STARS_ID,
            Rc::new(move |key: Option<String>| {
                if let Some(rating) = key.as_deref().and_then(parse_rating) {
                    state.select_rating(stars_host.as_ref(), rating);
                }
            }),
        );

        let (submit_router, state) = (router.clone(), self.state.clone());
        host.on_click(
            SUBMIT_RATING_ID,
            Rc::new(move |_: Option<String>| {
                let task = submit_rating(submit_router.clone(), state.clone());
                submit_router.host().spawn(Box::pin(task));
            }),
        );

        let (cards_host, state) = (host.clone(), self.state.clone());
        host.on_click(
            LIST_ID,
            Rc::new(move |key: Option<String>| {
                if let Some(order_id) = key {
                    state.show_details(cards_host.as_ref(), &order_id);
                }
            }),
        );
    }
}

#[async_trait::async_trait(?Send)]
impl PageBehavior for OrderHistoryPage {
    async fn init(&self, cx: &PageContext) -> Result<(), PageError> {
        let host = cx.host();
        PageContext::require(host.set_hidden(EMPTY_ID, true), EMPTY_ID)?;
        PageContext::require(host.set_html(LIST_ID, ""), LIST_ID)?;
        host.set_hidden(LOADER_ID, false);
        self.state.orders.borrow_mut().clear();
        *self.state.rating_target.borrow_mut() = None;
        self.bind_modal(&cx.router);

        let Some(user) = cx.user.as_ref() else {
            host.set_hidden(LOADER_ID, true);
            host.set_text(EMPTY_ID, SIGNED_OUT_TEXT);
            host.set_hidden(EMPTY_ID, false);
            return Ok(());
        };

        let query = Query::new()
            .where_eq("customerId", user.id.as_str())
            .order_by("createdAt", Direction::Descending);
        let docs = cx.services().store.query(collections::ORDERS, &query).await;
        if !cx.is_current() {
            return Ok(());
        }
        host.set_hidden(LOADER_ID, true);
        match docs {
            Ok(docs) => {
                let orders: Vec<Order> = docs
                    .iter()
                    .filter_map(|doc| match Order::from_document(doc) {
                        Ok(order) => Some(order),
                        Err(e) => {
                            log::warn!("skipping order {}: {e}", doc.id);
                            None
                        }
                    })
                    .collect();
                log::debug!("loaded {} orders", orders.len());
                if orders.is_empty() {
                    host.set_text(EMPTY_ID, NO_ORDERS_TEXT);
                    host.set_hidden(EMPTY_ID, false);
                }
                *self.state.orders.borrow_mut() = orders;
                self.state.render_list(host.as_ref());
            }
            Err(e) => {
                log::error!("fetching order history failed: {e}");
                host.set_html(LIST_ID, r#"<p class="text-red-500">Could not load order history.</p>"#);
            }
        }
        Ok(())
    }
}
