//! Booking module
//!
//! Reservations made by guests. Bookings reference listings by whatever the
//! client sends; nothing checks that the listing exists.

mod model;
mod store;

pub use model::*;
pub use store::BookingStore;
