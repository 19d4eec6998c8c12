//! 領域模型：車站、票種、時段、班次與官網表單編碼

pub mod booking;
pub mod forms;
pub mod station;
pub mod ticket;
pub mod time;
pub mod train;

pub use booking::{
    ensure_distinct_stations, parse_outbound_date, BookingRequest, DAYS_BEFORE_BOOKING_AVAILABLE,
};
pub use forms::{to_params, BookingForm, ConfirmTicketForm, ConfirmTrainForm};
pub use station::{Station, ALL_STATIONS};
pub use ticket::{
    format_ticket_count, TicketCounts, TicketType, ALL_TICKET_TYPES, MAX_TICKET_NUM,
};
pub use time::{list_available_hhmm, TimeSlot, AVAILABLE_TIME_TABLE};
pub use train::Train;
