mod operations;
mod sorting;
mod types;

pub use operations::{contact_display_name, event_from_raw, events_from_raw};
pub use sorting::merge_events;
pub use types::{
    AppointmentStatus, CalendarEvent, EventPatch, RawAppointment, DEFAULT_APPOINTMENT_TYPE,
};
