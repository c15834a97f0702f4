//! Appointment sources that live inside the process.

mod inmemory;
pub mod mock_data;

pub use inmemory::InMemorySource;
