pub mod destination;
pub mod message;
pub mod requests;
pub mod responses;
pub mod submission;
