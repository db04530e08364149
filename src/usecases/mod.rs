//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain rules with the port interfaces. Each use case
//! is a self-contained service handed its adapters at construction.
//!
//! Use cases:
//! - `EntriesService`: List/get/create/delete entries
//! - `PhotoUploader`: Name, convert and store uploaded photos

pub mod entries;
pub mod uploads;

pub use entries::EntriesService;
pub use uploads::{PhotoUploader, UploadError, UploadedPhoto};
