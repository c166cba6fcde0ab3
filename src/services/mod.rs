//! Service layer for business logic and HTTP handlers

pub mod clicks;
pub mod health;
pub mod redirect;
pub mod shorten;

pub use clicks::ClickAccountant;
pub use health::{AppStartTime, HealthService};
pub use redirect::RedirectService;
pub use shorten::{BatchOutcome, FailedItem, ShortenRequest, ShortenService};
