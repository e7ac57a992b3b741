//! Dashboard state for one user session: parameters, the fetches they
//! trigger, and the derived chart, summary and news views.
//!
//! Every fetch carries a [`RequestToken`]; a result is committed only while
//! its token is the newest of its [`Lane`], so a slow response for an older
//! selection never overwrites a newer one.

mod dashboard;
mod params;
mod store;
mod tokens;
pub mod views;

pub use dashboard::{Dashboard, DashboardSummary};
pub use params::{reduce, DashboardEvent, DashboardParams, FetchIntent, Lane};
pub use store::{Commit, DashboardState, DashboardStore, FinancialsSnapshot, SeriesSnapshot};
pub use tokens::{RequestToken, RequestTracker};
