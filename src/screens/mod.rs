pub mod about;
pub mod containers;
pub mod dashboard;
pub mod stats;

// The dashboard frame draws the navbar, the footer and the help overlay,
// and delegates the content area to the screen modules:
// - Containers: inventory card grid
// - Stats: live metrics of one container (opened from Containers)
// - About: product overview

pub use dashboard::{Dashboard, DashboardView};
