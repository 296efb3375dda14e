//! Handlers 模块

pub mod auth;
pub mod display;
pub mod drafts;
pub mod floors;
pub mod metrics;
pub mod occupancies;
pub mod properties;

pub use auth::*;
pub use display::*;
pub use drafts::*;
pub use floors::*;
pub use metrics::*;
pub use occupancies::*;
pub use properties::*;
