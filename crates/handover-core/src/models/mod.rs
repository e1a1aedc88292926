//! Data models for the handover flow
//!
//! Raw form input (`Raw*Input`) is validated once and turned into the typed
//! records the rest of the workspace works with.

mod account;
mod amount;
mod asset;
mod photo;
mod seller;
mod vehicle;

pub use account::*;
pub use amount::*;
pub use asset::*;
pub use photo::*;
pub use seller::*;
pub use vehicle::*;

/// Czech rendering of a yes/no flag in the documents.
pub fn yes_no(value: bool) -> &'static str {
    if value {
        "Ano"
    } else {
        "Ne"
    }
}
