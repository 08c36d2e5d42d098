// Fallback extraction engine: turns raw CV text into a ParsedProfile with regexes
// and heuristics only. Pure and CPU-bound; async callers run it inside
// tokio::task::spawn_blocking.

pub mod contact;
pub mod education;
pub mod experience;
pub mod fallback;
pub mod interests;
pub mod models;
pub mod name;
pub mod projects;
pub mod sections;
pub mod skills;

pub use fallback::extract_fallback_profile;
pub use models::ParsedProfile;
