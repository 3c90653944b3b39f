pub mod config;
pub mod format;
pub mod prediction;
pub mod provider;
pub mod session;
pub mod state;
pub mod upload;

pub use config::*;
pub use format::*;
pub use prediction::*;
pub use provider::*;
pub use session::AnalysisSession;
pub use state::*;
pub use upload::*;
