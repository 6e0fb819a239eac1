//! CLI command implementations

pub mod check;
pub mod config;
pub mod env;
pub mod init;
pub mod overlays;
pub mod show;

pub use check::execute as check;
pub use config::execute as config;
pub use env::execute as env;
pub use init::execute as init;
pub use overlays::execute as overlays;
pub use show::execute as show;
