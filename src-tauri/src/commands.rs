mod profile;
mod settings;
mod wallet;

pub use profile::*;
pub use settings::*;
pub use wallet::*;
