pub mod confidence;
pub mod controller;
pub mod intent;
pub mod state;

pub use controller::HudController;
pub use intent::IntentLabel;
pub use state::HudState;
