pub mod error;
pub mod platform;
pub mod render;
pub mod scene;
pub mod session;
pub mod state;

pub use error::ViewerError;
pub use platform::{GrantedPermissions, LocationProvider, PermissionGate, StaticLocation};
pub use render::{Argb, HeadlessRenderer, MapRenderer, RenderCall};
pub use scene::Scene;
pub use session::{MapSession, Services};
pub use state::{Command, Msg, ViewState, update};
