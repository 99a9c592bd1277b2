// Collaborators owned by the host platform: location fixes and permission prompts.

use async_trait::async_trait;
use shared::Coordinate;

#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// `Ok(None)` when the platform has no fix yet.
    async fn last_location(&self) -> Result<Option<Coordinate>, String>;
}

#[async_trait]
pub trait PermissionGate: Send + Sync {
    fn has_location_permission(&self) -> bool;

    /// Prompts once and reports whether access was granted.
    async fn request_location_permission(&self) -> bool;
}

/// Always reports the same fix. Used by the preview harness.
#[derive(Debug, Clone, Copy)]
pub struct StaticLocation(Option<Coordinate>);

impl StaticLocation {
    pub fn new(coordinate: Coordinate) -> Self {
        Self(Some(coordinate))
    }

    pub fn unknown() -> Self {
        Self(None)
    }
}

#[async_trait]
impl LocationProvider for StaticLocation {
    async fn last_location(&self) -> Result<Option<Coordinate>, String> {
        Ok(self.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GrantedPermissions;

#[async_trait]
impl PermissionGate for GrantedPermissions {
    fn has_location_permission(&self) -> bool {
        true
    }

    async fn request_location_permission(&self) -> bool {
        true
    }
}
