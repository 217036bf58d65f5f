//! Location permission gates for the terminal front end.

use pasitos_core::{PermissionGate, PermissionStatus};

/// Asks the user through the map screen's permission dialog.
///
/// The gate itself never decides: the dialog's answer reaches the
/// controller through `on_permission_result`.
#[derive(Debug, Clone, Default)]
pub struct PromptPermission {
    requested: bool,
}

impl PromptPermission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the dialog has been requested.
    pub fn was_requested(&self) -> bool {
        self.requested
    }
}

impl PermissionGate for PromptPermission {
    fn status(&self) -> PermissionStatus {
        PermissionStatus::NotDetermined
    }

    fn request(&mut self) -> Option<bool> {
        self.requested = true;
        None
    }
}

/// A fixed answer, for the headless recorder (`--allow-location`).
#[derive(Debug, Clone, Copy)]
pub struct StaticPermission {
    granted: bool,
}

impl StaticPermission {
    pub fn new(granted: bool) -> Self {
        Self { granted }
    }
}

impl PermissionGate for StaticPermission {
    fn status(&self) -> PermissionStatus {
        if self.granted {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }

    fn request(&mut self) -> Option<bool> {
        Some(self.granted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_defers_to_dialog() {
        let mut gate = PromptPermission::new();
        assert_eq!(gate.status(), PermissionStatus::NotDetermined);
        assert!(!gate.was_requested());
        assert_eq!(gate.request(), None);
        assert!(gate.was_requested());
    }

    #[test]
    fn test_static_permission() {
        let mut allowed = StaticPermission::new(true);
        assert_eq!(allowed.status(), PermissionStatus::Granted);
        assert_eq!(allowed.request(), Some(true));

        let mut refused = StaticPermission::new(false);
        assert_eq!(refused.status(), PermissionStatus::Denied);
        assert_eq!(refused.request(), Some(false));
    }
}
