/// Event tracking stub. There is no analytics backend: events are only logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Analytics {
    enabled: bool,
}

impl Analytics {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs `name` with its properties. Returns whether anything was logged.
    pub fn track_event(&self, name: &str, properties: &[(&str, &str)]) -> bool {
        if !self.enabled {
            return false;
        }
        tracing::info!(event.name = name, event.properties = ?properties, "Tracking event");
        true
    }
}
