//! Routing received events to handlers by event type.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use anyhow::Context;

use crate::event::CloudEvent;

/// Something that reacts to an event.
pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &CloudEvent) -> anyhow::Result<()>;
}

impl<F> EventHandler for F
where
    F: Fn(&CloudEvent) -> anyhow::Result<()> + Send + Sync,
{
    fn handle(&self, event: &CloudEvent) -> anyhow::Result<()> {
        self(event)
    }
}

/// Handlers keyed by the exact event `type` they subscribe to.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Vec<Arc<dyn EventHandler>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `handler` to the handlers for `event_type`.
    pub fn register_handler(&mut self, event_type: impl Into<String>, handler: impl EventHandler + 'static) {
        self.register_arc(event_type, Arc::new(handler));
    }

    pub fn register_arc(&mut self, event_type: impl Into<String>, handler: Arc<dyn EventHandler>) {
        let event_type = event_type.into();
        tracing::debug!(event_type = %event_type, "Registered event handler");
        self.handlers.entry(event_type).or_default().push(handler);
    }

    /// Registers one handler for several event types.
    pub fn handles_events(&mut self, event_types: &[&str], handler: impl EventHandler + 'static) {
        let handler: Arc<dyn EventHandler> = Arc::new(handler);
        for event_type in event_types {
            self.register_arc(*event_type, Arc::clone(&handler));
        }
    }

    pub fn handler_count(&self, event_type: &str) -> usize {
        self.handlers.get(event_type).map_or(0, Vec::len)
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    /// Calls every handler registered for the event's type, in registration
    /// order, and returns how many ran.
    ///
    /// Stops at the first failing handler.
    pub fn dispatch(&self, event: &CloudEvent) -> anyhow::Result<usize> {
        let Some(handlers) = self.handlers.get(event.event_type()) else {
            tracing::debug!(id = event.id(), event_type = event.event_type(), "No handlers for event");
            return Ok(0);
        };

        for (index, handler) in handlers.iter().enumerate() {
            handler.handle(event).with_context(|| {
                format!(
                    "handler {} failed for event {} of type {}",
                    index + 1,
                    event.id(),
                    event.event_type()
                )
            })?;
        }

        tracing::debug!(
            id = event.id(),
            event_type = event.event_type(),
            handlers = handlers.len(),
            "Dispatched event"
        );
        Ok(handlers.len())
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.handlers.iter().map(|(event_type, handlers)| (event_type, handlers.len())))
            .finish()
    }
}
