use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};

use crate::detect::NnetPacket;
use crate::frame::Canvas;

use super::{Decoded, NnetHandler};

/// Registry of network handlers, keyed by network name.
pub struct HandlerRegistry {
    handlers: HashMap<String, Box<dyn NnetHandler>>,
    default_name: Option<String>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            default_name: None,
        }
    }

    /// Register a handler. The first registered handler becomes the default.
    pub fn register<H: NnetHandler + 'static>(&mut self, handler: H) {
        let name = handler.name().to_string();
        log::info!("registered handler {}", name);
        if self.default_name.is_none() {
            self.default_name = Some(name.clone());
        }
        self.handlers.insert(name, Box::new(handler));
    }

    /// Set default handler by name.
    pub fn set_default(&mut self, name: &str) -> Result<()> {
        if !self.handlers.contains_key(name) {
            return Err(anyhow!("handler '{}' not registered", name));
        }
        self.default_name = Some(name.to_string());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn NnetHandler> {
        self.handlers.get(name).map(|handler| handler.as_ref())
    }

    pub fn default_handler(&self) -> Option<&dyn NnetHandler> {
        self.default_name.as_deref().and_then(|name| self.get(name))
    }

    /// Registered handler names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Decode `packet` and draw the result onto `canvas`.
    ///
    /// Uses the handler registered as `name`, or the default when `name` is
    /// `None`. A decode failure leaves the canvas untouched.
    pub fn process(
        &self,
        name: Option<&str>,
        packet: &dyn NnetPacket,
        canvas: &mut dyn Canvas,
    ) -> Result<Decoded> {
        let handler = match name {
            Some(name) => self
                .get(name)
                .ok_or_else(|| anyhow!("handler '{}' not registered", name))?,
            None => self
                .default_handler()
                .ok_or_else(|| anyhow!("no handler registered"))?,
        };
        let decoded = handler
            .decode(packet)
            .with_context(|| format!("{} failed to decode packet", handler.name()))?;
        handler.render(&decoded, canvas)?;
        Ok(decoded)
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
