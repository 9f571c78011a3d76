use crate::error::{CodecError, Result};
use crate::protocol::message::{peek_opcode, Message, WireMessage};
use crate::protocol::opcode::Opcode;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

type HandlerFn = dyn Fn(&Message) -> Result<Message> + Send + Sync + 'static;

/// Routes decoded messages to handlers by opcode.
pub struct Dispatcher {
    handlers: Arc<RwLock<HashMap<Opcode, Box<HandlerFn>>>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register `handler` for `opcode`, replacing any previous one.
    pub fn register<F>(&self, opcode: Opcode, handler: F) -> Result<()>
    where
        F: Fn(&Message) -> Result<Message> + Send + Sync + 'static,
    {
        let mut handlers = self.handlers.write().map_err(|_| CodecError::LockPoisoned)?;

        handlers.insert(opcode, Box::new(handler));
        Ok(())
    }

    pub fn dispatch(&self, msg: &Message) -> Result<Message> {
        let opcode = msg.opcode();

        let handlers = self.handlers.read().map_err(|_| CodecError::LockPoisoned)?;

        handlers
            .get(&opcode)
            .ok_or(CodecError::UnhandledOpcode(opcode))
            .and_then(|handler| handler(msg))
    }

    /// Peek the opcode of a raw datagram, decode it and route it.
    ///
    /// The opcode is checked against the registry before the body is parsed,
    /// so datagrams nobody handles are rejected without decoding them.
    pub fn dispatch_datagram(&self, datagram: &[u8]) -> Result<Message> {
        let opcode = Opcode::try_from(peek_opcode(datagram)?)?;
        if !self.handles(opcode)? {
            debug!(opcode = %opcode, "No handler registered");
            return Err(CodecError::UnhandledOpcode(opcode));
        }

        let msg = Message::from_datagram(datagram)?;
        self.dispatch(&msg)
    }

    pub fn handles(&self, opcode: Opcode) -> Result<bool> {
        let handlers = self.handlers.read().map_err(|_| CodecError::LockPoisoned)?;
        Ok(handlers.contains_key(&opcode))
    }
}
