use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use super::event::{EventKind, PinEvent};
use super::guard::{ChannelGuard, GuardOutcome};
use super::platform::PinPlatform;
use super::protocol::{PinControl, PinOutcome};
use super::PinContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerResult {
    Pin(PinOutcome),
    Guard(GuardOutcome),
    Ignored,
}

#[async_trait]
pub trait PinEventHandler: Send + Sync {
    fn event_kind(&self) -> EventKind;
    async fn handle(&self, platform: &dyn PinPlatform, event: &PinEvent) -> Result<HandlerResult>;
}

/// Routes each event kind to the one handler registered for it.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<EventKind, Arc<dyn PinEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H>(&mut self, handler: H)
    where
        H: PinEventHandler + 'static,
    {
        self.handlers.insert(handler.event_kind(), Arc::new(handler));
    }

    pub async fn dispatch(
        &self,
        platform: &dyn PinPlatform,
        event: &PinEvent,
    ) -> Result<HandlerResult> {
        let Some(handler) = self.handlers.get(&event.kind()) else {
            return Ok(HandlerResult::Ignored);
        };

        handler.handle(platform, event).await
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

pub fn default_dispatcher(ctx: Arc<PinContext>) -> EventDispatcher {
    let control = PinControl::new(ctx.clone());
    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(MessageCreatedHandler {
        guard: ChannelGuard::new(ctx),
    });
    dispatcher.register(ReactionAddedHandler {
        control: control.clone(),
    });
    dispatcher.register(NativePinHandler { control });
    dispatcher
}

struct MessageCreatedHandler {
    guard: ChannelGuard,
}

#[async_trait]
impl PinEventHandler for MessageCreatedHandler {
    fn event_kind(&self) -> EventKind {
        EventKind::MessageCreated
    }

    async fn handle(&self, platform: &dyn PinPlatform, event: &PinEvent) -> Result<HandlerResult> {
        let PinEvent::MessageCreated(message) = event else {
            return Ok(HandlerResult::Ignored);
        };
        let outcome = self.guard.handle_message(platform, message).await?;
        Ok(HandlerResult::Guard(outcome))
    }
}

struct ReactionAddedHandler {
    control: PinControl,
}

#[async_trait]
impl PinEventHandler for ReactionAddedHandler {
    fn event_kind(&self) -> EventKind {
        EventKind::ReactionAdded
    }

    async fn handle(&self, platform: &dyn PinPlatform, event: &PinEvent) -> Result<HandlerResult> {
        let PinEvent::ReactionAdded(reaction) = event else {
            return Ok(HandlerResult::Ignored);
        };
        let outcome = self.control.handle_reaction(platform, reaction).await?;
        Ok(HandlerResult::Pin(outcome))
    }
}

struct NativePinHandler {
    control: PinControl,
}

#[async_trait]
impl PinEventHandler for NativePinHandler {
    fn event_kind(&self) -> EventKind {
        EventKind::NativePin
    }

    async fn handle(&self, platform: &dyn PinPlatform, event: &PinEvent) -> Result<HandlerResult> {
        let PinEvent::NativePin(entry) = event else {
            return Ok(HandlerResult::Ignored);
        };
        let outcome = self.control.handle_native_pin(platform, entry).await?;
        Ok(HandlerResult::Pin(outcome))
    }
}
