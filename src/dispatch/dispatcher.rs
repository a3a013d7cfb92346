use super::{DispatchError, KeySink};
use crate::input::{InputEvent, KeyToken, Translator};

/// Outcome of dispatching a batch of events.
#[derive(Debug, Default)]
pub struct DispatchSummary {
    pub sent: usize,
    /// Events that translate to no key, such as unmapped key codes.
    pub ignored: usize,
    pub failures: Vec<(InputEvent, DispatchError)>,
}

impl DispatchSummary {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Translates input events and hands the resulting keys to a sink.
pub struct Dispatcher<'a> {
    translator: Translator<'a>,
    sink: &'a dyn KeySink,
}

impl<'a> Dispatcher<'a> {
    pub fn new(translator: Translator<'a>, sink: &'a dyn KeySink) -> Self {
        Self { translator, sink }
    }

    /// Sends the key for one event. Returns `Ok(None)` if the event maps to
    /// no key.
    pub async fn dispatch(&self, event: InputEvent) -> Result<Option<KeyToken>, DispatchError> {
        let Some(token) = self.translator.translate(event)? else {
            log::debug!("No key for {:?}", event);
            return Ok(None);
        };
        self.sink.send_key(&token).await?;
        Ok(Some(token))
    }

    /// Dispatches events in order. A failing event is recorded and the rest
    /// are still sent.
    pub async fn dispatch_all<I>(&self, events: I) -> DispatchSummary
    where
        I: IntoIterator<Item = InputEvent>,
    {
        let mut summary = DispatchSummary::default();
        for event in events {
            match self.dispatch(event).await {
                Ok(Some(_)) => summary.sent += 1,
                Ok(None) => summary.ignored += 1,
                Err(err) => {
                    log::warn!("Failed to dispatch {:?}: {}", event, err);
                    summary.failures.push((event, err));
                }
            }
        }
        summary
    }
}
