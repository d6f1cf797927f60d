use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

/// Ask the shell to wait, then resolve with no payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DelayOperation {
    pub millis: u64,
}

impl Operation for DelayOperation {
    type Output = ();
}

pub struct Delay<E> {
    context: CapabilityContext<DelayOperation, E>,
}

impl<Ev> Capability<Ev> for Delay<Ev> {
    type Operation = DelayOperation;
    type MappedSelf<MappedEv> = Delay<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Delay::new(self.context.map_event(f))
    }
}

impl<E> Delay<E> {
    pub fn new(context: CapabilityContext<DelayOperation, E>) -> Self {
        Self { context }
    }
}

impl<E> Delay<E>
where
    E: Send + 'static,
{
    /// Sends `event` back to the app once `millis` have elapsed.
    pub fn start(&self, millis: u64, event: E) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.request_from_shell(DelayOperation { millis }).await;
            ctx.update_app(event);
        });
    }
}
