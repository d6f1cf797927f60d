use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum BrowserOperation {
    /// Open in a new browsing context, leaving the app where it is.
    OpenInNewTab { url: String },
}

impl Operation for BrowserOperation {
    type Output = ();
}

pub struct Browser<E> {
    context: CapabilityContext<BrowserOperation, E>,
}

impl<Ev> Capability<Ev> for Browser<Ev> {
    type Operation = BrowserOperation;
    type MappedSelf<MappedEv> = Browser<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Browser::new(self.context.map_event(f))
    }
}

impl<E> Browser<E> {
    pub fn new(context: CapabilityContext<BrowserOperation, E>) -> Self {
        Self { context }
    }
}

impl<E> Browser<E>
where
    E: Send + 'static,
{
    pub fn open_in_new_tab(&self, url: impl Into<String>) {
        let ctx = self.context.clone();
        let url = url.into();
        self.context.spawn(async move {
            ctx.notify_shell(BrowserOperation::OpenInNewTab { url }).await;
        });
    }
}
