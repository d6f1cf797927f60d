mod browser;
mod delay;

pub use self::browser::{Browser, BrowserOperation};
pub use self::delay::{Delay, DelayOperation};

pub use crux_core::render::Render;
pub use crux_http::Http;

use crate::event::Event;

pub type AppHttp = Http<Event>;
pub type AppRender = Render<Event>;
pub type AppDelay = Delay<Event>;
pub type AppBrowser = Browser<Event>;

#[derive(crux_core::macros::Effect)]
#[effect(app = "crate::app::App")]
pub struct Capabilities {
    pub http: Http<Event>,
    pub render: Render<Event>,
    pub delay: Delay<Event>,
    pub browser: Browser<Event>,
}

impl Capabilities {
    pub fn http(&self) -> &AppHttp {
        &self.http
    }

    pub fn render(&self) -> &AppRender {
        &self.render
    }

    pub fn delay(&self) -> &AppDelay {
        &self.delay
    }

    pub fn browser(&self) -> &AppBrowser {
        &self.browser
    }
}
