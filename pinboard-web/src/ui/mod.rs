mod app;
pub use app::{App, AppMsg, AppProps, Mode, Placement};

mod capture_surface;
pub use capture_surface::CaptureSurface;

mod composer;
pub use composer::Composer;

mod pin_layer;
pub use pin_layer::PinLayer;

mod thread_panel;
pub use thread_panel::ThreadPanel;

mod toolbar;
pub use toolbar::Toolbar;
