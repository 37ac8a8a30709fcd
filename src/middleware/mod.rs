mod redirect;

pub use redirect::{RedirectMiddleware, refresh_loop};
