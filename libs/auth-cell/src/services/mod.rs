pub mod session;
pub mod signin;

pub use session::{FileSessionStore, MemorySessionStore, SessionManager, SessionStore};
pub use signin::SignInService;
