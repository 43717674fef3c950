//! Request-scoped transactional resource context for Hexagon
//!
//! One [`ResourceBundle`] is built at startup; every request gets a
//! [`ResourceSession`] opened by [`session_middleware`], published
//! through a task-local so services call [`ResourceSession::current`]
//! instead of threading it through arguments. The session owns the
//! request's single lazy transaction and settles it on the way out:
//! commit unless something poisoned the session, rollback otherwise.

mod bundle;
mod extract;
mod middleware;
mod session;

pub use bundle::ResourceBundle;
pub use extract::{extract_bearer_token, BearerClaims};
pub use middleware::session_middleware;
pub use session::{with_session, CloseOutcome, ResourceSession, TxGuard};
