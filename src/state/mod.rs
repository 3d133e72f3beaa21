// ============================================================================
// STATE MODULE - Rc<RefCell> state with change notifications
// ============================================================================

pub mod app_state;
pub mod cart_state;
pub mod session_state;

pub use app_state::*;
pub use cart_state::*;
pub use session_state::*;
