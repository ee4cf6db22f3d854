pub mod error;
pub mod id;
pub mod term;
pub mod unify;

pub use error::{CoreError, Result};
pub use id::{AgentId, ContentId, IntentionId};
pub use term::{Substitution, Term, Var};
pub use unify::{SyntacticUnifier, Unifier};
