//! Actions are the native code a plan body calls into.
//!
//! An action sees the agent through an [`ActionRequest`] and answers with an
//! [`ActionResponse`]: a substitution that extends the calling frame and a
//! list of effects for the cycle to apply. Actions never mutate the agent
//! directly.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use bdi_core::{Substitution, Term};

use crate::beliefs::BeliefBase;
use crate::context::AgentContext;
use crate::effects::Effect;
use crate::error::{ActionError, ActionResult};
use crate::types::IntentionId;

pub struct ActionRequest<'a> {
    pub context: &'a AgentContext,
    pub intention: IntentionId,
    pub arguments: Vec<Term>,
    pub beliefs: &'a BeliefBase,
}

impl<'a> ActionRequest<'a> {
    pub fn argument(&self, index: usize) -> ActionResult<&Term> {
        self.arguments.get(index).ok_or_else(|| {
            ActionError::InvalidArguments(format!(
                "expected at least {} arguments, got {}",
                index + 1,
                self.arguments.len()
            ))
        })
    }

    /// Fails unless exactly `n` arguments were passed.
    pub fn expect_arity(&self, n: usize) -> ActionResult<()> {
        if self.arguments.len() != n {
            return Err(ActionError::InvalidArguments(format!(
                "expected {} arguments, got {}",
                n,
                self.arguments.len()
            )));
        }
        Ok(())
    }

    pub fn reply(&self, substitution: Substitution, effects: Vec<Effect>) -> ActionResponse {
        ActionResponse {
            substitution,
            effects,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActionResponse {
    pub substitution: Substitution,
    pub effects: Vec<Effect>,
}

impl ActionResponse {
    /// Success with no bindings and no effects.
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn with_substitution(mut self, substitution: Substitution) -> Self {
        self.substitution = substitution;
        self
    }

    pub fn with_effect(mut self, effect: impl Into<Effect>) -> Self {
        self.effects.push(effect.into());
        self
    }
}

pub trait Action: Send + Sync {
    fn name(&self) -> &str;

    fn execute(&self, request: &ActionRequest<'_>) -> ActionResult<ActionResponse>;
}

/// Adapts a closure into an [`Action`].
pub struct FnAction<F> {
    name: String,
    f: F,
}

impl<F> Action for FnAction<F>
where
    F: Fn(&ActionRequest<'_>) -> ActionResult<ActionResponse> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, request: &ActionRequest<'_>) -> ActionResult<ActionResponse> {
        (self.f)(request)
    }
}

pub fn action_fn<F>(name: impl Into<String>, f: F) -> Arc<dyn Action>
where
    F: Fn(&ActionRequest<'_>) -> ActionResult<ActionResponse> + Send + Sync + 'static,
{
    Arc::new(FnAction {
        name: name.into(),
        f,
    })
}

/// Actions available to an agent, by name.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    actions: HashMap<String, Arc<dyn Action>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the builtin actions.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::builtin::register_builtins(&mut registry);
        registry
    }

    /// Registers `action`, replacing any action with the same name.
    pub fn register(&mut self, action: Arc<dyn Action>) {
        let name = action.name().to_string();
        debug!(action = %name, "Registered action");
        self.actions.insert(name, action);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Action>> {
        self.actions.get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.actions.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Runs the named action, `Unknown` if it is not registered.
    pub fn execute(&self, name: &str, request: &ActionRequest<'_>) -> ActionResult<ActionResponse> {
        let action = self
            .get(name)
            .ok_or_else(|| ActionError::Unknown(name.to_string()))?;
        action.execute(request)
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AgentConfig;
    use crate::types::AgentId;
    use bdi_core::{SyntacticUnifier, Var};

    fn context() -> AgentContext {
        AgentContext::new(
            AgentId::named("tester"),
            "tester",
            1,
            Arc::new(AgentConfig::default()),
            Arc::new(SyntacticUnifier::new()),
        )
    }

    #[test]
    fn test_register_and_execute() {
        let mut registry = ActionRegistry::new();
        registry.register(action_fn("answer", |req| {
            let var = req
                .argument(0)?
                .as_var()
                .cloned()
                .ok_or_else(|| ActionError::InvalidArguments("expected a variable".into()))?;
            let bound = Substitution::empty().with(var, Term::int(42));
            Ok(ActionResponse::ok().with_substitution(bound))
        }));
        assert!(registry.has("answer"));
        assert_eq!(registry.names(), vec!["answer".to_string()]);

        let ctx = context();
        let beliefs = BeliefBase::empty();
        let request = ActionRequest {
            context: &ctx,
            intention: IntentionId(0),
            arguments: vec![Term::var("X")],
            beliefs: &beliefs,
        };
        let response = registry.execute("answer", &request).unwrap();
        assert_eq!(response.substitution.get(&Var::new("X")), Some(&Term::int(42)));
    }

    #[test]
    fn test_unknown_action() {
        let ctx = context();
        let beliefs = BeliefBase::empty();
        let request = ActionRequest {
            context: &ctx,
            intention: IntentionId(0),
            arguments: vec![],
            beliefs: &beliefs,
        };
        assert!(matches!(
            ActionRegistry::new().execute("missing", &request),
            Err(ActionError::Unknown(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_builtins_are_registered() {
        let registry = ActionRegistry::with_builtins();
        for name in ["broadcast", "fail", "print", "send", "stop"] {
            assert!(registry.has(name), "missing builtin {}", name);
        }
    }
}
