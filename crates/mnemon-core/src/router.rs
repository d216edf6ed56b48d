//! Directive routing for the turn loop.

use crate::error::CoreError;
use log::debug;
use mnemon_protocol::Conversation;

/// Memory category named by an update directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Reconcile the user profile.
    Profile,
    /// Reconcile the task list.
    Todo,
    /// Rewrite the standing instructions.
    Instructions,
}

impl Directive {
    /// Parse the raw `update_type` value emitted by the model capability.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Directive::Profile),
            "todo" => Some(Directive::Todo),
            "instructions" => Some(Directive::Instructions),
            _ => None,
        }
    }

    /// The wire value for this directive.
    pub fn as_str(&self) -> &'static str {
        match self {
            Directive::Profile => "user",
            Directive::Todo => "todo",
            Directive::Instructions => "instructions",
        }
    }
}

/// Routing decision for the latest conversation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Dispatch the update node for `directive`, confirming `call_id`.
    Dispatch {
        /// Memory category to reconcile.
        directive: Directive,
        /// Directive call id to reference in the confirmation.
        call_id: String,
    },
    /// No directive present; the turn is complete.
    Done,
}

/// Inspect the latest message and decide the next node.
///
/// An `update_type` outside the closed set is an upstream contract
/// violation and fails the turn; it is never mapped to termination.
pub fn route_turn(conversation: &Conversation) -> Result<RouteDecision, CoreError> {
    let Some(message) = conversation.last() else {
        return Ok(RouteDecision::Done);
    };
    let Some(call) = &message.directive_call else {
        return Ok(RouteDecision::Done);
    };
    match Directive::parse(&call.update_type) {
        Some(directive) => {
            debug!(
                "routing directive (update_type={}, call_id={})",
                call.update_type, call.id
            );
            Ok(RouteDecision::Dispatch {
                directive,
                call_id: call.id.clone(),
            })
        }
        None => Err(CoreError::UnknownDirective(call.update_type.clone())),
    }
}
