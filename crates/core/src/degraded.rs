//! Degraded-mode answers.
//!
//! When the LLM gateway cannot answer, the chat surface still receives a
//! reply: a templated apology that echoes the customer's question. The
//! policy is a trait so templates can be swapped or localized.

use serde::{Deserialize, Serialize};

/// Placeholder replaced with the customer's question in templates.
pub const QUESTION_PLACEHOLDER: &str = "{question}";

/// Substituted when the request carried no question.
pub const DEFAULT_SUBJECT: &str = "vos services bancaires";

/// Agent tag for answers synthesized after an upstream error status.
pub const FALLBACK_AGENT: &str = "maisys-fallback";

/// Agent tag for answers synthesized after a transport failure.
pub const EMERGENCY_AGENT: &str = "maisys-emergency";

/// Default template for upstream error statuses.
pub const STATUS_TEMPLATE: &str = "Merci pour votre question \"{question}\". Le service MAISYS est temporairement en maintenance. Voici quelques informations générales qui pourraient vous aider : Pour consulter vos comptes, connectez-vous à votre espace client. Pour un virement, utilisez notre plateforme sécurisée. Pour toute urgence, contactez le 05 62 XX XX XX. Nous sommes désolés pour la gêne occasionnée.";

/// Default template for transport failures.
pub const UNREACHABLE_TEMPLATE: &str = "Je comprends votre demande concernant \"{question}\". Notre système intelligent est temporairement indisponible, mais voici ce que je peux vous dire : La Regionale Bank propose une gamme complète de services bancaires (comptes, virements, crédits, assurances). Notre équipe de conseillers est disponible du lundi au vendredi de 8h à 18h. Pour une assistance immédiate, appelez le 05 62 XX XX XX.";

/// Why the upstream answer is being replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The upstream answered with a non-success status.
    UpstreamStatus(u16),
    /// The upstream could not be reached, or the exchange could not be
    /// decoded.
    Unreachable,
}

/// A synthesized answer, shaped like an upstream reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackAnswer {
    pub response: String,
    pub agent: String,
    pub confidence: f64,
}

/// Produces the answer returned in place of an upstream failure.
pub trait DegradedResponsePolicy: Send + Sync {
    /// Build the answer for `reason`, echoing `question` when present.
    fn respond(&self, reason: FallbackReason, question: Option<&str>) -> FallbackAnswer;
}

/// Template-driven policy with one template per failure class.
#[derive(Debug, Clone)]
pub struct TemplatePolicy {
    status_template: String,
    unreachable_template: String,
}

impl TemplatePolicy {
    /// Build a policy from custom templates containing `{question}`.
    pub fn new(status_template: impl Into<String>, unreachable_template: impl Into<String>) -> Self {
        Self {
            status_template: status_template.into(),
            unreachable_template: unreachable_template.into(),
        }
    }
}

impl Default for TemplatePolicy {
    fn default() -> Self {
        Self::new(STATUS_TEMPLATE, UNREACHABLE_TEMPLATE)
    }
}

impl DegradedResponsePolicy for TemplatePolicy {
    fn respond(&self, reason: FallbackReason, question: Option<&str>) -> FallbackAnswer {
        let subject = question.filter(|q| !q.is_empty()).unwrap_or(DEFAULT_SUBJECT);
        let (template, agent, confidence) = match reason {
            FallbackReason::UpstreamStatus(_) => (&self.status_template, FALLBACK_AGENT, 0.9),
            FallbackReason::Unreachable => (&self.unreachable_template, EMERGENCY_AGENT, 0.8),
        };

        FallbackAnswer {
            response: template.replace(QUESTION_PLACEHOLDER, subject),
            agent: agent.to_owned(),
            confidence,
        }
    }
}
