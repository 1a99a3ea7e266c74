//! Instantiation event categories
//!
//! The textual names are part of the trace format and are what downstream
//! tooling matches on, so they must stay byte-for-byte stable.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Why an entity was instantiated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstantiationKind {
    TemplateInstantiation,
    DefaultTemplateArgumentInstantiation,
    DefaultFunctionArgumentInstantiation,
    ExplicitTemplateArgumentSubstitution,
    DeducedTemplateArgumentSubstitution,
    PriorTemplateArgumentSubstitution,
    DefaultTemplateArgumentChecking,
    ExceptionSpecInstantiation,
    Memoization,
    NonTemplateType,
}

impl InstantiationKind {
    /// Every kind, in declaration order
    pub const ALL: [InstantiationKind; 10] = [
        InstantiationKind::TemplateInstantiation,
        InstantiationKind::DefaultTemplateArgumentInstantiation,
        InstantiationKind::DefaultFunctionArgumentInstantiation,
        InstantiationKind::ExplicitTemplateArgumentSubstitution,
        InstantiationKind::DeducedTemplateArgumentSubstitution,
        InstantiationKind::PriorTemplateArgumentSubstitution,
        InstantiationKind::DefaultTemplateArgumentChecking,
        InstantiationKind::ExceptionSpecInstantiation,
        InstantiationKind::Memoization,
        InstantiationKind::NonTemplateType,
    ];

    /// Stable name used in traces and reports
    pub fn name(self) -> &'static str {
        match self {
            InstantiationKind::TemplateInstantiation => "TemplateInstantiation",
            InstantiationKind::DefaultTemplateArgumentInstantiation => {
                "DefaultTemplateArgumentInstantiation"
            }
            InstantiationKind::DefaultFunctionArgumentInstantiation => {
                "DefaultFunctionArgumentInstantiation"
            }
            InstantiationKind::ExplicitTemplateArgumentSubstitution => {
                "ExplicitTemplateArgumentSubstitution"
            }
            InstantiationKind::DeducedTemplateArgumentSubstitution => {
                "DeducedTemplateArgumentSubstitution"
            }
            InstantiationKind::PriorTemplateArgumentSubstitution => {
                "PriorTemplateArgumentSubstitution"
            }
            InstantiationKind::DefaultTemplateArgumentChecking => {
                "DefaultTemplateArgumentChecking"
            }
            InstantiationKind::ExceptionSpecInstantiation => "ExceptionSpecInstantiation",
            InstantiationKind::Memoization => "Memoization",
            InstantiationKind::NonTemplateType => "NonTemplateType",
        }
    }
}

impl fmt::Display for InstantiationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A kind name outside the closed set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown instantiation kind '{0}'")]
pub struct UnknownKind(pub String);

impl FromStr for InstantiationKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InstantiationKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}
