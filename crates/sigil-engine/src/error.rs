//! Analysis errors

use sigil_model::ArgError;
use thiserror::Error;

/// Errors surfaced while resolving attribute descriptors.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested class is not declared in the model.
    #[error("class not found: {class}")]
    ClassNotFound {
        /// Name the caller asked for.
        class: String,
    },

    /// The class declares no attribute of the requested type.
    #[error("no {attribute} attribute on class {class}")]
    NotFound {
        /// Class that was analyzed.
        class: String,
        /// Attribute type that was requested.
        attribute: String,
    },

    /// More than one declaration matched where a single one is required.
    #[error("{count} {attribute} attributes on {target}, expected at most one")]
    Ambiguous {
        /// Class or member the declarations sit on.
        target: String,
        /// Attribute type that was matched.
        attribute: String,
        /// How many declarations matched.
        count: usize,
    },

    /// An attribute factory rejected its declared arguments.
    #[error("cannot construct {attribute}")]
    Construction {
        /// Attribute type under construction.
        attribute: String,
        /// The argument error raised by the factory.
        #[source]
        source: ArgError,
    },

    /// A declaration names an attribute type with no registry entry.
    #[error("unknown attribute type: {attribute}")]
    UnknownAttribute {
        /// The unregistered name.
        attribute: String,
    },

    /// A built instance was not of the type its entry promised.
    #[error("{attribute} instance has an unexpected concrete type")]
    Downcast {
        /// Attribute type that failed to downcast.
        attribute: String,
    },

    /// Resolution re-entered a class or attribute already being resolved.
    #[error("resolution cycle: {chain}")]
    Cycle {
        /// The names visited, in order, ending at the repeat.
        chain: String,
    },
}

impl Error {
    /// Cycle error for a visit chain that would re-enter `repeat`.
    pub(crate) fn cycle<S: AsRef<str>>(chain: &[S], repeat: &str) -> Self {
        let mut rendered = String::new();
        for link in chain {
            rendered.push_str(link.as_ref());
            rendered.push_str(" -> ");
        }
        rendered.push_str(repeat);
        Error::Cycle { chain: rendered }
    }
}
