use std::fmt;

use proc_macro2::{Span, TokenStream};
use thiserror::Error;

use syn::Lit;

use crate::request::{GenerationRequest, RequestArgs};

/// Stable classification of a request that could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    TargetTypeUnresolved,
    AccessorMemberMismatch,
    GenericPositionOutOfRange,
    ConstrainedPayload,
    AmbiguousEnumShape,
    /// The annotation itself could not be decoded: an unknown key, a
    /// missing `method` or `field`, a literal of the wrong kind.
    MalformedRequest,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::TargetTypeUnresolved => "TargetTypeUnresolved",
            DiagnosticKind::AccessorMemberMismatch => "AccessorMemberMismatch",
            DiagnosticKind::GenericPositionOutOfRange => "GenericPositionOutOfRange",
            DiagnosticKind::ConstrainedPayload => "ConstrainedPayload",
            DiagnosticKind::AmbiguousEnumShape => "AmbiguousEnumShape",
            DiagnosticKind::MalformedRequest => "MalformedRequest",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A per-request failure. The request emits nothing; other requests are
/// unaffected.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {reason} (method `{method}`, field `{field}`, target `{target}`, position {position})")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub method: String,
    pub field: String,
    pub target: String,
    pub position: usize,
    pub reason: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, request: &GenerationRequest, reason: impl Into<String>) -> Self {
        Diagnostic {
            kind,
            method: request.method.to_string(),
            field: request.field.clone(),
            target: request.container.to_string(),
            position: request.position,
            reason: reason.into(),
            span: request.span,
        }
    }

    /// A request that failed to decode. Whatever keys did parse are kept so
    /// the message still points at the annotation.
    pub fn undecoded(kind: DiagnosticKind, args: Option<&RequestArgs>, error: &syn::Error) -> Self {
        let text = |lit: Option<&syn::LitStr>| lit.map(syn::LitStr::value).unwrap_or_default();
        let field = match args.and_then(|args| args.field.as_ref()) {
            Some(Lit::Str(lit)) => lit.value(),
            Some(Lit::Int(lit)) => lit.base10_digits().to_string(),
            _ => String::new(),
        };
        Diagnostic {
            kind,
            method: text(args.and_then(|args| args.method.as_ref())),
            field,
            target: text(args.and_then(|args| args.target.as_ref())),
            position: args
                .and_then(|args| args.position.as_ref())
                .and_then(|lit| lit.base10_parse().ok())
                .unwrap_or(0),
            reason: error.to_string(),
            span: error.span(),
        }
    }

    pub fn to_syn_error(&self) -> syn::Error {
        syn::Error::new(self.span, self)
    }

    pub fn to_compile_error(&self) -> TokenStream {
        self.to_syn_error().to_compile_error()
    }
}
