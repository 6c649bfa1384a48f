//! Generation requests and the attribute syntax they are written in.

use proc_macro2::{Span, TokenStream};
use quote::ToTokens;
use syn::{
    Attribute, Ident, Lit, LitInt, LitStr, Path, Type, TypePath,
    meta::ParseNestedMeta,
    parse::{Parse, ParseStream, Parser},
};

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::model::ContainerRef;

/// One accessor set to generate, decoded from an annotation.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub method: Ident,
    /// Payload member: a field name, or an index for tuple structs.
    pub field: String,
    pub container: ContainerRef,
    pub position: usize,
    /// Enum types recognised by this request in addition to the model's.
    pub enums: Vec<Type>,
    /// Overrides the runtime path the generated code names.
    pub runtime: Option<Path>,
    pub span: Span,
}

impl GenerationRequest {
    pub fn new(method: Ident, field: impl Into<String>, container: ContainerRef) -> Self {
        let span = method.span();
        GenerationRequest {
            method,
            field: field.into(),
            container,
            position: 0,
            enums: Vec::new(),
            runtime: None,
            span,
        }
    }

    pub fn at_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    pub fn with_enums(mut self, enums: impl IntoIterator<Item = Type>) -> Self {
        self.enums.extend(enums);
        self
    }
}

// Spans do not take part in equality: two annotations asking for the same
// thing are the same request.
impl PartialEq for GenerationRequest {
    fn eq(&self, other: &Self) -> bool {
        let tokens = |tys: &[Type]| -> Vec<String> {
            tys.iter().map(|t| t.to_token_stream().to_string()).collect()
        };
        let runtime = |p: &Option<Path>| p.as_ref().map(|p| p.to_token_stream().to_string());
        self.method == other.method
            && self.field == other.field
            && self.container == other.container
            && self.position == other.position
            && tokens(&self.enums) == tokens(&other.enums)
            && runtime(&self.runtime) == runtime(&other.runtime)
    }
}

impl Eq for GenerationRequest {}

/// The raw keys of a `#[should(...)]` or `#[generate_accessors(...)]`
/// attribute.
#[derive(Debug, Clone)]
pub struct RequestArgs {
    pub method: Option<LitStr>,
    pub field: Option<Lit>,
    pub target: Option<LitStr>,
    pub position: Option<LitInt>,
    pub enums: Vec<Type>,
    pub runtime: Option<LitStr>,
    pub span: Span,
}

impl Default for RequestArgs {
    fn default() -> Self {
        RequestArgs {
            method: None,
            field: None,
            target: None,
            position: None,
            enums: Vec::new(),
            runtime: None,
            span: Span::call_site(),
        }
    }
}

impl RequestArgs {
    pub fn from_attribute(attr: &Attribute) -> syn::Result<Self> {
        let mut args = RequestArgs {
            span: attr.path().segments.last().map_or_else(Span::call_site, |s| s.ident.span()),
            ..RequestArgs::default()
        };
        attr.parse_nested_meta(|meta| args.parse_meta(meta))?;
        Ok(args)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta<'_>) -> syn::Result<()> {
        if meta.path.is_ident("method") {
            self.method = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("field") {
            let lit: Lit = meta.value()?.parse()?;
            match lit {
                Lit::Str(_) | Lit::Int(_) => self.field = Some(lit),
                other => {
                    return Err(syn::Error::new(
                        other.span(),
                        "`field` expects a field name or a tuple index",
                    ));
                }
            }
        } else if meta.path.is_ident("target") {
            self.target = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("position") {
            self.position = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("crate") {
            self.runtime = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("enums") {
            meta.parse_nested_meta(|inner| {
                self.enums.push(Type::Path(TypePath {
                    qself: None,
                    path: inner.path.clone(),
                }));
                Ok(())
            })?;
        } else {
            return Err(meta.error(
                "unsupported key, expected one of `method`, `field`, `target`, `position`, `enums`, `crate`",
            ));
        }
        Ok(())
    }

    /// True for an attribute that only sets `crate = ".."` and applies to
    /// every other request on the same container.
    pub fn is_options_only(&self) -> bool {
        self.method.is_none()
            && self.field.is_none()
            && self.target.is_none()
            && self.position.is_none()
            && self.enums.is_empty()
            && self.runtime.is_some()
    }

    pub fn runtime_path(&self) -> syn::Result<Option<Path>> {
        self.runtime.as_ref().map(|lit| lit.parse::<Path>()).transpose()
    }

    /// Decodes the keys into a request. `container` is the container the
    /// attribute sits on, when there is one; an explicit `target` must then
    /// agree with it.
    pub fn into_request(self, container: Option<&ContainerRef>) -> syn::Result<GenerationRequest> {
        let method_lit = self
            .method
            .as_ref()
            .ok_or_else(|| syn::Error::new(self.span, "missing `method = \"..\"`"))?;
        let method: Ident = method_lit.parse()?;

        let field = match &self.field {
            Some(Lit::Str(lit)) => {
                let ident: Ident = lit.parse()?;
                ident.to_string()
            }
            Some(Lit::Int(lit)) => lit.base10_parse::<u32>()?.to_string(),
            _ => return Err(syn::Error::new(self.span, "missing `field = \"..\"`")),
        };

        let target = match &self.target {
            Some(lit) => Some(
                lit.value()
                    .parse::<ContainerRef>()
                    .map_err(|err| syn::Error::new(lit.span(), err))?,
            ),
            None => None,
        };
        let container = match (target, container) {
            (Some(target), Some(own)) => {
                if target.name() != own.name() || target.arity != own.arity {
                    let span = self.target.as_ref().map_or(self.span, LitStr::span);
                    return Err(syn::Error::new(
                        span,
                        format!("`target` names `{target}`, but the attribute is on `{own}`"),
                    ));
                }
                target
            }
            (Some(target), None) => target,
            (None, Some(own)) => own.clone(),
            (None, None) => {
                return Err(syn::Error::new(
                    self.span,
                    "missing `target = \"module::Type`N\"`",
                ));
            }
        };

        let position = match &self.position {
            Some(lit) => lit.base10_parse::<usize>()?,
            None => 0,
        };
        let runtime = self.runtime_path()?;

        Ok(GenerationRequest {
            span: method_lit.span(),
            method,
            field,
            container,
            position,
            enums: self.enums,
            runtime,
        })
    }
}

impl RequestArgs {
    /// Like [`into_request`](Self::into_request), but reports a failure as a
    /// per-request [`Diagnostic`]. A `target` that is not a container
    /// reference is `TargetTypeUnresolved`; anything else is
    /// `MalformedRequest`.
    pub fn decode(self, container: Option<&ContainerRef>) -> Result<GenerationRequest, Diagnostic> {
        let args = self.clone();
        self.into_request(container).map_err(|err| {
            let bad_target = args.method.is_some()
                && args.field.is_some()
                && args
                    .target
                    .as_ref()
                    .is_some_and(|lit| lit.value().parse::<ContainerRef>().is_err());
            let kind = if bad_target {
                DiagnosticKind::TargetTypeUnresolved
            } else {
                DiagnosticKind::MalformedRequest
            };
            Diagnostic::undecoded(kind, Some(&args), &err)
        })
    }
}

impl Parse for RequestArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = RequestArgs {
            span: input.span(),
            ..RequestArgs::default()
        };
        let tokens: TokenStream = input.parse()?;
        syn::meta::parser(|meta| args.parse_meta(meta)).parse2(tokens)?;
        Ok(args)
    }
}
