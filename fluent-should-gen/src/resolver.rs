//! Validates a request against the type model.

use proc_macro2::{Span, TokenStream, TokenTree};
use quote::ToTokens;
use syn::{
    GenericParam, Ident, Path, TraitBoundModifier, Type, TypeParam, TypeParamBound, WhereClause,
    WherePredicate,
};

use crate::catalog::{Catalog, same_nominal};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::model::{ContainerDecl, Member, TypeModel};
use crate::request::GenerationRequest;

/// A request resolved against its container. Only built when the payload
/// member exists, is readable, and is exactly the fixed type parameter.
#[derive(Debug, Clone)]
pub struct TargetDescriptor {
    pub method: Ident,
    pub container: ContainerDecl,
    pub arity: usize,
    pub fixed_position: usize,
    pub fixed_param: Ident,
    /// The fixed parameter was declared `?Sized`.
    pub unsized_payload: bool,
    /// Every other generic parameter, in declaration order, defaults removed.
    pub pass_through: Vec<GenericParam>,
    pub where_clause: Option<WhereClause>,
    pub payload_member: Member,
    /// Enum types the enum entries are instantiated for.
    pub enums: Vec<Type>,
    pub runtime: Option<Path>,
    pub span: Span,
}

pub fn resolve(
    request: &GenerationRequest,
    model: &impl TypeModel,
    catalog: &Catalog,
) -> Result<TargetDescriptor, Diagnostic> {
    let fail = |kind, reason: String| Diagnostic::new(kind, request, reason);

    let decl = model.resolve_type(&request.container).ok_or_else(|| {
        fail(
            DiagnosticKind::TargetTypeUnresolved,
            format!(
                "no struct `{}` with {} type parameter(s) is visible to the generator",
                request.container.segments.join("::"),
                request.container.arity
            ),
        )
    })?;

    let arity = decl.arity();
    let fixed = decl.type_params().nth(request.position).ok_or_else(|| {
        fail(
            DiagnosticKind::GenericPositionOutOfRange,
            format!("position {} is outside 0..{}", request.position, arity),
        )
    })?;
    let fixed_ident = &fixed.ident;

    let member = model.resolve_member(decl, &request.field).ok_or_else(|| {
        fail(
            DiagnosticKind::AccessorMemberMismatch,
            format!("`{}` has no member `{}`", decl.ident, request.field),
        )
    })?;
    if !member.accessible {
        return Err(fail(
            DiagnosticKind::AccessorMemberMismatch,
            format!("member `{}` is not visible to the generated accessors", request.field),
        ));
    }
    if !is_exactly(&member.ty, fixed_ident) {
        return Err(fail(
            DiagnosticKind::AccessorMemberMismatch,
            format!(
                "member `{}` has type `{}`, expected exactly `{}`",
                request.field,
                member.ty.to_token_stream(),
                fixed_ident
            ),
        ));
    }

    check_unconstrained(decl, fixed)
        .map_err(|reason| fail(DiagnosticKind::ConstrainedPayload, reason))?;

    let mut enums: Vec<Type> = model.enum_types().to_vec();
    for requested in &request.enums {
        if let Some(entry) = catalog.classify(requested, &[]) {
            if !entry.is_fallback() {
                return Err(fail(
                    DiagnosticKind::AmbiguousEnumShape,
                    format!(
                        "`{}` already has the catalog shape `{}` and cannot be treated as an enum",
                        requested.to_token_stream(),
                        entry.pattern.wrapper_ident()
                    ),
                ));
            }
        }
        if !enums.iter().any(|known| same_nominal(known, requested)) {
            enums.push(requested.clone());
        }
    }

    let pass_through = decl
        .generics
        .params
        .iter()
        .filter(|param| !matches!(param, GenericParam::Type(tp) if tp.ident == *fixed_ident))
        .cloned()
        .map(without_default)
        .collect();

    let where_clause = decl.generics.where_clause.clone().and_then(|mut clause| {
        clause.predicates = clause
            .predicates
            .into_iter()
            .filter(|pred| !is_maybe_sized_predicate(pred, fixed_ident))
            .collect();
        (!clause.predicates.is_empty()).then_some(clause)
    });

    let unsized_payload = fixed.bounds.iter().any(is_maybe_sized)
        || decl
            .generics
            .where_clause
            .iter()
            .flat_map(|clause| clause.predicates.iter())
            .any(|pred| is_maybe_sized_predicate(pred, fixed_ident));

    tracing::debug!(
        method = %request.method,
        target = %request.container,
        position = request.position,
        "resolved accessor request"
    );

    Ok(TargetDescriptor {
        method: request.method.clone(),
        container: decl.clone(),
        arity,
        fixed_position: request.position,
        fixed_param: fixed_ident.clone(),
        unsized_payload,
        pass_through,
        where_clause,
        payload_member: member.clone(),
        enums,
        runtime: request.runtime.clone(),
        span: request.span,
    })
}

/// Substituting concrete payloads into a bounded parameter would produce
/// impls the compiler rejects or that never apply.
fn check_unconstrained(decl: &ContainerDecl, fixed: &TypeParam) -> Result<(), String> {
    let ident = &fixed.ident;
    if fixed.bounds.iter().any(|bound| !is_maybe_sized(bound)) {
        return Err(format!(
            "type parameter `{ident}` is bounded by `{}`",
            fixed.bounds.to_token_stream()
        ));
    }
    for param in &decl.generics.params {
        let bounds = match param {
            GenericParam::Type(tp) if tp.ident != *ident => tp.bounds.to_token_stream(),
            GenericParam::Lifetime(lt) => lt.bounds.to_token_stream(),
            _ => continue,
        };
        if mentions_ident(bounds, ident) {
            return Err(format!(
                "the bounds of `{}` mention `{ident}`",
                param.to_token_stream()
            ));
        }
    }
    if let Some(clause) = &decl.generics.where_clause {
        for pred in &clause.predicates {
            if !is_maybe_sized_predicate(pred, ident) && mentions_ident(pred.to_token_stream(), ident)
            {
                return Err(format!(
                    "where-predicate `{}` constrains `{ident}`",
                    pred.to_token_stream()
                ));
            }
        }
    }
    Ok(())
}

fn is_exactly(ty: &Type, ident: &Ident) -> bool {
    match ty {
        Type::Paren(p) => is_exactly(&p.elem, ident),
        Type::Group(g) => is_exactly(&g.elem, ident),
        Type::Path(tp) => tp.qself.is_none() && tp.path.get_ident() == Some(ident),
        _ => false,
    }
}

fn is_maybe_sized(bound: &TypeParamBound) -> bool {
    matches!(
        bound,
        TypeParamBound::Trait(tb)
            if matches!(tb.modifier, TraitBoundModifier::Maybe(_)) && tb.path.is_ident("Sized")
    )
}

fn is_maybe_sized_predicate(pred: &WherePredicate, ident: &Ident) -> bool {
    match pred {
        WherePredicate::Type(pt) => {
            pt.lifetimes.is_none()
                && is_exactly(&pt.bounded_ty, ident)
                && !pt.bounds.is_empty()
                && pt.bounds.iter().all(is_maybe_sized)
        }
        _ => false,
    }
}

fn mentions_ident(tokens: TokenStream, ident: &Ident) -> bool {
    tokens.into_iter().any(|tt| match tt {
        TokenTree::Ident(found) => found == *ident,
        TokenTree::Group(group) => mentions_ident(group.stream(), ident),
        _ => false,
    })
}

fn without_default(param: GenericParam) -> GenericParam {
    match param {
        GenericParam::Type(mut tp) => {
            tp.eq_token = None;
            tp.default = None;
            GenericParam::Type(tp)
        }
        GenericParam::Const(mut cp) => {
            cp.eq_token = None;
            cp.default = None;
            GenericParam::Const(cp)
        }
        lifetime => lifetime,
    }
}
