//! Turns a resolved target into one accessor declaration per catalog entry.

use std::collections::HashSet;

use proc_macro2::{Span, TokenStream};
use quote::{ToTokens, format_ident, quote};
use syn::{
    GenericParam, Generics, Ident, Lifetime, Member, Path, Type, TypeParam, ext::IdentExt,
    parse_quote,
};

use crate::catalog::{Catalog, FreeVar, FreeVars, PayloadPattern};
use crate::model::{ContainerDecl, TypeModel};
use crate::resolver::TargetDescriptor;

/// How a declaration is attached to the container.
#[derive(Debug, Clone)]
pub enum Rendering {
    /// `impl<..> Container<..> { pub fn method(&self) -> .. }`
    Inherent,
    /// A trait with a blanket impl. Inherent methods shadow it, so it only
    /// answers for payloads no other entry matched.
    Extension { trait_ident: Ident, subject: TypeParam },
}

/// One generated accessor.
#[derive(Debug, Clone)]
pub struct AccessorDecl {
    pub method: Ident,
    pub pattern: PayloadPattern,
    pub generics: Generics,
    pub receiver: Type,
    pub payload: Type,
    pub result: Type,
    pub constructor: Path,
    pub member: Member,
    pub rendering: Rendering,
}

impl ToTokens for AccessorDecl {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let AccessorDecl {
            method,
            generics,
            receiver,
            result,
            constructor,
            member,
            ..
        } = self;
        let (impl_generics, _, where_clause) = generics.split_for_impl();
        let body = quote! { #constructor::new(&self.#member) };

        match &self.rendering {
            Rendering::Inherent => tokens.extend(quote! {
                impl #impl_generics #receiver #where_clause {
                    #[inline]
                    pub fn #method(&self) -> #result {
                        #body
                    }
                }
            }),
            Rendering::Extension {
                trait_ident,
                subject,
            } => {
                let subject_ident = &subject.ident;
                tokens.extend(quote! {
                    pub trait #trait_ident<#subject> {
                        fn #method(&self) -> #result;
                    }

                    impl #impl_generics #trait_ident<#subject_ident> for #receiver #where_clause {
                        #[inline]
                        fn #method(&self) -> #result {
                            #body
                        }
                    }
                })
            }
        }
    }
}

/// Emits the full declaration set for `descriptor`: every catalog entry,
/// with the enum entries repeated once per known enum type.
pub fn emit(
    descriptor: &TargetDescriptor,
    catalog: &Catalog,
    model: &impl TypeModel,
    default_runtime: &Path,
) -> Vec<AccessorDecl> {
    let runtime = descriptor.runtime.as_ref().unwrap_or(default_runtime);
    let vars = fresh_vars(&descriptor.container);

    let mut decls = Vec::new();
    for entry in catalog {
        match entry.pattern {
            PayloadPattern::Enum(_) => {
                for enum_ty in &descriptor.enums {
                    decls.push(declaration(
                        descriptor,
                        entry.pattern,
                        model,
                        runtime,
                        &vars,
                        Some(enum_ty),
                    ));
                }
            }
            pattern => decls.push(declaration(descriptor, pattern, model, runtime, &vars, None)),
        }
    }

    tracing::debug!(
        method = %descriptor.method,
        container = %descriptor.container.ident,
        position = descriptor.fixed_position,
        declarations = decls.len(),
        "emitted accessor set"
    );
    decls
}

fn declaration(
    descriptor: &TargetDescriptor,
    pattern: PayloadPattern,
    model: &impl TypeModel,
    runtime: &Path,
    vars: &FreeVars,
    enum_ty: Option<&Type>,
) -> AccessorDecl {
    let payload = pattern.payload_type(runtime, vars, enum_ty);
    let receiver = model.substitute_generic(&descriptor.container, descriptor.fixed_position, &payload);
    let result = pattern.result_type(runtime, vars, enum_ty);

    let free: Vec<GenericParam> = pattern
        .free_vars()
        .iter()
        .map(|var| {
            let mut param = vars.generic_param(*var);
            if *var == FreeVar::Subject && descriptor.unsized_payload {
                if let GenericParam::Type(tp) = &mut param {
                    tp.bounds.push(parse_quote!(?Sized));
                }
            }
            param
        })
        .collect();
    let generics = impl_generics(&descriptor.pass_through, &free, descriptor);

    let rendering = match pattern {
        PayloadPattern::Fallback => {
            let subject = free
                .iter()
                .find_map(|param| match param {
                    GenericParam::Type(tp) => Some(tp.clone()),
                    _ => None,
                })
                .unwrap_or_else(|| TypeParam::from(vars.subject.clone()));
            Rendering::Extension {
                trait_ident: extension_trait_ident(&descriptor.container, &descriptor.method),
                subject,
            }
        }
        _ => Rendering::Inherent,
    };

    AccessorDecl {
        method: descriptor.method.clone(),
        pattern,
        generics,
        receiver,
        payload,
        result,
        constructor: pattern.wrapper_path(runtime),
        member: descriptor.payload_member.member.clone(),
        rendering,
    }
}

/// Pass-through parameters followed by the entry's free variables, with
/// every lifetime hoisted to the front.
fn impl_generics(
    pass_through: &[GenericParam],
    free: &[GenericParam],
    descriptor: &TargetDescriptor,
) -> Generics {
    let is_lifetime = |p: &&GenericParam| matches!(p, GenericParam::Lifetime(_));
    let lifetimes = pass_through.iter().filter(is_lifetime).chain(free.iter().filter(is_lifetime));
    let others = pass_through
        .iter()
        .filter(|p| !is_lifetime(p))
        .chain(free.iter().filter(|p| !is_lifetime(p)));

    let mut generics = Generics::default();
    generics.params = lifetimes.chain(others).cloned().collect();
    if !generics.params.is_empty() {
        generics.lt_token = Some(Default::default());
        generics.gt_token = Some(Default::default());
    }
    generics.where_clause = descriptor.where_clause.clone();
    generics
}

/// Names for the entry's free variables that do not collide with the
/// container's own parameters: `U`, then `U1`, `U2`, ...
fn fresh_vars(container: &ContainerDecl) -> FreeVars {
    let taken: HashSet<String> = container
        .generics
        .params
        .iter()
        .map(|param| match param {
            GenericParam::Type(tp) => tp.ident.to_string(),
            GenericParam::Lifetime(lt) => lt.lifetime.ident.to_string(),
            GenericParam::Const(cp) => cp.ident.to_string(),
        })
        .collect();
    let fresh = |var: FreeVar| -> String {
        let base = var.base_name();
        if !taken.contains(base) {
            return base.to_string();
        }
        let mut suffix = 1;
        loop {
            let candidate = format!("{base}{suffix}");
            if !taken.contains(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    };
    FreeVars {
        element: format_ident!("{}", fresh(FreeVar::Element)),
        subject: format_ident!("{}", fresh(FreeVar::Subject)),
        lifetime: Lifetime::new(&format!("'{}", fresh(FreeVar::Lifetime)), Span::call_site()),
        len: format_ident!("{}", fresh(FreeVar::Len)),
    }
}

/// `Pair` + `left_should` -> `PairLeftShould`.
pub fn extension_trait_ident(container: &ContainerDecl, method: &Ident) -> Ident {
    let method = method.unraw().to_string();
    let pascal: String = method
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect();
    format_ident!("{}{}", container.ident.unraw(), pascal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ClosedType, Nullability, NumericType, SequenceForm};
    use crate::model::{ContainerRef, SyntaxModel};
    use crate::request::GenerationRequest;
    use crate::resolver::resolve;
    use syn::DeriveInput;

    fn runtime() -> Path {
        parse_quote!(::fluent_should)
    }

    fn emit_for(input: DeriveInput, field: &str, position: usize, enums: &[Type]) -> Vec<AccessorDecl> {
        let model = SyntaxModel::from_derive_input(&input).unwrap();
        let decl = &model.containers()[0];
        let target = ContainerRef::new(vec![decl.ident.to_string()], decl.arity());
        let request = GenerationRequest::new(parse_quote!(value_should), field, target)
            .at_position(position)
            .with_enums(enums.iter().cloned());
        let descriptor = resolve(&request, &model, Catalog::standard()).unwrap();
        emit(&descriptor, Catalog::standard(), &model, &runtime())
    }

    fn find(decls: &[AccessorDecl], pattern: PayloadPattern) -> &AccessorDecl {
        decls.iter().find(|d| d.pattern == pattern).unwrap()
    }

    fn tokens(t: impl ToTokens) -> String {
        t.to_token_stream().to_string()
    }

    #[test]
    fn one_declaration_per_entry_without_enums() {
        let decls = emit_for(parse_quote! { struct Maybe<T> { value: T } }, "value", 0, &[]);
        assert_eq!(decls.len(), Catalog::standard().len() - 2);
        assert_eq!(
            decls
                .iter()
                .filter(|d| matches!(d.rendering, Rendering::Extension { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn enum_entries_repeat_per_enum() {
        let enums = [parse_quote!(Color), parse_quote!(Level)];
        let decls = emit_for(parse_quote! { struct Maybe<T> { value: T } }, "value", 0, &enums);
        assert_eq!(decls.len(), Catalog::standard().len() + 2);
        let receivers: Vec<String> = decls
            .iter()
            .filter(|d| matches!(d.pattern, PayloadPattern::Enum(_)))
            .map(|d| tokens(&d.receiver))
            .collect();
        assert_eq!(
            receivers,
            vec![
                "Maybe < Color >",
                "Maybe < Level >",
                "Maybe < :: std :: option :: Option < Color > >",
                "Maybe < :: std :: option :: Option < Level > >",
            ]
        );
    }

    #[test]
    fn closed_entry_for_arity_one() {
        let decls = emit_for(parse_quote! { struct Maybe<T> { value: T } }, "value", 0, &[]);
        let text = find(&decls, PayloadPattern::Closed(ClosedType::Text, Nullability::NonNull));
        let expected = quote! {
            impl Maybe< ::std::string::String > {
                #[inline]
                pub fn value_should(&self) -> ::fluent_should::StringAssertions<'_> {
                    ::fluent_should::StringAssertions::new(&self.value)
                }
            }
        };
        assert_eq!(tokens(text), expected.to_string());
    }

    #[test]
    fn pass_through_parameters_are_threaded_for_every_entry() {
        let decls = emit_for(
            parse_quote! { struct Pair<L, R: Clone> where R: Default { left: L, right: R } },
            "left",
            0,
            &[],
        );
        for decl in &decls {
            let generics = tokens(&decl.generics.params);
            assert!(
                generics.starts_with("R : Clone") || generics.contains(", R : Clone"),
                "{generics}"
            );
            assert!(tokens(&decl.receiver).ends_with(", R >"), "{}", tokens(&decl.receiver));
            assert_eq!(tokens(&decl.generics.where_clause), "where R : Default");
        }
        let numeric = find(&decls, PayloadPattern::Numeric(NumericType::I32, Nullability::NonNull));
        assert_eq!(
            tokens(numeric),
            quote! {
                impl<R: Clone> Pair<i32, R> where R: Default {
                    #[inline]
                    pub fn value_should(&self) -> ::fluent_should::NumericAssertions<'_, i32> {
                        ::fluent_should::NumericAssertions::new(&self.left)
                    }
                }
            }
            .to_string()
        );
    }

    #[test]
    fn structural_entries_introduce_their_free_variables() {
        let decls = emit_for(
            parse_quote! { struct Pair<'x, L, R> { left: L, right: &'x R } },
            "left",
            0,
            &[],
        );
        let array = find(&decls, PayloadPattern::Structural(SequenceForm::Array));
        assert_eq!(tokens(&array.generics.params), "'x , R , U , const N : usize");
        assert_eq!(tokens(&array.receiver), "Pair < 'x , [U ; N] , R >");
        assert_eq!(
            tokens(&array.result),
            ":: fluent_should :: GenericCollectionAssertions < '_ , U >"
        );

        let slice = find(&decls, PayloadPattern::Structural(SequenceForm::Slice));
        assert_eq!(tokens(&slice.generics.params), "'x , 'a , R , U");
        assert_eq!(tokens(&slice.receiver), "Pair < 'x , & 'a [U] , R >");
    }

    #[test]
    fn free_variables_avoid_container_parameter_names() {
        let decls = emit_for(
            parse_quote! { struct Clash<'a, T, U, N> { value: T, u: U, n: N, r: &'a () } },
            "value",
            0,
            &[],
        );
        let slice = find(&decls, PayloadPattern::Structural(SequenceForm::Slice));
        assert_eq!(tokens(&slice.generics.params), "'a , 'a1 , U , N , U1");
        let array = find(&decls, PayloadPattern::Structural(SequenceForm::Array));
        assert_eq!(tokens(&array.receiver), "Clash < 'a , [U1 ; N1] , U , N >");
        let fallback = find(&decls, PayloadPattern::Fallback);
        assert_eq!(tokens(&fallback.receiver), "Clash < 'a , T1 , U , N >");
    }

    #[test]
    fn fallback_is_an_extension_trait() {
        let decls = emit_for(
            parse_quote! { struct Pair<L, R> { left: L, right: R } },
            "right",
            1,
            &[],
        );
        let fallback = find(&decls, PayloadPattern::Fallback);
        assert_eq!(
            tokens(fallback),
            quote! {
                pub trait PairValueShould<T> {
                    fn value_should(&self) -> ::fluent_should::ObjectAssertions<'_, T>;
                }

                impl<L, T> PairValueShould<T> for Pair<L, T> {
                    #[inline]
                    fn value_should(&self) -> ::fluent_should::ObjectAssertions<'_, T> {
                        ::fluent_should::ObjectAssertions::new(&self.right)
                    }
                }
            }
            .to_string()
        );
    }

    #[test]
    fn unsized_payload_keeps_maybe_sized_on_the_fallback() {
        let decls = emit_for(
            parse_quote! { struct Holder<T: ?Sized> { value: T } },
            "value",
            0,
            &[],
        );
        let fallback = find(&decls, PayloadPattern::Fallback);
        assert_eq!(tokens(&fallback.generics.params), "T1 : ? Sized");
        let text = find(&decls, PayloadPattern::Closed(ClosedType::Text, Nullability::NonNull));
        assert!(text.generics.params.is_empty());
    }

    #[test]
    fn tuple_struct_payload_reads_the_index() {
        let decls = emit_for(parse_quote! { struct Wrapper<T>(T); }, "0", 0, &[]);
        let boolean = find(&decls, PayloadPattern::Closed(ClosedType::Boolean, Nullability::Nullable));
        assert!(tokens(boolean).contains("NullableBooleanAssertions :: new (& self . 0)"));
    }

    #[test]
    fn trait_names_are_pascal_cased() {
        let input: DeriveInput = parse_quote! { struct Outcome<T> { value: T } };
        let model = SyntaxModel::from_derive_input(&input).unwrap();
        let ident = extension_trait_ident(&model.containers()[0], &parse_quote!(value_should));
        assert_eq!(ident, "OutcomeValueShould");
    }
}
