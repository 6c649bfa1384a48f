//! The container-type model requests are resolved against.

use std::fmt;
use std::str::FromStr;

use proc_macro2::Span;
use quote::ToTokens;
use syn::{
    Data, DeriveInput, Fields, GenericArgument, GenericParam, Generics, Ident, Index, Item,
    Member as FieldMember, Path, PathArguments, Type, TypeParam, Visibility, parse_quote,
    punctuated::Punctuated,
};
use thiserror::Error;

/// A container named by path and type-parameter count, written
/// ``"module::Type`N"``.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerRef {
    pub segments: Vec<String>,
    pub arity: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerRefError {
    #[error("container reference is empty")]
    Empty,
    #[error("container reference `{0}` has no arity, expected `Name`N`")]
    MissingArity(String),
    #[error("container reference `{0}` has an invalid arity")]
    InvalidArity(String),
    #[error("`{0}` is not a valid path segment")]
    InvalidSegment(String),
}

impl ContainerRef {
    pub fn new(segments: Vec<String>, arity: usize) -> Self {
        ContainerRef { segments, arity }
    }

    pub fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }
}

impl FromStr for ContainerRef {
    type Err = ContainerRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ContainerRefError::Empty);
        }
        let (path, arity) = s
            .rsplit_once('`')
            .ok_or_else(|| ContainerRefError::MissingArity(s.to_string()))?;
        let arity = arity
            .parse::<usize>()
            .map_err(|_| ContainerRefError::InvalidArity(s.to_string()))?;

        let mut segments: Vec<String> = path.split("::").map(|seg| seg.trim().to_string()).collect();
        if segments.first().is_some_and(|seg| seg.is_empty() || seg == "crate") {
            segments.remove(0);
        }
        if segments.is_empty() {
            return Err(ContainerRefError::Empty);
        }
        for seg in &segments {
            if syn::parse_str::<Ident>(seg).is_err() {
                return Err(ContainerRefError::InvalidSegment(seg.clone()));
            }
        }
        Ok(ContainerRef { segments, arity })
    }
}

impl fmt::Display for ContainerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}`{}", self.segments.join("::"), self.arity)
    }
}

/// One field of a container.
#[derive(Debug, Clone)]
pub struct Member {
    pub member: FieldMember,
    pub ty: Type,
    /// Whether generated code placed next to the model's root can read it.
    pub accessible: bool,
}

impl Member {
    pub fn name(&self) -> String {
        match &self.member {
            FieldMember::Named(ident) => ident.to_string(),
            FieldMember::Unnamed(index) => index.index.to_string(),
        }
    }
}

/// A struct declaration the generator can attach accessors to.
#[derive(Debug, Clone)]
pub struct ContainerDecl {
    pub ident: Ident,
    /// Modules between the model root and the declaration.
    pub module_path: Vec<Ident>,
    /// How generated code names the container.
    pub path: Path,
    pub generics: Generics,
    pub members: Vec<Member>,
}

impl ContainerDecl {
    pub fn type_params(&self) -> impl Iterator<Item = &TypeParam> {
        self.generics.type_params()
    }

    /// Number of type parameters; lifetimes and consts are not counted.
    pub fn arity(&self) -> usize {
        self.type_params().count()
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name() == name)
    }

    /// The container type with its `position`-th type parameter replaced by
    /// `payload` and every other parameter passed through by name.
    pub fn instantiate(&self, position: usize, payload: &Type) -> Type {
        let mut type_index = 0;
        let args: Punctuated<GenericArgument, syn::Token![,]> = self
            .generics
            .params
            .iter()
            .map(|param| match param {
                GenericParam::Lifetime(lt) => GenericArgument::Lifetime(lt.lifetime.clone()),
                GenericParam::Type(tp) => {
                    let arg = if type_index == position {
                        GenericArgument::Type(payload.clone())
                    } else {
                        let ident = &tp.ident;
                        GenericArgument::Type(parse_quote!(#ident))
                    };
                    type_index += 1;
                    arg
                }
                GenericParam::Const(cp) => {
                    let ident = &cp.ident;
                    GenericArgument::Type(parse_quote!(#ident))
                }
            })
            .collect();

        let mut path = self.path.clone();
        if !args.is_empty() {
            if let Some(last) = path.segments.last_mut() {
                last.arguments = PathArguments::AngleBracketed(parse_quote!(<#args>));
            }
        }
        Type::Path(syn::TypePath { qself: None, path })
    }
}

/// What the resolver needs to know about the types visible to the generator.
pub trait TypeModel {
    fn resolve_type(&self, target: &ContainerRef) -> Option<&ContainerDecl>;

    /// Enum types the catalog's enum entries are instantiated for.
    fn enum_types(&self) -> &[Type];

    fn resolve_member<'d>(&self, decl: &'d ContainerDecl, name: &str) -> Option<&'d Member> {
        decl.member(name)
    }

    fn substitute_generic(&self, decl: &ContainerDecl, position: usize, payload: &Type) -> Type {
        decl.instantiate(position, payload)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// A single derive input; requests may name it by its bare name.
    Derive,
    /// Every item of a crate root file, matched by full path.
    Crate,
}

/// `TypeModel` built from parsed syntax.
#[derive(Debug, Clone)]
pub struct SyntaxModel {
    containers: Vec<ContainerDecl>,
    enums: Vec<Type>,
    scope: Scope,
}

impl SyntaxModel {
    /// Model of the struct a derive is attached to. All of its members are
    /// readable by code emitted next to it.
    pub fn from_derive_input(input: &DeriveInput) -> syn::Result<Self> {
        let fields = match &input.data {
            Data::Struct(data) => &data.fields,
            Data::Enum(data) => {
                return Err(syn::Error::new(
                    data.enum_token.span,
                    "Should can only be derived for structs",
                ));
            }
            Data::Union(data) => {
                return Err(syn::Error::new(
                    data.union_token.span,
                    "Should can only be derived for structs",
                ));
            }
        };
        let ident = &input.ident;
        let container = ContainerDecl {
            ident: ident.clone(),
            module_path: Vec::new(),
            path: parse_quote!(#ident),
            generics: input.generics.clone(),
            members: members(fields, |_| true),
        };
        Ok(SyntaxModel {
            containers: vec![container],
            enums: Vec::new(),
            scope: Scope::Derive,
        })
    }

    /// Model of every struct and enum reachable from the root of `file`,
    /// inline modules included. Generated code is assumed to be placed at
    /// that root.
    pub fn from_file(file: &syn::File) -> Self {
        let mut model = SyntaxModel {
            containers: Vec::new(),
            enums: Vec::new(),
            scope: Scope::Crate,
        };
        model.collect(&file.items, &mut Vec::new());
        tracing::debug!(
            containers = model.containers.len(),
            enums = model.enums.len(),
            "built syntax model"
        );
        model
    }

    fn collect(&mut self, items: &[Item], module_path: &mut Vec<Ident>) {
        for item in items {
            match item {
                Item::Struct(item) if reaches_root(&item.vis, module_path) => {
                    let ident = &item.ident;
                    let path = crate_path(module_path, ident);
                    let here: &[Ident] = module_path;
                    let fields = members(&item.fields, |vis| reaches_root(vis, here));
                    self.containers.push(ContainerDecl {
                        ident: ident.clone(),
                        module_path: module_path.clone(),
                        path,
                        generics: item.generics.clone(),
                        members: fields,
                    });
                }
                Item::Enum(item)
                    if reaches_root(&item.vis, module_path) && item.generics.params.is_empty() =>
                {
                    let path = crate_path(module_path, &item.ident);
                    self.enums.push(Type::Path(syn::TypePath { qself: None, path }));
                }
                Item::Mod(item) if reaches_root(&item.vis, module_path) => {
                    if let Some((_, content)) = &item.content {
                        module_path.push(item.ident.clone());
                        self.collect(content, module_path);
                        module_path.pop();
                    }
                }
                _ => {}
            }
        }
    }

    pub fn containers(&self) -> &[ContainerDecl] {
        &self.containers
    }
}

impl TypeModel for SyntaxModel {
    fn resolve_type(&self, target: &ContainerRef) -> Option<&ContainerDecl> {
        self.containers.iter().find(|decl| {
            decl.arity() == target.arity
                && match self.scope {
                    Scope::Derive => decl.ident == target.name(),
                    Scope::Crate => {
                        decl.module_path.len() + 1 == target.segments.len()
                            && decl
                                .module_path
                                .iter()
                                .zip(&target.segments)
                                .all(|(a, b)| a == b)
                            && decl.ident == target.name()
                    }
                }
        })
    }

    fn enum_types(&self) -> &[Type] {
        &self.enums
    }
}

fn members(fields: &Fields, accessible: impl Fn(&Visibility) -> bool) -> Vec<Member> {
    fields
        .iter()
        .enumerate()
        .map(|(i, field)| Member {
            member: match &field.ident {
                Some(ident) => FieldMember::Named(ident.clone()),
                None => FieldMember::Unnamed(Index {
                    index: i as u32,
                    span: Span::call_site(),
                }),
            },
            ty: field.ty.clone(),
            accessible: accessible(&field.vis),
        })
        .collect()
}

fn crate_path(module_path: &[Ident], ident: &Ident) -> Path {
    let mut path: Path = parse_quote!(crate);
    for module in module_path {
        path.segments.push(module.clone().into());
    }
    path.segments.push(ident.clone().into());
    path
}

/// Whether an item declared in `module_path` can be named from the crate
/// root. `pub(in ..)`, `pub(super)` and `pub(self)` are resolved against
/// `module_path`; the item reaches the root when the module it is visible in
/// is the root itself.
fn reaches_root(vis: &Visibility, module_path: &[Ident]) -> bool {
    match vis {
        Visibility::Public(_) => true,
        Visibility::Inherited => module_path.is_empty(),
        Visibility::Restricted(restricted) => {
            let mut depth = module_path.len();
            for (i, seg) in restricted.path.segments.iter().enumerate() {
                if seg.ident == "crate" && i == 0 {
                    depth = 0;
                } else if seg.ident == "self" && i == 0 {
                    continue;
                } else if seg.ident == "super" {
                    match depth.checked_sub(1) {
                        Some(parent) => depth = parent,
                        None => return false,
                    }
                } else {
                    depth += 1;
                }
            }
            depth == 0
        }
    }
}
