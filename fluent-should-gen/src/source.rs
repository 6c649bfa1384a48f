//! Front end for whole source files, for build scripts that generate the
//! accessors ahead of compilation.

use std::fs;
use std::path::{Path as FsPath, PathBuf};

use syn::{Attribute, Item};
use thiserror::Error;

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::model::{ContainerRef, SyntaxModel};
use crate::request::{GenerationRequest, RequestArgs};
use crate::{Generation, GeneratorOptions, generate};

/// Name of the attribute that marks a request in a source file.
pub const ATTRIBUTE: &str = "generate_accessors";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read `{path}`")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write `{path}`")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: syn::Error,
    },
}

/// Parses `source` as a crate root and generates every request annotated
/// with `#[generate_accessors(..)]`. Only a file that does not parse is an
/// error; a bad annotation becomes a diagnostic for that request alone.
pub fn generate_source(source: &str, options: &GeneratorOptions) -> syn::Result<Generation> {
    let file = syn::parse_file(source)?;
    Ok(generate_file(&file, options))
}

pub fn generate_file(file: &syn::File, options: &GeneratorOptions) -> Generation {
    let model = SyntaxModel::from_file(file);
    let mut requests = Vec::new();
    let mut undecoded = Vec::new();
    collect_requests(&file.items, &mut Vec::new(), &mut requests, &mut undecoded);
    tracing::debug!(
        requests = requests.len(),
        undecoded = undecoded.len(),
        "collected annotated requests"
    );

    let mut generation = generate(&requests, &model, options);
    for diagnostic in &undecoded {
        tracing::warn!(kind = %diagnostic.kind, "{}", diagnostic.reason);
    }
    undecoded.append(&mut generation.diagnostics);
    generation.diagnostics = undecoded;
    generation
}

/// Reads `input`, generates its accessors and writes them to `output`.
/// Requests that fail to decode or resolve are written out as
/// `compile_error!` invocations next to the accessors of the others.
pub fn generate_path(
    input: impl AsRef<FsPath>,
    output: impl AsRef<FsPath>,
    options: &GeneratorOptions,
) -> Result<Generation, SourceError> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let source = fs::read_to_string(input).map_err(|source| SourceError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let generation = generate_source(&source, options).map_err(|source| SourceError::Parse {
        path: input.to_path_buf(),
        source,
    })?;
    fs::write(output, generation.to_source()).map_err(|source| SourceError::Write {
        path: output.to_path_buf(),
        source,
    })?;
    Ok(generation)
}

fn collect_requests(
    items: &[Item],
    module_path: &mut Vec<String>,
    requests: &mut Vec<GenerationRequest>,
    undecoded: &mut Vec<Diagnostic>,
) {
    for item in items {
        let own = match item {
            Item::Struct(item) => {
                let mut segments = module_path.clone();
                segments.push(item.ident.to_string());
                Some(ContainerRef::new(segments, item.generics.type_params().count()))
            }
            _ => None,
        };
        for attr in item_attrs(item).iter().filter(|attr| is_request(attr)) {
            // An explicit target may point anywhere; without one the
            // request is for the struct it is attached to.
            let decoded = match RequestArgs::from_attribute(attr) {
                Ok(args) => {
                    let own = if args.target.is_some() { None } else { own.as_ref() };
                    args.decode(own)
                }
                Err(err) => Err(Diagnostic::undecoded(DiagnosticKind::MalformedRequest, None, &err)),
            };
            match decoded {
                Ok(request) => requests.push(request),
                Err(diagnostic) => undecoded.push(diagnostic),
            }
        }
        if let Item::Mod(module) = item {
            if let Some((_, content)) = &module.content {
                module_path.push(module.ident.to_string());
                collect_requests(content, module_path, requests, undecoded);
                module_path.pop();
            }
        }
    }
}

fn is_request(attr: &Attribute) -> bool {
    attr.path()
        .segments
        .last()
        .is_some_and(|seg| seg.ident == ATTRIBUTE)
}

fn item_attrs(item: &Item) -> &[Attribute] {
    match item {
        Item::Const(item) => &item.attrs,
        Item::Enum(item) => &item.attrs,
        Item::ExternCrate(item) => &item.attrs,
        Item::Fn(item) => &item.attrs,
        Item::ForeignMod(item) => &item.attrs,
        Item::Impl(item) => &item.attrs,
        Item::Macro(item) => &item.attrs,
        Item::Mod(item) => &item.attrs,
        Item::Static(item) => &item.attrs,
        Item::Struct(item) => &item.attrs,
        Item::Trait(item) => &item.attrs,
        Item::TraitAlias(item) => &item.attrs,
        Item::Type(item) => &item.attrs,
        Item::Union(item) => &item.attrs,
        Item::Use(item) => &item.attrs,
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;

    #[test]
    fn collects_requests_from_any_item_and_nested_modules() {
        let source = r#"
            pub struct Maybe<T> { pub value: T }

            #[generate_accessors(method = "value_should", field = "value", target = "Maybe`1")]
            pub struct MaybeExtensions;

            pub mod pairs {
                #[fluent_should_derive::generate_accessors(method = "left_should", field = "left")]
                pub struct Pair<L, R> { pub left: L, pub right: R }
            }
        "#;
        let generation = generate_source(source, &GeneratorOptions::default()).unwrap();
        assert!(generation.diagnostics.is_empty(), "{:?}", generation.diagnostics);
        let methods: Vec<String> = generation
            .declarations
            .iter()
            .map(|d| d.method.to_string())
            .collect();
        assert!(methods.iter().any(|m| m == "value_should"));
        assert!(methods.iter().any(|m| m == "left_should"));
    }

    #[test]
    fn unresolved_requests_become_diagnostics() {
        let source = r#"
            #[generate_accessors(method = "value_should", field = "value", target = "Missing`1")]
            pub fn anchor() {}
        "#;
        let generation = generate_source(source, &GeneratorOptions::default()).unwrap();
        assert!(generation.declarations.is_empty());
        assert_eq!(generation.diagnostics.len(), 1);
        assert_eq!(
            generation.diagnostics[0].kind,
            DiagnosticKind::TargetTypeUnresolved
        );
        assert!(generation.to_source().contains("compile_error"));
    }

    #[test]
    fn malformed_annotations_only_affect_their_own_request() {
        let source = r#"
            pub struct Maybe<T> { pub value: T }

            #[generate_accessors(method = "value_should", field = "value", target = "Maybe`1")]
            #[generate_accessors(method = "a", field = "value", target = "Maybe")]
            pub struct One;
            #[generate_accessors(method = "b", bogus = 1)]
            pub struct Two;
            pub mod nested {
                #[generate_accessors(field = "value", target = "Maybe`1")]
                pub struct Three;
            }
        "#;
        let generation = generate_source(source, &GeneratorOptions::default()).unwrap();
        let kinds: Vec<DiagnosticKind> = generation.diagnostics.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DiagnosticKind::TargetTypeUnresolved,
                DiagnosticKind::MalformedRequest,
                DiagnosticKind::MalformedRequest,
            ]
        );
        assert!(generation.diagnostics[0].reason.contains("has no arity"));
        assert!(generation.diagnostics[1].reason.contains("unsupported key"));
        assert!(generation.diagnostics[2].reason.contains("missing `method"));

        assert!(!generation.declarations.is_empty());
        assert!(generation.declarations.iter().all(|d| d.method == "value_should"));
        let source = generation.to_source();
        assert_eq!(source.matches("compile_error").count(), 3);
    }

    #[test]
    fn unparsable_files_still_fail() {
        assert!(generate_source("pub struct {", &GeneratorOptions::default()).is_err());
    }

    #[test]
    fn generate_path_writes_the_output_file() {
        let dir = std::env::temp_dir().join(format!("fluent-should-gen-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let input = dir.join("containers.rs");
        let output = dir.join("accessors.rs");
        fs::write(
            &input,
            r#"
                #[generate_accessors(method = "value_should", field = "value")]
                pub struct Maybe<T> { value: T }
            "#,
        )
        .unwrap();

        let generation = generate_path(&input, &output, &GeneratorOptions::default()).unwrap();
        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(written, generation.to_source());
        assert!(written.contains("impl crate :: Maybe < bool >"));

        let missing = generate_path(dir.join("missing.rs"), &output, &GeneratorOptions::default());
        assert!(matches!(missing, Err(SourceError::Read { .. })));
        fs::remove_dir_all(&dir).unwrap();
    }
}
