//! Generates overloaded `*_should()` accessors for generic containers.
//!
//! Given a container such as `Pair<L, R>`, the payload field `left: L` and
//! the method name `left_should`, the generator emits one accessor per entry
//! of the [`Catalog`]: `Pair<i32, R>` gets `left_should() ->
//! NumericAssertions<'_, i32>`, `Pair<String, R>` gets `StringAssertions`,
//! `Pair<Vec<U>, R>` gets `GenericCollectionAssertions<'_, U>` and so on,
//! with an extension trait answering for every other payload.
//!
//! The choice is made by the compiler when the accessor is called; nothing is
//! dispatched at runtime.
//!
//! ```
//! use fluent_should_gen::{GeneratorOptions, generate_source};
//!
//! let generation = generate_source(
//!     r#"
//!     #[generate_accessors(method = "left_should", field = "left")]
//!     pub struct Pair<L, R> { pub left: L, pub right: R }
//!     "#,
//!     &GeneratorOptions::default(),
//! )
//! .unwrap();
//! assert!(generation.diagnostics.is_empty());
//! assert!(generation.to_source().contains("NumericAssertions"));
//! ```

use proc_macro2::TokenStream;
use quote::{ToTokens, TokenStreamExt};
use syn::{Path, parse_quote};

pub mod catalog;
pub mod diagnostics;
pub mod emitter;
pub mod model;
pub mod request;
pub mod resolver;
pub mod source;

pub use catalog::{Catalog, CatalogEntry, CatalogError, PayloadPattern};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use emitter::{AccessorDecl, Rendering, emit};
pub use model::{ContainerDecl, ContainerRef, ContainerRefError, Member, SyntaxModel, TypeModel};
pub use request::{GenerationRequest, RequestArgs};
pub use resolver::{TargetDescriptor, resolve};
pub use source::{SourceError, generate_file, generate_path, generate_source};

/// Settings shared by every request of a generation run.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Path generated code uses to name the assertion wrappers.
    pub runtime: Path,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            runtime: parse_quote!(::fluent_should),
        }
    }
}

impl GeneratorOptions {
    pub fn with_runtime(mut self, runtime: Path) -> Self {
        self.runtime = runtime;
        self
    }
}

/// Output of one run: every declaration of every resolved request, plus a
/// diagnostic per request that could not be resolved.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    pub declarations: Vec<AccessorDecl>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Generation {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn to_source(&self) -> String {
        self.to_token_stream().to_string()
    }
}

impl ToTokens for Generation {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.append_all(&self.declarations);
        for diagnostic in &self.diagnostics {
            tokens.extend(diagnostic.to_compile_error());
        }
    }
}

/// Resolves and emits every request against `model`. Requests are
/// independent: a failing one contributes a diagnostic and nothing else.
/// Repeated requests are emitted once.
pub fn generate(
    requests: &[GenerationRequest],
    model: &impl TypeModel,
    options: &GeneratorOptions,
) -> Generation {
    let catalog = Catalog::standard();
    let mut generation = Generation::default();
    let mut seen: Vec<&GenerationRequest> = Vec::with_capacity(requests.len());

    for request in requests {
        if seen.contains(&request) {
            tracing::warn!(
                method = %request.method,
                target = %request.container,
                "ignoring repeated accessor request"
            );
            continue;
        }
        seen.push(request);

        match resolve(request, model, catalog) {
            Ok(descriptor) => generation
                .declarations
                .extend(emit(&descriptor, catalog, model, &options.runtime)),
            Err(diagnostic) => {
                tracing::warn!(kind = %diagnostic.kind, "{}", diagnostic.reason);
                generation.diagnostics.push(diagnostic);
            }
        }
    }
    generation
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair_model() -> SyntaxModel {
        SyntaxModel::from_derive_input(&parse_quote! {
            struct Pair<L, R> { left: L, right: R }
        })
        .unwrap()
    }

    fn request(method: &str, field: &str, position: usize) -> GenerationRequest {
        GenerationRequest::new(
            syn::Ident::new(method, proc_macro2::Span::call_site()),
            field,
            "Pair`2".parse().unwrap(),
        )
        .at_position(position)
    }

    #[test]
    fn failing_requests_do_not_stop_the_others() {
        let requests = [
            request("left_should", "left", 0),
            request("broken", "missing", 0),
            request("right_should", "right", 1),
        ];
        let generation = generate(&requests, &pair_model(), &GeneratorOptions::default());
        assert_eq!(generation.diagnostics.len(), 1);
        assert!(!generation.is_clean());
        let per_request = Catalog::standard().len() - 2;
        assert_eq!(generation.declarations.len(), 2 * per_request);
    }

    #[test]
    fn repeated_requests_are_emitted_once() {
        let requests = [request("left_should", "left", 0), request("left_should", "left", 0)];
        let generation = generate(&requests, &pair_model(), &GeneratorOptions::default());
        assert!(generation.is_clean());
        assert_eq!(generation.declarations.len(), Catalog::standard().len() - 2);
    }

    #[test]
    fn runtime_path_is_configurable() {
        let options = GeneratorOptions::default().with_runtime(parse_quote!(crate::assertions));
        let generation = generate(&[request("left_should", "left", 0)], &pair_model(), &options);
        let source = generation.to_source();
        assert!(source.contains("crate :: assertions :: StringAssertions"));
        assert!(!source.contains("fluent_should"));
    }

    #[test]
    fn request_runtime_overrides_the_options() {
        let mut request = request("left_should", "left", 0);
        request.runtime = Some(parse_quote!(other));
        let generation = generate(&[request], &pair_model(), &GeneratorOptions::default());
        assert!(generation.to_source().contains("other :: StringAssertions"));
    }
}
