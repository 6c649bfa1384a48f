use fluent_should_gen::{ContainerRef, GeneratorOptions, RequestArgs, SyntaxModel, generate};
use proc_macro::TokenStream;
use quote::ToTokens;
use syn::{DeriveInput, Item, parse_macro_input, spanned::Spanned};

/// Generates the accessor set for each `#[should(...)]` request on a generic
/// struct.
///
/// ```ignore
/// #[derive(Should)]
/// #[should(method = "left_should", field = "left")]
/// #[should(method = "right_should", field = "right", position = 1)]
/// struct Pair<L, R> {
///     left: L,
///     right: R,
/// }
///
/// pair_of_int_and_text.left_should().be_greater_than(&0);
/// pair_of_int_and_text.right_should().start_with("a");
/// ```
///
/// Keys: `method` and `field` are required; `position` (default 0) picks the
/// type parameter holding the payload; `enums(..)` lists enum types the
/// payload may be; `crate = ".."` overrides the runtime path. A request that
/// cannot be resolved becomes a `compile_error!` without affecting the others.
#[proc_macro_derive(Should, attributes(should))]
pub fn derive_should(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_should(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_should(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let model = SyntaxModel::from_derive_input(input)?;
    let own = ContainerRef::new(
        vec![input.ident.to_string()],
        input.generics.type_params().count(),
    );

    let mut options = GeneratorOptions::default();
    let mut requests = Vec::new();
    let mut errors: Option<syn::Error> = None;
    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("should")) {
        let parsed = RequestArgs::from_attribute(attr).and_then(|args| {
            if args.is_options_only() {
                if let Some(runtime) = args.runtime_path()? {
                    options = options.clone().with_runtime(runtime);
                }
                Ok(None)
            } else {
                args.into_request(Some(&own)).map(Some)
            }
        });
        match parsed {
            Ok(Some(request)) => requests.push(request),
            Ok(None) => {}
            Err(err) => match &mut errors {
                Some(existing) => existing.combine(err),
                None => errors = Some(err),
            },
        }
    }

    if requests.is_empty() && errors.is_none() {
        return Err(syn::Error::new(
            input.ident.span(),
            "Should derive needs at least one #[should(method = \"..\", field = \"..\")]",
        ));
    }

    let generation = generate(&requests, &model, &options);
    let mut tokens = generation.to_token_stream();
    if let Some(errors) = errors {
        tokens.extend(errors.to_compile_error());
    }
    Ok(tokens)
}

/// Marks a request for the source-file generator
/// (`fluent_should_gen::generate_path`). The item is passed through
/// unchanged; the arguments are only checked for well-formedness.
#[proc_macro_attribute]
pub fn generate_accessors(args: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(args as RequestArgs);
    let passthrough = proc_macro2::TokenStream::from(item.clone());
    let parsed = parse_macro_input!(item as Item);

    let own = match &parsed {
        Item::Struct(s) if args.target.is_none() => Some(ContainerRef::new(
            vec![s.ident.to_string()],
            s.generics.type_params().count(),
        )),
        _ => None,
    };
    if args.target.is_none() && own.is_none() {
        return syn::Error::new(
            parsed.span(),
            "generate_accessors needs `target = \"module::Type`N\"` unless it is on a struct",
        )
        .to_compile_error()
        .into();
    }

    match args.into_request(own.as_ref()) {
        Ok(_) => passthrough.into(),
        Err(err) => {
            let mut tokens = err.to_compile_error();
            tokens.extend(passthrough);
            tokens.into()
        }
    }
}
