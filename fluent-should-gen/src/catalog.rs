//! The fixed table of payload shapes.
//!
//! Every entry maps a payload pattern (the type sitting at the container's
//! fixed generic position) to the assertion wrapper the generated accessor
//! returns. Entries are pairwise disjoint: no concrete payload type matches
//! two non-fallback entries, which is what lets the emitted inherent impls
//! sit side by side without rustc reporting duplicate definitions.

use std::sync::LazyLock;

use proc_macro2::Span;
use quote::{ToTokens, format_ident};
use syn::{
    GenericArgument, GenericParam, Ident, Lifetime, LifetimeParam, Path, PathArguments,
    PathSegment, Type, TypeParamBound, parse_quote,
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nullability {
    NonNull,
    /// The payload is `Option<_>` of the underlying shape.
    Nullable,
}

/// Closed types with a dedicated, non-generic assertion wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClosedType {
    Text,
    Boolean,
    Date,
    TimeOfDay,
    Timestamp,
    TimestampWithOffset,
    Uuid,
    Duration,
    TypeDescriptor,
    Layout,
    Location,
    // Universal object type; it has no nullable counterpart.
    Object,
}

impl ClosedType {
    pub const ALL: [ClosedType; 12] = [
        ClosedType::Text,
        ClosedType::Boolean,
        ClosedType::Date,
        ClosedType::TimeOfDay,
        ClosedType::Timestamp,
        ClosedType::TimestampWithOffset,
        ClosedType::Uuid,
        ClosedType::Duration,
        ClosedType::TypeDescriptor,
        ClosedType::Layout,
        ClosedType::Location,
        ClosedType::Object,
    ];

    pub fn payload_type(self, runtime: &Path) -> Type {
        match self {
            ClosedType::Text => parse_quote!(::std::string::String),
            ClosedType::Boolean => parse_quote!(bool),
            ClosedType::Date => parse_quote!(#runtime::chrono::NaiveDate),
            ClosedType::TimeOfDay => parse_quote!(#runtime::chrono::NaiveTime),
            ClosedType::Timestamp => parse_quote!(#runtime::chrono::NaiveDateTime),
            ClosedType::TimestampWithOffset => {
                parse_quote!(#runtime::chrono::DateTime<#runtime::chrono::FixedOffset>)
            }
            ClosedType::Uuid => parse_quote!(#runtime::uuid::Uuid),
            ClosedType::Duration => parse_quote!(::std::time::Duration),
            ClosedType::TypeDescriptor => parse_quote!(::std::any::TypeId),
            ClosedType::Layout => parse_quote!(::std::alloc::Layout),
            ClosedType::Location => parse_quote!(&'static ::std::panic::Location<'static>),
            ClosedType::Object => parse_quote!(::std::boxed::Box<dyn ::std::any::Any>),
        }
    }

    fn wrapper_stem(self) -> &'static str {
        match self {
            ClosedType::Text => "String",
            ClosedType::Boolean => "Boolean",
            ClosedType::Date => "Date",
            ClosedType::TimeOfDay => "Time",
            ClosedType::Timestamp => "DateTime",
            ClosedType::TimestampWithOffset => "DateTimeOffset",
            ClosedType::Uuid => "Uuid",
            ClosedType::Duration => "Duration",
            ClosedType::TypeDescriptor => "TypeId",
            ClosedType::Layout => "Layout",
            ClosedType::Location => "Location",
            ClosedType::Object => "Object",
        }
    }

    pub fn has_nullable_counterpart(self) -> bool {
        !matches!(self, ClosedType::Object)
    }

    /// Recognises a concrete payload spelled either bare (`String`,
    /// `NaiveDate`) or through the module that defines it
    /// (`std::string::String`, `chrono::NaiveDate`). A look-alike from another
    /// module (`chrono::Duration`, `my::String`) is not this type.
    pub fn matches(self, ty: &Type) -> bool {
        match self {
            ClosedType::Text => is_named(ty, "String", STRING),
            ClosedType::Boolean => is_named(ty, "bool", PRIMITIVE),
            ClosedType::Date => is_named(ty, "NaiveDate", CHRONO),
            ClosedType::TimeOfDay => is_named(ty, "NaiveTime", CHRONO),
            ClosedType::Timestamp => is_named(ty, "NaiveDateTime", CHRONO),
            ClosedType::TimestampWithOffset => single_arg(ty, "DateTime", CHRONO)
                .is_some_and(|offset| is_named(offset, "FixedOffset", CHRONO)),
            ClosedType::Uuid => is_named(ty, "Uuid", UUID),
            ClosedType::Duration => is_named(ty, "Duration", TIME),
            ClosedType::TypeDescriptor => is_named(ty, "TypeId", ANY),
            ClosedType::Layout => is_named(ty, "Layout", ALLOC),
            ClosedType::Location => match strip(ty) {
                Type::Reference(r) if r.mutability.is_none() => type_path(&r.elem)
                    .and_then(|path| path_named(path, "Location", PANIC))
                    .is_some(),
                _ => false,
            },
            ClosedType::Object => single_arg(ty, "Box", BOXED).is_some_and(|inner| match strip(inner) {
                Type::TraitObject(obj) => obj.bounds.iter().any(|bound| match bound {
                    TypeParamBound::Trait(tb) => path_named(&tb.path, "Any", ANY).is_some(),
                    _ => false,
                }),
                _ => false,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericType {
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    Char,
    F32,
    F64,
}

impl NumericType {
    pub const ALL: [NumericType; 15] = [
        NumericType::I8,
        NumericType::I16,
        NumericType::I32,
        NumericType::I64,
        NumericType::I128,
        NumericType::Isize,
        NumericType::U8,
        NumericType::U16,
        NumericType::U32,
        NumericType::U64,
        NumericType::U128,
        NumericType::Usize,
        NumericType::Char,
        NumericType::F32,
        NumericType::F64,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NumericType::I8 => "i8",
            NumericType::I16 => "i16",
            NumericType::I32 => "i32",
            NumericType::I64 => "i64",
            NumericType::I128 => "i128",
            NumericType::Isize => "isize",
            NumericType::U8 => "u8",
            NumericType::U16 => "u16",
            NumericType::U32 => "u32",
            NumericType::U64 => "u64",
            NumericType::U128 => "u128",
            NumericType::Usize => "usize",
            NumericType::Char => "char",
            NumericType::F32 => "f32",
            NumericType::F64 => "f64",
        }
    }

    pub fn payload_type(self) -> Type {
        let ident = Ident::new(self.name(), Span::call_site());
        parse_quote!(#ident)
    }

    pub fn matches(self, ty: &Type) -> bool {
        is_named(ty, self.name(), PRIMITIVE)
    }
}

/// Single-parameter sequence containers recognised by the structural entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceForm {
    Vec,
    VecDeque,
    LinkedList,
    BTreeSet,
    HashSet,
    BinaryHeap,
    BoxedSlice,
    RcSlice,
    ArcSlice,
    Array,
    Slice,
}

impl SequenceForm {
    pub const ALL: [SequenceForm; 11] = [
        SequenceForm::Vec,
        SequenceForm::VecDeque,
        SequenceForm::LinkedList,
        SequenceForm::BTreeSet,
        SequenceForm::HashSet,
        SequenceForm::BinaryHeap,
        SequenceForm::BoxedSlice,
        SequenceForm::RcSlice,
        SequenceForm::ArcSlice,
        SequenceForm::Array,
        SequenceForm::Slice,
    ];

    fn free_vars(self) -> &'static [FreeVar] {
        match self {
            SequenceForm::Array => &[FreeVar::Element, FreeVar::Len],
            SequenceForm::Slice => &[FreeVar::Lifetime, FreeVar::Element],
            _ => &[FreeVar::Element],
        }
    }

    fn payload_type(self, vars: &FreeVars) -> Type {
        let u = &vars.element;
        match self {
            SequenceForm::Vec => parse_quote!(::std::vec::Vec<#u>),
            SequenceForm::VecDeque => parse_quote!(::std::collections::VecDeque<#u>),
            SequenceForm::LinkedList => parse_quote!(::std::collections::LinkedList<#u>),
            SequenceForm::BTreeSet => parse_quote!(::std::collections::BTreeSet<#u>),
            SequenceForm::HashSet => parse_quote!(::std::collections::HashSet<#u>),
            SequenceForm::BinaryHeap => parse_quote!(::std::collections::BinaryHeap<#u>),
            SequenceForm::BoxedSlice => parse_quote!(::std::boxed::Box<[#u]>),
            SequenceForm::RcSlice => parse_quote!(::std::rc::Rc<[#u]>),
            SequenceForm::ArcSlice => parse_quote!(::std::sync::Arc<[#u]>),
            SequenceForm::Array => {
                let n = &vars.len;
                parse_quote!([#u; #n])
            }
            SequenceForm::Slice => {
                let a = &vars.lifetime;
                parse_quote!(&#a [#u])
            }
        }
    }

    /// Element type of a concrete payload of this form.
    pub fn element_of(self, ty: &Type) -> Option<Type> {
        let slice_elem = |inner: &Type| match strip(inner) {
            Type::Slice(slice) => Some((*slice.elem).clone()),
            _ => None,
        };
        match self {
            SequenceForm::Vec => single_arg(ty, "Vec", VEC).cloned(),
            SequenceForm::VecDeque => single_arg(ty, "VecDeque", COLLECTIONS).cloned(),
            SequenceForm::LinkedList => single_arg(ty, "LinkedList", COLLECTIONS).cloned(),
            SequenceForm::BTreeSet => single_arg(ty, "BTreeSet", COLLECTIONS).cloned(),
            SequenceForm::HashSet => single_arg(ty, "HashSet", COLLECTIONS).cloned(),
            SequenceForm::BinaryHeap => single_arg(ty, "BinaryHeap", COLLECTIONS).cloned(),
            SequenceForm::BoxedSlice => single_arg(ty, "Box", BOXED).and_then(slice_elem),
            SequenceForm::RcSlice => single_arg(ty, "Rc", RC).and_then(slice_elem),
            SequenceForm::ArcSlice => single_arg(ty, "Arc", SYNC).and_then(slice_elem),
            SequenceForm::Array => match strip(ty) {
                Type::Array(array) => Some((*array.elem).clone()),
                _ => None,
            },
            SequenceForm::Slice => match strip(ty) {
                Type::Reference(r) if r.mutability.is_none() => slice_elem(&r.elem),
                _ => None,
            },
        }
    }
}

/// A free variable a payload pattern introduces into the accessor's generics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreeVar {
    /// Element type of a structural sequence.
    Element,
    /// The unconstrained payload of the fallback.
    Subject,
    /// Lifetime of a borrowed slice.
    Lifetime,
    /// Length of a fixed-size array.
    Len,
}

impl FreeVar {
    pub fn base_name(self) -> &'static str {
        match self {
            FreeVar::Element => "U",
            FreeVar::Subject => "T",
            FreeVar::Lifetime => "a",
            FreeVar::Len => "N",
        }
    }
}

/// Concrete names chosen for every free variable kind.
#[derive(Debug, Clone)]
pub struct FreeVars {
    pub element: Ident,
    pub subject: Ident,
    pub lifetime: Lifetime,
    pub len: Ident,
}

impl FreeVars {
    pub fn canonical() -> Self {
        FreeVars {
            element: format_ident!("U"),
            subject: format_ident!("T"),
            lifetime: Lifetime::new("'a", Span::call_site()),
            len: format_ident!("N"),
        }
    }

    pub fn generic_param(&self, var: FreeVar) -> GenericParam {
        match var {
            FreeVar::Element => {
                let u = &self.element;
                parse_quote!(#u)
            }
            FreeVar::Subject => {
                let t = &self.subject;
                parse_quote!(#t)
            }
            FreeVar::Lifetime => GenericParam::Lifetime(LifetimeParam::new(self.lifetime.clone())),
            FreeVar::Len => {
                let n = &self.len;
                parse_quote!(const #n: usize)
            }
        }
    }

    fn wildcards(&self) -> [&Ident; 3] {
        [&self.element, &self.subject, &self.len]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadPattern {
    Closed(ClosedType, Nullability),
    Numeric(NumericType, Nullability),
    Enum(Nullability),
    Structural(SequenceForm),
    Fallback,
}

impl PayloadPattern {
    pub fn free_vars(self) -> &'static [FreeVar] {
        match self {
            PayloadPattern::Structural(form) => form.free_vars(),
            PayloadPattern::Fallback => &[FreeVar::Subject],
            _ => &[],
        }
    }

    pub fn nullability(self) -> Nullability {
        match self {
            PayloadPattern::Closed(_, n) | PayloadPattern::Numeric(_, n) | PayloadPattern::Enum(n) => n,
            PayloadPattern::Structural(_) | PayloadPattern::Fallback => Nullability::NonNull,
        }
    }

    /// The same shape with the nullable axis cleared.
    pub fn non_nullable(self) -> PayloadPattern {
        match self {
            PayloadPattern::Closed(c, _) => PayloadPattern::Closed(c, Nullability::NonNull),
            PayloadPattern::Numeric(n, _) => PayloadPattern::Numeric(n, Nullability::NonNull),
            PayloadPattern::Enum(_) => PayloadPattern::Enum(Nullability::NonNull),
            other => other,
        }
    }

    /// Payload type with free variables named by `vars`.
    ///
    /// `enum_ty` instantiates the enum placeholder; without one the enum
    /// family is expressed over the subject variable.
    pub fn payload_type(self, runtime: &Path, vars: &FreeVars, enum_ty: Option<&Type>) -> Type {
        let base = match self {
            PayloadPattern::Closed(c, _) => c.payload_type(runtime),
            PayloadPattern::Numeric(n, _) => n.payload_type(),
            PayloadPattern::Enum(_) => enum_or_subject(vars, enum_ty),
            PayloadPattern::Structural(form) => return form.payload_type(vars),
            PayloadPattern::Fallback => {
                let t = &vars.subject;
                return parse_quote!(#t);
            }
        };
        match self.nullability() {
            Nullability::NonNull => base,
            Nullability::Nullable => parse_quote!(::std::option::Option<#base>),
        }
    }

    pub fn wrapper_ident(self) -> Ident {
        match self {
            PayloadPattern::Closed(c, Nullability::NonNull) => {
                format_ident!("{}Assertions", c.wrapper_stem())
            }
            PayloadPattern::Closed(c, Nullability::Nullable) => {
                format_ident!("Nullable{}Assertions", c.wrapper_stem())
            }
            PayloadPattern::Numeric(_, Nullability::NonNull) => format_ident!("NumericAssertions"),
            PayloadPattern::Numeric(_, Nullability::Nullable) => {
                format_ident!("NullableNumericAssertions")
            }
            PayloadPattern::Enum(Nullability::NonNull) => format_ident!("EnumAssertions"),
            PayloadPattern::Enum(Nullability::Nullable) => format_ident!("NullableEnumAssertions"),
            PayloadPattern::Structural(_) => format_ident!("GenericCollectionAssertions"),
            PayloadPattern::Fallback => format_ident!("ObjectAssertions"),
        }
    }

    /// Path used to construct the wrapper: `#runtime::StringAssertions`.
    pub fn wrapper_path(self, runtime: &Path) -> Path {
        let ident = self.wrapper_ident();
        parse_quote!(#runtime::#ident)
    }

    /// Result type of the accessor, parameterised like the payload pattern.
    pub fn result_type(self, runtime: &Path, vars: &FreeVars, enum_ty: Option<&Type>) -> Type {
        let argument = match self {
            PayloadPattern::Closed(ClosedType::Object, _) => {
                Some(ClosedType::Object.payload_type(runtime))
            }
            PayloadPattern::Closed(..) => None,
            PayloadPattern::Numeric(n, _) => Some(n.payload_type()),
            PayloadPattern::Enum(_) => Some(enum_or_subject(vars, enum_ty)),
            PayloadPattern::Structural(_) => {
                let u = &vars.element;
                Some(parse_quote!(#u))
            }
            PayloadPattern::Fallback => {
                let t = &vars.subject;
                Some(parse_quote!(#t))
            }
        };
        self.result_with(runtime, argument)
    }

    /// Whether a concrete payload type has this shape. `enums` lists the
    /// enum types known to the caller.
    pub fn matches(self, ty: &Type, enums: &[Type]) -> bool {
        let subject = match self.nullability() {
            Nullability::NonNull => ty,
            Nullability::Nullable => match option_inner(ty) {
                Some(inner) => inner,
                None => return false,
            },
        };
        match self {
            PayloadPattern::Closed(c, _) => c.matches(subject),
            PayloadPattern::Numeric(n, _) => n.matches(subject),
            PayloadPattern::Enum(_) => enums.iter().any(|e| same_nominal(e, subject)),
            PayloadPattern::Structural(form) => form.element_of(subject).is_some(),
            PayloadPattern::Fallback => true,
        }
    }

    fn concrete_result(self, runtime: &Path, payload: &Type) -> Type {
        let argument = match self {
            PayloadPattern::Closed(ClosedType::Object, _) => Some(payload.clone()),
            PayloadPattern::Closed(..) => None,
            PayloadPattern::Numeric(n, _) => Some(n.payload_type()),
            PayloadPattern::Enum(Nullability::NonNull) => Some(payload.clone()),
            PayloadPattern::Enum(Nullability::Nullable) => option_inner(payload).cloned(),
            PayloadPattern::Structural(form) => form.element_of(payload),
            PayloadPattern::Fallback => Some(payload.clone()),
        };
        self.result_with(runtime, argument)
    }

    fn result_with(self, runtime: &Path, argument: Option<Type>) -> Type {
        let wrapper = self.wrapper_path(runtime);
        match argument {
            Some(arg) => parse_quote!(#wrapper<'_, #arg>),
            None => parse_quote!(#wrapper<'_>),
        }
    }
}

fn enum_or_subject(vars: &FreeVars, enum_ty: Option<&Type>) -> Type {
    match enum_ty {
        Some(ty) => ty.clone(),
        None => {
            let t = &vars.subject;
            parse_quote!(#t)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CatalogEntry {
    pub pattern: PayloadPattern,
}

impl CatalogEntry {
    pub const fn new(pattern: PayloadPattern) -> Self {
        CatalogEntry { pattern }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.pattern, PayloadPattern::Fallback)
    }
}

/// Outcome of classifying a concrete payload type.
#[derive(Debug, Clone)]
pub struct Selection<'c> {
    pub entry: &'c CatalogEntry,
    /// Wrapper type the accessor returns for this payload.
    pub result: Type,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("catalog has {0} fallback entries, expected exactly one")]
    FallbackCount(usize),
    #[error("payload patterns `{first}` and `{second}` overlap")]
    Overlap { first: String, second: String },
    #[error("nullable entry `{0:?}` has no non-nullable counterpart")]
    UnpairedNullable(PayloadPattern),
}

#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

static STANDARD: LazyLock<Catalog> = LazyLock::new(Catalog::build_standard);

impl Catalog {
    /// The shared catalog every generation run uses.
    pub fn standard() -> &'static Catalog {
        &STANDARD
    }

    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Catalog { entries }
    }

    fn build_standard() -> Self {
        let mut entries = Vec::new();
        for closed in ClosedType::ALL {
            entries.push(CatalogEntry::new(PayloadPattern::Closed(closed, Nullability::NonNull)));
            if closed.has_nullable_counterpart() {
                entries.push(CatalogEntry::new(PayloadPattern::Closed(
                    closed,
                    Nullability::Nullable,
                )));
            }
        }
        for numeric in NumericType::ALL {
            entries.push(CatalogEntry::new(PayloadPattern::Numeric(numeric, Nullability::NonNull)));
            entries.push(CatalogEntry::new(PayloadPattern::Numeric(numeric, Nullability::Nullable)));
        }
        entries.push(CatalogEntry::new(PayloadPattern::Enum(Nullability::NonNull)));
        entries.push(CatalogEntry::new(PayloadPattern::Enum(Nullability::Nullable)));
        for form in SequenceForm::ALL {
            entries.push(CatalogEntry::new(PayloadPattern::Structural(form)));
        }
        entries.push(CatalogEntry::new(PayloadPattern::Fallback));
        Catalog { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn fallback(&self) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.is_fallback())
    }

    /// The entry a concrete payload type falls under, without building the
    /// result type.
    pub fn classify(&self, payload: &Type, enums: &[Type]) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .filter(|e| !e.is_fallback())
            .find(|e| e.pattern.matches(payload, enums))
            .or_else(|| self.fallback())
    }

    /// Classifies a concrete payload type: the specific entry whose pattern
    /// matches, otherwise the fallback. Enum-vs-numeric is decided here by
    /// membership in `enums`, never by how a payload happens to be
    /// represented.
    pub fn select(&self, payload: &Type, enums: &[Type], runtime: &Path) -> Option<Selection<'_>> {
        let entry = self.classify(payload, enums)?;
        tracing::trace!(
            payload = %payload.to_token_stream(),
            pattern = ?entry.pattern,
            "selected catalog entry"
        );
        Some(Selection {
            entry,
            result: entry.pattern.concrete_result(runtime, payload),
        })
    }

    /// Self-consistency check: exactly one fallback, no two specific
    /// patterns unify, every nullable entry has its plain counterpart.
    pub fn check_disjoint(&self) -> Result<(), CatalogError> {
        let fallbacks = self.entries.iter().filter(|e| e.is_fallback()).count();
        if fallbacks != 1 {
            return Err(CatalogError::FallbackCount(fallbacks));
        }

        let runtime: Path = parse_quote!(::fluent_should);
        let vars = FreeVars::canonical();
        // Stands in for an arbitrary user enum: a nominal type that is none
        // of the std or runtime types the other entries name.
        let nominal: Type = parse_quote!(__NominalEnum);
        let wildcards = vars.wildcards();
        let patterns: Vec<Type> = self
            .entries
            .iter()
            .filter(|e| !e.is_fallback())
            .map(|e| e.pattern.payload_type(&runtime, &vars, Some(&nominal)))
            .collect();

        for (i, first) in patterns.iter().enumerate() {
            for second in &patterns[i + 1..] {
                if overlaps(first, second, &wildcards) {
                    return Err(CatalogError::Overlap {
                        first: first.to_token_stream().to_string(),
                        second: second.to_token_stream().to_string(),
                    });
                }
            }
        }

        for entry in &self.entries {
            let pattern = entry.pattern;
            if pattern.nullability() == Nullability::Nullable
                && !self.entries.iter().any(|e| e.pattern == pattern.non_nullable())
            {
                return Err(CatalogError::UnpairedNullable(pattern));
            }
        }
        Ok(())
    }
}

impl<'c> IntoIterator for &'c Catalog {
    type Item = &'c CatalogEntry;
    type IntoIter = std::slice::Iter<'c, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Structural unification where the given identifiers match anything.
fn overlaps(a: &Type, b: &Type, wildcards: &[&Ident]) -> bool {
    let (a, b) = (strip(a), strip(b));
    if is_wildcard(a, wildcards) || is_wildcard(b, wildcards) {
        return true;
    }
    match (a, b) {
        (Type::Path(x), Type::Path(y)) => {
            x.qself.is_none()
                && y.qself.is_none()
                && x.path.segments.len() == y.path.segments.len()
                && x.path.segments.iter().zip(&y.path.segments).all(|(s, t)| {
                    s.ident == t.ident && arguments_overlap(&s.arguments, &t.arguments, wildcards)
                })
        }
        (Type::Reference(x), Type::Reference(y)) => {
            x.mutability.is_some() == y.mutability.is_some() && overlaps(&x.elem, &y.elem, wildcards)
        }
        (Type::Slice(x), Type::Slice(y)) => overlaps(&x.elem, &y.elem, wildcards),
        // Array lengths are const wildcards in every pattern that has one.
        (Type::Array(x), Type::Array(y)) => overlaps(&x.elem, &y.elem, wildcards),
        (Type::Tuple(x), Type::Tuple(y)) => {
            x.elems.len() == y.elems.len()
                && x.elems.iter().zip(&y.elems).all(|(s, t)| overlaps(s, t, wildcards))
        }
        (Type::TraitObject(x), Type::TraitObject(y)) => {
            x.to_token_stream().to_string() == y.to_token_stream().to_string()
        }
        _ => false,
    }
}

fn arguments_overlap(a: &PathArguments, b: &PathArguments, wildcards: &[&Ident]) -> bool {
    let types = |args: &PathArguments| -> Vec<Type> {
        match args {
            PathArguments::AngleBracketed(ab) => ab
                .args
                .iter()
                .filter_map(|arg| match arg {
                    GenericArgument::Type(t) => Some(t.clone()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    };
    let (xs, ys) = (types(a), types(b));
    xs.len() == ys.len() && xs.iter().zip(&ys).all(|(x, y)| overlaps(x, y, wildcards))
}

fn is_wildcard(ty: &Type, wildcards: &[&Ident]) -> bool {
    match ty {
        Type::Path(tp) if tp.qself.is_none() => tp
            .path
            .get_ident()
            .is_some_and(|ident| wildcards.iter().any(|w| *w == ident)),
        _ => false,
    }
}

fn strip(ty: &Type) -> &Type {
    match ty {
        Type::Paren(p) => strip(&p.elem),
        Type::Group(g) => strip(&g.elem),
        _ => ty,
    }
}

// Modules a recognised type may be spelled through. Each entry is a path
// prefix: `std::collections` also covers `std::collections::hash_set`.
const STRING: &[&str] = &["std::string", "alloc::string"];
const PRIMITIVE: &[&str] = &["std::primitive", "core::primitive"];
const CHRONO: &[&str] = &["chrono"];
const UUID: &[&str] = &["uuid"];
const TIME: &[&str] = &["std::time", "core::time"];
const ANY: &[&str] = &["std::any", "core::any"];
const ALLOC: &[&str] = &["std::alloc", "core::alloc", "alloc::alloc"];
const PANIC: &[&str] = &["std::panic", "core::panic"];
const BOXED: &[&str] = &["std::boxed", "alloc::boxed"];
const VEC: &[&str] = &["std::vec", "alloc::vec"];
const COLLECTIONS: &[&str] = &["std::collections", "alloc::collections"];
const RC: &[&str] = &["std::rc", "alloc::rc"];
const SYNC: &[&str] = &["std::sync", "alloc::sync"];
const OPTION: &[&str] = &["std::option", "core::option"];

fn type_path(ty: &Type) -> Option<&Path> {
    match strip(ty) {
        Type::Path(tp) if tp.qself.is_none() => Some(&tp.path),
        _ => None,
    }
}

/// Last segment of `path` when it names `name`, either bare or under one of
/// `homes`. Third-party homes may sit behind one re-exporting segment
/// (`fluent_should::chrono::NaiveDate`).
fn path_named<'p>(path: &'p Path, name: &str, homes: &[&str]) -> Option<&'p PathSegment> {
    let last = path.segments.last()?;
    if last.ident != name {
        return None;
    }
    let prefix: Vec<String> = path
        .segments
        .iter()
        .take(path.segments.len() - 1)
        .map(|seg| seg.ident.to_string())
        .collect();
    if prefix.is_empty() {
        return Some(last);
    }
    let under = |prefix: &[String], home: &[&str]| {
        prefix.len() >= home.len() && prefix.iter().zip(home).all(|(p, h)| p == h)
    };
    let at_home = homes.iter().any(|home| {
        let home: Vec<&str> = home.split("::").collect();
        let std_home = matches!(home[0], "std" | "core" | "alloc");
        under(&prefix, &home) || (!std_home && under(&prefix[1..], &home))
    });
    at_home.then_some(last)
}

fn is_named(ty: &Type, name: &str, homes: &[&str]) -> bool {
    type_path(ty)
        .and_then(|path| path_named(path, name, homes))
        .is_some_and(|seg| seg.arguments.is_none())
}

/// `Name<Inner>` with exactly one type argument.
fn single_arg<'t>(ty: &'t Type, name: &str, homes: &[&str]) -> Option<&'t Type> {
    let seg = path_named(type_path(ty)?, name, homes)?;
    let PathArguments::AngleBracketed(ab) = &seg.arguments else {
        return None;
    };
    let mut types = ab.args.iter().filter_map(|arg| match arg {
        GenericArgument::Type(t) => Some(t),
        _ => None,
    });
    match (types.next(), types.next()) {
        (Some(inner), None) => Some(inner),
        _ => None,
    }
}

pub(crate) fn option_inner(ty: &Type) -> Option<&Type> {
    single_arg(ty, "Option", OPTION)
}

/// Path segments without a leading `crate`, `self` or `super`.
fn nominal_segments(ty: &Type) -> Option<Vec<String>> {
    let path = type_path(ty)?;
    Some(
        path.segments
            .iter()
            .map(|seg| seg.ident.to_string())
            .skip_while(|seg| matches!(seg.as_str(), "crate" | "self" | "super"))
            .collect(),
    )
}

/// Two spellings of one nominal type: the shorter path is a suffix of the
/// longer (`Color` and `crate::colors::Color`), so `chrono::Duration` and
/// `crate::units::Duration` stay apart.
pub(crate) fn same_nominal(known: &Type, ty: &Type) -> bool {
    match (nominal_segments(known), nominal_segments(ty)) {
        (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => {
            let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
            long.ends_with(&short)
        }
        _ => false,
    }
}
