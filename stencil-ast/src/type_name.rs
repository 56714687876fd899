// Textual type references and their compound forms
// Every declaration site owns its own TypeName instances; the composer
// rewrites them in place during resolution.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a declared type: its fully-qualified global name.
/// All cross-links in the resolved graph are expressed as `TypeId` keys into
/// the session's type map rather than owning pointers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeId(pub String);

impl TypeId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A rewritable textual description of a type reference.
///
/// `name` holds the reference as written, minus optional markers (those live
/// in the two optionality flags). At most one compound payload is populated,
/// describing the structure of tuples, arrays, dictionaries, closures and
/// generics. `actual_type_name` is the post-typealias-substitution form,
/// cached on the reference itself; it is written at most once per resolution
/// pass and never reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeName {
    pub name: String,
    pub is_optional: bool,
    pub is_implicitly_unwrapped_optional: bool,
    pub is_protocol_composition: bool,
    pub tuple: Option<Box<TupleType>>,
    pub array: Option<Box<ArrayType>>,
    pub dictionary: Option<Box<DictionaryType>>,
    pub closure: Option<Box<ClosureType>>,
    pub generic: Option<Box<GenericType>>,
    pub actual_type_name: Option<Box<TypeName>>,
}

impl TypeName {
    /// Create a plain named reference with no compound structure.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_optional: false,
            is_implicitly_unwrapped_optional: false,
            is_protocol_composition: false,
            tuple: None,
            array: None,
            dictionary: None,
            closure: None,
            generic: None,
            actual_type_name: None,
        }
    }

    /// Create a tuple reference; `name` is the canonical tuple form.
    pub fn tuple(tuple: TupleType) -> Self {
        let mut type_name = Self::new(tuple.name.clone());
        type_name.tuple = Some(Box::new(tuple));
        type_name
    }

    /// Create an array reference in literal `[Element]` form.
    pub fn array(array: ArrayType) -> Self {
        let mut type_name = Self::new(array.name.clone());
        type_name.generic = Some(Box::new(array.as_generic()));
        type_name.array = Some(Box::new(array));
        type_name
    }

    /// Create a dictionary reference in literal `[Key: Value]` form.
    pub fn dictionary(dictionary: DictionaryType) -> Self {
        let mut type_name = Self::new(dictionary.name.clone());
        type_name.generic = Some(Box::new(dictionary.as_generic()));
        type_name.dictionary = Some(Box::new(dictionary));
        type_name
    }

    /// Create a closure reference.
    pub fn closure(closure: ClosureType) -> Self {
        let mut type_name = Self::new(closure.name.clone());
        type_name.closure = Some(Box::new(closure));
        type_name
    }

    /// Create a generic reference, e.g. `List<String>`.
    pub fn generic(generic: GenericType) -> Self {
        let mut type_name = Self::new(generic.composed_name());
        type_name.generic = Some(Box::new(generic));
        type_name
    }

    /// Create a protocol composition reference, e.g. `Codable & Hashable`.
    pub fn composition(name: impl Into<String>) -> Self {
        let mut type_name = Self::new(name);
        type_name.is_protocol_composition = true;
        type_name
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    pub fn implicitly_unwrapped(mut self) -> Self {
        self.is_implicitly_unwrapped_optional = true;
        self
    }

    /// The textual form with leading/trailing optional markers removed.
    pub fn unwrapped_type_name(&self) -> &str {
        self.name.trim_end_matches(['?', '!'])
    }

    /// Whether this reference names the empty return type.
    pub fn is_void(&self) -> bool {
        self.name == "Void" || self.name == "()" || self.name == "(Void)"
    }

    /// The substituted form when one was recorded, the reference itself
    /// otherwise.
    pub fn actual(&self) -> &TypeName {
        self.actual_type_name.as_deref().unwrap_or(self)
    }

    /// Record the post-substitution form. The slot is single-write: a form
    /// recorded earlier in the pass is kept.
    pub fn set_actual(&mut self, actual: TypeName) {
        if self.actual_type_name.is_none() {
            self.actual_type_name = Some(Box::new(actual));
        }
    }

    /// Copy the optionality flags of `other` onto `self`, combining with any
    /// already present. Used when a substituted form inherits the markers of
    /// the reference it replaces.
    pub fn inherit_optionality(mut self, other: &TypeName) -> Self {
        self.is_optional |= other.is_optional;
        self.is_implicitly_unwrapped_optional |= other.is_implicitly_unwrapped_optional;
        self
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.is_implicitly_unwrapped_optional {
            write!(f, "!")?;
        } else if self.is_optional {
            write!(f, "?")?;
        }
        Ok(())
    }
}

/// One element of a tuple type, optionally labelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TupleElement {
    pub name: Option<String>,
    pub type_name: TypeName,
    pub resolved: Option<TypeId>,
}

impl TupleElement {
    pub fn new(name: Option<String>, type_name: TypeName) -> Self {
        Self {
            name,
            type_name,
            resolved: None,
        }
    }
}

/// A tuple type expression; `name` is the canonical `(A, B)` form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TupleType {
    pub name: String,
    pub elements: Vec<TupleElement>,
}

impl TupleType {
    pub fn new(elements: Vec<TupleElement>) -> Self {
        let rendered: Vec<String> = elements
            .iter()
            .map(|element| element.type_name.to_string())
            .collect();
        Self {
            name: format!("({})", rendered.join(", ")),
            elements,
        }
    }
}

/// An array type expression; `name` is the canonical `[Element]` form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayType {
    pub name: String,
    pub element_type_name: TypeName,
    pub element: Option<TypeId>,
}

impl ArrayType {
    pub fn new(element_type_name: TypeName) -> Self {
        Self {
            name: format!("[{element_type_name}]"),
            element_type_name,
            element: None,
        }
    }

    /// The equivalent `Array<Element>` spelling.
    pub fn as_generic(&self) -> GenericType {
        GenericType::new(
            "Array",
            vec![GenericTypeParameter::new(self.element_type_name.clone())],
        )
    }
}

/// A dictionary type expression; `name` is the canonical `[Key: Value]` form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryType {
    pub name: String,
    pub key_type_name: TypeName,
    pub key: Option<TypeId>,
    pub value_type_name: TypeName,
    pub value: Option<TypeId>,
}

impl DictionaryType {
    pub fn new(key_type_name: TypeName, value_type_name: TypeName) -> Self {
        Self {
            name: format!("[{key_type_name}: {value_type_name}]"),
            key_type_name,
            key: None,
            value_type_name,
            value: None,
        }
    }

    /// The equivalent `Dictionary<Key, Value>` spelling.
    pub fn as_generic(&self) -> GenericType {
        GenericType::new(
            "Dictionary",
            vec![
                GenericTypeParameter::new(self.key_type_name.clone()),
                GenericTypeParameter::new(self.value_type_name.clone()),
            ],
        )
    }
}

/// One parameter of a closure type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosureParameter {
    pub type_name: TypeName,
    pub resolved: Option<TypeId>,
}

impl ClosureParameter {
    pub fn new(type_name: TypeName) -> Self {
        Self {
            type_name,
            resolved: None,
        }
    }
}

/// A closure type expression; `name` is the canonical `(A, B) -> R` form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosureType {
    pub name: String,
    pub parameters: Vec<ClosureParameter>,
    pub return_type_name: TypeName,
    pub return_type: Option<TypeId>,
}

impl ClosureType {
    pub fn new(parameters: Vec<ClosureParameter>, return_type_name: TypeName) -> Self {
        let rendered: Vec<String> = parameters
            .iter()
            .map(|parameter| parameter.type_name.to_string())
            .collect();
        Self {
            name: format!("({}) -> {return_type_name}", rendered.join(", ")),
            parameters,
            return_type_name,
            return_type: None,
        }
    }
}

/// One type argument of a generic reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericTypeParameter {
    pub type_name: TypeName,
    pub resolved: Option<TypeId>,
}

impl GenericTypeParameter {
    pub fn new(type_name: TypeName) -> Self {
        Self {
            type_name,
            resolved: None,
        }
    }
}

/// A generic type expression. `name` is the base name (`List`), while
/// `composed_name` renders the applied `List<String>` form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericType {
    pub name: String,
    pub type_parameters: Vec<GenericTypeParameter>,
}

impl GenericType {
    pub fn new(name: impl Into<String>, type_parameters: Vec<GenericTypeParameter>) -> Self {
        Self {
            name: name.into(),
            type_parameters,
        }
    }

    pub fn composed_name(&self) -> String {
        let rendered: Vec<String> = self
            .type_parameters
            .iter()
            .map(|parameter| parameter.type_name.to_string())
            .collect();
        format!("{}<{}>", self.name, rendered.join(", "))
    }
}
