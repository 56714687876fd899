// Declarations, members and typealiases as produced by the parser
// Resolved slots start empty and are filled in by the composition core.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::type_name::{TypeId, TypeName};

/// A declared nominal type, or an extension of one.
///
/// `name` is the declaration-local dotted name (`Parent.Child` for nested
/// types); the fully-qualified form is [`TypeDecl::global_name`]. The
/// ancestry sets (`based`, `based_types`, `inherits`, `implements`) start out
/// holding only the directly declared bases and are widened to transitive
/// closures during composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    pub module: Option<String>,
    pub imports: Vec<String>,
    pub kind: TypeKind,
    pub is_extension: bool,
    /// Declared base names, in declaration order.
    pub inherited_types: Vec<String>,
    pub variables: Vec<Variable>,
    pub methods: Vec<Method>,
    pub subscripts: Vec<Subscript>,
    /// Base names still to be resolved, textual.
    pub based: BTreeSet<String>,
    /// Transitive ancestors of any kind, by global name.
    pub based_types: BTreeSet<TypeId>,
    /// Transitive class ancestors, by global name.
    pub inherits: BTreeSet<TypeId>,
    /// Transitive protocol and composition ancestors, by global name.
    pub implements: BTreeSet<TypeId>,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            module: None,
            imports: Vec::new(),
            kind,
            is_extension: false,
            inherited_types: Vec::new(),
            variables: Vec::new(),
            methods: Vec::new(),
            subscripts: Vec::new(),
            based: BTreeSet::new(),
            based_types: BTreeSet::new(),
            inherits: BTreeSet::new(),
            implements: BTreeSet::new(),
        }
    }

    /// An extension record. Extensions carry no kind of their own; the
    /// generic nominal kind stands in until the definition is merged.
    pub fn extension(name: impl Into<String>) -> Self {
        let mut decl = Self::new(name, TypeKind::Struct);
        decl.is_extension = true;
        decl
    }

    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn with_imports(mut self, imports: Vec<String>) -> Self {
        self.imports = imports;
        self
    }

    /// Declare base names; also seeds the unresolved `based` key set.
    pub fn with_inherited_types(mut self, inherited: Vec<String>) -> Self {
        self.based = inherited.iter().cloned().collect();
        self.inherited_types = inherited;
        self
    }

    pub fn with_variables(mut self, variables: Vec<Variable>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_methods(mut self, methods: Vec<Method>) -> Self {
        self.methods = methods;
        self
    }

    pub fn with_subscripts(mut self, subscripts: Vec<Subscript>) -> Self {
        self.subscripts = subscripts;
        self
    }

    /// The fully-qualified dotted name keying this type in the session map.
    pub fn global_name(&self) -> TypeId {
        match &self.module {
            Some(module) => TypeId::new(format!("{module}.{}", self.name)),
            None => TypeId::new(self.name.clone()),
        }
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, TypeKind::Class(_))
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self.kind, TypeKind::Protocol(_))
    }

    pub fn is_composition(&self) -> bool {
        matches!(self.kind, TypeKind::Composition(_))
    }

    pub fn as_class(&self) -> Option<&ClassDetail> {
        match &self.kind {
            TypeKind::Class(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumDetail> {
        match &self.kind {
            TypeKind::Enum(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn as_protocol(&self) -> Option<&ProtocolDetail> {
        match &self.kind {
            TypeKind::Protocol(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn as_composition(&self) -> Option<&CompositionDetail> {
        match &self.kind {
            TypeKind::Composition(detail) => Some(detail),
            _ => None,
        }
    }
}

/// The kind of a nominal type, with per-kind payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeKind {
    Class(ClassDetail),
    Struct,
    Enum(EnumDetail),
    Protocol(ProtocolDetail),
    Composition(CompositionDetail),
}

impl TypeKind {
    pub fn class() -> Self {
        Self::Class(ClassDetail::default())
    }

    pub fn enumeration(cases: Vec<EnumCase>) -> Self {
        Self::Enum(EnumDetail {
            cases,
            raw_type_name: None,
            raw_type: None,
        })
    }

    pub fn protocol() -> Self {
        Self::Protocol(ProtocolDetail::default())
    }

    pub fn composition(composed_type_names: Vec<TypeName>) -> Self {
        Self::Composition(CompositionDetail {
            composed_type_names,
            composed_types: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassDetail {
    /// Set when the first declared base resolves to another class.
    pub supertype: Option<TypeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDetail {
    pub cases: Vec<EnumCase>,
    /// Textual raw-value type. Kept even when the type itself is unknown or
    /// is a protocol; cleared when the cases rule it out.
    pub raw_type_name: Option<TypeName>,
    pub raw_type: Option<TypeId>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProtocolDetail {
    pub associated_types: BTreeMap<String, AssociatedType>,
    pub generic_requirements: Vec<GenericRequirement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionDetail {
    pub composed_type_names: Vec<TypeName>,
    /// Resolved members of the composition, in declaration order.
    pub composed_types: Vec<TypeId>,
}

/// One case of an enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumCase {
    pub name: String,
    pub associated_values: Vec<AssociatedValue>,
}

impl EnumCase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            associated_values: Vec::new(),
        }
    }

    pub fn with_associated_values(mut self, associated_values: Vec<AssociatedValue>) -> Self {
        self.associated_values = associated_values;
        self
    }

    pub fn has_associated_values(&self) -> bool {
        !self.associated_values.is_empty()
    }
}

/// One associated value of an enum case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociatedValue {
    pub local_name: Option<String>,
    pub type_name: TypeName,
    pub resolved: Option<TypeId>,
}

impl AssociatedValue {
    pub fn new(local_name: Option<String>, type_name: TypeName) -> Self {
        Self {
            local_name,
            type_name,
            resolved: None,
        }
    }
}

/// An associated type declared on a protocol, with an optional constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociatedType {
    pub name: String,
    pub type_name: Option<TypeName>,
    pub resolved: Option<TypeId>,
}

impl AssociatedType {
    pub fn new(name: impl Into<String>, type_name: Option<TypeName>) -> Self {
        Self {
            name: name.into(),
            type_name,
            resolved: None,
        }
    }
}

/// How the two sides of a generic requirement relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequirementRelationship {
    ConformsTo,
    Equals,
}

/// One clause of a protocol `where` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericRequirement {
    pub left_type: AssociatedType,
    pub right_type_name: TypeName,
    pub right_type: Option<TypeId>,
    pub relationship: RequirementRelationship,
}

impl GenericRequirement {
    pub fn new(
        left_type: AssociatedType,
        right_type_name: TypeName,
        relationship: RequirementRelationship,
    ) -> Self {
        Self {
            left_type,
            right_type_name,
            right_type: None,
            relationship,
        }
    }
}

/// A stored or computed property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub type_name: TypeName,
    pub resolved: Option<TypeId>,
    pub is_static: bool,
    pub is_computed: bool,
    pub defined_in_type_name: Option<TypeName>,
}

impl Variable {
    pub fn new(name: impl Into<String>, type_name: TypeName) -> Self {
        Self {
            name: name.into(),
            type_name,
            resolved: None,
            is_static: false,
            is_computed: false,
            defined_in_type_name: None,
        }
    }

    pub fn computed(mut self) -> Self {
        self.is_computed = true;
        self
    }

    pub fn statik(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn defined_in(mut self, type_name: TypeName) -> Self {
        self.defined_in_type_name = Some(type_name);
        self
    }

    pub fn is_stored(&self) -> bool {
        !self.is_computed
    }
}

/// One parameter of a method, initializer, subscript or free function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodParameter {
    pub name: String,
    pub type_name: TypeName,
    pub resolved: Option<TypeId>,
}

impl MethodParameter {
    pub fn new(name: impl Into<String>, type_name: TypeName) -> Self {
        Self {
            name: name.into(),
            type_name,
            resolved: None,
        }
    }
}

/// A method on a type, or a free function when no containing type exists.
/// Free functions carry their own `module` and `imports` tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub parameters: Vec<MethodParameter>,
    pub return_type_name: TypeName,
    pub return_type: Option<TypeId>,
    pub is_initializer: bool,
    pub is_failable_initializer: bool,
    pub defined_in_type_name: Option<TypeName>,
    pub module: Option<String>,
    pub imports: Vec<String>,
}

impl Method {
    pub fn new(
        name: impl Into<String>,
        parameters: Vec<MethodParameter>,
        return_type_name: TypeName,
    ) -> Self {
        Self {
            name: name.into(),
            parameters,
            return_type_name,
            return_type: None,
            is_initializer: false,
            is_failable_initializer: false,
            defined_in_type_name: None,
            module: None,
            imports: Vec::new(),
        }
    }

    pub fn initializer(mut self) -> Self {
        self.is_initializer = true;
        self
    }

    pub fn failable_initializer(mut self) -> Self {
        self.is_initializer = true;
        self.is_failable_initializer = true;
        self
    }

    pub fn defined_in(mut self, type_name: TypeName) -> Self {
        self.defined_in_type_name = Some(type_name);
        self
    }

    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn with_imports(mut self, imports: Vec<String>) -> Self {
        self.imports = imports;
        self
    }
}

/// A subscript declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscript {
    pub parameters: Vec<MethodParameter>,
    pub return_type_name: TypeName,
    pub return_type: Option<TypeId>,
    pub defined_in_type_name: Option<TypeName>,
}

impl Subscript {
    pub fn new(parameters: Vec<MethodParameter>, return_type_name: TypeName) -> Self {
        Self {
            parameters,
            return_type_name,
            return_type: None,
            defined_in_type_name: None,
        }
    }
}

/// A typealias declaration. `parent_name` is the declaration-local dotted
/// name of the containing type, when nested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Typealias {
    pub alias_name: String,
    pub parent_name: Option<String>,
    pub module: Option<String>,
    pub type_name: TypeName,
    pub resolved: Option<TypeId>,
}

impl Typealias {
    pub fn new(alias_name: impl Into<String>, type_name: TypeName) -> Self {
        Self {
            alias_name: alias_name.into(),
            parent_name: None,
            module: None,
            type_name,
            resolved: None,
        }
    }

    pub fn in_type(mut self, parent_name: impl Into<String>) -> Self {
        self.parent_name = Some(parent_name.into());
        self
    }

    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// The parent-qualified name, without module.
    pub fn local_name(&self) -> String {
        match &self.parent_name {
            Some(parent) => format!("{parent}.{}", self.alias_name),
            None => self.alias_name.clone(),
        }
    }

    /// The fully-qualified name keying this alias in the session maps.
    pub fn global_name(&self) -> TypeId {
        match &self.module {
            Some(module) => TypeId::new(format!("{module}.{}", self.local_name())),
            None => TypeId::new(self.local_name()),
        }
    }
}

/// Everything the parser hands to the composition core: a possibly
/// duplicated bag of type declarations and extensions, free functions and
/// typealiases, all with textual unresolved type references.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParserResult {
    pub types: Vec<TypeDecl>,
    pub functions: Vec<Method>,
    pub typealiases: Vec<Typealias>,
}
