//! # Stencil Composer
//!
//! The type resolution and composition core of the Stencil toolchain. The
//! parser hands over a raw bag of declarations with textual type references;
//! this crate unifies duplicate declarations, substitutes typealiases
//! through every compound type expression, cross-links members to their
//! declared types and computes transitive ancestor sets, then returns the
//! canonical graph in sorted, stable order.
//!
//! Resolution is permissive: a reference that names nothing declared keeps
//! its textual form and an empty resolved slot, so downstream code
//! generation can still render types it has no access to.
//!
//! ```rust
//! use stencil_ast::{ParserResult, TypeDecl, TypeKind, TypeName, Typealias, Variable};
//! use stencil_composer::compose;
//!
//! let parsed = ParserResult {
//!     types: vec![
//!         TypeDecl::new("Bar", TypeKind::class()),
//!         TypeDecl::new("Holder", TypeKind::Struct)
//!             .with_variables(vec![Variable::new("x", TypeName::new("Foo"))]),
//!     ],
//!     functions: vec![],
//!     typealiases: vec![Typealias::new("Foo", TypeName::new("Bar"))],
//! };
//!
//! let composition = compose(parsed);
//! let holder = &composition.types[1];
//! assert_eq!(
//!     holder.variables[0].type_name.actual().name,
//!     "Bar"
//! );
//! ```

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use stencil_ast::{Method, ParserResult, TypeDecl, Typealias};

mod ancestry;
mod lookup;
mod members;
mod rewrite;
mod state;
mod unifier;

#[cfg(test)]
mod tests;

use lookup::Scope;
use state::{Lookup, Unified};

/// The resolved, cross-linked type graph: types sorted by global name,
/// functions and typealiases sorted by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub types: Vec<TypeDecl>,
    pub functions: Vec<Method>,
    pub typealiases: Vec<Typealias>,
}

/// Transform raw parser output into the canonical type graph.
///
/// Phases: unification, parallel member resolution over types and free
/// functions, typealias target resolution, sequential ancestor closure,
/// deterministic sort. One pass produces the final output; running it again
/// on the same input yields a structurally equal result.
pub fn compose(parser_result: ParserResult) -> Composition {
    let unified = unifier::unify(parser_result);
    let lookup = Lookup::from_unified(&unified);
    let Unified {
        mut types,
        mut functions,
        mut typealiases,
        ..
    } = unified;

    types
        .par_iter_mut()
        .for_each(|decl| members::resolve_type_members(decl, &lookup));
    functions
        .par_iter_mut()
        .for_each(|function| members::resolve_function(function, &lookup));

    for alias in &mut typealiases {
        let scope = Scope::of_typealias(alias);
        alias.resolved = rewrite::resolve_type_name(&mut alias.type_name, &scope, &lookup);
    }

    ancestry::resolve_ancestry(&mut types);

    types.sort_by_key(|decl| decl.global_name());
    functions.sort_by(|a, b| a.name.cmp(&b.name));
    typealiases.sort_by(|a, b| a.alias_name.cmp(&b.alias_name));

    Composition {
        types,
        functions,
        typealiases,
    }
}
