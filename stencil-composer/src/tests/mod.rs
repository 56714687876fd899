//! Scenario, invariant and property tests for the composition core

mod support;


// Typealias substitution through simple and compound references
mod test_typealias;


// Enum raw-type computation
mod test_enums;
