//! Concrete implementations of the registry trait defined by the domain
//! layer. The relay service depends on the trait, never on these types
//! directly (dependency inversion).

pub mod inmemory;

pub use inmemory::InMemoryConnectionRegistry;
