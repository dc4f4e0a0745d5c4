//! Marker traits for the domain model: entities, aggregate roots, value objects.

/// Entity marker: identity + continuity across state changes.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Aggregate root marker + minimal interface.
///
/// Intentionally small so domain modules can decide how they model state
/// transitions without bringing in any infrastructure concerns.
pub trait AggregateRoot: Entity {
    /// Monotonically increasing version of the aggregate's state.
    ///
    /// Increments by one per applied mutation; useful for change tracking
    /// and audit output.
    fn version(&self) -> u64;
}

/// Marker trait for value objects.
///
/// Value objects have **no identity** - they are defined entirely by their
/// attribute values and compared by value. They are immutable: to "modify"
/// one, create a new one. `OrderItem` and `PricingTier` are value objects;
/// `Order` and `Product` are entities.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
