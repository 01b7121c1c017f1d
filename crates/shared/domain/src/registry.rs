//! Type-erased storage for the state each feature slice builds at startup.

use std::any::{Any, TypeId, type_name};
use std::fmt::Debug;

/// State owned by one feature slice, shared by every request of the server.
pub trait FeatureSlice: Any + Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

/// A slice after `init`, keyed by the concrete type of its state.
#[derive(Debug)]
pub struct InitializedSlice {
    pub id: TypeId,
    /// Short type name (`Vehicles`, `Media`, ...), used in startup logs.
    pub name: &'static str,
    pub state: Box<dyn FeatureSlice>,
}

impl InitializedSlice {
    pub fn new<T: FeatureSlice>(state: T) -> Self {
        let full = type_name::<T>();
        let name = full.rsplit("::").next().unwrap_or(full);
        Self { id: TypeId::of::<T>(), name, state: Box::new(state) }
    }

    /// Borrows the state as `T`; `None` when the slice holds another type.
    #[must_use]
    pub fn downcast<T: FeatureSlice>(&self) -> Option<&T> {
        self.state.as_any().downcast_ref::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Catalog(u32);

    impl FeatureSlice for Catalog {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn keeps_short_name_and_downcasts() {
        let slice = InitializedSlice::new(Catalog(7));
        assert_eq!(slice.name, "Catalog");
        assert_eq!(slice.id, TypeId::of::<Catalog>());
        assert_eq!(slice.downcast::<Catalog>().map(|c| c.0), Some(7));
    }
}
