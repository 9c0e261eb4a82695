//! Opaque identifiers handed out by a host surface.
//!
//! Ids are plain `u64` newtypes: cheap to copy, hashable, and meaningless
//! outside the host that issued them. A `NodeId` from one host must never be
//! used against another.

macro_rules! host_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw id value.
            #[must_use]
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Get the raw id value.
            #[inline]
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

host_id! {
    /// A page element owned by the host surface.
    NodeId
}

host_id! {
    /// A pending timer (one-shot or repeating).
    TimerId
}

host_id! {
    /// A registered visibility observation.
    ObservationId
}

host_id! {
    /// An in-flight form submission.
    SubmissionId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_raw_value() {
        assert_eq!(NodeId::new(7).get(), 7);
        assert_eq!(TimerId::new(0).get(), 0);
        assert_eq!(ObservationId::new(u64::MAX).get(), u64::MAX);
    }

    #[test]
    fn ids_are_distinct_types() {
        // Compile-time property, exercised here for the display format only.
        assert_eq!(NodeId::new(3).to_string(), "NodeId#3");
        assert_eq!(SubmissionId::new(3).to_string(), "SubmissionId#3");
    }

    #[test]
    fn ids_order_by_raw_value() {
        assert!(NodeId::new(1) < NodeId::new(2));
    }
}
