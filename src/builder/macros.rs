//! Macros for ergonomic event kind definitions.

/// Generate an [`EventKind`](crate::core::EventKind) implementation for a
/// simple enum.
///
/// Each variant is given its wire name; the enum derives `Clone`, `Debug`,
/// `PartialEq`, `Eq`, `Serialize` and `Deserialize`.
///
/// # Example
///
/// ```
/// use fsm_engine::core::EventKind;
/// use fsm_engine::event_kind;
///
/// event_kind! {
///     pub enum DoorEvent {
///         Opened => "door_opened",
///         Closed => "door_closed",
///     }
/// }
///
/// assert_eq!(DoorEvent::Opened.name(), "door_opened");
/// ```
#[macro_export]
macro_rules! event_kind {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $wire:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::EventKind for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => $wire),*
                }
            }
        }
    };
}
